//! Writers for the exported ad data.
//!
//! JSON keeps the nested record structure; CSV, XML and HTML are tabular and
//! write one line, element or table row per flattened row.

pub mod csv;
pub mod html;
pub mod json;
pub mod xml;

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::domain::{flatten_ads, AdRecord};
use crate::error::{Result, ScraperError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Xml,
    Html,
}

impl ExportFormat {
    /// Format implied by the file extension; unknown extensions export JSON.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => ExportFormat::Csv,
            Some("xml") => ExportFormat::Xml,
            Some("html") | Some("htm") => ExportFormat::Html,
            _ => ExportFormat::Json,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "xml" => Ok(ExportFormat::Xml),
            "html" | "htm" => Ok(ExportFormat::Html),
            other => Err(ScraperError::InvalidInput(format!(
                "unknown export format '{other}' (expected json, csv, xml or html)"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
            ExportFormat::Html => "html",
        };
        f.write_str(name)
    }
}

/// Writes `ads` to `path`, creating parent directories as needed.
///
/// Returns the number of items written: records for JSON, flat rows otherwise.
pub fn export_records(ads: &[AdRecord], path: &Path, format: ExportFormat) -> Result<usize> {
    ensure_parent_dir(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    let written = write_records(ads, format, &mut out)?;
    out.flush()?;
    info!(
        "Exported {} {} to {} at {}",
        written,
        if format == ExportFormat::Json { "record(s)" } else { "row(s)" },
        format.to_string().to_uppercase(),
        path.display()
    );
    Ok(written)
}

/// Writes `ads` in `format` to any writer.
pub fn write_records<W: Write>(ads: &[AdRecord], format: ExportFormat, out: W) -> Result<usize> {
    match format {
        ExportFormat::Json => json::write_json(ads, out),
        ExportFormat::Csv => csv::write_csv(&flatten_ads(ads), out),
        ExportFormat::Xml => xml::write_xml(&flatten_ads(ads), out),
        ExportFormat::Html => html::write_html(&flatten_ads(ads), out),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a/b.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("b.xml")), ExportFormat::Xml);
        assert_eq!(ExportFormat::from_path(Path::new("b.htm")), ExportFormat::Html);
        assert_eq!(ExportFormat::from_path(Path::new("b.json")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("b")), ExportFormat::Json);
    }

    #[test]
    fn format_from_name() {
        assert_eq!("HTML".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert!("yaml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.json");
        let written = export_records(&[AdRecord::default()], &path, ExportFormat::Json).unwrap();
        assert_eq!(written, 1);
        assert!(path.exists());
    }
}
