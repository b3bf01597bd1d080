use std::io::Write;

use quick_xml::escape::escape;

use crate::domain::FlatRow;
use crate::error::Result;

const EMPTY_PAGE: &str = "<html><body><p>No data available.</p></body></html>";

/// A single bordered table with a header row of column names.
pub fn write_html<W: Write>(rows: &[FlatRow], mut out: W) -> Result<usize> {
    if rows.is_empty() {
        out.write_all(EMPTY_PAGE.as_bytes())?;
        return Ok(0);
    }

    let mut page = String::from(
        "<html>\
         <head><meta charset='utf-8'><title>Ad Transparency Export</title></head>\
         <body>\
         <table border='1' cellspacing='0' cellpadding='4'>\
         <thead><tr>",
    );
    for column in FlatRow::COLUMNS {
        page.push_str("<th>");
        page.push_str(&escape(column));
        page.push_str("</th>");
    }
    page.push_str("</tr></thead><tbody>");

    for row in rows {
        page.push_str("<tr>");
        for value in row.values() {
            page.push_str("<td>");
            page.push_str(&escape(value.as_str()));
            page.push_str("</td>");
        }
        page.push_str("</tr>");
    }
    page.push_str("</tbody></table></body></html>");

    out.write_all(page.as_bytes())?;
    Ok(rows.len())
}
