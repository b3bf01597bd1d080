use std::io::Write;

use crate::domain::AdRecord;
use crate::error::Result;

/// Pretty-printed JSON array of nested records.
pub fn write_json<W: Write>(ads: &[AdRecord], mut out: W) -> Result<usize> {
    serde_json::to_writer_pretty(&mut out, ads)?;
    out.write_all(b"\n")?;
    Ok(ads.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn writes_array_of_records() {
        let ads = vec![
            AdRecord {
                creative_id: "CR1".into(),
                ..AdRecord::default()
            },
            AdRecord::default(),
        ];
        let mut buf = Vec::new();
        assert_eq!(write_json(&ads, &mut buf).unwrap(), 2);

        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["creativeId"], "CR1");
        assert_eq!(parsed[0]["regionStats"], serde_json::json!([]));
        assert_eq!(parsed[1]["targeting"], Value::Null);
    }
}
