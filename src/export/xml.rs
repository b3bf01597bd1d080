use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::domain::FlatRow;
use crate::error::Result;

/// `<ads><ad><column>value</column>...</ad>...</ads>` with one `<ad>` per row.
pub fn write_xml<W: Write>(rows: &[FlatRow], out: W) -> Result<usize> {
    let mut xml = Writer::new_with_indent(out, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    xml.write_event(Event::Start(BytesStart::new("ads")))?;

    for row in rows {
        xml.write_event(Event::Start(BytesStart::new("ad")))?;
        for (column, value) in FlatRow::COLUMNS.iter().zip(row.values()) {
            xml.write_event(Event::Start(BytesStart::new(*column)))?;
            xml.write_event(Event::Text(BytesText::new(&value)))?;
            xml.write_event(Event::End(BytesEnd::new(*column)))?;
        }
        xml.write_event(Event::End(BytesEnd::new("ad")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("ads")))?;
    xml.into_inner().flush()?;
    Ok(rows.len())
}
