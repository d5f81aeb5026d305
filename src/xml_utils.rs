/*!
 * Shared quick-xml event helpers for the TMX reader and writer.
 */

use std::collections::BTreeMap;
use std::io::Write;

use log::warn;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::errors::{Result, TmxError};

/// Copy an element's attribute set into an owned map, unescaping values.
/// Attributes that fail to parse are skipped with a warning.
pub(crate) fn attribute_map(element: &BytesStart) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();

    for attr in element.attributes() {
        let Ok(attr) = attr else {
            warn!(
                "skipping malformed attribute on <{}>",
                String::from_utf8_lossy(element.name().as_ref())
            );
            continue;
        };

        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(TmxError::xml)?.into_owned();
        map.insert(key, value);
    }

    Ok(map)
}

/// Look up a single attribute by its qualified name (e.g. `xml:lang`).
pub(crate) fn attribute_value(element: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let Ok(attr) = attr else { continue };

        if attr.key.as_ref() == name {
            let value = attr.unescape_value().map_err(TmxError::xml)?.into_owned();
            return Ok(Some(value));
        }
    }

    Ok(None)
}

/// Consume the rest of the current element and accumulate its text content,
/// flattening any nested inline markup to text only. The caller must have
/// just consumed the element's start event.
pub(crate) fn read_element_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 0usize;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(TmxError::xml)? {
            Event::Start(_) => depth += 1,
            Event::Text(t) => {
                text.push_str(&t.unescape().map_err(TmxError::xml)?);
            }
            Event::CData(t) => {
                text.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(TmxError::InvalidFormat(
                    "unexpected end of document inside element".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

/// Write one `<prop type="...">text</prop>` element. The value goes in as a
/// text node so XML-special characters are escaped by the writer, never
/// interpreted as markup.
pub(crate) fn write_prop<W: Write>(
    writer: &mut Writer<W>,
    prop_type: &str,
    value: &str,
) -> Result<()> {
    let mut prop = BytesStart::new("prop");
    prop.push_attribute(("type", prop_type));

    writer
        .write_event(Event::Start(prop))
        .map_err(TmxError::xml)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(TmxError::xml)?;
    writer
        .write_event(Event::End(BytesEnd::new("prop")))
        .map_err(TmxError::xml)?;

    Ok(())
}
