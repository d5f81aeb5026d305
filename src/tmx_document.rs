/*!
 * Whole-document model: a TMX translation memory with header metadata and
 * an ordered collection of translation units.
 */

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TmxError};
use crate::file_utils::FileManager;
use crate::translation_unit::TranslationUnit;
use crate::xml_utils;

/// TMX version written on the root element when saving
const TMX_VERSION: &str = "1.4";

/// An in-memory TMX translation memory.
///
/// Built by parsing (from string or file) or assembled directly for
/// documents authored programmatically. Unit order is the document's
/// canonical ordering and is preserved across parse and save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmxDocument {
    /// Attributes copied verbatim from the `<header>` element
    pub attributes: BTreeMap<String, String>,

    /// Header-level custom properties, from the header's direct `<prop>`
    /// children. Last value wins on duplicate `type`.
    pub properties: BTreeMap<String, String>,

    /// Translation units in document (depth-first) order
    pub units: Vec<TranslationUnit>,
}

impl TmxDocument {
    /// Create an empty document for programmatic authoring
    pub fn new() -> Self {
        TmxDocument::default()
    }

    /// Parse a complete TMX document from a UTF-8 XML string.
    ///
    /// The root tag must be literally `tmx` and the document must contain a
    /// `<header>` element; every `<tu>` element anywhere in the tree is
    /// collected, in document order. The first invalid unit aborts the whole
    /// parse and no partial document is returned.
    pub fn parse_str(xml: &str) -> Result<TmxDocument> {
        let mut reader = Reader::from_reader(xml.as_bytes());
        let mut buf = Vec::new();

        let mut root_seen = false;
        let mut header: Option<BTreeMap<String, String>> = None;
        let mut properties = BTreeMap::new();
        let mut units = Vec::new();

        loop {
            match reader.read_event_into(&mut buf).map_err(TmxError::xml)? {
                Event::Start(e) | Event::Empty(e) if !root_seen => {
                    if e.name().as_ref() != b"tmx" {
                        return Err(TmxError::InvalidFormat("Not valid TMX".to_string()));
                    }
                    root_seen = true;
                }
                Event::Start(e) => match e.name().as_ref() {
                    b"header" => {
                        if header.is_some() {
                            warn!("ignoring duplicate <header> element");
                        } else {
                            let attributes = xml_utils::attribute_map(&e)?;
                            properties = Self::read_header_props(&mut reader)?;
                            header = Some(attributes);
                        }
                    }
                    b"tu" => {
                        let attributes = xml_utils::attribute_map(&e)?;
                        units.push(TranslationUnit::read_from_events(&mut reader, attributes)?);
                    }
                    _ => {}
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"header" => {
                        if header.is_some() {
                            warn!("ignoring duplicate <header> element");
                        } else {
                            header = Some(xml_utils::attribute_map(&e)?);
                        }
                    }
                    b"tu" => {
                        return Err(TmxError::InvalidFormat(
                            "Not valid Translation Unit: <tu> has 0 <tuv> children, \
                             expected at least 2"
                                .to_string(),
                        ));
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !root_seen {
            return Err(TmxError::InvalidFormat("Not valid TMX".to_string()));
        }
        let attributes = header.ok_or_else(|| {
            TmxError::InvalidFormat("Not valid TMX: missing <header> element".to_string())
        })?;

        debug!(
            "parsed TMX document: {} translation units, {} header properties",
            units.len(),
            properties.len()
        );

        Ok(TmxDocument {
            attributes,
            properties,
            units,
        })
    }

    /// Parse a TMX document from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<TmxDocument> {
        let content = FileManager::read_to_string(path.as_ref())?;
        let document = Self::parse_str(&content)?;
        debug!("loaded TMX document from {:?}", path.as_ref());
        Ok(document)
    }

    /// Number of translation units in the document. O(1).
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True when the document holds no translation units
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Translation unit at the given 0-based position.
    ///
    /// Any index at or beyond the unit count fails with `IndexOutOfRange`.
    pub fn get(&self, index: usize) -> Result<&TranslationUnit> {
        self.units.get(index).ok_or(TmxError::IndexOutOfRange {
            index,
            len: self.units.len(),
        })
    }

    /// Lazy, restartable sequence of the serialized XML form of each unit,
    /// in document order, for consumption by a writer.
    pub fn iter_xml(&self) -> impl Iterator<Item = Result<String>> + '_ {
        self.units.iter().map(TranslationUnit::to_xml)
    }

    /// Save the document as a TMX file, creating or overwriting the
    /// destination. The output carries an XML declaration (version 1.0,
    /// UTF-8), the header attributes and properties, and every unit in
    /// order under `<body>`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = Writer::new(Vec::new());

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(TmxError::xml)?;

        let mut root = BytesStart::new("tmx");
        root.push_attribute(("version", TMX_VERSION));
        writer
            .write_event(Event::Start(root))
            .map_err(TmxError::xml)?;

        let mut header = BytesStart::new("header");
        for (key, value) in &self.attributes {
            header.push_attribute((key.as_str(), value.as_str()));
        }
        if self.properties.is_empty() {
            writer
                .write_event(Event::Empty(header))
                .map_err(TmxError::xml)?;
        } else {
            writer
                .write_event(Event::Start(header))
                .map_err(TmxError::xml)?;
            for (prop_type, value) in &self.properties {
                xml_utils::write_prop(&mut writer, prop_type, value)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new("header")))
                .map_err(TmxError::xml)?;
        }

        writer
            .write_event(Event::Start(BytesStart::new("body")))
            .map_err(TmxError::xml)?;
        for unit in &self.units {
            unit.write_xml(&mut writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("body")))
            .map_err(TmxError::xml)?;

        writer
            .write_event(Event::End(BytesEnd::new("tmx")))
            .map_err(TmxError::xml)?;

        FileManager::write_bytes(path.as_ref(), &writer.into_inner())?;
        debug!(
            "saved TMX document to {:?} ({} units)",
            path.as_ref(),
            self.units.len()
        );
        Ok(())
    }

    /// Drop units whose source segment was already seen, keeping the first
    /// occurrence and the document order. Returns the number removed.
    pub fn dedup(&mut self) -> usize {
        let before = self.units.len();
        let mut seen = HashSet::new();
        self.units.retain(|unit| seen.insert(unit.source_hash()));

        let removed = before - self.units.len();
        if removed > 0 {
            debug!("removed {} duplicate translation units", removed);
        }
        removed
    }

    /// Read the direct `<prop>` children of the `<header>` element. The
    /// caller has just consumed the header start event; this consumes events
    /// up to and including the matching end tag. Props nested deeper than
    /// one level are not header properties and are skipped.
    fn read_header_props(reader: &mut Reader<&[u8]>) -> Result<BTreeMap<String, String>> {
        let mut properties = BTreeMap::new();
        let mut depth = 0usize;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf).map_err(TmxError::xml)? {
                Event::Start(e) if depth == 0 && e.name().as_ref() == b"prop" => {
                    let prop_type = xml_utils::attribute_value(&e, b"type")?;
                    let text = xml_utils::read_element_text(reader)?;
                    match prop_type {
                        Some(t) => {
                            properties.insert(t, text);
                        }
                        None => warn!("skipping header <prop> without a type attribute"),
                    }
                }
                Event::Empty(e) if depth == 0 && e.name().as_ref() == b"prop" => {
                    match xml_utils::attribute_value(&e, b"type")? {
                        Some(t) => {
                            properties.insert(t, String::new());
                        }
                        None => warn!("skipping header <prop> without a type attribute"),
                    }
                }
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Event::Eof => {
                    return Err(TmxError::InvalidFormat(
                        "Not valid TMX: unexpected end of document inside <header>".to_string(),
                    ));
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(properties)
    }
}

impl FromStr for TmxDocument {
    type Err = TmxError;

    fn from_str(s: &str) -> Result<TmxDocument> {
        TmxDocument::parse_str(s)
    }
}

impl fmt::Display for TmxDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "TMX Document")?;
        writeln!(f, "Header attributes: {}", self.attributes.len())?;
        writeln!(f, "Header properties: {}", self.properties.len())?;
        writeln!(f, "Translation units: {}", self.units.len())?;
        Ok(())
    }
}
