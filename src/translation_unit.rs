/*!
 * Translation unit model: one `<tu>` element of a TMX document.
 *
 * A unit carries the element's attributes, its custom `<prop>` properties,
 * a positional language pair and the plain-text source/target segments.
 */

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::io::Write;

use log::warn;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{Result, TmxError};
use crate::xml_utils;

/// Source/target language codes of a translation unit, read positionally
/// from the `xml:lang` attribute of the first and second `<tuv>` children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Language code of the first `<tuv>` (e.g. "en")
    pub source: String,

    /// Language code of the second `<tuv>` (e.g. "zh-CN")
    pub target: String,
}

impl LanguagePair {
    /// Create a new language pair
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        LanguagePair {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A single translation unit: one source/target segment pair plus metadata.
///
/// Well-formed documents carry four canonical attributes (`creationdate`,
/// `creationid`, `changedate`, `changeid`); any additional attributes are
/// preserved verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Attributes copied verbatim from the `<tu>` element
    pub attributes: BTreeMap<String, String>,

    /// Custom properties from the unit's direct `<prop>` children
    pub properties: BTreeMap<String, String>,

    /// Language codes of the two `<tuv>` children, in document order
    pub language_pair: LanguagePair,

    /// Plain-text content of the first `<seg>`
    pub source: String,

    /// Plain-text content of the second `<seg>`
    pub target: String,
}

impl TranslationUnit {
    /// Create a unit from source and target text, for documents authored
    /// programmatically. No validation is performed on this path.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        TranslationUnit {
            attributes: BTreeMap::new(),
            properties: BTreeMap::new(),
            language_pair: LanguagePair::default(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Set the language pair
    pub fn with_language_pair(mut self, language_pair: LanguagePair) -> Self {
        self.language_pair = language_pair;
        self
    }

    /// Set the unit attributes
    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the unit properties
    pub fn with_properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// Parse a standalone `<tu>` XML fragment.
    ///
    /// The fragment's root tag must be literally `tu` and it must contain at
    /// least two `<tuv>` children, otherwise `InvalidFormat` is returned.
    pub fn parse_str(xml: &str) -> Result<TranslationUnit> {
        let mut reader = Reader::from_reader(xml.as_bytes());
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf).map_err(TmxError::xml)? {
                Event::Start(e) => {
                    if e.name().as_ref() != b"tu" {
                        return Err(Self::not_valid(e.name().as_ref()));
                    }
                    let attributes = xml_utils::attribute_map(&e)?;
                    return Self::read_from_events(&mut reader, attributes);
                }
                Event::Empty(e) => {
                    // An empty element can never hold the two required <tuv> children
                    return Err(Self::not_valid(e.name().as_ref()));
                }
                Event::Eof => {
                    return Err(TmxError::InvalidFormat(
                        "Not valid Translation Unit: no element found".to_string(),
                    ));
                }
                _ => {}
            }
            buf.clear();
        }
    }

    /// Read a unit from the event stream. The caller has just consumed the
    /// `<tu>` start event and extracted its attributes; this consumes events
    /// up to and including the matching end tag.
    pub(crate) fn read_from_events(
        reader: &mut Reader<&[u8]>,
        attributes: BTreeMap<String, String>,
    ) -> Result<TranslationUnit> {
        let mut properties = BTreeMap::new();
        let mut variants: Vec<(String, String)> = Vec::new();
        let mut depth = 0usize;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf).map_err(TmxError::xml)? {
                Event::Start(e) if depth == 0 => match e.name().as_ref() {
                    b"prop" => {
                        let prop_type = xml_utils::attribute_value(&e, b"type")?;
                        let text = xml_utils::read_element_text(reader)?;
                        match prop_type {
                            Some(t) => {
                                properties.insert(t, text);
                            }
                            None => warn!("skipping <prop> without a type attribute"),
                        }
                    }
                    b"tuv" => {
                        let lang = xml_utils::attribute_value(&e, b"xml:lang")?.ok_or_else(|| {
                            TmxError::InvalidFormat(
                                "Not valid Translation Unit: <tuv> without xml:lang".to_string(),
                            )
                        })?;
                        let segment = Self::read_tuv_segment(reader)?;
                        variants.push((lang, segment));
                    }
                    _ => depth += 1,
                },
                Event::Empty(e) if depth == 0 => match e.name().as_ref() {
                    b"prop" => {
                        match xml_utils::attribute_value(&e, b"type")? {
                            Some(t) => {
                                properties.insert(t, String::new());
                            }
                            None => warn!("skipping <prop> without a type attribute"),
                        }
                    }
                    b"tuv" => {
                        let lang = xml_utils::attribute_value(&e, b"xml:lang")?.ok_or_else(|| {
                            TmxError::InvalidFormat(
                                "Not valid Translation Unit: <tuv> without xml:lang".to_string(),
                            )
                        })?;
                        variants.push((lang, String::new()));
                    }
                    _ => {}
                },
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Event::Eof => {
                    return Err(TmxError::InvalidFormat(
                        "Not valid Translation Unit: unexpected end of document inside <tu>"
                            .to_string(),
                    ));
                }
                _ => {}
            }
            buf.clear();
        }

        if variants.len() < 2 {
            return Err(TmxError::InvalidFormat(format!(
                "Not valid Translation Unit: <tu> has {} <tuv> children, expected at least 2",
                variants.len()
            )));
        }
        if variants.len() > 2 {
            warn!(
                "<tu> has {} <tuv> children, only the first two (source, target) are used",
                variants.len()
            );
        }

        let mut variants = variants.into_iter();
        let (source_lang, source) = variants.next().unwrap_or_default();
        let (target_lang, target) = variants.next().unwrap_or_default();

        Ok(TranslationUnit {
            attributes,
            properties,
            language_pair: LanguagePair::new(source_lang, target_lang),
            source,
            target,
        })
    }

    /// Consume one `<tuv>` subtree, returning the text of its first `<seg>`
    /// child. Inline sub-markup inside the segment is flattened to text;
    /// `<prop>` children of the variant are skipped.
    fn read_tuv_segment(reader: &mut Reader<&[u8]>) -> Result<String> {
        let mut segment: Option<String> = None;
        let mut depth = 0usize;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf).map_err(TmxError::xml)? {
                Event::Start(e) if depth == 0 && e.name().as_ref() == b"seg" && segment.is_none() => {
                    segment = Some(xml_utils::read_element_text(reader)?);
                }
                Event::Start(_) => depth += 1,
                Event::Empty(e) if depth == 0 && e.name().as_ref() == b"seg" && segment.is_none() => {
                    segment = Some(String::new());
                }
                Event::End(_) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Event::Eof => {
                    return Err(TmxError::InvalidFormat(
                        "Not valid Translation Unit: unexpected end of document inside <tuv>"
                            .to_string(),
                    ));
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(segment.unwrap_or_default())
    }

    /// Serialize the unit as a standalone `<tu>` XML fragment.
    ///
    /// Children are written as properties first (in property-map order),
    /// then the two `<tuv>` elements, source before target.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_xml(&mut writer)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    /// Write the unit's `<tu>` element into an open XML writer
    pub(crate) fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut tu = BytesStart::new("tu");
        for (key, value) in &self.attributes {
            tu.push_attribute((key.as_str(), value.as_str()));
        }
        writer.write_event(Event::Start(tu)).map_err(TmxError::xml)?;

        for (prop_type, value) in &self.properties {
            xml_utils::write_prop(writer, prop_type, value)?;
        }

        Self::write_tuv(writer, &self.language_pair.source, &self.source)?;
        Self::write_tuv(writer, &self.language_pair.target, &self.target)?;

        writer
            .write_event(Event::End(BytesEnd::new("tu")))
            .map_err(TmxError::xml)?;
        Ok(())
    }

    /// Write one `<tuv xml:lang="..."><seg>text</seg></tuv>` element. The
    /// segment goes in as a text node so raw markup in the text cannot be
    /// misinterpreted as nested elements.
    fn write_tuv<W: Write>(writer: &mut Writer<W>, lang: &str, text: &str) -> Result<()> {
        let mut tuv = BytesStart::new("tuv");
        tuv.push_attribute(("xml:lang", lang));
        writer
            .write_event(Event::Start(tuv))
            .map_err(TmxError::xml)?;

        writer
            .write_event(Event::Start(BytesStart::new("seg")))
            .map_err(TmxError::xml)?;
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(TmxError::xml)?;
        writer
            .write_event(Event::End(BytesEnd::new("seg")))
            .map_err(TmxError::xml)?;

        writer
            .write_event(Event::End(BytesEnd::new("tuv")))
            .map_err(TmxError::xml)?;
        Ok(())
    }

    /// SHA-256 hex digest of the UTF-8 bytes of the source segment.
    ///
    /// Stable across calls on identical input; used for equality and as a
    /// deduplication key.
    pub fn source_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Set both `creationid` and `changeid` to the given identifier, leaving
    /// `creationdate`/`changedate` untouched. Returns the unit for chaining.
    pub fn change_identifier(&mut self, new_id: &str) -> &mut Self {
        self.attributes
            .insert("creationid".to_string(), new_id.to_string());
        self.attributes
            .insert("changeid".to_string(), new_id.to_string());
        self
    }

    fn not_valid(tag: &[u8]) -> TmxError {
        TmxError::InvalidFormat(format!(
            "Not valid Translation Unit: <{}>",
            String::from_utf8_lossy(tag)
        ))
    }
}

/// Equality is content identity on the source segment ONLY: two units with
/// identical source text but different targets, attributes or properties
/// compare equal. This is deliberate, for repetition detection and dedup;
/// it is NOT structural equality.
impl PartialEq for TranslationUnit {
    fn eq(&self, other: &Self) -> bool {
        self.source_hash() == other.source_hash()
    }
}

impl Eq for TranslationUnit {}

impl Hash for TranslationUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}
