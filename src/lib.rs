/*!
 * # tmxio - Translation Memory eXchange reader/writer
 *
 * A Rust library for reading and writing TMX (Translation Memory eXchange)
 * documents, the XML vocabulary used to exchange translation memories
 * between CAT tools.
 *
 * ## Features
 *
 * - Parse TMX 1.4 documents from strings or files
 * - Header metadata and custom `<prop>` properties
 * - Translation units with language pairs, attributes and properties
 * - Serialize documents back to spec-conformant XML (UTF-8, XML declaration)
 * - Content-based unit identity (SHA-256 over the source segment) for
 *   repetition detection and deduplication
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `tmx_document`: whole-document model, parse/save/iterate
 * - `translation_unit`: single `<tu>` model, parse/serialize/hash
 * - `file_utils`: file system operations
 * - `errors`: custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod errors;
pub mod file_utils;
pub mod tmx_document;
pub mod translation_unit;

mod xml_utils;

// Re-export main types for easier usage
pub use errors::{Result, TmxError};
pub use file_utils::FileManager;
pub use tmx_document::TmxDocument;
pub use translation_unit::{LanguagePair, TranslationUnit};
