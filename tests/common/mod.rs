/*!
 * Common test utilities for the tmxio test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

/// A small but complete TMX 1.4 document: 8 header attributes, 7 header
/// properties and one en -> zh-CN translation unit whose first variant also
/// carries a `<prop>` of its own.
pub const SAMPLE_TMX: &str = r#"<?xml version="1.0"?>
<!DOCTYPE tmx SYSTEM "tmx14.dtd">
<tmx version="1.4">
<header creationtool="MemoQ" creationtoolversion="7.0.70" segtype="sentence" adminlang="en-us" creationid="Karsten Weiss" srclang="en" o-tmf="MemoQTM" datatype="unknown">
  <prop type="defclient">Ooyala</prop>
  <prop type="defproject"> </prop>
  <prop type="defdomain">IT - Network &amp; Infrastructure</prop>
  <prop type="defsubject"> </prop>
  <prop type="description"> </prop>
  <prop type="targetlang">zh-CN</prop>
  <prop type="name">Ooyala_TestTranslation_EN2ZH-CN</prop>
</header>
<body>
  <tu changedate="20141017T092614Z" creationdate="20141016T091130Z" creationid="CN_Merlin_5" changeid="CN_Merlin_6">
    <prop type="client">Ooyala</prop>
    <prop type="project"> </prop>
    <prop type="domain"> </prop>
    <prop type="subject"> </prop>
    <prop type="corrected">no</prop>
    <prop type="aligned">no</prop>
    <prop type="x-document">backlot_integrate_with_tinypass.xml</prop>
    <tuv xml:lang="en">
      <prop type="x-context-post">&lt;seg&gt;Paywalls enable you to require payment.&lt;/seg&gt;</prop>
      <seg>Integrate with Tinypass</seg>
    </tuv>
    <tuv xml:lang="zh-CN">
      <seg>与 Tinypass 集成</seg>
    </tuv>
  </tu>
</body>
</tmx>"#;

/// A standalone `<tu>` fragment matching the unit inside SAMPLE_TMX, with
/// distinct creation/change identifiers.
pub const SAMPLE_TU: &str = r#"<tu changedate="20141017T092614Z" creationdate="20141016T091130Z" creationid="Foo" changeid="Bar">
  <prop type="client">Ooyala</prop>
  <prop type="project"> </prop>
  <prop type="domain"> </prop>
  <prop type="subject"> </prop>
  <prop type="corrected">no</prop>
  <prop type="aligned">no</prop>
  <prop type="x-document">backlot_integrate_with_tinypass.xml</prop>
  <tuv xml:lang="en">
    <prop type="x-context-post">&lt;seg&gt;Paywalls enable you to require payment.&lt;/seg&gt;</prop>
    <seg>Integrate with Tinypass</seg>
  </tuv>
  <tuv xml:lang="zh-CN">
    <seg>与 Tinypass 集成</seg>
  </tuv>
</tu>"#;

/// Dummy XML that is neither a TMX document nor a translation unit
pub const NOT_A_TMX: &str = "<a>Some dummy XML</a>";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample TMX file for testing
pub fn create_test_tmx(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_TMX)
}
