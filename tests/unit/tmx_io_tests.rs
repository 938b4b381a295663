/*!
 * Tests for reading and writing TMX files
 */

use std::fs;
use anyhow::Result;
use tmxalign::document::Column;
use tmxalign::errors::TmxError;
use tmxalign::tmx::{parse_tmx, parse_tmx_bytes, write_tmx, HeaderDefaults, TmxWriter};
use crate::common;

#[test]
fn test_parseTmx_withSmallFixture_shouldLoadRowsAndPath() -> Result<()> {
    common::init_logging();
    let path = common::test_resource_path("small.tmx");
    let document = parse_tmx(&path)?;

    assert_eq!(document.row_count(), 3);
    assert_eq!(document.source_lang(), "en");
    assert_eq!(document.target_lang(), "th");
    assert_eq!(document.get_cell(0, Column::Source)?, "Hello world");
    assert_eq!(document.get_cell(2, Column::Target)?, "ขอบคุณ");
    assert_eq!(document.file_path.as_deref(), Some(path.as_path()));
    assert!(document.header.attributes.iter().any(|(key, value)| key == "creationtool" && value == "TestTool"));
    Ok(())
}

#[test]
fn test_parseTmx_withRealisticFixture_shouldCarryExtraLanguages() -> Result<()> {
    let document = parse_tmx(common::test_resource_path("realistic.tmx"))?;

    assert_eq!(document.source_lang(), "en-us");
    assert_eq!(document.target_lang(), "th-th");
    assert_eq!(document.get_cell(1, Column::Source)?, "");
    assert_eq!(document.get_cell(2, Column::Source)?, "Click <Cancel> to stop & exit.");

    let extras = document.row(0)?.extra_translations();
    assert_eq!(extras.len(), 1);
    assert_eq!(extras[0].language().as_deref(), Some("ja-jp"));
    assert_eq!(extras[0].segment_text(), "ファイルを開きます。");
    assert_eq!(document.stats().rows_with_extras, 1);
    Ok(())
}

#[test]
fn test_parseTmx_withInlineMarkup_shouldExposePlainText() -> Result<()> {
    let document = parse_tmx(common::test_resource_path("inline.tmx"))?;

    assert_eq!(document.get_cell(0, Column::Source)?, "Press <b>Save</b> now");
    assert_eq!(document.get_cell(1, Column::Source)?, "Line oneline two");
    assert_eq!(document.get_cell(1, Column::Target)?, "บรรทัดที่ <หนึ่ง>");
    Ok(())
}

#[test]
fn test_parseTmx_withMalformedFixture_shouldReportPosition() {
    let result = parse_tmx(common::test_resource_path("malformed.tmx"));
    match result {
        Err(TmxError::MalformedInput { position, .. }) => assert!(position > 0),
        other => panic!("expected malformed input error, got {:?}", other),
    }
}

#[test]
fn test_parseTmx_withUtf16Fixture_shouldDecodeText() -> Result<()> {
    let document = parse_tmx(common::test_resource_path("utf16le.tmx"))?;

    assert_eq!(document.row_count(), 2);
    assert_eq!(document.source_lang(), "en-us");
    assert_eq!(document.target_lang(), "th-th");
    assert_eq!(document.get_cell(0, Column::Target)?, "บันทึกไฟล์");
    assert_eq!(document.get_cell(1, Column::Source)?, "Café menu");
    Ok(())
}

#[test]
fn test_parseTmx_withLatin1Fixture_shouldDecodeText() -> Result<()> {
    let document = parse_tmx(common::test_resource_path("latin1.tmx"))?;

    assert_eq!(document.target_lang(), "fr");
    assert_eq!(document.get_cell(0, Column::Target)?, "Café");
    assert_eq!(document.get_cell(1, Column::Target)?, "Été & hiver");
    Ok(())
}

#[test]
fn test_writeTmx_withLatin1Source_shouldSaveAsUtf8() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let document = parse_tmx(common::test_resource_path("latin1.tmx"))?;
    let out = temp_dir.path().join("latin1-out.tmx");

    write_tmx(&document, &out, false)?;
    let written = fs::read_to_string(&out)?;

    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(written.contains("<seg>Café</seg>"));
    assert_eq!(parse_tmx(&out)?.get_cell(1, Column::Target)?, "Été & hiver");
    Ok(())
}

#[test]
fn test_parseTmxBytes_withInvalidUtf8_shouldBeMalformed() {
    let result = parse_tmx_bytes(b"<tmx version=\"1.4\"><body><tu><tuv xml:lang=\"en\"><seg>Caf\xE9</seg></tuv></tu></body></tmx>");
    assert!(matches!(result, Err(TmxError::MalformedInput { .. })));
}

#[test]
fn test_parseTmx_withMissingFile_shouldReturnIoError() {
    let result = parse_tmx(common::test_resource_path("does-not-exist.tmx"));
    assert!(matches!(result, Err(TmxError::Io(_))));
}

#[test]
fn test_parseTmxBytes_withWrongRootOrNoBody_shouldBeStructuralError() {
    let wrong_root = parse_tmx_bytes(b"<xliff version=\"1.2\"><file/></xliff>");
    assert!(matches!(wrong_root, Err(TmxError::Structural(_))));

    let no_body = parse_tmx_bytes(b"<tmx version=\"1.4\"><header srclang=\"en\"/></tmx>");
    assert!(matches!(no_body, Err(TmxError::Structural(_))));
}

#[test]
fn test_parseTmxBytes_withEmptyBody_shouldReturnEmptyDocumentWithFallbackLanguages() -> Result<()> {
    let document = parse_tmx_bytes(b"<tmx version=\"1.4\"><header/><body/></tmx>")?;
    assert!(document.is_empty());
    assert_eq!(document.source_lang(), "en");
    assert_eq!(document.target_lang(), "th");
    Ok(())
}

#[test]
fn test_parseTmxBytes_withSingleLanguage_shouldReportUnknownTarget() -> Result<()> {
    let xml = br#"<tmx version="1.4"><body><tu><tuv xml:lang="de"><seg>Hallo</seg></tuv></tu></body></tmx>"#;
    let document = parse_tmx_bytes(xml)?;
    assert_eq!(document.source_lang(), "de");
    assert_eq!(document.target_lang(), "unknown");
    assert_eq!(document.get_cell(0, Column::Source)?, "Hallo");
    Ok(())
}

#[test]
fn test_writeTmx_withUnmodifiedDocument_shouldRoundTripCells() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = parse_tmx(common::test_resource_path("realistic.tmx"))?;
    let out = temp_dir.path().join("out.tmx");

    write_tmx(&original, &out, false)?;
    let reloaded = parse_tmx(&out)?;

    assert_eq!(reloaded.row_count(), original.row_count());
    assert_eq!(reloaded.source_lang(), original.source_lang());
    assert_eq!(reloaded.target_lang(), original.target_lang());
    for (before, after) in original.rows().iter().zip(reloaded.rows()) {
        assert_eq!(before.source(), after.source());
        assert_eq!(before.target(), after.target());
        let languages = |row: &tmxalign::AlignmentRow| {
            row.extra_translations()
                .iter()
                .map(|extra| (extra.language(), extra.segment_text()))
                .collect::<Vec<_>>()
        };
        assert_eq!(languages(before), languages(after));
    }

    let written = fs::read_to_string(&out)?;
    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(written.contains("<tmx version=\"1.4\">"));
    assert!(written.contains("<prop type=\"x-Context\">menu</prop>"));
    assert!(written.contains("<note>Reviewed by the localization team</note>"));
    assert!(written.contains("tuid=\"101\" creationdate=\"20240110T120000Z\" changeid=\"translator1\""));
    Ok(())
}

#[test]
fn test_writeTmx_withInlineMarkup_shouldKeepUntouchedSegments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut document = parse_tmx(common::test_resource_path("inline.tmx"))?;
    document.set_cell(0, Column::Target, "กดบันทึกตอนนี้")?;
    let out = temp_dir.path().join("inline-out.tmx");

    write_tmx(&document, &out, false)?;
    let written = fs::read_to_string(&out)?;

    assert!(written.contains(
        r#"<seg>Press <bpt i="1">&lt;b&gt;</bpt>Save<ept i="1">&lt;/b&gt;</ept> now</seg>"#
    ));
    assert!(written.contains("<seg>กดบันทึกตอนนี้</seg>"));
    assert!(written.contains(r#"<seg>Line one<ph x="1"/>line two</seg>"#));
    assert!(written.contains("<![CDATA[บรรทัดที่ <หนึ่ง>]]>"));
    Ok(())
}

#[test]
fn test_writeTmx_withNewRow_shouldSynthesizePlainUnit() -> Result<()> {
    let mut document = parse_tmx(common::test_resource_path("small.tmx"))?;
    document.insert_row(1, tmxalign::AlignmentRow::new("Inserted & new", ""))?;

    let xml = String::from_utf8(TmxWriter::new().to_bytes(&document))?;
    assert!(xml.contains("<seg>Inserted &amp; new</seg>"));

    let reparsed = parse_tmx_bytes(xml.as_bytes())?;
    assert_eq!(reparsed.row_count(), 4);
    assert_eq!(reparsed.get_cell(1, Column::Source)?, "Inserted & new");
    assert_eq!(reparsed.get_cell(1, Column::Target)?, "");
    Ok(())
}

#[test]
fn test_writeTmx_withExistingDestination_shouldCreateBackup() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::copy_fixture(temp_dir.path(), "small.tmx")?;
    let before = fs::read_to_string(&path)?;

    let mut document = parse_tmx(&path)?;
    document.set_cell(0, Column::Source, "Hi world")?;
    write_tmx(&document, &path, true)?;

    assert_eq!(fs::read_to_string(temp_dir.path().join("small.tmx.bak"))?, before);
    assert_eq!(parse_tmx(&path)?.get_cell(0, Column::Source)?, "Hi world");
    Ok(())
}

#[test]
fn test_tmxWriter_withoutHeaderRecord_shouldUseConfiguredDefaults() -> Result<()> {
    let document = parse_tmx_bytes(common::tmx_with_pairs("en", "fr", &[("Yes", "Oui")]).as_bytes())?;
    let mut headerless = tmxalign::AlignmentDocument::new(document.rows().to_vec(), "en", "fr");
    headerless.header.attributes.push(("o-encoding".to_string(), "UTF-8".to_string()));

    let defaults = HeaderDefaults {
        creation_tool: "Aligner".to_string(),
        datatype: "xml".to_string(),
        ..HeaderDefaults::default()
    };
    let xml = String::from_utf8(TmxWriter::with_header_defaults(defaults).to_bytes(&headerless))?;

    assert!(xml.contains(r#"<header o-encoding="UTF-8" creationtool="Aligner""#));
    assert!(xml.contains(r#"datatype="xml""#));
    assert!(xml.contains(r#"srclang="en""#));
    Ok(())
}
