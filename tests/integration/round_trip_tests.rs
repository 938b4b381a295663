/*!
 * Integration tests for loading and saving TMX files without loss
 */

use std::fs;
use anyhow::Result;

use tmxalign::{parse_tmx, write_tmx, AlignmentDocument, Column};
use crate::common;

fn cell_texts(document: &AlignmentDocument) -> Vec<(String, String)> {
    document
        .rows()
        .iter()
        .map(|row| (row.source().to_string(), row.target().to_string()))
        .collect()
}

/// Every fixture should load, save and load again with identical cells
#[test]
fn test_roundTrip_withEveryWellFormedFixture_shouldKeepCells() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;

    for name in ["small.tmx", "realistic.tmx", "inline.tmx"] {
        let original = parse_tmx(common::test_resource_path(name))?;
        let out = temp_dir.path().join(name);
        write_tmx(&original, &out, false)?;

        let reloaded = parse_tmx(&out)?;
        assert_eq!(cell_texts(&reloaded), cell_texts(&original), "cells changed in {}", name);
        assert_eq!(reloaded.source_lang(), original.source_lang(), "source language changed in {}", name);
        assert_eq!(reloaded.target_lang(), original.target_lang(), "target language changed in {}", name);
    }
    Ok(())
}

/// Saving a saved file again should not change a single byte
#[test]
fn test_roundTrip_savedTwice_shouldBeStable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let first = temp_dir.path().join("first.tmx");
    let second = temp_dir.path().join("second.tmx");

    write_tmx(&parse_tmx(common::test_resource_path("realistic.tmx"))?, &first, false)?;
    write_tmx(&parse_tmx(&first)?, &second, false)?;

    assert_eq!(fs::read_to_string(&first)?, fs::read_to_string(&second)?);
    Ok(())
}

/// Edits to one row must not disturb what the other rows carry
#[test]
fn test_roundTrip_afterEditingOneRow_shouldPreserveOtherRecords() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut document = parse_tmx(common::test_resource_path("realistic.tmx"))?;
    document.set_cell(3, Column::Target, "ตั้งค่า")?;

    let out = temp_dir.path().join("edited.tmx");
    write_tmx(&document, &out, false)?;
    let written = fs::read_to_string(&out)?;

    // Untouched records keep their metadata and extra languages
    assert!(written.contains(r#"<tu tuid="101" creationdate="20240110T120000Z" changeid="translator1">"#));
    assert!(written.contains("<note>Second sentence drifted into its own unit</note>"));
    assert!(written.contains("<seg>ファイルを開きます。</seg>"));
    assert!(written.contains("<seg>Click &lt;Cancel&gt; to stop &amp; exit.</seg>"));
    assert!(written.contains(r#"<prop type="x-Domain">Software</prop>"#));

    // The edited record keeps its id and language tags
    assert!(written.contains(r#"<tu tuid="104">"#));
    assert!(written.contains("<seg>ตั้งค่า</seg>"));
    assert!(!written.contains("การตั้งค่า"));

    let reloaded = parse_tmx(&out)?;
    assert_eq!(reloaded.get_cell(3, Column::Target)?, "ตั้งค่า");
    assert_eq!(reloaded.get_cell(3, Column::Source)?, "Settings");
    Ok(())
}

/// Variant language tags are matched case-insensitively on write
#[test]
fn test_roundTrip_withUppercaseLanguageTags_shouldReplaceExistingVariant() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut document = parse_tmx(common::test_resource_path("realistic.tmx"))?;
    document.set_cell(1, Column::Source, "Then save it.")?;

    let out = temp_dir.path().join("filled.tmx");
    write_tmx(&document, &out, false)?;
    let written = fs::read_to_string(&out)?;

    assert_eq!(written.matches(r#"<tuv xml:lang="EN-US">"#).count(), 4);
    assert!(written.contains("<seg>Then save it.</seg>"));
    Ok(())
}
