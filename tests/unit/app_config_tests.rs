/*!
 * Tests for application configuration functionality
 */

use std::fs;
use anyhow::Result;
use log::LevelFilter;
use tmxalign::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "th");
    assert!(config.backup_on_save);
    assert_eq!(config.history_limit, 1000);
    assert_eq!(config.writer.creation_tool, "tmxalign");
    assert_eq!(config.writer.segtype, "sentence");
    assert_eq!(config.writer.adminlang, "en");
    assert_eq!(config.writer.datatype, "plaintext");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.source_language = "english".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en-us".to_string();
    assert!(config.validate().is_ok());

    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "TH".to_string();
    assert!(config.validate().is_err());
    config.target_language = "th".to_string();

    config.writer.segtype = " ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_load_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "config.json",
        r#"{ "target_language": "ja", "backup_on_save": false, "writer": { "creation_tool": "Aligner" }, "log_level": "debug" }"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "ja");
    assert!(!config.backup_on_save);
    assert_eq!(config.writer.creation_tool, "Aligner");
    assert_eq!(config.writer.datatype, "plaintext");
    assert_eq!(config.log_level.to_level_filter(), LevelFilter::Debug);
    Ok(())
}

#[test]
fn test_saveThenLoad_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("settings").join("config.json");

    let mut config = Config::default();
    config.history_limit = 0;
    config.log_level = LogLevel::Trace;
    config.save(&path)?;

    assert_eq!(Config::load(&path)?, config);
    assert!(fs::read_to_string(&path)?.contains("\"history_limit\": 0"));
    Ok(())
}

#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "config.json", "{ not json")?;
    assert!(Config::load(&path).is_err());
    assert_eq!(Config::load_or_default(temp_dir.path().join("absent.json"))?, Config::default());
    Ok(())
}
