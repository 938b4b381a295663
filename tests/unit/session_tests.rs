/*!
 * Tests for editing sessions backed by files on disk
 */

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use anyhow::Result;
use tmxalign::errors::{SessionError, TmxError};
use tmxalign::file_utils::FileManager;
use tmxalign::session::REPLACE_ALL_LABEL;
use tmxalign::{parse_tmx, Column, Config, Direction, EditingSession, SessionEvent};
use crate::common;

fn record_events(session: &mut EditingSession) -> Rc<RefCell<Vec<SessionEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    session.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

#[test]
fn test_open_shouldStartCleanWithFileName() -> Result<()> {
    common::init_logging();
    let session = EditingSession::open(common::test_resource_path("small.tmx"), &Config::default())?;

    assert!(!session.is_dirty());
    assert!(!session.history().can_undo());
    assert_eq!(session.title(), "small.tmx");
    assert_eq!(session.status_line(), "small.tmx | 3 rows | en \u{2192} th");
    Ok(())
}

#[test]
fn test_open_withMalformedFile_shouldReturnTmxError() {
    let result = EditingSession::open(common::test_resource_path("malformed.tmx"), &Config::default());
    assert!(matches!(
        result,
        Err(SessionError::Tmx(TmxError::MalformedInput { .. }))
    ));
}

#[test]
fn test_save_shouldWriteBackupAndEmitSaved() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::copy_fixture(temp_dir.path(), "small.tmx")?;
    let original = fs::read_to_string(&path)?;

    let mut session = EditingSession::open(&path, &Config::default())?;
    let events = record_events(&mut session);

    session.edit_cell(0, Column::Source, "Hello, world")?;
    assert!(session.is_dirty());
    assert!(session.title().ends_with('\u{2022}'));

    let saved = session.save()?;
    assert_eq!(saved, path);
    assert!(!session.is_dirty());
    assert_eq!(fs::read_to_string(FileManager::backup_path(&path))?, original);
    assert_eq!(parse_tmx(&path)?.get_cell(0, Column::Source)?, "Hello, world");
    assert_eq!(
        *events.borrow(),
        vec![SessionEvent::Changed, SessionEvent::Saved(path.clone())]
    );
    Ok(())
}

#[test]
fn test_save_withBackupDisabled_shouldNotLeaveBakFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::copy_fixture(temp_dir.path(), "small.tmx")?;
    let config = Config {
        backup_on_save: false,
        ..Config::default()
    };

    let mut session = EditingSession::open(&path, &config)?;
    session.move_cell(0, Column::Target, Direction::Down)?;
    session.save()?;

    assert!(!FileManager::file_exists(FileManager::backup_path(&path)));
    assert_eq!(parse_tmx(&path)?.get_cell(1, Column::Target)?, "สวัสดีชาวโลก");
    Ok(())
}

#[test]
fn test_saveAs_shouldRetargetDocumentAndLeaveOriginal() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::copy_fixture(temp_dir.path(), "small.tmx")?;
    let original = fs::read_to_string(&source)?;
    let copy = temp_dir.path().join("nested").join("copy.tmx");

    let mut session = EditingSession::open(&source, &Config::default())?;
    session.split_cell(0, Column::Source, 5)?;
    session.save_as(&copy)?;

    assert_eq!(fs::read_to_string(&source)?, original);
    assert_eq!(session.display_name(), "copy.tmx");
    assert_eq!(session.document().file_path.as_deref(), Some(copy.as_path()));

    let reloaded = parse_tmx(&copy)?;
    assert_eq!(reloaded.row_count(), 4);
    assert_eq!(reloaded.get_cell(0, Column::Source)?, "Hello");
    assert_eq!(reloaded.get_cell(1, Column::Source)?, "world");
    Ok(())
}

#[test]
fn test_load_shouldClearHistoryAndEmitLoaded() -> Result<()> {
    let mut session = EditingSession::new(&Config::default());
    assert_eq!(session.display_name(), "Untitled");
    assert!(matches!(session.save(), Err(SessionError::NoFilePath)));

    let events = record_events(&mut session);
    session.load(common::test_resource_path("realistic.tmx"))?;
    session.edit_cell(3, Column::Target, "ตั้งค่า")?;
    session.load(common::test_resource_path("small.tmx"))?;

    assert!(!session.history().can_undo());
    assert!(!session.is_dirty());
    assert_eq!(
        *events.borrow(),
        vec![SessionEvent::Loaded, SessionEvent::Changed, SessionEvent::Loaded]
    );
    Ok(())
}

#[test]
fn test_replaceAll_overFile_shouldUndoAsOneStep() -> Result<()> {
    let mut session = EditingSession::open(common::test_resource_path("realistic.tmx"), &Config::default())?;
    let before: Vec<String> = session.document().rows().iter().map(|row| row.target().to_string()).collect();

    let count = session.replace_all("ก", "g", true)?;
    assert_eq!(count, 3);
    assert_eq!(session.history().undo_text(), Some(REPLACE_ALL_LABEL));
    assert_eq!(session.history().undo_count(), 1);

    assert!(session.undo()?);
    let after: Vec<String> = session.document().rows().iter().map(|row| row.target().to_string()).collect();
    assert_eq!(after, before);
    assert!(!session.is_dirty());
    Ok(())
}

#[test]
fn test_find_withSessionDocument_shouldHonourDirection() -> Result<()> {
    let session = EditingSession::open(common::test_resource_path("small.tmx"), &Config::default())?;
    let from = Some(tmxalign::CellRef::new(1, Column::Source));

    let forward = session.find("o", from, tmxalign::SearchDirection::Forward, true)?;
    assert_eq!(forward, Some(tmxalign::CellRef::new(2, Column::Source)));

    let backward = session.find("o", from, tmxalign::SearchDirection::Backward, true)?;
    assert_eq!(backward, Some(tmxalign::CellRef::new(0, Column::Source)));
    Ok(())
}
