/*!
 * Tests for error types and conversions
 */

use std::io;
use tmxalign::errors::{AppError, DocumentError, SessionError, TmxError};

#[test]
fn test_documentError_rowOutOfRange_shouldDisplayRowAndLength() {
    let error = DocumentError::RowOutOfRange { row: 7, len: 3 };
    let display = format!("{}", error);
    assert!(display.contains('7'));
    assert!(display.contains('3'));
}

#[test]
fn test_documentError_invalidTransition_shouldNameCommandAndState() {
    let error = DocumentError::InvalidTransition {
        command: "Split".to_string(),
        action: "undo",
        state: "constructed",
    };
    let display = format!("{}", error);
    assert!(display.contains("Split"));
    assert!(display.contains("undo"));
    assert!(display.contains("constructed"));
}

#[test]
fn test_tmxError_malformedInput_shouldIncludePosition() {
    let error = TmxError::MalformedInput {
        position: 42,
        message: "mismatched tag".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("42"));
    assert!(display.contains("mismatched tag"));
}

#[test]
fn test_tmxError_fromIoError_shouldConvert() {
    let error: TmxError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(error, TmxError::Io(_)));
}

#[test]
fn test_sessionError_fromDocumentError_shouldWrap() {
    let error: SessionError = DocumentError::InvalidColumn(5).into();
    assert!(matches!(error, SessionError::Document(DocumentError::InvalidColumn(5))));
    assert!(format!("{}", error).contains('5'));
}

#[test]
fn test_sessionError_splitPositionOutOfBounds_shouldDisplayBounds() {
    let error = SessionError::SplitPositionOutOfBounds { pos: 9, len: 4 };
    let display = format!("{}", error);
    assert!(display.contains('9'));
    assert!(display.contains('4'));
}

#[test]
fn test_appError_conversions_shouldMapToVariants() {
    let from_tmx: AppError = TmxError::Structural("no body".to_string()).into();
    assert!(matches!(from_tmx, AppError::Tmx(_)));

    let from_session: AppError = SessionError::NoFilePath.into();
    assert!(matches!(from_session, AppError::Session(_)));

    let from_io: AppError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(from_anyhow, AppError::Unknown(ref message) if message == "something odd"));
}
