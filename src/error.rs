use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Нарушение правила проверки одного поля записи.
///
/// Текст сообщения берётся из [`std::fmt::Display`]; границы диапазонов включительные.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("name cannot be empty")]
    NameEmpty,
    #[error("name must have at least 2 characters")]
    NameTooShort,
    #[error("name cannot exceed 100 characters")]
    NameTooLong,
    #[error("name may only contain letters, spaces, apostrophes and hyphens")]
    NameCharset,
    #[error("country cannot be empty")]
    CountryEmpty,
    #[error("country must have at least 2 characters")]
    CountryTooShort,
    #[error("country cannot exceed 50 characters")]
    CountryTooLong,
    #[error("country may only contain letters, spaces, apostrophes and hyphens")]
    CountryCharset,
    #[error("height must be between {min} and {max} cm, got {value}")]
    HeightOutOfRange { value: i32, min: i32, max: i32 },
    #[error("weight must be between {min} and {max} kg, got {value}")]
    WeightOutOfRange { value: i32, min: i32, max: i32 },
    #[error("points cannot be negative")]
    PointsNegative,
    #[error("points cannot exceed {max}")]
    PointsTooHigh { max: i32 },
    #[error("player cannot be older than {max} years")]
    TooOld { max: u32 },
    #[error("player must be at least {min} years old")]
    TooYoung { min: u32 },
}

/// Ошибка разбора одной строки источника.
///
/// Такие ошибки не прерывают загрузку: конвейер превращает их в
/// [`crate::types::LineError`] и переходит к следующей строке.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("wrong field count: expected {expected}, got {actual}")]
    FieldCount { expected: usize, actual: usize },
    #[error("field '{field}' must be a valid integer: {value}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("invalid date format '{0}', use YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid hand '{0}', use DIESTRO/ZURDO, DERECHA/IZQUIERDA or RIGHT/LEFT")]
    InvalidHand(String),
    #[error("{}", join_violations(.0))]
    Invalid(Vec<Violation>),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ошибка, которая делает невозможной всю загрузку источника.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("empty source")]
    EmptySource,
    #[error("header must have exactly {expected} columns, got {actual}")]
    HeaderColumnCount { expected: usize, actual: usize },
    #[error("wrong header in column {column}: expected '{expected}', found '{found}'")]
    HeaderColumnName {
        column: usize,
        expected: &'static str,
        found: String,
    },
    #[error("source file does not exist: {0}")]
    NotFound(PathBuf),
    #[error("source is not a readable file: {0}")]
    NotAFile(PathBuf),
    #[error("source file must have a .csv extension: {0}")]
    Extension(PathBuf),
    #[error("cannot read source '{path}': {source}")]
    Unreadable { path: PathBuf, source: io::Error },
    #[error("malformed json document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Ошибка записи выходного файла.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("cannot open output file '{path}': {source}")]
    Target { path: PathBuf, source: io::Error },
    #[error("output error: {0}")]
    Output(#[from] io::Error),
    #[error("json encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ошибка конфигурации кэша.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("cache capacity must be greater than 0")]
    ZeroCapacity,
}

/// Ошибка хранилища записей.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("player with id {0} not found")]
    NotFound(u64),
}
