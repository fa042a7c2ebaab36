use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ParseError;

/// Идентификатор записи; `0` означает, что запись ещё не сохранена.
pub type PlayerId = u64;

/// Формат даты рождения во всех форматах.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Формат отметок времени: микросекунды, ровно шесть знаков после точки.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Ведущая рука игрока.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Hand {
    Right,
    Left,
}

/// Допустимые написания руки во входных данных (без учёта регистра).
const HAND_ALIASES: &[(&str, Hand)] = &[
    ("DIESTRO", Hand::Right),
    ("DERECHA", Hand::Right),
    ("RIGHT", Hand::Right),
    ("ZURDO", Hand::Left),
    ("IZQUIERDA", Hand::Left),
    ("LEFT", Hand::Left),
];

impl FromStr for Hand {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        HAND_ALIASES
            .iter()
            .find(|(alias, _)| *alias == upper)
            .map(|(_, hand)| *hand)
            .ok_or_else(|| ParseError::InvalidHand(s.to_string()))
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Right => write!(f, "RIGHT"),
            Self::Left => write!(f, "LEFT"),
        }
    }
}

/// Запись о теннисисте.
///
/// Равенство и хеш определяются только идентификатором: две записи с одинаковым
/// `id` считаются одной и той же сущностью независимо от остальных полей.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "pais")]
    pub country: String,
    #[serde(rename = "altura")]
    pub height: i32,
    #[serde(rename = "peso")]
    pub weight: i32,
    #[serde(rename = "puntos")]
    pub points: i32,
    #[serde(rename = "mano")]
    pub hand: Hand,
    #[serde(rename = "fecha_nacimiento", with = "date_format")]
    pub birth_date: NaiveDate,
    #[serde(with = "timestamp_format")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp_format")]
    pub updated_at: NaiveDateTime,
}

impl Player {
    /// Обновляет отметку времени последнего изменения.
    pub fn touch(&mut self, now: NaiveDateTime) {
        self.updated_at = now;
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Ошибка разбора конкретной строки источника.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// Номер строки данных, начиная с 1 (первая строка после заголовка).
    pub line: usize,
    pub message: String,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Результат одной загрузки: принятые записи и ошибки, обе в порядке источника.
#[derive(Debug, Default, Clone)]
pub struct Ingestion {
    pub players: Vec<Player>,
    pub errors: Vec<LineError>,
}

/// Поддерживаемые форматы выгрузки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedFileFormat {
    Csv,
    Xml,
    Json,
}

impl SupportedFileFormat {
    /// Выбирает формат по расширению файла.
    ///
    /// Неизвестное или отсутствующее расширение даёт JSON (с предупреждением в лог).
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("csv") => Self::Csv,
            Some("xml") => Self::Xml,
            Some("json") => Self::Json,
            other => {
                warn!(
                    extension = other.unwrap_or(""),
                    "unrecognized output extension, falling back to JSON"
                );
                Self::Json
            }
        }
    }
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(de::Error::custom)
    }
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(de::Error::custom)
    }
}
