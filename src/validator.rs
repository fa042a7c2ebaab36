//! Проверки отдельных полей записи.
//!
//! Каждая проверка возвращает список нарушений; пустой список означает, что поле
//! корректно. Ошибку ([`ParseError`]) возвращают только преобразования строки в
//! типизированное значение: [`parse_birth_date`] и [`parse_hand`].

use std::sync::LazyLock;

use chrono::{Months, NaiveDate};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{ParseError, Violation};
use crate::types::{DATE_FORMAT, Hand, Player};

pub const MIN_HEIGHT: i32 = 140;
pub const MAX_HEIGHT: i32 = 230;
pub const MIN_WEIGHT: i32 = 40;
pub const MAX_WEIGHT: i32 = 150;
pub const MIN_POINTS: i32 = 0;
pub const MAX_POINTS: i32 = 20000;
pub const MIN_AGE_YEARS: u32 = 16;
pub const MAX_AGE_YEARS: u32 = 60;

const MIN_TEXT_LEN: usize = 2;
const MAX_NAME_LEN: usize = 100;
const MAX_COUNTRY_LEN: usize = 50;

static TEXT_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-ZÀ-ÿñÑ\s'-]+$").expect("static regex must compile")
});

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex must compile"));

/// Проверяет все семь смысловых полей записи и собирает нарушения по порядку.
pub fn validate(player: &Player, today: NaiveDate) -> Vec<Violation> {
    let mut violations = Vec::new();
    violations.extend(validate_name(&player.name));
    violations.extend(validate_country(&player.country));
    violations.extend(validate_height(player.height));
    violations.extend(validate_weight(player.weight));
    violations.extend(validate_points(player.points));
    violations.extend(validate_birth_date(player.birth_date, today));

    if violations.is_empty() {
        debug!(name = %player.name, "player is valid");
    } else {
        warn!(name = %player.name, count = violations.len(), "player is invalid");
    }
    violations
}

struct TextRule {
    max_len: usize,
    empty: Violation,
    too_short: Violation,
    too_long: Violation,
    charset: Violation,
}

fn validate_text(value: &str, rule: TextRule) -> Vec<Violation> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    let violation = if trimmed.is_empty() {
        Some(rule.empty)
    } else if len < MIN_TEXT_LEN {
        Some(rule.too_short)
    } else if len > rule.max_len {
        Some(rule.too_long)
    } else if !TEXT_CHARSET.is_match(value) {
        Some(rule.charset)
    } else {
        None
    };
    violation.into_iter().collect()
}

pub fn validate_name(name: &str) -> Vec<Violation> {
    validate_text(
        name,
        TextRule {
            max_len: MAX_NAME_LEN,
            empty: Violation::NameEmpty,
            too_short: Violation::NameTooShort,
            too_long: Violation::NameTooLong,
            charset: Violation::NameCharset,
        },
    )
}

pub fn validate_country(country: &str) -> Vec<Violation> {
    validate_text(
        country,
        TextRule {
            max_len: MAX_COUNTRY_LEN,
            empty: Violation::CountryEmpty,
            too_short: Violation::CountryTooShort,
            too_long: Violation::CountryTooLong,
            charset: Violation::CountryCharset,
        },
    )
}

pub fn validate_height(height: i32) -> Vec<Violation> {
    if (MIN_HEIGHT..=MAX_HEIGHT).contains(&height) {
        return Vec::new();
    }
    vec![Violation::HeightOutOfRange {
        value: height,
        min: MIN_HEIGHT,
        max: MAX_HEIGHT,
    }]
}

pub fn validate_weight(weight: i32) -> Vec<Violation> {
    if (MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
        return Vec::new();
    }
    vec![Violation::WeightOutOfRange {
        value: weight,
        min: MIN_WEIGHT,
        max: MAX_WEIGHT,
    }]
}

pub fn validate_points(points: i32) -> Vec<Violation> {
    if points < MIN_POINTS {
        vec![Violation::PointsNegative]
    } else if points > MAX_POINTS {
        vec![Violation::PointsTooHigh { max: MAX_POINTS }]
    } else {
        Vec::new()
    }
}

/// Возраст должен быть от 16 до 60 лет относительно `today` (обе границы включительно).
pub fn validate_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Vec<Violation> {
    let oldest = today
        .checked_sub_months(Months::new(MAX_AGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN);
    let youngest = today
        .checked_sub_months(Months::new(MIN_AGE_YEARS * 12))
        .unwrap_or(today);

    if birth_date < oldest {
        vec![Violation::TooOld { max: MAX_AGE_YEARS }]
    } else if birth_date > youngest {
        vec![Violation::TooYoung { min: MIN_AGE_YEARS }]
    } else {
        Vec::new()
    }
}

/// Преобразует строку вида `YYYY-MM-DD` в дату.
pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, ParseError> {
    let raw = raw.trim();
    if !DATE_SHAPE.is_match(raw) {
        return Err(ParseError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ParseError::InvalidDate(raw.to_string()))
}

/// Преобразует одно из допустимых написаний руки в [`Hand`].
pub fn parse_hand(raw: &str) -> Result<Hand, ParseError> {
    raw.parse()
}
