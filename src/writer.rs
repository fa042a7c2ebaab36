//! Модуль верхнего уровня для выгрузки записей.
//!
//! Предоставляет единый интерфейс для всех форматов через функции [`dump`] и
//! [`export`]; формат файла выбирается по его расширению.

use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use tracing::info;

use crate::error::DumpError;
use crate::types::{Player, SupportedFileFormat};

/// Трейт, который реализует каждый формат выгрузки.
pub(crate) trait Writer {
    /// Записывает все записи в поток, сохраняя их порядок.
    fn dump(writer: &mut impl io::Write, players: &[Player]) -> Result<(), DumpError>;
}

pub(crate) struct CsvWriter;
pub(crate) struct XmlWriter;
pub(crate) struct JsonWriter;

impl Writer for CsvWriter {
    fn dump(writer: &mut impl io::Write, players: &[Player]) -> Result<(), DumpError> {
        crate::csv_format::dump_as_csv(writer, players)
    }
}

impl Writer for XmlWriter {
    fn dump(writer: &mut impl io::Write, players: &[Player]) -> Result<(), DumpError> {
        crate::xml_format::dump_as_xml(writer, players)
    }
}

impl Writer for JsonWriter {
    fn dump(writer: &mut impl io::Write, players: &[Player]) -> Result<(), DumpError> {
        crate::json_format::dump_as_json(writer, players)
    }
}

/// Записывает записи в предоставленный поток в указанном формате.
///
/// # Пример
///
/// ```rust
/// use torneo_tenis::{dump, types::SupportedFileFormat};
///
/// let mut buffer = Vec::new();
/// dump(&mut buffer, SupportedFileFormat::Csv, &[]).expect("Ошибка записи");
///
/// let result_string = String::from_utf8(buffer).expect("Невалидный UTF-8");
/// assert!(result_string.starts_with("id,nombre,pais"));
/// ```
pub fn dump(
    writer: &mut impl io::Write,
    format: SupportedFileFormat,
    players: &[Player],
) -> Result<(), DumpError> {
    match format {
        SupportedFileFormat::Csv => CsvWriter::dump(writer, players),
        SupportedFileFormat::Xml => XmlWriter::dump(writer, players),
        SupportedFileFormat::Json => JsonWriter::dump(writer, players),
    }
}

/// Создаёт (или перезаписывает) файл `path` и выгружает в него записи.
///
/// Формат определяется расширением: `csv`, `xml` или `json`; для любого другого
/// расширения используется JSON.
///
/// # Ошибки
///
/// Возвращает [`DumpError::Target`], если файл нельзя открыть на запись, и
/// [`DumpError::Output`] при ошибке записи.
pub fn export(path: &Path, players: &[Player]) -> Result<SupportedFileFormat, DumpError> {
    let format = SupportedFileFormat::from_path(path);
    info!(path = %path.display(), ?format, count = players.len(), "writing output file");

    let file = fs::File::create(path).map_err(|source| DumpError::Target {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = io::BufWriter::new(file);
    dump(&mut out, format, players)?;
    out.flush()?;

    info!(path = %path.display(), "output file written");
    Ok(format)
}
