use std::io;

use serde::{Deserialize, Serialize};

use crate::error::{DumpError, IngestError};
use crate::types::Player;

#[derive(Serialize)]
struct Document<'a> {
    tenistas: &'a [Player],
}

#[derive(Deserialize)]
struct OwnedDocument {
    tenistas: Vec<Player>,
}

/// Сериализует записи в JSON-документ вида `{"tenistas": [...]}`.
///
/// Рука и даты записываются строками, отметки времени с точностью до микросекунд.
///
/// # Пример
///
/// ```rust
/// use torneo_tenis::dump_as_json;
///
/// let mut buffer = Vec::new();
/// dump_as_json(&mut buffer, &[]).expect("Ошибка записи");
///
/// let result_string = String::from_utf8(buffer).expect("Невалидный UTF-8");
/// assert_eq!(result_string, "{\n  \"tenistas\": []\n}\n");
/// ```
pub fn dump_as_json(writer: &mut impl io::Write, players: &[Player]) -> Result<(), DumpError> {
    serde_json::to_writer_pretty(&mut *writer, &Document { tenistas: players })?;
    writeln!(writer)?;
    Ok(())
}

/// Читает записи обратно из документа, созданного [`dump_as_json`].
pub fn parse_from_json(reader: impl io::Read) -> Result<Vec<Player>, IngestError> {
    let document: OwnedDocument = serde_json::from_reader(reader)?;
    Ok(document.tenistas)
}
