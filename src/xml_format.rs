use std::io;

use crate::error::DumpError;
use crate::types::{DATE_FORMAT, Player, TIMESTAMP_FORMAT};
use crate::utils::escape_xml;

/// Сериализует записи в XML-документ с корневым элементом `tenistas`.
///
/// Каждая запись становится элементом `tenista`; текстовые значения экранируются
/// (`& < > " '`).
///
/// # Пример
///
/// ```rust
/// use torneo_tenis::dump_as_xml;
///
/// let mut buffer = Vec::new();
/// dump_as_xml(&mut buffer, &[]).expect("Ошибка записи");
///
/// let result_string = String::from_utf8(buffer).expect("Невалидный UTF-8");
/// assert!(result_string.contains("<tenistas>\n</tenistas>"));
/// ```
pub fn dump_as_xml(writer: &mut impl io::Write, players: &[Player]) -> Result<(), DumpError> {
    writeln!(writer, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(writer, "<tenistas>")?;
    for player in players {
        write_player(writer, player)?;
    }
    writeln!(writer, "</tenistas>")?;
    Ok(())
}

fn write_player(writer: &mut impl io::Write, player: &Player) -> Result<(), DumpError> {
    let elements = [
        ("id", player.id.to_string()),
        ("nombre", escape_xml(&player.name)),
        ("pais", escape_xml(&player.country)),
        ("altura", player.height.to_string()),
        ("peso", player.weight.to_string()),
        ("puntos", player.points.to_string()),
        ("mano", player.hand.to_string()),
        ("fecha_nacimiento", player.birth_date.format(DATE_FORMAT).to_string()),
        ("created_at", player.created_at.format(TIMESTAMP_FORMAT).to_string()),
        ("updated_at", player.updated_at.format(TIMESTAMP_FORMAT).to_string()),
    ];
    writeln!(writer, "  <tenista>")?;
    for (tag, value) in elements {
        writeln!(writer, "    <{tag}>{value}</{tag}>")?;
    }
    writeln!(writer, "  </tenista>")?;
    Ok(())
}
