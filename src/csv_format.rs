use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{DumpError, IngestError, ParseError};
use crate::types::{DATE_FORMAT, Ingestion, LineError, Player, TIMESTAMP_FORMAT};
use crate::utils::escape_csv;
use crate::validator;

const SEPARATOR: char = ',';

/// Ожидаемые колонки входного файла (регистр не важен).
const EXPECTED_HEADER: &[&str] = &[
    "nombre",
    "pais",
    "altura",
    "peso",
    "puntos",
    "mano",
    "fecha_nacimiento",
];

/// Колонки выгружаемого CSV.
const EXPORT_HEADER: &[&str] = &[
    "id",
    "nombre",
    "pais",
    "altura",
    "peso",
    "puntos",
    "mano",
    "fecha_nacimiento",
    "created_at",
    "updated_at",
];

/// Читает и проверяет записи о теннисистах из CSV.
///
/// Первая строка обязана быть заголовком `nombre,pais,altura,peso,puntos,mano,fecha_nacimiento`.
/// Каждая следующая строка разбирается независимо: ошибка в одной строке попадает
/// в [`Ingestion::errors`] и не прерывает чтение. Пустые строки пропускаются, но
/// счётчик строк при этом всё равно увеличивается.
///
/// # Ошибки
///
/// Возвращает [`IngestError`], если:
/// * источник пуст (нет даже заголовка);
/// * заголовок не совпадает с ожидаемым;
/// * возникла ошибка ввода-вывода при чтении из `reader`.
///
/// # Пример
///
/// ```rust
/// use torneo_tenis::{parse_from_csv, clock::SystemClock, types::Hand};
///
/// let data = "nombre,pais,altura,peso,puntos,mano,fecha_nacimiento\n\
///             Rafael Nadal,España,185,85,9850,IZQUIERDA,1986-06-03\n";
///
/// let ingestion = parse_from_csv(data.as_bytes(), &SystemClock).expect("Ошибка чтения");
/// assert_eq!(ingestion.players.len(), 1);
/// assert_eq!(ingestion.players[0].hand, Hand::Left);
/// assert!(ingestion.errors.is_empty());
/// ```
pub fn parse_from_csv(reader: impl io::Read, clock: &impl Clock) -> Result<Ingestion, IngestError> {
    let mut lines = read_lines(reader);
    let Some(header) = lines.next() else {
        return Err(IngestError::EmptySource);
    };
    validate_header(&header?)?;
    debug!("header is valid");
    parse_players(lines, clock)
}

/// Открывает файл-источник и читает его через [`parse_from_csv`].
///
/// Файл должен существовать, быть доступен для чтения и иметь расширение `.csv`.
pub fn read_players_file(path: &Path, clock: &impl Clock) -> Result<Ingestion, IngestError> {
    info!(path = %path.display(), "reading players from CSV");
    let file = open_source(path)?;
    let ingestion = parse_from_csv(file, clock)?;
    info!(
        accepted = ingestion.players.len(),
        rejected = ingestion.errors.len(),
        "reading finished"
    );
    Ok(ingestion)
}

/// Считает непустые строки данных (без заголовка).
pub fn count_data_lines(path: &Path) -> Result<usize, IngestError> {
    let file = open_source(path)?;
    let mut count = 0;
    for line in read_lines(file).skip(1) {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }
    debug!(count, "data lines counted");
    Ok(count)
}

/// Строки источника без `\n`/`\r\n`.
///
/// Байты, не являющиеся UTF-8, заменяются на `U+FFFD`: такая строка отвергается
/// проверкой полей, а не прерывает чтение. Ошибкой остаётся только сбой ввода-вывода.
fn read_lines(reader: impl io::Read) -> impl Iterator<Item = io::Result<String>> {
    io::BufReader::new(reader).split(b'\n').map(|line| {
        line.map(|mut bytes| {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
            }
        })
    })
}

/// Делит строку по разделителю и обрезает пробелы у полей.
/// Пустые поля в конце строки отбрасываются, поэтому `a,b,` даёт два поля.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(SEPARATOR).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields.into_iter().map(str::trim).collect()
}

fn open_source(path: &Path) -> Result<fs::File, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(IngestError::NotAFile(path.to_path_buf()));
    }
    let has_csv_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !has_csv_extension {
        return Err(IngestError::Extension(path.to_path_buf()));
    }
    fs::File::open(path).map_err(|source| IngestError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

fn validate_header(line: &str) -> Result<(), IngestError> {
    let columns = split_fields(line.trim_start_matches('\u{feff}'));
    if columns.len() != EXPECTED_HEADER.len() {
        return Err(IngestError::HeaderColumnCount {
            expected: EXPECTED_HEADER.len(),
            actual: columns.len(),
        });
    }
    for (i, (found, expected)) in columns.iter().zip(EXPECTED_HEADER).enumerate() {
        if !found.eq_ignore_ascii_case(expected) {
            return Err(IngestError::HeaderColumnName {
                column: i + 1,
                expected: *expected,
                found: found.to_string(),
            });
        }
    }
    Ok(())
}

fn parse_players<I: Iterator<Item = io::Result<String>>>(
    lines: I,
    clock: &impl Clock,
) -> Result<Ingestion, IngestError> {
    let mut result = Ingestion::default();
    for (i, line) in lines.enumerate() {
        let line_no = i + 1;
        let l = line?;
        if l.trim().is_empty() {
            debug!(line = line_no, "skipping blank line");
            continue;
        }
        match parse_player(&l, line_no, clock) {
            Ok(player) => {
                debug!(line = line_no, name = %player.name, "player parsed");
                result.players.push(player);
            }
            Err(err) => {
                warn!(line = line_no, error = %err, "line rejected");
                result.errors.push(LineError {
                    line: line_no,
                    message: err.to_string(),
                });
            }
        }
    }
    Ok(result)
}

/// Разбирает одну строку данных в запись.
///
/// Запись создаётся без идентификатора (`id == 0`), обе отметки времени равны
/// `clock.now()`. Все нарушения правил полей собираются в одну ошибку
/// [`ParseError::Invalid`].
pub fn parse_player(line: &str, line_no: usize, clock: &impl Clock) -> Result<Player, ParseError> {
    let values = split_fields(line);
    if values.len() != EXPECTED_HEADER.len() {
        return Err(ParseError::FieldCount {
            expected: EXPECTED_HEADER.len(),
            actual: values.len(),
        });
    }

    let height = parse_int(values[2], "altura")?;
    let weight = parse_int(values[3], "peso")?;
    let points = parse_int(values[4], "puntos")?;
    let birth_date = validator::parse_birth_date(values[6])?;
    let hand = validator::parse_hand(values[5])?;

    let now = clock.now();
    let player = Player {
        id: 0,
        name: values[0].to_string(),
        country: values[1].to_string(),
        height,
        weight,
        points,
        hand,
        birth_date,
        created_at: now,
        updated_at: now,
    };

    let violations = validator::validate(&player, clock.today());
    if !violations.is_empty() {
        debug!(line = line_no, "field validation failed");
        return Err(ParseError::Invalid(violations));
    }
    Ok(player)
}

fn parse_int(value: &str, field: &'static str) -> Result<i32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidInteger {
        field,
        value: value.to_string(),
    })
}

/// Сериализует записи в CSV (с заголовком и идентификатором), записывая результат в `writer`.
///
/// # Пример
///
/// ```rust
/// use chrono::NaiveDate;
/// use torneo_tenis::{dump_as_csv, types::{Hand, Player}};
///
/// let ts = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_micro_opt(3, 4, 5, 6).unwrap();
/// let players = vec![Player { id: 1, name: "Rafael Nadal".to_string(),
///                             country: "España".to_string(), height: 185, weight: 85,
///                             points: 9850, hand: Hand::Left,
///                             birth_date: NaiveDate::from_ymd_opt(1986, 6, 3).unwrap(),
///                             created_at: ts, updated_at: ts }];
/// let mut buffer = Vec::new();
///
/// dump_as_csv(&mut buffer, &players).expect("Ошибка записи");
///
/// let result_string = String::from_utf8(buffer).expect("Невалидный UTF-8");
/// assert!(result_string.contains(
///     "1,Rafael Nadal,España,185,85,9850,LEFT,1986-06-03,2024-01-02T03:04:05.000006,2024-01-02T03:04:05.000006"
/// ));
/// ```
pub fn dump_as_csv(writer: &mut impl io::Write, players: &[Player]) -> Result<(), DumpError> {
    write_title(writer)?;
    for player in players {
        write_player(writer, player)?;
    }
    Ok(())
}

fn write_title(writer: &mut impl io::Write) -> Result<(), DumpError> {
    writeln!(writer, "{}", EXPORT_HEADER.join(","))?;
    Ok(())
}

fn write_player(writer: &mut impl io::Write, player: &Player) -> Result<(), DumpError> {
    let values = [
        player.id.to_string(),
        escape_csv(&player.name),
        escape_csv(&player.country),
        player.height.to_string(),
        player.weight.to_string(),
        player.points.to_string(),
        player.hand.to_string(),
        player.birth_date.format(DATE_FORMAT).to_string(),
        player.created_at.format(TIMESTAMP_FORMAT).to_string(),
        player.updated_at.format(TIMESTAMP_FORMAT).to_string(),
    ];
    writeln!(writer, "{}", values.join(","))?;
    Ok(())
}
