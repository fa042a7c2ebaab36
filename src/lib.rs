//! # torneo_tenis
//!
//! Библиотека для загрузки, проверки и выгрузки данных о теннисистах.
//!
//! Крейт состоит из трёх частей:
//! * **Загрузка** CSV: разбор строк, проверка полей, ошибки изолируются построчно
//!   ([`parse_from_csv`], [`read_players_file`]).
//! * **Кэш** фиксированного размера с вытеснением FIFO ([`cache::PlayerCache`]).
//! * **Выгрузка** в CSV, XML или JSON с выбором формата по расширению файла
//!   ([`dump`], [`export`]).
//!
//! ## Быстрый старт
//!
//! ```rust
//! use torneo_tenis::{parse_from_csv, dump, clock::SystemClock, types::SupportedFileFormat};
//!
//! let data = "nombre,pais,altura,peso,puntos,mano,fecha_nacimiento\n\
//!             Rafael Nadal,España,185,85,9850,IZQUIERDA,1986-06-03\n\
//!             Roger Federer,Suiza,999,85,8000,DIESTRO,1981-08-08\n";
//!
//! let ingestion = parse_from_csv(data.as_bytes(), &SystemClock).expect("Ошибка чтения");
//! assert_eq!(ingestion.players.len(), 1);
//! assert_eq!(ingestion.errors.len(), 1);
//!
//! let mut writer = Vec::new();
//! dump(&mut writer, SupportedFileFormat::Xml, &ingestion.players).expect("Ошибка записи");
//! ```
//!
//! ## Обработка ошибок
//! Ошибки отдельных строк ([`error::ParseError`]) не прерывают загрузку и возвращаются
//! в [`types::Ingestion::errors`]. Прерывают работу только [`error::IngestError`]
//! (нет файла, неверный заголовок), [`error::DumpError`] (не удалось записать результат)
//! и [`error::CacheError`] (нулевой размер кэша).

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod stats;
pub mod storage;
pub mod types;
pub mod validator;

mod csv_format;
mod import;
mod json_format;
mod utils;
mod writer;
mod xml_format;

pub use csv_format::{count_data_lines, dump_as_csv, parse_from_csv, parse_player, read_players_file};

pub use json_format::{dump_as_json, parse_from_json};

pub use xml_format::dump_as_xml;

pub use import::{Import, ImportError, import_file, import_players};

pub use writer::{dump, export};
