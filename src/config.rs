//! Настройки запуска.

use std::path::PathBuf;

/// Выходной файл, если он не указан явно.
pub const DEFAULT_OUTPUT: &str = "torneo_tenis.json";
/// Размер кэша при запуске из командной строки.
pub const DEFAULT_CACHE_CAPACITY: usize = 5;
/// Страна, по которой строятся отдельные разделы сводки.
pub const DEFAULT_HOME_COUNTRY: &str = "España";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub cache_capacity: usize,
    pub home_country: String,
}

impl Settings {
    /// Собирает настройки из позиционных аргументов: входной файл и необязательный выходной.
    ///
    /// Возвращает `None`, если аргументов нет или их больше двух.
    pub fn from_paths(paths: &[PathBuf]) -> Option<Self> {
        let (input, output) = match paths {
            [input] => (input.clone(), PathBuf::from(DEFAULT_OUTPUT)),
            [input, output] => (input.clone(), output.clone()),
            _ => return None,
        };
        Some(Self {
            input,
            output,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            home_country: DEFAULT_HOME_COUNTRY.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paths() {
        assert_eq!(Settings::from_paths(&[]), None);

        let one = Settings::from_paths(&[PathBuf::from("tenistas.csv")]).unwrap();
        assert_eq!(one.input, PathBuf::from("tenistas.csv"));
        assert_eq!(one.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(one.cache_capacity, DEFAULT_CACHE_CAPACITY);

        let two = Settings::from_paths(&[PathBuf::from("in.csv"), PathBuf::from("out.xml")]).unwrap();
        assert_eq!(two.output, PathBuf::from("out.xml"));

        let three = [PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")];
        assert_eq!(Settings::from_paths(&three), None);
    }
}
