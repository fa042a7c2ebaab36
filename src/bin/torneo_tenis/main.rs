use std::fmt;
use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use torneo_tenis::{
    cache::PlayerCache,
    clock::SystemClock,
    config::{self, Settings},
    error,
    stats::Report,
    storage::{InMemoryRepository, PlayerRepository},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Входной CSV с теннисистами и необязательный выходной файл (.csv/.xml/.json)
    paths: Vec<PathBuf>,

    /// Размер FIFO-кэша
    #[arg(long, default_value_t = config::DEFAULT_CACHE_CAPACITY)]
    cache_capacity: usize,

    /// Страна для разделов сводки о "домашних" теннисистах
    #[arg(long, default_value = config::DEFAULT_HOME_COUNTRY)]
    home_country: String,

    /// Подробный лог (если не задан RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
enum Error {
    Ingest(String),
    Dump(String),
    Storage(String),
    Config(String),
    Output(String),
}

impl Error {
    fn code(&self) -> i32 {
        match self {
            Self::Ingest(_) => 1,
            Self::Dump(_) => 2,
            Self::Storage(_) => 3,
            Self::Config(_) => 4,
            Self::Output(_) => 5,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ingest(msg)
            | Self::Dump(msg)
            | Self::Storage(msg)
            | Self::Config(msg)
            | Self::Output(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<torneo_tenis::ImportError> for Error {
    fn from(value: torneo_tenis::ImportError) -> Self {
        match value {
            torneo_tenis::ImportError::Ingest(err) => {
                Error::Ingest(format!("ошибка при чтении исходного файла: {}", err))
            }
            torneo_tenis::ImportError::Storage(err) => Error::Storage(err.to_string()),
        }
    }
}

impl From<error::DumpError> for Error {
    fn from(value: error::DumpError) -> Self {
        Error::Dump(format!("ошибка при записи результата: {}", value))
    }
}

impl From<error::StorageError> for Error {
    fn from(value: error::StorageError) -> Self {
        Error::Storage(value.to_string())
    }
}

impl From<error::CacheError> for Error {
    fn from(value: error::CacheError) -> Self {
        Error::Config(value.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Output(format!("ошибка вывода: {}", value))
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<(), Error> {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(mut settings) = Settings::from_paths(&args.paths) else {
        Args::command().print_help()?;
        println!();
        return Ok(());
    };
    settings.cache_capacity = args.cache_capacity;
    settings.home_country = args.home_country;

    let clock = SystemClock;
    let mut cache = PlayerCache::new(settings.cache_capacity)?;
    let mut repository = InMemoryRepository::new(clock);

    let import = torneo_tenis::import_file(&settings.input, &mut repository, &mut cache, &clock)?;
    if !import.errors.is_empty() {
        eprintln!("Отклонено строк: {}", import.errors.len());
        for line_error in &import.errors {
            eprintln!("  {}", line_error);
        }
    }

    println!("{}", Report::build(&import.saved, &settings.home_country));

    torneo_tenis::export(&settings.output, &import.saved)?;
    println!(
        "\nФайл создан: {} ({} теннисистов)",
        settings.output.display(),
        import.saved.len()
    );

    println!("\nТеннисистов в хранилище: {}", repository.count()?);
    println!("Кэш: {}", cache.stats());

    Ok(())
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.code());
        }
    }
}
