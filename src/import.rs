use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::cache::PlayerCache;
use crate::clock::Clock;
use crate::csv_format::read_players_file;
use crate::error::{IngestError, StorageError};
use crate::storage::PlayerRepository;
use crate::types::{LineError, Player};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Результат импорта файла: сохранённые записи и отвергнутые строки.
#[derive(Debug, Default, Clone)]
pub struct Import {
    pub saved: Vec<Player>,
    pub errors: Vec<LineError>,
}

/// Полный цикл загрузки файла.
///
/// Хранилище очищается один раз до чтения источника; затем принятые записи
/// передаются в [`import_players`].
pub fn import_file(
    path: &Path,
    repository: &mut impl PlayerRepository,
    cache: &mut PlayerCache,
    clock: &impl Clock,
) -> Result<Import, ImportError> {
    info!("clearing storage");
    repository.delete_all()?;

    let ingestion = read_players_file(path, clock)?;
    let saved = import_players(repository, cache, ingestion.players)?;
    Ok(Import {
        saved,
        errors: ingestion.errors,
    })
}

/// Сохраняет записи в порядке источника и сразу кладёт каждую в кэш под
/// присвоенным идентификатором. Возвращает сохранённые записи в том же порядке.
pub fn import_players(
    repository: &mut impl PlayerRepository,
    cache: &mut PlayerCache,
    players: Vec<Player>,
) -> Result<Vec<Player>, StorageError> {
    info!(count = players.len(), "importing players");

    let mut saved = Vec::with_capacity(players.len());
    for player in players {
        let stored = repository.save(player)?;
        cache.put(stored.id, stored.clone());
        debug!(id = stored.id, name = %stored.name, "player imported");
        saved.push(stored);
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::csv_format::parse_from_csv;
    use crate::storage::InMemoryRepository;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2025, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap(),
        )
    }

    #[test]
    fn test_import_saves_and_caches_in_source_order() {
        let data = "nombre,pais,altura,peso,puntos,mano,fecha_nacimiento\n\
                    Rafael Nadal,España,185,85,9850,IZQUIERDA,1986-06-03\n\
                    Roger Federer,Suiza,185,85,8000,DIESTRO,1981-08-08\n\
                    Novak Djokovic,Serbia,188,77,11000,DERECHA,1987-05-22\n";
        let ingestion = parse_from_csv(data.as_bytes(), &clock()).unwrap();

        let mut repo = InMemoryRepository::new(clock());
        let mut cache = PlayerCache::new(2).unwrap();
        let saved = import_players(&mut repo, &mut cache, ingestion.players).unwrap();

        assert_eq!(repo.count().unwrap(), 3);
        let names: Vec<&str> = saved.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Rafael Nadal", "Roger Federer", "Novak Djokovic"]);
        let ids: Vec<u64> = saved.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(1));
        assert_eq!(cache.get(2).map(|p| p.name.as_str()), Some("Roger Federer"));
        assert_eq!(cache.get(3).map(|p| p.name.as_str()), Some("Novak Djokovic"));
    }

    #[test]
    fn test_import_file_clears_storage_first() {
        let mut repo = InMemoryRepository::new(clock());
        let stale = Player {
            id: 0,
            name: "Stale Entry".to_string(),
            country: "Nada".to_string(),
            height: 180,
            weight: 80,
            points: 1,
            hand: crate::types::Hand::Left,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            created_at: clock().0,
            updated_at: clock().0,
        };
        repo.save(stale).unwrap();
        let mut cache = PlayerCache::new(5).unwrap();

        let got = import_file(Path::new("does/not/exist.csv"), &mut repo, &mut cache, &clock());
        assert!(matches!(got, Err(ImportError::Ingest(IngestError::NotFound(_)))));
        assert_eq!(repo.count().unwrap(), 0);
    }
}
