//! Хранилище записей.
//!
//! Ядру нужны только [`PlayerRepository::delete_all`], [`PlayerRepository::save`] и
//! [`PlayerRepository::count`]; остальные запросы используются отчётами и тестами.

use std::collections::BTreeMap;

use tracing::debug;

use crate::clock::Clock;
use crate::error::StorageError;
use crate::types::{Hand, Player, PlayerId};

pub trait PlayerRepository {
    /// Все записи в порядке идентификаторов.
    fn find_all(&self) -> Result<Vec<Player>, StorageError>;
    fn find_by_id(&self, id: PlayerId) -> Result<Option<Player>, StorageError>;
    /// Сохраняет новую запись и возвращает её с присвоенным идентификатором.
    fn save(&mut self, player: Player) -> Result<Player, StorageError>;
    /// Обновляет существующую запись; `updated_at` выставляется заново.
    fn update(&mut self, player: Player) -> Result<Player, StorageError>;
    fn delete_by_id(&mut self, id: PlayerId) -> Result<bool, StorageError>;
    fn delete_all(&mut self) -> Result<(), StorageError>;
    /// Записи указанной страны, по имени.
    fn find_by_country(&self, country: &str) -> Result<Vec<Player>, StorageError>;
    /// Записи с указанной рукой, по имени.
    fn find_by_hand(&self, hand: Hand) -> Result<Vec<Player>, StorageError>;
    /// Записи, у которых очков строго больше `points`, по убыванию очков.
    fn find_by_points_greater_than(&self, points: i32) -> Result<Vec<Player>, StorageError>;
    fn count(&self) -> Result<usize, StorageError>;
}

/// Хранилище в памяти. Идентификаторы выдаются по возрастанию, начиная с 1,
/// и не переиспользуются после удаления.
#[derive(Debug)]
pub struct InMemoryRepository<C: Clock> {
    clock: C,
    next_id: PlayerId,
    players: BTreeMap<PlayerId, Player>,
}

impl<C: Clock> InMemoryRepository<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 1,
            players: BTreeMap::new(),
        }
    }

    fn select(&self, predicate: impl Fn(&Player) -> bool) -> Vec<Player> {
        self.players
            .values()
            .filter(|p| predicate(p))
            .cloned()
            .collect()
    }
}

impl<C: Clock> PlayerRepository for InMemoryRepository<C> {
    fn find_all(&self) -> Result<Vec<Player>, StorageError> {
        Ok(self.players.values().cloned().collect())
    }

    fn find_by_id(&self, id: PlayerId) -> Result<Option<Player>, StorageError> {
        Ok(self.players.get(&id).cloned())
    }

    fn save(&mut self, mut player: Player) -> Result<Player, StorageError> {
        player.id = self.next_id;
        self.next_id += 1;
        debug!(id = player.id, name = %player.name, "player saved");
        self.players.insert(player.id, player.clone());
        Ok(player)
    }

    fn update(&mut self, mut player: Player) -> Result<Player, StorageError> {
        let Some(slot) = self.players.get_mut(&player.id) else {
            return Err(StorageError::NotFound(player.id));
        };
        player.touch(self.clock.now());
        *slot = player.clone();
        debug!(id = player.id, "player updated");
        Ok(player)
    }

    fn delete_by_id(&mut self, id: PlayerId) -> Result<bool, StorageError> {
        Ok(self.players.remove(&id).is_some())
    }

    fn delete_all(&mut self) -> Result<(), StorageError> {
        debug!(count = self.players.len(), "deleting all players");
        self.players.clear();
        Ok(())
    }

    fn find_by_country(&self, country: &str) -> Result<Vec<Player>, StorageError> {
        let mut found = self.select(|p| p.country == country);
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn find_by_hand(&self, hand: Hand) -> Result<Vec<Player>, StorageError> {
        let mut found = self.select(|p| p.hand == hand);
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn find_by_points_greater_than(&self, points: i32) -> Result<Vec<Player>, StorageError> {
        let mut found = self.select(|p| p.points > points);
        found.sort_by(|a, b| b.points.cmp(&a.points));
        Ok(found)
    }

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.players.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    fn player(name: &str, country: &str, points: i32, hand: Hand) -> Player {
        Player {
            id: 0,
            name: name.to_string(),
            country: country.to_string(),
            height: 185,
            weight: 80,
            points,
            hand,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            created_at: at(1),
            updated_at: at(1),
        }
    }

    fn repository() -> InMemoryRepository<FixedClock> {
        let mut repo = InMemoryRepository::new(FixedClock(at(9)));
        repo.save(player("Rafael Nadal", "España", 9850, Hand::Left)).unwrap();
        repo.save(player("Carlos Alcaraz", "España", 9000, Hand::Right)).unwrap();
        repo.save(player("Roger Federer", "Suiza", 8000, Hand::Right)).unwrap();
        repo
    }

    #[test]
    fn test_save_assigns_increasing_ids() {
        let repo = repository();
        let ids: Vec<PlayerId> = repo.find_all().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_update_refreshes_timestamp() {
        let mut repo = repository();
        let mut nadal = repo.find_by_id(1).unwrap().unwrap();
        nadal.points = 10000;
        let updated = repo.update(nadal).unwrap();
        assert_eq!(updated.updated_at, at(9));
        assert_eq!(updated.created_at, at(1));
        assert_eq!(repo.find_by_id(1).unwrap().unwrap().points, 10000);

        let mut ghost = player("Ghost", "Nada", 1, Hand::Left);
        ghost.id = 42;
        assert_eq!(repo.update(ghost).unwrap_err(), StorageError::NotFound(42));
    }

    #[test]
    fn test_queries() {
        let repo = repository();
        let spain: Vec<String> = repo
            .find_by_country("España")
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(spain, vec!["Carlos Alcaraz", "Rafael Nadal"]);

        assert_eq!(repo.find_by_hand(Hand::Left).unwrap().len(), 1);

        let top: Vec<i32> = repo
            .find_by_points_greater_than(8000)
            .unwrap()
            .iter()
            .map(|p| p.points)
            .collect();
        assert_eq!(top, vec![9850, 9000]);
    }

    #[test]
    fn test_delete() {
        let mut repo = repository();
        assert!(repo.delete_by_id(2).unwrap());
        assert!(!repo.delete_by_id(2).unwrap());
        repo.delete_all().unwrap();
        assert_eq!(repo.count().unwrap(), 0);

        let saved = repo.save(player("Andy Murray", "Reino Unido", 5000, Hand::Right)).unwrap();
        assert_eq!(saved.id, 4);
    }
}
