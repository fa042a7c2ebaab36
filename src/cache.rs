//! Кэш записей фиксированного размера с вытеснением FIFO.
//!
//! Вытесняется запись, которая дольше всех находится в кэше. Чтение не влияет на
//! порядок вытеснения, обновление существующего ключа тоже.
//!
//! Кэш не синхронизирован: при использовании из нескольких потоков все вызовы
//! нужно сериализовать снаружи (например, одним `Mutex` вокруг всего кэша).

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::CacheError;
use crate::types::{Player, PlayerId};

#[derive(Debug)]
pub struct PlayerCache {
    capacity: usize,
    entries: IndexMap<PlayerId, Player>,
}

impl PlayerCache {
    /// Создаёт кэш на `capacity` записей; нулевой размер недопустим.
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        info!(capacity, "FIFO cache initialized");
        Ok(Self {
            capacity,
            entries: IndexMap::with_capacity(capacity),
        })
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        let found = self.entries.get(&id);
        if found.is_some() {
            debug!(id, "cache hit");
        } else {
            debug!(id, "cache miss");
        }
        found
    }

    /// Кладёт запись в кэш.
    ///
    /// Существующий ключ обновляется на месте, без вытеснения и без смены позиции.
    /// Для нового ключа при заполненном кэше сначала вытесняется самая старая запись.
    /// Несохранённый идентификатор (`0`) игнорируется.
    pub fn put(&mut self, id: PlayerId, player: Player) {
        if id == 0 {
            warn!(name = %player.name, "refusing to cache a player without id");
            return;
        }

        if let Some(slot) = self.entries.get_mut(&id) {
            debug!(id, name = %player.name, "cached player replaced");
            *slot = player;
            return;
        }

        if self.entries.len() >= self.capacity
            && let Some((oldest, _)) = self.entries.shift_remove_index(0)
        {
            debug!(id = oldest, "evicting oldest cache entry");
        }

        debug!(id, name = %player.name, "player cached");
        self.entries.insert(id, player);
    }

    pub fn remove(&mut self, id: PlayerId) -> bool {
        let removed = self.entries.shift_remove(&id).is_some();
        if removed {
            debug!(id, "player removed from cache");
        }
        removed
    }

    /// Заменяет запись, только если ключ уже есть в кэше.
    pub fn update(&mut self, id: PlayerId, player: Player) -> bool {
        match self.entries.get_mut(&id) {
            Some(slot) => {
                *slot = player;
                debug!(id, "cached player updated");
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        info!("cache cleared");
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Идентификаторы в порядке вытеснения (первый будет вытеснен первым).
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.entries.keys().copied()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            capacity: self.capacity,
            empty: self.is_empty(),
            full: self.is_full(),
        }
    }
}

/// Снимок состояния кэша.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub empty: bool,
    pub full: bool,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FIFO cache - size: {}/{}, empty: {}, full: {}",
            self.size, self.capacity, self.empty, self.full
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hand;
    use chrono::NaiveDate;

    fn player(id: PlayerId, name: &str) -> Player {
        let ts = NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        Player {
            id,
            name: name.to_string(),
            country: "España".to_string(),
            height: 180,
            weight: 80,
            points: 1000,
            hand: Hand::Right,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn ids(cache: &PlayerCache) -> Vec<PlayerId> {
        cache.ids().collect()
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert_eq!(PlayerCache::new(0).unwrap_err(), CacheError::ZeroCapacity);
    }

    #[test]
    fn test_evicts_first_inserted() {
        let mut cache = PlayerCache::new(2).unwrap();
        cache.put(1, player(1, "A"));
        cache.put(2, player(2, "B"));
        cache.put(3, player(3, "C"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(1).is_none());
        assert_eq!(cache.get(2).map(|p| p.name.as_str()), Some("B"));
        assert_eq!(cache.get(3).map(|p| p.name.as_str()), Some("C"));
    }

    #[test]
    fn test_read_does_not_refresh_order() {
        let mut cache = PlayerCache::new(2).unwrap();
        cache.put(1, player(1, "A"));
        cache.put(2, player(2, "B"));
        assert!(cache.get(1).is_some());
        cache.put(3, player(3, "C"));
        assert_eq!(ids(&cache), vec![2, 3]);
    }

    #[test]
    fn test_put_existing_keeps_size_and_position() {
        let mut cache = PlayerCache::new(2).unwrap();
        cache.put(1, player(1, "A"));
        cache.put(2, player(2, "B"));
        cache.put(1, player(1, "A2"));

        assert_eq!(cache.len(), 2);
        assert_eq!(ids(&cache), vec![1, 2]);
        assert_eq!(cache.get(1).map(|p| p.name.as_str()), Some("A2"));

        cache.put(3, player(3, "C"));
        assert_eq!(ids(&cache), vec![2, 3]);
    }

    #[test]
    fn test_eviction_skips_removed_keys() {
        let mut cache = PlayerCache::new(3).unwrap();
        for id in 1..=3 {
            cache.put(id, player(id, "X"));
        }
        assert!(cache.remove(1));
        assert!(!cache.remove(1));
        cache.put(4, player(4, "D"));
        assert_eq!(ids(&cache), vec![2, 3, 4]);
        cache.put(5, player(5, "E"));
        assert_eq!(ids(&cache), vec![3, 4, 5]);
    }

    #[test]
    fn test_size_never_exceeds_capacity() {
        for capacity in 1..=5 {
            let mut cache = PlayerCache::new(capacity).unwrap();
            for id in 1..=(capacity as u64 + 1) {
                cache.put(id, player(id, "X"));
                assert!(cache.len() <= capacity);
            }
            assert_eq!(cache.len(), capacity);
            assert!(!cache.contains(1));
            assert!(cache.is_full());
        }
    }

    #[test]
    fn test_update_only_existing() {
        let mut cache = PlayerCache::new(1).unwrap();
        assert!(!cache.update(1, player(1, "A")));
        assert!(cache.is_empty());

        cache.put(1, player(1, "A"));
        assert!(cache.update(1, player(1, "B")));
        assert_eq!(cache.get(1).map(|p| p.name.as_str()), Some("B"));
        assert!(!cache.update(2, player(2, "C")));
        assert_eq!(ids(&cache), vec![1]);
    }

    #[test]
    fn test_unassigned_id_is_ignored() {
        let mut cache = PlayerCache::new(2).unwrap();
        cache.put(0, player(0, "A"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_and_stats() {
        let mut cache = PlayerCache::new(2).unwrap();
        cache.put(1, player(1, "A"));
        assert_eq!(
            cache.stats().to_string(),
            "FIFO cache - size: 1/2, empty: false, full: false"
        );
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 2);
    }
}
