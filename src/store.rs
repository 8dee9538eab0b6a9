//! Reading state store: favorites and reading history.
//!
//! The store owns both collections in memory and is the only writer of the
//! `mangaFavorites` and `readingHistory` storage keys. Every mutation writes
//! the full affected collection before returning. A failed write rolls the
//! in-memory change back, so memory and storage never disagree.

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::models::{ChapterRef, FavoriteEntry, HistoryEntry, MangaRef};
use crate::storage::KeyValueStorage;
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;

/// Storage key holding the favorites list.
pub const FAVORITES_KEY: &str = "mangaFavorites";

/// Storage key holding the reading history, newest first.
pub const HISTORY_KEY: &str = "readingHistory";

/// Maximum number of history entries kept.
pub const HISTORY_LIMIT: usize = 20;

/// Favorites in insertion order and history in recency order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingState {
    pub favorites: Vec<FavoriteEntry>,
    pub history: Vec<HistoryEntry>,
}

/// A storage key whose value failed to decode and was reset to empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredKey {
    pub key: &'static str,
    /// Decoder message for the discarded value.
    pub error: String,
}

/// What happened while loading persisted state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Keys that held undecodable data and now start empty.
    pub recovered: Vec<RecoveredKey>,
}

impl LoadReport {
    /// Returns true if every key loaded cleanly or was absent.
    pub fn is_clean(&self) -> bool {
        self.recovered.is_empty()
    }
}

/// Owned reading state synchronized to a [`KeyValueStorage`].
pub struct ReadingStateStore<S, C = SystemClock> {
    storage: S,
    clock: C,
    state: ReadingState,
    history_limit: usize,
}

impl<S: KeyValueStorage> ReadingStateStore<S, SystemClock> {
    /// Loads persisted state using the wall clock for history timestamps.
    pub fn load(storage: S, history_limit: usize) -> Result<(Self, LoadReport), StoreError> {
        Self::load_with_clock(storage, SystemClock, history_limit)
    }
}

impl<S: KeyValueStorage, C: Clock> ReadingStateStore<S, C> {
    /// Loads persisted state.
    ///
    /// Each key is read independently. An absent key gives an empty
    /// collection; an undecodable value also gives an empty collection and
    /// is listed in the returned [`LoadReport`]. Only a failing storage read
    /// is an error.
    ///
    /// `history_limit` is clamped to `1..=HISTORY_LIMIT`.
    pub fn load_with_clock(
        storage: S,
        clock: C,
        history_limit: usize,
    ) -> Result<(Self, LoadReport), StoreError> {
        let history_limit = history_limit.clamp(1, HISTORY_LIMIT);
        let mut report = LoadReport::default();

        let mut favorites: Vec<FavoriteEntry> =
            read_collection(&storage, FAVORITES_KEY, &mut report)?;
        let mut history: Vec<HistoryEntry> = read_collection(&storage, HISTORY_KEY, &mut report)?;

        // Stored data may predate the invariants; keep the first occurrence.
        let mut seen_ids = HashSet::new();
        favorites.retain(|f| seen_ids.insert(f.id.clone()));

        let mut seen_pairs = HashSet::new();
        history.retain(|h| seen_pairs.insert((h.manga_id.clone(), h.chapter_id.clone())));
        history.truncate(history_limit);

        debug!(
            "Loaded {} favorites and {} history entries",
            favorites.len(),
            history.len()
        );

        let store = Self {
            storage,
            clock,
            state: ReadingState { favorites, history },
            history_limit,
        };

        Ok((store, report))
    }

    /// Current state.
    pub fn state(&self) -> &ReadingState {
        &self.state
    }

    /// Favorites in the order they were added.
    pub fn favorites(&self) -> &[FavoriteEntry] {
        &self.state.favorites
    }

    /// History, most recently read first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.history
    }

    /// The first `limit` history entries.
    pub fn recent_history(&self, limit: usize) -> &[HistoryEntry] {
        let end = limit.min(self.state.history.len());
        &self.state.history[..end]
    }

    /// Effective history bound.
    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Returns true if a favorite with this id exists.
    pub fn is_favorite(&self, id: &str) -> bool {
        self.state.favorites.iter().any(|f| f.id == id)
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the store and returns its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Appends a favorite.
    ///
    /// Adding an id that is already a favorite is a no-op: nothing is
    /// written and the state is returned unchanged. A non-finite rating is
    /// rejected, since JSON cannot carry it back.
    pub fn add_favorite(&mut self, entry: FavoriteEntry) -> Result<&ReadingState, StoreError> {
        if !entry.rating.is_finite() {
            return Err(StoreError::InvalidEntry {
                id: entry.id,
                reason: format!("rating must be a finite number, got {}", entry.rating),
            });
        }

        if self.is_favorite(&entry.id) {
            debug!("Favorite {} already present, ignoring add", entry.id);
            return Ok(&self.state);
        }

        let previous = self.state.favorites.clone();
        self.state.favorites.push(entry);
        self.commit_favorites(previous)?;
        Ok(&self.state)
    }

    /// Removes every favorite with `id`. Removing an absent id is a no-op.
    pub fn remove_favorite(&mut self, id: &str) -> Result<&ReadingState, StoreError> {
        if !self.is_favorite(id) {
            return Ok(&self.state);
        }

        let previous = self.state.favorites.clone();
        self.state.favorites.retain(|f| f.id != id);
        self.commit_favorites(previous)?;
        Ok(&self.state)
    }

    /// Removes the favorite if present, adds it otherwise.
    ///
    /// Returns whether the title is a favorite afterwards.
    pub fn toggle_favorite(&mut self, entry: FavoriteEntry) -> Result<bool, StoreError> {
        if self.is_favorite(&entry.id) {
            self.remove_favorite(&entry.id)?;
            Ok(false)
        } else {
            self.add_favorite(entry)?;
            Ok(true)
        }
    }

    /// Records that `chapter` of `manga` was opened, on page 1.
    pub fn record_chapter_read(
        &mut self,
        manga: MangaRef<'_>,
        chapter: ChapterRef<'_>,
    ) -> Result<&ReadingState, StoreError> {
        self.record_page_read(manga, chapter, 1)
    }

    /// Records reading progress for a chapter.
    ///
    /// Any existing entry for the same manga and chapter is replaced; the
    /// new entry goes to the front and the list is cut to the history limit.
    pub fn record_page_read(
        &mut self,
        manga: MangaRef<'_>,
        chapter: ChapterRef<'_>,
        page: u32,
    ) -> Result<&ReadingState, StoreError> {
        let entry = HistoryEntry {
            manga_id: manga.id.to_string(),
            manga_title: manga.title.to_string(),
            manga_cover: manga.cover_image.to_string(),
            chapter_id: chapter.id.to_string(),
            chapter_number: chapter.number,
            last_read: self.clock.now(),
            page_read: page.max(1),
        };

        let previous = self.state.history.clone();
        let history = &mut self.state.history;
        history.retain(|h| !h.is_for(manga.id, chapter.id));
        history.insert(0, entry);
        history.truncate(self.history_limit);

        self.commit_history(previous)?;
        Ok(&self.state)
    }

    fn commit_favorites(&mut self, previous: Vec<FavoriteEntry>) -> Result<(), StoreError> {
        if let Err(e) = write_collection(&mut self.storage, FAVORITES_KEY, &self.state.favorites) {
            warn!("Rolling back favorites: {}", e);
            self.state.favorites = previous;
            return Err(e);
        }
        Ok(())
    }

    fn commit_history(&mut self, previous: Vec<HistoryEntry>) -> Result<(), StoreError> {
        if let Err(e) = write_collection(&mut self.storage, HISTORY_KEY, &self.state.history) {
            warn!("Rolling back reading history: {}", e);
            self.state.history = previous;
            return Err(e);
        }
        Ok(())
    }
}

/// Reads and decodes one collection, resetting it to empty on bad data.
fn read_collection<S, T>(
    storage: &S,
    key: &'static str,
    report: &mut LoadReport,
) -> Result<Vec<T>, StoreError>
where
    S: KeyValueStorage,
    T: DeserializeOwned,
{
    let Some(raw) = storage
        .get(key)
        .map_err(|source| StoreError::Read { key, source })?
    else {
        return Ok(Vec::new());
    };

    match serde_json::from_str(&raw) {
        Ok(items) => Ok(items),
        Err(e) => {
            warn!("Discarding unreadable '{}' data: {}", key, e);
            report.recovered.push(RecoveredKey {
                key,
                error: e.to_string(),
            });
            Ok(Vec::new())
        }
    }
}

/// Encodes a full collection and writes it under `key`.
fn write_collection<S, T>(storage: &mut S, key: &'static str, items: &[T]) -> Result<(), StoreError>
where
    S: KeyValueStorage,
    T: Serialize,
{
    let content = serde_json::to_string(items)?;
    storage
        .set(key, &content)
        .map_err(|source| StoreError::Write { key, source })?;
    debug!("Flushed {} entries to '{}'", items.len(), key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppingClock;
    use crate::error::StorageError;
    use crate::storage::MemoryStorage;
    use chrono::{Duration, TimeZone, Utc};

    fn favorite(id: &str) -> FavoriteEntry {
        FavoriteEntry {
            id: id.to_string(),
            title: format!("Manga {}", id),
            cover_image: format!("https://example.com/{}.jpg", id),
            author: "Author".to_string(),
            status: "Ongoing".to_string(),
            genres: vec!["Action".to_string()],
            rating: 9.0,
        }
    }

    fn manga(id: &str) -> MangaRef<'_> {
        MangaRef {
            id,
            title: "Title",
            cover_image: "cover.jpg",
        }
    }

    fn chapter(id: &str, number: u32) -> ChapterRef<'_> {
        ChapterRef { id, number }
    }

    fn test_clock() -> SteppingClock {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        SteppingClock::new(start, Duration::minutes(1))
    }

    fn empty_store() -> ReadingStateStore<MemoryStorage, SteppingClock> {
        let (store, report) =
            ReadingStateStore::load_with_clock(MemoryStorage::new(), test_clock(), HISTORY_LIMIT)
                .unwrap();
        assert!(report.is_clean());
        store
    }

    #[test]
    fn test_load_empty_storage() {
        let store = empty_store();
        assert!(store.favorites().is_empty());
        assert!(store.history().is_empty());
        assert_eq!(store.history_limit(), HISTORY_LIMIT);
    }

    #[test]
    fn test_add_and_remove_favorite() {
        let mut store = empty_store();
        store.add_favorite(favorite("1")).unwrap();
        store.add_favorite(favorite("2")).unwrap();

        let ids: Vec<&str> = store.favorites().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert!(store.is_favorite("1"));

        let state = store.remove_favorite("1").unwrap();
        assert_eq!(state.favorites.len(), 1);
        assert!(!store.is_favorite("1"));

        let raw = store.storage().get(FAVORITES_KEY).unwrap().unwrap();
        let persisted: Vec<FavoriteEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, store.favorites());
    }

    #[test]
    fn test_duplicate_favorite_is_ignored() {
        let mut store = empty_store();
        store.add_favorite(favorite("1")).unwrap();
        let state = store.add_favorite(favorite("1")).unwrap();
        assert_eq!(state.favorites.len(), 1);
    }

    #[test]
    fn test_remove_favorite_idempotent() {
        let mut store = empty_store();
        store.add_favorite(favorite("1")).unwrap();
        store.add_favorite(favorite("2")).unwrap();

        let after_first = store.remove_favorite("1").unwrap().favorites.clone();
        let after_second = store.remove_favorite("1").unwrap().favorites.clone();
        assert_eq!(after_first, after_second);

        // Absent id on empty storage writes nothing
        let mut fresh = empty_store();
        fresh.remove_favorite("missing").unwrap();
        assert!(fresh.storage().is_empty());
    }

    #[test]
    fn test_toggle_favorite() {
        let mut store = empty_store();
        assert!(store.toggle_favorite(favorite("3")).unwrap());
        assert!(store.is_favorite("3"));
        assert!(!store.toggle_favorite(favorite("3")).unwrap());
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn test_history_reread_moves_to_front() {
        let mut store = empty_store();
        store.record_chapter_read(manga("A"), chapter("1", 1)).unwrap();
        store.record_chapter_read(manga("A"), chapter("2", 2)).unwrap();
        store.record_chapter_read(manga("A"), chapter("1", 1)).unwrap();

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let history = store.history();
        assert_eq!(history.len(), 2);
        assert!(history[0].is_for("A", "1"));
        assert_eq!(history[0].last_read, start + Duration::minutes(2));
        assert!(history[1].is_for("A", "2"));
        assert_eq!(history[1].last_read, start + Duration::minutes(1));
        assert_eq!(history[0].page_read, 1);
    }

    #[test]
    fn test_same_chapter_id_different_manga_are_distinct() {
        let mut store = empty_store();
        store.record_chapter_read(manga("A"), chapter("1", 1)).unwrap();
        store.record_chapter_read(manga("B"), chapter("1", 1)).unwrap();
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn test_history_bounded_to_most_recent() {
        let mut store = empty_store();
        for i in 0..30 {
            let id = i.to_string();
            store.record_chapter_read(manga("A"), chapter(&id, i)).unwrap();
        }

        let history = store.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        let numbers: Vec<u32> = history.iter().map(|h| h.chapter_number).collect();
        let expected: Vec<u32> = (10..30).rev().collect();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn test_history_never_has_duplicates() {
        let mut store = empty_store();
        let pattern = [1, 2, 3, 1, 4, 2, 2, 5, 1, 3];
        for n in pattern {
            let id = n.to_string();
            store.record_chapter_read(manga("A"), chapter(&id, n)).unwrap();
        }

        let mut seen = HashSet::new();
        for entry in store.history() {
            assert!(seen.insert(entry.chapter_id.clone()));
        }
        assert_eq!(store.history()[0].chapter_number, 3);
        assert_eq!(store.history().len(), 5);
    }

    #[test]
    fn test_record_page_read() {
        let mut store = empty_store();
        store.record_chapter_read(manga("A"), chapter("1", 1)).unwrap();
        store.record_page_read(manga("A"), chapter("1", 1), 7).unwrap();
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history()[0].page_read, 7);

        // Page numbers start at 1
        store.record_page_read(manga("A"), chapter("1", 1), 0).unwrap();
        assert_eq!(store.history()[0].page_read, 1);
    }

    #[test]
    fn test_recent_history() {
        let mut store = empty_store();
        assert!(store.recent_history(3).is_empty());
        for n in 1..=5 {
            let id = n.to_string();
            store.record_chapter_read(manga("A"), chapter(&id, n)).unwrap();
        }
        let recent = store.recent_history(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].chapter_number, 5);
    }

    #[test]
    fn test_custom_history_limit() {
        let (mut store, _) =
            ReadingStateStore::load_with_clock(MemoryStorage::new(), test_clock(), 3).unwrap();
        for n in 1..=5 {
            let id = n.to_string();
            store.record_chapter_read(manga("A"), chapter(&id, n)).unwrap();
        }
        assert_eq!(store.history().len(), 3);

        let (store, _) =
            ReadingStateStore::load_with_clock(MemoryStorage::new(), test_clock(), 500).unwrap();
        assert_eq!(store.history_limit(), HISTORY_LIMIT);
    }

    #[test]
    fn test_round_trip_through_storage() {
        let mut store = empty_store();
        store.add_favorite(favorite("2")).unwrap();
        store.add_favorite(favorite("1")).unwrap();
        store.record_chapter_read(manga("A"), chapter("1", 1)).unwrap();
        store.record_chapter_read(manga("B"), chapter("9", 9)).unwrap();
        let expected = store.state().clone();

        let storage = store.into_storage();
        let (reloaded, report) =
            ReadingStateStore::load_with_clock(storage, test_clock(), HISTORY_LIMIT).unwrap();
        assert!(report.is_clean());
        assert_eq!(reloaded.state(), &expected);
    }

    #[test]
    fn test_corrupt_key_recovered_other_intact() {
        let mut storage = MemoryStorage::new();
        storage.set(FAVORITES_KEY, "{not json").unwrap();
        storage
            .set(
                HISTORY_KEY,
                r#"[{"mangaId":"1","mangaTitle":"One Piece","mangaCover":"c","chapterId":"101","chapterNumber":1,"lastRead":"2024-01-01T00:00:00.000Z","pageRead":1}]"#,
            )
            .unwrap();

        let (store, report) =
            ReadingStateStore::load_with_clock(storage, test_clock(), HISTORY_LIMIT).unwrap();
        assert!(store.favorites().is_empty());
        assert_eq!(store.history().len(), 1);
        assert_eq!(report.recovered.len(), 1);
        assert_eq!(report.recovered[0].key, FAVORITES_KEY);
    }

    #[test]
    fn test_load_normalizes_duplicates() {
        let mut storage = MemoryStorage::new();
        let favorites = vec![favorite("1"), favorite("1"), favorite("2")];
        storage
            .set(FAVORITES_KEY, &serde_json::to_string(&favorites).unwrap())
            .unwrap();

        let (store, _) =
            ReadingStateStore::load_with_clock(storage, test_clock(), HISTORY_LIMIT).unwrap();
        assert_eq!(store.favorites().len(), 2);
    }

    #[test]
    fn test_write_failure_rolls_back() {
        let mut store = empty_store();
        store.add_favorite(favorite("1")).unwrap();
        store.record_chapter_read(manga("A"), chapter("1", 1)).unwrap();
        let before = store.state().clone();

        let used = store.storage().used_bytes();
        let (mut store, _) = ReadingStateStore::load_with_clock(
            {
                let mut storage = store.into_storage();
                storage.set_quota(Some(used));
                storage
            },
            test_clock(),
            HISTORY_LIMIT,
        )
        .unwrap();

        let err = store.add_favorite(favorite("2")).unwrap_err();
        assert!(matches!(err, StoreError::Write { key: FAVORITES_KEY, .. }));

        let err = store
            .record_chapter_read(manga("A"), chapter("2", 2))
            .unwrap_err();
        assert!(matches!(err, StoreError::Write { key: HISTORY_KEY, .. }));

        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_non_finite_rating_rejected() {
        let mut store = empty_store();
        store.add_favorite(favorite("1")).unwrap();

        for rating in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut entry = favorite("2");
            entry.rating = rating;
            let err = store.add_favorite(entry.clone()).unwrap_err();
            assert!(matches!(err, StoreError::InvalidEntry { ref id, .. } if id == "2"));
            assert!(store.toggle_favorite(entry).is_err());
        }
        assert_eq!(store.favorites().len(), 1);

        let (reloaded, report) = ReadingStateStore::load_with_clock(
            store.into_storage(),
            test_clock(),
            HISTORY_LIMIT,
        )
        .unwrap();
        assert!(report.is_clean());
        assert_eq!(reloaded.favorites().len(), 1);
    }

    #[test]
    fn test_rating_survives_reload_bit_for_bit() {
        let ratings = [
            1.0715660391465826e-75,
            0.1 + 0.2,
            9.299999999999999,
            f64::MIN_POSITIVE,
            f64::MAX,
            -0.0,
        ];

        let mut store = empty_store();
        for (i, rating) in ratings.iter().enumerate() {
            let mut entry = favorite(&i.to_string());
            entry.rating = *rating;
            store.add_favorite(entry).unwrap();
        }

        let (reloaded, _) = ReadingStateStore::load_with_clock(
            store.into_storage(),
            test_clock(),
            HISTORY_LIMIT,
        )
        .unwrap();
        let reloaded_bits: Vec<u64> = reloaded
            .favorites()
            .iter()
            .map(|f| f.rating.to_bits())
            .collect();
        let expected_bits: Vec<u64> = ratings.iter().map(|r| r.to_bits()).collect();
        assert_eq!(reloaded_bits, expected_bits);
    }

    /// Storage whose reads of one key fail.
    struct FailingRead {
        inner: MemoryStorage,
        failing_key: &'static str,
    }

    impl KeyValueStorage for FailingRead {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if key == self.failing_key {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "permission denied",
                )));
            }
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }
    }

    #[test]
    fn test_read_failure_is_distinct_from_absent_key() {
        let storage = FailingRead {
            inner: MemoryStorage::new(),
            failing_key: HISTORY_KEY,
        };
        let result = ReadingStateStore::load_with_clock(storage, test_clock(), HISTORY_LIMIT);
        assert!(matches!(
            result,
            Err(StoreError::Read {
                key: HISTORY_KEY,
                source: StorageError::Io(_)
            })
        ));

        let storage = FailingRead {
            inner: MemoryStorage::new(),
            failing_key: "somethingElse",
        };
        let (store, report) =
            ReadingStateStore::load_with_clock(storage, test_clock(), HISTORY_LIMIT).unwrap();
        assert!(report.is_clean());
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_mutation_writes_only_affected_key() {
        let mut store = empty_store();
        store.add_favorite(favorite("1")).unwrap();
        assert!(store.storage().get(HISTORY_KEY).unwrap().is_none());

        let mut store = empty_store();
        store.record_chapter_read(manga("A"), chapter("1", 1)).unwrap();
        assert!(store.storage().get(FAVORITES_KEY).unwrap().is_none());
    }
}
