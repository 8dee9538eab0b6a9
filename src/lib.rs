//! Hondana - manga discovery, favorites and reading history.
//!
//! This library provides functionality for:
//! - Looking up titles, chapters and pages through a [`Catalog`]
//! - Filtering the catalog by title and genre
//! - Paginating chapter pages in a [`ReaderSession`]
//! - Keeping favorites and reading history in a [`ReadingStateStore`]
//!   persisted to key-value storage

pub mod catalog;
pub mod clock;
pub mod config;
pub mod console;
pub mod discover;
pub mod error;
pub mod models;
pub mod reader;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use catalog::{Catalog, MangaDetails, MockCatalog};
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use console::Console;
pub use discover::DiscoverFilter;
pub use error::{CatalogError, ConfigError, StorageError, StoreError};
pub use models::{ChapterRef, ChapterSummary, FavoriteEntry, HistoryEntry, ImageRef, MangaRef, MangaSummary};
pub use reader::ReaderSession;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{LoadReport, ReadingState, ReadingStateStore};
