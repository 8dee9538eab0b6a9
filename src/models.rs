//! Records shared by the catalog and the reading state store.
//!
//! Field names serialize in camelCase so persisted values keep the
//! `coverImage` / `lastRead` layout readers already have on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog listing for a single manga title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub author: String,
    pub status: String,
    pub genres: Vec<String>,
    pub rating: f64,
}

impl MangaSummary {
    /// Returns true if the title contains `query`, ignoring case.
    pub fn title_matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }

    /// Returns true if the exact genre name is listed.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

/// A chapter as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub id: String,
    pub number: u32,
    pub title: String,
    /// Release date, `YYYY-MM-DD`.
    pub date: String,
    /// Number of pages in the chapter.
    pub pages: u32,
}

/// Reference to a single page image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// 1-based page number.
    pub index: u32,
    pub url: String,
}

/// A favorited title.
///
/// Uniqueness key is `id`. Entries are never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: String,
    pub title: String,
    pub cover_image: String,
    pub author: String,
    pub status: String,
    pub genres: Vec<String>,
    pub rating: f64,
}

impl From<&MangaSummary> for FavoriteEntry {
    fn from(manga: &MangaSummary) -> Self {
        Self {
            id: manga.id.clone(),
            title: manga.title.clone(),
            cover_image: manga.cover_image.clone(),
            author: manga.author.clone(),
            status: manga.status.clone(),
            genres: manga.genres.clone(),
            rating: manga.rating,
        }
    }
}

/// One line of reading history.
///
/// Uniqueness key is the `(manga_id, chapter_id)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub manga_id: String,
    pub manga_title: String,
    pub manga_cover: String,
    pub chapter_id: String,
    pub chapter_number: u32,
    pub last_read: DateTime<Utc>,
    pub page_read: u32,
}

impl HistoryEntry {
    /// Returns true if this entry is for the given manga and chapter.
    pub fn is_for(&self, manga_id: &str, chapter_id: &str) -> bool {
        self.manga_id == manga_id && self.chapter_id == chapter_id
    }
}

/// The manga fields needed to record a history entry.
#[derive(Debug, Clone, Copy)]
pub struct MangaRef<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub cover_image: &'a str,
}

impl<'a> From<&'a MangaSummary> for MangaRef<'a> {
    fn from(manga: &'a MangaSummary) -> Self {
        Self {
            id: &manga.id,
            title: &manga.title,
            cover_image: &manga.cover_image,
        }
    }
}

impl<'a> From<&'a FavoriteEntry> for MangaRef<'a> {
    fn from(entry: &'a FavoriteEntry) -> Self {
        Self {
            id: &entry.id,
            title: &entry.title,
            cover_image: &entry.cover_image,
        }
    }
}

/// The chapter fields needed to record a history entry.
#[derive(Debug, Clone, Copy)]
pub struct ChapterRef<'a> {
    pub id: &'a str,
    pub number: u32,
}

impl<'a> From<&'a ChapterSummary> for ChapterRef<'a> {
    fn from(chapter: &'a ChapterSummary) -> Self {
        Self {
            id: &chapter.id,
            number: chapter.number,
        }
    }
}
