//! Catalog trait for manga metadata lookups.
//!
//! The catalog is read-only and uncached. Implementations resolve
//! asynchronously; callers that navigate away simply drop the future.

mod mock;

pub use mock::MockCatalog;

use crate::error::CatalogError;
use crate::models::{ChapterSummary, ImageRef, MangaSummary};
use async_trait::async_trait;

/// Source of manga, chapter and page data.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches every listed title.
    async fn fetch_catalog(&self) -> Result<Vec<MangaSummary>, CatalogError>;

    /// Fetches a single title by id.
    async fn fetch_details(&self, id: &str) -> Result<MangaSummary, CatalogError>;

    /// Fetches the chapter list of a title.
    async fn fetch_chapters(&self, manga_id: &str) -> Result<Vec<ChapterSummary>, CatalogError>;

    /// Fetches the page images of a chapter.
    async fn fetch_pages(&self, chapter_id: &str) -> Result<Vec<ImageRef>, CatalogError>;

    /// Returns titles whose name contains `query`, ignoring case.
    ///
    /// Never fails; no match gives an empty list.
    async fn search(&self, query: &str) -> Vec<MangaSummary>;
}

/// Details and chapters of one title, fetched together.
#[derive(Debug, Clone)]
pub struct MangaDetails {
    pub manga: MangaSummary,
    pub chapters: Vec<ChapterSummary>,
}

/// Fetches details and chapter list concurrently.
pub async fn fetch_manga_details(
    catalog: &dyn Catalog,
    id: &str,
) -> Result<MangaDetails, CatalogError> {
    let (manga, chapters) =
        futures::try_join!(catalog.fetch_details(id), catalog.fetch_chapters(id))?;
    Ok(MangaDetails { manga, chapters })
}
