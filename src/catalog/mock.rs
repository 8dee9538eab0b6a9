//! In-memory catalog seeded with a fixed set of titles.

use super::Catalog;
use crate::error::CatalogError;
use crate::models::{ChapterSummary, ImageRef, MangaSummary};
use async_trait::async_trait;
use std::collections::HashMap;

/// Base URL for generated page images.
const PAGE_IMAGE_BASE: &str = "https://picsum.photos/800/1200";

/// Catalog backed by built-in data. Resolves without delay.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    manga: Vec<MangaSummary>,
    chapters: HashMap<String, Vec<ChapterSummary>>,
    pages: HashMap<String, Vec<ImageRef>>,
    available: bool,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    /// Creates a catalog with the built-in titles.
    pub fn new() -> Self {
        Self {
            manga: seed_manga(),
            chapters: seed_chapters(),
            pages: seed_pages(),
            available: true,
        }
    }

    /// Creates a catalog whose every fallible call reports the data as
    /// unavailable.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        if self.available {
            Ok(())
        } else {
            Err(CatalogError::Unavailable(
                "Failed to load manga data".to_string(),
            ))
        }
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<MangaSummary>, CatalogError> {
        self.check_available()?;
        Ok(self.manga.clone())
    }

    async fn fetch_details(&self, id: &str) -> Result<MangaSummary, CatalogError> {
        self.check_available()?;
        self.manga
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("manga {}", id)))
    }

    async fn fetch_chapters(&self, manga_id: &str) -> Result<Vec<ChapterSummary>, CatalogError> {
        self.check_available()?;
        self.chapters
            .get(manga_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("chapters for manga {}", manga_id)))
    }

    async fn fetch_pages(&self, chapter_id: &str) -> Result<Vec<ImageRef>, CatalogError> {
        self.check_available()?;
        self.pages
            .get(chapter_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("pages for chapter {}", chapter_id)))
    }

    async fn search(&self, query: &str) -> Vec<MangaSummary> {
        if !self.available {
            return Vec::new();
        }
        self.manga
            .iter()
            .filter(|m| m.title_matches(query))
            .cloned()
            .collect()
    }
}

#[allow(clippy::too_many_arguments)]
fn manga(
    id: &str,
    title: &str,
    description: &str,
    cover_image: &str,
    author: &str,
    status: &str,
    genres: &[&str],
    rating: f64,
) -> MangaSummary {
    MangaSummary {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        cover_image: cover_image.to_string(),
        author: author.to_string(),
        status: status.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        rating,
    }
}

fn seed_manga() -> Vec<MangaSummary> {
    vec![
        manga(
            "1",
            "One Piece",
            "Follow Monkey D. Luffy and his swashbuckling crew in their search for the ultimate treasure, One Piece.",
            "https://cdn.myanimelist.net/images/manga/3/55539.jpg",
            "Eiichiro Oda",
            "Ongoing",
            &["Action", "Adventure", "Comedy", "Fantasy"],
            9.8,
        ),
        manga(
            "2",
            "Berserk",
            "Guts, a former mercenary now known as the \"Black Swordsman,\" seeks revenge.",
            "https://cdn.myanimelist.net/images/manga/1/157897.jpg",
            "Kentaro Miura",
            "Ongoing",
            &["Action", "Adventure", "Drama", "Fantasy", "Horror"],
            9.7,
        ),
        manga(
            "3",
            "Vagabond",
            "A portrayal of the life of Japanese swordsman Miyamoto Musashi.",
            "https://cdn.myanimelist.net/images/manga/1/259070.jpg",
            "Takehiko Inoue",
            "On Hiatus",
            &["Action", "Adventure", "Drama", "Historical"],
            9.5,
        ),
        manga(
            "4",
            "Vinland Saga",
            "Thorfinn pursues a journey with his father's killer in order to take revenge.",
            "https://cdn.myanimelist.net/images/manga/2/188925.jpg",
            "Makoto Yukimura",
            "Ongoing",
            &["Action", "Adventure", "Drama", "Historical"],
            9.3,
        ),
        manga(
            "5",
            "Attack on Titan",
            "In a world where giant humanoid Titans prey on humans, Eren joins the scouting legion to get revenge.",
            "https://cdn.myanimelist.net/images/manga/2/37846.jpg",
            "Hajime Isayama",
            "Completed",
            &["Action", "Drama", "Fantasy", "Horror"],
            9.4,
        ),
        manga(
            "6",
            "Chainsaw Man",
            "Denji has a simple dream: to live a happy and peaceful life, spending time with a girl he likes.",
            "https://cdn.myanimelist.net/images/manga/3/216464.jpg",
            "Tatsuki Fujimoto",
            "Ongoing",
            &["Action", "Adventure", "Comedy", "Horror"],
            9.2,
        ),
        manga(
            "7",
            "Jujutsu Kaisen",
            "A boy swallows a cursed talisman - the finger of a demon - and becomes cursed himself.",
            "https://cdn.myanimelist.net/images/manga/3/211050.jpg",
            "Gege Akutami",
            "Ongoing",
            &["Action", "Fantasy", "Horror"],
            9.1,
        ),
        manga(
            "8",
            "Demon Slayer",
            "Tanjiro sets out to become a demon slayer after his family is slaughtered and his sister turned into a demon.",
            "https://cdn.myanimelist.net/images/manga/3/179023.jpg",
            "Koyoharu Gotouge",
            "Completed",
            &["Action", "Fantasy", "Historical"],
            9.0,
        ),
    ]
}

fn chapter(id: &str, number: u32, title: &str, date: &str, pages: u32) -> ChapterSummary {
    ChapterSummary {
        id: id.to_string(),
        number,
        title: title.to_string(),
        date: date.to_string(),
        pages,
    }
}

fn seed_chapters() -> HashMap<String, Vec<ChapterSummary>> {
    HashMap::from([
        (
            "1".to_string(),
            vec![
                chapter("101", 1, "Romance Dawn", "2023-01-01", 45),
                chapter("102", 2, "They Call Him Luffy", "2023-01-08", 42),
                chapter("103", 3, "Enter Zoro", "2023-01-15", 40),
            ],
        ),
        (
            "2".to_string(),
            vec![
                chapter("201", 1, "The Black Swordsman", "2023-01-01", 48),
                chapter("202", 2, "The Brand", "2023-01-08", 46),
                chapter("203", 3, "The Guardians of Desire", "2023-01-15", 44),
            ],
        ),
    ])
}

/// Generates `count` page references whose image seeds start at `first_seed`.
fn generate_pages(count: u32, first_seed: u32) -> Vec<ImageRef> {
    (0..count)
        .map(|i| ImageRef {
            index: i + 1,
            url: format!("{}?random={}", PAGE_IMAGE_BASE, first_seed + i),
        })
        .collect()
}

fn seed_pages() -> HashMap<String, Vec<ImageRef>> {
    HashMap::from([
        ("101".to_string(), generate_pages(45, 1)),
        ("102".to_string(), generate_pages(42, 100)),
        ("201".to_string(), generate_pages(48, 200)),
    ])
}
