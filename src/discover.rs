//! Discovery helpers: title/genre filtering and home page slices.

use crate::models::MangaSummary;

/// Genre choices offered by the discovery filter. `All` disables the
/// genre condition.
pub const GENRES: &[&str] = &[
    "All",
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Fantasy",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Slice of Life",
    "Sports",
];

/// Wildcard genre.
pub const ALL_GENRES: &str = "All";

/// Number of titles in the "recent updates" strip.
pub const RECENT_UPDATES: usize = 6;

/// Title and genre filter for the discovery view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverFilter {
    /// Case-insensitive substring of the title. Empty matches everything.
    pub query: String,
    /// Exact genre name. `None` or `"All"` matches everything.
    pub genre: Option<String>,
}

impl DiscoverFilter {
    pub fn new(query: impl Into<String>, genre: Option<String>) -> Self {
        Self {
            query: query.into(),
            genre,
        }
    }

    /// Returns true if `manga` passes both conditions.
    pub fn matches(&self, manga: &MangaSummary) -> bool {
        let genre_ok = match self.genre.as_deref() {
            None | Some(ALL_GENRES) => true,
            Some(genre) => manga.has_genre(genre),
        };
        genre_ok && manga.title_matches(&self.query)
    }

    /// Filters `catalog`, keeping catalog order.
    pub fn apply<'a>(&self, catalog: &'a [MangaSummary]) -> Vec<&'a MangaSummary> {
        catalog.iter().filter(|m| self.matches(m)).collect()
    }
}

/// The first `count` titles of the catalog.
pub fn popular(catalog: &[MangaSummary], count: usize) -> &[MangaSummary] {
    &catalog[..count.min(catalog.len())]
}

/// Titles shown as recently updated.
pub fn recent_updates(catalog: &[MangaSummary]) -> &[MangaSummary] {
    popular(catalog, RECENT_UPDATES)
}

/// Returns the canonical spelling of a genre name, ignoring case.
pub fn canonical_genre(name: &str) -> Option<&'static str> {
    GENRES
        .iter()
        .copied()
        .find(|g| g.eq_ignore_ascii_case(name))
}
