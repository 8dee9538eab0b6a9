//! Hondana CLI - browse manga and keep track of what you read.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hondana::catalog::{Catalog, MockCatalog, fetch_manga_details};
use hondana::config::Config;
use hondana::console::Console;
use hondana::discover::{self, DiscoverFilter};
use hondana::error::CatalogError;
use hondana::models::{FavoriteEntry, MangaRef};
use hondana::reader::ReaderSession;
use hondana::storage::FileStorage;
use hondana::store::ReadingStateStore;

/// Manga discovery and reading tracker.
#[derive(Parser, Debug)]
#[command(name = "hondana")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse the catalog, optionally filtered by title and genre.
    Discover {
        /// Part of the title to look for.
        query: Option<String>,

        /// Only show titles in this genre.
        #[arg(long)]
        genre: Option<String>,
    },

    /// Search titles by name.
    Search {
        /// Part of the title to look for.
        query: String,
    },

    /// Show a title and its chapters.
    Details {
        /// Manga id.
        id: String,
    },

    /// Open a chapter and record it in the reading history.
    Read {
        /// Manga id.
        manga_id: String,

        /// Chapter id.
        chapter_id: String,

        /// Page to open (1-based).
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// Add a title to favorites, or remove it if already there.
    Favorite {
        /// Manga id.
        id: String,
    },

    /// Remove a title from favorites.
    Unfavorite {
        /// Manga id.
        id: String,
    },

    /// List favorites.
    Favorites,

    /// Show the reading history, newest first.
    History {
        /// Maximum number of entries to show.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let console = Console::new();

    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let storage = FileStorage::new(config.data_dir()?);
    let (mut store, report) = ReadingStateStore::load(storage, config.storage.history_limit)
        .context("Failed to load reading state")?;

    for recovered in &report.recovered {
        console.warning(&format!(
            "Saved '{}' data was unreadable and has been reset ({})",
            recovered.key, recovered.error
        ));
    }

    let catalog = MockCatalog::new();

    match args.command {
        None => show_home(&console, &catalog, &store, &config).await,
        Some(Command::Discover { query, genre }) => {
            let genre = match genre {
                Some(name) => match discover::canonical_genre(&name) {
                    Some(canonical) => Some(canonical.to_string()),
                    None => {
                        console.error(&format!("Unknown genre: {}", name));
                        console.info(&format!("Genres: {}", discover::GENRES.join(", ")));
                        return Ok(());
                    }
                },
                None => None,
            };
            let filter = DiscoverFilter::new(query.unwrap_or_default(), genre);

            let all = match catalog.fetch_catalog().await {
                Ok(all) => all,
                Err(e) => return show_catalog_error(&console, &e),
            };
            let found = filter.apply(&all);

            console.section(&format!("{} manga found", found.len()));
            for manga in found {
                console.item(&console.manga_line(manga));
            }
            Ok(())
        }
        Some(Command::Search { query }) => {
            let results = catalog.search(&query).await;
            if results.is_empty() {
                console.info(&format!("No manga found for \"{}\"", query));
                return Ok(());
            }
            console.section(&format!("Results for \"{}\"", query));
            for manga in &results {
                console.item(&console.manga_line(manga));
            }
            Ok(())
        }
        Some(Command::Details { id }) => {
            let details = match fetch_manga_details(&catalog, &id).await {
                Ok(details) => details,
                Err(e) => return show_catalog_error(&console, &e),
            };
            let manga = &details.manga;

            console.section(&manga.title);
            console.item(&format!(
                "{} · {} · {}",
                manga.author,
                manga.status,
                console.rating(manga.rating)
            ));
            console.item(&console.muted(&manga.genres.join(", ")));
            console.item(&manga.description);
            if store.is_favorite(&manga.id) {
                console.item(&console.muted("In your favorites"));
            }

            console.section("Chapters");
            for chapter in &details.chapters {
                console.item(&console.chapter_line(chapter));
            }
            Ok(())
        }
        Some(Command::Read {
            manga_id,
            chapter_id,
            page,
        }) => {
            let details = match fetch_manga_details(&catalog, &manga_id).await {
                Ok(details) => details,
                Err(e) => return show_catalog_error(&console, &e),
            };
            let Some(chapter) = details.chapters.iter().find(|c| c.id == chapter_id) else {
                return show_catalog_error(
                    &console,
                    &CatalogError::NotFound(format!("chapter {}", chapter_id)),
                );
            };
            let pages = match catalog.fetch_pages(&chapter.id).await {
                Ok(pages) => pages,
                Err(e) => return show_catalog_error(&console, &e),
            };

            let session = ReaderSession::open_at(&manga_id, chapter.clone(), pages, page);
            store
                .record_page_read(
                    MangaRef::from(&details.manga),
                    chapter.into(),
                    session.current_page(),
                )
                .context("Reading history was not saved")?;

            console.section(&format!(
                "{} - Chapter {}: {}",
                details.manga.title, chapter.number, chapter.title
            ));
            if let Some(image) = session.current_image() {
                console.item(&format!(
                    "Page {} of {}: {}",
                    session.current_page(),
                    session.page_count(),
                    image.url
                ));
            }
            if let Some(prev) = session.prev_chapter(&details.chapters) {
                console.item(&console.muted(&format!("Previous: {}", prev.id)));
            }
            if let Some(next) = session.next_chapter(&details.chapters) {
                console.item(&console.muted(&format!("Next: {}", next.id)));
            }
            Ok(())
        }
        Some(Command::Favorite { id }) => {
            let manga = match catalog.fetch_details(&id).await {
                Ok(manga) => manga,
                Err(e) => return show_catalog_error(&console, &e),
            };
            let added = store
                .toggle_favorite(FavoriteEntry::from(&manga))
                .context("Favorites were not saved")?;
            if added {
                console.success(&format!("Added {} to favorites", manga.title));
            } else {
                console.success(&format!("Removed {} from favorites", manga.title));
            }
            Ok(())
        }
        Some(Command::Unfavorite { id }) => {
            if !store.is_favorite(&id) {
                console.info(&format!("{} is not in your favorites", id));
                return Ok(());
            }
            store
                .remove_favorite(&id)
                .context("Favorites were not saved")?;
            console.success(&format!("Removed {} from favorites", id));
            Ok(())
        }
        Some(Command::Favorites) => {
            let favorites = store.favorites();
            if favorites.is_empty() {
                console.info("Your favorites list is empty");
                return Ok(());
            }
            console.section(&format!("{} favorites", favorites.len()));
            for entry in favorites {
                console.item(&console.favorite_line(entry));
            }
            Ok(())
        }
        Some(Command::History { limit }) => {
            let history = store.recent_history(limit.unwrap_or(usize::MAX));
            if history.is_empty() {
                console.info("Nothing read yet");
                return Ok(());
            }
            console.section("Reading history");
            for entry in history {
                console.item(&console.history_line(entry));
            }
            Ok(())
        }
    }
}

/// Prints continue-reading, popular and recently updated titles.
async fn show_home(
    console: &Console,
    catalog: &dyn Catalog,
    store: &ReadingStateStore<FileStorage>,
    config: &Config,
) -> Result<()> {
    let recent = store.recent_history(config.display.recent_history);
    if !recent.is_empty() {
        console.section("Continue reading");
        for entry in recent {
            console.item(&console.history_line(entry));
        }
    }

    let all = match catalog.fetch_catalog().await {
        Ok(all) => all,
        Err(e) => return show_catalog_error(console, &e),
    };

    console.section("Popular");
    for manga in discover::popular(&all, config.display.popular_count) {
        console.item(&console.manga_line(manga));
    }

    console.section("Recent updates");
    for manga in discover::recent_updates(&all) {
        console.item(&console.manga_line(manga));
    }
    Ok(())
}

/// Reports a catalog failure to the user. Catalog failures are not retried.
fn show_catalog_error(console: &Console, error: &CatalogError) -> Result<()> {
    match error {
        CatalogError::NotFound(what) => console.error(&format!("Not found: {}", what)),
        CatalogError::Unavailable(reason) => console.error(reason),
    }
    Ok(())
}
