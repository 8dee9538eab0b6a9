//! Console output formatting with ANSI color support.
//!
//! Provides styled terminal output with automatic TTY detection
//! and respect for the NO_COLOR environment variable.

use crate::models::{ChapterSummary, FavoriteEntry, HistoryEntry, MangaSummary};
use std::io::{self, IsTerminal};

/// ANSI style codes for terminal formatting.
#[derive(Debug, Clone, Copy)]
pub enum Style {
    Bold,
    Dim,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
}

impl Style {
    /// Returns the ANSI escape code for this style.
    fn code(self) -> &'static str {
        match self {
            Style::Bold => "1",
            Style::Dim => "2",
            Style::Red => "31",
            Style::Green => "32",
            Style::Yellow => "33",
            Style::Blue => "34",
            Style::Magenta => "35",
            Style::Cyan => "36",
            Style::Gray => "90",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Console output handler with color support detection.
#[derive(Debug)]
pub struct Console {
    colors_enabled: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// Creates a new Console instance, detecting color support.
    ///
    /// Colors are disabled if:
    /// - The `NO_COLOR` environment variable is set
    /// - stdout is not a terminal (TTY)
    pub fn new() -> Self {
        let colors_enabled = std::env::var("NO_COLOR").is_err() && io::stdout().is_terminal();

        Self { colors_enabled }
    }

    /// Creates a Console with colors explicitly enabled or disabled.
    pub fn with_colors(enabled: bool) -> Self {
        Self {
            colors_enabled: enabled,
        }
    }

    /// Applies ANSI styles to text if colors are enabled.
    pub fn style(&self, text: &str, styles: &[Style]) -> String {
        if !self.colors_enabled || styles.is_empty() {
            return text.to_string();
        }

        let codes: Vec<&str> = styles.iter().map(|s| s.code()).collect();
        format!("\x1b[{}m{}{}", codes.join(";"), text, RESET)
    }

    /// Creates a colored label like `[INFO]`.
    pub fn label(&self, label: &str, color: Style) -> String {
        let styled = self.style(label, &[color, Style::Bold]);
        format!("[{}]", styled)
    }

    /// Prints an info message with blue `[INFO]` label.
    pub fn info(&self, message: &str) {
        println!("{} {}", self.label("INFO", Style::Blue), message);
    }

    /// Prints a success message with green `[OK]` label.
    pub fn success(&self, message: &str) {
        println!("{} {}", self.label("OK", Style::Green), message);
    }

    /// Prints a warning message with yellow `[WARN]` label.
    pub fn warning(&self, message: &str) {
        println!("{} {}", self.label("WARN", Style::Yellow), message);
    }

    /// Prints an error message with red `[ERROR]` label.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.label("ERROR", Style::Red), message);
    }

    /// Prints a section header in magenta bold.
    pub fn section(&self, message: &str) {
        println!();
        println!("{}", self.style(message, &[Style::Magenta, Style::Bold]));
    }

    /// Prints an indented line.
    pub fn item(&self, line: &str) {
        println!("  {}", line);
    }

    /// Returns text styled as muted (dim gray).
    pub fn muted(&self, text: &str) -> String {
        self.style(text, &[Style::Gray, Style::Dim])
    }

    /// Formats a rating like `9.8`.
    pub fn rating(&self, rating: f64) -> String {
        self.style(&format!("{:.1}", rating), &[Style::Yellow, Style::Bold])
    }

    /// One-line summary of a catalog title.
    pub fn manga_line(&self, manga: &MangaSummary) -> String {
        format!(
            "{} {} {} {}",
            self.style(&format!("[{}]", manga.id), &[Style::Cyan]),
            self.style(&manga.title, &[Style::Bold]),
            self.rating(manga.rating),
            self.muted(&first_genres(&manga.genres)),
        )
    }

    /// One-line summary of a favorite.
    pub fn favorite_line(&self, entry: &FavoriteEntry) -> String {
        format!(
            "{} {} {} {}",
            self.style(&format!("[{}]", entry.id), &[Style::Cyan]),
            self.style(&entry.title, &[Style::Bold]),
            self.rating(entry.rating),
            self.muted(&format!("{} · {}", entry.author, entry.status)),
        )
    }

    /// One-line summary of a chapter.
    pub fn chapter_line(&self, chapter: &ChapterSummary) -> String {
        format!(
            "{} Chapter {}: {} {}",
            self.style(&format!("[{}]", chapter.id), &[Style::Cyan]),
            chapter.number,
            chapter.title,
            self.muted(&format!("({}, {} pages)", chapter.date, chapter.pages)),
        )
    }

    /// One-line summary of a history entry.
    pub fn history_line(&self, entry: &HistoryEntry) -> String {
        format!(
            "{} chapter {}, page {} {}",
            self.style(&entry.manga_title, &[Style::Bold]),
            entry.chapter_number,
            entry.page_read,
            self.muted(&entry.last_read.format("%Y-%m-%d %H:%M").to_string()),
        )
    }
}

/// The first two genres, comma separated.
fn first_genres(genres: &[String]) -> String {
    genres.iter().take(2).cloned().collect::<Vec<_>>().join(", ")
}
