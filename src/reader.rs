//! Page pagination within a chapter and navigation between chapters.

use crate::models::{ChapterSummary, ImageRef};

/// An open chapter in the reader.
#[derive(Debug, Clone)]
pub struct ReaderSession {
    manga_id: String,
    chapter: ChapterSummary,
    pages: Vec<ImageRef>,
    /// 1-based.
    current_page: u32,
}

impl ReaderSession {
    /// Opens `chapter` on its first page.
    pub fn open(manga_id: impl Into<String>, chapter: ChapterSummary, pages: Vec<ImageRef>) -> Self {
        Self {
            manga_id: manga_id.into(),
            chapter,
            pages,
            current_page: 1,
        }
    }

    /// Opens `chapter` on `page`, clamped to the available pages.
    pub fn open_at(
        manga_id: impl Into<String>,
        chapter: ChapterSummary,
        pages: Vec<ImageRef>,
        page: u32,
    ) -> Self {
        let mut session = Self::open(manga_id, chapter, pages);
        session.current_page = page.clamp(1, session.page_count().max(1));
        session
    }

    pub fn manga_id(&self) -> &str {
        &self.manga_id
    }

    pub fn chapter(&self) -> &ChapterSummary {
        &self.chapter
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Image for the current page, if the chapter has any pages.
    pub fn current_image(&self) -> Option<&ImageRef> {
        self.pages.get(self.current_page as usize - 1)
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.page_count()
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    /// Advances one page. Returns false on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Goes back one page. Returns false on the first page.
    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev_page() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// The chapter following this one in `chapters`, by chapter number.
    pub fn next_chapter<'a>(&self, chapters: &'a [ChapterSummary]) -> Option<&'a ChapterSummary> {
        chapters
            .iter()
            .filter(|c| c.number > self.chapter.number)
            .min_by_key(|c| c.number)
    }

    /// The chapter preceding this one in `chapters`, by chapter number.
    ///
    /// Returns `None` on the first chapter.
    pub fn prev_chapter<'a>(&self, chapters: &'a [ChapterSummary]) -> Option<&'a ChapterSummary> {
        chapters
            .iter()
            .filter(|c| c.number < self.chapter.number)
            .max_by_key(|c| c.number)
    }
}
