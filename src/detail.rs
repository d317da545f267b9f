use thiserror::Error;

use crate::history::HistorySource;
use crate::loader::{LoadOutcome, INVALID_LINK};
use crate::route::{Navigation, ReadComicState};
use crate::types::{Chapter, ComicDetail, ComicSummary, DetailState, HistoryRecord};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("No chapters available")]
    NoChapters,

    #[error("Comic not found")]
    NoComic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadState {
    Loading,
    Failed(String),
    Loaded,
}

/// What the view shows, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase<'a> {
    NotFound,
    Loading,
    Error(&'a str),
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

/// One mount of the comic detail view.
///
/// Built from the inbound navigation state and a history snapshot; the detail
/// record arrives later through [`DetailView::apply_detail`].
#[derive(Debug, Clone)]
pub struct DetailView {
    route_id: String,
    comic: Option<ComicSummary>,
    processed_link: Option<String>,
    detail: Option<ComicDetail>,
    history: Option<HistoryRecord>,
    load: LoadState,
    selected: usize,
    mount_id: u64,
}

impl DetailView {
    pub fn mount(
        route_id: &str,
        state: DetailState,
        history: &dyn HistorySource,
        mount_id: u64,
    ) -> Self {
        let DetailState {
            comic,
            processed_link,
        } = state;
        let processed_link = processed_link.filter(|link| !link.is_empty());

        let load = if processed_link.is_some() {
            LoadState::Loading
        } else {
            tracing::warn!(route_id, "no comic link in navigation state");
            LoadState::Failed(INVALID_LINK.to_string())
        };

        Self {
            route_id: route_id.to_string(),
            comic,
            processed_link,
            detail: None,
            history: history.get_history(route_id),
            load,
            selected: 0,
            mount_id,
        }
    }

    /// Link to fetch for this mount, if a fetch is still owed.
    pub fn fetch_link(&self) -> Option<&str> {
        match self.load {
            LoadState::Loading => self.processed_link.as_deref(),
            _ => None,
        }
    }

    /// Install the fetch result. Results from another mount are dropped.
    pub fn apply_detail(&mut self, mount_id: u64, outcome: LoadOutcome) -> bool {
        if mount_id != self.mount_id {
            tracing::debug!(
                mount_id,
                current = self.mount_id,
                "dropping detail for a previous mount"
            );
            return false;
        }

        match outcome {
            Ok(detail) => {
                self.detail = Some(detail);
                self.load = LoadState::Loaded;
            }
            Err(message) => {
                self.detail = Some(ComicDetail::degraded());
                self.load = LoadState::Failed(message);
            }
        }
        self.selected = 0;
        true
    }

    pub fn phase(&self) -> Phase<'_> {
        if self.comic.is_none() {
            return Phase::NotFound;
        }
        match &self.load {
            LoadState::Loading => Phase::Loading,
            LoadState::Failed(message) => Phase::Error(message),
            LoadState::Loaded => Phase::Ready,
        }
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn mount_id(&self) -> u64 {
        self.mount_id
    }

    pub fn comic(&self) -> Option<&ComicSummary> {
        self.comic.as_ref()
    }

    pub fn detail(&self) -> Option<&ComicDetail> {
        self.detail.as_ref()
    }

    pub fn history(&self) -> Option<&HistoryRecord> {
        self.history.as_ref()
    }

    pub fn chapters(&self) -> &[Chapter] {
        self.detail
            .as_ref()
            .map(|d| d.chapters.as_slice())
            .unwrap_or_default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_chapter(&self) -> Option<&Chapter> {
        self.chapters().get(self.selected)
    }

    /// History exists and points somewhere other than the summary's chapter.
    pub fn show_resume(&self) -> bool {
        match (&self.history, &self.comic) {
            (Some(history), Some(comic)) => history.last_chapter != comic.chapter,
            _ => false,
        }
    }

    /// The chapter history says was read last.
    pub fn is_current(&self, chapter: &Chapter) -> bool {
        self.history
            .as_ref()
            .is_some_and(|h| h.last_chapter == chapter.chapter)
    }

    pub fn move_cursor(&mut self, dir: Move, columns: usize) {
        let len = self.chapters().len();
        if len == 0 {
            return;
        }
        let columns = columns.max(1);
        self.selected = match dir {
            Move::Left => self.selected.saturating_sub(1),
            Move::Right => (self.selected + 1).min(len - 1),
            Move::Up if self.selected >= columns => self.selected - columns,
            Move::Down if self.selected + columns < len => self.selected + columns,
            Move::Up | Move::Down => self.selected,
        };
    }

    /// Read `chapter`, or the first chapter when none is given.
    pub fn read_comic(&self, chapter: Option<&Chapter>) -> Result<Navigation, ReadError> {
        let comic = self.comic.as_ref().ok_or(ReadError::NoComic)?;
        let chapter = match chapter {
            Some(chapter) => chapter,
            None => self.chapters().first().ok_or(ReadError::NoChapters)?,
        };

        Ok(Navigation::ReadComic {
            route_id: self.route_id.clone(),
            chapter: chapter.chapter.clone(),
            state: ReadComicState {
                chapter_link: chapter.link.clone(),
                comic_title: comic.title.clone(),
                chapter_number: chapter.chapter.clone(),
                comic_detail_state: DetailState {
                    comic: Some(comic.clone()),
                    processed_link: self.processed_link.clone(),
                },
            },
        })
    }

    /// Read the chapter recorded in history. `None` without history.
    pub fn continue_reading(&self) -> Option<Result<Navigation, ReadError>> {
        let chapter = self.history.as_ref()?.as_chapter();
        Some(self.read_comic(Some(&chapter)))
    }

    pub fn go_home(&self) -> Navigation {
        Navigation::Home
    }
}
