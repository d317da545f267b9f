use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::api::ComicApi;
use crate::detail::{DetailView, Move, Phase, ReadError};
use crate::error::KomikError;
use crate::event::Event;
use crate::history::HistorySource;
use crate::loader;
use crate::route::Navigation;
use crate::types::DetailState;

pub struct App {
    pub view: DetailView,
    /// Blocking message; swallows all keys but dismissal.
    pub alert: Option<String>,
    pub error: Option<String>,
    pub should_quit: bool,
    /// Set when the user leaves the view; printed by `main` for the router.
    pub navigation: Option<Navigation>,
    pub grid_columns: usize,
    pub ticks: usize,
    route_id: String,
    state: DetailState,
    mount_cancel: CancellationToken,
    api: Arc<dyn ComicApi>,
    history: Arc<dyn HistorySource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    /// Create the app and mount the view. Must run inside a tokio runtime.
    pub fn new(
        route_id: String,
        state: DetailState,
        api: Arc<dyn ComicApi>,
        history: Arc<dyn HistorySource>,
        grid_columns: usize,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let view = DetailView::mount(&route_id, state.clone(), history.as_ref(), 0);
        let app = Self {
            view,
            alert: None,
            error: None,
            should_quit: false,
            navigation: None,
            grid_columns,
            ticks: 0,
            route_id,
            state,
            mount_cancel: CancellationToken::new(),
            api,
            history,
            action_tx,
        };
        app.spawn_load_detail();
        app
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.alert.is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Action::DismissAlert,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('h') | KeyCode::Left => Action::MoveCursor(Move::Left),
            KeyCode::Char('l') | KeyCode::Right => Action::MoveCursor(Move::Right),
            KeyCode::Char('k') | KeyCode::Up => Action::MoveCursor(Move::Up),
            KeyCode::Char('j') | KeyCode::Down => Action::MoveCursor(Move::Down),
            KeyCode::Enter => Action::ReadSelected,
            KeyCode::Char('s') => Action::ReadFromStart,
            KeyCode::Char('c') => Action::ContinueReading,
            KeyCode::Char('o') => Action::OpenCover,
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Char('H') => Action::GoHome,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if self.error.is_some() && !matches!(action, Action::Tick | Action::None) {
            self.error = None;
        }

        match action {
            Action::Quit => {
                self.unmount();
                self.should_quit = true;
            }
            Action::Tick => {
                self.ticks = self.ticks.wrapping_add(1);
            }
            Action::Reload => self.remount(),
            Action::DetailLoaded { outcome, mount_id } => {
                self.view.apply_detail(mount_id, outcome);
            }
            Action::MoveCursor(dir) => {
                self.view.move_cursor(dir, self.grid_columns);
            }
            Action::ReadSelected => {
                if self.is_ready() {
                    if let Some(chapter) = self.view.selected_chapter().cloned() {
                        let result = self.view.read_comic(Some(&chapter));
                        self.finish_read(result);
                    }
                }
            }
            Action::ReadFromStart => {
                if self.is_ready() {
                    let result = self.view.read_comic(None);
                    self.finish_read(result);
                }
            }
            Action::ContinueReading => {
                if self.is_ready() && self.view.show_resume() {
                    if let Some(result) = self.view.continue_reading() {
                        self.finish_read(result);
                    }
                }
            }
            Action::GoHome => {
                let home = self.view.go_home();
                self.navigate(home);
            }
            Action::OpenCover => self.open_cover(),
            Action::DismissAlert => {
                self.alert = None;
            }
            Action::Error(msg) => {
                self.error = Some(msg);
            }
            Action::None => {}
        }
    }

    fn is_ready(&self) -> bool {
        self.view.phase() == Phase::Ready
    }

    fn finish_read(&mut self, result: Result<Navigation, ReadError>) {
        match result {
            Ok(nav) => self.navigate(nav),
            Err(e) => {
                tracing::info!(route_id = %self.route_id, "cannot read: {}", e);
                self.alert = Some(e.to_string());
            }
        }
    }

    fn navigate(&mut self, nav: Navigation) {
        tracing::debug!(path = %nav.path(), "navigating");
        self.unmount();
        self.navigation = Some(nav);
        self.should_quit = true;
    }

    fn open_cover(&self) {
        let Some(comic) = self.view.comic() else {
            return;
        };
        if comic.image.is_empty() {
            return;
        }
        if let Err(e) = open::that(&comic.image) {
            self.action_tx.send(KomikError::from(e).into()).ok();
        }
    }

    fn remount(&mut self) {
        self.unmount();
        let mount_id = self.view.mount_id() + 1;
        self.view = DetailView::mount(
            &self.route_id,
            self.state.clone(),
            self.history.as_ref(),
            mount_id,
        );
        self.alert = None;
        self.spawn_load_detail();
    }

    /// Cancel the in-flight fetch of the current mount.
    fn unmount(&mut self) {
        self.mount_cancel.cancel();
        self.mount_cancel = CancellationToken::new();
    }

    fn spawn_load_detail(&self) {
        let Some(link) = self.view.fetch_link().map(str::to_string) else {
            return;
        };
        let mount_id = self.view.mount_id();
        let tx = self.action_tx.clone();
        let api = Arc::clone(&self.api);
        let cancel = self.mount_cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(mount_id, "detail fetch cancelled");
                }
                outcome = loader::load_detail(api.as_ref(), &link) => {
                    tx.send(Action::DetailLoaded { outcome, mount_id }).ok();
                }
            }
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.mount_cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use crate::loader::fake::{FakeApi, Reply};
    use crate::types::{Chapter, ComicDetail, ComicSummary, HistoryRecord};
    use crossterm::event::KeyModifiers;

    fn nav_state(link: Option<&str>) -> DetailState {
        DetailState {
            comic: Some(ComicSummary {
                title: "Berserk".to_string(),
                image: String::new(),
                chapter: "372".into(),
                extra: Default::default(),
            }),
            processed_link: link.map(str::to_string),
        }
    }

    fn detail(chapters: &[(&str, &str)]) -> ComicDetail {
        ComicDetail {
            synopsis: Some("Guts.".to_string()),
            chapters: chapters
                .iter()
                .map(|(id, link)| Chapter {
                    chapter: (*id).into(),
                    link: link.to_string(),
                })
                .collect(),
            creator: Some("Miura".to_string()),
        }
    }

    fn app_with(
        reply: Reply,
        state: DetailState,
        history: MemoryHistory,
    ) -> (App, Arc<FakeApi>, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let api = Arc::new(FakeApi::new(reply));
        let app = App::new(
            "berserk".to_string(),
            state,
            api.clone(),
            Arc::new(history),
            4,
            tx,
        );
        (app, api, rx)
    }

    async fn settle(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Action>) {
        let action = rx.recv().await.expect("loader reply");
        app.update(action);
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn mount_fetches_normalized_link() {
        let (mut app, api, mut rx) = app_with(
            Reply::Detail(detail(&[("1", "L1")])),
            nav_state(Some("/komik/berserk")),
            MemoryHistory::default(),
        );
        assert_eq!(app.view.phase(), Phase::Loading);
        settle(&mut app, &mut rx).await;
        assert_eq!(app.view.phase(), Phase::Ready);
        assert_eq!(api.requested(), vec!["komik/berserk"]);
    }

    #[tokio::test]
    async fn missing_link_issues_no_request() {
        let (app, api, mut rx) = app_with(
            Reply::Detail(detail(&[])),
            nav_state(None),
            MemoryHistory::default(),
        );
        assert_eq!(app.view.phase(), Phase::Error(loader::INVALID_LINK));
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(api.requested().is_empty());
    }

    #[tokio::test]
    async fn server_message_is_displayed() {
        let (mut app, _api, mut rx) = app_with(
            Reply::Server(404, Some("X".to_string())),
            nav_state(Some("/komik/berserk")),
            MemoryHistory::default(),
        );
        settle(&mut app, &mut rx).await;
        assert_eq!(app.view.phase(), Phase::Error("X"));
        assert!(app.view.chapters().is_empty());
    }

    #[tokio::test]
    async fn read_from_start_navigates_to_first_chapter() {
        let (mut app, _api, mut rx) = app_with(
            Reply::Detail(detail(&[("1", "L1"), ("2", "L2")])),
            nav_state(Some("/komik/berserk")),
            MemoryHistory::default(),
        );
        settle(&mut app, &mut rx).await;
        let action = app.handle_event(key(KeyCode::Char('s')));
        app.update(action);

        assert!(app.should_quit);
        let nav = app.navigation.clone().unwrap();
        assert_eq!(nav.path(), "/read-comic/berserk/chapter-1");
        let Navigation::ReadComic { state, .. } = nav else {
            panic!("expected a reader route");
        };
        assert_eq!(state.chapter_link, "L1");
    }

    #[tokio::test]
    async fn read_from_start_without_chapters_alerts() {
        let (mut app, _api, mut rx) = app_with(
            Reply::Detail(detail(&[])),
            nav_state(Some("/komik/berserk")),
            MemoryHistory::default(),
        );
        settle(&mut app, &mut rx).await;
        app.update(Action::ReadFromStart);

        assert!(app.navigation.is_none());
        assert!(!app.should_quit);
        assert_eq!(app.alert.as_deref(), Some("No chapters available"));

        // the alert swallows everything but dismissal
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('q'))),
            Action::None
        ));
        let action = app.handle_event(key(KeyCode::Enter));
        app.update(action);
        assert!(app.alert.is_none());
    }

    #[tokio::test]
    async fn enter_reads_selected_chapter() {
        let (mut app, _api, mut rx) = app_with(
            Reply::Detail(detail(&[("1", "L1"), ("2", "L2"), ("3", "L3")])),
            nav_state(Some("/komik/berserk")),
            MemoryHistory::default(),
        );
        settle(&mut app, &mut rx).await;
        app.update(Action::MoveCursor(Move::Right));
        app.update(Action::MoveCursor(Move::Right));
        app.update(Action::ReadSelected);
        assert_eq!(
            app.navigation.as_ref().unwrap().path(),
            "/read-comic/berserk/chapter-3"
        );
    }

    #[tokio::test]
    async fn continue_reading_uses_history() {
        let history = MemoryHistory::default().with(
            "berserk",
            HistoryRecord {
                last_chapter: "100".into(),
                last_chapter_link: "/b/100".to_string(),
            },
        );
        let (mut app, _api, mut rx) = app_with(
            Reply::Detail(detail(&[("1", "L1")])),
            nav_state(Some("/komik/berserk")),
            history,
        );
        settle(&mut app, &mut rx).await;
        app.update(Action::ContinueReading);
        assert_eq!(
            app.navigation.as_ref().unwrap().path(),
            "/read-comic/berserk/chapter-100"
        );
    }

    #[tokio::test]
    async fn continue_reading_ignored_when_up_to_date() {
        let history = MemoryHistory::default().with(
            "berserk",
            HistoryRecord {
                last_chapter: "372".into(),
                last_chapter_link: "/b/372".to_string(),
            },
        );
        let (mut app, _api, mut rx) = app_with(
            Reply::Detail(detail(&[("1", "L1")])),
            nav_state(Some("/komik/berserk")),
            history,
        );
        settle(&mut app, &mut rx).await;
        app.update(Action::ContinueReading);
        assert!(app.navigation.is_none());
    }

    #[tokio::test]
    async fn reading_is_disabled_in_error_state() {
        let (mut app, _api, mut rx) = app_with(
            Reply::Transport("offline".to_string()),
            nav_state(Some("/komik/berserk")),
            MemoryHistory::default(),
        );
        settle(&mut app, &mut rx).await;
        assert_eq!(app.view.phase(), Phase::Error("offline"));
        app.update(Action::ReadFromStart);
        assert!(app.alert.is_none());
        assert!(app.navigation.is_none());
    }

    #[tokio::test]
    async fn go_home_navigates_to_root() {
        let (mut app, _api, _rx) = app_with(
            Reply::Pending,
            nav_state(Some("/komik/berserk")),
            MemoryHistory::default(),
        );
        let action = app.handle_event(key(KeyCode::Char('H')));
        app.update(action);
        assert_eq!(app.navigation.as_ref().unwrap().path(), "/");
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn reload_drops_results_of_previous_mount() {
        let (mut app, api, mut rx) = app_with(
            Reply::Detail(detail(&[("1", "L1")])),
            nav_state(Some("/komik/berserk")),
            MemoryHistory::default(),
        );
        let first = rx.recv().await.unwrap();
        app.update(Action::Reload);
        assert_eq!(app.view.mount_id(), 1);

        // reply addressed to mount 0 arrives after the remount
        app.update(first);
        assert_eq!(app.view.phase(), Phase::Loading);

        settle(&mut app, &mut rx).await;
        assert_eq!(app.view.phase(), Phase::Ready);
        assert_eq!(api.requested().len(), 2);
    }

    #[tokio::test]
    async fn quit_cancels_pending_fetch() {
        let (mut app, _api, mut rx) = app_with(
            Reply::Pending,
            nav_state(Some("/komik/berserk")),
            MemoryHistory::default(),
        );
        app.update(Action::Quit);
        assert!(app.should_quit);
        assert!(app.navigation.is_none());
        drop(app);
        // the fetch task exits without replying once cancelled
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn keys_map_to_actions() {
        let (app, _api, _rx) = app_with(
            Reply::Pending,
            nav_state(Some("/komik/berserk")),
            MemoryHistory::default(),
        );
        assert!(matches!(
            app.handle_event(key(KeyCode::Down)),
            Action::MoveCursor(Move::Down)
        ));
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('c'))),
            Action::ContinueReading
        ));
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('r'))),
            Action::Reload
        ));
        assert!(matches!(app.handle_event(key(KeyCode::Esc)), Action::Quit));
        assert!(matches!(app.handle_event(Event::Tick), Action::Tick));
    }
}
