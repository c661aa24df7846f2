use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lazy_pager::{
    spawn_fetch, Completion, Indicators, PageRequest, PaginationState, ScrollCoordinator,
    TransitionWatcher,
};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::config::Config;
use crate::demo_source::{DemoSource, FetchError};
use crate::event::Event;
use crate::viewport::Viewport;

pub type Pager = PaginationState<u32, String, FetchError>;

pub struct App {
    pub pager: Pager,
    pub view: Viewport,
    pub indicators: Indicators<String>,
    pub notice: Option<String>,
    pub should_quit: bool,
    watcher: TransitionWatcher,
    coordinator: ScrollCoordinator,
    source: Arc<DemoSource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(config: &Config, source: DemoSource, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        let request_tx = action_tx.clone();
        let pager = PaginationState::new(config.source.initial_page, move |request| {
            request_tx.send(Action::RequestPage(request)).ok();
        });

        Self {
            pager,
            view: Viewport::new(config.view.layout, usize::from(config.view.columns)),
            indicators: config.indicators.clone().into(),
            notice: None,
            should_quit: false,
            watcher: TransitionWatcher::new(),
            coordinator: ScrollCoordinator::new(),
            source: Arc::new(source),
            action_tx,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('d') if ctrl => Action::PageDown,
            KeyCode::Char('u') if ctrl => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Char('r') => Action::Retry,
            KeyCode::Char('R') | KeyCode::F(5) => Action::Refresh,
            KeyCode::Char('t') => Action::ToggleLayout,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if self.notice.is_some() && !matches!(action, Action::RequestPage(_) | Action::PageFetched(_)) {
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::ScrollDown => self.view.scroll_down(1),
            Action::ScrollUp => self.view.scroll_up(1),
            Action::PageDown => self.view.scroll_down(self.half_page()),
            Action::PageUp => self.view.scroll_up(self.half_page()),
            Action::GoToTop => self.view.go_to_top(),
            Action::GoToBottom => self.view.go_to_bottom(),
            Action::ToggleLayout => self.view.toggle_layout(),
            Action::Retry => {
                if let Err(err) = self.pager.retry_last_failed_request() {
                    self.notice = Some(err.to_string());
                }
            }
            Action::Refresh => {
                self.pager.refresh(None);
                self.view.reset();
                self.coordinator.reset();
            }
            Action::RequestPage(request) => self.spawn_load_page(request),
            Action::PageFetched(done) => {
                if self.pager.complete(&done.request, done.outcome) == Completion::Stale {
                    tracing::debug!(page = done.request.key, "page arrived after refresh");
                }
            }
            Action::None => {}
        }

        self.sync_view();
    }

    /// Post-render step: check the scroll position against the fresh layout,
    /// then fire whatever the last transitions call for.
    pub fn settle(&mut self) {
        self.sync_view();
        self.coordinator.observe_host(&self.view, &mut self.pager);
        self.watcher.run(&mut self.pager);
        self.sync_view();
    }

    pub fn set_body_rows(&mut self, rows: usize) {
        self.view.set_rows(rows);
    }

    fn sync_view(&mut self) {
        let phase = self.pager.phase();
        let surface = phase.surface();
        self.view
            .sync(phase.item_count().unwrap_or(0), surface.slot_count());
    }

    fn half_page(&self) -> usize {
        (self.view.rows() / 2).max(1)
    }

    fn spawn_load_page(&self, request: PageRequest<u32>) {
        let tx = self.action_tx.clone();
        spawn_fetch(Arc::clone(&self.source), request, move |done| {
            tx.send(Action::PageFetched(done)).ok();
        });
    }
}

#[cfg(test)]
mod tests {
    use lazy_pager::{Page, PagerError, PhaseKind};

    use super::*;
    use crate::config::SourceConfig;

    fn app() -> (App, mpsc::UnboundedReceiver<Action>) {
        let config = Config {
            source: SourceConfig {
                latency_ms: 0,
                fail_on_attempts: vec![],
                ..SourceConfig::default()
            },
            ..Config::default()
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(&config, DemoSource::new(&config.source), tx);
        (app, rx)
    }

    fn requested(rx: &mut mpsc::UnboundedReceiver<Action>) -> Vec<u32> {
        let mut keys = Vec::new();
        while let Ok(action) = rx.try_recv() {
            if let Action::RequestPage(request) = action {
                keys.push(request.key);
            }
        }
        keys
    }

    fn deliver(app: &mut App, page: u32, items: usize, is_last_page: bool) {
        let request = app.pager.current_request().unwrap();
        assert_eq!(request.key, page);
        let items = (0..items).map(|n| format!("Item {n}")).collect();
        app.update(Action::PageFetched(lazy_pager::FetchDone {
            request,
            outcome: Ok(Page {
                items,
                next_key: page + 1,
                is_last_page,
            }),
        }));
    }

    #[test]
    fn keys_map_to_actions() {
        let (app, _rx) = app();
        let key = |code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        assert!(matches!(app.handle_event(key(KeyCode::Char('j'))), Action::ScrollDown));
        assert!(matches!(app.handle_event(key(KeyCode::Char('r'))), Action::Retry));
        assert!(matches!(app.handle_event(key(KeyCode::Char('R'))), Action::Refresh));
        assert!(matches!(app.handle_event(Event::Tick), Action::None));
        assert!(matches!(
            app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL))),
            Action::PageDown
        ));
    }

    #[test]
    fn first_settle_requests_initial_page() {
        let (mut app, mut rx) = app();
        assert_eq!(app.pager.phase_kind(), PhaseKind::Initial);
        app.settle();
        app.settle();
        assert_eq!(requested(&mut rx), vec![1]);
        assert_eq!(app.pager.phase_kind(), PhaseKind::Loading);
    }

    #[test]
    fn scrolling_to_bottom_requests_next_page() {
        let (mut app, mut rx) = app();
        app.set_body_rows(4);
        app.settle();
        deliver(&mut app, 1, 10, false);
        app.settle();
        assert_eq!(requested(&mut rx), vec![1]);

        app.update(Action::GoToBottom);
        app.settle();
        assert_eq!(requested(&mut rx), vec![2]);
        assert_eq!(app.view.cursor, 9);

        // The loading indicator now trails the items.
        app.update(Action::ScrollDown);
        assert_eq!(app.view.cursor, 10);
        app.settle();
        assert!(requested(&mut rx).is_empty());
    }

    #[test]
    fn short_first_page_keeps_loading_until_last() {
        let (mut app, mut rx) = app();
        app.set_body_rows(20);
        app.settle();
        deliver(&mut app, 1, 3, false);
        app.settle();
        deliver(&mut app, 2, 3, true);
        app.settle();
        app.settle();
        assert_eq!(requested(&mut rx), vec![1, 2]);
        assert_eq!(app.pager.all_items().unwrap().len(), 6);
    }

    #[test]
    fn retry_without_failure_shows_notice() {
        let (mut app, _rx) = app();
        app.update(Action::Retry);
        assert_eq!(
            app.notice,
            Some(
                PagerError::InvalidState {
                    phase: PhaseKind::Initial
                }
                .to_string()
            )
        );

        app.update(Action::ScrollDown);
        assert_eq!(app.notice, None);
    }

    #[test]
    fn refresh_discards_late_page() {
        let (mut app, mut rx) = app();
        app.set_body_rows(5);
        app.settle();
        let stale = app.pager.current_request().unwrap();

        app.update(Action::Refresh);
        app.update(Action::PageFetched(lazy_pager::FetchDone {
            request: stale,
            outcome: Ok(Page::new(vec!["old".to_string()], 2)),
        }));
        assert_eq!(app.pager.phase_kind(), PhaseKind::Initial);

        app.settle();
        assert_eq!(requested(&mut rx), vec![1, 1]);
        assert_eq!(app.pager.generation(), 1);
    }

    #[tokio::test]
    async fn fetched_pages_come_back_as_actions() {
        let (mut app, mut rx) = app();
        app.settle();

        let Some(Action::RequestPage(request)) = rx.recv().await else {
            panic!("expected a page request");
        };
        app.update(Action::RequestPage(request));

        let action = rx.recv().await.unwrap();
        assert!(matches!(action, Action::PageFetched(_)));
        app.update(action);
        assert_eq!(app.pager.phase_kind(), PhaseKind::Loaded);
        assert_eq!(app.pager.all_items().unwrap()[0], "Item 1");
    }
}
