//! Main TUI application.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info, warn};

use crate::api::ResearchSource;

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key, handle_mouse};
use super::render::render;
use super::state::AppState;

/// Poll interval of the event thread.
const TICK_RATE: Duration = Duration::from_millis(250);

/// Main TUI application.
pub struct App {
    source: Box<dyn ResearchSource>,
    state: AppState,
    /// Re-fetch the current view after this long; `None` disables it.
    refresh_every: Option<Duration>,
    last_fetch: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(source: Box<dyn ResearchSource>, state: AppState) -> Self {
        Self {
            source,
            state,
            refresh_every: None,
            last_fetch: Instant::now(),
            should_quit: false,
        }
    }

    pub fn with_auto_refresh(mut self, every: Option<Duration>) -> Self {
        self.refresh_every = every.filter(|d| !d.is_zero());
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Runs the TUI application.
    pub fn run(mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(TICK_RATE);
        info!(source = %self.source.name(), location = %self.state.navigator.current(), "tui started");

        // Main loop
        loop {
            self.fetch_if_requested();
            terminal.draw(|frame| render(frame, &mut self.state))?;

            match events.next() {
                Ok(event) => self.handle_event(event),
                Err(_) => self.should_quit = true,
            }
            if self.should_quit {
                break;
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        if let Err(e) = self.state.layout.save() {
            warn!(error = %e, "failed to save layout on exit");
        }
        Ok(())
    }

    /// Applies one event to the state.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Tick => {
                if let Some(every) = self.refresh_every
                    && self.last_fetch.elapsed() >= every
                    && !self.state.capture.is_active()
                {
                    debug!("auto refresh");
                    self.source.invalidate(Some(self.state.view()));
                    self.state.request_fetch();
                }
            }
            Event::Key(key) => match handle_key(&mut self.state, key) {
                KeyAction::Quit => self.should_quit = true,
                KeyAction::Refresh => {
                    self.source.invalidate(Some(self.state.view()));
                    self.state.request_fetch();
                }
                KeyAction::None => {}
            },
            Event::Mouse(mouse) => handle_mouse(&mut self.state, mouse),
            // Geometry is recomputed on the next draw.
            Event::Resize(..) => {}
        }
    }

    /// Fetches the current location when the state asked for it.
    pub fn fetch_if_requested(&mut self) {
        if self.state.take_fetch_request() {
            self.state.fetch(&mut *self.source);
            self.last_fetch = Instant::now();
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CachedSource, MockSource};
    use crate::location::{Location, View};
    use crate::storage::LayoutStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn app(start: &str) -> App {
        let state = AppState::new(Location::parse(start), LayoutStore::in_memory()).unwrap();
        let source = CachedSource::new(MockSource::new(), Duration::from_secs(60));
        App::new(Box::new(source), state)
    }

    #[test]
    fn first_iteration_fetches_initial_location() {
        let mut app = app("strategies");
        app.fetch_if_requested();
        assert!(!app.state().strategies.data().is_empty());
        assert_eq!(app.state().source_name, "mock");
        // Nothing new requested.
        app.fetch_if_requested();
        assert_eq!(app.state().cache_stats.unwrap().misses, 1);
    }

    #[test]
    fn refresh_bypasses_cache() {
        let mut app = app("factors");
        app.fetch_if_requested();
        app.handle_event(key(KeyCode::Char('r')));
        app.fetch_if_requested();
        let stats = app.state().cache_stats.unwrap();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 2);
    }

    #[test]
    fn revisiting_a_view_is_served_from_cache() {
        let mut app = app("factors");
        app.fetch_if_requested();
        app.handle_event(key(KeyCode::Char('2')));
        app.fetch_if_requested();
        app.handle_event(key(KeyCode::Char('1')));
        app.fetch_if_requested();
        assert_eq!(app.state().view(), View::Factors);
        assert_eq!(app.state().cache_stats.unwrap().hits, 1);
    }

    #[test]
    fn auto_refresh_waits_for_interval() {
        let mut app = app("notes").with_auto_refresh(Some(Duration::from_secs(3600)));
        app.fetch_if_requested();
        app.handle_event(Event::Tick);
        app.fetch_if_requested();
        assert_eq!(app.state().cache_stats.unwrap().misses, 1);

        let mut app = self::app("notes").with_auto_refresh(Some(Duration::from_nanos(1)));
        app.fetch_if_requested();
        std::thread::sleep(Duration::from_millis(2));
        app.handle_event(Event::Tick);
        app.fetch_if_requested();
        assert_eq!(app.state().cache_stats.unwrap().misses, 2);
    }

    #[test]
    fn q_quits() {
        let mut app = app("factors");
        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }
}
