//! Input handling and keybindings.

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::location::View;

use super::state::{AppState, InputMode, Popup};

/// Result of handling an input event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Drop cached results and fetch again.
    Refresh,
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    let action = match state.input_mode {
        InputMode::Normal => handle_normal_mode(state, key),
        InputMode::Search | InputMode::Location => handle_input_mode(state, key),
    };
    state.drain_table_events();
    action
}

/// Search and location editing.
fn handle_input_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
            state.input.clear();
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut state.input);
            let mode = std::mem::take(&mut state.input_mode);
            match mode {
                InputMode::Search => state.set_search(Some(input)),
                InputMode::Location => state.go_to(&input),
                InputMode::Normal => {}
            }
        }
        KeyCode::Backspace => {
            state.input.pop();
        }
        KeyCode::Char(c) => state.input.push(c),
        _ => {}
    }
    KeyAction::None
}

/// Keys while a popup is open: scroll and close only.
fn handle_popup(state: &mut AppState, key: KeyEvent) -> KeyAction {
    let scroll = match &mut state.popup {
        Popup::Help { scroll } | Popup::Detail { scroll, .. } => scroll,
        Popup::None => return KeyAction::None,
    };
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
        KeyCode::PageUp => *scroll = scroll.saturating_sub(10),
        KeyCode::PageDown => *scroll = scroll.saturating_add(10),
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => state.popup = Popup::None,
        KeyCode::Char('q') => return KeyAction::Quit,
        _ => {}
    }
    KeyAction::None
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if state.popup.is_open() {
        return handle_popup(state, key);
    }
    state.status_message = None;

    match key.code {
        KeyCode::Char('q') => return KeyAction::Quit,

        // View switching
        KeyCode::Tab => state.switch_view(state.view().next()),
        KeyCode::BackTab => state.switch_view(state.view().prev()),
        KeyCode::Char('1') => state.switch_view(View::Factors),
        KeyCode::Char('2') => state.switch_view(View::Strategies),
        KeyCode::Char('3') => state.switch_view(View::Experiences),
        KeyCode::Char('4') => state.switch_view(View::Notes),

        // History
        KeyCode::Left if key.modifiers.contains(KeyModifiers::ALT) => state.go_back(),
        KeyCode::Right if key.modifiers.contains(KeyModifiers::ALT) => state.go_forward(),
        KeyCode::Backspace => state.go_back(),

        // Pagination
        KeyCode::Left | KeyCode::Char('[') => state.prev_page(),
        KeyCode::Right | KeyCode::Char(']') => state.next_page(),
        KeyCode::Char('+') => state.grow_page_size(),
        KeyCode::Char('-') => state.shrink_page_size(),

        // Rows
        KeyCode::Up | KeyCode::Char('k') => state.pane_mut().select_up(),
        KeyCode::Down | KeyCode::Char('j') => state.pane_mut().select_down(),
        KeyCode::Home => state.pane_mut().home(),
        KeyCode::End => state.pane_mut().end(),
        KeyCode::Enter => state.open_selected(),

        // Filters and ordering
        KeyCode::Char('/') => {
            state.input = state.current_search().unwrap_or_default();
            state.input_mode = InputMode::Search;
        }
        KeyCode::Char('g') => {
            state.input = state.navigator.current().to_string();
            state.input_mode = InputMode::Location;
        }
        KeyCode::Char('a') => state.toggle_archived(),
        KeyCode::Char('s') => state.cycle_sort_field(),
        KeyCode::Char('S') => state.flip_sort_direction(),
        KeyCode::Char('r') => return KeyAction::Refresh,

        KeyCode::Char('?') => state.popup = Popup::Help { scroll: 0 },
        _ => {}
    }
    KeyAction::None
}

/// Routes mouse input to the active table.
///
/// Left-down in the header starts a resize on a handle or toggles sort on a
/// label; left-down in the body clicks a row. Drag and release reach the
/// table only while a resize holds the pointer capture.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let position = Position::new(mouse.column, mouse.row);
    let geometry = state.geometry;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if state.popup.is_open() {
                state.popup = Popup::None;
                return;
            }
            if geometry.header.contains(position) {
                let layout = state
                    .pane()
                    .header_layout(geometry.header.x, geometry.header.width);
                state.pane_mut().header_pointer_down(mouse.column, &layout);
            } else if geometry.body.contains(position) {
                let index = geometry.offset + (mouse.row - geometry.body.y) as usize;
                state.pane_mut().click_row(index);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if state.capture.is_active() => {
            state.pane_mut().pointer_move(mouse.column);
        }
        MouseEventKind::Up(MouseButton::Left) if state.capture.is_active() => {
            state.pane_mut().pointer_up();
        }
        MouseEventKind::ScrollUp if !state.popup.is_open() => state.pane_mut().select_up(),
        MouseEventKind::ScrollDown if !state.popup.is_open() => state.pane_mut().select_down(),
        _ => {}
    }
    state.drain_table_events();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockSource;
    use crate::filters::{FactorFilters, FactorOrderBy, FilterCodec, QueryString};
    use crate::location::Location;
    use crate::storage::LayoutStore;
    use crate::table::SortDirection;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn loaded(start: &str) -> AppState {
        let mut state = AppState::new(Location::parse(start), LayoutStore::in_memory()).unwrap();
        state.fetch(&mut MockSource::new());
        state.take_fetch_request();
        state.geometry.header = Rect::new(0, 3, 120, 1);
        state.geometry.body = Rect::new(0, 4, 120, 20);
        state
    }

    #[test]
    fn q_and_ctrl_c_quit() {
        let mut state = loaded("factors");
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('q'))), KeyAction::Quit);
        let ctrl_c = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        };
        assert_eq!(handle_key(&mut state, ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn digits_and_tab_switch_views() {
        let mut state = loaded("factors");
        handle_key(&mut state, key(KeyCode::Char('3')));
        assert_eq!(state.view(), View::Experiences);
        handle_key(&mut state, key(KeyCode::Tab));
        assert_eq!(state.view(), View::Notes);
        handle_key(&mut state, key(KeyCode::BackTab));
        assert_eq!(state.view(), View::Experiences);
        handle_key(&mut state, key(KeyCode::Backspace));
        assert_eq!(state.view(), View::Notes);
    }

    #[test]
    fn search_mode_edits_and_applies() {
        let mut state = loaded("factors?page=2");
        handle_key(&mut state, key(KeyCode::Char('/')));
        assert_eq!(state.input_mode, InputMode::Search);
        for c in "roex".chars() {
            handle_key(&mut state, key(KeyCode::Char(c)));
        }
        handle_key(&mut state, key(KeyCode::Backspace));
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.input_mode, InputMode::Normal);

        let f = FactorFilters::decode(&QueryString::parse(&state.navigator.current().query));
        assert_eq!(f.search.as_deref(), Some("roe"));
        assert_eq!(f.page, 1);
    }

    #[test]
    fn escape_cancels_location_edit() {
        let mut state = loaded("notes?tag=x");
        handle_key(&mut state, key(KeyCode::Char('g')));
        assert_eq!(state.input, "notes?tag=x");
        handle_key(&mut state, key(KeyCode::Char('!')));
        handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.navigator.current().to_string(), "notes?tag=x");
    }

    #[test]
    fn location_edit_navigates() {
        let mut state = loaded("factors");
        handle_key(&mut state, key(KeyCode::Char('g')));
        state.input = "strategies?status=failed".into();
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.view(), View::Strategies);
        assert!(state.take_fetch_request());
    }

    #[test]
    fn r_requests_refresh() {
        let mut state = loaded("factors");
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('r'))), KeyAction::Refresh);
    }

    #[test]
    fn enter_opens_and_escape_closes_detail() {
        let mut state = loaded("strategies");
        handle_key(&mut state, key(KeyCode::Down));
        handle_key(&mut state, key(KeyCode::Enter));
        assert!(matches!(state.popup, Popup::Detail { .. }));
        handle_key(&mut state, key(KeyCode::Down));
        assert!(matches!(state.popup, Popup::Detail { scroll: 1, .. }));
        // Navigation keys do not leak through the popup.
        handle_key(&mut state, key(KeyCode::Char('2')));
        assert_eq!(state.view(), View::Strategies);
        handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.popup, Popup::None);
    }

    #[test]
    fn header_label_click_sorts() {
        let mut state = loaded("factors");
        let layout = state.factors.header_layout(0, 120);
        let ic = layout.spans.iter().find(|s| s.key == "ic_mean").unwrap();
        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Down(MouseButton::Left), ic.start + 1, 3),
        );
        let f = FactorFilters::decode(&QueryString::parse(&state.navigator.current().query));
        assert_eq!(f.order_by, FactorOrderBy::IcMean);
        assert_eq!(f.order, SortDirection::Desc);
        assert!(state.take_fetch_request());
    }

    #[test]
    fn handle_drag_resizes_and_records_layout() {
        let mut state = loaded("factors");
        let layout = state.factors.header_layout(0, 120);
        let name = *layout.spans.iter().find(|s| s.key == "name").unwrap();

        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Down(MouseButton::Left), name.handle(), 3),
        );
        assert!(state.capture.is_active());
        // Drag rows outside the header still reach the table while captured.
        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Drag(MouseButton::Left), name.handle() + 6, 15),
        );
        assert_eq!(state.factors.widths().get("name"), Some(name.width + 6));
        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Up(MouseButton::Left), name.handle() + 6, 15),
        );
        assert!(!state.capture.is_active());
        assert_eq!(
            state.layout.get(View::Factors, "name"),
            Some(name.width + 6)
        );
        // The press that started the resize did not also sort.
        assert!(!state.navigator.current().query.contains("order_by=name"));
    }

    #[test]
    fn tab_during_drag_leaves_next_view_resizable() {
        let mut state = loaded("factors");
        let layout = state.factors.header_layout(0, 120);
        let name = *layout.spans.iter().find(|s| s.key == "name").unwrap();
        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Down(MouseButton::Left), name.handle(), 3),
        );
        assert!(state.capture.is_active());

        handle_key(&mut state, key(KeyCode::Tab));
        assert_eq!(state.view(), View::Strategies);
        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Up(MouseButton::Left), name.handle(), 3),
        );
        assert!(!state.capture.is_active());
        assert_eq!(state.factors.widths().get("name"), Some(name.width));

        let layout = state.strategies.header_layout(0, 120);
        let first = layout.spans[0];
        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Down(MouseButton::Left), first.handle(), 3),
        );
        assert!(state.strategies.is_resizing());
        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Drag(MouseButton::Left), first.handle() + 2, 3),
        );
        assert_eq!(state.strategies.widths().get(first.key), Some(first.width + 2));
    }

    #[test]
    fn drag_without_capture_is_ignored() {
        let mut state = loaded("factors");
        let before = state.factors.widths().clone();
        handle_mouse(&mut state, mouse(MouseEventKind::Drag(MouseButton::Left), 50, 3));
        handle_mouse(&mut state, mouse(MouseEventKind::Up(MouseButton::Left), 50, 3));
        assert_eq!(state.factors.widths(), &before);
    }

    #[test]
    fn body_click_selects_row_and_opens_detail() {
        let mut state = loaded("notes");
        state.geometry.offset = 2;
        handle_mouse(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
        assert_eq!(state.notes.selected(), 3);
        let Popup::Detail { detail, .. } = &state.popup else {
            panic!("expected detail popup");
        };
        assert_eq!(detail.title, state.notes.data()[3].title);

        // A click anywhere closes the popup first.
        handle_mouse(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
        assert_eq!(state.popup, Popup::None);
    }
}
