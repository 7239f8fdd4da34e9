//! Application state management.

use std::sync::mpsc::{self, Receiver, Sender};

use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::api::{ApiError, CacheStats, Page, ResearchSource};
use crate::filters::{
    ExperienceFilters, FactorFilters, FilterCodec, ListFilters, NoteFilters, QueryEnum,
    QueryString, StrategyFilters, merge_query, next_page_size, prev_page_size,
};
use crate::location::{Location, Navigator, View};
use crate::storage::LayoutStore;
use crate::table::{
    ColumnError, ColumnSet, PointerCapture, ResizableTable, SortState, TableHandlers,
};
use crate::view::{self, ResearchRecord};

use super::pane::{Detail, ListPane};

/// Runs `$body` with `$filters` bound to the filter type of `$view`.
macro_rules! with_filters {
    ($view:expr, $filters:ident => $body:expr) => {
        match $view {
            View::Factors => {
                type $filters = FactorFilters;
                $body
            }
            View::Strategies => {
                type $filters = StrategyFilters;
                $body
            }
            View::Experiences => {
                type $filters = ExperienceFilters;
                $body
            }
            View::Notes => {
                type $filters = NoteFilters;
                $body
            }
        }
    };
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing the free-text search.
    Search,
    /// Editing the location (`view?query`) directly.
    Location,
}

/// Active popup. Only one popup can be open at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Popup {
    #[default]
    None,
    Help {
        scroll: usize,
    },
    Detail {
        detail: Detail,
        scroll: usize,
    },
}

impl Popup {
    pub fn is_open(&self) -> bool {
        !matches!(self, Popup::None)
    }
}

/// Notifications emitted by the table widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Resized { view: View, key: String, width: u16 },
    Sorted { view: View, sort: SortState },
    RowClicked { view: View, index: usize },
}

/// Pagination of the last successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub page_count: u32,
}

impl<T> From<&Page<T>> for PageInfo {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            page_count: page.page_count(),
        }
    }
}

/// Screen regions of the table, recorded at render time for mouse routing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableGeometry {
    pub header: Rect,
    pub body: Rect,
    /// Index of the first body row on screen.
    pub offset: usize,
}

/// Main application state.
pub struct AppState {
    pub navigator: Navigator,
    pub layout: LayoutStore,

    pub factors: ResizableTable<crate::api::Factor>,
    pub strategies: ResizableTable<crate::api::Strategy>,
    pub experiences: ResizableTable<crate::api::Experience>,
    pub notes: ResizableTable<crate::api::Note>,
    /// Pointer capture shared by every table; held while a resize is in progress.
    pub capture: PointerCapture,
    table_events: Receiver<TableEvent>,

    pub input_mode: InputMode,
    /// Text being edited in Search/Location mode.
    pub input: String,
    pub popup: Popup,

    pub page: Option<PageInfo>,
    pub last_error: Option<ApiError>,
    pub status_message: Option<String>,
    pub source_name: String,
    pub cache_stats: Option<CacheStats>,

    pub geometry: TableGeometry,
    fetch_requested: bool,
}

fn build_table<R: ResearchRecord + 'static>(
    view: View,
    columns: ColumnSet<R>,
    tx: &Sender<TableEvent>,
    capture: &PointerCapture,
    layout: &LayoutStore,
) -> ResizableTable<R> {
    let resize_tx = tx.clone();
    let sort_tx = tx.clone();
    let click_tx = tx.clone();
    let handlers = TableHandlers {
        on_column_resize: Some(Box::new(move |key: &str, width: u16| {
            let _ = resize_tx.send(TableEvent::Resized {
                view,
                key: key.to_string(),
                width,
            });
        })),
        on_sort: Some(Box::new(move |sort: &SortState| {
            let _ = sort_tx.send(TableEvent::Sorted {
                view,
                sort: sort.clone(),
            });
        })),
        on_row_click: Some(Box::new(move |index: usize, _row: &R| {
            let _ = click_tx.send(TableEvent::RowClicked { view, index });
        })),
    };
    let mut table = ResizableTable::new(columns)
        .with_handlers(handlers)
        .with_capture(capture.clone())
        .with_empty_message(format!("No {} match the current filters", view.path()));
    table.apply_width_overrides(&layout.widths(view));
    table
}

/// Next enum variant, wrapping past the last one.
fn next_variant<E: QueryEnum>(current: E) -> E {
    E::cycle(Some(current))
        .or_else(|| E::VARIANTS.first().copied())
        .unwrap_or(current)
}

/// Loads a fetch result into a table, keeping the header arrow in sync with
/// the filters that were requested.
fn load<F: ListFilters, R: ResearchRecord>(
    table: &mut ResizableTable<R>,
    filters: &F,
    result: Result<Page<R>, ApiError>,
) -> Result<PageInfo, ApiError> {
    table.set_sort(Some(filters.sort_state()));
    match result {
        Ok(page) => {
            let info = PageInfo::from(&page);
            table.set_data(page.items);
            Ok(info)
        }
        Err(e) => {
            table.set_data(Vec::new());
            Err(e)
        }
    }
}

impl AppState {
    pub fn new(start: Location, layout: LayoutStore) -> Result<Self, ColumnError> {
        let (tx, rx) = mpsc::channel();
        let capture = PointerCapture::new();
        let factors = build_table(
            View::Factors,
            view::factors::columns()?,
            &tx,
            &capture,
            &layout,
        );
        let strategies = build_table(
            View::Strategies,
            view::strategies::columns()?,
            &tx,
            &capture,
            &layout,
        );
        let experiences = build_table(
            View::Experiences,
            view::experiences::columns()?,
            &tx,
            &capture,
            &layout,
        );
        let notes = build_table(View::Notes, view::notes::columns()?, &tx, &capture, &layout);

        Ok(Self {
            navigator: Navigator::new(start),
            layout,
            factors,
            strategies,
            experiences,
            notes,
            capture,
            table_events: rx,
            input_mode: InputMode::Normal,
            input: String::new(),
            popup: Popup::None,
            page: None,
            last_error: None,
            status_message: None,
            source_name: String::new(),
            cache_stats: None,
            geometry: TableGeometry::default(),
            fetch_requested: true,
        })
    }

    pub fn view(&self) -> View {
        self.navigator.current().view
    }

    pub fn pane(&self) -> &dyn ListPane {
        match self.view() {
            View::Factors => &self.factors,
            View::Strategies => &self.strategies,
            View::Experiences => &self.experiences,
            View::Notes => &self.notes,
        }
    }

    pub fn pane_mut(&mut self) -> &mut dyn ListPane {
        match self.view() {
            View::Factors => &mut self.factors,
            View::Strategies => &mut self.strategies,
            View::Experiences => &mut self.experiences,
            View::Notes => &mut self.notes,
        }
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    pub fn request_fetch(&mut self) {
        self.fetch_requested = true;
    }

    /// Returns and clears the pending fetch request.
    pub fn take_fetch_request(&mut self) -> bool {
        std::mem::take(&mut self.fetch_requested)
    }

    /// Fetches the current location from `source` into its table.
    pub fn fetch(&mut self, source: &mut dyn ResearchSource) {
        let location = self.navigator.current().clone();
        let query = QueryString::parse(&location.query);
        debug!(location = %location, "fetch");

        let result = match location.view {
            View::Factors => {
                let filters = FactorFilters::decode(&query);
                let result = source.list_factors(&filters);
                load(&mut self.factors, &filters, result)
            }
            View::Strategies => {
                let filters = StrategyFilters::decode(&query);
                let result = source.list_strategies(&filters);
                load(&mut self.strategies, &filters, result)
            }
            View::Experiences => {
                let filters = ExperienceFilters::decode(&query);
                let result = source.list_experiences(&filters);
                load(&mut self.experiences, &filters, result)
            }
            View::Notes => {
                let filters = NoteFilters::decode(&query);
                let result = source.list_notes(&filters);
                load(&mut self.notes, &filters, result)
            }
        };

        match result {
            Ok(info) => {
                self.page = Some(info);
                self.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, location = %location, "fetch failed");
                self.page = None;
                self.last_error = Some(e);
            }
        }
        self.source_name = source.name();
        self.cache_stats = source.cache_stats();
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Decodes the current view's filters, applies `edit` and writes the
    /// result back into the location. `push` records a history entry.
    pub fn update_filters<F: ListFilters>(&mut self, push: bool, edit: impl FnOnce(&mut F)) {
        let current = self.navigator.current().clone();
        let before = F::decode(&QueryString::parse(&current.query));
        let mut after = before.clone();
        edit(&mut after);
        let encoded = after.encode();
        if encoded == before.encode() {
            return;
        }

        let query = merge_query(&current.query, &encoded, F::KEYS);
        let next = Location::new(current.view, query);
        debug!(from = %current, to = %next, "filters changed");
        if push {
            self.navigator.push(next);
        } else {
            self.navigator.replace(next);
        }
        self.request_fetch();
    }

    pub fn current_search(&self) -> Option<String> {
        let query = QueryString::parse(&self.navigator.current().query);
        with_filters!(self.view(), F => F::decode(&query).search().map(str::to_string))
    }

    pub fn set_search(&mut self, search: Option<String>) {
        let search = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        with_filters!(self.view(), F => self.update_filters::<F>(true, |f| f.set_search(search)))
    }

    pub fn next_page(&mut self) {
        if let Some(info) = self.page
            && info.page >= info.page_count
        {
            self.status_message = Some("Already on the last page".to_string());
            return;
        }
        with_filters!(self.view(), F => self.update_filters::<F>(true, |f| {
            let page = f.page().saturating_add(1);
            f.set_page(page);
        }))
    }

    pub fn prev_page(&mut self) {
        with_filters!(self.view(), F => self.update_filters::<F>(true, |f| {
            let page = f.page().saturating_sub(1);
            f.set_page(page);
        }))
    }

    pub fn grow_page_size(&mut self) {
        with_filters!(self.view(), F => self.update_filters::<F>(true, |f| {
            f.set_page_size(next_page_size(f.page_size()))
        }))
    }

    pub fn shrink_page_size(&mut self) {
        with_filters!(self.view(), F => self.update_filters::<F>(true, |f| {
            f.set_page_size(prev_page_size(f.page_size()))
        }))
    }

    /// Keyboard sort: moves `order_by` to the next field, wrapping.
    pub fn cycle_sort_field(&mut self) {
        with_filters!(self.view(), F => self.update_filters::<F>(false, |f| {
            let order_by = next_variant(f.order_by());
            let order = f.order();
            f.set_ordering(order_by, order);
            f.set_page(1);
        }))
    }

    pub fn flip_sort_direction(&mut self) {
        with_filters!(self.view(), F => self.update_filters::<F>(false, |f| {
            let order_by = f.order_by();
            let order = f.order().flip();
            f.set_ordering(order_by, order);
            f.set_page(1);
        }))
    }

    /// Toggles `is_archived` on views that have it.
    pub fn toggle_archived(&mut self) {
        match self.view() {
            View::Factors => {
                self.status_message = Some("Factors cannot be archived".to_string());
            }
            View::Strategies => self.update_filters::<StrategyFilters>(true, |f| {
                f.is_archived = !f.is_archived;
                f.page = 1;
            }),
            View::Experiences => self.update_filters::<ExperienceFilters>(true, |f| {
                f.is_archived = !f.is_archived;
                f.page = 1;
            }),
            View::Notes => self.update_filters::<NoteFilters>(true, |f| {
                f.is_archived = !f.is_archived;
                f.page = 1;
            }),
        }
    }

    /// Filters that differ from the view's defaults, as `key=value` pairs.
    /// Pagination and ordering are shown elsewhere and skipped here.
    pub fn active_filters(&self) -> Vec<(String, String)> {
        const SHOWN_ELSEWHERE: [&str; 4] = ["page", "page_size", "order_by", "order"];
        let query = QueryString::parse(&self.navigator.current().query);
        let (current, defaults) = with_filters!(self.view(), F => {
            (F::decode(&query).encode(), F::default().encode())
        });
        current
            .into_iter()
            .filter(|(k, _)| !SHOWN_ELSEWHERE.contains(&k.as_str()))
            .filter(|(k, v)| defaults.get(k) != Some(v))
            .collect()
    }

    /// Current ordering of the view, e.g. `Updated ▼`.
    pub fn ordering_label(&self) -> String {
        let query = QueryString::parse(&self.navigator.current().query);
        with_filters!(self.view(), F => {
            let f = F::decode(&query);
            format!("{} {}", f.order_by().label(), f.order().arrow())
        })
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn switch_view(&mut self, view: View) {
        if view == self.view() {
            return;
        }
        self.navigator.switch_view(view);
        self.after_navigation();
    }

    pub fn go_back(&mut self) {
        if self.navigator.back() {
            self.after_navigation();
        } else {
            self.status_message = Some("No earlier location".to_string());
        }
    }

    pub fn go_forward(&mut self) {
        if self.navigator.forward() {
            self.after_navigation();
        }
    }

    /// Applies a location typed by the user.
    pub fn go_to(&mut self, input: &str) {
        match Location::try_parse(input) {
            Ok(location) => {
                info!(location = %location, "navigate");
                self.navigator.push(location);
                self.after_navigation();
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    /// Writes a header sort into the location and pushes the ordering the
    /// filters settled on back to the table.
    fn apply_header_sort(&mut self, view: View, sort: &SortState) {
        let settled = with_filters!(view, F => {
            self.update_filters::<F>(false, |f| *f = f.with_sort(sort));
            F::decode(&QueryString::parse(&self.navigator.current().query)).sort_state()
        });
        match view {
            View::Factors => self.factors.set_sort(Some(settled)),
            View::Strategies => self.strategies.set_sort(Some(settled)),
            View::Experiences => self.experiences.set_sort(Some(settled)),
            View::Notes => self.notes.set_sort(Some(settled)),
        }
    }

    fn after_navigation(&mut self) {
        self.factors.cancel_resize();
        self.strategies.cancel_resize();
        self.experiences.cancel_resize();
        self.notes.cancel_resize();
        self.popup = Popup::None;
        self.page = None;
        self.request_fetch();
    }

    // ------------------------------------------------------------------
    // Table events
    // ------------------------------------------------------------------

    /// Applies notifications queued by the table callbacks.
    pub fn drain_table_events(&mut self) {
        while let Ok(event) = self.table_events.try_recv() {
            match event {
                TableEvent::Resized { view, key, width } => {
                    debug!(view = view.path(), key = %key, width, "column resized");
                    self.layout.record(view, &key, width);
                    if let Err(e) = self.layout.save() {
                        warn!(error = %e, "failed to save layout");
                        self.status_message = Some(format!("Layout not saved: {}", e));
                    }
                }
                TableEvent::Sorted { view, sort } => {
                    if view != self.view() {
                        continue;
                    }
                    self.apply_header_sort(view, &sort);
                }
                TableEvent::RowClicked { view, index } => {
                    if view != self.view() {
                        continue;
                    }
                    if let Some(detail) = self.pane().detail(index) {
                        self.popup = Popup::Detail { detail, scroll: 0 };
                    }
                }
            }
        }
    }

    /// Opens the detail popup for the selected row through the table's
    /// row-click path.
    pub fn open_selected(&mut self) {
        let index = self.pane().selected();
        self.pane_mut().click_row(index);
        self.drain_table_events();
    }
}
