use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, trace, warn};

use crate::address::{AddressRecord, Suggestion};
use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::details::DetailResolver;
use crate::errors::AppResult;
use crate::places::PlacesService;
use crate::state::ResolutionState;
use crate::suggestions::SuggestionFetcher;
use crate::view::SessionView;

const DEFAULT_PLACEHOLDER: &str = "Search for an address...";

/// Invoked once per completed selection with the record and, when the pick
/// came from the provider, its candidate id.
pub type SelectionCallback = Arc<dyn Fn(AddressRecord, Option<String>) + Send + Sync>;

/// Presentation metadata handed straight through to [`SessionView`].
#[derive(Debug, Clone)]
pub struct InputProps {
    pub default_value: String,
    pub placeholder: String,
    pub label: Option<String>,
    pub required: bool,
    pub error: Option<String>,
}

impl Default for InputProps {
    fn default() -> Self {
        Self {
            default_value: String::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            label: None,
            required: false,
            error: None,
        }
    }
}

/// One address input for its whole lifetime. Dropping the session disposes it.
///
/// Methods that schedule work must be called from within a tokio runtime.
pub struct AddressSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    state: Mutex<ResolutionState>,
    props: InputProps,
    fetcher: SuggestionFetcher,
    resolver: DetailResolver,
    debouncer: Debouncer,
    debounce_delay: Duration,
    on_select: SelectionCallback,
    selection_guard: AsyncMutex<()>,
    disposed: AtomicBool,
}

impl AddressSession {
    pub fn new(
        config: &AppConfig,
        places: PlacesService,
        props: InputProps,
        on_select: SelectionCallback,
    ) -> Self {
        let state = ResolutionState::new(props.default_value.clone());
        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(state),
                props,
                fetcher: SuggestionFetcher::new(places.clone(), config.min_query_length),
                resolver: DetailResolver::new(places),
                debouncer: Debouncer::new(),
                debounce_delay: config.debounce_delay(),
                on_select,
                selection_guard: AsyncMutex::new(()),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    pub fn from_env(props: InputProps, on_select: SelectionCallback) -> AppResult<Self> {
        let config = AppConfig::from_env();
        let places = PlacesService::new(&config)?;
        Ok(Self::new(&config, places, props, on_select))
    }

    /// Records a keystroke and (re)schedules the debounced search.
    pub fn input_changed(&self, text: impl Into<String>) {
        if self.inner.is_disposed() {
            return;
        }
        let query = text.into();
        self.inner.state.lock().input_changed(&query);

        let session = Arc::downgrade(&self.inner);
        self.inner
            .debouncer
            .schedule(self.inner.debounce_delay, async move {
                if let Some(inner) = session.upgrade() {
                    inner.run_search(query).await;
                }
            });
    }

    /// Completes a selection. With a candidate id the details are fetched
    /// first; without one the bare description is emitted.
    ///
    /// Returns `None` when the description is blank or the session has been
    /// disposed, in which case the callback is not invoked.
    pub async fn select(
        &self,
        description: &str,
        candidate_id: Option<&str>,
    ) -> Option<AddressRecord> {
        let _guard = self.inner.selection_guard.lock().await;
        if self.inner.is_disposed() {
            return None;
        }
        let Some(fallback) = AddressRecord::unresolved(description) else {
            warn!("ignoring selection with blank description");
            return None;
        };
        let candidate_id = candidate_id.filter(|id| !id.trim().is_empty());

        self.inner
            .state
            .lock()
            .begin_selection(candidate_id.is_some());
        let record = match candidate_id {
            Some(id) => self
                .inner
                .resolver
                .resolve(description, id)
                .await
                .unwrap_or(fallback),
            None => fallback,
        };
        self.inner
            .complete_selection(record, candidate_id.map(str::to_string))
    }

    pub async fn select_suggestion(&self, suggestion: &Suggestion) -> Option<AddressRecord> {
        self.select(&suggestion.description, Some(&suggestion.id))
            .await
    }

    /// Accepts the typed text as the address after a failed search.
    pub fn manual_entry(&self) -> Option<AddressRecord> {
        if self.inner.is_disposed() {
            return None;
        }
        let record = {
            let mut state = self.inner.state.lock();
            let record = state.manual_entry_text().and_then(AddressRecord::unresolved)?;
            state.begin_selection(false);
            record
        };
        self.inner.complete_selection(record, None)
    }

    pub fn set_open(&self, open: bool) {
        self.inner.state.lock().set_open(open);
    }

    pub fn state(&self) -> ResolutionState {
        self.inner.state.lock().clone()
    }

    pub fn view(&self) -> SessionView {
        let state = self.inner.state.lock();
        SessionView::new(&self.inner.props, &state)
    }

    /// Cancels the pending timer and drops any in-flight search. Idempotent.
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}

impl Drop for AddressSession {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

impl SessionInner {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.debouncer.cancel();
        self.state.lock().supersede_searches();
        debug!("address session disposed");
    }

    async fn run_search(&self, query: String) {
        if self.is_disposed() {
            return;
        }
        let searchable = self.fetcher.is_searchable(&query);
        let generation = {
            let mut state = self.state.lock();
            state.begin_search(&query, searchable)
        };
        let Some(generation) = generation else {
            return;
        };

        let outcome = self.fetcher.fetch(&query).await;
        let applied = {
            let mut state = self.state.lock();
            state.finish_search(generation, outcome)
        };
        if !applied {
            debug!(generation, query = %query, "discarding superseded suggestions");
        }
    }

    fn complete_selection(
        &self,
        record: AddressRecord,
        candidate_id: Option<String>,
    ) -> Option<AddressRecord> {
        self.state.lock().finish_selection(&record);
        if self.is_disposed() {
            debug!("session disposed during selection; not emitting");
            return None;
        }
        trace!(
            full_address = %record.full_address,
            structured = record.is_structured(),
            candidate_id = candidate_id.as_deref(),
            "address selected"
        );
        (self.on_select)(record.clone(), candidate_id);
        Some(record)
    }
}
