mod address;
mod config;
mod debounce;
mod details;
mod errors;
mod places;
mod session;
mod state;
mod suggestions;
mod view;

use once_cell::sync::OnceCell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use address::{AddressComponent, AddressRecord, ComponentKind, Suggestion};
pub use config::{AppConfig, PublicAppConfig};
pub use debounce::Debouncer;
pub use details::DetailResolver;
pub use errors::{AppError, AppResult, FetchError};
pub use places::{ApiResponse, HttpPlacesClient, PlacesApi, PlacesService};
pub use session::{AddressSession, InputProps, SelectionCallback};
pub use state::{Phase, ResolutionState};
pub use suggestions::SuggestionFetcher;
pub use view::{ListDisplay, SessionView, SuggestionItem};

/// Installs the global tracing subscriber once; later calls are no-ops.
pub fn init_tracing() {
    static INIT: OnceCell<()> = OnceCell::new();
    let _ = INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,address_autocomplete=debug"));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    });
}
