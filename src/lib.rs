pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;

pub use adapters::{http::ApiClient, places::PlacesClient, storage::FileStorage, storage::MemoryStorage};
pub use core::{
    draft_store::DraftStore,
    reconciler::{Reconciliation, ReviewReconciler},
    signup::{RoleSession, SignUpFlow, SignUpOutcome},
    wizard::{GigWizard, Navigation, WizardState},
};
pub use utils::error::{Result, WizardError};
