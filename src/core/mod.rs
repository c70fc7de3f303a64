pub mod autocomplete;
pub mod compensation;
pub mod draft_store;
pub mod labels;
pub mod reconciler;
pub mod schedule;
pub mod sequencer;
pub mod signup;
pub mod validators;
pub mod wizard;

pub use crate::domain::model::{GigDraft, Role};
pub use crate::domain::ports::{AuthApi, Clock, GigApi, KeyValueStore, PlacesApi};
pub use crate::utils::error::Result;
