//! The offer wizard: a nine-step linear questionnaire.
//!
//! Each session owns its own step, committed responses, pending inputs and
//! advice cache. Inputs entered on a step stay pending until the user moves
//! forward, at which point they are committed to the response store.
//! Moving back never discards anything; restarting discards everything.

pub mod fields;
pub mod manager;
pub mod responses;
pub mod routes;
pub mod session;
pub mod state;

pub use fields::{FieldKey, FieldKind, FieldValue};
pub use manager::{AdviceAnswer, SessionManager, spawn_prune_task};
pub use responses::ResponseStore;
pub use routes::{ApiError, wizard_routes};
pub use session::{FieldView, SessionView, WizardSession};
pub use state::{WizardState, WizardStep};
