//! Core data model definitions shared across Segue crates.
//!
//! Everything in here is plain data: identifiers, monetary amounts, roles and
//! the records the continuation engine reasons about. Behaviour that needs
//! collaborators or time lives in `segue-core`.
#![allow(missing_docs)]

pub mod continuation;
pub mod credits;
pub mod error;
pub mod ids;
pub mod interaction;
pub mod prelude;
pub mod role;
pub mod video;
pub mod viewer;

pub use continuation::{AccessState, ContinuationStatus};
pub use credits::Credits;
pub use error::{ModelError, Result as ModelResult};
pub use ids::{VideoID, ViewerID};
pub use interaction::InteractionRecord;
pub use role::Role;
pub use video::Video;
pub use viewer::Viewer;
