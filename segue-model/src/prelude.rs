//! Player/UI focused snapshot of the model surface.

pub use super::continuation::{AccessState, ContinuationStatus};
pub use super::credits::Credits;
pub use super::ids::{VideoID, ViewerID};
pub use super::interaction::InteractionRecord;
pub use super::role::Role;
pub use super::video::Video;
pub use super::viewer::Viewer;
