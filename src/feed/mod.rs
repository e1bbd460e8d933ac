// Interaction layer: the controller owning local view state, the comment
// panel state machine, and the local feed projection.

pub mod controller;
pub mod filter;
pub mod thread;

pub use controller::FeedController;
pub use filter::{CategoryFilter, FeedFilter};
pub use thread::{CommentThread, LoadPhase};
