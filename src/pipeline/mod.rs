//! Data acquisition pipeline: document sources and the polling loop.

pub mod poller;
pub mod source;
pub mod state;

pub use poller::Poller;
pub use source::{DocumentSource, FileSource, HttpSource};
pub use state::AppState;
