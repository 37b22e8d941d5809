//! Read-side storage and queries.

mod queries;
mod view_store;

pub use queries::{SummaryQueries, SummaryView};
pub use view_store::{InMemoryViewStore, ViewStore};
