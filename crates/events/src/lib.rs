//! `kontos-events` — commit notification plumbing between the write model
//! and the projection pipeline.

pub mod bus;
pub mod in_memory_bus;
pub mod notice;

pub use bus::{NoticeBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryNoticeBus};
pub use notice::CommitNotice;
