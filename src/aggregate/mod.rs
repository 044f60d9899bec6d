//! Aggregation core: last-known status table, worst-wins recomputation and
//! ordered dispatch to listeners.
//!
//! The only entry point is [`Aggregator`]; internal modules:
//! - [`tables`]: per-instance records and pipeline/process aggregates (unsynchronized);
//! - [`dispatch`]: ordered hand-off from `report`/`subscribe` to the listener set;
//! - [`builder`]: construction with initial listeners.

mod aggregator;
mod builder;
mod dispatch;
mod scope;
mod tables;

pub use aggregator::{Aggregator, ReportOutcome};
pub use builder::AggregatorBuilder;
pub use scope::{AggregateStatus, Scope};
