//! Status model: states, severity order, events and the transition rules.
//!
//! ## Contents
//! - [`Status`] health states of an instance or aggregate
//! - [`Precedence`] total order used by worst-wins aggregation
//! - [`StatusEvent`] one timestamped observation for one instance
//! - [`transition`] pure validation/fold of per-instance timelines

mod event;
mod precedence;
mod state;
pub mod transition;

pub use event::StatusEvent;
pub use precedence::Precedence;
pub use state::Status;
pub use transition::Transition;
