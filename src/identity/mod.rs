//! Component and pipeline identifiers.
//!
//! ## Contents
//! - [`ComponentId`], [`Kind`] what a component is
//! - [`PipelineId`], [`Signal`] which pipeline it serves
//! - [`InstanceId`] comparable key of one running instance plus its pipeline set

mod component;
mod instance;
mod pipeline;

pub use component::{ComponentId, Kind};
pub use instance::{InstanceId, Pipelines};
pub use pipeline::{PipelineId, Signal};
