//! # Aggregation scopes and aggregate values.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use crate::identity::{InstanceId, PipelineId};
use crate::status::Status;

/// What an [`AggregateStatus`] is about.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// The whole process: every pipeline plus components outside any pipeline.
    Process,
    /// One pipeline: all instances that serve it.
    Pipeline(PipelineId),
    /// One instance.
    Instance(InstanceId),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Process => f.write_str("process"),
            Scope::Pipeline(p) => write!(f, "pipeline:{p}"),
            Scope::Instance(i) => write!(f, "instance:{i}"),
        }
    }
}

impl From<PipelineId> for Scope {
    fn from(p: PipelineId) -> Self {
        Scope::Pipeline(p)
    }
}

impl From<InstanceId> for Scope {
    fn from(i: InstanceId) -> Self {
        Scope::Instance(i)
    }
}

/// Resolved status of a scope.
///
/// - `status`: worst of `contributors` (own status for an instance)
/// - `error`: error detail of the worst contributing instance, if any
/// - `contributors`: what justified `status` (empty for an instance)
/// - `changed_at`: timestamp of the event that last changed `status`
/// - `updated_at`: timestamp of the latest event folded into this value
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateStatus {
    pub scope: Scope,
    pub status: Status,
    pub error: Option<Arc<str>>,
    pub contributors: BTreeMap<Scope, Status>,
    pub changed_at: SystemTime,
    pub updated_at: SystemTime,
}
