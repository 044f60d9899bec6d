//! # Pipeline identifiers.
//!
//! A [`PipelineId`] is a [`Signal`] plus an optional name, rendered as
//! `signal` or `signal/name` (e.g. `traces`, `logs/audit`).
//!
//! ## Ordering
//! `Signal` variants are declared alphabetically, so the derived `Ord` of
//! `PipelineId` matches the byte order of its textual form. The canonical
//! encoding inside [`InstanceId`](crate::InstanceId) relies on that.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::component::{validate_name, NAME_SEPARATOR};
use crate::error::IdentityError;

/// Telemetry signal carried by a pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    Logs,
    Metrics,
    Profiles,
    Traces,
}

impl Signal {
    /// Returns the lowercase name of the signal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Logs => "logs",
            Signal::Metrics => "metrics",
            Signal::Profiles => "profiles",
            Signal::Traces => "traces",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logs" => Ok(Signal::Logs),
            "metrics" => Ok(Signal::Metrics),
            "profiles" => Ok(Signal::Profiles),
            "traces" => Ok(Signal::Traces),
            _ => Err(IdentityError::UnknownSignal(s.to_string())),
        }
    }
}

/// Identifier of a pipeline: a signal and an optional name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineId {
    signal: Signal,
    name: Option<Arc<str>>,
}

impl PipelineId {
    /// Creates the default (unnamed) pipeline for a signal.
    pub fn new(signal: Signal) -> Self {
        Self { signal, name: None }
    }

    /// Creates a named pipeline.
    ///
    /// Fails if `name` is empty or contains whitespace or `/`.
    pub fn with_name(signal: Signal, name: impl Into<Arc<str>>) -> Result<Self, IdentityError> {
        let name: Arc<str> = name.into();
        validate_name("pipeline name", &name)?;
        Ok(Self {
            signal,
            name: Some(name),
        })
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}{NAME_SEPARATOR}{name}", self.signal),
            None => f.write_str(self.signal.as_str()),
        }
    }
}

impl FromStr for PipelineId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(NAME_SEPARATOR) {
            Some((signal, name)) => Self::with_name(signal.parse()?, name),
            None => Ok(Self::new(s.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let p: PipelineId = "traces/edge".parse().unwrap();
        assert_eq!(p.signal(), Signal::Traces);
        assert_eq!(p.name(), Some("edge"));
        assert_eq!(p.to_string(), "traces/edge");

        let p: PipelineId = "metrics".parse().unwrap();
        assert_eq!(p, PipelineId::new(Signal::Metrics));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            "spans".parse::<PipelineId>(),
            Err(IdentityError::UnknownSignal(_))
        ));
        assert!("logs/".parse::<PipelineId>().is_err());
        assert!("logs/a b".parse::<PipelineId>().is_err());
        assert!(PipelineId::with_name(Signal::Logs, "x/y").is_err());
    }

    #[test]
    fn test_ord_matches_text_order() {
        let mut ids: Vec<PipelineId> = ["traces", "logs/b", "metrics/a", "logs", "logs/a", "profiles"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();

        let mut texts: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let by_id = texts.clone();
        texts.sort();
        assert_eq!(by_id, texts);
    }
}
