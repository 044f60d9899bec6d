//! # Component identifiers.
//!
//! [`ComponentId`] names a configured component (`type` plus optional `name`,
//! rendered as `type` or `type/name`), and [`Kind`] classifies it.
//!
//! ## Example
//! ```rust
//! use statusvisor::{ComponentId, Kind};
//!
//! let id: ComponentId = "otlp/in".parse().unwrap();
//! assert_eq!(id.ty(), "otlp");
//! assert_eq!(id.name(), Some("in"));
//! assert_eq!(id.to_string(), "otlp/in");
//! assert_eq!("exporter".parse::<Kind>().unwrap(), Kind::Exporter);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::IdentityError;

/// Separator between a type (or signal) and a name in textual identifiers.
pub(crate) const NAME_SEPARATOR: char = '/';

/// Checks that a type/name is usable inside textual and canonical encodings.
pub(crate) fn validate_name(what: &'static str, value: &str) -> Result<(), IdentityError> {
    if value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == NAME_SEPARATOR)
    {
        return Err(IdentityError::InvalidName {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Identifier of a configured component: a type and an optional name.
///
/// Cheap to clone (`Arc`-backed). Construction via [`ComponentId::new`] /
/// [`ComponentId::with_name`] does not validate; emptiness is checked when an
/// [`InstanceId`](crate::InstanceId) is built, and parsing validates fully.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId {
    ty: Arc<str>,
    name: Option<Arc<str>>,
}

impl ComponentId {
    /// Creates an unnamed component identifier.
    pub fn new(ty: impl Into<Arc<str>>) -> Self {
        Self {
            ty: ty.into(),
            name: None,
        }
    }

    /// Creates a named component identifier. An empty name is treated as no name.
    pub fn with_name(ty: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        let name: Arc<str> = name.into();
        Self {
            ty: ty.into(),
            name: (!name.is_empty()).then_some(name),
        }
    }

    /// Component type (e.g. `otlp`).
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// Optional component name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` if the type is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ty.is_empty()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}{NAME_SEPARATOR}{name}", self.ty),
            None => f.write_str(&self.ty),
        }
    }
}

impl FromStr for ComponentId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdentityError::EmptyComponent);
        }
        match s.split_once(NAME_SEPARATOR) {
            Some((ty, name)) => {
                validate_name("component type", ty)?;
                validate_name("component name", name)?;
                Ok(Self::with_name(ty, name))
            }
            None => {
                validate_name("component type", s)?;
                Ok(Self::new(s))
            }
        }
    }
}

/// Category of a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Receiver,
    Processor,
    Exporter,
    Connector,
    /// Not part of any pipeline; contributes directly to the process status.
    Extension,
}

impl Kind {
    /// Returns the lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Receiver => "receiver",
            Kind::Processor => "processor",
            Kind::Exporter => "exporter",
            Kind::Connector => "connector",
            Kind::Extension => "extension",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "receiver" => Ok(Kind::Receiver),
            "processor" => Ok(Kind::Processor),
            "exporter" => Ok(Kind::Exporter),
            "connector" => Ok(Kind::Connector),
            "extension" => Ok(Kind::Extension),
            _ => Err(IdentityError::InvalidKind(s.to_string())),
        }
    }
}
