use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::validation::Validate;

/// A record that participates in a dense, zero-based ordering within a scope.
pub trait OrderedEntity: Clone + fmt::Debug + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;
    /// The boundary within which `order` values must form `0..n`.
    /// Resources with a single global ordering use `()`.
    type Scope: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
    fn scope(&self) -> Self::Scope;
}

/// An ordered entity with its own create/update/delete endpoints.
pub trait Resource: OrderedEntity + Serialize + DeserializeOwned {
    type Draft: Validate + Serialize + Clone + fmt::Debug + Send + Sync + 'static;
    type Patch: Validate + Serialize + Clone + fmt::Debug + Send + Sync + 'static;

    /// Human label used in notices, e.g. "Project".
    const LABEL: &'static str;
    /// Lowercase collection name, e.g. "projects".
    const PLURAL: &'static str;

    fn flag(&self, _flag: Flag) -> Option<bool> {
        None
    }
}

/// A singleton saved as one atomic replacement.
pub trait Document: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Patch: Validate + Serialize + Clone + fmt::Debug + Send + Sync + 'static;

    const LABEL: &'static str;
}

/// Boolean toggles with dedicated endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Visible,
    Featured,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visibility",
            Self::Featured => "featured",
        }
    }

    /// Adjective pair used when reporting a toggle result.
    pub fn describe(&self, on: bool) -> &'static str {
        match (self, on) {
            (Self::Visible, true) => "visible",
            (Self::Visible, false) => "hidden",
            (Self::Featured, true) => "featured",
            (Self::Featured, false) => "unfeatured",
        }
    }
}
