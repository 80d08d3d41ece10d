//! Reference resolver: possibly-absent reference -> stable textual identifier.
//!
//! Live reference  -> its path name.
//! Absent reference -> "NULL <label>", where label defaults to the declared
//! type name of the field. Missing fog-of-war texture and missing map area both
//! render as null-like strings but stay distinguishable.

use std::fmt;

use crate::consts::NULL_REF_PREFIX;
use crate::registry::{Object, ObjectId, ObjectRegistry, TypeTag};

/// Result of resolving a reference: a path, or an absent marker with its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRef {
    Path(String),
    Absent { label: String },
}

impl ResolvedRef {
    pub fn is_absent(&self) -> bool {
        matches!(self, ResolvedRef::Absent { .. })
    }

    pub fn into_string(self) -> String {
        match self {
            ResolvedRef::Path(p) => p,
            absent => absent.to_string(),
        }
    }
}

impl fmt::Display for ResolvedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedRef::Path(p) => f.write_str(p),
            ResolvedRef::Absent { label } => write!(f, "{} {}", NULL_REF_PREFIX, label),
        }
    }
}

/// Pure core: object (or none) + fallback label.
pub fn path_or_null(obj: Option<&Object>, fallback: &str) -> ResolvedRef {
    match obj {
        Some(o) => ResolvedRef::Path(o.path.clone()),
        None => ResolvedRef::Absent {
            label: fallback.to_string(),
        },
    }
}

/// Resolver bound to a registry for the duration of one dump.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a ObjectRegistry,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a ObjectRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a ObjectRegistry {
        self.registry
    }

    /// Look up a live object of the expected kind. Stale handles and kind
    /// mismatches are absent.
    pub fn lookup(&self, r: Option<ObjectId>, expected: TypeTag) -> Option<&'a Object> {
        let obj = self.registry.get(r?)?;
        (obj.tag() == expected).then_some(obj)
    }

    /// Resolve with the expected type's name as the fallback label.
    pub fn resolve(&self, r: Option<ObjectId>, expected: TypeTag) -> ResolvedRef {
        self.resolve_labeled(r, expected, expected.type_name())
    }

    pub fn resolve_labeled(
        &self,
        r: Option<ObjectId>,
        expected: TypeTag,
        fallback: &str,
    ) -> ResolvedRef {
        path_or_null(self.lookup(r, expected), fallback)
    }

    /// Shorthand: resolved string with the default label.
    pub fn path(&self, r: Option<ObjectId>, expected: TypeTag) -> String {
        self.resolve(r, expected).into_string()
    }
}
