//! Canonical ingredient records and identity.
//!
//! A canonical record is the authoritative row for one distinct ingredient
//! concept. Every free-text name the system sees is eventually pinned to
//! exactly one of these.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Globally unique, stable ingredient identifier.
///
/// # Examples
///
/// ```
/// use pantry_canon::IngredientId;
///
/// let id = IngredientId::new();
/// assert!(!id.is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(Uuid);

impl IngredientId {
    /// Creates a new random ingredient ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an ingredient ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns true if this is a nil (all zeros) UUID.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Parses an ID from its textual UUID form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidId`] when `value` is not a UUID.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidId {
                value: value.to_string(),
            })
    }
}

impl Default for IngredientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IngredientId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for IngredientId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<IngredientId> for Uuid {
    fn from(id: IngredientId) -> Self {
        id.0
    }
}

/// The authoritative record for one ingredient concept.
///
/// `name` is normalized and globally unique. `aliases` are normalized,
/// pairwise distinct, and never contain `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalIngredient {
    /// Globally unique identifier.
    pub id: IngredientId,

    /// Normalized primary name.
    pub name: String,

    /// Other normalized names this ingredient is known by.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Optional grouping such as "produce" or "dairy".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Unit used when a recipe gives none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_unit: Option<String>,

    /// When the record was first created.
    pub created_at: DateTime<Utc>,
}

impl CanonicalIngredient {
    /// Materializes a record from a creation request with a fresh ID.
    #[must_use]
    pub fn from_new(new: NewIngredient) -> Self {
        Self {
            id: IngredientId::new(),
            name: new.name,
            aliases: new.aliases,
            category: new.category,
            default_unit: new.default_unit,
            created_at: Utc::now(),
        }
    }

    /// Returns true if `candidate` equals the name or any alias exactly.
    #[must_use]
    pub fn is_known_as(&self, candidate: &str) -> bool {
        self.name == candidate || self.aliases.iter().any(|a| a == candidate)
    }

    /// Iterates over the name followed by every alias.
    pub fn surface_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Field values for a record that does not exist yet.
///
/// Callers are expected to pass normalized strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    /// Normalized primary name.
    pub name: String,
    /// Normalized aliases.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Optional category.
    #[serde(default)]
    pub category: Option<String>,
    /// Optional default unit.
    #[serde(default)]
    pub default_unit: Option<String>,
}

impl NewIngredient {
    /// A bare record carrying only a name, as write-through creation uses.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
