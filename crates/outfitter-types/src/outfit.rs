//! Outfit definitions and the shared handle the ledger keys on.
//!
//! An [`OutfitDefinition`] is plain data (deserializable from configuration).
//! Registering it in a [`Catalog`](crate::Catalog) produces an [`Outfit`]
//! with a fresh [`OutfitId`], wrapped in an [`OutfitHandle`]. Two handles
//! are the same outfit iff they point at the same catalog entry.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier issued to each registered outfit.
///
/// UUID v7, so outfits registered earlier in a run usually sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutfitId(pub Uuid);

impl OutfitId {
    /// Issue a fresh time-ordered identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for OutfitId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for OutfitId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Attribute flag marking an outfit as exempt from wear depreciation.
pub const AGELESS_ATTRIBUTE: &str = "ageless";

/// Category whose outfits never depreciate.
pub const AMMUNITION_CATEGORY: &str = "Ammunition";

/// Raw catalog data for one outfit type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitDefinition {
    /// Display name, unique within a catalog.
    pub name: String,

    /// Base (unworn) cost in credits.
    pub cost: i64,

    /// Category name, e.g. "Guns" or "Ammunition".
    #[serde(default)]
    pub category: String,

    /// Named numeric attributes such as `mass` or `ageless`.
    #[serde(default)]
    pub attributes: BTreeMap<String, f64>,
}

impl OutfitDefinition {
    /// Create a definition with no attributes.
    pub fn new(name: impl Into<String>, cost: i64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cost,
            category: category.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style setter for a named attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

/// A registered, immutable outfit type.
#[derive(Debug, Clone, PartialEq)]
pub struct Outfit {
    id: OutfitId,
    definition: OutfitDefinition,
}

impl Outfit {
    /// Wrap a definition with a freshly generated identifier.
    pub fn new(definition: OutfitDefinition) -> Self {
        Self {
            id: OutfitId::new(),
            definition,
        }
    }

    /// The catalog identifier.
    pub const fn id(&self) -> OutfitId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Base (unworn) cost.
    pub const fn cost(&self) -> i64 {
        self.definition.cost
    }

    /// Category name.
    pub fn category(&self) -> &str {
        &self.definition.category
    }

    /// Value of a named attribute, or 0 if the outfit does not define it.
    pub fn get(&self, attribute: &str) -> f64 {
        self.definition.attributes.get(attribute).copied().unwrap_or(0.0)
    }

    /// Whether the outfit carries a non-zero `ageless` attribute.
    pub fn is_ageless(&self) -> bool {
        self.get(AGELESS_ATTRIBUTE) != 0.0
    }

    /// Whether the outfit belongs to the ammunition category.
    pub fn is_ammunition(&self) -> bool {
        self.definition.category == AMMUNITION_CATEGORY
    }

    /// Whether the cost model prices this outfit as if it were unworn.
    pub fn ignores_wear(&self) -> bool {
        self.is_ageless() || self.is_ammunition()
    }

    /// The underlying definition.
    pub const fn definition(&self) -> &OutfitDefinition {
        &self.definition
    }
}

/// Shared reference to a registered [`Outfit`].
///
/// Equality is identity: two handles are equal only when they point at the
/// same allocation. Ordering is by [`OutfitId`] first and allocation address
/// second, which is stable for the lifetime of the handles.
#[derive(Debug, Clone)]
pub struct OutfitHandle(Arc<Outfit>);

impl OutfitHandle {
    /// Wrap an outfit in a new handle.
    pub fn new(outfit: Outfit) -> Self {
        Self(Arc::new(outfit))
    }

    /// Whether two handles reference the same catalog entry.
    pub fn same_outfit(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn address(&self) -> usize {
        Arc::as_ptr(&self.0).addr()
    }
}

impl core::ops::Deref for OutfitHandle {
    type Target = Outfit;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for OutfitHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_outfit(other)
    }
}

impl Eq for OutfitHandle {}

impl PartialOrd for OutfitHandle {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OutfitHandle {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.0
            .id
            .cmp(&other.0.id)
            .then_with(|| self.address().cmp(&other.address()))
    }
}

impl core::hash::Hash for OutfitHandle {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl core::fmt::Display for OutfitHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
