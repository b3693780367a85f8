//! The outfit catalog: a name-keyed registry of [`OutfitHandle`]s.
//!
//! Every outfit that can appear in a ledger is registered here once. The
//! catalog hands out handles; ledgers clone and compare those handles but
//! never look definitions up by name.

use std::collections::BTreeMap;

use crate::outfit::{Outfit, OutfitDefinition, OutfitHandle};

/// Errors that can occur when registering catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The outfit name was empty or whitespace.
    #[error("outfit name must not be empty")]
    EmptyName,

    /// An outfit with this name is already registered.
    #[error("duplicate outfit name: {0}")]
    DuplicateName(String),

    /// The base cost was negative.
    #[error("outfit {name} has negative cost {cost}")]
    NegativeCost {
        /// The offending outfit name.
        name: String,
        /// The rejected cost.
        cost: i64,
    },
}

/// Registry of every known outfit type, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    outfits: BTreeMap<String, OutfitHandle>,
}

impl Catalog {
    /// Create an empty catalog.
    pub const fn new() -> Self {
        Self {
            outfits: BTreeMap::new(),
        }
    }

    /// Build a catalog from a sequence of definitions.
    ///
    /// Stops at the first definition that fails validation.
    pub fn from_definitions<I>(definitions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = OutfitDefinition>,
    {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.register(definition)?;
        }
        Ok(catalog)
    }

    /// Register a definition and return its handle.
    pub fn register(&mut self, definition: OutfitDefinition) -> Result<OutfitHandle, CatalogError> {
        if definition.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if definition.cost < 0 {
            return Err(CatalogError::NegativeCost {
                name: definition.name,
                cost: definition.cost,
            });
        }
        if self.outfits.contains_key(&definition.name) {
            return Err(CatalogError::DuplicateName(definition.name));
        }

        let name = definition.name.clone();
        let handle = OutfitHandle::new(Outfit::new(definition));
        self.outfits.insert(name, handle.clone());
        Ok(handle)
    }

    /// Look up an outfit by name.
    pub fn get(&self, name: &str) -> Option<&OutfitHandle> {
        self.outfits.get(name)
    }

    /// Number of registered outfits.
    pub fn len(&self) -> usize {
        self.outfits.len()
    }

    /// Whether no outfits are registered.
    pub fn is_empty(&self) -> bool {
        self.outfits.is_empty()
    }

    /// Iterate over registered outfits in name order.
    pub fn iter(&self) -> impl Iterator<Item = &OutfitHandle> {
        self.outfits.values()
    }
}
