//! Shared catalog types for the Outfitter inventory ledger.
//!
//! The ledger never owns or mutates item definitions. It only reads the
//! base cost, the category, and named attributes of the outfits registered
//! here, and compares them by handle identity.
//!
//! # Modules
//!
//! - [`outfit`] -- Outfit definitions, [`OutfitId`], and the shared [`OutfitHandle`]
//! - [`catalog`] -- The [`Catalog`] registry mapping names to handles

pub mod catalog;
pub mod outfit;

// Re-export all public types at crate root for convenience.
pub use catalog::{Catalog, CatalogError};
pub use outfit::{
    AGELESS_ATTRIBUTE, AMMUNITION_CATEGORY, Outfit, OutfitDefinition, OutfitHandle, OutfitId,
};
