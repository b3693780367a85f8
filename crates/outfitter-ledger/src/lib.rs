//! Depreciation-aware outfit ledger for the Outfitter economy.
//!
//! An [`OutfitGroup`] tracks countable outfits grouped by outfit type and by
//! wear level at the same time. Quantities can be added, removed, and moved
//! between groups without losing the wear of the moved units, and every
//! holding can be valued against a [`DepreciationCurve`].
//!
//! # Architecture
//!
//! - [`curve`] -- The cost model: [`DepreciationCurve`], wear presets, and
//!   random starting wear for second-hand outfits.
//! - [`group`] -- The [`OutfitGroup`] ledger: mutation, transfer, aging, and
//!   valuation queries.
//! - [`cursor`] -- [`Cursor`], the flattening walk over `(outfit, wear,
//!   quantity)` triples, and the per-position [`StockEntry`] view.
//!
//! # Invariants
//!
//! - Every stored quantity is strictly positive.
//! - No outfit maps to an empty wear bucket.
//! - Iteration visits outfits in handle order, then wear levels ascending.
//!
//! # Usage
//!
//! ```
//! use outfitter_ledger::{OutfitGroup, WearOrder};
//! use outfitter_types::{Catalog, OutfitDefinition};
//!
//! let mut catalog = Catalog::new();
//! let laser = catalog
//!     .register(OutfitDefinition::new("Laser Cannon", 1_000, "Guns"))
//!     .ok();
//! let Some(laser) = laser else { return };
//!
//! let mut cargo = OutfitGroup::new();
//! cargo.add_outfit(&laser, 3, 0).ok();
//! cargo.add_outfit(&laser, 2, 100).ok();
//! assert_eq!(cargo.total_count(&laser), 5);
//!
//! let removed = cargo.remove_outfit(&laser, 4, WearOrder::MostWornFirst, None);
//! assert_eq!(removed.ok(), Some(4));
//! assert_eq!(cargo.total_count(&laser), 1);
//! assert_eq!(cargo.max_wear(&laser), Some(0));
//! ```

pub mod cursor;
pub mod curve;
pub mod group;

// Re-export primary types at crate root.
pub use cursor::{CostRatioRange, Cursor, CursorScope, CursorState, StockEntry};
pub use curve::{
    DepreciationCurve, WearPreset, WearRange, cost, plunder_wear, price_multiplier, used_wear,
};
pub use group::{OutfitGroup, TransferDirection, WearBucket, WearOrder};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Contract violations rejected by the ledger.
///
/// Ordinary shortfalls (asking to remove more than is held) are not errors;
/// those operations report the smaller amount actually moved. These variants
/// cover requests that would break a ledger invariant. When one is returned
/// the ledger is left unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// A negative delta asked for more units than exist at one wear level.
    #[error("insufficient stock of {outfit} at wear {wear}: wanted {requested} but only have {available}")]
    InsufficientStock {
        /// Outfit name.
        outfit: String,
        /// The exact wear level targeted.
        wear: i32,
        /// Units the caller tried to take.
        requested: u64,
        /// Units held at that wear level.
        available: u32,
    },

    /// A quantity would exceed the storable maximum.
    #[error("quantity overflow for {outfit} at wear {wear}")]
    QuantityOverflow {
        /// Outfit name.
        outfit: String,
        /// The wear level being incremented.
        wear: i32,
    },

    /// A wear increment would push a wear level below zero.
    #[error("wear increment of {delta} would make {outfit} wear {wear} negative")]
    NegativeWear {
        /// Outfit name.
        outfit: String,
        /// The stored wear level.
        wear: i32,
        /// The rejected increment.
        delta: i32,
    },

    /// Stock was offered at a wear level below zero.
    #[error("cannot store {outfit} at negative wear {wear}")]
    InvalidWear {
        /// Outfit name.
        outfit: String,
        /// The rejected wear level.
        wear: i32,
    },

    /// A wear increment would overflow the wear counter.
    #[error("wear increment of {delta} overflows {outfit} wear {wear}")]
    WearOverflow {
        /// Outfit name.
        outfit: String,
        /// The stored wear level.
        wear: i32,
        /// The rejected increment.
        delta: i32,
    },

    /// Depreciation curve parameters are unusable.
    #[error("invalid depreciation curve: {0}")]
    InvalidCurve(String),

    /// A wear range does not describe a usable band.
    #[error("invalid wear range: {min_fraction} to {max_fraction}")]
    InvalidWearRange {
        /// Lower fraction.
        min_fraction: f64,
        /// Upper fraction.
        max_fraction: f64,
    },
}
