//! The outfit ledger: stock grouped by outfit type and wear level.
//!
//! [`OutfitGroup`] is a two-level ordered map:
//!
//! ```text
//! OutfitHandle -> WearBucket (wear level -> quantity)
//! ```
//!
//! # Cleanup rules
//!
//! - A wear level whose quantity reaches zero is deleted from its bucket.
//! - An outfit whose bucket becomes empty is deleted from the ledger.
//!
//! # Selection
//!
//! Removal, transfer, and price quotes all walk a bucket through the same
//! selection routine, most-worn-first or least-worn-first, taking
//! `min(available, remaining)` from each level. A quote from
//! [`OutfitGroup::cost_of`] therefore always prices exactly the units a
//! following [`OutfitGroup::remove_outfit`] would take.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use outfitter_types::OutfitHandle;

use crate::LedgerError;
use crate::cursor::Cursor;
use crate::curve::DepreciationCurve;

/// Quantities held of one outfit, keyed by wear level (ascending).
pub type WearBucket = BTreeMap<i32, u32>;

/// Which end of a bucket removals draw from first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WearOrder {
    /// Highest wear levels first (sell off the junk).
    MostWornFirst,
    /// Lowest wear levels first (hand over the best units).
    LeastWornFirst,
}

/// Direction of a signed transfer count.
///
/// A positive count moves units out of the calling ledger, a negative count
/// pulls units into it. Normalizing once up front means the transfer never
/// has to call itself with a flipped sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    /// Move `n` units from the caller to the destination.
    Outbound(u64),
    /// Move `n` units from the destination to the caller.
    Inbound(u64),
}

impl TransferDirection {
    /// Split a signed count into a direction and magnitude.
    ///
    /// Returns `None` for zero.
    pub const fn normalize(count: i64) -> Option<Self> {
        if count > 0 {
            Some(Self::Outbound(count.unsigned_abs()))
        } else if count < 0 {
            Some(Self::Inbound(count.unsigned_abs()))
        } else {
            None
        }
    }
}

/// A depreciation-aware inventory of outfits.
///
/// Owned by whatever holds the stock (a ship's cargo, a planet's outfitter).
/// Groups never share buckets; transfers decrement one group and increment
/// the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutfitGroup {
    outfits: BTreeMap<OutfitHandle, WearBucket>,
    curve: DepreciationCurve,
}

impl OutfitGroup {
    /// Create an empty group priced on the default curve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty group priced on `curve`.
    pub fn with_curve(curve: DepreciationCurve) -> Self {
        Self {
            outfits: BTreeMap::new(),
            curve,
        }
    }

    /// The curve used for every valuation in this group.
    pub const fn curve(&self) -> &DepreciationCurve {
        &self.curve
    }

    /// Replace the pricing curve. Stock is unaffected.
    pub fn set_curve(&mut self, curve: DepreciationCurve) {
        self.curve = curve;
    }

    /// Remove all stock.
    pub fn clear(&mut self) {
        self.outfits.clear();
    }

    /// Whether the group holds nothing.
    pub fn is_empty(&self) -> bool {
        self.outfits.is_empty()
    }

    /// The wear bucket for `outfit`, if any is held.
    pub fn find(&self, outfit: &OutfitHandle) -> Option<&WearBucket> {
        self.outfits.get(outfit)
    }

    /// Outfit types currently held, in iteration order.
    pub fn outfits(&self) -> impl Iterator<Item = &OutfitHandle> {
        self.outfits.keys()
    }

    pub(crate) const fn buckets(&self) -> &BTreeMap<OutfitHandle, WearBucket> {
        &self.outfits
    }

    /// Walk every `(outfit, wear, quantity)` triple.
    pub fn iter(&self) -> Cursor<'_> {
        Cursor::begin(self)
    }

    /// Walk the wear levels of a single outfit.
    pub fn iter_outfit<'a>(&'a self, outfit: &OutfitHandle) -> Cursor<'a> {
        Cursor::find(self, outfit)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Total units of `outfit` across all wear levels.
    pub fn total_count(&self, outfit: &OutfitHandle) -> u64 {
        self.find(outfit)
            .map_or(0, |bucket| bucket.values().map(|&q| u64::from(q)).sum())
    }

    /// Lowest wear level holding `outfit`.
    pub fn min_wear(&self, outfit: &OutfitHandle) -> Option<i32> {
        self.find(outfit)?.keys().next().copied()
    }

    /// Highest wear level holding `outfit`.
    pub fn max_wear(&self, outfit: &OutfitHandle) -> Option<i32> {
        self.find(outfit)?.keys().next_back().copied()
    }

    /// Sum of `attribute * quantity` over every unit held (e.g. total mass).
    pub fn total_attribute(&self, attribute: &str) -> f64 {
        self.iter()
            .map(|entry| entry.outfit().get(attribute) * f64::from(entry.quantity()))
            .sum()
    }

    /// Current value of everything held.
    pub fn total_cost(&self) -> i64 {
        self.iter()
            .fold(0_i64, |acc, entry| acc.saturating_add(entry.total_cost()))
    }

    /// Current value of everything held of `outfit`.
    pub fn total_cost_of(&self, outfit: &OutfitHandle) -> i64 {
        self.iter_outfit(outfit)
            .fold(0_i64, |acc, entry| acc.saturating_add(entry.total_cost()))
    }

    /// Value of a single unit of `outfit` at `wear` on this group's curve.
    pub fn cost(&self, outfit: &OutfitHandle, wear: i32) -> i64 {
        self.curve.cost(outfit, wear)
    }

    /// Quote the value of removing `count` units of `outfit` in `order`.
    ///
    /// Does not mutate the group. Stops early if stock runs out, so the
    /// quote covers only units that a removal would actually take.
    pub fn cost_of(&self, outfit: &OutfitHandle, count: u64, order: WearOrder) -> i64 {
        let Some(bucket) = self.find(outfit) else {
            return 0;
        };
        plan_removal(bucket, count, order)
            .into_iter()
            .fold(0_i64, |acc, (wear, taken)| {
                acc.saturating_add(self.cost(outfit, wear).saturating_mul(i64::from(taken)))
            })
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Change the quantity at exactly `(outfit, wear)` by `count`.
    ///
    /// A negative `count` removes units from that wear level only. Returns
    /// `count` on success.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientStock`] if a negative `count` exceeds the
    ///   units held at `wear`.
    /// - [`LedgerError::QuantityOverflow`] if the new quantity does not fit.
    /// - [`LedgerError::InvalidWear`] if `wear` is below zero.
    pub fn add_outfit(
        &mut self,
        outfit: &OutfitHandle,
        count: i64,
        wear: i32,
    ) -> Result<i64, LedgerError> {
        if count == 0 {
            return Ok(0);
        }
        if wear < 0 {
            warn!(outfit = outfit.name(), count, wear, "Rejected stock at negative wear");
            return Err(LedgerError::InvalidWear {
                outfit: outfit.name().to_owned(),
                wear,
            });
        }

        let available = self
            .find(outfit)
            .and_then(|bucket| bucket.get(&wear).copied())
            .unwrap_or(0);

        let updated = if count > 0 {
            u32::try_from(count)
                .ok()
                .and_then(|delta| available.checked_add(delta))
                .ok_or_else(|| LedgerError::QuantityOverflow {
                    outfit: outfit.name().to_owned(),
                    wear,
                })?
        } else {
            let requested = count.unsigned_abs();
            u32::try_from(requested)
                .ok()
                .and_then(|delta| available.checked_sub(delta))
                .ok_or_else(|| {
                    warn!(
                        outfit = outfit.name(),
                        wear, requested, available, "Rejected removal beyond stock at wear level"
                    );
                    LedgerError::InsufficientStock {
                        outfit: outfit.name().to_owned(),
                        wear,
                        requested,
                        available,
                    }
                })?
        };

        self.set_quantity(outfit, wear, updated);
        debug!(outfit = outfit.name(), count, wear, "Adjusted outfit stock");
        Ok(count)
    }

    /// Remove up to `count` units of `outfit`, walking wear levels in `order`.
    ///
    /// When `destination` is given, each removed unit is added there at the
    /// same wear level. Returns the number of units actually removed, which
    /// is less than `count` if the group runs out.
    ///
    /// # Errors
    ///
    /// [`LedgerError::QuantityOverflow`] if the destination cannot hold the
    /// moved units. Neither group is changed in that case.
    pub fn remove_outfit(
        &mut self,
        outfit: &OutfitHandle,
        count: u64,
        order: WearOrder,
        mut destination: Option<&mut Self>,
    ) -> Result<u64, LedgerError> {
        let Some(bucket) = self.find(outfit) else {
            return Ok(0);
        };
        let plan = plan_removal(bucket, count, order);

        if let Some(to) = destination.as_deref() {
            to.check_deposits(outfit, &plan)?;
        }

        let mut removed: u64 = 0;
        for &(wear, taken) in &plan {
            let held = self
                .find(outfit)
                .and_then(|b| b.get(&wear).copied())
                .unwrap_or(0);
            self.set_quantity(outfit, wear, held.saturating_sub(taken));
            if let Some(to) = destination.as_deref_mut() {
                to.deposit(outfit, wear, taken)?;
            }
            removed = removed.saturating_add(u64::from(taken));
        }

        debug!(
            outfit = outfit.name(),
            requested = count,
            removed,
            ?order,
            transferred = destination.is_some(),
            "Removed outfits"
        );
        Ok(removed)
    }

    /// Move units of `outfit` between this group and `destination`.
    ///
    /// - `count > 0`: move `count` units from `self` to `destination`, or
    ///   destroy them if there is no destination.
    /// - `count < 0`: move `|count|` units from `destination` into `self`, or
    ///   create them at `default_wear` if there is no destination.
    /// - `count == 0`: no-op.
    ///
    /// Returns the net number of units moved with the same sign convention
    /// as `count`, so `a.transfer_outfits(t, n, Some(b), ..)` equals
    /// `-b.transfer_outfits(t, -n, Some(a), ..)` from the same starting state.
    ///
    /// # Errors
    ///
    /// Propagates [`LedgerError::QuantityOverflow`] from the receiving side,
    /// and [`LedgerError::InvalidWear`] when creating stock at a negative
    /// `default_wear`.
    pub fn transfer_outfits(
        &mut self,
        outfit: &OutfitHandle,
        count: i64,
        destination: Option<&mut Self>,
        order: WearOrder,
        default_wear: i32,
    ) -> Result<i64, LedgerError> {
        let Some(direction) = TransferDirection::normalize(count) else {
            return Ok(0);
        };

        match (direction, destination) {
            (TransferDirection::Outbound(n), None) => {
                let removed = self.remove_outfit(outfit, n, order, None)?;
                Ok(signed_count(removed))
            }
            (TransferDirection::Inbound(_), None) => {
                // Materialize new stock; `count` is negative here.
                let added = self.add_outfit(outfit, count.saturating_neg(), default_wear)?;
                Ok(added.saturating_neg())
            }
            (TransferDirection::Outbound(n), Some(to)) => {
                let moved = self.remove_outfit(outfit, n, order, Some(to))?;
                Ok(signed_count(moved))
            }
            (TransferDirection::Inbound(n), Some(from)) => {
                let moved = from.remove_outfit(outfit, n, order, Some(self))?;
                Ok(signed_count(moved).saturating_neg())
            }
        }
    }

    /// Age every unit held by `delta` wear levels.
    ///
    /// Quantities landing on the same wear level are summed.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NegativeWear`] if a negative `delta` would push any
    ///   wear level below zero.
    /// - [`LedgerError::WearOverflow`] if any wear level would overflow.
    ///
    /// The whole group is checked before anything is changed.
    pub fn increment_wear(&mut self, delta: i32) -> Result<(), LedgerError> {
        if delta == 0 {
            return Ok(());
        }

        for (outfit, bucket) in &self.outfits {
            // Buckets shift uniformly, so checking both ends covers every key.
            for &wear in bucket.keys().next().into_iter().chain(bucket.keys().next_back()) {
                let shifted = wear.checked_add(delta).ok_or_else(|| LedgerError::WearOverflow {
                    outfit: outfit.name().to_owned(),
                    wear,
                    delta,
                })?;
                if delta < 0 && shifted < 0 {
                    warn!(outfit = outfit.name(), wear, delta, "Rejected wear increment");
                    return Err(LedgerError::NegativeWear {
                        outfit: outfit.name().to_owned(),
                        wear,
                        delta,
                    });
                }
            }
        }

        for bucket in self.outfits.values_mut() {
            let aged = core::mem::take(bucket);
            for (wear, quantity) in aged {
                bucket
                    .entry(wear.saturating_add(delta))
                    .and_modify(|q| *q = q.saturating_add(quantity))
                    .or_insert(quantity);
            }
        }

        debug!(delta, outfits = self.outfits.len(), "Incremented wear");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Store `quantity` at `(outfit, wear)`, deleting emptied entries.
    fn set_quantity(&mut self, outfit: &OutfitHandle, wear: i32, quantity: u32) {
        if quantity == 0 {
            if let Some(bucket) = self.outfits.get_mut(outfit) {
                bucket.remove(&wear);
                if bucket.is_empty() {
                    self.outfits.remove(outfit);
                }
            }
        } else {
            self.outfits
                .entry(outfit.clone())
                .or_default()
                .insert(wear, quantity);
        }
    }

    fn deposit(&mut self, outfit: &OutfitHandle, wear: i32, quantity: u32) -> Result<(), LedgerError> {
        let held = self
            .find(outfit)
            .and_then(|bucket| bucket.get(&wear).copied())
            .unwrap_or(0);
        let updated = held
            .checked_add(quantity)
            .ok_or_else(|| LedgerError::QuantityOverflow {
                outfit: outfit.name().to_owned(),
                wear,
            })?;
        self.set_quantity(outfit, wear, updated);
        Ok(())
    }

    fn check_deposits(&self, outfit: &OutfitHandle, plan: &[(i32, u32)]) -> Result<(), LedgerError> {
        let bucket = self.find(outfit);
        for &(wear, quantity) in plan {
            let held = bucket.and_then(|b| b.get(&wear).copied()).unwrap_or(0);
            if held.checked_add(quantity).is_none() {
                return Err(LedgerError::QuantityOverflow {
                    outfit: outfit.name().to_owned(),
                    wear,
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a OutfitGroup {
    type Item = crate::cursor::StockEntry<'a>;
    type IntoIter = Cursor<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Wear levels of `bucket` in selection order.
fn ordered_levels(bucket: &WearBucket, order: WearOrder) -> impl Iterator<Item = (i32, u32)> + '_ {
    let (forward, backward) = match order {
        WearOrder::LeastWornFirst => (Some(bucket.iter()), None),
        WearOrder::MostWornFirst => (None, Some(bucket.iter().rev())),
    };
    forward
        .into_iter()
        .flatten()
        .chain(backward.into_iter().flatten())
        .map(|(&wear, &quantity)| (wear, quantity))
}

/// The `(wear, units)` pairs a removal of `count` units would take.
fn plan_removal(bucket: &WearBucket, count: u64, order: WearOrder) -> Vec<(i32, u32)> {
    let mut remaining = count;
    let mut plan = Vec::new();
    for (wear, available) in ordered_levels(bucket, order) {
        if remaining == 0 {
            break;
        }
        // A level never holds more than `u32::MAX`, so a larger remainder takes it all.
        let taken = u32::try_from(remaining).map_or(available, |r| available.min(r));
        plan.push((wear, taken));
        remaining = remaining.saturating_sub(u64::from(taken));
    }
    plan
}

/// Unit count as a signed transfer result. Stock totals stay far below `i64::MAX`.
fn signed_count(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
