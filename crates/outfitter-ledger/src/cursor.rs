//! Flattening cursor over an [`OutfitGroup`].
//!
//! The ledger is nested (outfit -> wear -> quantity) but most callers want a
//! flat sequence of `(outfit, wear, quantity)` triples. [`Cursor`] walks the
//! nested maps in canonical order: outfits in handle order, wear levels
//! ascending within each outfit.
//!
//! A cursor is either [`CursorState::Positioned`] on a triple or
//! [`CursorState::End`]. Advancing looks up the next key with a range query
//! on the underlying maps, so the cursor holds no iterator state that could
//! disagree with its position.
//!
//! Any mutation of the group requires `&mut`, so a live cursor can never
//! observe a half-updated ledger.

use core::ops::Bound;

use outfitter_types::OutfitHandle;

use crate::group::{OutfitGroup, WearBucket, WearOrder};

/// Where a cursor currently points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorState<'a> {
    /// On the entry `(outfit, wear)`.
    Positioned {
        /// The current outfit key.
        outfit: &'a OutfitHandle,
        /// The current wear key.
        wear: i32,
    },
    /// Past the last entry.
    End,
}

/// How far a cursor walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorScope {
    /// Every outfit in the group.
    All,
    /// Only the wear levels of the outfit the cursor started on.
    Outfit,
}

/// A read-only walk over the triples of an [`OutfitGroup`].
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    group: &'a OutfitGroup,
    state: CursorState<'a>,
    scope: CursorScope,
}

impl<'a> Cursor<'a> {
    /// Cursor on the first triple of `group`.
    pub fn begin(group: &'a OutfitGroup) -> Self {
        let state = first_position(group.buckets().iter());
        Self {
            group,
            state,
            scope: CursorScope::All,
        }
    }

    /// Cursor already past the end of `group`.
    pub const fn end(group: &'a OutfitGroup) -> Self {
        Self {
            group,
            state: CursorState::End,
            scope: CursorScope::All,
        }
    }

    /// Cursor on the least-worn entry of `outfit`, ending after its last.
    ///
    /// Starts at [`CursorState::End`] if the group holds no `outfit`.
    pub fn find(group: &'a OutfitGroup, outfit: &OutfitHandle) -> Self {
        let state = group
            .buckets()
            .get_key_value(outfit)
            .map_or(CursorState::End, |entry| first_position(core::iter::once(entry)));
        Self {
            group,
            state,
            scope: CursorScope::Outfit,
        }
    }

    /// The current position.
    pub const fn state(&self) -> CursorState<'a> {
        self.state
    }

    /// The walk's scope.
    pub const fn scope(&self) -> CursorScope {
        self.scope
    }

    /// Whether the cursor is past its last entry.
    pub const fn is_end(&self) -> bool {
        matches!(self.state, CursorState::End)
    }

    /// The entry under the cursor, or `None` at the end.
    pub fn current(&self) -> Option<StockEntry<'a>> {
        let CursorState::Positioned { outfit, wear } = self.state else {
            return None;
        };
        let quantity = *self.group.find(outfit)?.get(&wear)?;
        Some(StockEntry {
            group: self.group,
            outfit,
            wear,
            quantity,
        })
    }

    /// Move to the next entry.
    ///
    /// Past the last wear level of an outfit, an [`CursorScope::All`] cursor
    /// moves on to the next outfit and a [`CursorScope::Outfit`] cursor ends.
    pub fn advance(&mut self) {
        let CursorState::Positioned { outfit, wear } = self.state else {
            return;
        };
        let buckets = self.group.buckets();

        let next_wear = buckets.get(outfit).and_then(|bucket| {
            bucket
                .range((Bound::Excluded(wear), Bound::Unbounded))
                .next()
                .map(|(&w, _)| w)
        });
        if let Some(wear) = next_wear {
            self.state = CursorState::Positioned { outfit, wear };
            return;
        }

        self.state = match self.scope {
            CursorScope::Outfit => CursorState::End,
            CursorScope::All => {
                first_position(buckets.range::<OutfitHandle, _>((Bound::Excluded(outfit), Bound::Unbounded)))
            }
        };
    }
}

/// First `(outfit, wear)` among `entries`, skipping any empty bucket.
fn first_position<'a, I>(entries: I) -> CursorState<'a>
where
    I: IntoIterator<Item = (&'a OutfitHandle, &'a WearBucket)>,
{
    entries
        .into_iter()
        .find_map(|(outfit, bucket)| {
            bucket
                .keys()
                .next()
                .map(|&wear| CursorState::Positioned { outfit, wear })
        })
        .unwrap_or(CursorState::End)
}

impl<'a> Iterator for Cursor<'a> {
    type Item = StockEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.current()?;
        self.advance();
        Some(entry)
    }
}

impl core::iter::FusedIterator for Cursor<'_> {}

impl PartialEq for Cursor<'_> {
    /// Two cursors are equal when both have ended, or when they walk the same
    /// group and sit on the same `(outfit, wear)` position.
    fn eq(&self, other: &Self) -> bool {
        match (self.state, other.state) {
            (CursorState::End, CursorState::End) => true,
            (
                CursorState::Positioned { outfit: a, wear: wa },
                CursorState::Positioned { outfit: b, wear: wb },
            ) => core::ptr::eq(self.group, other.group) && a == b && wa == wb,
            _ => false,
        }
    }
}

/// One `(outfit, wear, quantity)` triple and its valuation.
#[derive(Debug, Clone, Copy)]
pub struct StockEntry<'a> {
    group: &'a OutfitGroup,
    outfit: &'a OutfitHandle,
    wear: i32,
    quantity: u32,
}

impl<'a> StockEntry<'a> {
    /// The outfit type.
    pub const fn outfit(&self) -> &'a OutfitHandle {
        self.outfit
    }

    /// The wear level.
    pub const fn wear(&self) -> i32 {
        self.wear
    }

    /// Units held at this wear level.
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Current value of all units at this position.
    pub fn total_cost(&self) -> i64 {
        self.group
            .cost(self.outfit, self.wear)
            .saturating_mul(i64::from(self.quantity))
    }

    /// Unworn value of all units at this position.
    pub fn total_base_cost(&self) -> i64 {
        self.outfit.cost().saturating_mul(i64::from(self.quantity))
    }

    /// Current value relative to base cost.
    pub fn cost_ratio(&self) -> f64 {
        self.group.curve().effective_multiplier(self.outfit, self.wear)
    }

    /// Value range of a single unit across everything held of this outfit.
    pub fn cost_ratio_range(&self) -> CostRatioRange {
        CostRatioRange {
            min_cost: self.group.cost_of(self.outfit, 1, WearOrder::MostWornFirst),
            max_cost: self.group.cost_of(self.outfit, 1, WearOrder::LeastWornFirst),
            base_cost: self.outfit.cost(),
        }
    }
}

/// Cheapest and priciest single unit of an outfit, against its base cost.
///
/// Displays as a whole percentage (`"90%"`) when every unit is worth the
/// same, or as a range (`"40%-90%"`) otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostRatioRange {
    /// Value of the most worn unit.
    pub min_cost: i64,
    /// Value of the least worn unit.
    pub max_cost: i64,
    /// Unworn value.
    pub base_cost: i64,
}

impl CostRatioRange {
    /// `min_cost / base_cost`.
    pub fn min_ratio(&self) -> f64 {
        ratio(self.min_cost, self.base_cost)
    }

    /// `max_cost / base_cost`.
    pub fn max_ratio(&self) -> f64 {
        ratio(self.max_cost, self.base_cost)
    }

    /// Whether every unit has the same value.
    pub const fn is_uniform(&self) -> bool {
        self.min_cost == self.max_cost
    }
}

impl core::fmt::Display for CostRatioRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_uniform() {
            write!(f, "{}%", percent(self.min_ratio()))
        } else {
            write!(
                f,
                "{}%-{}%",
                percent(self.min_ratio()),
                percent(self.max_ratio())
            )
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(value: i64, base: i64) -> f64 {
    if base == 0 {
        return 1.0;
    }
    value as f64 / base as f64
}

#[allow(clippy::cast_possible_truncation)]
fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}
