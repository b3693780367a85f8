//! The depreciation curve: pure functions mapping wear to price.
//!
//! An unworn outfit (wear 0) sells for its full base cost. The first unit of
//! wear drops the value straight to `max_value`, after which it decays
//! linearly by `loss_per_wear` per wear unit until it bottoms out at
//! `min_value`:
//!
//! ```text
//! multiplier(0)    = 1.0
//! multiplier(wear) = max(min_value, max_value - loss_per_wear * (wear - 1))
//! cost(outfit, wear) = round(base_cost * multiplier(wear))
//! ```
//!
//! Ageless outfits and ammunition are always priced at wear 0.
//!
//! The same curve also answers the inverse question used when outfits are
//! acquired second-hand: "what wear corresponds to N% depreciation?"
//! [`DepreciationCurve::random_wear`] draws a starting wear from a
//! [`WearRange`] expressed as fractions of full depreciation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use outfitter_types::Outfit;

use crate::LedgerError;

/// Default value fraction once an outfit is fully depreciated.
pub const DEFAULT_MIN_VALUE: f64 = 0.40;

/// Default value fraction immediately after first use.
pub const DEFAULT_MAX_VALUE: f64 = 0.90;

/// Default value fraction lost per unit of wear.
pub const DEFAULT_LOSS_PER_WEAR: f64 = 0.0020;

/// Parameters of the depreciation curve.
///
/// Passed explicitly to every pricing call so that different economies (or
/// tests) can run with different curves. [`Default`] gives the standard
/// 40% / 90% / 0.2% curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepreciationCurve {
    /// Floor of the multiplier (default: 0.40).
    #[serde(default = "default_min_value")]
    pub min_value: f64,

    /// Multiplier right after the first unit of wear (default: 0.90).
    #[serde(default = "default_max_value")]
    pub max_value: f64,

    /// Multiplier lost per additional unit of wear (default: 0.0020).
    #[serde(default = "default_loss_per_wear")]
    pub loss_per_wear: f64,
}

const fn default_min_value() -> f64 {
    DEFAULT_MIN_VALUE
}

const fn default_max_value() -> f64 {
    DEFAULT_MAX_VALUE
}

const fn default_loss_per_wear() -> f64 {
    DEFAULT_LOSS_PER_WEAR
}

impl Default for DepreciationCurve {
    fn default() -> Self {
        Self {
            min_value: DEFAULT_MIN_VALUE,
            max_value: DEFAULT_MAX_VALUE,
            loss_per_wear: DEFAULT_LOSS_PER_WEAR,
        }
    }
}

impl DepreciationCurve {
    /// Check that the parameters describe a usable curve.
    ///
    /// Both value fractions must lie in `[0, 1]` with `min_value <= max_value`,
    /// and the loss rate must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.min_value) || !in_unit(self.max_value) {
            return Err(LedgerError::InvalidCurve(format!(
                "value fractions must lie in [0, 1], got min {} max {}",
                self.min_value, self.max_value
            )));
        }
        if self.min_value > self.max_value {
            return Err(LedgerError::InvalidCurve(format!(
                "min_value {} exceeds max_value {}",
                self.min_value, self.max_value
            )));
        }
        if !self.loss_per_wear.is_finite() || self.loss_per_wear <= 0.0 {
            return Err(LedgerError::InvalidCurve(format!(
                "loss_per_wear must be positive, got {}",
                self.loss_per_wear
            )));
        }
        Ok(())
    }

    /// Price multiplier for a given wear level.
    ///
    /// Wear at or below zero prices as new.
    pub fn price_multiplier(&self, wear: i32) -> f64 {
        if wear <= 0 {
            return 1.0;
        }
        let worn = f64::from(wear) - 1.0;
        self.min_value.max(self.max_value - self.loss_per_wear * worn)
    }

    /// Multiplier actually applied to `outfit` at `wear`.
    ///
    /// Outfits that ignore wear are always priced as new.
    pub fn effective_multiplier(&self, outfit: &Outfit, wear: i32) -> f64 {
        if outfit.ignores_wear() {
            1.0
        } else {
            self.price_multiplier(wear)
        }
    }

    /// Value of a single unit of `outfit` at `wear`, rounded to whole credits.
    pub fn cost(&self, outfit: &Outfit, wear: i32) -> i64 {
        scale_credits(outfit.cost(), self.effective_multiplier(outfit, wear))
    }

    /// Wear level at which the multiplier first reaches `min_value`.
    pub fn full_depreciation_wear(&self) -> f64 {
        (self.max_value - self.min_value) / self.loss_per_wear + 1.0
    }

    /// Half-open wear interval `[lo, hi)` for a depreciation range.
    ///
    /// Both bounds are floored.
    pub fn wear_bounds(&self, range: WearRange) -> (i32, i32) {
        let full = self.full_depreciation_wear();
        (
            floor_wear(full * range.min_fraction),
            floor_wear(full * range.max_fraction),
        )
    }

    /// Draw a random wear level uniformly from [`wear_bounds`](Self::wear_bounds).
    ///
    /// An empty interval yields its lower bound.
    pub fn random_wear<R: Rng + ?Sized>(&self, rng: &mut R, range: WearRange) -> i32 {
        let (lo, hi) = self.wear_bounds(range);
        if hi <= lo {
            return lo;
        }
        rng.random_range(lo..hi)
    }
}

/// A band of depreciation expressed as fractions of full depreciation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WearRange {
    /// Lower fraction (inclusive).
    pub min_fraction: f64,

    /// Upper fraction (exclusive).
    pub max_fraction: f64,
}

impl WearRange {
    /// Outfits bought second-hand: 20% to 50% depreciated.
    pub const USED: Self = Self {
        min_fraction: 0.2,
        max_fraction: 0.5,
    };

    /// Outfits taken from a disabled ship: 70% to 90% depreciated.
    pub const PLUNDERED: Self = Self {
        min_fraction: 0.7,
        max_fraction: 0.9,
    };

    /// Check that `0 <= min_fraction <= max_fraction`.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let valid = self.min_fraction.is_finite()
            && self.max_fraction.is_finite()
            && self.min_fraction >= 0.0
            && self.min_fraction <= self.max_fraction;
        if valid {
            Ok(())
        } else {
            Err(LedgerError::InvalidWearRange {
                min_fraction: self.min_fraction,
                max_fraction: self.max_fraction,
            })
        }
    }
}

/// Named acquisition presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WearPreset {
    /// Bought from a used-outfit dealer.
    Used,
    /// Captured or looted; rougher handling.
    Plundered,
}

impl WearPreset {
    /// The depreciation band for this preset.
    pub const fn range(self) -> WearRange {
        match self {
            Self::Used => WearRange::USED,
            Self::Plundered => WearRange::PLUNDERED,
        }
    }
}

/// [`DepreciationCurve::price_multiplier`] on the default curve.
pub fn price_multiplier(wear: i32) -> f64 {
    DepreciationCurve::default().price_multiplier(wear)
}

/// [`DepreciationCurve::cost`] on the default curve.
pub fn cost(outfit: &Outfit, wear: i32) -> i64 {
    DepreciationCurve::default().cost(outfit, wear)
}

/// Random wear for a used outfit on the default curve.
pub fn used_wear<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    DepreciationCurve::default().random_wear(rng, WearPreset::Used.range())
}

/// Random wear for a plundered outfit on the default curve.
pub fn plunder_wear<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    DepreciationCurve::default().random_wear(rng, WearPreset::Plundered.range())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn scale_credits(base: i64, multiplier: f64) -> i64 {
    (base as f64 * multiplier).round() as i64
}

#[allow(clippy::cast_possible_truncation)]
fn floor_wear(value: f64) -> i32 {
    value.floor() as i32
}
