//! Protein/carbohydrate/fat percentage split of a diet plan.
//!
//! A [`MacroBreakdown`] always sums to exactly 100. Moving one share with
//! [`MacroBreakdown::rebalance`] redistributes the remainder over the other
//! two in proportion to their previous ratio to each other; the second of the
//! pair absorbs rounding so the total stays exact.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const TOTAL: u32 = 100;
pub const SLIDER_STEP: u32 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Macro {
    Protein,
    Carbs,
    Fat,
}

impl Macro {
    /// Editor bounds for this share.
    pub fn slider_range(self) -> RangeInclusive<u32> {
        match self {
            Macro::Protein => 10..=60,
            Macro::Carbs => 10..=70,
            Macro::Fat => 10..=60,
        }
    }

    /// Clamps to the slider bounds and snaps to the nearest step.
    pub fn snap_to_slider(self, value: u32) -> u32 {
        let range = self.slider_range();
        let clamped = value.clamp(*range.start(), *range.end());
        let snapped = (clamped + SLIDER_STEP / 2) / SLIDER_STEP * SLIDER_STEP;
        snapped.clamp(*range.start(), *range.end())
    }
}

/// Raw shares as they appear on the wire; not validated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroShares {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "MacroShares", into = "MacroShares")]
pub struct MacroBreakdown {
    protein: u32,
    carbs: u32,
    fat: u32,
}

impl Default for MacroBreakdown {
    fn default() -> Self {
        Self {
            protein: 30,
            carbs: 40,
            fat: 30,
        }
    }
}

/// `numerator / denominator` rounded half up.
fn round_div(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

impl MacroBreakdown {
    /// Rejects shares that do not add up to 100.
    pub fn new(protein: u32, carbs: u32, fat: u32) -> Result<Self, StoreError> {
        let sum = protein.saturating_add(carbs).saturating_add(fat);
        if sum != TOTAL {
            return Err(StoreError::validation(format!(
                "Macro percentages must add up to 100, got {sum}"
            )));
        }
        Ok(Self {
            protein,
            carbs,
            fat,
        })
    }

    /// Rescales arbitrary shares to sum to 100, keeping their proportions.
    /// All-zero input yields the default split.
    pub fn normalize(protein: u32, carbs: u32, fat: u32) -> Self {
        let sum = u64::from(protein) + u64::from(carbs) + u64::from(fat);
        if sum == u64::from(TOTAL) {
            return Self {
                protein,
                carbs,
                fat,
            };
        }
        if sum == 0 {
            return Self::default();
        }
        let scale = |v: u32| {
            let share = round_div(u64::from(v) * u64::from(TOTAL), sum);
            share.min(u64::from(TOTAL)) as u32
        };
        let protein = scale(protein);
        let carbs = scale(carbs).min(TOTAL - protein);
        Self {
            protein,
            carbs,
            fat: TOTAL - protein - carbs,
        }
    }

    pub fn protein(&self) -> u32 {
        self.protein
    }

    pub fn carbs(&self) -> u32 {
        self.carbs
    }

    pub fn fat(&self) -> u32 {
        self.fat
    }

    pub fn get(&self, m: Macro) -> u32 {
        match m {
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }

    /// Sets `changed` to `value` (capped at 100) and splits the remainder
    /// over the other two shares by their previous ratio. When both were zero
    /// the remainder is split evenly, the odd point going to the second.
    pub fn rebalance(self, changed: Macro, value: u32) -> Self {
        let value = value.min(TOTAL);
        let remaining = TOTAL - value;
        let (a, b) = match changed {
            Macro::Protein => (self.carbs, self.fat),
            Macro::Carbs => (self.protein, self.fat),
            Macro::Fat => (self.protein, self.carbs),
        };
        let first = if a + b == 0 {
            remaining / 2
        } else {
            round_div(u64::from(remaining * a), u64::from(a + b)).min(u64::from(remaining)) as u32
        };
        let second = remaining - first;
        match changed {
            Macro::Protein => Self {
                protein: value,
                carbs: first,
                fat: second,
            },
            Macro::Carbs => Self {
                protein: first,
                carbs: value,
                fat: second,
            },
            Macro::Fat => Self {
                protein: first,
                carbs: second,
                fat: value,
            },
        }
    }

    /// [`rebalance`](Self::rebalance) after snapping `value` to the slider of `changed`.
    pub fn rebalance_on_slider(self, changed: Macro, value: u32) -> Self {
        self.rebalance(changed, changed.snap_to_slider(value))
    }
}

impl From<MacroShares> for MacroBreakdown {
    fn from(s: MacroShares) -> Self {
        Self::normalize(s.protein, s.carbs, s.fat)
    }
}

impl From<MacroBreakdown> for MacroShares {
    fn from(m: MacroBreakdown) -> Self {
        Self {
            protein: m.protein,
            carbs: m.carbs,
            fat: m.fat,
        }
    }
}

impl TryFrom<MacroShares> for MacroBreakdownInput {
    type Error = StoreError;

    fn try_from(s: MacroShares) -> Result<Self, Self::Error> {
        MacroBreakdown::new(s.protein, s.carbs, s.fat).map(MacroBreakdownInput)
    }
}

/// A breakdown supplied by a caller: deserialization fails unless it sums to 100.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(try_from = "MacroShares")]
pub struct MacroBreakdownInput(pub MacroBreakdown);
