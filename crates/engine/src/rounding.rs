//! One rounding policy, applied where a computed number enters the store.

use rust_decimal::{Decimal, RoundingStrategy};

/// How a single rule wants its numeric result stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Use the engine's policy scale.
    #[default]
    Policy,
    /// Store the value as computed.
    Exact,
    /// Round to a fixed number of decimal places.
    Scale(u32),
}

/// Rounding applied at the write boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundingPolicy {
    pub scale: u32,
    pub strategy: RoundingStrategy,
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        RoundingPolicy {
            scale: 2,
            strategy: RoundingStrategy::MidpointAwayFromZero,
        }
    }
}

impl RoundingPolicy {
    pub fn with_scale(scale: u32) -> Self {
        RoundingPolicy {
            scale,
            ..Self::default()
        }
    }

    pub fn apply(&self, value: Decimal, precision: Precision) -> Decimal {
        match precision {
            Precision::Policy => value.round_dp_with_strategy(self.scale, self.strategy),
            Precision::Scale(n) => value.round_dp_with_strategy(n, self.strategy),
            Precision::Exact => value,
        }
    }
}
