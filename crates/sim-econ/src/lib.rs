#![deny(warnings)]

//! Trip economics: duration scaling and fare revenue.
//!
//! All arithmetic is exact decimal so that level steps of 10% never drift:
//! - Speed upgrades cut 10% of base duration per level above 1, capped at 50%
//! - Fare bonus upgrades add 10% of base revenue per level above 1
//! - Durations round to nearest (ties to even) with a floor of one turn
//! - Earnings truncate to whole KES

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Errors produced by trip economics helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EconError {
    /// Upgrade levels start at 1.
    #[error("invalid upgrade level: {0}")]
    InvalidLevel(u32),
    /// Result does not fit the target integer type.
    #[error("numeric overflow")]
    Overflow,
}

/// Effect of one upgrade level: 0.10.
fn level_step() -> Decimal {
    Decimal::new(10, 2)
}

/// Largest duration reduction speed upgrades can give: 0.50.
fn max_speed_reduction() -> Decimal {
    Decimal::new(50, 2)
}

fn levels_above_base(level: u32) -> Result<Decimal, EconError> {
    if level == 0 {
        return Err(EconError::InvalidLevel(level));
    }
    Ok(Decimal::from(level - 1))
}

/// Fraction of base duration removed by `speed_level`, in [0, 0.5].
///
/// Example:
/// assert_eq!(speed_reduction(3).unwrap(), Decimal::new(20, 2));
pub fn speed_reduction(speed_level: u32) -> Result<Decimal, EconError> {
    let raw = levels_above_base(speed_level)? * level_step();
    Ok(raw.min(max_speed_reduction()))
}

/// Trip length in turns: `max(1, round(base * (1 - reduction)))`.
///
/// Example:
/// assert_eq!(trip_duration(6, 2).unwrap(), 5); // 5.4 rounds down
pub fn trip_duration(base_duration: u32, speed_level: u32) -> Result<u32, EconError> {
    let modifier = Decimal::ONE - speed_reduction(speed_level)?;
    let scaled = (Decimal::from(base_duration) * modifier)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let turns = scaled.to_u32().ok_or(EconError::Overflow)?;
    Ok(turns.max(1))
}

/// Revenue multiplier for `fare_bonus_level`: `1 + (level - 1) * 0.10`.
pub fn fare_bonus_multiplier(fare_bonus_level: u32) -> Result<Decimal, EconError> {
    Ok(Decimal::ONE + levels_above_base(fare_bonus_level)? * level_step())
}

/// Revenue of one full-load trip, truncated to whole KES.
///
/// Every seat is assumed filled.
///
/// Example:
/// assert_eq!(trip_earnings(14, 50, 2).unwrap(), 770);
pub fn trip_earnings(
    capacity: u32,
    fare_per_passenger: u64,
    fare_bonus_level: u32,
) -> Result<u64, EconError> {
    let multiplier = fare_bonus_multiplier(fare_bonus_level)?;
    let base = Decimal::from(capacity)
        .checked_mul(Decimal::from(fare_per_passenger))
        .ok_or(EconError::Overflow)?;
    let gross = base.checked_mul(multiplier).ok_or(EconError::Overflow)?;
    gross.trunc().to_u64().ok_or(EconError::Overflow)
}
