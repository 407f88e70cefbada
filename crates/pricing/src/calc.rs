//! Numeric calculation primitives used by the rule builders.
//!
//! All arithmetic is `rust_decimal::Decimal` with checked operations;
//! overflow surfaces as [`ComputeError::Overflow`] instead of panicking.
//! Percentages are expressed in percent units (5 means 5%).

use rust_decimal::{Decimal, RoundingStrategy};

use appraise_engine::ComputeError;

fn overflow(what: &str) -> ComputeError {
    ComputeError::Overflow {
        message: format!("{} overflow", what),
    }
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal, ComputeError> {
    a.checked_add(b).ok_or_else(|| overflow("addition"))
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal, ComputeError> {
    a.checked_mul(b).ok_or_else(|| overflow("multiplication"))
}

fn div(a: Decimal, b: Decimal) -> Result<Decimal, ComputeError> {
    if b.is_zero() {
        return Err(ComputeError::Invalid("division by zero".to_string()));
    }
    a.checked_div(b).ok_or_else(|| overflow("division"))
}

fn percent(pct: Decimal) -> Result<Decimal, ComputeError> {
    div(pct, Decimal::ONE_HUNDRED)
}

/// Two-decimal rounding, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `price * (1 + pct/100) + amt`.
pub fn calc_adjusted_value(
    price: Decimal,
    pct: Decimal,
    amt: Decimal,
) -> Result<Decimal, ComputeError> {
    let factor = add(Decimal::ONE, percent(pct)?)?;
    add(mul(price, factor)?, amt)
}

/// Age-adjusted selling price: `price * (1 + annual_pct * years / 100)`.
pub fn calc_adjusted_value_from_selling_price(
    price: Decimal,
    years: Decimal,
    annual_pct: Decimal,
) -> Result<Decimal, ComputeError> {
    let factor = add(Decimal::ONE, percent(mul(annual_pct, years)?)?)?;
    mul(price, factor)
}

/// `subject - comparator`.
pub fn calc_diff(subject: Decimal, comparator: Decimal) -> Result<Decimal, ComputeError> {
    subject
        .checked_sub(comparator)
        .ok_or_else(|| overflow("subtraction"))
}

/// Value of a quantity difference at a unit price.
pub fn calc_increase_decrease(
    quantity: Decimal,
    unit_price: Decimal,
) -> Result<Decimal, ComputeError> {
    mul(quantity, unit_price)
}

/// Adjusted value corrected by land and building increments.
pub fn calc_total_second_revision(
    adjusted_value: Decimal,
    land_difference: Decimal,
    building_difference: Decimal,
) -> Result<Decimal, ComputeError> {
    add(add(adjusted_value, land_difference)?, building_difference)
}

pub fn calc_sum<I>(values: I) -> Result<Decimal, ComputeError>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, add)
}

/// Amount implied by applying `pct` percent to `base`.
pub fn calc_adjust_amount(base: Decimal, pct: Decimal) -> Result<Decimal, ComputeError> {
    mul(base, percent(pct)?)
}

pub fn calc_total_adjust_value(
    base: Decimal,
    total_adjust_amount: Decimal,
) -> Result<Decimal, ComputeError> {
    add(base, total_adjust_amount)
}

pub fn calc_weighted_adjust_value(value: Decimal, weight: Decimal) -> Result<Decimal, ComputeError> {
    mul(value, weight)
}

/// `1 / columns`; zero columns is an error.
pub fn calc_equal_weight(columns: usize) -> Result<Decimal, ComputeError> {
    div(Decimal::ONE, Decimal::from(columns))
}

/// Round to the nearest multiple of `step`, half away from zero. A
/// non-positive step leaves the value untouched.
pub fn calc_final_value_rounded_value(value: Decimal, step: Decimal) -> Result<Decimal, ComputeError> {
    if step <= Decimal::ZERO {
        return Ok(value);
    }
    let units = div(value, step)?.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    mul(units, step)
}

/// `Σ weight × score`.
pub fn calc_weighted_score<I>(pairs: I) -> Result<Decimal, ComputeError>
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    pairs
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (w, s)| add(acc, mul(w, s)?))
}

/// Least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearFit {
    pub slope: Decimal,
    pub intercept: Decimal,
}

impl LinearFit {
    pub fn at(&self, x: Decimal) -> Result<Decimal, ComputeError> {
        add(self.intercept, mul(self.slope, x)?)
    }
}

/// Fit `points` (x = score, y = value).
///
/// With fewer than two points, or when every x is equal, the line is flat
/// through the mean of y. No points gives the zero line.
pub fn calc_linear_fit(points: &[(Decimal, Decimal)]) -> Result<LinearFit, ComputeError> {
    if points.is_empty() {
        return Ok(LinearFit {
            slope: Decimal::ZERO,
            intercept: Decimal::ZERO,
        });
    }
    let n = Decimal::from(points.len());
    let mean_x = div(calc_sum(points.iter().map(|p| p.0))?, n)?;
    let mean_y = div(calc_sum(points.iter().map(|p| p.1))?, n)?;

    let mut sxy = Decimal::ZERO;
    let mut sxx = Decimal::ZERO;
    for &(x, y) in points {
        let dx = calc_diff(x, mean_x)?;
        let dy = calc_diff(y, mean_y)?;
        sxy = add(sxy, mul(dx, dy)?)?;
        sxx = add(sxx, mul(dx, dx)?)?;
    }

    if sxx.is_zero() {
        return Ok(LinearFit {
            slope: Decimal::ZERO,
            intercept: mean_y,
        });
    }
    let slope = div(sxy, sxx)?;
    let intercept = calc_diff(mean_y, mul(slope, mean_x)?)?;
    Ok(LinearFit { slope, intercept })
}
