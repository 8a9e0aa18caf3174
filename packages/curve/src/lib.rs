// Parts of this code are derived from the wynd-utils crate, which is licensed
// under the Apache License 2.0 - https://github.com/wynddao/wynd-contracts

#![no_std]

use soroban_sdk::contracttype;

/// Handle Curve Errors
#[derive(Debug, Eq, PartialEq)]
pub enum CurveError {
    /// A monotonic function is a function between ordered sets that preserves
    /// or reverses the given order, but never both.
    // "Curve isn't monotonic"
    NotMonotonic,

    /// A curve that always decreases or stays constant
    // "Curve is monotonic decreasing"
    MonotonicDecreasing,

    /// Fail on points in the wrong order
    // "Later point must have higher X than previous point"
    PointsOutOfOrder,
}

/// Curve types
#[contracttype]
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Curve {
    /// Constant curve, it will always have the same value
    Constant(u128),
    /// Linear curve that grows linearly and later
    /// saturates at a constant value.
    SaturatingLinear(SaturatingLinear),
}

impl Curve {
    /// Ctor for saturated curve
    pub fn saturating_linear((min_x, min_y): (u64, u128), (max_x, max_y): (u64, u128)) -> Self {
        Curve::SaturatingLinear(SaturatingLinear {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Ctor for constant curve
    pub fn constant(y: u128) -> Self {
        Curve::Constant(y)
    }

    /// provides y = f(x) evaluation
    pub fn value(&self, x: u64) -> u128 {
        match self {
            Curve::Constant(y) => *y,
            Curve::SaturatingLinear(s) => s.value(x),
        }
    }

    /// general sanity checks on input values to ensure this is valid.
    /// these checks should be included by the validate_monotonic_* functions
    pub fn validate(&self) -> Result<(), CurveError> {
        match self {
            Curve::Constant(_) => Ok(()),
            Curve::SaturatingLinear(s) => s.validate(),
        }
    }

    /// returns an error if there is ever x2 > x1 such that value(x2) < value(x1)
    pub fn validate_monotonic_increasing(&self) -> Result<(), CurveError> {
        match self {
            Curve::Constant(_) => Ok(()),
            Curve::SaturatingLinear(s) => s.validate_monotonic_increasing(),
        }
    }

    /// return (min, max) that can ever be returned from value.
    pub fn range(&self) -> (u128, u128) {
        match self {
            Curve::Constant(y) => (*y, *y),
            Curve::SaturatingLinear(sat) => sat.range(),
        }
    }

    /// returns the x after which the curve no longer changes, if any
    pub fn end(&self) -> Option<u64> {
        match self {
            Curve::Constant { .. } => None,
            Curve::SaturatingLinear(sl) => Some(sl.max_x),
        }
    }
}

/// Saturating Linear
/// $$f(x)=\begin{cases}
/// [min(y)],  & \text{if x <= $x_1$ } \\\\
/// [y],  & \text{if $x_1$ >= x <= $x_2$ } \\\\
/// [max(y)],  & \text{if x >= $x_2$ }
/// \end{cases}$$
///
/// min_y for all x <= min_x, max_y for all x >= max_x, linear in between
#[contracttype]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SaturatingLinear {
    /// time when curve starts
    pub min_x: u64,
    /// min value at start time
    pub min_y: u128,
    /// time when curve has fully saturated
    pub max_x: u64,
    /// max value at saturated time
    pub max_y: u128,
}

impl SaturatingLinear {
    /// provides y = f(x) evaluation
    pub fn value(&self, x: u64) -> u128 {
        match (x < self.min_x, x > self.max_x) {
            (true, _) => self.min_y,
            (_, true) => self.max_y,
            _ => interpolate((self.min_x, self.min_y), (self.max_x, self.max_y), x),
        }
    }

    /// general sanity checks on input values to ensure this is valid.
    /// these checks should be included by the other validate_* functions
    pub fn validate(&self) -> Result<(), CurveError> {
        if self.max_x <= self.min_x {
            return Err(CurveError::PointsOutOfOrder);
        }
        Ok(())
    }

    /// returns an error if there is ever x2 > x1 such that value(x2) < value(x1)
    pub fn validate_monotonic_increasing(&self) -> Result<(), CurveError> {
        self.validate()?;
        if self.max_y < self.min_y {
            return Err(CurveError::MonotonicDecreasing);
        }
        Ok(())
    }

    /// return (min, max) that can ever be returned from value.
    pub fn range(&self) -> (u128, u128) {
        if self.max_y > self.min_y {
            (self.min_y, self.max_y)
        } else {
            (self.max_y, self.min_y)
        }
    }
}

// this requires min_x <= x <= max_x to have been previously validated
fn interpolate((min_x, min_y): (u64, u128), (max_x, max_y): (u64, u128), x: u64) -> u128 {
    if max_y > min_y {
        min_y + (max_y - min_y) * u128::from(x - min_x) / u128::from(max_x - min_x)
    } else {
        min_y - (min_y - max_y) * u128::from(x - min_x) / u128::from(max_x - min_x)
    }
}
