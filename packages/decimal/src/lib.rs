// A lot of this code is taken from the cosmwasm-std crate, which is licensed
// under the Apache License 2.0 - https://github.com/CosmWasm/cosmwasm.

#![no_std]
use core::cmp::Ordering;
use core::ops::{Add, Mul, Sub};

/// A fixed-point decimal value with 18 fractional digits, stored as atomics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Decimal(u128);

#[allow(dead_code)]
impl Decimal {
    const DECIMAL_FRACTIONAL: u128 = 1_000_000_000_000_000_000u128; // 1*10**18
    const DECIMAL_FRACTIONAL_SQUARED: u128 = 1_000_000_000_000_000_000_000_000_000_000_000_000u128; // (1*10**18)**2 = 1*10**36
    /// The number of decimal places. Since decimal types are fixed-point rather than
    /// floating-point, this is a constant.
    pub const DECIMAL_PLACES: u32 = 18;

    pub fn new(value: u128) -> Self {
        Decimal(value)
    }

    pub const fn raw(value: u128) -> Self {
        Self(value)
    }

    /// Create a 1.0 Decimal
    #[inline]
    pub const fn one() -> Self {
        Self(Self::DECIMAL_FRACTIONAL)
    }

    /// Create a 0.0 Decimal
    #[inline]
    pub const fn zero() -> Self {
        Self(0u128)
    }

    /// Convert x% into Decimal
    pub fn percent(x: u64) -> Self {
        Self((x as u128) * 10_000_000_000_000_000)
    }

    /// Convert basis points (x/10000) into Decimal
    pub fn bps(x: u64) -> Self {
        Self((x as u128) * 100_000_000_000_000)
    }

    /// Returns the ratio (numerator / denominator) as a Decimal.
    /// Panics if the denominator is zero.
    pub fn from_ratio(numerator: impl Into<u128>, denominator: impl Into<u128>) -> Self {
        let numerator: u128 = numerator.into();
        let denominator: u128 = denominator.into();
        if denominator == 0 {
            panic!("Denominator must not be zero");
        }

        Decimal(numerator * Self::DECIMAL_FRACTIONAL / denominator)
    }

    /// Creates a decimal from a number of atomic units and the number
    /// of decimal places the atomics carry.
    pub fn from_atomics(atomics: u128, decimal_places: u32) -> Self {
        match decimal_places.cmp(&Self::DECIMAL_PLACES) {
            Ordering::Equal => Self(atomics),
            Ordering::Less => {
                let digits = Self::DECIMAL_PLACES - decimal_places;
                Self(atomics * 10u128.pow(digits))
            }
            Ordering::Greater => {
                let digits = decimal_places - Self::DECIMAL_PLACES;
                Self(atomics / 10u128.pow(digits))
            }
        }
    }

    /// The number of decimal places.
    ///
    /// See also [`Decimal::atomics()`].
    #[must_use]
    #[inline]
    pub const fn decimal_places(&self) -> u32 {
        Self::DECIMAL_PLACES
    }

    /// A decimal is an integer of atomic units plus a number that specifies the
    /// position of the decimal dot. So any decimal can be expressed as two numbers.
    #[must_use]
    #[inline]
    pub const fn atomics(&self) -> u128 {
        self.0
    }

    #[inline]
    fn numerator(&self) -> u128 {
        self.0
    }

    #[inline]
    fn denominator(&self) -> u128 {
        Self::DECIMAL_FRACTIONAL
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0u128
    }

    /// The absolute difference between two decimals.
    #[must_use]
    pub fn abs_diff(self, other: Self) -> Self {
        Self(self.0.abs_diff(other.0))
    }

    /// Returns the multiplicative inverse `1/d` for decimal `d`.
    ///
    /// If `d` is zero, none is returned.
    pub fn inv(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            // Let self be p/q with p = self.0 and q = DECIMAL_FRACTIONAL.
            // Now we calculate the inverse a/b = q/p such that b = DECIMAL_FRACTIONAL. Then
            // `a = DECIMAL_FRACTIONAL*DECIMAL_FRACTIONAL / self.0`.
            Some(Decimal(Self::DECIMAL_FRACTIONAL_SQUARED / self.0))
        }
    }
}

impl Add for Decimal {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Decimal(self.0 + other.0)
    }
}

impl Sub for Decimal {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Decimal(self.0 - other.0)
    }
}

impl Mul for Decimal {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn mul(self, other: Self) -> Self {
        Decimal(self.0 * other.0 / Self::DECIMAL_FRACTIONAL)
    }
}

impl Mul<Decimal> for u128 {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn mul(self, rhs: Decimal) -> Self::Output {
        // 0*a and b*0 is always 0
        if self == 0u128 || rhs.is_zero() {
            return 0u128;
        }
        self * rhs.0 / Decimal::DECIMAL_FRACTIONAL
    }
}

impl Mul<u128> for Decimal {
    type Output = u128;

    fn mul(self, rhs: u128) -> Self::Output {
        rhs * self
    }
}
