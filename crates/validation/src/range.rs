//! Reusable field checks for rule bodies.
//!
//! Range checks are inclusive. Integers compare exactly. Floats compare with a
//! tolerance of `FLOAT_TOLERANCE * max(1, |bound|)`, so a value that sits on a
//! bound but picked up rounding noise on the way in (`100.00000001` against
//! `100.0`) is still accepted. Non-finite floats always fail.

use std::fmt::Display;

use crate::ValidationContext;

/// Relative tolerance applied at float range bounds.
pub const FLOAT_TOLERANCE: f64 = 1e-6;

/// Numeric types usable with [`validate_range`].
pub trait RangeValue: Copy + PartialOrd + Display {
    /// Inclusive containment test.
    fn within(self, min: Self, max: Self) -> bool {
        self >= min && self <= max
    }

    /// False for NaN and infinities.
    fn is_finite_value(self) -> bool {
        true
    }

    fn is_positive(self) -> bool;
}

macro_rules! impl_range_value_int {
    ($($ty:ty),*) => {
        $(
            impl RangeValue for $ty {
                fn is_positive(self) -> bool {
                    self > 0
                }
            }
        )*
    };
}

impl_range_value_int!(i32, i64, u32, u64, usize);

fn tolerance(bound: f64) -> f64 {
    FLOAT_TOLERANCE * bound.abs().max(1.0)
}

impl RangeValue for f64 {
    fn within(self, min: Self, max: Self) -> bool {
        self >= min - tolerance(min) && self <= max + tolerance(max)
    }

    fn is_finite_value(self) -> bool {
        self.is_finite()
    }

    fn is_positive(self) -> bool {
        self > 0.0
    }
}

impl RangeValue for f32 {
    fn within(self, min: Self, max: Self) -> bool {
        f64::from(self).within(f64::from(min), f64::from(max))
    }

    fn is_finite_value(self) -> bool {
        self.is_finite()
    }

    fn is_positive(self) -> bool {
        self > 0.0
    }
}

/// Checks `min <= value <= max`, adding one `Error` naming the field, the
/// value, and both bounds when it does not hold.
pub fn validate_range<T: RangeValue>(
    ctx: &mut ValidationContext,
    field: &str,
    value: T,
    min: T,
    max: T,
) -> bool {
    if !value.is_finite_value() {
        ctx.error(format!("{field} value {value} is not a finite number"));
        return false;
    }
    if value.within(min, max) {
        return true;
    }
    ctx.error(format!(
        "{field} value {value} is outside range [{min}, {max}]"
    ));
    false
}

/// Adds a `Critical` issue when `value` is empty or whitespace.
pub fn require_non_empty(ctx: &mut ValidationContext, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        ctx.critical(format!("{field} must not be empty"));
        return false;
    }
    true
}

/// Adds an `Error` when `value` is not strictly positive.
pub fn require_positive<T: RangeValue>(ctx: &mut ValidationContext, field: &str, value: T) -> bool {
    if !value.is_finite_value() || !value.is_positive() {
        ctx.error(format!("{field} value {value} must be greater than zero"));
        return false;
    }
    true
}
