use std::fmt;

/// Fixed-point money value stored as a count of minor units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    pub const SCALE: i64 = 100;

    /// Rounds to the nearest minor unit. `None` for NaN, infinities and
    /// values outside the `i64` range of minor units.
    pub fn from_float(value: f64) -> Option<Self> {
        let minor = (value * Self::SCALE as f64).round();
        // i64::MAX is not representable; `as f64` rounds it up to 2^63
        (minor.is_finite() && minor >= i64::MIN as f64 && minor < i64::MAX as f64)
            .then(|| Amount(minor as i64))
    }

    pub fn from_minor(value: i64) -> Self {
        Amount(value)
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }

    /// Saturates at `i64::MAX` minor units.
    pub fn abs(self) -> Self {
        Amount(self.0.saturating_abs())
    }

    /// -1, 0 or 1 depending on the sign.
    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / Self::SCALE as u64;
        let frac = abs % Self::SCALE as u64;
        write!(f, "{sign}{whole}.{frac:02}")
    }
}

impl std::ops::Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount(self.0.saturating_neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_minor_preserves_value() {
        assert_eq!(Amount::from_minor(1234), Amount(1234));
        assert_eq!(Amount::from_minor(1234).minor_units(), 1234);
    }

    #[test]
    fn from_float_rounds_to_cents() {
        assert_eq!(Amount::from_float(12.34), Some(Amount::from_minor(1234)));
        assert_eq!(Amount::from_float(0.005), Some(Amount::from_minor(1)));
        assert_eq!(Amount::from_float(10.0), Some(Amount::from_minor(1000)));
    }

    #[test]
    fn from_float_rejects_unrepresentable_values() {
        assert_eq!(Amount::from_float(f64::NAN), None);
        assert_eq!(Amount::from_float(f64::INFINITY), None);
        assert_eq!(Amount::from_float(f64::NEG_INFINITY), None);
        assert_eq!(Amount::from_float(1e17), None);
        assert_eq!(Amount::from_float(-1e17), None);
        assert_eq!(Amount::from_float(-2.5), Some(Amount::from_minor(-250)));
    }

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Amount::from_minor(1234).to_string(), "12.34");
        assert_eq!(Amount::from_minor(5).to_string(), "0.05");
        assert_eq!(Amount::from_minor(0).to_string(), "0.00");
        assert_eq!(Amount::from_minor(-250).to_string(), "-2.50");
    }

    #[test]
    fn negation_and_sign() {
        let amount = Amount::from_minor(300);
        assert_eq!(-amount, Amount::from_minor(-300));
        assert_eq!((-amount).signum(), -1);
        assert!((-amount).is_negative());
        assert_eq!((-amount).abs(), amount);
    }

    #[test]
    fn extremes_saturate_instead_of_overflowing() {
        let min = Amount::from_minor(i64::MIN);
        assert_eq!(-min, Amount::from_minor(i64::MAX));
        assert_eq!(min.abs(), Amount::from_minor(i64::MAX));
        assert_eq!(min.to_string(), "-92233720368547758.08");
    }

    #[test]
    fn negative_zero_has_zero_signum() {
        let zero = -Amount::default();
        assert_eq!(zero.signum(), 0);
        assert!(!zero.is_negative());
    }
}
