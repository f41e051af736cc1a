use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanError;
use crate::types::{Money, Percent, Rate};
use crate::LoanResult;

/// Monthly periods per year used to derive the periodic rate.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Decimal places used for monetary amounts shown to borrowers.
pub const MONEY_DP: u32 = 2;

/// Convert an annual percentage rate (12 = 12%) to a decimal monthly rate (0.01).
pub fn periodic_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(100) / Decimal::from(PERIODS_PER_YEAR)
}

/// Level payment that fully amortises `principal` over `nper` periods at `rate`.
///
/// A zero rate divides the principal evenly. When the rate is so small that
/// `(1 + r)^n` is indistinguishable from one at 28 significant digits the
/// annuity denominator collapses; the straight-line limit is returned instead.
/// When `(1 + r)^n` overflows the payment tends to `principal * r`.
/// Fails with `ArithmeticOverflow` when the payment itself is not representable.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> LoanResult<Money> {
    let n = Decimal::from(nper);
    if rate.is_zero() {
        return Ok(principal / n);
    }

    let interest_only = principal
        .checked_mul(rate)
        .ok_or_else(|| LoanError::overflow("annuity payment (principal × periodic rate)"))?;

    let growth = match (Decimal::ONE + rate).checked_powi(i64::from(nper)) {
        Some(g) => g,
        None => return Ok(interest_only),
    };
    let denominator = Decimal::ONE - Decimal::ONE / growth;
    if denominator.is_zero() {
        tracing::debug!(%rate, nper, "annuity denominator collapsed; using straight-line limit");
        return Ok(principal / n);
    }

    interest_only
        .checked_div(denominator)
        .ok_or_else(|| LoanError::overflow("annuity payment (annuity factor)"))
}

/// Round a monetary amount for display. Midpoints round to even.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp(MONEY_DP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_periodic_rate() {
        assert_eq!(periodic_rate(dec!(12)), dec!(0.01));
        assert_eq!(periodic_rate(dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_annuity_payment_basic() {
        // 10,000 at 1% per month over 12 months ≈ 888.49
        let pmt = annuity_payment(dec!(10000), dec!(0.01), 12).unwrap();
        assert_eq!(round_money(pmt), dec!(888.49));
    }

    #[test]
    fn test_annuity_payment_zero_rate() {
        assert_eq!(annuity_payment(dec!(1200), Decimal::ZERO, 12).unwrap(), dec!(100));
    }

    #[test]
    fn test_annuity_payment_vanishing_rate() {
        let pmt = annuity_payment(dec!(1200), dec!(0.0000000000000000000000000001), 12).unwrap();
        assert!((pmt - dec!(100)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_annuity_payment_overflowing_growth() {
        // (1 + 10)^360 overflows; payment tends to interest-only
        let pmt = annuity_payment(dec!(100), dec!(10), 360).unwrap();
        assert_eq!(pmt, dec!(1000));
    }

    #[test]
    fn test_annuity_payment_unrepresentable_is_error() {
        // 1e28 at 1,000% per month: principal × rate exceeds Decimal::MAX
        let err = annuity_payment(dec!(10000000000000000000000000000), dec!(10), 360).unwrap_err();
        assert!(matches!(err, LoanError::ArithmeticOverflow { .. }));
    }

    #[test]
    fn test_annuity_payment_large_but_representable() {
        // 1e24 at 100,000% per month over 2 periods stays in range
        let pmt = annuity_payment(dec!(1000000000000000000000000), dec!(1000), 2).unwrap();
        assert!(pmt > dec!(1000000000000000000000000000));
    }

    #[test]
    fn test_round_money_half_even() {
        assert_eq!(round_money(dec!(2.345)), dec!(2.34));
        assert_eq!(round_money(dec!(2.355)), dec!(2.36));
    }
}
