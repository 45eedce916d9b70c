//! ICMS rate plausibility.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::Check;

/// Interstate ICMS rates in common use (Senate Resolutions 22/1989 and 13/2012).
pub const INTERSTATE_RATES: [Decimal; 3] = [dec!(4), dec!(7), dec!(12)];

/// Highest intrastate rate any jurisdiction levies.
pub const MAX_INTRASTATE_RATE: Decimal = dec!(35);

const RATE_TOLERANCE: Decimal = dec!(0.01);

/// Between different jurisdictions the rate should be one of
/// [`INTERSTATE_RATES`]. A zero rate (untaxed item) is accepted.
pub fn check_interstate_rate(issuer: &str, recipient: &str, rate: Decimal) -> Check {
    if issuer == recipient || rate.is_zero() {
        return Check::Pass;
    }
    if INTERSTATE_RATES
        .iter()
        .any(|&r| rate.checked_sub(r).is_some_and(|d| d.abs() <= RATE_TOLERANCE))
    {
        return Check::Pass;
    }
    Check::Warn(format!(
        "rate {rate}% is unusual for an interstate operation {issuer} → {recipient} \
         (expected 4, 7 or 12)"
    ))
}

/// Within one jurisdiction the rate should lie in `0..=35`.
pub fn check_intrastate_rate(rate: Decimal) -> Check {
    if rate.is_sign_negative() || rate > MAX_INTRASTATE_RATE {
        Check::Warn(format!(
            "rate {rate}% is outside the plausible range 0-{MAX_INTRASTATE_RATE}%"
        ))
    } else {
        Check::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interstate_whitelist() {
        assert!(check_interstate_rate("SP", "RJ", dec!(12)).is_pass());
        assert!(check_interstate_rate("SP", "BA", dec!(7.00)).is_pass());
        assert!(check_interstate_rate("SP", "BA", dec!(4.005)).is_pass());
        assert!(matches!(
            check_interstate_rate("SP", "RJ", dec!(18)),
            Check::Warn(_)
        ));
    }

    #[test]
    fn extreme_rates_are_unusual() {
        assert!(!check_interstate_rate("SP", "RJ", Decimal::MIN).is_pass());
        assert!(!check_interstate_rate("SP", "RJ", Decimal::MAX).is_pass());
    }

    #[test]
    fn same_jurisdiction_or_zero_is_not_judged() {
        assert!(check_interstate_rate("SP", "SP", dec!(18)).is_pass());
        assert!(check_interstate_rate("SP", "RJ", dec!(0)).is_pass());
    }

    #[test]
    fn intrastate_range() {
        assert!(check_intrastate_rate(dec!(18)).is_pass());
        assert!(check_intrastate_rate(dec!(0)).is_pass());
        assert!(!check_intrastate_rate(dec!(40)).is_pass());
        assert!(!check_intrastate_rate(dec!(-1)).is_pass());
    }
}
