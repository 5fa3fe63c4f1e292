//! Fee bounding policy and include-fee amount adjustment

use alloy::primitives::U256;
use types::amount::{parse_decimal, to_decimal};
use types::{Result, TransactorError};

/// Floor and ceiling applied to network fee estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBounds {
    pub min: U256,
    pub max: U256,
}

/// Fee chosen for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    /// Final fee
    pub fee: U256,
    /// Estimate returned by the node
    pub estimate: U256,
    /// Whether the estimate was raised to the floor
    pub was_raised: bool,
}

impl FeeBounds {
    pub fn new(min: U256, max: U256) -> Self {
        Self { min, max }
    }

    /// Convenience constructor for bounds that fit in a u64
    pub fn from_u64(min: u64, max: u64) -> Self {
        Self::new(U256::from(min), U256::from(max))
    }

    /// Apply the policy to a decimal-string estimate.
    ///
    /// Estimates below the floor are raised to it. Estimates above the
    /// ceiling are rejected, never lowered.
    pub fn finalize(&self, estimate: &str) -> Result<FeeQuote> {
        let estimated = parse_decimal(estimate).map_err(|_| TransactorError::InvalidFeeFormat {
            value: estimate.to_string(),
        })?;

        if estimated < self.min {
            Ok(FeeQuote {
                fee: self.min,
                estimate: estimated,
                was_raised: true,
            })
        } else if estimated > self.max {
            Err(TransactorError::FeeExceedsLimit {
                fee: to_decimal(&estimated),
                max_fee: to_decimal(&self.max),
            })
        } else {
            Ok(FeeQuote {
                fee: estimated,
                estimate: estimated,
                was_raised: false,
            })
        }
    }
}

impl From<config::ParsedFees> for FeeBounds {
    fn from(fees: config::ParsedFees) -> Self {
        Self::new(fees.min_fee, fees.max_fee)
    }
}

/// Amount left to transfer once `fee` is taken out of `amount`
pub fn net_amount(amount: &str, fee: &U256) -> Result<String> {
    let gross = parse_decimal(amount).map_err(|reason| TransactorError::InvalidAmount {
        amount: amount.to_string(),
        reason,
    })?;

    let net = gross
        .checked_sub(*fee)
        .ok_or_else(|| TransactorError::InvalidAmount {
            amount: amount.to_string(),
            reason: format!("fee {} exceeds amount", fee),
        })?;

    Ok(to_decimal(&net))
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ErrorKind;

    #[test]
    fn test_estimate_within_bounds_is_unchanged() {
        let bounds = FeeBounds::from_u64(10, 100);
        for estimate in [10u64, 11, 50, 99, 100] {
            let quote = bounds.finalize(&estimate.to_string()).unwrap();
            assert_eq!(quote.fee, U256::from(estimate));
            assert!(!quote.was_raised);
        }
    }

    #[test]
    fn test_estimate_below_floor_is_raised() {
        let bounds = FeeBounds::from_u64(10, 100);
        for estimate in ["0", "1", "9"] {
            let quote = bounds.finalize(estimate).unwrap();
            assert_eq!(quote.fee, U256::from(10u64));
            assert!(quote.was_raised);
        }
    }

    #[test]
    fn test_estimate_above_ceiling_is_rejected() {
        let bounds = FeeBounds::from_u64(10, 100);
        for estimate in ["101", "500", "99999999999999999999999999"] {
            let err = bounds.finalize(estimate).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::FeeExceedsLimit);
        }
    }

    #[test]
    fn test_unparseable_estimate() {
        let bounds = FeeBounds::from_u64(0, 100);
        for estimate in ["", "abc", "-1", "12.5"] {
            let err = bounds.finalize(estimate).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFeeFormat);
        }
    }

    #[test]
    fn test_net_amount() {
        assert_eq!(net_amount("1000", &U256::from(50u64)).unwrap(), "950");
        assert_eq!(net_amount("50", &U256::from(50u64)).unwrap(), "0");
        assert_eq!(
            net_amount("340282366920938463463374607431768211456", &U256::from(1u64)).unwrap(),
            "340282366920938463463374607431768211455"
        );
    }

    #[test]
    fn test_net_amount_errors() {
        let err = net_amount("ten", &U256::from(1u64)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);

        let err = net_amount("10", &U256::from(11u64)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    }

    #[test]
    fn test_bounds_from_config() {
        let parsed = config::FeeConfig {
            min_fee: "5".to_string(),
            max_fee: "500".to_string(),
            include_fee: false,
        }
        .parse()
        .unwrap();

        assert_eq!(FeeBounds::from(parsed), FeeBounds::from_u64(5, 500));
    }
}
