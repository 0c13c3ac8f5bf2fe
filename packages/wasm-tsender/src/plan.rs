//! Transfer planning
//!
//! The plan is the last check before anything is sent to the wallet. It is
//! rebuilt at submit time from the current inputs and a fresh allowance, so
//! it does not trust whatever the form showed earlier.

use crate::error::AirdropError;
use num_bigint::BigUint;

/// A validated batch transfer, ready to sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub recipients: Vec<String>,
    /// Smallest-unit amount per recipient, same order
    pub amounts: Vec<BigUint>,
    pub total: BigUint,
    /// Current allowance is below `total`
    pub needs_approval: bool,
}

impl TransferPlan {
    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    /// Whether `balance` cannot cover the plan
    pub fn total_exceeds(&self, balance: &BigUint) -> bool {
        &self.total > balance
    }
}

/// Both lists must be non-empty and pair up one to one
pub fn check_lengths(recipients: usize, amounts: usize) -> Result<(), AirdropError> {
    if recipients == 0 || amounts == 0 {
        return Err(AirdropError::EmptyInput);
    }
    if recipients != amounts {
        return Err(AirdropError::LengthMismatch {
            recipients,
            amounts,
        });
    }
    Ok(())
}

/// Build a plan from normalized recipients and parsed amounts
///
/// # Arguments
/// * `recipients` - Recipient addresses, in order
/// * `amounts` - Smallest-unit amounts, positionally paired with `recipients`
/// * `current_allowance` - Allowance granted to the batch-transfer contract
pub fn build_plan(
    recipients: Vec<String>,
    amounts: Vec<BigUint>,
    current_allowance: &BigUint,
) -> Result<TransferPlan, AirdropError> {
    check_lengths(recipients.len(), amounts.len())?;

    let total: BigUint = amounts.iter().sum();
    let needs_approval = current_allowance < &total;

    Ok(TransferPlan {
        recipients,
        amounts,
        total,
        needs_approval,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 10).unwrap()
    }

    fn addrs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            build_plan(vec![], vec![], &BigUint::default()),
            Err(AirdropError::EmptyInput)
        );
        assert_eq!(
            build_plan(addrs(&["a"]), vec![], &BigUint::default()),
            Err(AirdropError::EmptyInput)
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            build_plan(addrs(&["a", "b"]), vec![units("1")], &BigUint::default()),
            Err(AirdropError::LengthMismatch {
                recipients: 2,
                amounts: 1
            })
        );
    }

    #[test]
    fn test_approval_threshold() {
        let plan = build_plan(addrs(&["a"]), vec![units("100")], &units("50")).unwrap();
        assert!(plan.needs_approval);

        let plan = build_plan(addrs(&["a"]), vec![units("100")], &units("100")).unwrap();
        assert!(!plan.needs_approval);

        let plan = build_plan(addrs(&["a"]), vec![units("100")], &units("101")).unwrap();
        assert!(!plan.needs_approval);
    }

    #[test]
    fn test_total_is_exact() {
        // 17 and 19 significant digits, well past f64 precision
        let plan = build_plan(
            addrs(&["a", "b", "c"]),
            vec![
                units("12345678901234567"),
                units("9876543210987654321"),
                units("1"),
            ],
            &BigUint::default(),
        )
        .unwrap();
        assert_eq!(plan.total, units("9888888889888888889"));
    }

    #[test]
    fn test_total_past_uint256_does_not_wrap() {
        let max = units(
            "115792089237316195423570985008687907853269984665640564039457584007913129639935",
        );
        let plan = build_plan(addrs(&["a", "b"]), vec![max.clone(), units("1")], &max).unwrap();
        assert_eq!(plan.total, max + 1u32);
        assert!(plan.needs_approval);
    }

    #[test]
    fn test_total_exceeds_balance() {
        let plan = build_plan(addrs(&["a"]), vec![units("10")], &BigUint::default()).unwrap();
        assert!(plan.total_exceeds(&units("9")));
        assert!(!plan.total_exceeds(&units("10")));
    }
}
