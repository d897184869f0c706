//! Calculation results
//!
//! Value object produced by the calculator. Recomputed on demand, never stored.

use serde::{Deserialize, Serialize};

use super::money::Yen;

/// Outcome of splitting one set of transactions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CalculationResults {
    /// Total of all in-scope expenses
    pub sum: Yen,

    /// Sub-total of in-scope expenses carrying a memo percentage
    pub special_total: Yen,

    /// Partner's share of the special expenses, before flooring
    pub special_offer: f64,

    /// What the partner owes overall
    pub need: Yen,

    /// What the partner already paid from their own accounts
    pub partner: Yen,

    /// `need - partner`; negative when the partner overpaid
    pub lack: Yen,
}

impl CalculationResults {
    /// Ordinary (non-special) part of the total
    pub fn ordinary_total(&self) -> Yen {
        self.sum - self.special_total
    }

    /// Check if the partner paid more than their share
    pub fn partner_overpaid(&self) -> bool {
        self.lack.is_negative()
    }
}
