//! Payout block arithmetic.

use std::fmt;

use rust_decimal::Decimal;

/// One configured payment. Amounts are in coins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionJob {
    pub name: String,
    pub address: String,
    pub amount: Decimal,
}

impl fmt::Display for TransactionJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}SC => {}]", self.name, self.amount, self.address)
    }
}

/// Total of all non-negative amounts in a payout block.
#[must_use]
pub fn block_size(block: &[TransactionJob]) -> Decimal {
    block
        .iter()
        .map(|job| job.amount.max(Decimal::ZERO))
        .sum()
}

/// Balance required before a block is paid out.
#[must_use]
pub fn payout_threshold(minimum_available: Decimal, block: &[TransactionJob]) -> Decimal {
    minimum_available + block_size(block)
}

#[must_use]
pub fn should_pay_out(balance: Decimal, minimum_available: Decimal, block: &[TransactionJob]) -> bool {
    balance >= payout_threshold(minimum_available, block)
}
