//! Automatic payout module configuration.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::validation::Problems;
use crate::domain::TransactionJob;
use crate::error::ConfigError;

const SECTION: &str = "payout";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PayoutSection {
    #[serde(default)]
    pub enabled: bool,
    /// Coins that always stay in the wallet.
    pub minimum_available: Option<Decimal>,
    /// Seconds between payout checks.
    pub sleep_after: Option<f64>,
    pub block: Option<Vec<PayoutEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayoutEntry {
    pub name: Option<String>,
    pub address: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutConfig {
    pub minimum_available: Decimal,
    pub sleep_after: Duration,
    pub block: Vec<TransactionJob>,
}

impl PayoutSection {
    pub fn validate(&self) -> Result<PayoutConfig, Vec<ConfigError>> {
        let mut problems = Problems::new(SECTION);
        let minimum_available =
            problems.non_negative_decimal("minimum-available", self.minimum_available);
        let sleep_after = problems.interval_secs("sleep-after", self.sleep_after);
        let block = self.block(&mut problems);

        match (minimum_available, sleep_after, block) {
            (Some(minimum_available), Some(sleep_after), Some(block)) if problems.is_empty() => {
                Ok(PayoutConfig {
                    minimum_available,
                    sleep_after,
                    block,
                })
            }
            _ => Err(problems.into_errors()),
        }
    }

    fn block(&self, problems: &mut Problems) -> Option<Vec<TransactionJob>> {
        let entries = problems.require("block", &self.block)?;
        if entries.is_empty() {
            problems.invalid("block", "needs at least one payout");
            return None;
        }

        let mut jobs = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let position = index + 1;
            let name = non_blank(&entry.name);
            let address = non_blank(&entry.address);
            if name.is_none() {
                problems.invalid("block", format!("entry {position} misses 'name'"));
            }
            if address.is_none() {
                problems.invalid("block", format!("entry {position} misses 'address'"));
            }
            let amount = match entry.amount {
                None => {
                    problems.invalid("block", format!("entry {position} misses 'amount'"));
                    None
                }
                Some(amount) if amount <= Decimal::ZERO => {
                    problems.invalid("block", format!("entry {position} amount must be greater than 0"));
                    None
                }
                Some(amount) => Some(amount),
            };

            if let (Some(name), Some(address), Some(amount)) = (name, address, amount) {
                jobs.push(TransactionJob {
                    name,
                    address,
                    amount,
                });
            }
        }

        (jobs.len() == entries.len()).then_some(jobs)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(name: &str, amount: Decimal) -> PayoutEntry {
        PayoutEntry {
            name: Some(name.into()),
            address: Some(format!("{name}-addr")),
            amount: Some(amount),
        }
    }

    #[test]
    fn keeps_configured_order() {
        let config = PayoutSection {
            enabled: true,
            minimum_available: Some(dec!(50)),
            sleep_after: Some(3600.0),
            block: Some(vec![entry("b", dec!(20)), entry("a", dec!(10))]),
        }
        .validate()
        .unwrap();

        let names: Vec<_> = config.block.iter().map(|job| job.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(config.sleep_after, Duration::from_secs(3600));
    }

    #[test]
    fn zero_minimum_is_allowed() {
        let config = PayoutSection {
            enabled: true,
            minimum_available: Some(Decimal::ZERO),
            sleep_after: Some(60.0),
            block: Some(vec![entry("a", dec!(1))]),
        }
        .validate();
        assert!(config.is_ok());
    }

    #[test]
    fn reports_broken_entries() {
        let errors = PayoutSection {
            enabled: true,
            minimum_available: Some(dec!(50)),
            sleep_after: Some(60.0),
            block: Some(vec![
                PayoutEntry {
                    name: Some("x".into()),
                    address: None,
                    amount: Some(dec!(-1)),
                },
                entry("ok", dec!(1)),
            ]),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors[0].to_string().contains("entry 1 misses 'address'"));
    }

    #[test]
    fn missing_keys() {
        let errors = PayoutSection {
            enabled: true,
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
