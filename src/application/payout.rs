//! Pays out a configured block of payments once the balance allows it.

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::module::{absorb, Module};
use crate::domain::payout::{payout_threshold, should_pay_out};
use crate::domain::{Hastings, Receipt, TransactionJob};
use crate::error::{Error, Result};
use crate::infrastructure::config::payout::PayoutConfig;
use crate::port::NodeApi;

pub struct PayoutModule {
    config: PayoutConfig,
    node: Arc<dyn NodeApi>,
}

impl PayoutModule {
    pub fn new(config: PayoutConfig, node: Arc<dyn NodeApi>) -> Self {
        Self { config, node }
    }

    /// Pay out the block if the confirmed balance covers it plus the
    /// reserve. Returns the receipts in block order, empty if skipped.
    pub async fn cycle(&self) -> Result<Vec<(TransactionJob, Receipt)>> {
        let balance = self.node.wallet_status().await?.confirmed_balance.to_siacoins();
        let block = &self.config.block;

        if !should_pay_out(balance, self.config.minimum_available, block) {
            let threshold = payout_threshold(self.config.minimum_available, block);
            info!(
                module = self.name(),
                %balance,
                %threshold,
                "No payout: {balance}SC < {threshold}SC"
            );
            return Ok(Vec::new());
        }

        info!(module = self.name(), %balance, "Performing payout");
        let mut receipts = Vec::with_capacity(block.len());
        for job in block {
            let amount = Hastings::from_siacoins(job.amount)
                .ok_or_else(|| Error::Fault(format!("amount of {job} is out of range")))?;
            let receipt = self.node.send_payment(amount, &job.address).await?;
            info!(module = self.name(), transactions = %receipt, "Payout result {job}");
            receipts.push((job.clone(), receipt));
        }
        info!(module = self.name(), "Payout done");

        Ok(receipts)
    }
}

#[async_trait]
impl Module for PayoutModule {
    fn name(&self) -> &'static str {
        "payout"
    }

    fn describe_settings(&self) -> Vec<String> {
        let mut lines = vec![
            "Module enabled".to_string(),
            format!(
                "Always keeping {}SC in the wallet",
                self.config.minimum_available
            ),
            "The payout block has the following payouts:".to_string(),
        ];
        lines.extend(self.config.block.iter().map(ToString::to_string));
        lines.push(format!(
            "After payout sleep for {}s",
            self.config.sleep_after.as_secs_f64()
        ));
        lines
    }

    async fn run(&self) -> Result<Infallible> {
        loop {
            absorb(self.name(), self.cycle().await)?;
            tokio::time::sleep(self.config.sleep_after).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::testkit::node::{NodeCall, ScriptedNode};

    fn job(name: &str, amount: Decimal) -> TransactionJob {
        TransactionJob {
            name: name.into(),
            address: format!("addr-{name}"),
            amount,
        }
    }

    fn module(node: &Arc<ScriptedNode>) -> PayoutModule {
        PayoutModule::new(
            PayoutConfig {
                minimum_available: dec!(50),
                sleep_after: Duration::from_secs(3600),
                block: vec![job("rent", dec!(20)), job("savings", dec!(10))],
            },
            Arc::clone(node) as Arc<dyn NodeApi>,
        )
    }

    #[tokio::test]
    async fn balance_below_threshold_pays_nothing() {
        let node = Arc::new(ScriptedNode::new().with_balance(dec!(79)));
        assert!(module(&node).cycle().await.unwrap().is_empty());
        assert!(node.calls().is_empty());
    }

    #[tokio::test]
    async fn balance_at_threshold_pays_in_order() {
        let node = Arc::new(ScriptedNode::new().with_balance(dec!(80)));
        let receipts = module(&node).cycle().await.unwrap();

        assert_eq!(receipts.len(), 2);
        assert_eq!(
            node.calls(),
            vec![
                NodeCall::SendPayment(
                    Hastings::from_siacoins(dec!(20)).unwrap(),
                    "addr-rent".into()
                ),
                NodeCall::SendPayment(
                    Hastings::from_siacoins(dec!(10)).unwrap(),
                    "addr-savings".into()
                ),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn waits_sleep_after_between_checks() {
        let node = Arc::new(ScriptedNode::new().with_balance(dec!(10)));
        let module = module(&node);
        let run = tokio::spawn(async move { module.run().await });

        tokio::time::sleep(Duration::from_secs(3599)).await;
        assert_eq!(node.reads(), 1);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(node.reads(), 2);
        run.abort();
    }

    #[test]
    fn settings_list_every_payout() {
        let node = Arc::new(ScriptedNode::new());
        let lines = module(&node).describe_settings();
        assert!(lines.contains(&"[rent 20SC => addr-rent]".to_string()));
        assert_eq!(lines.last().unwrap(), "After payout sleep for 3600s");
    }
}
