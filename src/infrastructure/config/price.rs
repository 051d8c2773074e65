//! Price tracking module configuration.

use serde::Deserialize;

use super::validation::Problems;
use crate::error::ConfigError;

const SECTION: &str = "price";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PriceSection {
    #[serde(default)]
    pub enabled: bool,
    /// Floor for the storage price, coins per terabyte per month.
    pub minimum_price: Option<f64>,
    /// Collateral as a multiple of the storage price. 2 is a good start.
    pub collateral_factor: Option<f64>,
    pub usd: Option<f64>,
    pub siastats_rank: Option<u32>,
    pub hostdb_rank: Option<u32>,
}

/// What the price module converges on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceTarget {
    /// Fixed fiat value per terabyte per month. No pricing rule is defined
    /// for this target yet; the module reports and skips every cycle.
    Usd(f64),
    /// Rank on the siastats listing.
    SiastatsRank(u32),
    /// Rank on the daemon's own active host listing.
    HostdbRank(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceConfig {
    pub minimum_price: f64,
    pub collateral_factor: f64,
    pub target: PriceTarget,
}

impl PriceSection {
    pub fn validate(&self) -> Result<PriceConfig, Vec<ConfigError>> {
        let mut problems = Problems::new(SECTION);
        let minimum_price = problems.positive("minimum-price", self.minimum_price);
        let collateral_factor = problems.positive("collateral-factor", self.collateral_factor);
        let target = self.target(&mut problems);

        match (minimum_price, collateral_factor, target) {
            (Some(minimum_price), Some(collateral_factor), Some(target)) if problems.is_empty() => {
                Ok(PriceConfig {
                    minimum_price,
                    collateral_factor,
                    target,
                })
            }
            _ => Err(problems.into_errors()),
        }
    }

    fn target(&self, problems: &mut Problems) -> Option<PriceTarget> {
        let configured = [
            self.usd.is_some(),
            self.siastats_rank.is_some(),
            self.hostdb_rank.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();

        match configured {
            0 => {
                problems.invalid("target", "set one of 'usd', 'siastats-rank' or 'hostdb-rank'");
                return None;
            }
            1 => {}
            _ => {
                problems.invalid(
                    "target",
                    "'usd', 'siastats-rank' and 'hostdb-rank' are mutually exclusive",
                );
                return None;
            }
        }

        if let Some(usd) = self.usd {
            return problems.positive("usd", Some(usd)).map(PriceTarget::Usd);
        }
        if let Some(rank) = self.siastats_rank {
            return rank_target(problems, "siastats-rank", rank).map(PriceTarget::SiastatsRank);
        }
        self.hostdb_rank
            .and_then(|rank| rank_target(problems, "hostdb-rank", rank))
            .map(PriceTarget::HostdbRank)
    }
}

fn rank_target(problems: &mut Problems, field: &'static str, rank: u32) -> Option<u32> {
    if rank == 0 {
        problems.invalid(field, "ranks start at 1");
        return None;
    }
    Some(rank)
}
