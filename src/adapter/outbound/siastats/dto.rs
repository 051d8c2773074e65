//! siastats response bodies.

use std::fmt;

use serde::Deserialize;

/// One record of the active host listing.
#[derive(Debug, Deserialize)]
pub struct ListedHost {
    #[serde(rename = "Id")]
    pub id: HostId,
    #[serde(rename = "CurrentIp", default)]
    pub current_ip: String,
}

/// Opaque host identifier used by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HostId {
    Number(u64),
    Text(String),
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostDetail {
    pub rank: u32,
    /// Coins per terabyte per month.
    pub storage_price: f64,
    #[serde(default)]
    pub online: Option<bool>,
}
