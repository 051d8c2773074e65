//! Canonical test configurations.
//!
//! Single source of truth for config files used across tests.

use crate::infrastructure::config::settings::Config;

/// Every module enabled with valid settings.
pub const FULL_TOML: &str = r#"
host = "localhost:9980"
api-password = "api-secret"

[logging]
level = "debug"

[unlock]
enabled = true
wallet-password = "seed words"

[price]
enabled = true
minimum-price = 50
collateral-factor = 2
siastats-rank = 10

[restart]
enabled = true
stop-commands = ["systemctl stop siad"]
sleep = 10
start-commands = ["systemctl start siad"]
cooldown = 600

[throttle]
enabled = true
interface = "eth0"
throttle-command = "wondershaper {interface} {kbits_down} {kbits_up}"
unthrottle-command = "wondershaper clear {interface}"
interval = 86400
up = 0.5
down = 0.8

[payout]
enabled = true
minimum-available = 500
sleep-after = 3600

[[payout.block]]
name = "rent"
address = "addr-rent"
amount = 100

[[payout.block]]
name = "savings"
address = "addr-savings"
amount = 50.5
"#;

/// Only the daemon address, no modules.
pub const MINIMAL_TOML: &str = r#"host = "localhost:9980""#;

/// [`FULL_TOML`], parsed and validated.
pub fn full_config() -> Config {
    Config::parse_toml(FULL_TOML).expect("FULL_TOML is valid")
}
