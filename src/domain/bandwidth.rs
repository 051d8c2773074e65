//! Bandwidth peak estimation and throttle command templating.

/// Number of highest samples averaged into a peak rate.
pub const PEAK_SAMPLES: usize = 3;

/// Placeholders an unthrottle command may use.
pub const UNTHROTTLE_PLACEHOLDERS: &[&str] = &["interface"];

/// Placeholders a throttle command may use.
pub const THROTTLE_PLACEHOLDERS: &[&str] = &[
    "interface",
    "mbits_up",
    "mbits_down",
    "mbytes_up",
    "mbytes_down",
    "kbits_up",
    "kbits_down",
    "kbytes_up",
    "kbytes_down",
];

/// Rates observed on an interface during one measurement window,
/// in bits per second.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficHistory {
    pub down_bps: Vec<f64>,
    pub up_bps: Vec<f64>,
}

impl TrafficHistory {
    pub fn push(&mut self, down_bps: f64, up_bps: f64) {
        self.down_bps.push(down_bps);
        self.up_bps.push(up_bps);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.down_bps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.down_bps.is_empty()
    }

    #[must_use]
    pub fn peak_down_bps(&self) -> f64 {
        peak(&self.down_bps)
    }

    #[must_use]
    pub fn peak_up_bps(&self) -> f64 {
        peak(&self.up_bps)
    }
}

/// Average of the [`PEAK_SAMPLES`] highest samples; zero without samples.
#[must_use]
pub fn peak(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let best = &sorted[..sorted.len().min(PEAK_SAMPLES)];
    best.iter().sum::<f64>() / best.len() as f64
}

/// Target rates after applying the configured factors, in bits per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleRates {
    pub up_bps: u64,
    pub down_bps: u64,
}

impl ThrottleRates {
    #[must_use]
    pub fn from_peaks(peak_up_bps: f64, peak_down_bps: f64, up_factor: f64, down_factor: f64) -> Self {
        Self {
            up_bps: (peak_up_bps * up_factor).max(0.0).round() as u64,
            down_bps: (peak_down_bps * down_factor).max(0.0).round() as u64,
        }
    }

    /// Values for every entry of [`THROTTLE_PLACEHOLDERS`].
    #[must_use]
    pub fn template_values(&self, interface: &str) -> Vec<(&'static str, String)> {
        let up = self.up_bps as f64;
        let down = self.down_bps as f64;
        let scaled = |bps: f64, divisor: f64| format!("{}", (bps / divisor).round() as u64);

        vec![
            ("interface", interface.to_string()),
            ("mbits_up", scaled(up, 1e6)),
            ("mbits_down", scaled(down, 1e6)),
            ("mbytes_up", scaled(up, 8e6)),
            ("mbytes_down", scaled(down, 8e6)),
            ("kbits_up", scaled(up, 1e3)),
            ("kbits_down", scaled(down, 1e3)),
            ("kbytes_up", scaled(up, 8e3)),
            ("kbytes_down", scaled(down, 8e3)),
        ]
    }
}

/// Names of all `{name}` placeholders in `template`, in order of appearance.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                names.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

/// Substitute `{name}` placeholders. Unknown names are left untouched.
#[must_use]
pub fn render_template(template: &str, values: &[(&str, String)]) -> String {
    values.iter().fold(template.to_string(), |rendered, (name, value)| {
        rendered.replace(&format!("{{{name}}}"), value)
    })
}
