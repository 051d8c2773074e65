//! Error collection for section validation.
//!
//! Each section reports every problem it finds instead of stopping at the
//! first one, so an operator can fix a config file in one pass.

use std::time::Duration;

use rust_decimal::Decimal;

use crate::error::ConfigError;

pub(crate) struct Problems {
    section: &'static str,
    errors: Vec<ConfigError>,
}

impl Problems {
    pub(crate) fn new(section: &'static str) -> Self {
        Self {
            section,
            errors: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn into_errors(self) -> Vec<ConfigError> {
        self.errors
    }

    pub(crate) fn invalid(&mut self, field: &'static str, reason: impl Into<String>) {
        self.errors
            .push(ConfigError::invalid(self.section, field, reason));
    }

    pub(crate) fn require<T: Clone>(&mut self, field: &'static str, value: &Option<T>) -> Option<T> {
        if value.is_none() {
            self.errors.push(ConfigError::missing(self.section, field));
        }
        value.clone()
    }

    /// Present and not blank.
    pub(crate) fn text(&mut self, field: &'static str, value: &Option<String>) -> Option<String> {
        match value.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Some(text.to_string()),
            _ => {
                self.errors.push(ConfigError::missing(self.section, field));
                None
            }
        }
    }

    pub(crate) fn positive(&mut self, field: &'static str, value: Option<f64>) -> Option<f64> {
        let value = self.require(field, &value)?;
        if !value.is_finite() || value <= 0.0 {
            self.invalid(field, "must be greater than 0");
            return None;
        }
        Some(value)
    }

    pub(crate) fn positive_decimal(&mut self, field: &'static str, value: Option<Decimal>) -> Option<Decimal> {
        let value = self.require(field, &value)?;
        if value <= Decimal::ZERO {
            self.invalid(field, "must be greater than 0");
            return None;
        }
        Some(value)
    }

    pub(crate) fn non_negative_decimal(
        &mut self,
        field: &'static str,
        value: Option<Decimal>,
    ) -> Option<Decimal> {
        let value = self.require(field, &value)?;
        if value < Decimal::ZERO {
            self.invalid(field, "must be 0 or greater");
            return None;
        }
        Some(value)
    }

    /// A required duration in seconds, strictly positive.
    pub(crate) fn interval_secs(&mut self, field: &'static str, value: Option<f64>) -> Option<Duration> {
        let secs = self.positive(field, value)?;
        self.duration(field, secs)
    }

    /// An optional duration in seconds, zero allowed.
    pub(crate) fn delay_secs(&mut self, field: &'static str, value: Option<f64>) -> Option<Duration> {
        let value = value.unwrap_or(0.0);
        if !value.is_finite() || value < 0.0 {
            self.invalid(field, "must be 0 or greater");
            return None;
        }
        self.duration(field, value)
    }

    fn duration(&mut self, field: &'static str, secs: f64) -> Option<Duration> {
        match Duration::try_from_secs_f64(secs) {
            Ok(duration) => Some(duration),
            Err(_) => {
                self.invalid(field, "out of range");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_problem() {
        let mut problems = Problems::new("price");
        assert_eq!(problems.positive("minimum-price", None), None);
        assert_eq!(problems.positive("collateral-factor", Some(-1.0)), None);
        assert_eq!(problems.positive("ok", Some(2.0)), Some(2.0));

        let errors = problems.into_errors();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            ConfigError::MissingField {
                section: "price",
                field: "minimum-price"
            }
        ));
        assert!(matches!(
            errors[1],
            ConfigError::InvalidValue {
                field: "collateral-factor",
                ..
            }
        ));
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let mut problems = Problems::new("throttle");
        assert_eq!(problems.text("interface", &Some("  ".into())), None);
        assert_eq!(problems.text("interface", &Some("eth0".into())), Some("eth0".into()));
        assert_eq!(problems.into_errors().len(), 1);
    }

    #[test]
    fn delays_default_to_zero() {
        let mut problems = Problems::new("restart");
        assert_eq!(problems.delay_secs("sleep", None), Some(Duration::ZERO));
        assert_eq!(problems.delay_secs("cooldown", Some(-1.0)), None);
        assert!(!problems.is_empty());
    }

    #[test]
    fn oversized_durations_are_invalid() {
        let mut problems = Problems::new("throttle");
        assert_eq!(problems.interval_secs("interval", Some(1e30)), None);
        assert_eq!(problems.delay_secs("sleep-after", Some(1e30)), None);
        assert_eq!(
            problems.interval_secs("interval", Some(86_400.0)),
            Some(Duration::from_secs(86_400))
        );

        let errors = problems.into_errors();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].to_string().contains("out of range"));
    }
}
