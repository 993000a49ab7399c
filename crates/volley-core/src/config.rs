//! Configuration for match analysis

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How "good" contacts are credited for reception and dig quality
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditRule {
    /// perfect + good
    #[default]
    PerfectPlusGood,
    /// perfect + good + 0.5 × poor
    HalfCreditPoor,
}

impl CreditRule {
    /// Credited count for the given quality tallies
    pub fn credit(&self, perfect: u64, good: u64, poor: u64) -> f64 {
        match self {
            Self::PerfectPlusGood => (perfect + good) as f64,
            Self::HalfCreditPoor => (perfect + good) as f64 + 0.5 * poor as f64,
        }
    }
}

/// Analysis-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Pseudo-player names standing in for team-level errors
    pub team_placeholders: Vec<String>,
    /// Template rows whose player starts with this prefix are skipped
    pub placeholder_prefix: String,
    pub reception_credit: CreditRule,
    pub dig_credit: CreditRule,
    pub confidence_level: f64,
    pub significance_alpha: f64,
    pub min_sample_size: u64,
    /// Classify a point with a reception but no team serve as a receiving
    /// rally. Off by default: such points are skipped as ambiguous.
    pub receive_only_rallies: bool,
    /// Accepted spellings for "we won the point"
    pub won_tokens: Vec<String>,
    /// Accepted spellings for "we lost the point"
    pub lost_tokens: Vec<String>,
    /// Largest count accepted from one aggregate cell; larger cells are
    /// zeroed with a warning
    pub max_cell_count: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            team_placeholders: vec!["OUR_TEAM".to_string(), "TEAM".to_string()],
            placeholder_prefix: "Player_".to_string(),
            reception_credit: CreditRule::default(),
            dig_credit: CreditRule::default(),
            confidence_level: 0.95,
            significance_alpha: 0.05,
            min_sample_size: 30,
            receive_only_rallies: false,
            won_tokens: ["yes", "y", "1", "true", "us"].map(String::from).to_vec(),
            lost_tokens: ["no", "n", "0", "false", "them"].map(String::from).to_vec(),
            max_cell_count: 10_000,
        }
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(Error::invalid_probability(
                "confidence_level",
                self.confidence_level,
            ));
        }
        if !(self.significance_alpha > 0.0 && self.significance_alpha < 1.0) {
            return Err(Error::invalid_probability(
                "significance_alpha",
                self.significance_alpha,
            ));
        }
        if self.max_cell_count == 0 {
            return Err(Error::InvalidParameter(
                "max_cell_count must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `player` is a team-error pseudo-player (case-insensitive)
    pub fn is_team_placeholder(&self, player: &str) -> bool {
        let player = player.trim();
        self.team_placeholders
            .iter()
            .any(|p| p.eq_ignore_ascii_case(player))
    }

    /// Whether a row for `player` should be dropped entirely
    pub fn is_template_row(&self, player: &str) -> bool {
        let player = player.trim();
        player.is_empty()
            || (!self.placeholder_prefix.is_empty() && player.starts_with(&self.placeholder_prefix))
    }

    /// Parse a point-winner token; `None` when unrecognized
    pub fn parse_won(&self, token: &str) -> Option<bool> {
        let token = token.trim();
        if self.won_tokens.iter().any(|t| t.eq_ignore_ascii_case(token)) {
            Some(true)
        } else if self.lost_tokens.iter().any(|t| t.eq_ignore_ascii_case(token)) {
            Some(false)
        } else {
            None
        }
    }
}

/// Builder for [`AnalysisConfig`]
#[derive(Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn team_placeholders<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.team_placeholders = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn placeholder_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.placeholder_prefix = prefix.into();
        self
    }

    pub fn reception_credit(mut self, rule: CreditRule) -> Self {
        self.config.reception_credit = rule;
        self
    }

    pub fn dig_credit(mut self, rule: CreditRule) -> Self {
        self.config.dig_credit = rule;
        self
    }

    pub fn confidence_level(mut self, level: f64) -> Self {
        self.config.confidence_level = level;
        self
    }

    pub fn significance_alpha(mut self, alpha: f64) -> Self {
        self.config.significance_alpha = alpha;
        self
    }

    pub fn min_sample_size(mut self, n: u64) -> Self {
        self.config.min_sample_size = n;
        self
    }

    pub fn receive_only_rallies(mut self, enabled: bool) -> Self {
        self.config.receive_only_rallies = enabled;
        self
    }

    pub fn max_cell_count(mut self, limit: u64) -> Self {
        self.config.max_cell_count = limit;
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_sample_size, 30);
        assert_eq!(config.reception_credit, CreditRule::PerfectPlusGood);
        assert!(!config.receive_only_rallies);
        assert_eq!(config.max_cell_count, 10_000);
    }

    #[test]
    fn test_builder_rejects_bad_level() {
        assert!(AnalysisConfig::builder().confidence_level(1.0).build().is_err());
        assert!(AnalysisConfig::builder().significance_alpha(0.0).build().is_err());
        let config = AnalysisConfig::builder()
            .confidence_level(0.99)
            .reception_credit(CreditRule::HalfCreditPoor)
            .build()
            .unwrap();
        assert_eq!(config.confidence_level, 0.99);

        assert!(AnalysisConfig::builder().max_cell_count(0).build().is_err());
        let config = AnalysisConfig::builder().max_cell_count(500).build().unwrap();
        assert_eq!(config.max_cell_count, 500);
    }

    #[test]
    fn test_credit_rules() {
        assert_eq!(CreditRule::PerfectPlusGood.credit(3, 4, 2), 7.0);
        assert_eq!(CreditRule::HalfCreditPoor.credit(3, 4, 2), 8.0);
    }

    #[test]
    fn test_placeholders_and_templates() {
        let config = AnalysisConfig::default();
        assert!(config.is_team_placeholder("our_team"));
        assert!(config.is_team_placeholder(" TEAM "));
        assert!(!config.is_team_placeholder("Alex"));
        assert!(config.is_template_row("Player_7"));
        assert!(config.is_template_row("   "));
        assert!(!config.is_template_row("Alex"));
    }

    #[test]
    fn test_point_winner_tokens() {
        let config = AnalysisConfig::default();
        assert_eq!(config.parse_won("Yes"), Some(true));
        assert_eq!(config.parse_won("US"), Some(true));
        assert_eq!(config.parse_won("0"), Some(false));
        assert_eq!(config.parse_won("them"), Some(false));
        assert_eq!(config.parse_won("maybe"), None);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"confidence_level": 0.9}"#).unwrap();
        assert_eq!(config.confidence_level, 0.9);
        assert_eq!(config.significance_alpha, 0.05);
    }
}
