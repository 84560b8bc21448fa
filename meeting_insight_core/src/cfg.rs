use serde::{Deserialize, Serialize};

use crate::error::{InsightError, Result};

/// Thresholds for the three-condition polarization test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarizationCfg {
    /// Raw standard deviation must exceed this.
    pub std_scale: f64,
    /// Sentiment-bucketed standard deviation must exceed this.
    pub std_mapped_scale: f64,
    /// Positive/negative balance ratio must exceed this.
    pub poles: f64,
}

impl Default for PolarizationCfg {
    fn default() -> Self {
        Self {
            std_scale: 1.0,
            std_mapped_scale: 0.5,
            poles: 0.25,
        }
    }
}

/// Two-tier rule for frequently dotted subjects:
/// `(share > min_pct_1 && count > min_count_1) || (share > min_pct_2 && count > min_count_2)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequentDotsCfg {
    pub min_pct_1: f64,
    pub min_count_1: usize,
    pub min_pct_2: f64,
    pub min_count_2: usize,
}

impl Default for FrequentDotsCfg {
    fn default() -> Self {
        Self {
            min_pct_1: 0.10,
            min_count_1: 0,
            min_pct_2: 0.05,
            min_count_2: 5,
        }
    }
}

/// A subject is a primary participant when
/// `share > min_share || (count > min_count && share > min_share_with_count)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryCfg {
    pub min_share: f64,
    pub min_count: usize,
    pub min_share_with_count: f64,
}

impl Default for PrimaryCfg {
    fn default() -> Self {
        Self {
            min_share: 0.20,
            min_count: 10,
            min_share_with_count: 0.10,
        }
    }
}

/// Labels and numeric codes for yes/no answers.
///
/// Labels match case-insensitively after trimming.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryCfg {
    pub yes_label: String,
    pub no_label: String,
    pub yes_code: f64,
    pub no_code: f64,
}

impl Default for BinaryCfg {
    fn default() -> Self {
        Self {
            yes_label: "Yes".to_string(),
            no_label: "No".to_string(),
            yes_code: 2.0,
            no_code: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightCfg {
    /// Response ratio that must be exceeded for a quorum.
    pub quorum_threshold: f64,
    /// Absolute response floor for a quorum (strict `>`).
    pub quorum_min_responses: usize,
    /// Total responder believability needed for a believable consensus.
    pub consensus_believability: f64,
    /// Weighted share a categorical/binary choice must exceed to be the believable choice.
    pub majority_threshold: f64,
    /// Raw distance above which two numeric answers in different buckets disagree.
    pub disagreement_threshold: f64,
    /// Raw distance used by `substantive_disagreement`.
    pub substantive_threshold: f64,
    /// A response is unique when fewer than `1 - unique_disagreement` of the others share its bucket.
    pub unique_disagreement: f64,
    pub polarization: PolarizationCfg,
    /// Nubby threshold on sentiment-bucketed (or coded) divisiveness.
    pub nubby_threshold_mapped: f64,
    /// Nubby threshold on raw numeric divisiveness.
    pub nubby_threshold_raw: f64,
    /// Z-score bar for notable participants.
    pub oos_threshold_low: f64,
    /// Z-score bar for everyone else.
    pub oos_threshold_high: f64,
    pub frequent_dots: FrequentDotsCfg,
    pub primary: PrimaryCfg,
    /// Bin edges for meeting nubbiness; four increasing edges give five classes.
    pub meeting_nubbiness_bins: [f64; 4],
    /// Believability assumed for people the data provider has no score for.
    pub default_believability: f64,
    pub binary: BinaryCfg,
}

impl Default for InsightCfg {
    fn default() -> Self {
        Self {
            quorum_threshold: 0.80,
            quorum_min_responses: 3,
            consensus_believability: 0.75,
            majority_threshold: 0.70,
            disagreement_threshold: 1.7,
            substantive_threshold: 1.7,
            unique_disagreement: 0.88,
            polarization: PolarizationCfg::default(),
            nubby_threshold_mapped: 0.5,
            nubby_threshold_raw: 1.0,
            oos_threshold_low: 0.8,
            oos_threshold_high: 1.2,
            frequent_dots: FrequentDotsCfg::default(),
            primary: PrimaryCfg::default(),
            meeting_nubbiness_bins: [0.2, 0.4, 0.6, 0.8],
            default_believability: 0.01,
            binary: BinaryCfg::default(),
        }
    }
}

impl InsightCfg {
    /// Parse a (possibly partial) TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: InsightCfg = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("quorum_threshold", self.quorum_threshold),
            ("majority_threshold", self.majority_threshold),
            ("unique_disagreement", self.unique_disagreement),
            ("default_believability", self.default_believability),
            ("frequent_dots.min_pct_1", self.frequent_dots.min_pct_1),
            ("frequent_dots.min_pct_2", self.frequent_dots.min_pct_2),
            ("primary.min_share", self.primary.min_share),
            ("primary.min_share_with_count", self.primary.min_share_with_count),
        ];
        for (name, v) in unit {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(InsightError::invalid_config(format!(
                    "{name} must be within [0, 1], got {v}"
                )));
            }
        }

        let non_negative = [
            ("consensus_believability", self.consensus_believability),
            ("disagreement_threshold", self.disagreement_threshold),
            ("substantive_threshold", self.substantive_threshold),
            ("polarization.std_scale", self.polarization.std_scale),
            ("polarization.std_mapped_scale", self.polarization.std_mapped_scale),
            ("polarization.poles", self.polarization.poles),
            ("nubby_threshold_mapped", self.nubby_threshold_mapped),
            ("nubby_threshold_raw", self.nubby_threshold_raw),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(InsightError::invalid_config(format!(
                    "{name} must be a non-negative number, got {v}"
                )));
            }
        }

        // z-score bars may be negative, they only need to be numbers.
        if !self.oos_threshold_low.is_finite() || !self.oos_threshold_high.is_finite() {
            return Err(InsightError::invalid_config("out-of-sync thresholds must be finite"));
        }

        let bins = self.meeting_nubbiness_bins;
        if bins.iter().any(|b| !b.is_finite()) || bins.windows(2).any(|w| w[0] >= w[1]) {
            return Err(InsightError::invalid_config(format!(
                "meeting_nubbiness_bins must be strictly increasing, got {bins:?}"
            )));
        }

        let b = &self.binary;
        if b.yes_label.trim().is_empty() || b.no_label.trim().is_empty() {
            return Err(InsightError::invalid_config("binary labels must not be empty"));
        }
        if b.yes_label.trim().eq_ignore_ascii_case(b.no_label.trim()) {
            return Err(InsightError::invalid_config("binary yes/no labels must differ"));
        }
        if !b.yes_code.is_finite() || !b.no_code.is_finite() || b.yes_code == b.no_code {
            return Err(InsightError::invalid_config("binary yes/no codes must be distinct numbers"));
        }

        Ok(())
    }
}
