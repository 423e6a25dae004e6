// src/config/pipeline.rs
//! Pipeline configuration (TOML).
//!
//! ```toml
//! [thresholds]
//! profile = "standard"   # or "strict"; explicit positive/negative win
//!
//! [ranking]
//! k = 3
//! ```
//!
//! Lookup: $PIPELINE_CONFIG_PATH → config/pipeline.toml → built-in defaults.
//! Env overrides applied last: PIPELINE_THRESHOLD_PROFILE, PIPELINE_RANK_K.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs};

use crate::pipeline::{Thresholds, DEFAULT_K, STANDARD_THRESHOLDS, STRICT_THRESHOLDS};

pub const DEFAULT_PIPELINE_CONFIG_PATH: &str = "config/pipeline.toml";
pub const ENV_PIPELINE_CONFIG_PATH: &str = "PIPELINE_CONFIG_PATH";
pub const ENV_THRESHOLD_PROFILE: &str = "PIPELINE_THRESHOLD_PROFILE";
pub const ENV_RANK_K: &str = "PIPELINE_RANK_K";

fn default_k() -> usize {
    DEFAULT_K
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdProfile {
    /// ±0.1
    #[default]
    Standard,
    /// ±0.3
    Strict,
}

impl ThresholdProfile {
    pub fn thresholds(self) -> Thresholds {
        match self {
            Self::Standard => STANDARD_THRESHOLDS,
            Self::Strict => STRICT_THRESHOLDS,
        }
    }
}

impl FromStr for ThresholdProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "strict" => Ok(Self::Strict),
            other => Err(anyhow!("unknown threshold profile: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThresholdsSection {
    #[serde(default)]
    pub profile: ThresholdProfile,
    #[serde(default)]
    pub positive: Option<f64>,
    #[serde(default)]
    pub negative: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSection {
    #[serde(default = "default_k")]
    pub k: usize,
}

impl Default for RankingSection {
    fn default() -> Self {
        Self { k: default_k() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub thresholds: ThresholdsSection,
    #[serde(default)]
    pub ranking: RankingSection,
}

impl PipelineConfig {
    /// Parse from TOML text and sanitize.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: PipelineConfig = toml::from_str(s).context("parsing pipeline config")?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load from an explicit path. Missing or invalid files are errors.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading pipeline config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid pipeline config at {}", path.display()))
    }

    /// Env path → default path → defaults, then env overrides.
    /// An unreadable or invalid file is logged and replaced by defaults.
    pub fn load_or_default() -> Self {
        let (path, explicit) = match env::var(ENV_PIPELINE_CONFIG_PATH) {
            Ok(p) => (PathBuf::from(p), true),
            Err(_) => (PathBuf::from(DEFAULT_PIPELINE_CONFIG_PATH), false),
        };

        let mut cfg = if path.exists() {
            Self::from_path(&path).unwrap_or_else(|e| {
                tracing::warn!(target: "config", error = ?e, "falling back to default pipeline config");
                Self::default()
            })
        } else {
            if explicit {
                tracing::warn!(
                    target: "config",
                    path = %path.display(),
                    "PIPELINE_CONFIG_PATH points to a non-existent file; using defaults"
                );
            }
            Self::default()
        };

        cfg.apply_env_overrides();
        tracing::info!(
            target: "config",
            positive = cfg.thresholds().positive,
            negative = cfg.thresholds().negative,
            k = cfg.rank_k(),
            "pipeline config loaded"
        );
        cfg
    }

    /// PIPELINE_THRESHOLD_PROFILE / PIPELINE_RANK_K; unparsable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(raw) = env::var(ENV_THRESHOLD_PROFILE) {
            match raw.parse::<ThresholdProfile>() {
                Ok(p) => {
                    self.thresholds.profile = p;
                    self.thresholds.positive = None;
                    self.thresholds.negative = None;
                }
                Err(e) => tracing::warn!(target: "config", error = %e, "ignoring env override"),
            }
        }
        if let Some(k) = env::var(ENV_RANK_K)
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
        {
            self.ranking.k = k;
        }
        self.sanitize();
    }

    /// Effective thresholds: explicit values over the profile.
    pub fn thresholds(&self) -> Thresholds {
        let base = self.thresholds.profile.thresholds();
        Thresholds {
            positive: self.thresholds.positive.unwrap_or(base.positive),
            negative: self.thresholds.negative.unwrap_or(base.negative),
        }
    }

    pub fn rank_k(&self) -> usize {
        self.ranking.k
    }

    fn sanitize(&mut self) {
        for v in [&mut self.thresholds.positive, &mut self.thresholds.negative] {
            *v = v.filter(|x| x.is_finite()).map(|x| x.clamp(-1.0, 1.0));
        }
        let t = self.thresholds();
        if t.negative > t.positive {
            // swap to keep a valid band
            self.thresholds.positive = Some(t.negative);
            self.thresholds.negative = Some(t.positive);
        }
        if self.ranking.k == 0 {
            self.ranking.k = 1;
        }
    }
}
