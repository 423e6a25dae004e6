// src/config/mod.rs
pub mod pipeline;

pub use pipeline::{
    PipelineConfig, RankingSection, ThresholdProfile, ThresholdsSection,
    DEFAULT_PIPELINE_CONFIG_PATH, ENV_PIPELINE_CONFIG_PATH, ENV_RANK_K, ENV_THRESHOLD_PROFILE,
};
