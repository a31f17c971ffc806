//! Declarative sampler configuration.
//!
//! A sampler or chain can be described in JSON and built at runtime:
//!
//! ```json
//! {
//!   "kind": "chain",
//!   "stages": [
//!     { "kind": "time", "epoch": "2024-01-01T00:00:00Z" },
//!     { "kind": "discrete", "rate": 1000.0 },
//!     { "kind": "down", "factor": 20.0, "alignment": "center" },
//!     { "kind": "events", "positions": [1, 51, [100, 120]] }
//!   ]
//! }
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sampler::{
    Alignment, AnySampler, DiscreteSampler, DownSampler, EventSampler, Position, SamplingChain, ShiftSampler,
    TimeSampler,
};
use crate::util::{Error, Result};

/// Event position in configuration: an index or an `[start, end]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionConfig {
    Point(i64),
    Span([i64; 2]),
}

impl From<PositionConfig> for Position {
    fn from(p: PositionConfig) -> Self {
        match p {
            PositionConfig::Point(i) => Position::point(i),
            PositionConfig::Span([a, b]) => Position::span(a, b),
        }
    }
}

/// Serializable description of any sampler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SamplerConfig {
    Time {
        epoch: DateTime<Utc>,
    },
    Discrete {
        rate: f64,
    },
    Down {
        factor: f64,
        #[serde(default)]
        alignment: Alignment,
    },
    Shift {
        shift: f64,
    },
    Events {
        positions: Vec<PositionConfig>,
    },
    Chain {
        stages: Vec<SamplerConfig>,
    },
}

impl SamplerConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        tracing::debug!(path = %path.display(), "reading sampler config");
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Construct the described sampler.
    pub fn build(&self) -> Result<AnySampler> {
        let sampler: AnySampler = match self {
            Self::Time { epoch } => TimeSampler::new(*epoch).into(),
            Self::Discrete { rate } => DiscreteSampler::new(*rate)?.into(),
            Self::Down { factor, alignment } => DownSampler::new(*factor, *alignment)?.into(),
            Self::Shift { shift } => ShiftSampler::new(*shift)?.into(),
            Self::Events { positions } => {
                EventSampler::new(positions.iter().copied().map(Position::from).collect())?.into()
            }
            Self::Chain { stages } => {
                let stages = stages.iter().map(Self::build).collect::<Result<Vec<_>>>()?;
                SamplingChain::new(stages)?.into()
            }
        };
        Ok(sampler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Interval, Sampler, Value};

    const CHAIN: &str = r#"{
        "kind": "chain",
        "stages": [
            { "kind": "discrete", "rate": 1000.0 },
            { "kind": "down", "factor": 20.0 },
            { "kind": "events", "positions": [1, 51, [100, 120]] }
        ]
    }"#;

    #[test]
    fn test_parse_and_build_chain() {
        let config = SamplerConfig::from_json(CHAIN).unwrap();
        match &config {
            SamplerConfig::Chain { stages } => {
                assert_eq!(stages.len(), 3);
                assert_eq!(
                    stages[1],
                    SamplerConfig::Down { factor: 20.0, alignment: Alignment::Left }
                );
            }
            other => panic!("expected chain, got {other:?}"),
        }

        let sampler = config.build().unwrap();
        assert_eq!(sampler.name(), "SamplingChain");
        assert_eq!(
            sampler.forward(&Value::from(3i64)).unwrap(),
            Value::from(Interval::new(
                chrono::Duration::milliseconds(1980),
                chrono::Duration::milliseconds(2380),
            ))
        );
    }

    #[test]
    fn test_time_epoch_and_alignment() {
        let config = SamplerConfig::from_json(
            r#"{ "kind": "down", "factor": 10.0, "alignment": "right" }"#,
        )
        .unwrap();
        assert_eq!(config, SamplerConfig::Down { factor: 10.0, alignment: Alignment::Right });

        let config = SamplerConfig::from_json(r#"{ "kind": "time", "epoch": "2024-01-01T00:00:00Z" }"#).unwrap();
        let sampler = config.build().unwrap();
        assert!(matches!(sampler, AnySampler::Time(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SamplerConfig::from_json(CHAIN).unwrap();
        let text = config.to_json().unwrap();
        assert_eq!(SamplerConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            SamplerConfig::from_json(r#"{ "kind": "warp" }"#),
            Err(Error::Config(_))
        ));
        let config = SamplerConfig::from_json(r#"{ "kind": "discrete", "rate": 0.0 }"#).unwrap();
        assert!(matches!(config.build(), Err(Error::InvalidParameter(_))));
        let config = SamplerConfig::from_json(r#"{ "kind": "chain", "stages": [] }"#).unwrap();
        assert!(config.build().is_err());
    }
}
