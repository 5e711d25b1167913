use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::constants::MODEL_BASE_URL;

/// Whisper model size selection.
///
/// Each size trades accuracy for memory and inference time; the metadata
/// here is approximate and only used for reporting and cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    /// Good balance of speed and accuracy (~142 MB).
    Base,
    /// Better accuracy, slower (~466 MB).
    Small,
    /// High accuracy (~1.5 GB).
    Medium,
    /// Best accuracy, slowest (~2.9 GB).
    Large,
}

impl ModelSize {
    pub const ALL: [ModelSize; 4] = [
        ModelSize::Base,
        ModelSize::Small,
        ModelSize::Medium,
        ModelSize::Large,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        }
    }

    /// ggml weights file name as published by whisper.cpp.
    pub fn file_name(&self) -> String {
        match self {
            // "large" is an alias for the latest v3 weights
            ModelSize::Large => "ggml-large-v3.bin".to_string(),
            other => format!("ggml-{}.bin", other.as_str()),
        }
    }

    pub fn download_url(&self) -> String {
        format!("{MODEL_BASE_URL}/{}", self.file_name())
    }

    /// Approximate weights size in bytes.
    pub fn approx_size_bytes(&self) -> u64 {
        match self {
            ModelSize::Base => 142_000_000,
            ModelSize::Small => 466_000_000,
            ModelSize::Medium => 1_500_000_000,
            ModelSize::Large => 2_900_000_000,
        }
    }

    /// Rough inference cost relative to `Base` (1.0 = base speed).
    pub fn relative_latency(&self) -> f64 {
        match self {
            ModelSize::Base => 1.0,
            ModelSize::Small => 3.0,
            ModelSize::Medium => 9.0,
            ModelSize::Large => 18.0,
        }
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(ModelSize::Base),
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large" => Ok(ModelSize::Large),
            other => Err(format!(
                "unknown model size '{other}' (expected base, small, medium, or large)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("base", ModelSize::Base)]
    #[case("small", ModelSize::Small)]
    #[case("medium", ModelSize::Medium)]
    #[case("large", ModelSize::Large)]
    fn test_from_str_round_trips_display(#[case] s: &str, #[case] size: ModelSize) {
        assert_eq!(s.parse::<ModelSize>().unwrap(), size);
        assert_eq!(size.to_string(), s);
    }

    #[test]
    fn test_unknown_size_is_rejected() {
        assert!("tiny".parse::<ModelSize>().is_err());
        assert!("".parse::<ModelSize>().is_err());
    }

    #[test]
    fn test_file_names_match_whisper_cpp_releases() {
        assert_eq!(ModelSize::Base.file_name(), "ggml-base.bin");
        assert_eq!(ModelSize::Large.file_name(), "ggml-large-v3.bin");
    }

    #[test]
    fn test_latency_grows_with_size() {
        let latencies: Vec<f64> = ModelSize::ALL.iter().map(|s| s.relative_latency()).collect();
        assert!(latencies.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ModelSize::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let back: ModelSize = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ModelSize::Medium);
    }
}
