//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{FacturaError, Result};

/// Main configuration for the facturape pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacturaConfig {
    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// Contrast enhancement configuration.
    pub preprocessing: PreprocessingConfig,
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum similarity (exclusive) for a header line to match a merchant name.
    pub similarity_threshold: f64,

    /// Number of leading OCR lines treated as the header zone.
    pub header_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
            header_lines: 10,
        }
    }
}

/// Contrast enhancement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Histogram clip limit, relative to a flat histogram.
    pub clip_limit: f32,

    /// Number of tiles along each image axis.
    pub tile_grid: u32,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tile_grid: 8,
        }
    }
}

impl FacturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the extraction engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.extraction.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(FacturaError::Config(format!(
                "extraction.similarity_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        if self.preprocessing.tile_grid == 0 {
            return Err(FacturaError::Config(
                "preprocessing.tile_grid must be at least 1".to_string(),
            ));
        }
        if self.preprocessing.clip_limit <= 0.0 {
            return Err(FacturaError::Config(format!(
                "preprocessing.clip_limit must be positive, got {}",
                self.preprocessing.clip_limit
            )));
        }
        Ok(())
    }
}
