//! Rendering configuration for missing-value figures.
//!
//! Every figure produced by a renderer carries the same set of named options
//! (height, width, alpha, legend placement). [`RenderConfig::builder()`]
//! validates them before use.

use serde::{Deserialize, Serialize};

/// Default figure height in pixels.
pub const DEFAULT_HEIGHT: u32 = 375;

/// Default figure width in pixels.
pub const DEFAULT_WIDTH: u32 = 325;

/// Default fill opacity for overlapping series.
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Where the legend is placed relative to the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

/// Configuration shared by all rendering routines.
///
/// # Example
///
/// ```rust,ignore
/// use lex_missing::config::{LegendPosition, RenderConfig};
///
/// let config = RenderConfig::builder()
///     .height(400)
///     .alpha(0.5)
///     .legend_position(LegendPosition::Bottom)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Figure height in pixels.
    /// Default: 375
    pub height: u32,

    /// Figure width in pixels.
    /// Default: 325
    pub width: u32,

    /// Opacity of filled series (0.0 - 1.0).
    /// Default: 0.3
    pub alpha: f64,

    /// Legend placement.
    /// Default: Top
    pub legend_position: LegendPosition,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            alpha: DEFAULT_ALPHA,
            legend_position: LegendPosition::default(),
        }
    }
}

impl RenderConfig {
    /// Create a new configuration builder.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigValidationError::InvalidAlpha(self.alpha));
        }

        if self.height == 0 {
            return Err(ConfigValidationError::InvalidDimension {
                field: "height".to_string(),
                value: self.height,
            });
        }

        if self.width == 0 {
            return Err(ConfigValidationError::InvalidDimension {
                field: "width".to_string(),
                value: self.width,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid alpha: {0} (must be between 0.0 and 1.0)")]
    InvalidAlpha(f64),

    #[error("Invalid {field}: {value} (must be at least 1)")]
    InvalidDimension { field: String, value: u32 },
}

/// Builder for [`RenderConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct RenderConfigBuilder {
    height: Option<u32>,
    width: Option<u32>,
    alpha: Option<f64>,
    legend_position: Option<LegendPosition>,
}

impl RenderConfigBuilder {
    /// Set the figure height in pixels.
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the figure width in pixels.
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the opacity of filled series.
    ///
    /// # Arguments
    /// * `alpha` - Value between 0.0 and 1.0
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Set the legend placement.
    pub fn legend_position(mut self, position: LegendPosition) -> Self {
        self.legend_position = Some(position);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `RenderConfig` or an error if validation fails.
    pub fn build(self) -> Result<RenderConfig, ConfigValidationError> {
        let config = RenderConfig {
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            alpha: self.alpha.unwrap_or(DEFAULT_ALPHA),
            legend_position: self.legend_position.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
