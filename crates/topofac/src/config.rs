//! Configuration types for TopFac diagram generation.
//!
//! This module provides configuration structures that control how topologies
//! are classified, laid out and styled. All types implement
//! [`serde::Deserialize`] so they can be loaded from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Principal direction and the box-layout constants.
//! - [`StyleConfig`] - Background color and extra keyword classification rules.
//!
//! # Example
//!
//! ```
//! # use topofac::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use topofac_core::{
    classify::{AreaTable, AreaType, DeviceTable, DeviceType, KeywordRule},
    color::Color,
    direction::Direction,
};
use topofac_parser::ParseConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Overrides the principal direction, typically from the command line.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.layout.direction = direction;
        self
    }

    /// Builds the parser configuration: the built-in keyword tables with the
    /// configured rules placed in front of them.
    pub fn parse_config(&self) -> ParseConfig {
        let devices = DeviceTable::default().with_rules_first(self.style.device_rules.clone());
        let areas = AreaTable::default().with_rules_first(self.style.area_rules.clone());
        ParseConfig::new(devices, areas)
    }
}

/// Box-layout configuration.
///
/// Every constant is tunable. The layout only promises relative properties:
/// boxes grow with their content, and siblings packed along one axis do not
/// overlap.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Axis along which environments are sequenced.
    direction: Direction,
    /// Absolute position of the first environment.
    origin_x: f32,
    origin_y: f32,
    /// Gap between consecutive environments.
    environment_gap: f32,
    environment_padding: f32,
    datacenter_padding: f32,
    datacenter_spacing: f32,
    area_padding: f32,
    area_spacing: f32,
    area_width: f32,
    /// Height reserved for the title of every container box.
    header_height: f32,
    component_width: f32,
    component_height: f32,
    component_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            origin_x: 50.0,
            origin_y: 50.0,
            environment_gap: 50.0,
            environment_padding: 20.0,
            datacenter_padding: 20.0,
            datacenter_spacing: 30.0,
            area_padding: 20.0,
            area_spacing: 30.0,
            area_width: 220.0,
            header_height: 40.0,
            component_width: 140.0,
            component_height: 40.0,
            component_spacing: 50.0,
        }
    }
}

impl LayoutConfig {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns a copy of this configuration with another principal direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn origin_x(&self) -> f32 {
        self.origin_x
    }

    pub fn origin_y(&self) -> f32 {
        self.origin_y
    }

    pub fn environment_gap(&self) -> f32 {
        self.environment_gap
    }

    pub fn environment_padding(&self) -> f32 {
        self.environment_padding
    }

    pub fn datacenter_padding(&self) -> f32 {
        self.datacenter_padding
    }

    pub fn datacenter_spacing(&self) -> f32 {
        self.datacenter_spacing
    }

    pub fn area_padding(&self) -> f32 {
        self.area_padding
    }

    pub fn area_spacing(&self) -> f32 {
        self.area_spacing
    }

    pub fn area_width(&self) -> f32 {
        self.area_width
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    pub fn component_width(&self) -> f32 {
        self.component_width
    }

    pub fn component_height(&self) -> f32 {
        self.component_height
    }

    pub fn component_spacing(&self) -> f32 {
        self.component_spacing
    }

    /// Checks that every constant is a finite, non-negative number.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending constant.
    pub fn validate(&self) -> Result<(), String> {
        let constants = [
            ("environment_gap", self.environment_gap),
            ("environment_padding", self.environment_padding),
            ("datacenter_padding", self.datacenter_padding),
            ("datacenter_spacing", self.datacenter_spacing),
            ("area_padding", self.area_padding),
            ("area_spacing", self.area_spacing),
            ("area_width", self.area_width),
            ("header_height", self.header_height),
            ("component_width", self.component_width),
            ("component_height", self.component_height),
            ("component_spacing", self.component_spacing),
        ];

        if !self.origin_x.is_finite() || !self.origin_y.is_finite() {
            return Err("Invalid layout origin in config: must be finite".to_string());
        }

        match constants
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            Some((name, value)) => Err(format!(
                "Invalid layout constant `{name}` in config: {value}"
            )),
            None => Ok(()),
        }
    }
}

/// Visual styling and classification configuration.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background color of scene-graph output, as a CSS color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Device keyword rules checked before the built-in table.
    #[serde(default)]
    device_rules: Vec<KeywordRule<DeviceType>>,

    /// Area keyword rules checked before the built-in table.
    #[serde(default)]
    area_rules: Vec<KeywordRule<AreaType>>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is not a valid color.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn device_rules(&self) -> &[KeywordRule<DeviceType>] {
        &self.device_rules
    }

    pub fn area_rules(&self) -> &[KeywordRule<AreaType>] {
        &self.area_rules
    }
}
