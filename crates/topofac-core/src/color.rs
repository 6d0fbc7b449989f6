//! Color handling for TopFac diagrams
//!
//! This module provides the [`Color`] type which validates CSS color strings
//! with the `DynamicColor` type from the color crate while keeping the text
//! exactly as written, since every output format embeds colors verbatim.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A validated CSS color.
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    text: String,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use topofac_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// assert_eq!(red.as_str(), "#ff0000");
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        let text = color_str.trim();
        match DynamicColor::from_str(text) {
            Ok(_) => Ok(Self {
                text: text.to_string(),
            }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the color text as it was written.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
