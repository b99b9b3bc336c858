//! Resolved drawing styles.

use serde::{Deserialize, Serialize};

/// Drawing attributes attached to an output polygon.
///
/// All fields are resolved numbers: colors are packed integer values
/// (or palette indices), hatch fields select and parameterize a fill
/// pattern downstream. `None` means "renderer default".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hatch_pattern: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hatch_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hatch_angle: Option<f64>,
}

impl Style {
    /// True when every attribute is unset.
    pub fn is_default(&self) -> bool {
        *self == Style::default()
    }
}
