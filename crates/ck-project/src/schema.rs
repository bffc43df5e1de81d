//! Project schema definitions.

use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_WIDTH: i32 = 1200;
pub const DEFAULT_IMAGE_HEIGHT: i32 = 800;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub app_settings: AppSettings,
    #[serde(default)]
    pub curves: Vec<CurveConfig>,
}

/// Axis labels and ranges as typed by the user, plus export size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct AppSettings {
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub image_width: i32,
    pub image_height: i32,
    pub legend_position: i32,
    pub x_axis_min: Option<String>,
    pub x_axis_max: Option<String>,
    pub auto_scale_x: bool,
    pub y_axis_min: Option<String>,
    pub y_axis_max: Option<String>,
    pub auto_scale_y: bool,
    pub y2_axis_label: Option<String>,
    pub y2_axis_min: Option<String>,
    pub y2_axis_max: Option<String>,
    pub auto_scale_y2: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            x_axis_label: String::new(),
            y_axis_label: String::new(),
            image_width: DEFAULT_IMAGE_WIDTH,
            image_height: DEFAULT_IMAGE_HEIGHT,
            legend_position: 0,
            x_axis_min: None,
            x_axis_max: None,
            auto_scale_x: true,
            y_axis_min: None,
            y_axis_max: None,
            auto_scale_y: true,
            y2_axis_label: None,
            y2_axis_min: None,
            y2_axis_max: None,
            auto_scale_y2: true,
        }
    }
}

/// One saved curve. `HashId` must match the identity recomputed from the
/// re-parsed source for the curve to be restored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CurveConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub line_style: String,
    #[serde(default)]
    pub source_file_name: String,
    #[serde(default)]
    pub source_file_full_path: String,
    /// `[A, R, G, B]`, each `0..=255`.
    #[serde(default)]
    pub plot_color: Vec<i32>,
    #[serde(default)]
    pub marker_size: f64,
    #[serde(default)]
    pub x_magnitude: i32,
    #[serde(default)]
    pub reverse_x: bool,
    #[serde(default)]
    pub smooth: i32,
    pub hash_id: String,
    #[serde(default)]
    pub y2: bool,
}

fn default_true() -> bool {
    true
}

fn default_width() -> f64 {
    5.0
}

fn default_opacity() -> f64 {
    1.0
}

impl CurveConfig {
    /// `PlotColor` as bytes, if it has four in-range components.
    pub fn color_argb(&self) -> Option<[u8; 4]> {
        let [a, r, g, b] = <[i32; 4]>::try_from(self.plot_color.as_slice()).ok()?;
        Some([
            u8::try_from(a).ok()?,
            u8::try_from(r).ok()?,
            u8::try_from(g).ok()?,
            u8::try_from(b).ok()?,
        ])
    }

    /// Path to re-read the data from: the full path, else the bare file name.
    pub fn data_path(&self) -> Option<&str> {
        [&self.source_file_full_path, &self.source_file_name]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}
