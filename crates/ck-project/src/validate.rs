//! Project validation logic.

use crate::schema::{CurveConfig, ProjectConfig};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

fn invalid(curve: &CurveConfig, field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: format!("Curves[{}].{field}", curve.name),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_project(project: &ProjectConfig) -> Result<(), ValidationError> {
    let settings = &project.app_settings;
    if settings.image_width <= 0 || settings.image_height <= 0 {
        return Err(ValidationError::InvalidValue {
            field: "AppSettings.ImageWidth/ImageHeight".to_string(),
            value: format!("{}x{}", settings.image_width, settings.image_height),
            reason: "image size must be positive".to_string(),
        });
    }

    let mut hash_ids = HashSet::new();
    for curve in &project.curves {
        validate_curve(curve)?;
        if !hash_ids.insert(curve.hash_id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: curve.hash_id.clone(),
                context: "Curves".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_curve(curve: &CurveConfig) -> Result<(), ValidationError> {
    if curve.hash_id.trim().is_empty() {
        return Err(invalid(curve, "HashId", "", "must not be empty"));
    }
    if !curve.plot_color.is_empty() && curve.color_argb().is_none() {
        return Err(invalid(
            curve,
            "PlotColor",
            format!("{:?}", curve.plot_color),
            "expected four components in 0..=255",
        ));
    }
    if !(0..=4).contains(&curve.smooth) {
        return Err(invalid(curve, "Smooth", curve.smooth, "expected 0..=4"));
    }
    if !(0.0..=1.0).contains(&curve.opacity) {
        return Err(invalid(curve, "Opacity", curve.opacity, "expected 0..=1"));
    }
    if !(curve.width > 0.0 && curve.width.is_finite()) {
        return Err(invalid(curve, "Width", curve.width, "must be positive"));
    }
    if !curve.marker_size.is_finite() || curve.marker_size < 0.0 {
        return Err(invalid(curve, "MarkerSize", curve.marker_size, "must be non-negative"));
    }
    Ok(())
}
