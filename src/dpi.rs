//! DPI-aware window sizing

use crate::config::WindowSettings;

/// Scales the requested window size by the display's scale factor
///
/// The returned width and height are physical pixels. A scale factor that is
/// not a finite positive number is treated as 1.0.
pub fn dpi_aware_window_size(settings: &WindowSettings, scale_factor: f64) -> WindowSettings {
    let scale = sanitize_scale(scale_factor);

    WindowSettings {
        title: settings.title.clone(),
        width: scale_dimension(settings.width, scale),
        height: scale_dimension(settings.height, scale),
    }
}

/// Clamps a reported scale factor to something usable
pub fn sanitize_scale(scale_factor: f64) -> f64 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    }
}

fn scale_dimension(value: u32, scale: f64) -> u32 {
    let scaled = (value as f64 * scale).round();
    scaled.clamp(1.0, u32::MAX as f64) as u32
}
