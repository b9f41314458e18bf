//! Gradient geometry.
//!
//! Both gradient kinds are anchored on the center of the content square, so the rendered
//! gradient stays centered on the symbol whatever the angle or border width.

use tiny_skia::{GradientStop, LinearGradient, Point, RadialGradient, Shader, SpreadMode, Transform};

use crate::style::{Gradient, GradientKind};

/// Start and end of a linear gradient axis rotated by `angle_degrees` about `center`.
///
/// The axis spans `2 * radius` and always passes through `center`.
pub fn linear_endpoints(center: Point, radius: f32, angle_degrees: f32) -> (Point, Point) {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let dx = radius * cos;
    let dy = radius * sin;
    (
        Point::from_xy(center.x - dx, center.y - dy),
        Point::from_xy(center.x + dx, center.y + dy),
    )
}

/// Radius that reaches the corners of a square with side `content_px`.
pub fn radial_radius(content_px: f32) -> f32 {
    core::f32::consts::SQRT_2 * (content_px / 2.0)
}

/// Builds the shader for `gradient` over a content square of `content_px` whose top-left corner
/// sits at (`origin`, `origin`).
///
/// Falls back to a solid start color when the geometry is degenerate.
pub(crate) fn shader(gradient: &Gradient, origin: f32, content_px: f32) -> Shader<'static> {
    let half = content_px / 2.0;
    let center = Point::from_xy(origin + half, origin + half);
    let stops = vec![
        GradientStop::new(0.0, gradient.start_color.to_skia()),
        GradientStop::new(1.0, gradient.end_color.to_skia()),
    ];
    let built = match gradient.kind {
        GradientKind::Linear => {
            let (start, end) = linear_endpoints(center, half, gradient.angle_degrees);
            LinearGradient::new(start, end, stops, SpreadMode::Pad, Transform::identity())
        }
        GradientKind::Radial => RadialGradient::new(
            center,
            center,
            radial_radius(content_px),
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        ),
    };
    built.unwrap_or_else(|| {
        tracing::warn!(kind = ?gradient.kind, content_px, "degenerate gradient, using start color");
        Shader::SolidColor(gradient.start_color.to_skia())
    })
}
