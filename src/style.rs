//! Visual configuration of a render.
//!
//! Every field is optional when deserialized; omitted fields take the defaults documented on each
//! type. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Shape drawn for each dark module.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeStyle {
    /// Fills the whole cell.
    #[default]
    Square,
    /// Inscribed circle.
    Dot,
    /// Rounded square whose corners straighten where dark neighbors touch.
    Rounded,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
}

/// Two-stop gradient spanning the content square.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    pub kind: GradientKind,
    pub start_color: Color,
    pub end_color: Color,
    /// Rotation of the gradient axis in degrees, clockwise from +x. Ignored for radial gradients.
    #[serde(default)]
    pub angle_degrees: f32,
}

/// Outline stroked around the content area.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Border {
    pub width: u32,
    #[serde(default)]
    pub color: Color,
}

/// Centered logo overlay.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoStyle {
    /// Reference handed to the [`crate::logo::LogoLoader`], usually a file path.
    #[serde(alias = "path")]
    pub source: String,
    /// Upper bound on the logo's longer side, in pixels.
    #[serde(default)]
    pub max_size: Option<u32>,
    /// Alpha applied to the whole logo, in [0, 1].
    #[serde(default = "LogoStyle::default_opacity")]
    pub opacity: f32,
    /// Logo size as a share of the content side length, in [0, 1].
    #[serde(default = "LogoStyle::default_proportion")]
    pub proportion: f32,
}

impl LogoStyle {
    pub const DEFAULT_PROPORTION: f32 = 0.2;

    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            max_size: None,
            opacity: Self::default_opacity(),
            proportion: Self::default_proportion(),
        }
    }

    fn default_opacity() -> f32 {
        1.0
    }

    fn default_proportion() -> f32 {
        Self::DEFAULT_PROPORTION
    }

    /// Side length in pixels for a content square of `content_px`.
    ///
    /// `min(content_px * proportion, max_size)`, rounded to whole pixels.
    pub fn size_px(&self, content_px: u32) -> u32 {
        let proportional = content_px as f32 * clamp_unit(self.proportion);
        let bounded = match self.max_size {
            Some(max) => proportional.min(max as f32),
            None => proportional,
        };
        bounded.round() as u32
    }

    pub fn clamped_opacity(&self) -> f32 {
        clamp_unit(self.opacity)
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Full style of a render.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderStyle {
    pub shape_style: ShapeStyle,
    /// Shape for the three corner marker regions; falls back to `shape_style`.
    pub position_marker_shape_style: Option<ShapeStyle>,
    /// Solid module color. Wins over `gradient` when both are set.
    pub fill_color: Option<Color>,
    pub gradient: Option<Gradient>,
    pub background: Color,
    pub border: Option<Border>,
    pub logo: Option<LogoStyle>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            shape_style: ShapeStyle::Square,
            position_marker_shape_style: None,
            fill_color: None,
            gradient: None,
            background: Color::WHITE,
            border: None,
            logo: None,
        }
    }
}

/// Resolved module paint.
#[derive(Clone, PartialEq, Debug)]
pub enum Fill<'a> {
    Solid(Color),
    Gradient(&'a Gradient),
}

impl RenderStyle {
    pub fn resolve_fill(&self) -> Fill<'_> {
        match (self.fill_color, &self.gradient) {
            (Some(color), _) => Fill::Solid(color),
            (None, Some(gradient)) => Fill::Gradient(gradient),
            (None, None) => Fill::Solid(Color::BLACK),
        }
    }

    pub fn marker_shape(&self) -> ShapeStyle {
        self.position_marker_shape_style.unwrap_or(self.shape_style)
    }

    pub fn border_px(&self) -> u32 {
        self.border.as_ref().map_or(0, |b| b.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_yields_defaults() {
        let style: RenderStyle = serde_json::from_value(json!({})).unwrap();
        assert_eq!(style, RenderStyle::default());
        assert_eq!(style.background, Color::WHITE);
        assert_eq!(style.resolve_fill(), Fill::Solid(Color::BLACK));
        assert_eq!(style.marker_shape(), ShapeStyle::Square);
        assert_eq!(style.border_px(), 0);
    }

    #[test]
    fn parses_full_style() {
        let style: RenderStyle = serde_json::from_value(json!({
            "shapeStyle": "rounded",
            "positionMarkerShapeStyle": "dot",
            "gradient": {"kind": "radial", "startColor": "red", "endColor": "#00f"},
            "background": "#00ffbb",
            "border": {"width": 5, "color": "#fff"},
            "logo": {"path": "./logo.png", "maxSize": 128}
        }))
        .unwrap();
        assert_eq!(style.shape_style, ShapeStyle::Rounded);
        assert_eq!(style.marker_shape(), ShapeStyle::Dot);
        assert_eq!(style.border_px(), 5);
        let logo = style.logo.as_ref().unwrap();
        assert_eq!(logo.source, "./logo.png");
        assert_eq!(logo.max_size, Some(128));
        assert_eq!(logo.opacity, 1.0);
        assert_eq!(logo.proportion, LogoStyle::DEFAULT_PROPORTION);
        match style.resolve_fill() {
            Fill::Gradient(g) => {
                assert_eq!(g.kind, GradientKind::Radial);
                assert_eq!(g.angle_degrees, 0.0);
            }
            other => panic!("expected gradient, got {other:?}"),
        }
    }

    #[test]
    fn solid_fill_wins_over_gradient() {
        let style = RenderStyle {
            fill_color: Some(Color::rgb(1, 2, 3)),
            gradient: Some(Gradient {
                kind: GradientKind::Linear,
                start_color: Color::BLACK,
                end_color: Color::WHITE,
                angle_degrees: 45.0,
            }),
            ..RenderStyle::default()
        };
        assert_eq!(style.resolve_fill(), Fill::Solid(Color::rgb(1, 2, 3)));
    }

    #[test]
    fn unknown_shape_is_rejected() {
        assert!(serde_json::from_value::<RenderStyle>(json!({"shapeStyle": "hexagon"})).is_err());
    }

    #[test]
    fn logo_size_respects_proportion_and_cap() {
        let mut logo = LogoStyle::new("logo.png");
        assert_eq!(logo.size_px(210), 42);
        logo.max_size = Some(30);
        assert_eq!(logo.size_px(210), 30);
        logo.proportion = 0.0;
        assert_eq!(logo.size_px(210), 0);
        logo.proportion = 7.0;
        logo.max_size = None;
        assert_eq!(logo.size_px(210), 210);
        logo.opacity = -1.0;
        assert_eq!(logo.clamped_opacity(), 0.0);
    }
}
