//! Logo acquisition and compositing.
//!
//! Decoding is delegated to a [`LogoLoader`]; the renderer only ever sees straight-alpha RGBA
//! pixels. Loading is a blocking call made once per render, and its failure fails the render.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tiny_skia::{BlendMode, FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

use crate::error::LogoLoadError;
use crate::style::LogoStyle;

/// Resolves a logo reference into decoded pixels.
pub trait LogoLoader {
    fn load(&self, reference: &str) -> Result<RgbaImage, LogoLoadError>;
}

impl<F> LogoLoader for F
where
    F: Fn(&str) -> Result<RgbaImage, LogoLoadError>,
{
    fn load(&self, reference: &str) -> Result<RgbaImage, LogoLoadError> {
        self(reference)
    }
}

/// Loads logos from disk, relative to an optional root directory.
#[derive(Clone, Debug, Default)]
pub struct FileLogoLoader {
    root: Option<PathBuf>,
}

impl FileLogoLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative references against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl LogoLoader for FileLogoLoader {
    fn load(&self, reference: &str) -> Result<RgbaImage, LogoLoadError> {
        let path = self.resolve(reference);
        let img = image::open(&path).map_err(|error| LogoLoadError::Image {
            reference: reference.to_owned(),
            error,
        })?;
        Ok(img.to_rgba8())
    }
}

/// Scales `logo` to fit a `size_px` square, preserving its aspect ratio.
///
/// Returns `None` when nothing would be visible.
pub(crate) fn fit(logo: &RgbaImage, size_px: u32) -> Option<RgbaImage> {
    let (w, h) = logo.dimensions();
    if size_px == 0 || w == 0 || h == 0 {
        return None;
    }
    let longest = w.max(h) as f32;
    let scale = size_px as f32 / longest;
    let nw = ((w as f32 * scale).round() as u32).max(1);
    let nh = ((h as f32 * scale).round() as u32).max(1);
    if (nw, nh) == (w, h) {
        return Some(logo.clone());
    }
    Some(imageops::resize(logo, nw, nh, FilterType::Lanczos3))
}

/// Scales `logo` into a `size_px` square and composites it onto the center of `canvas`.
pub(crate) fn composite(
    canvas: &mut Pixmap,
    logo: &RgbaImage,
    style: &LogoStyle,
    size_px: u32,
    reference: &str,
) -> Result<(), LogoLoadError> {
    if logo.width() == 0 || logo.height() == 0 {
        return Err(LogoLoadError::Empty(reference.to_owned()));
    }
    let Some(scaled) = fit(logo, size_px) else {
        return Ok(());
    };
    let (w, h) = scaled.dimensions();
    let pixmap = to_pixmap(scaled).ok_or_else(|| LogoLoadError::Empty(reference.to_owned()))?;

    let x = (canvas.width() as i32 - w as i32) / 2;
    let y = (canvas.height() as i32 - h as i32) / 2;
    tracing::debug!(size_px, x, y, w, h, "compositing logo");
    let paint = PixmapPaint {
        opacity: style.clamped_opacity(),
        blend_mode: BlendMode::SourceOver,
        quality: FilterQuality::Nearest,
    };
    canvas.draw_pixmap(x, y, pixmap.as_ref(), &paint, Transform::identity(), None);
    Ok(())
}

fn to_pixmap(img: RgbaImage) -> Option<Pixmap> {
    let (w, h) = img.dimensions();
    let mut data = img.into_raw();
    premultiply_rgba8_in_place(&mut data);
    Pixmap::from_vec(data, IntSize::from_wh(w, h)?)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_preserves_aspect_ratio() {
        let wide = RgbaImage::from_pixel(40, 20, image::Rgba([0, 0, 0, 255]));
        let scaled = fit(&wide, 10).unwrap();
        assert_eq!(scaled.dimensions(), (10, 5));
        let tall = RgbaImage::from_pixel(3, 30, image::Rgba([0, 0, 0, 255]));
        assert_eq!(fit(&tall, 60).unwrap().dimensions(), (6, 60));
    }

    #[test]
    fn fit_of_zero_size_is_nothing() {
        let img = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
        assert!(fit(&img, 0).is_none());
    }

    #[test]
    fn premultiply_matches_rounding() {
        let mut px = vec![100u8, 50, 200, 128, 9, 9, 9, 0];
        premultiply_rgba8_in_place(&mut px);
        assert_eq!(
            px,
            vec![
                ((100u16 * 128 + 127) / 255) as u8,
                ((50u16 * 128 + 127) / 255) as u8,
                ((200u16 * 128 + 127) / 255) as u8,
                128,
                0,
                0,
                0,
                0
            ]
        );
    }

    #[test]
    fn file_loader_resolves_relative_paths_under_root() {
        let loader = FileLogoLoader::with_root("/srv/assets");
        assert_eq!(loader.resolve("logo.png"), PathBuf::from("/srv/assets/logo.png"));
        assert_eq!(loader.resolve("/abs/logo.png"), PathBuf::from("/abs/logo.png"));
        assert_eq!(FileLogoLoader::new().resolve("x.png"), PathBuf::from("x.png"));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let missing = "/definitely/not/here/logo.png";
        let err = FileLogoLoader::new().load(missing).unwrap_err();
        assert!(matches!(
            err,
            LogoLoadError::Image { ref reference, .. } if reference == missing
        ));
    }

    #[test]
    fn composite_centers_logo() {
        let mut canvas = Pixmap::new(20, 20).unwrap();
        canvas.fill(tiny_skia::Color::WHITE);
        let logo = RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]));
        let style = LogoStyle::new("red");
        composite(&mut canvas, &logo, &style, 4, "red").unwrap();
        let red = canvas.pixel(10, 10).unwrap().demultiply();
        assert_eq!((red.red(), red.green(), red.blue()), (255, 0, 0));
        let white = canvas.pixel(2, 2).unwrap().demultiply();
        assert_eq!((white.red(), white.green(), white.blue()), (255, 255, 255));
    }
}
