use image::RgbaImage;
use qrender::qrcode::{encode, QrCodeEcc, Version};
use qrender::style::{Border, Gradient, GradientKind, LogoStyle};
use qrender::{
    generate_with, Color, Error, LogoLoadError, ModuleMatrix, QrRequest, RenderError, RenderStyle,
    Renderer, ShapeStyle,
};

fn solid_logo(_: &str) -> Result<RgbaImage, LogoLoadError> {
    Ok(RgbaImage::from_pixel(16, 16, image::Rgba([0, 0, 255, 255])))
}

fn hello() -> ModuleMatrix {
    encode("HELLO", Version::new(1), QrCodeEcc::Low).unwrap()
}

#[test]
fn hello_scenario_has_literal_dimensions() {
    let matrix = hello();
    assert_eq!(matrix.size(), 21);
    // round(100 / 21) = 5, 5 * 21 = 105.
    let png = Renderer::new().render(&matrix, 100, &RenderStyle::default()).unwrap();
    assert_eq!((png.width, png.height), (105, 105));
    let decoded = image::load_from_memory(&png.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (105, 105));
}

#[test]
fn border_adds_twice_its_width() {
    let matrix = hello();
    let plain = Renderer::new().rasterize(&matrix, 100, &RenderStyle::default()).unwrap();
    let style = RenderStyle {
        border: Some(Border {
            width: 5,
            color: "#fff".parse().unwrap(),
        }),
        ..RenderStyle::default()
    };
    let bordered = Renderer::new().rasterize(&matrix, 100, &style).unwrap();
    assert_eq!(bordered.width(), plain.width() + 10);
    assert_eq!(bordered.height(), plain.height() + 10);
}

#[test]
fn image_side_follows_rounding_formula() {
    for version in [1u8, 2, 5, 10, 25, 40] {
        let matrix = encode("x", Version::new(version), QrCodeEcc::Medium).unwrap();
        let n = matrix.size() as u32;
        for target in [n, n + 1, 2 * n - 1, 3 * n + n / 2, 500] {
            for border in [0u32, 3] {
                let style = RenderStyle {
                    border: (border > 0).then(|| Border {
                        width: border,
                        color: Color::BLACK,
                    }),
                    ..RenderStyle::default()
                };
                let img = Renderer::new().rasterize(&matrix, target, &style).unwrap();
                let block = (target as f64 / n as f64).round() as u32;
                assert_eq!(img.width(), block * n + 2 * border, "v{version} target {target}");
                assert_eq!(img.width(), img.height());
            }
        }
    }
}

#[test]
fn tiny_target_is_an_invalid_dimension() {
    let err = Renderer::new().rasterize(&hello(), 10, &RenderStyle::default()).unwrap_err();
    assert!(matches!(err, RenderError::InvalidDimension { target_px: 10, modules: 21 }));
}

#[test]
fn modules_are_painted_where_the_matrix_is_dark() {
    let matrix = hello();
    let img = Renderer::new().rasterize(&matrix, 210, &RenderStyle::default()).unwrap();
    for row in 0..matrix.size() {
        for col in 0..matrix.size() {
            let p = img.get_pixel(col as u32 * 10 + 5, row as u32 * 10 + 5).0;
            let expected = if matrix.is_dark(row, col) { 0 } else { 255 };
            assert_eq!(p[0], expected, "module ({row}, {col})");
        }
    }
}

#[test]
fn absent_logo_matches_zero_proportion() {
    let matrix = encode("logo footprint", Version::new(3), QrCodeEcc::High).unwrap();
    let renderer = Renderer::with_logo_loader(solid_logo);
    let without = renderer.rasterize(&matrix, 300, &RenderStyle::default()).unwrap();
    let mut logo = LogoStyle::new("logo.png");
    logo.proportion = 0.0;
    let style = RenderStyle {
        logo: Some(logo),
        ..RenderStyle::default()
    };
    let zero = renderer.rasterize(&matrix, 300, &style).unwrap();
    assert_eq!(without, zero);
}

#[test]
fn logo_covers_the_center_and_respects_max_size() {
    let matrix = encode("logo", Version::new(3), QrCodeEcc::High).unwrap();
    let renderer = Renderer::with_logo_loader(solid_logo);
    let mut logo = LogoStyle::new("logo.png");
    logo.proportion = 0.5;
    logo.max_size = Some(20);
    let style = RenderStyle {
        logo: Some(logo),
        ..RenderStyle::default()
    };
    // 29 modules * 10 px = 290 px; logo is capped at 20 px instead of 145.
    let img = renderer.rasterize(&matrix, 290, &style).unwrap();
    let c = img.get_pixel(145, 145).0;
    assert!(c[2] > 240 && c[0] < 15, "{c:?}");
    let start = (290 - 20) / 2;
    for x in [start - 2, start + 22] {
        let p = img.get_pixel(x, 145).0;
        assert!(p[2] < 255 || p[0] == p[2], "logo leaked to x = {x}: {p:?}");
    }
}

#[test]
fn linear_gradient_zero_angle_is_symmetric_about_center() {
    let center = tiny_skia::Point::from_xy(52.5, 52.5);
    let (start, end) = qrender::gradient::linear_endpoints(center, 52.5, 0.0);
    assert!((center.x - start.x - (end.x - center.x)).abs() < 1e-4);
    assert!((start.y - end.y).abs() < 1e-4);

    let matrix = ModuleMatrix::from_fn(21, |_, _| true);
    let style = RenderStyle {
        gradient: Some(Gradient {
            kind: GradientKind::Linear,
            start_color: "red".parse().unwrap(),
            end_color: "blue".parse().unwrap(),
            angle_degrees: 0.0,
        }),
        ..RenderStyle::default()
    };
    let img = Renderer::new().rasterize(&matrix, 210, &style).unwrap();
    let left = img.get_pixel(20, 100).0;
    let right = img.get_pixel(189, 100).0;
    // Mirror pixels carry mirrored colors.
    assert!(left[0].abs_diff(right[2]) <= 2, "{left:?} {right:?}");
    assert!(left[2].abs_diff(right[0]) <= 2, "{left:?} {right:?}");
}

#[test]
fn marker_shape_only_touches_marker_regions() {
    let matrix = encode("markers", Version::new(2), QrCodeEcc::Quartile).unwrap();
    let base = RenderStyle {
        shape_style: ShapeStyle::Square,
        ..RenderStyle::default()
    };
    let dotted_markers = RenderStyle {
        position_marker_shape_style: Some(ShapeStyle::Dot),
        ..base.clone()
    };
    let a = Renderer::new().rasterize(&matrix, 250, &base).unwrap();
    let b = Renderer::new().rasterize(&matrix, 250, &dotted_markers).unwrap();
    let block = 10u32;
    let mut differs_in_marker = false;
    for (x, y, pa) in a.enumerate_pixels() {
        let row = (y / block) as usize;
        let col = (x / block) as usize;
        if pa != b.get_pixel(x, y) {
            assert!(matrix.is_position_marker(row, col), "body pixel ({x}, {y}) changed");
            differs_in_marker = true;
        }
    }
    assert!(differs_in_marker);
}

#[test]
fn concurrent_renders_are_independent() {
    let matrix = hello();
    let style = RenderStyle {
        shape_style: ShapeStyle::Rounded,
        ..RenderStyle::default()
    };
    let expected = Renderer::new().render(&matrix, 200, &style).unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| Renderer::new().render(&matrix, 200, &style).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

#[test]
fn pipeline_reports_typed_errors() {
    let renderer = Renderer::with_logo_loader(solid_logo);

    let err = generate_with(&QrRequest::new(""), &renderer).unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));

    let mut too_long = QrRequest::new("this payload does not fit version one at level H");
    too_long.type_number = 1;
    let err = generate_with(&too_long, &renderer).unwrap_err();
    assert!(matches!(err, Error::Encoding(_)));
    assert!(err.is_client_error());

    let mut missing_logo = QrRequest::new("ok");
    missing_logo.style.logo = Some(LogoStyle::new("nope.png"));
    let failing = Renderer::with_logo_loader(|r: &str| -> Result<RgbaImage, LogoLoadError> {
        Err(LogoLoadError::Unavailable(r.to_owned()))
    });
    let err = generate_with(&missing_logo, &failing).unwrap_err();
    assert!(matches!(err, Error::Render(RenderError::LogoLoad(_))));
    assert!(!err.is_client_error());
}

#[test]
fn styled_request_from_json_renders() {
    let request: QrRequest = serde_json::from_value(serde_json::json!({
        "payload": "https://example.com",
        "size": 256,
        "typeNumber": 4,
        "errorCorrectionLevel": "H",
        "style": {
            "shapeStyle": "rounded",
            "positionMarkerShapeStyle": "square",
            "fillColor": "#156d1c",
            "background": "#00ffbb",
            "border": {"width": 5, "color": "#fff"},
            "logo": {"path": "./logo.png", "maxSize": 128}
        }
    }))
    .unwrap();
    let png = generate_with(&request, &Renderer::with_logo_loader(solid_logo)).unwrap();
    // 33 modules, round(256 / 33) = 8, 8 * 33 + 10 = 274.
    assert_eq!((png.width, png.height), (274, 274));
    let decoded = image::load_from_memory(&png.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 255, 0xbb, 255]);
}
