use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use qrender::{helper, qrcode, FileLogoLoader, Limits, QrCodeEcc, QrRequest, RenderStyle, Renderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "qrender", version, about = "Render a styled QR code")]
struct Cli {
    /// Text payload to encode.
    #[arg(long)]
    data: String,

    /// Output path (PNG, or SVG with --svg).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Requested image side length in pixels.
    #[arg(long, default_value_t = QrRequest::DEFAULT_SIZE)]
    size: u32,

    /// QR version (type number), 1-40.
    #[arg(long, default_value_t = QrRequest::DEFAULT_TYPE_NUMBER)]
    type_number: u8,

    /// Error correction level: L, M, Q or H.
    #[arg(long, default_value = "H")]
    ecl: QrCodeEcc,

    /// Style JSON file. Logo paths resolve relative to its directory.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Largest accepted --size.
    #[arg(long, default_value_t = Limits::default().max_size)]
    max_size: u32,

    /// Write an SVG preview instead of a PNG.
    #[arg(long)]
    svg: bool,

    /// Print the symbol to the terminal.
    #[arg(long)]
    print: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (style, assets_root) = match &cli.style {
        Some(path) => (
            read_style_json(path)?,
            path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
        ),
        None => (RenderStyle::default(), PathBuf::from(".")),
    };

    let mut request = QrRequest {
        payload: cli.data,
        size: cli.size,
        type_number: cli.type_number,
        error_correction_level: cli.ecl,
        style,
    };
    request.clamp(&Limits {
        max_size: cli.max_size,
        ..Limits::default()
    });
    request.validate()?;

    if cli.print || cli.svg {
        let matrix = qrcode::encode(
            &request.payload,
            request.version()?,
            request.error_correction_level,
        )?;
        if cli.print {
            helper::print_matrix(&matrix);
        }
        if cli.svg {
            let out = cli.out.as_deref().unwrap_or(Path::new("qr.svg"));
            fs::write(out, helper::to_svg_string(&matrix, 4))
                .with_context(|| format!("write svg '{}'", out.display()))?;
            println!("wrote {}", out.display());
            return Ok(());
        }
    }

    let renderer = Renderer::with_logo_loader(FileLogoLoader::with_root(assets_root));
    let png = qrender::generate_with(&request, &renderer)?;
    let out = cli.out.unwrap_or_else(|| PathBuf::from("qr.png"));
    helper::save_image(&png, &out).with_context(|| format!("write png '{}'", out.display()))?;
    println!("wrote {} ({}x{})", out.display(), png.width, png.height);
    Ok(())
}

fn read_style_json(path: &Path) -> anyhow::Result<RenderStyle> {
    let f = File::open(path).with_context(|| format!("open style '{}'", path.display()))?;
    let r = BufReader::new(f);
    let style: RenderStyle = serde_json::from_reader(r).with_context(|| "parse style JSON")?;
    Ok(style)
}
