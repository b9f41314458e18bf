use std::fs;
use std::io;
use std::path::Path;

use crate::matrix::ModuleMatrix;
use crate::render::EncodedImage;

/*---- Utilities ----*/

// Returns a string of SVG code for an image depicting
// the given matrix, with the given number of border modules.
// The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(matrix: &ModuleMatrix, border: usize) -> String {
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" ";
    result += "\"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    let dimension = matrix.size() + border * 2;
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
         viewBox=\"0 0 {dimension} {dimension}\" stroke=\"none\">\n"
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    result += "\t<path d=\"";
    let mut first = true;
    for (row, col) in matrix.dark_modules() {
        if !first {
            result += " ";
        }
        first = false;
        result += &format!("M{},{}h1v1h-1z", col + border, row + border);
    }
    result += "\" fill=\"#000000\"/>\n";
    result += "</svg>\n";
    result
}

/// Renders the matrix as text, two characters per module, with `border` light modules around it.
pub fn to_text(matrix: &ModuleMatrix, border: usize) -> String {
    let side = matrix.size() + border * 2;
    let mut out = String::with_capacity(side * (side * 2 * 3 + 1));
    for y in 0..side {
        for x in 0..side {
            let dark = y >= border
                && x >= border
                && matrix.is_dark(y - border, x - border);
            out.push_str(if dark { "██" } else { "  " });
        }
        out.push('\n');
    }
    out
}

/// Prints the given matrix to the console.
pub fn print_matrix(matrix: &ModuleMatrix) {
    println!("{}", to_text(matrix, 4));
}

/// Writes an encoded image to `path`, creating parent directories as needed.
///
/// # Example
///
/// ```no_run
/// use qrender::{generate, helper::save_image, QrRequest};
///
/// let png = generate(&QrRequest::new("Hello, World!")).unwrap();
/// save_image(&png, "generated/qr_code.png").unwrap();
/// ```
pub fn save_image(image: &EncodedImage, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        // Check if the directory exists, create it if it doesn't
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, &image.bytes)
}
