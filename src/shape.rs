use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Transform};

use crate::matrix::ModuleMatrix;
use crate::style::ShapeStyle;

/// Cubic control-point factor approximating a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Per-corner radii of a rounded module.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    /// Radii for the module at (`row`, `col`).
    ///
    /// A corner keeps `radius` only when both orthogonal neighbors on its sides are light or off
    /// the grid; otherwise it is square so touching modules join without a notch.
    pub fn for_module(matrix: &ModuleMatrix, row: usize, col: usize, radius: f32) -> Self {
        let up = matrix.is_dark_offset(row, col, -1, 0);
        let down = matrix.is_dark_offset(row, col, 1, 0);
        let left = matrix.is_dark_offset(row, col, 0, -1);
        let right = matrix.is_dark_offset(row, col, 0, 1);
        let pick = |a: bool, b: bool| if a || b { 0.0 } else { radius };
        Self {
            top_left: pick(up, left),
            top_right: pick(up, right),
            bottom_right: pick(down, right),
            bottom_left: pick(down, left),
        }
    }
}

/// A `block_px` square cell in canvas coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cell {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Paints the dark module at (`row`, `col`) into `cell` with `shape`.
pub(crate) fn draw_module(
    pixmap: &mut Pixmap,
    paint: &Paint<'_>,
    shape: ShapeStyle,
    matrix: &ModuleMatrix,
    row: usize,
    col: usize,
    cell: Cell,
) {
    let path = match shape {
        ShapeStyle::Square => {
            if let Some(rect) = Rect::from_xywh(cell.x, cell.y, cell.size, cell.size) {
                pixmap.fill_rect(rect, paint, Transform::identity(), None);
            }
            return;
        }
        ShapeStyle::Dot => {
            let half = cell.size / 2.0;
            PathBuilder::from_circle(cell.x + half, cell.y + half, half)
        }
        ShapeStyle::Rounded => {
            let radii = CornerRadii::for_module(matrix, row, col, cell.size / 2.0);
            rounded_rect(cell, radii)
        }
    };
    if let Some(path) = path {
        pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Outline of `cell` with independently rounded corners.
fn rounded_rect(cell: Cell, radii: CornerRadii) -> Option<Path> {
    let (l, t) = (cell.x, cell.y);
    let (r, b) = (cell.x + cell.size, cell.y + cell.size);
    let mut pb = PathBuilder::new();

    pb.move_to(l + radii.top_left, t);
    pb.line_to(r - radii.top_right, t);
    corner_to(&mut pb, (r - radii.top_right, t), (r, t), (r, t + radii.top_right), radii.top_right);
    pb.line_to(r, b - radii.bottom_right);
    corner_to(
        &mut pb,
        (r, b - radii.bottom_right),
        (r, b),
        (r - radii.bottom_right, b),
        radii.bottom_right,
    );
    pb.line_to(l + radii.bottom_left, b);
    corner_to(
        &mut pb,
        (l + radii.bottom_left, b),
        (l, b),
        (l, b - radii.bottom_left),
        radii.bottom_left,
    );
    pb.line_to(l, t + radii.top_left);
    corner_to(&mut pb, (l, t + radii.top_left), (l, t), (l + radii.top_left, t), radii.top_left);
    pb.close();
    pb.finish()
}

/// Continues from `from` around `corner` to `to`, as a quarter arc or a sharp corner.
fn corner_to(
    pb: &mut PathBuilder,
    from: (f32, f32),
    corner: (f32, f32),
    to: (f32, f32),
    radius: f32,
) {
    if radius <= 0.0 {
        pb.line_to(corner.0, corner.1);
        return;
    }
    pb.cubic_to(
        from.0 + (corner.0 - from.0) * KAPPA,
        from.1 + (corner.1 - from.1) * KAPPA,
        to.0 + (corner.0 - to.0) * KAPPA,
        to.1 + (corner.1 - to.1) * KAPPA,
        to.0,
        to.1,
    );
}
