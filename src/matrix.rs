/// Square grid of dark and light modules.
///
/// This is the contract between the encoder and the renderer: the renderer never looks at encoding
/// internals, only at this grid. Instances are immutable after creation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleMatrix {
    size: usize,
    /// Row-major, `true` = dark.
    modules: Vec<bool>,
}

/// Side length of each finder ("position marker") region, in modules.
pub const POSITION_MARKER_SPAN: usize = 7;

impl ModuleMatrix {
    /// Builds a `size` x `size` matrix by evaluating `f(row, col)` for every cell.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        assert!(size > 0, "Matrix must have at least one module");
        let mut modules = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                modules.push(f(row, col));
            }
        }
        Self { size, modules }
    }

    /// Builds a matrix from explicit rows.
    ///
    /// Returns `None` if `rows` is empty or not square.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Option<Self> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|r| r.as_ref().len() != size) {
            return None;
        }
        Some(Self::from_fn(size, |row, col| rows[row].as_ref()[col]))
    }

    /// Number of modules along one side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the module at (`row`, `col`) is dark. Out-of-range cells are light.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.modules[row * self.size + col]
    }

    /// Looks up the neighbor at a signed offset. Cells beyond the matrix edge count as light.
    pub fn is_dark_offset(&self, row: usize, col: usize, d_row: isize, d_col: isize) -> bool {
        match (row.checked_add_signed(d_row), col.checked_add_signed(d_col)) {
            (Some(r), Some(c)) => self.is_dark(r, c),
            _ => false,
        }
    }

    /// Whether (`row`, `col`) belongs to one of the three corner position-marker regions.
    ///
    /// A cell qualifies when both its row and column lie within the first or last
    /// [`POSITION_MARKER_SPAN`] indices, except in the bottom-right corner, which never holds a
    /// marker. On matrices smaller than twice the span the windows overlap and the bottom-right
    /// exclusion wins.
    pub fn is_position_marker(&self, row: usize, col: usize) -> bool {
        let n = self.size;
        let near_start = |i: usize| i < POSITION_MARKER_SPAN;
        let near_end = |i: usize| i + POSITION_MARKER_SPAN >= n;
        if near_end(row) && near_end(col) {
            return false;
        }
        (near_start(row) || near_end(row)) && (near_start(col) || near_end(col))
    }

    /// Iterates the coordinates of all dark modules in row-major order.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, &dark)| dark)
            .map(move |(i, _)| (i / self.size, i % self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(size: usize) -> ModuleMatrix {
        ModuleMatrix::from_fn(size, |_, _| false)
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        assert!(ModuleMatrix::from_rows::<Vec<bool>>(&[]).is_none());
        assert!(ModuleMatrix::from_rows(&[vec![true, false], vec![true]]).is_none());
        let m = ModuleMatrix::from_rows(&[[true, false], [false, true]]).unwrap();
        assert_eq!(m.size(), 2);
        assert!(m.is_dark(0, 0));
        assert!(!m.is_dark(0, 1));
        assert!(m.is_dark(1, 1));
    }

    #[test]
    fn off_grid_neighbors_are_light() {
        let m = ModuleMatrix::from_fn(3, |_, _| true);
        assert!(!m.is_dark_offset(0, 0, -1, 0));
        assert!(!m.is_dark_offset(0, 0, 0, -1));
        assert!(!m.is_dark_offset(2, 2, 1, 0));
        assert!(!m.is_dark_offset(2, 2, 0, 1));
        assert!(m.is_dark_offset(1, 1, -1, 1));
    }

    #[test]
    fn position_markers_are_symmetric_in_three_corners() {
        for n in [14usize, 21, 25, 57, 177] {
            let m = blank(n);
            for r in 0..POSITION_MARKER_SPAN {
                for c in 0..POSITION_MARKER_SPAN {
                    assert!(m.is_position_marker(r, c), "top-left {n} ({r},{c})");
                    assert!(m.is_position_marker(r, n - 1 - c), "top-right {n} ({r},{c})");
                    assert!(m.is_position_marker(n - 1 - r, c), "bottom-left {n} ({r},{c})");
                    assert!(
                        !m.is_position_marker(n - 1 - r, n - 1 - c),
                        "bottom-right {n} ({r},{c})"
                    );
                }
            }
        }
    }

    #[test]
    fn marker_band_is_exactly_seven_wide() {
        let m = blank(21);
        assert!(m.is_position_marker(6, 6));
        assert!(!m.is_position_marker(7, 0));
        assert!(!m.is_position_marker(0, 7));
        assert!(m.is_position_marker(0, 14));
        assert!(!m.is_position_marker(0, 13));
        assert!(m.is_position_marker(14, 0));
        assert!(!m.is_position_marker(10, 10));
    }

    #[test]
    fn bottom_right_exclusion_wins_on_small_matrices() {
        let m = blank(8);
        // (3, 3) is inside every window on an 8x8 grid.
        assert!(!m.is_position_marker(3, 3));
        assert!(m.is_position_marker(0, 0));
    }

    #[test]
    fn dark_modules_are_row_major() {
        let m = ModuleMatrix::from_rows(&[[false, true], [true, true]]).unwrap();
        let cells: Vec<_> = m.dark_modules().collect();
        assert_eq!(cells, vec![(0, 1), (1, 0), (1, 1)]);
    }
}
