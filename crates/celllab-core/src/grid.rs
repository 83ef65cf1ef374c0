//! Dense N-dimensional cell state grids.
//!
//! A [`Grid`] is a fixed-shape buffer of `f32` cell values in row-major
//! order. The simulation engine double-buffers two same-shaped grids and
//! swaps them after every transition step; the work splitter carves the
//! write-target grid into disjoint [`RowBand`]s so worker threads can fill
//! their row ranges without any synchronization.

use rand::Rng;

use crate::error::{GridError, GridResult};

/// Dense N-dimensional `f32` grid with row-major layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Dimension sizes, outermost first.
    shape: Vec<usize>,
    /// Row-major index multipliers, derived from `shape`.
    strides: Vec<usize>,
    /// Flat backing store of `shape.iter().product()` cells.
    data: Vec<f32>,
}

fn compute_strides(shape: &[usize]) -> (Vec<usize>, usize) {
    let mut strides = vec![0; shape.len()];
    let mut multiplier = 1;
    for (i, &dim) in shape.iter().enumerate().rev() {
        strides[i] = multiplier;
        multiplier *= dim;
    }
    (strides, multiplier)
}

impl Grid {
    /// Creates a zero-filled grid with the given shape.
    pub fn new(shape: &[usize]) -> GridResult<Self> {
        if shape.is_empty() || shape.iter().any(|&dim| dim == 0) {
            return Err(GridError::InvalidShape(shape.to_vec()));
        }

        let (strides, len) = compute_strides(shape);
        Ok(Self {
            shape: shape.to_vec(),
            strides,
            data: vec![0.0; len],
        })
    }

    /// Creates a zero-filled grid with the same shape as `self`.
    pub fn like(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            data: vec![0.0; self.data.len()],
        }
    }

    /// Number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.shape.len()
    }

    /// Dimension sizes, outermost first.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Size of one dimension.
    pub fn shape_at(&self, dim: usize) -> usize {
        self.shape[dim]
    }

    /// Total cell count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: grids have at least one cell by construction.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of rows along the outermost axis.
    pub fn rows(&self) -> usize {
        self.shape[0]
    }

    /// Cells per outermost-axis row.
    pub fn row_len(&self) -> usize {
        self.strides[0]
    }

    /// Whether `other` has the same shape.
    pub fn is_same_shape(&self, other: &Grid) -> bool {
        self.shape == other.shape
    }

    /// Reinterprets the backing buffer under a new shape.
    ///
    /// The buffer is not reordered; only the shape and strides change.
    pub fn reshape(&mut self, new_shape: &[usize]) -> GridResult<()> {
        if new_shape.is_empty() || new_shape.iter().any(|&dim| dim == 0) {
            return Err(GridError::InvalidShape(new_shape.to_vec()));
        }

        let (strides, len) = compute_strides(new_shape);
        if len != self.data.len() {
            return Err(GridError::ShapeMismatch {
                from: self.shape.clone(),
                to: new_shape.to_vec(),
            });
        }

        self.shape = new_shape.to_vec();
        self.strides = strides;
        Ok(())
    }

    fn flatten_index(&self, indices: &[usize]) -> GridResult<usize> {
        if indices.len() != self.shape.len() {
            return Err(GridError::RankMismatch {
                expected: self.shape.len(),
                actual: indices.len(),
            });
        }

        let mut flat = 0;
        for (dim, (&idx, &size)) in indices.iter().zip(&self.shape).enumerate() {
            if idx >= size {
                return Err(GridError::IndexOutOfBounds {
                    index: idx,
                    dim,
                    size,
                });
            }
            flat += idx * self.strides[dim];
        }
        Ok(flat)
    }

    /// Whether the index vector addresses a cell of this grid.
    pub fn are_indices_valid(&self, indices: &[usize]) -> bool {
        self.flatten_index(indices).is_ok()
    }

    /// Reads one cell.
    pub fn get(&self, indices: &[usize]) -> GridResult<f32> {
        Ok(self.data[self.flatten_index(indices)?])
    }

    /// Writes one cell.
    pub fn set(&mut self, value: f32, indices: &[usize]) -> GridResult<()> {
        let flat = self.flatten_index(indices)?;
        self.data[flat] = value;
        Ok(())
    }

    /// Read-only view of the flat backing buffer (row-major).
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Zeroes every cell.
    pub fn clear(&mut self) {
        self.fill(0.0);
    }

    /// Overwrites every cell from the generator, in row-major order.
    pub fn fill_with(&mut self, mut next: impl FnMut() -> f32) {
        for cell in &mut self.data {
            *cell = next();
        }
    }

    /// Overwrites every cell with a random integer in `[low, high)`.
    pub fn fill_random_int(&mut self, low: i32, high: i32) {
        let mut rng = rand::thread_rng();
        self.fill_with(|| rng.gen_range(low..high) as f32);
    }

    /// Overwrites every cell with a random float in `[low, high)`.
    pub fn fill_random_float(&mut self, low: f32, high: f32) {
        let mut rng = rand::thread_rng();
        self.fill_with(|| rng.gen_range(low..high));
    }

    /// Mean cell value.
    pub fn average(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f32>() / self.data.len() as f32
    }

    /// Mutable band covering the entire row range.
    pub fn full_band_mut(&mut self) -> RowBand<'_> {
        let rows = self.rows();
        let row_len = self.row_len();
        RowBand {
            data: &mut self.data,
            row_start: 0,
            row_end: rows,
            row_len,
        }
    }

    /// Splits the grid into disjoint mutable row bands.
    ///
    /// `band_starts` lists the first row of each band, strictly increasing,
    /// beginning with 0; each band ends where the next begins and the last
    /// band runs to the final row.
    pub fn split_rows_mut(&mut self, band_starts: &[usize]) -> Vec<RowBand<'_>> {
        debug_assert_eq!(band_starts.first(), Some(&0));

        let total_rows = self.rows();
        let row_len = self.row_len();
        let mut bands = Vec::with_capacity(band_starts.len());
        let mut rest: &mut [f32] = &mut self.data;

        for (i, &row_start) in band_starts.iter().enumerate() {
            let row_end = band_starts.get(i + 1).copied().unwrap_or(total_rows);
            debug_assert!(row_start < row_end && row_end <= total_rows);

            let (band, tail) = rest.split_at_mut((row_end - row_start) * row_len);
            rest = tail;
            bands.push(RowBand {
                data: band,
                row_start,
                row_end,
                row_len,
            });
        }

        bands
    }
}

/// Mutable view of a contiguous row range of a [`Grid`].
///
/// Bands produced by [`Grid::split_rows_mut`] are disjoint, which is what
/// makes parallel row-range computation safe without cross-worker locking.
/// Rows are addressed by their global (whole-grid) row index.
#[derive(Debug)]
pub struct RowBand<'a> {
    data: &'a mut [f32],
    row_start: usize,
    row_end: usize,
    row_len: usize,
}

impl RowBand<'_> {
    /// First row covered by this band.
    pub fn row_start(&self) -> usize {
        self.row_start
    }

    /// One past the last row covered by this band.
    pub fn row_end(&self) -> usize {
        self.row_end
    }

    /// Writes one cell. `col` is the flattened offset within the row
    /// (the column index for 2D grids).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        debug_assert!(row >= self.row_start && row < self.row_end);
        debug_assert!(col < self.row_len);
        self.data[(row - self.row_start) * self.row_len + col] = value;
    }

    /// Overwrites every cell of the band with `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }
}

/// Enumerates the 8-connected Moore neighborhood of `(row, col)` into a
/// caller-supplied buffer and returns the neighbor count.
///
/// With `wrap`, out-of-bounds coordinates reduce modulo the respective
/// dimension and the count is always 8; without it, out-of-bounds neighbors
/// are omitted (3 at a corner, 5 on an edge). This is a hot path: the
/// output buffer is reused across calls so no allocation happens here.
pub fn neighbor_indices_2d(
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
    wrap: bool,
    out: &mut [[usize; 2]; 8],
) -> usize {
    let mut count = 0;

    for dr in -1i64..2 {
        for dc in -1i64..2 {
            if dr == 0 && dc == 0 {
                continue;
            }

            let mut r = row as i64 + dr;
            let mut c = col as i64 + dc;

            if r < 0 || c < 0 || r >= rows as i64 || c >= cols as i64 {
                if wrap {
                    r = (r + rows as i64) % rows as i64;
                    c = (c + cols as i64) % cols as i64;
                } else {
                    continue;
                }
            }

            out[count] = [r as usize, c as usize];
            count += 1;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(&[4, 3]).unwrap();
        assert_eq!(grid.dimensions(), 2);
        assert_eq!(grid.shape(), &[4, 3]);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.row_len(), 3);
        assert!(grid.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_invalid_shape() {
        assert!(matches!(Grid::new(&[]), Err(GridError::InvalidShape(_))));
        assert!(matches!(
            Grid::new(&[3, 0]),
            Err(GridError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_get_set() {
        let mut grid = Grid::new(&[4, 3]).unwrap();
        grid.set(5.0, &[1, 2]).unwrap();
        assert_eq!(grid.get(&[1, 2]).unwrap(), 5.0);
        assert_eq!(grid.get(&[0, 0]).unwrap(), 0.0);

        // Row-major: (1, 2) is flat index 1*3 + 2 = 5.
        assert_eq!(grid.as_slice()[5], 5.0);
    }

    #[test]
    fn test_index_validation() {
        let grid = Grid::new(&[4, 3]).unwrap();

        assert!(grid.are_indices_valid(&[3, 2]));
        assert!(!grid.are_indices_valid(&[4, 0]));
        assert!(!grid.are_indices_valid(&[0]));

        assert!(matches!(
            grid.get(&[0, 3]),
            Err(GridError::IndexOutOfBounds {
                index: 3,
                dim: 1,
                size: 3,
            })
        ));
        assert!(matches!(
            grid.get(&[0, 1, 2]),
            Err(GridError::RankMismatch {
                expected: 2,
                actual: 3,
            })
        ));
    }

    #[test]
    fn test_reshape_preserves_buffer() {
        let mut grid = Grid::new(&[4, 3]).unwrap();
        grid.set(5.0, &[1, 2]).unwrap();

        grid.reshape(&[12]).unwrap();
        assert_eq!(grid.get(&[5]).unwrap(), 5.0);

        grid.reshape(&[2, 6]).unwrap();
        assert_eq!(grid.get(&[0, 5]).unwrap(), 5.0);
    }

    #[test]
    fn test_reshape_count_mismatch() {
        let mut grid = Grid::new(&[4, 3]).unwrap();
        assert!(matches!(
            grid.reshape(&[5, 5]),
            Err(GridError::ShapeMismatch { .. })
        ));
        // Failed reshape leaves the grid untouched.
        assert_eq!(grid.shape(), &[4, 3]);
    }

    #[test]
    fn test_fill_random_int_range() {
        let mut grid = Grid::new(&[20, 20]).unwrap();
        grid.fill_random_int(0, 3);
        assert!(grid
            .as_slice()
            .iter()
            .all(|&v| v == 0.0 || v == 1.0 || v == 2.0));
    }

    #[test]
    fn test_average() {
        let mut grid = Grid::new(&[2, 2]).unwrap();
        grid.fill(2.0);
        grid.set(6.0, &[0, 0]).unwrap();
        assert_eq!(grid.average(), 3.0);
    }

    #[test]
    fn test_structural_equality() {
        let mut a = Grid::new(&[3, 3]).unwrap();
        let mut b = Grid::new(&[3, 3]).unwrap();
        assert_eq!(a, b);

        a.set(1.0, &[1, 1]).unwrap();
        assert_ne!(a, b);

        b.set(1.0, &[1, 1]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_rows_disjoint_cover() {
        let mut grid = Grid::new(&[10, 4]).unwrap();
        let mut bands = grid.split_rows_mut(&[0, 3, 6]);
        assert_eq!(bands.len(), 3);
        assert_eq!((bands[0].row_start(), bands[0].row_end()), (0, 3));
        assert_eq!((bands[2].row_start(), bands[2].row_end()), (6, 10));

        for band in &mut bands {
            let start = band.row_start();
            for row in start..band.row_end() {
                band.set(row, 0, (row + 1) as f32);
            }
        }
        drop(bands);

        for row in 0..10 {
            assert_eq!(grid.get(&[row, 0]).unwrap(), (row + 1) as f32);
        }
    }

    #[test]
    fn test_neighbors_wrap_always_eight() {
        let mut out = [[0usize; 2]; 8];
        for &(r, c) in &[(0, 0), (0, 2), (4, 4), (2, 2), (4, 0)] {
            assert_eq!(neighbor_indices_2d(5, 5, r, c, true, &mut out), 8);
        }

        // Corner (0, 0) wraps to the opposite edges.
        neighbor_indices_2d(5, 5, 0, 0, true, &mut out);
        assert!(out[..8].contains(&[4, 4]));
        assert!(out[..8].contains(&[4, 0]));
        assert!(out[..8].contains(&[0, 4]));
    }

    #[test]
    fn test_neighbors_clamped_at_edges() {
        let mut out = [[0usize; 2]; 8];
        // Corner cells have 3 in-bounds neighbors, edge cells 5.
        assert_eq!(neighbor_indices_2d(5, 5, 0, 0, false, &mut out), 3);
        assert_eq!(neighbor_indices_2d(5, 5, 4, 4, false, &mut out), 3);
        assert_eq!(neighbor_indices_2d(5, 5, 0, 2, false, &mut out), 5);
        assert_eq!(neighbor_indices_2d(5, 5, 2, 2, false, &mut out), 8);
    }
}
