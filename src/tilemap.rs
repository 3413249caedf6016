use crate::error::{LevelError, Result};

/// A row-major 2D grid. Row 0 is the top edge of the map.
///
/// Unlike a world map this does not wrap: cells outside `[0, height) x [0, width)`
/// simply do not exist, and callers decide how to treat them.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(height: usize, width: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a tilemap by evaluating `f(row, col)` for every cell.
    pub fn from_fn(height: usize, width: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self { width, height, data }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    /// Panics when out of bounds; use [`Tilemap::try_get`] for caller-supplied indices.
    pub fn get(&self, row: usize, col: usize) -> &T {
        debug_assert!(self.in_bounds(row, col), "({row}, {col}) outside {}x{}", self.height, self.width);
        &self.data[self.index(row, col)]
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        let idx = self.index(row, col);
        &mut self.data[idx]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    /// Bounds-checked read.
    pub fn try_get(&self, row: usize, col: usize) -> Result<&T> {
        if !self.in_bounds(row, col) {
            return Err(self.out_of_bounds(row, col));
        }
        Ok(self.get(row, col))
    }

    /// Bounds-checked write.
    pub fn try_set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if !self.in_bounds(row, col) {
            return Err(self.out_of_bounds(row, col));
        }
        self.set(row, col, value);
        Ok(())
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> LevelError {
        LevelError::OutOfBounds {
            row,
            col,
            height: self.height,
            width: self.width,
        }
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Change the dimensions in place. Rows and columns are truncated from the
    /// trailing end; new cells are `fill`.
    pub fn resize(&mut self, height: usize, width: usize, fill: T) {
        if width != self.width {
            let mut data = Vec::with_capacity(self.height * width);
            for row in 0..self.height {
                let start = row * self.width;
                let keep = self.width.min(width);
                data.extend_from_slice(&self.data[start..start + keep]);
                data.extend(std::iter::repeat(fill.clone()).take(width - keep));
            }
            self.data = data;
            self.width = width;
        }

        self.data.resize(height * width, fill);
        self.height = height;
    }

    /// Orthogonal neighbours that lie inside the map (up, down, left, right).
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
        let (height, width) = (self.height, self.width);
        [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(move |(dr, dc)| {
                let r = row as i64 + dr;
                let c = col as i64 + dc;
                if r >= 0 && c >= 0 && (r as usize) < height && (c as usize) < width {
                    Some((r as usize, c as usize))
                } else {
                    None
                }
            })
    }

    /// Iterate over all cells as `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            (idx / width, idx % width, val)
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            (idx / width, idx % width, val)
        })
    }

    /// Raw row-major cell storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Count the cells matching a predicate.
    pub fn count(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.data.iter().filter(|v| pred(v)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_truncates_and_pads() {
        let mut map = Tilemap::from_fn(3, 3, |r, c| r * 3 + c);

        map.resize(2, 4, 99);
        assert_eq!(map.height, 2);
        assert_eq!(map.width, 4);
        assert_eq!(map.as_slice(), &[0, 1, 2, 99, 3, 4, 5, 99]);

        map.resize(3, 2, 7);
        assert_eq!(map.as_slice(), &[0, 1, 3, 4, 7, 7]);
    }

    #[test]
    fn test_try_access_reports_bounds() {
        let mut map = Tilemap::new_with(2, 3, false);
        assert!(map.try_set(1, 2, true).is_ok());
        assert!(*map.try_get(1, 2).unwrap());

        match map.try_get(2, 0) {
            Err(LevelError::OutOfBounds { row, col, height, width }) => {
                assert_eq!((row, col, height, width), (2, 0, 2, 3));
            }
            other => panic!("expected out of bounds, got {:?}", other),
        }
        assert!(map.try_set(0, 3, true).is_err());
    }

    #[test]
    fn test_neighbors_stay_inside() {
        let map = Tilemap::new_with(3, 3, 0u8);
        let corner: Vec<_> = map.neighbors(0, 0).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1)]);
        assert_eq!(map.neighbors(1, 1).count(), 4);
    }
}
