/// Row-major enumeration of every coordinate inside a set of dimensions.
///
/// Works like an odometer over a single reusable index buffer: the last
/// dimension advances fastest and carries into the one before it. Each call
/// to [`CoordIter::next_coord`] lends out the buffer, so no coordinate vector
/// is allocated per step and depth does not grow with rank.
///
/// An empty dimension list has exactly one coordinate (the empty one). Any
/// zero-sized dimension means there are no coordinates at all.
#[derive(Debug, Clone)]
pub struct CoordIter {
    dims: Vec<usize>,
    coords: Vec<usize>,
    started: bool,
    done: bool,
}

impl CoordIter {
    pub fn new(dims: &[usize]) -> Self {
        CoordIter {
            dims: dims.to_vec(),
            coords: vec![0; dims.len()],
            started: false,
            done: dims.contains(&0),
        }
    }

    /// Advances to the next coordinate and returns it, or `None` once every
    /// coordinate has been visited.
    pub fn next_coord(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.coords);
        }

        for i in (0..self.dims.len()).rev() {
            self.coords[i] += 1;
            if self.coords[i] < self.dims[i] {
                return Some(&self.coords);
            }
            self.coords[i] = 0;
        }

        self.done = true;
        None
    }
}
