use std::fmt;

use crate::index::CoordIter;
use crate::tensor::Tensor;

/// Formatting options for rendering a tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Fixed number of decimal places. `None` prints the shortest
    /// representation that round-trips.
    pub precision: Option<usize>,
    /// Text written between neighbouring elements of the last dimension.
    pub separator: String,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            precision: None,
            separator: ", ".to_string(),
        }
    }
}

impl PrintOptions {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

/// A tensor paired with the options used to render it.
pub struct TensorDisplay<'a> {
    tensor: &'a Tensor,
    options: &'a PrintOptions,
}

impl Tensor {
    /// Renders with custom options, e.g. `format!("{}", t.display_with(&opts))`.
    pub fn display_with<'a>(&'a self, options: &'a PrintOptions) -> TensorDisplay<'a> {
        TensorDisplay {
            tensor: self,
            options,
        }
    }

    /// Writes the default rendering to stdout.
    pub fn print(&self) {
        println!("{}", self);
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = PrintOptions::default();
        write_tensor(f, self, &options)
    }
}

impl fmt::Display for TensorDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tensor(f, self.tensor, self.options)
    }
}

/// Nested bracketed rendering, last dimension as a flat list.
///
/// Brackets are derived from the row-major coordinate: trailing zeros open
/// groups, trailing maxima close them. Outer siblings are separated by a
/// newline indented one space per enclosing level.
fn write_tensor(f: &mut fmt::Formatter<'_>, t: &Tensor, options: &PrintOptions) -> fmt::Result {
    if t.is_empty() {
        return write!(f, "Empty Tensor with shape: {}", t.shape());
    }

    write!(f, "Tensor(shape={}, data=", t.shape())?;

    let dims = t.dims();
    let rank = dims.len();
    let data = t.data();
    let mut coords = CoordIter::new(dims);
    let mut flat = 0;
    while let Some(c) = coords.next_coord() {
        if flat == 0 {
            write_repeated(f, "[", rank)?;
        } else if c[rank - 1] != 0 {
            f.write_str(&options.separator)?;
        } else {
            let first_zero = c.iter().rposition(|&i| i != 0).map_or(0, |p| p + 1);
            f.write_str(",\n")?;
            write_repeated(f, " ", first_zero)?;
            write_repeated(f, "[", rank - first_zero)?;
        }

        match options.precision {
            Some(p) => write!(f, "{:.*}", p, data[flat])?,
            None => write!(f, "{}", data[flat])?,
        }

        let closing = c
            .iter()
            .zip(dims)
            .rev()
            .take_while(|&(&i, &d)| i + 1 == d)
            .count();
        write_repeated(f, "]", closing)?;
        flat += 1;
    }

    write!(f, ")")
}

fn write_repeated(f: &mut fmt::Formatter<'_>, s: &str, n: usize) -> fmt::Result {
    for _ in 0..n {
        f.write_str(s)?;
    }
    Ok(())
}
