//! Cartesian product over an arbitrary number of axes.

/// Iterates every combination of one value per axis.
///
/// Combinations come out in nested-loop order: the first axis is the
/// outermost loop and the last axis varies fastest. Any empty axis makes the
/// product empty.
#[derive(Debug, Clone)]
pub struct Grid<'a> {
    axes: Vec<&'a [String]>,
    indices: Vec<usize>,
    done: bool,
}

impl<'a> Grid<'a> {
    /// Creates a grid over `axes`.
    pub fn new(axes: Vec<&'a [String]>) -> Self {
        let done = axes.is_empty() || axes.iter().any(|values| values.is_empty());
        let indices = vec![0; axes.len()];
        Self {
            axes,
            indices,
            done,
        }
    }

    /// Total number of combinations.
    pub fn len(&self) -> usize {
        if self.axes.is_empty() {
            0
        } else {
            self.axes.iter().map(|values| values.len()).product()
        }
    }

    /// True if the grid yields nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves the odometer forward; returns false once every combination was produced.
    fn advance(&mut self) -> bool {
        for position in (0..self.indices.len()).rev() {
            self.indices[position] += 1;
            if self.indices[position] < self.axes[position].len() {
                return true;
            }
            self.indices[position] = 0;
        }
        false
    }
}

impl<'a> Iterator for Grid<'a> {
    type Item = Vec<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self
            .indices
            .iter()
            .zip(&self.axes)
            .map(|(&index, values)| values[index].as_str())
            .collect();
        self.done = !self.advance();
        Some(item)
    }
}
