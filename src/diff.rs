use std::fmt;

use crate::dataset::SlcDataset;

#[derive(Debug)]
pub enum DiffError {
    ShapeMismatch {
        v2_shape: Vec<usize>,
        v1_shape: Vec<usize>,
    },
}

impl fmt::Display for DiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffError::ShapeMismatch { v2_shape, v1_shape } => write!(
                f,
                "Cannot difference arrays of shape {:?} (v2) and {:?} (v1)",
                v2_shape, v1_shape
            ),
        }
    }
}

impl std::error::Error for DiffError {}

/// Element-wise v2 - v1 difference for one (resolution, ice sheet)
/// combination. Transient: computed on demand for the plotter, never
/// persisted.
#[derive(Debug, Clone)]
pub struct DiffArray {
    pub values: Vec<f64>,
    pub shape: Vec<usize>,
}

impl DiffArray {
    pub fn between(v2: &SlcDataset, v1: &SlcDataset) -> Result<Self, DiffError> {
        if v2.shape != v1.shape {
            return Err(DiffError::ShapeMismatch {
                v2_shape: v2.shape.clone(),
                v1_shape: v1.shape.clone(),
            });
        }

        let values = v2
            .values
            .iter()
            .zip(&v1.values)
            .map(|(b, a)| b - a)
            .collect();

        Ok(DiffArray {
            values,
            shape: v2.shape.clone(),
        })
    }

    /// Median of the finite differences, NaN entries skipped. NaN if
    /// nothing is left.
    pub fn median(&self) -> f64 {
        let mut values: Vec<f64> = self.values.iter().copied().filter(|v| !v.is_nan()).collect();
        if values.is_empty() {
            return f64::NAN;
        }

        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        }
    }

    /// Extent as (rows, columns): the leading dimension by the product of
    /// the rest, so 1-D arrays render as a single column.
    pub fn extent(&self) -> (usize, usize) {
        let rows = self.shape.first().copied().unwrap_or(self.values.len());
        let rows = rows.max(1);
        let cols = (self.values.len() / rows).max(1);
        (rows, cols)
    }
}
