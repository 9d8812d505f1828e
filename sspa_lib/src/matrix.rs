use ahash::AHashMap;
use ndarray::{Array2, ArrayView2, Axis};

use crate::{Error, Result};

/// Sample-by-compound abundance matrix. Rows are samples, columns are compounds.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundMatrix {
    samples: Vec<String>,
    compounds: Vec<String>,
    values: Array2<f64>,
}

impl CompoundMatrix {
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the labels do not match the shape of `values`.
    pub fn new(
        samples: Vec<String>,
        compounds: Vec<String>,
        values: Array2<f64>,
    ) -> Result<CompoundMatrix> {
        let (n_rows, n_cols) = values.dim();
        if n_rows != samples.len() || n_cols != compounds.len() {
            return Err(Error::DimensionMismatch {
                expected: format!("{} x {}", samples.len(), compounds.len()),
                got: format!("{} x {}", n_rows, n_cols),
            });
        }
        Ok(CompoundMatrix {
            samples,
            compounds,
            values,
        })
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn compounds(&self) -> &[String] {
        &self.compounds
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Column position of each compound. Repeated names keep their first position.
    pub fn compound_index(&self) -> AHashMap<&str, usize> {
        let mut index = AHashMap::default();
        for (i, compound) in self.compounds.iter().enumerate() {
            index.entry(compound.as_str()).or_insert(i);
        }
        index
    }

    /// New matrix holding only the given columns, in the given order, relabelled
    /// with `names`.
    pub(crate) fn select_compounds(&self, columns: &[usize], names: Vec<String>) -> CompoundMatrix {
        CompoundMatrix {
            samples: self.samples.clone(),
            compounds: names,
            values: self.values.select(Axis(1), columns),
        }
    }
}
