use ahash::AHashMap;
use ndarray::{Array2, ArrayView2};
use tracing::{debug, info};

use crate::catalog::PathwayCatalog;
use crate::matrix::CompoundMatrix;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct SsGseaConfig {
    /// Least number of pathway compounds that must be columns of the matrix (default: 2)
    pub min_entity: usize,
}

impl Default for SsGseaConfig {
    fn default() -> Self {
        SsGseaConfig { min_entity: 2 }
    }
}

/// Single-sample enrichment scoring backend.
///
/// Implementors receive the abundance matrix (rows = samples) and, for every
/// pathway, the column indices of its compounds. They must return a
/// samples x pathways matrix of scores, pathways in the order given.
pub trait SampleScorer {
    fn score(&self, values: ArrayView2<f64>, pathway_columns: &[Vec<usize>]) -> Result<Array2<f64>>;
}

/// Pathway scores, rows are samples and columns pathways
#[derive(Debug, Clone, PartialEq)]
pub struct PathwayScores {
    pub samples: Vec<String>,
    pub pathways: Vec<String>,
    pub scores: Array2<f64>,
}

impl PathwayScores {
    pub fn get(&self, sample: &str, pathway: &str) -> Option<f64> {
        let row = self.samples.iter().position(|x| x == sample)?;
        let col = self.pathways.iter().position(|x| x == pathway)?;
        Some(self.scores[[row, col]])
    }
}

/// Keeps the pathways with at least `min_entity` compounds among `compounds_present`.
pub fn filter_pathways(
    catalog: &PathwayCatalog,
    compounds_present: &[String],
    min_entity: usize,
) -> PathwayCatalog {
    catalog
        .iter()
        .filter(|pathway| {
            let members = pathway.sanitized();
            let present = compounds_present
                .iter()
                .filter(|x| members.contains(&x.as_str()))
                .count();
            if present < min_entity {
                debug!(
                    "Skipping {}: {} compounds in data, need {}",
                    pathway.id, present, min_entity
                );
            }
            present >= min_entity
        })
        .cloned()
        .collect()
}

/// Scores every sample of `matrix` against the pathways with enough measured
/// compounds, delegating the enrichment statistic to `scorer`.
///
/// # Errors
///
/// Propagates scorer errors, and returns [`Error::DimensionMismatch`] if the
/// scorer does not return one score per sample and pathway.
pub fn ssgsea<S: SampleScorer + ?Sized>(
    matrix: &CompoundMatrix,
    catalog: &PathwayCatalog,
    config: &SsGseaConfig,
    scorer: &S,
) -> Result<PathwayScores> {
    let pathways = filter_pathways(catalog, matrix.compounds(), config.min_entity);
    info!(
        "Scoring {} samples against {} of {} pathways",
        matrix.samples().len(),
        pathways.len(),
        catalog.len()
    );
    let index: AHashMap<&str, usize> = matrix.compound_index();
    let pathway_columns: Vec<Vec<usize>> = pathways
        .iter()
        .map(|pathway| {
            pathway
                .sanitized()
                .iter()
                .filter_map(|x| index.get(x).copied())
                .collect()
        })
        .collect();
    let scores = scorer.score(matrix.values(), &pathway_columns)?;
    let expected = (matrix.samples().len(), pathways.len());
    if scores.dim() != expected {
        return Err(Error::DimensionMismatch {
            expected: format!("{} x {}", expected.0, expected.1),
            got: format!("{} x {}", scores.nrows(), scores.ncols()),
        });
    }
    Ok(PathwayScores {
        samples: matrix.samples().to_vec(),
        pathways: pathways.ids().iter().map(|x| x.to_string()).collect(),
        scores,
    })
}
