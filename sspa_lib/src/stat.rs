use serde::Serialize;
use statrs::distribution::{DiscreteCDF, Hypergeometric};

use crate::StatisticsError;

struct Carrier {
    p: f64,
    original_order: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjustmentMethod {
    /// Benjamini-Hochberg false discovery rate
    #[default]
    BH,
    None,
}

/// A 2x2 table `[[a, b], [c, d]]` for one pathway.
///
/// ```text
///                 in pathway   not in pathway
/// DA                  a              c
/// not DA              b              d
/// ```
///
/// Rows of the test matrix are `[a, b]` and `[c, d]`, so the first row is the
/// pathway and the first column is the DA list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContingencyTable {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub d: u64,
}

impl ContingencyTable {
    pub fn new(a: u64, b: u64, c: u64, d: u64) -> ContingencyTable {
        ContingencyTable { a, b, c, d }
    }

    pub fn total(&self) -> u64 {
        self.a + self.b + self.c + self.d
    }

    /// Compounds of the pathway that were measured (DA or background)
    pub fn measured(&self) -> u64 {
        self.a + self.b
    }
}

/// Right-tailed Fisher exact test ("greater" alternative).
///
/// Returns the probability of observing `a` or more DA compounds in the pathway
/// under the hypergeometric null with the table's margins fixed.
///
/// # Errors
///
/// Returns [`StatisticsError::EmptyTable`] if all four counts are zero.
pub fn fisher_exact_greater(table: &ContingencyTable) -> Result<f64, StatisticsError> {
    let population = table.total();
    if population == 0 {
        return Err(StatisticsError::EmptyTable);
    }
    let successes = table.a + table.b;
    let draws = table.a + table.c;
    let dist = Hypergeometric::new(population, successes, draws).map_err(|_| {
        StatisticsError::InvalidHypergeometric {
            population,
            successes,
            draws,
        }
    })?;
    if table.a == 0 {
        return Ok(1.0);
    }
    // sf(x) is P(X > x), we want P(X >= a)
    let p = dist.sf(table.a - 1);
    Ok(p.clamp(0.0, 1.0))
}

pub fn adjust(p_vals: &[f64], method: AdjustmentMethod) -> Result<Vec<f64>, StatisticsError> {
    validate_p_values(p_vals)?;
    match method {
        AdjustmentMethod::BH => Ok(benjamini_hochberg(p_vals)),
        AdjustmentMethod::None => Ok(p_vals.to_vec()),
    }
}

fn benjamini_hochberg(p_vals: &[f64]) -> Vec<f64> {
    let mut carriers: Vec<Carrier> = p_vals
        .iter()
        .enumerate()
        .map(|(i, p)| Carrier {
            p: *p,
            original_order: i,
        })
        .collect();
    carriers.sort_by(|a, b| a.p.total_cmp(&b.p));
    let m = carriers.len();
    let mut fdr_vals = vec![0.0; m];
    let mut prev_fdr = 1.0;
    for (i, carrier) in carriers.iter().enumerate().rev() {
        let mut fdr = carrier.p * m as f64 / (i + 1) as f64;
        if fdr > 1.0 {
            fdr = 1.0;
        }
        if fdr > prev_fdr {
            fdr = prev_fdr;
        } else {
            prev_fdr = fdr;
        }
        fdr_vals[carrier.original_order] = fdr;
    }
    fdr_vals
}

fn validate_p_values(p_vals: &[f64]) -> Result<(), StatisticsError> {
    for (index, &value) in p_vals.iter().enumerate() {
        if value.is_nan() {
            return Err(StatisticsError::FoundNANValue(index));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(StatisticsError::InvalidValue { index, value });
        }
    }
    Ok(())
}
