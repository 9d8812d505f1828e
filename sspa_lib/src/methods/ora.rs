use ahash::AHashSet;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{Pathway, PathwayCatalog};
use crate::stat::{adjust, fisher_exact_greater, AdjustmentMethod, ContingencyTable};
use crate::Result;

/// Column names of an ORA result table, in order
pub const ORA_COLUMNS: [&str; 6] = [
    "Pathway_ID",
    "Pathway_name",
    "Hits",
    "Coverage",
    "P-value",
    "P-adjust",
];

#[derive(Debug, Clone)]
/// Options for [`get_ora`]
pub struct ORAConfig {
    /// Smallest pathway (after removing missing entries) that is tested (default: 2)
    pub min_set_size: usize,
    /// Least number of DA compounds that must fall in the pathway (default: 1)
    pub min_overlap: u64,
    /// Least number of pathway compounds found in the DA or background list (default: 2)
    pub min_measured: u64,
    /// FDR level used by [`ORAResult::is_significant`]. Does not change the adjusted p-values.
    pub fdr_level: f64,
    pub fdr_method: AdjustmentMethod,
}

impl Default for ORAConfig {
    fn default() -> Self {
        ORAConfig {
            min_set_size: 2,
            min_overlap: 1,
            min_measured: 2,
            fdr_level: 0.05,
            fdr_method: AdjustmentMethod::BH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ORAResult {
    #[serde(rename = "Pathway_ID")]
    pub set: String,
    #[serde(rename = "Pathway_name")]
    pub name: String,
    /// `a/(a+b)`
    #[serde(rename = "Hits")]
    pub hits: String,
    /// `(a+b)/pathway size`
    #[serde(rename = "Coverage")]
    pub coverage: String,
    #[serde(rename = "P-value")]
    pub p: f64,
    #[serde(rename = "P-adjust")]
    pub fdr: f64,
    #[serde(skip)]
    pub table: ContingencyTable,
}

impl ORAResult {
    pub fn is_significant(&self, fdr_level: f64) -> bool {
        self.fdr <= fdr_level
    }
}

#[derive(Debug, Clone)]
struct PartialORAResult {
    set: String,
    name: String,
    p: f64,
    table: ContingencyTable,
    size: usize,
}

/// Outcome of checking one pathway before the test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Tested with this table
    Eligible(ContingencyTable),
    /// Fewer than `min_set_size` compounds after sanitizing
    TooFewCompounds(usize),
    /// No DA compound in the pathway
    NoOverlap,
    /// Fewer than `min_measured` pathway compounds in the DA or background list
    TooFewMeasured(u64),
}

impl ContingencyTable {
    /// Builds the table for one pathway from the DA set, the background compounds
    /// that are not DA, and the sanitized pathway set.
    pub fn build(
        interest_list: &AHashSet<String>,
        not_interesting: &AHashSet<&str>,
        pathway: &AHashSet<&str>,
    ) -> ContingencyTable {
        let a = interest_list
            .iter()
            .filter(|x| pathway.contains(x.as_str()))
            .count();
        let b = pathway.iter().filter(|x| not_interesting.contains(*x)).count();
        let c = interest_list.len() - a;
        let d = not_interesting.len() - b;
        ContingencyTable::new(a as u64, b as u64, c as u64, d as u64)
    }
}

/// Applies the eligibility rules to one sanitized pathway.
pub fn check_eligibility(
    interest_list: &AHashSet<String>,
    not_interesting: &AHashSet<&str>,
    pathway: &AHashSet<&str>,
    config: &ORAConfig,
) -> Eligibility {
    if pathway.len() < config.min_set_size {
        return Eligibility::TooFewCompounds(pathway.len());
    }
    let table = ContingencyTable::build(interest_list, not_interesting, pathway);
    if table.a == 0 || table.a < config.min_overlap {
        Eligibility::NoOverlap
    } else if table.measured() < config.min_measured {
        Eligibility::TooFewMeasured(table.measured())
    } else {
        Eligibility::Eligible(table)
    }
}

fn evaluate_pathway(
    pathway: &Pathway,
    interest_list: &AHashSet<String>,
    not_interesting: &AHashSet<&str>,
    config: &ORAConfig,
) -> Result<Option<PartialORAResult>> {
    let compounds: AHashSet<&str> = pathway.sanitized().into_iter().collect();
    match check_eligibility(interest_list, not_interesting, &compounds, config) {
        Eligibility::Eligible(table) => {
            let p = fisher_exact_greater(&table)?;
            debug!(
                "Pathway:{}\ta: {}, b: {}, c: {}, d: {}, p: {}",
                pathway.id, table.a, table.b, table.c, table.d, p
            );
            Ok(Some(PartialORAResult {
                set: pathway.id.clone(),
                name: pathway.name.clone(),
                p,
                table,
                size: compounds.len(),
            }))
        }
        skipped => {
            debug!("Skipping {}: {:?}", pathway.id, skipped);
            Ok(None)
        }
    }
}

/// Get ORA results for the differentially abundant compounds against every pathway
/// in `catalog`, using a right-tailed Fisher exact test and FDR correction over
/// the tested pathways.
///
/// # Parameters
/// - `interest_list` - A [`AHashSet<String>`] of the differentially abundant compounds
/// - `reference` - A [`AHashSet<String>`] of all measured compounds (background)
/// - `catalog` - The [`PathwayCatalog`] to test
/// - `config` - [`ORAConfig`] with the eligibility thresholds and correction method
///
/// # Returns
///
/// One [`ORAResult`] per tested pathway, in catalog order. Pathways failing the
/// eligibility rules get no row.
///
/// # Errors
///
/// Returns an error if a contingency table or a p-value is invalid.
pub fn get_ora(
    interest_list: &AHashSet<String>,
    reference: &AHashSet<String>,
    catalog: &PathwayCatalog,
    config: &ORAConfig,
) -> Result<Vec<ORAResult>> {
    let not_interesting: AHashSet<&str> = reference
        .iter()
        .filter(|x| !interest_list.contains(*x))
        .map(String::as_str)
        .collect();
    let partials: Vec<PartialORAResult> = catalog
        .pathways()
        .par_iter()
        .map(|pathway| evaluate_pathway(pathway, interest_list, &not_interesting, config))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();
    info!(
        "Tested {} of {} pathways for over-representation",
        partials.len(),
        catalog.len()
    );
    if partials.is_empty() {
        return Ok(Vec::new());
    }

    let p_vals: Vec<f64> = partials.iter().map(|x| x.p).collect();
    let fdrs = adjust(&p_vals, config.fdr_method)?;
    let final_res = partials
        .into_iter()
        .zip(fdrs)
        .map(|(row, fdr)| ORAResult {
            hits: format!("{}/{}", row.table.a, row.table.measured()),
            coverage: format!("{}/{}", row.table.measured(), row.size),
            set: row.set,
            name: row.name,
            p: row.p,
            fdr,
            table: row.table,
        })
        .collect();
    Ok(final_res)
}

/// Over-representation analysis with the default [`ORAConfig`].
///
/// Both compound lists are reduced to sets before testing.
pub fn over_representation_analysis<I, J, S, T>(
    differentially_abundant: I,
    background: J,
    catalog: &PathwayCatalog,
) -> Result<Vec<ORAResult>>
where
    I: IntoIterator<Item = S>,
    J: IntoIterator<Item = T>,
    S: Into<String>,
    T: Into<String>,
{
    let interest_list: AHashSet<String> =
        differentially_abundant.into_iter().map(Into::into).collect();
    let reference: AHashSet<String> = background.into_iter().map(Into::into).collect();
    get_ora(&interest_list, &reference, catalog, &ORAConfig::default())
}
