use crate::catalog::{Pathway, PathwayCatalog};
use crate::identifiers::{ConversionRow, ConversionTable};
use crate::matrix::CompoundMatrix;
use crate::{MalformedError, Result};
use ahash::AHashSet;
use ndarray::Array2;
use std::{
    fs::File,
    io::{prelude::*, BufReader},
    path::Path,
};
use tracing::debug;

/// Reads a tab-delimited pathway file, one pathway per line:
/// `id \t name \t compound \t compound ...`
///
/// Empty fields are ignored, so ragged rows padded with tabs are fine.
pub fn read_pathway_file(path: impl AsRef<Path>) -> Result<PathwayCatalog> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .has_headers(false)
        .from_reader(file);
    let mut catalog = PathwayCatalog::new();
    for (line, r) in rdr.records().enumerate() {
        let record = r?;
        let mut fields = record.iter().map(str::trim);
        let id = match fields.next() {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => return Err(MalformedError::NoColumnsFound(line + 1).into()),
        };
        let name = match fields.next() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => id.clone(),
        };
        let compounds: Vec<String> = fields
            .filter(|x| !x.is_empty())
            .map(str::to_owned)
            .collect();
        catalog.insert(Pathway::with_name(id, name, compounds));
    }
    debug!("Read {} pathways", catalog.len());
    Ok(catalog)
}

/// Reads one identifier per line. Blank lines are skipped.
pub fn read_single_list(path: impl AsRef<Path>) -> Result<AHashSet<String>> {
    let file = File::open(path)?;
    let buf = BufReader::new(file);
    let mut h = AHashSet::default();
    for line in buf.lines() {
        let line = line?;
        let item = line.trim();
        if !item.is_empty() {
            h.insert(item.to_owned());
        }
    }
    Ok(h)
}

/// Reads the three ORA inputs: pathways, the DA list and the background list.
pub fn read_ora_files(
    pathway_path: impl AsRef<Path>,
    interest_path: impl AsRef<Path>,
    ref_path: impl AsRef<Path>,
) -> Result<(PathwayCatalog, AHashSet<String>, AHashSet<String>)> {
    let catalog = read_pathway_file(pathway_path)?;
    let interest_list = read_single_list(interest_path)?;
    let reference_list = read_single_list(ref_path)?;
    Ok((catalog, interest_list, reference_list))
}

/// Reads a comma-separated conversion table with a `Query` column and any of
/// the identifier namespace columns.
pub fn read_conversion_table(path: impl AsRef<Path>) -> Result<ConversionTable> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new().flexible(false).from_reader(file);
    if !rdr.headers()?.iter().any(|x| x == "Query") {
        return Err(MalformedError::MissingColumn("Query".to_string()).into());
    }
    let rows = rdr
        .deserialize::<ConversionRow>()
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;
    Ok(ConversionTable::new(rows))
}

/// Reads a comma-separated sample-by-compound matrix. The first column holds
/// the sample ids, the header holds the compound ids. Empty cells are NaN.
pub fn read_compound_matrix(path: impl AsRef<Path>) -> Result<CompoundMatrix> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new().from_reader(file);
    let compounds: Vec<String> = rdr
        .headers()?
        .iter()
        .skip(1)
        .map(|x| x.trim().to_owned())
        .collect();
    if compounds.is_empty() {
        return Err(MalformedError::NoColumnsFound(1).into());
    }
    let mut samples: Vec<String> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    for (i, r) in rdr.records().enumerate() {
        let record = r?;
        let line = i + 2;
        let mut fields = record.iter();
        samples.push(fields.next().unwrap_or_default().trim().to_owned());
        for field in fields {
            let field = field.trim();
            let value = if field.is_empty() {
                f64::NAN
            } else {
                field.parse::<f64>().map_err(|e| MalformedError::WrongFormat {
                    line,
                    reason: format!("{:?} is not a number: {}", field, e),
                })?
            };
            values.push(value);
        }
    }
    let values = Array2::from_shape_vec((samples.len(), compounds.len()), values).map_err(|e| {
        MalformedError::WrongFormat {
            line: 0,
            reason: e.to_string(),
        }
    })?;
    CompoundMatrix::new(samples, compounds, values)
}
