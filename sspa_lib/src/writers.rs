//! Collection of utilities to save results to a file/folder
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use crate::methods::ora::{ORAResult, ORA_COLUMNS};
use crate::methods::ssgsea::PathwayScores;
use crate::Result;

/// Writes ORA results as CSV. The header is written even when there are no rows.
pub fn save_ora(path: impl AsRef<Path>, results: &[ORAResult]) -> Result<()> {
    let file = File::create(path)?;
    write_ora(file, results)
}

pub fn write_ora<W: Write>(writer: W, results: &[ORAResult]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(ORA_COLUMNS)?;
    for row in results {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_ora_json(path: impl AsRef<Path>, results: &[ORAResult]) -> Result<()> {
    let mut file = File::create(path)?;
    let json = serde_json::to_string(results)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Writes pathway scores as CSV, samples as rows and pathways as columns, in the
/// layout [`crate::readers::read_compound_matrix`] reads.
pub fn save_scores(path: impl AsRef<Path>, scores: &PathwayScores) -> Result<()> {
    let file = File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    let mut header = vec!["Sample".to_string()];
    header.extend(scores.pathways.iter().cloned());
    wtr.write_record(&header)?;
    for (sample, row) in scores.samples.iter().zip(scores.scores.rows()) {
        let mut record = vec![sample.clone()];
        record.extend(row.iter().map(|x| x.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
