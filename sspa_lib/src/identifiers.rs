//! Compound identifier mapping.
//!
//! A naming-authority service returns, for every queried compound, its
//! identifier in several namespaces. [`ConversionTable`] holds that response and
//! [`map_identifiers`] applies it to a sample-by-compound matrix so pathways,
//! background and data share one identifier space.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::matrix::CompoundMatrix;
use crate::{Error, MalformedError, Result};

/// Strings the service and upstream tables use for "no identifier"
const MISSING_VALUES: [&str; 5] = ["", "NA", "None", "nan", "NaN"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierType {
    /// Matched compound name
    Match,
    Hmdb,
    PubChem,
    ChEBI,
    Kegg,
    Metlin,
    Smiles,
}

impl IdentifierType {
    pub const ALL: [IdentifierType; 7] = [
        IdentifierType::Match,
        IdentifierType::Hmdb,
        IdentifierType::PubChem,
        IdentifierType::ChEBI,
        IdentifierType::Kegg,
        IdentifierType::Metlin,
        IdentifierType::Smiles,
    ];

    /// Column name of this namespace in a conversion table
    pub fn column(&self) -> &'static str {
        match self {
            IdentifierType::Match => "Match",
            IdentifierType::Hmdb => "HMDB",
            IdentifierType::PubChem => "PubChem",
            IdentifierType::ChEBI => "ChEBI",
            IdentifierType::Kegg => "KEGG",
            IdentifierType::Metlin => "METLIN",
            IdentifierType::Smiles => "SMILES",
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for IdentifierType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        IdentifierType::ALL
            .iter()
            .find(|x| x.column().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| Error::UnknownIdentifierType(s.to_string()))
    }
}

fn missing_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.and_then(clean_identifier))
}

fn clean_identifier(value: String) -> Option<String> {
    let trimmed = value.trim();
    if MISSING_VALUES.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn json_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean_identifier(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One queried compound and its identifiers in every namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRow {
    #[serde(rename = "Query")]
    pub query: String,
    #[serde(rename = "Match", default, deserialize_with = "missing_as_none")]
    pub matched: Option<String>,
    #[serde(rename = "HMDB", default, deserialize_with = "missing_as_none")]
    pub hmdb: Option<String>,
    #[serde(rename = "PubChem", default, deserialize_with = "missing_as_none")]
    pub pubchem: Option<String>,
    #[serde(rename = "ChEBI", default, deserialize_with = "missing_as_none")]
    pub chebi: Option<String>,
    #[serde(rename = "KEGG", default, deserialize_with = "missing_as_none")]
    pub kegg: Option<String>,
    #[serde(rename = "METLIN", default, deserialize_with = "missing_as_none")]
    pub metlin: Option<String>,
    #[serde(rename = "SMILES", default, deserialize_with = "missing_as_none")]
    pub smiles: Option<String>,
}

impl ConversionRow {
    pub fn get(&self, id_type: IdentifierType) -> Option<&str> {
        let value = match id_type {
            IdentifierType::Match => &self.matched,
            IdentifierType::Hmdb => &self.hmdb,
            IdentifierType::PubChem => &self.pubchem,
            IdentifierType::ChEBI => &self.chebi,
            IdentifierType::Kegg => &self.kegg,
            IdentifierType::Metlin => &self.metlin,
            IdentifierType::Smiles => &self.smiles,
        };
        value.as_deref()
    }

    fn set(&mut self, id_type: IdentifierType, value: Option<String>) {
        let slot = match id_type {
            IdentifierType::Match => &mut self.matched,
            IdentifierType::Hmdb => &mut self.hmdb,
            IdentifierType::PubChem => &mut self.pubchem,
            IdentifierType::ChEBI => &mut self.chebi,
            IdentifierType::Kegg => &mut self.kegg,
            IdentifierType::Metlin => &mut self.metlin,
            IdentifierType::Smiles => &mut self.smiles,
        };
        *slot = value;
    }

    fn from_fields(fields: &BTreeMap<String, Value>) -> Result<ConversionRow> {
        let query = fields
            .get("Query")
            .and_then(json_identifier)
            .ok_or_else(|| MalformedError::MissingColumn("Query".to_string()))?;
        let mut row = ConversionRow {
            query,
            ..ConversionRow::default()
        };
        for id_type in IdentifierType::ALL {
            row.set(id_type, fields.get(id_type.column()).and_then(json_identifier));
        }
        Ok(row)
    }
}

/// JSON shapes a conversion response comes in: a list of records, or one array per column
#[derive(Deserialize)]
#[serde(untagged)]
enum ConversionPayload {
    Records(Vec<BTreeMap<String, Value>>),
    Columns(BTreeMap<String, Vec<Value>>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionTable {
    pub rows: Vec<ConversionRow>,
}

impl ConversionTable {
    pub fn new(rows: Vec<ConversionRow>) -> ConversionTable {
        ConversionTable { rows }
    }

    /// Parses a conversion response, record- or column-oriented.
    ///
    /// # Errors
    ///
    /// Fails on invalid JSON, on a missing `Query` column and on columns of
    /// unequal length.
    pub fn from_json(json: &str) -> Result<ConversionTable> {
        let payload: ConversionPayload = serde_json::from_str(json)?;
        let rows = match payload {
            ConversionPayload::Records(records) => records
                .iter()
                .map(ConversionRow::from_fields)
                .collect::<Result<Vec<_>>>()?,
            ConversionPayload::Columns(columns) => {
                let queries = columns
                    .get("Query")
                    .ok_or_else(|| MalformedError::MissingColumn("Query".to_string()))?;
                for (name, values) in columns.iter() {
                    if values.len() != queries.len() {
                        return Err(Error::DimensionMismatch {
                            expected: format!("{} values in column {}", queries.len(), name),
                            got: values.len().to_string(),
                        });
                    }
                }
                (0..queries.len())
                    .map(|i| {
                        let fields: BTreeMap<String, Value> = columns
                            .iter()
                            .map(|(name, values)| (name.clone(), values[i].clone()))
                            .collect();
                        ConversionRow::from_fields(&fields)
                    })
                    .collect::<Result<Vec<_>>>()?
            }
        };
        debug!("Parsed conversion table with {} rows", rows.len());
        Ok(ConversionTable { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Query → identifier lookup for one namespace. Queries without an
    /// identifier are left out; a repeated query keeps its last identifier.
    pub fn mapping(&self, id_type: IdentifierType) -> AHashMap<String, String> {
        self.rows
            .iter()
            .filter_map(|row| {
                row.get(id_type)
                    .map(|id| (row.query.clone(), id.to_string()))
            })
            .collect()
    }
}

/// Renames the compound columns of `matrix` to `output_type` identifiers.
///
/// Columns without a mapped identifier are dropped.
pub fn map_identifiers(
    table: &ConversionTable,
    output_type: IdentifierType,
    matrix: &CompoundMatrix,
) -> CompoundMatrix {
    let mapping = table.mapping(output_type);
    let mut columns = Vec::new();
    let mut names = Vec::new();
    for (i, compound) in matrix.compounds().iter().enumerate() {
        if let Some(id) = mapping.get(compound) {
            columns.push(i);
            names.push(id.clone());
        }
    }
    let dropped = matrix.compounds().len() - columns.len();
    if dropped > 0 {
        warn!(
            "{} of {} compounds have no {} identifier and were dropped",
            dropped,
            matrix.compounds().len(),
            output_type
        );
    }
    matrix.select_compounds(&columns, names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_identifier_type() {
        assert_eq!("kegg".parse::<IdentifierType>().unwrap(), IdentifierType::Kegg);
        assert_eq!("ChEBI".parse::<IdentifierType>().unwrap(), IdentifierType::ChEBI);
        assert!("uniprot".parse::<IdentifierType>().is_err());
    }

    #[test]
    fn records_json() {
        let json = r#"[
            {"Query": "glucose", "Match": "D-Glucose", "HMDB": "HMDB0000122", "PubChem": 5793, "KEGG": "C00031"},
            {"Query": "mystery", "Match": "NA", "HMDB": null, "KEGG": "None"}
        ]"#;
        let table = ConversionTable::from_json(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get(IdentifierType::PubChem), Some("5793"));
        assert_eq!(table.rows[1].get(IdentifierType::Match), None);
        assert_eq!(table.rows[1].get(IdentifierType::Kegg), None);
    }

    #[test]
    fn columns_json() {
        let json = r#"{
            "Query": ["glucose", "lactate"],
            "KEGG": ["C00031", "NA"]
        }"#;
        let table = ConversionTable::from_json(json).unwrap();
        let mapping = table.mapping(IdentifierType::Kegg);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["glucose"], "C00031");
    }

    #[test]
    fn columns_must_align() {
        let json = r#"{"Query": ["a", "b"], "KEGG": ["C1"]}"#;
        assert!(matches!(
            ConversionTable::from_json(json),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn query_column_required() {
        let json = r#"[{"KEGG": "C00031"}]"#;
        assert!(matches!(
            ConversionTable::from_json(json),
            Err(Error::MalformedFile(MalformedError::MissingColumn(_)))
        ));
    }
}
