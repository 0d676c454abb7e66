use std::io::Read;

use ndarray::Array1;
use serde::{Deserialize, Deserializer};

use crate::{
    error::{Error, Result},
    frame::{Column, Frame},
};

/// What a variable is used for in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Role {
    Feature,
    Target,
    #[serde(rename = "ID")]
    Id,
    #[serde(other)]
    Other,
}

/// Published value type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Kind {
    Continuous,
    Integer,
    Categorical,
    Binary,
    #[default]
    #[serde(other)]
    Other,
}

/// One entry of a dataset schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Variable {
    pub name: String,
    pub role: Role,
    #[serde(rename = "type", default, deserialize_with = "kind_or_other")]
    pub kind: Kind,
}

impl Variable {
    pub fn new(name: impl Into<String>, role: Role, kind: Kind) -> Self {
        Self {
            name: name.into(),
            role,
            kind,
        }
    }
}

// The repository sends `"type": null` for some variables.
fn kind_or_other<'de, D>(deserializer: D) -> std::result::Result<Kind, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Kind>::deserialize(deserializer)?.unwrap_or_default())
}

/// A fetched dataset. `features` and `targets` are row-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub id: u32,
    pub name: String,
    pub features: Frame,
    pub targets: Frame,
    pub ids: Option<Frame>,
}

/// Read a CSV with a header row and sort its columns into frames by the role of each variable.
///
/// Variables are looked up by name, so a variable the CSV does not have is a schema error.
/// Columns the schema does not mention are dropped.
pub fn dataset_from_csv<R: Read>(
    id: u32,
    name: &str,
    reader: R,
    variables: &[Variable],
) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut cells = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    for header in headers.iter() {
        if !variables.iter().any(|v| v.name == header) {
            tracing::debug!("column `{}` is not described by the schema", header);
        }
    }

    let frame_for = |role: Role| -> Result<Frame> {
        let columns = variables
            .iter()
            .filter(|v| v.role == role)
            .map(|v| {
                let position = headers.iter().position(|h| h == v.name).ok_or_else(|| {
                    Error::Schema(format!("variable `{}` is missing from the data", v.name))
                })?;
                Ok((v.name.clone(), parse_column(&cells[position], v.kind)))
            })
            .collect::<Result<Vec<_>>>()?;
        Frame::new(columns)
    };

    let features = frame_for(Role::Feature)?;
    let targets = frame_for(Role::Target)?;
    let ids = frame_for(Role::Id)?;
    if features.ncols() == 0 {
        return Err(Error::Schema(format!("dataset {} has no feature variables", id)));
    }
    if targets.ncols() == 0 {
        return Err(Error::Schema(format!("dataset {} has no target variables", id)));
    }

    tracing::debug!(
        "parsed {} rows: {} features, {} targets",
        features.nrows(),
        features.ncols(),
        targets.ncols()
    );
    Ok(Dataset {
        id,
        name: name.to_string(),
        features,
        targets,
        ids: (ids.ncols() > 0).then_some(ids),
    })
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell == "?"
}

/// Pick the narrowest column type every cell fits in: `Integer`, then `Float`, then `Text`.
/// Integers are only tried when the variable is not declared continuous. Non-finite numbers
/// (`inf`, `NaN`) are missing cells.
fn parse_column(cells: &[String], kind: Kind) -> Column {
    if kind != Kind::Continuous {
        let integers = cells
            .iter()
            .map(|cell| cell.parse::<i64>().ok())
            .collect::<Option<Vec<_>>>();
        if let Some(values) = integers {
            return Column::Integer(Array1::from(values));
        }
    }

    let floats = cells
        .iter()
        .map(|cell| {
            if is_missing(cell) {
                Some(f64::NAN)
            } else {
                cell.parse::<f64>()
                    .ok()
                    .map(|v| if v.is_finite() { v } else { f64::NAN })
            }
        })
        .collect::<Option<Vec<_>>>();
    if let Some(values) = floats {
        return Column::Float(Array1::from(values));
    }

    Column::Text(
        cells
            .iter()
            .map(|cell| (!is_missing(cell)).then(|| cell.clone()))
            .collect(),
    )
}
