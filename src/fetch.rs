use std::{fs, path::PathBuf};

use serde::Deserialize;

use crate::{
    dataset::{dataset_from_csv, Dataset, Kind, Role, Variable},
    error::{Error, Result},
};

pub const UCI_API_URL: &str = "https://archive.ics.uci.edu/api/dataset";

/// Anything that can produce a dataset from its numeric id.
pub trait DatasetSource {
    fn fetch(&self, id: u32) -> Result<Dataset>;
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: u16,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<DatasetMetadata>,
}

/// The part of the repository's dataset description needed to load it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetMetadata {
    pub name: String,
    #[serde(default)]
    pub data_url: Option<String>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl DatasetMetadata {
    /// Location of the CSV export. Datasets without one cannot be imported.
    pub fn data_url(&self, id: u32) -> Result<&str> {
        match self.data_url.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(Error::DatasetUnavailable { id }),
        }
    }
}

/// Decode the body of a `/api/dataset?id=` response.
pub fn parse_metadata(id: u32, body: &str) -> Result<DatasetMetadata> {
    let response: ApiResponse = serde_json::from_str(body)?;
    if response.status != 200 {
        return Err(Error::DatasetNotFound {
            id,
            message: response
                .message
                .unwrap_or_else(|| format!("status {}", response.status)),
        });
    }
    response.data.ok_or_else(|| Error::DatasetNotFound {
        id,
        message: "response carries no dataset".to_string(),
    })
}

/// Decode a response of `url` received with HTTP `status`.
///
/// Errors about unknown ids come back as JSON with their own status field, so the body is read
/// first. A body that is not JSON on a failed request is reported as an HTTP error.
pub fn metadata_from_response(
    id: u32,
    url: &str,
    status: reqwest::StatusCode,
    body: &str,
) -> Result<DatasetMetadata> {
    match parse_metadata(id, body) {
        Err(Error::Json(_)) if !status.is_success() => {
            Err(Error::Http(format!("{} returned {}", url, status)))
        }
        result => result,
    }
}

/// Client of the UCI Machine Learning Repository.
pub struct UciRepository {
    api_url: String,
    client: reqwest::blocking::Client,
}

impl UciRepository {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("iris-export/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            api_url: UCI_API_URL.to_string(),
            client,
        })
    }

    pub fn with_api_url(self, api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..self
        }
    }

    fn metadata(&self, id: u32) -> Result<DatasetMetadata> {
        let url = format!("{}?id={}", self.api_url, id);
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;
        metadata_from_response(id, &url, status, &body)
    }
}

impl DatasetSource for UciRepository {
    fn fetch(&self, id: u32) -> Result<Dataset> {
        let metadata = self.metadata(id)?;
        let data_url = metadata.data_url(id)?;

        tracing::info!("downloading `{}` from {}", metadata.name, data_url);
        let response = self.client.get(data_url).send()?;
        if !response.status().is_success() {
            return Err(Error::Http(format!(
                "{} returned {}",
                data_url,
                response.status()
            )));
        }
        let body = response.bytes()?;
        dataset_from_csv(id, &metadata.name, body.as_ref(), &metadata.variables)
    }
}

/// A CSV file on disk. Columns named in `targets` are targets, all others features.
/// Without explicit targets the last column is the target.
pub struct LocalCsv {
    path: PathBuf,
    targets: Vec<String>,
}

impl LocalCsv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            targets: Vec::new(),
        }
    }

    pub fn targets(self, targets: Vec<String>) -> Self {
        Self { targets, ..self }
    }

    fn variables(&self, headers: &csv::StringRecord) -> Result<Vec<Variable>> {
        let targets = if self.targets.is_empty() {
            headers.iter().last().map(str::to_string).into_iter().collect()
        } else {
            self.targets.clone()
        };
        if let Some(missing) = targets.iter().find(|t| !headers.iter().any(|h| h == t.as_str())) {
            return Err(Error::Schema(format!(
                "target `{}` is not a column of {}",
                missing,
                self.path.display()
            )));
        }

        Ok(headers
            .iter()
            .map(|header| {
                let role = if targets.iter().any(|t| t == header) {
                    Role::Target
                } else {
                    Role::Feature
                };
                Variable::new(header, role, Kind::Other)
            })
            .collect())
    }
}

impl DatasetSource for LocalCsv {
    fn fetch(&self, id: u32) -> Result<Dataset> {
        tracing::info!("reading dataset from {}", self.path.display());
        let text = fs::read_to_string(&self.path)?;
        let headers = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes())
            .headers()?
            .clone();
        let variables = self.variables(&headers)?;

        let name = self
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        dataset_from_csv(id, &name, text.as_bytes(), &variables)
    }
}
