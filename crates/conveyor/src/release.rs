//! Conversion of index release data into warehouse payloads.
//!
//! Input records have the shape of the index's `release_data` result, with an
//! optional `files` member holding what `release_urls` returned (a single
//! file object or a list of them). Free-text fields go through
//! [`pop_normalized_json`], requirement strings through [`split_meta`] and
//! URLs through [`canonicalize`].
//!
//! Individual requirement strings and URLs that fail to parse are logged and
//! dropped; a record without a name or version fails as a whole.

use crate::config::WarehouseConfig;
use crate::error::{ConveyorError, Result};
use conveyor_core::{
    Blank, CanonicalUrl, MetaRecord, canonicalize, pop_normalized_json, split_meta,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// URL fields of a release and the labels they are published under.
const URI_FIELDS: [(&str, &str); 4] = [
    ("home_page", "Home page"),
    ("download_url", "Download"),
    ("bugtrack_url", "Bug tracker"),
    ("docs_url", "Documentation"),
];

/// Payload creating a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseProject {
    pub name: String,
}

/// Payload creating one version of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseVersion {
    /// Resource URI of the owning project
    pub project: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_python: Option<String>,
    pub classifiers: Vec<String>,
    /// Canonicalized URLs keyed by display label
    pub uris: BTreeMap<String, CanonicalUrl>,
    pub requires: Vec<MetaRecord>,
    pub provides: Vec<MetaRecord>,
    pub obsoletes: Vec<MetaRecord>,
    pub requires_external: Vec<String>,
}

/// Payload creating one downloadable file of a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseFile {
    /// Resource URI of the owning version
    pub version: String,
    pub filename: String,
    pub url: CanonicalUrl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5_digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Everything one release record converts into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseRelease {
    pub project: WarehouseProject,
    pub version: WarehouseVersion,
    pub files: Vec<WarehouseFile>,
}

/// Normalizes a `files` member into a list of file objects.
///
/// # Examples
///
/// ```
/// use conveyor::release::release_files;
/// use serde_json::json;
///
/// assert_eq!(release_files(json!({"filename": "a.tar.gz"})).unwrap().len(), 1);
/// assert_eq!(release_files(json!([{}, {}])).unwrap().len(), 2);
/// assert!(release_files(json!(null)).unwrap().is_empty());
/// assert!(release_files(json!("a.tar.gz")).is_err());
/// ```
pub fn release_files(value: Value) -> Result<Vec<Map<String, Value>>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(file) => Ok(vec![file]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(file) => Ok(file),
                other => Err(ConveyorError::UnexpectedFiles {
                    kind: json_kind(&other),
                }),
            })
            .collect(),
        other => Err(ConveyorError::UnexpectedFiles {
            kind: json_kind(&other),
        }),
    }
}

/// Builds the project payload from a release record.
pub fn to_warehouse_project(release: &Map<String, Value>) -> Result<WarehouseProject> {
    let name = release
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_blank())
        .ok_or(ConveyorError::MissingField { field: "name" })?;

    Ok(WarehouseProject {
        name: name.to_string(),
    })
}

/// Builds the version payload from a release record.
pub fn to_warehouse_version(
    mut release: Map<String, Value>,
    project_uri: &str,
) -> Result<WarehouseVersion> {
    let version = take_string(&mut release, "version")
        .ok_or(ConveyorError::MissingField { field: "version" })?;
    let name = take_string(&mut release, "name").unwrap_or_default();

    let mut uris = BTreeMap::new();
    for (field, label) in URI_FIELDS {
        let Some(raw) = take_string(&mut release, field) else {
            continue;
        };
        match canonicalize(&raw) {
            Ok(url) => {
                uris.insert(label.to_string(), url);
            }
            Err(e) => {
                tracing::warn!("Skipping {} of {} {}: {}", field, name, version, e);
            }
        }
    }

    Ok(WarehouseVersion {
        project: project_uri.to_string(),
        summary: take_string(&mut release, "summary"),
        description: take_string(&mut release, "description"),
        author: take_string(&mut release, "author"),
        author_email: take_string(&mut release, "author_email"),
        maintainer: take_string(&mut release, "maintainer"),
        maintainer_email: take_string(&mut release, "maintainer_email"),
        license: take_string(&mut release, "license"),
        keywords: take_string(&mut release, "keywords"),
        platform: take_string(&mut release, "platform"),
        requires_python: take_string(&mut release, "requires_python"),
        classifiers: take_strings(&mut release, "classifiers"),
        uris,
        requires: take_meta(&mut release, "requires_dist", &name),
        provides: take_meta(&mut release, "provides_dist", &name),
        obsoletes: take_meta(&mut release, "obsoletes_dist", &name),
        requires_external: take_strings(&mut release, "requires_external"),
        version,
    })
}

/// Builds a file payload from one entry of the release's files.
pub fn to_warehouse_file(mut file: Map<String, Value>, version_uri: &str) -> Result<WarehouseFile> {
    let raw_url =
        take_string(&mut file, "url").ok_or(ConveyorError::MissingField { field: "url" })?;
    let filename = take_string(&mut file, "filename")
        .ok_or(ConveyorError::MissingField { field: "filename" })?;

    Ok(WarehouseFile {
        version: version_uri.to_string(),
        url: canonicalize(&raw_url)?,
        filename,
        filetype: take_string(&mut file, "packagetype"),
        python_version: take_string(&mut file, "python_version"),
        size: pop_normalized_json(&mut file, "size", Value::Null).as_u64(),
        md5_digest: take_string(&mut file, "md5_digest"),
        comment: take_string(&mut file, "comment_text"),
    })
}

/// Converts one release record into project, version and file payloads.
///
/// Files that cannot be converted are logged and left out.
pub fn convert_release(
    mut release: Map<String, Value>,
    warehouse: &WarehouseConfig,
) -> Result<WarehouseRelease> {
    let files = release_files(release.remove("files").unwrap_or(Value::Null))?;
    let project = to_warehouse_project(&release)?;
    let version = to_warehouse_version(release, &warehouse.project_uri(&project.name))?;
    let version_uri = warehouse.version_uri(&project.name, &version.version);

    let files = files
        .into_iter()
        .filter_map(|file| match to_warehouse_file(file, &version_uri) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(
                    "Skipping file of {} {}: {}",
                    project.name,
                    version.version,
                    e
                );
                None
            }
        })
        .collect();

    tracing::debug!(
        project = %project.name,
        version = %version.version,
        "Converted release"
    );

    Ok(WarehouseRelease {
        project,
        version,
        files,
    })
}

/// Pops a normalized value as text; non-string scalars are rendered as JSON.
fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match pop_normalized_json(map, key, Value::Null) {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_blank()),
        other => Some(other.to_string()),
    }
}

/// Pops a normalized list of strings, dropping blank entries.
fn take_strings(map: &mut Map<String, Value>, key: &str) -> Vec<String> {
    match pop_normalized_json(map, key, Value::Null) {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_blank() => Some(s.trim().to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) if !s.trim().is_blank() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Pops a list of requirement strings and splits each one.
fn take_meta(map: &mut Map<String, Value>, key: &str, release: &str) -> Vec<MetaRecord> {
    take_strings(map, key)
        .iter()
        .filter_map(|meta| match split_meta(meta) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping {} entry of {}: {}", key, release, e);
                None
            }
        })
        .collect()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
