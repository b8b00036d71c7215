//! `package.json` handling: the source manifest and its publishable form.
//!
//! [`Manifest`] reads the project's manifest and remembers the order of its
//! top-level keys. [`Manifest::into_dist`] turns it into a [`DistManifest`],
//! which by construction cannot carry dependency lists and is written back
//! with the surviving keys in their original order.

use crate::config::PackageSettings;
use crate::error::{BuildError, Result};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Project manifest as found on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Every field this crate does not interpret, in file order
    #[serde(flatten)]
    pub other: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engines: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Map<String, Value>>,

    #[serde(
        default,
        rename = "devDependencies",
        skip_serializing_if = "Option::is_none"
    )]
    pub dev_dependencies: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    /// Top-level keys as they appeared in the file
    #[serde(skip)]
    key_order: Vec<String>,
}

/// Manifest published from the distribution directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,

    pub bin: String,

    pub engines: Engines,

    pub scripts: DistScripts,

    pub files: Vec<String>,

    #[serde(skip)]
    key_order: Vec<String>,
}

/// `engines` with a mandatory `node` constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engines {
    pub node: String,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// The single script a published package runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistScripts {
    #[serde(rename = "prepublishOnly")]
    pub prepublish_only: String,
}

impl Manifest {
    /// Read and parse a manifest file.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).await?;
        serde_json::from_str(&text)
            .and_then(Self::from_value)
            .map_err(|source| BuildError::Json {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Convert a parsed document, recording its key order.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let key_order = match &value {
            Value::Object(fields) => fields.keys().cloned().collect(),
            _ => Vec::new(),
        };
        let mut manifest: Self = serde_json::from_value(value)?;
        manifest.key_order = key_order;
        Ok(manifest)
    }

    /// The `version` field, required for the issue template.
    pub fn require_version(&self, path: &Path) -> Result<&str> {
        self.version
            .as_deref()
            .ok_or_else(|| BuildError::MissingField {
                path: path.to_path_buf(),
                field: "version",
            })
    }

    /// Build the publishable manifest.
    ///
    /// Dependency lists are dropped, `bin`, `engines.node`, `scripts` and
    /// `files` are overwritten from `settings`. Other engine constraints and
    /// all uninterpreted fields are kept.
    pub fn into_dist(self, settings: &PackageSettings) -> DistManifest {
        let mut engine_other = self.engines.unwrap_or_default();
        engine_other.remove("node");

        DistManifest {
            name: self.name,
            version: self.version,
            other: self.other,
            bin: settings.bin.clone(),
            engines: Engines {
                node: settings.node_engine.clone(),
                other: engine_other,
            },
            scripts: DistScripts {
                prepublish_only: settings.prepublish_only.clone(),
            },
            files: settings.files.clone(),
            key_order: self.key_order,
        }
    }
}

impl DistManifest {
    /// JSON document with keys from the source manifest first, in source
    /// order, followed by fields the source did not have.
    pub fn to_ordered_value(&self) -> serde_json::Result<Value> {
        let fields = match serde_json::to_value(self)? {
            Value::Object(fields) => fields,
            other => return Ok(other),
        };

        let mut ordered = Map::with_capacity(fields.len());
        for key in &self.key_order {
            if let Some(value) = fields.get(key) {
                ordered.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in fields {
            if !ordered.contains_key(&key) {
                ordered.insert(key, value);
            }
        }
        Ok(Value::Object(ordered))
    }

    /// Pretty JSON with two-space indentation and a trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut text = serde_json::to_string_pretty(&self.to_ordered_value()?)?;
        text.push('\n');
        Ok(text)
    }
}

/// Writes `<dist>/package.json` and copies the readme next to it.
///
/// Returns the manifest that was written.
pub async fn finalize_package(
    root: &Path,
    dist_dir: &Path,
    settings: &PackageSettings,
) -> Result<DistManifest> {
    let source = root.join(&settings.manifest);
    log::debug!("Preparing publishable manifest from {}", source.display());

    let dist = Manifest::load(&source).await?.into_dist(settings);

    let target: PathBuf = dist_dir.join("package.json");
    let json = dist.to_json().map_err(|source| BuildError::Json {
        path: target.clone(),
        source,
    })?;
    fs::write(&target, json).await?;

    let readme_name = settings
        .readme
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("README.md"));
    fs::copy_file(&root.join(&settings.readme), &dist_dir.join(readme_name)).await?;

    log::info!("Wrote {}", target.display());
    Ok(dist)
}
