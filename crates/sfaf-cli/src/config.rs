//! # Engine Configuration
//!
//! Optional YAML file selected with `--config`. Every key may be omitted:
//!
//! ```yaml
//! system: "SFAF Plotter"
//! reference_data: data/reference.json
//! reference_year: 2026
//! required_fields: [field005, field010]
//! severity:
//!   field113: error
//!   field005: warning
//! ```
//!
//! A relative `reference_data` path is resolved against the directory of
//! the configuration file. Unknown field ids and severities are rejected
//! when the engine is built, not silently ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use sfaf_core::{FieldNumber, FieldSpecTable, SfafError};
use sfaf_format::SfafExporter;
use sfaf_rules::{ReferenceLoader, Severity, SeverityPolicy, SfafValidator};

use crate::resolve_path;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Exporter `System:` identifier.
    pub system: Option<String>,
    /// Reference bundle (JSON) extending the built-in lists.
    pub reference_data: Option<PathBuf>,
    /// Year used for date plausibility checks; the current year when unset.
    pub reference_year: Option<i32>,
    /// Fields that must carry a value, as `fieldNNN` or `NNN`.
    pub required_fields: Vec<String>,
    /// Per-field severity for list-membership checks.
    pub severity: BTreeMap<String, String>,
}

impl EngineConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;

        if let (Some(data), Some(dir)) = (&config.reference_data, path.parent()) {
            config.reference_data = Some(resolve_path(data, dir));
        }
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// The MCEB field table with configured required fields applied.
    pub fn table(&self) -> Result<FieldSpecTable, SfafError> {
        let mut table = FieldSpecTable::mceb();
        for id in &self.required_fields {
            let field = FieldNumber::from_str(id)?;
            if !table.require(field) {
                return Err(SfafError::Config(format!(
                    "required field {id} is not in the field table"
                )));
            }
        }
        Ok(table)
    }

    /// The severity overrides.
    pub fn policy(&self) -> Result<SeverityPolicy, SfafError> {
        let mut policy = SeverityPolicy::new();
        for (id, severity) in &self.severity {
            let field = FieldNumber::from_str(id)?;
            policy.set(field, Severity::from_str(severity)?);
        }
        Ok(policy)
    }

    /// Loader for the configured reference bundle.
    pub fn reference_loader(&self) -> ReferenceLoader {
        ReferenceLoader::new(self.reference_data.clone())
    }

    /// Build the validator once for the whole invocation.
    pub fn build_validator(&self) -> Result<SfafValidator> {
        let mut validator = SfafValidator::new(self.table()?)
            .context("failed to compile validation rules")?
            .with_policy(self.policy()?);
        if self.reference_data.is_some() {
            validator = validator.with_reference_data(self.reference_loader().get());
        }
        if let Some(year) = self.reference_year {
            validator = validator.with_reference_year(year);
        }
        Ok(validator)
    }

    /// Exporter with the configured `System:` identifier.
    pub fn exporter(&self) -> Result<SfafExporter> {
        let exporter = SfafExporter::new(self.table()?);
        Ok(match &self.system {
            Some(system) => exporter.with_system(system.clone()),
            None => exporter,
        })
    }
}
