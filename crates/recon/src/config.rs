use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schema::{FieldAliases, FieldConcept};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Engine configuration. Every key is optional; missing keys take the
/// defaults for ad-platform lead exports (source) and CRM exports (reference).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Written to the reference tag field of every projected record.
    pub origin_marker: String,
    pub source: SourceAliases,
    pub reference: ReferenceAliases,
    pub projection: ProjectionLabels,
    pub export: ExportNames,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            origin_marker: "Facebook Lead".into(),
            source: SourceAliases::default(),
            reference: ReferenceAliases::default(),
            projection: ProjectionLabels::default(),
            export: ExportNames::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Aliases
// ---------------------------------------------------------------------------

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Header aliases of the dataset being checked, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceAliases {
    pub email: Vec<String>,
    pub phone: Vec<String>,
    pub name: Vec<String>,
}

impl Default for SourceAliases {
    fn default() -> Self {
        Self {
            email: strings(&["email", "Email", "EMAIL"]),
            phone: strings(&["phone_number", "phone", "Phone", "PHONE"]),
            name: strings(&["full_name", "name", "Name", "FULL_NAME"]),
        }
    }
}

impl FieldAliases for SourceAliases {
    fn aliases(&self, concept: FieldConcept) -> &[String] {
        match concept {
            FieldConcept::Email => &self.email,
            FieldConcept::Phone => &self.phone,
            FieldConcept::Name => &self.name,
        }
    }
}

/// Header aliases of the authoritative dataset, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceAliases {
    pub email: Vec<String>,
    pub phone: Vec<String>,
}

impl Default for ReferenceAliases {
    fn default() -> Self {
        Self {
            email: strings(&["Email", "email", "EMAIL"]),
            phone: strings(&["Phone", "phone", "PHONE"]),
        }
    }
}

impl FieldAliases for ReferenceAliases {
    fn aliases(&self, concept: FieldConcept) -> &[String] {
        match concept {
            FieldConcept::Email => &self.email,
            FieldConcept::Phone => &self.phone,
            FieldConcept::Name => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Projection + Export
// ---------------------------------------------------------------------------

/// Literal reference field names filled when projecting a source record.
/// Each is only written when the reference schema declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionLabels {
    pub first_name: String,
    pub last_name: String,
    pub tags: String,
}

impl Default for ProjectionLabels {
    fn default() -> Self {
        Self {
            first_name: "First Name".into(),
            last_name: "Last Name".into(),
            tags: "Tags".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportNames {
    pub missing_filename: String,
    pub combined_filename: String,
}

impl Default for ExportNames {
    fn default() -> Self {
        Self {
            missing_filename: "missing_facebook_leads.csv".into(),
            combined_filename: "combined_leads.csv".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_aliases("source.email", &self.source.email)?;
        check_aliases("source.phone", &self.source.phone)?;
        check_aliases("source.name", &self.source.name)?;
        check_aliases("reference.email", &self.reference.email)?;
        check_aliases("reference.phone", &self.reference.phone)?;

        let labels = [
            ("projection.first_name", &self.projection.first_name),
            ("projection.last_name", &self.projection.last_name),
            ("projection.tags", &self.projection.tags),
            ("export.missing_filename", &self.export.missing_filename),
            ("export.combined_filename", &self.export.combined_filename),
        ];
        for (key, value) in labels {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }

        if self.export.missing_filename == self.export.combined_filename {
            return Err(ConfigError::Validation(
                "export.missing_filename and export.combined_filename must differ".into(),
            ));
        }

        Ok(())
    }
}

fn check_aliases(key: &str, aliases: &[String]) -> Result<(), ConfigError> {
    if aliases.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{key} needs at least one alias"
        )));
    }
    if aliases.iter().any(|a| a.is_empty()) {
        return Err(ConfigError::Validation(format!(
            "{key} contains an empty alias"
        )));
    }
    Ok(())
}
