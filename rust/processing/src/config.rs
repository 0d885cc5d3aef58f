// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion configuration loaded from environment variables.

use serde::{Deserialize, Serialize};

/// Which property sets win when instance and type define the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyPrecedence {
    /// Type-level sets are applied last and overwrite instance values
    #[default]
    TypeWins,
    /// Instance-level sets are applied last and overwrite type values
    InstanceWins,
}

impl PropertyPrecedence {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "type" | "type_wins" => Some(PropertyPrecedence::TypeWins),
            "instance" | "instance_wins" => Some(PropertyPrecedence::InstanceWins),
            _ => None,
        }
    }
}

/// Conversion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Overwrite order for flattened property sets.
    pub property_precedence: PropertyPrecedence,
    /// Sub-context identifiers whose geometry is tessellated.
    pub body_context_identifiers: Vec<String>,
    /// Threads the geometry enumeration may use.
    pub worker_threads: usize,
    /// Name of the project created when writing IFC.
    pub project_name: String,
    /// Name of the site created when writing IFC.
    pub site_name: String,
    /// Property set holding the .bim info map when writing IFC.
    pub info_pset_name: String,
}

impl ConvertConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::defaults();
        Self {
            property_precedence: std::env::var("DOTBIM_PROPERTY_PRECEDENCE")
                .ok()
                .and_then(|v| PropertyPrecedence::parse(&v))
                .unwrap_or(defaults.property_precedence),
            body_context_identifiers: std::env::var("DOTBIM_BODY_CONTEXTS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.body_context_identifiers),
            worker_threads: std::env::var("DOTBIM_WORKER_THREADS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.worker_threads),
            project_name: std::env::var("DOTBIM_PROJECT_NAME").unwrap_or(defaults.project_name),
            site_name: std::env::var("DOTBIM_SITE_NAME").unwrap_or(defaults.site_name),
            info_pset_name: std::env::var("DOTBIM_INFO_PSET").unwrap_or(defaults.info_pset_name),
        }
    }

    /// Built-in defaults, ignoring the environment.
    pub fn defaults() -> Self {
        Self {
            property_precedence: PropertyPrecedence::TypeWins,
            body_context_identifiers: vec!["Body".into(), "Facetation".into()],
            worker_threads: num_cpus::get(),
            project_name: "Project".into(),
            site_name: "Site".into(),
            info_pset_name: "Dotbim_Info".into(),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConvertConfig::defaults();
        assert_eq!(config.property_precedence, PropertyPrecedence::TypeWins);
        assert_eq!(config.body_context_identifiers, vec!["Body", "Facetation"]);
        assert!(config.worker_threads >= 1);
        assert_eq!(config.info_pset_name, "Dotbim_Info");
    }

    #[test]
    fn test_parse_precedence() {
        assert_eq!(PropertyPrecedence::parse("Instance"), Some(PropertyPrecedence::InstanceWins));
        assert_eq!(PropertyPrecedence::parse(" type "), Some(PropertyPrecedence::TypeWins));
        assert_eq!(PropertyPrecedence::parse("both"), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ConvertConfig =
            serde_json::from_str(r#"{"property_precedence": "instance_wins", "site_name": "Lot 4"}"#)
                .unwrap();
        assert_eq!(config.property_precedence, PropertyPrecedence::InstanceWins);
        assert_eq!(config.site_name, "Lot 4");
        assert_eq!(config.project_name, "Project");
    }
}
