//! Platform description: the sites and clusters a form is rendered from.
//!
//! A platform is read from a TOML or JSON file:
//!
//! ```toml
//! name = "grid5000"
//!
//! [[sites]]
//! name = "rennes"
//! clusters = ["paradent", "parapluie"]
//! ```
//!
//! Without a file the built-in Grid'5000 description is used.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Name of the root resource group when none is given
pub const DEFAULT_PLATFORM_NAME: &str = "grid5000";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteSpec {
    pub name: String,
    #[serde(default)]
    pub clusters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Platform {
    #[serde(default = "default_platform_name")]
    pub name: String,

    #[serde(default)]
    pub sites: Vec<SiteSpec>,
}

fn default_platform_name() -> String {
    DEFAULT_PLATFORM_NAME.to_string()
}

/// Built-in site/cluster layout
const BUILTIN_SITES: &[(&str, &[&str])] = &[
    ("bordeaux", &["bordemer", "bordeplage", "bordereau"]),
    ("grenoble", &["adonis", "edel", "genepi"]),
    ("lille", &["chicon", "chimint", "chinqchint", "chirloute"]),
    ("luxembourg", &["granduc", "petitprince"]),
    ("lyon", &["hercule", "orion", "sagittaire", "taurus"]),
    ("nancy", &["graphene", "griffon"]),
    ("reims", &["stremi"]),
    ("rennes", &["paradent", "parapide", "parapluie", "paranoia"]),
    ("sophia", &["helios", "sol", "suno"]),
    ("toulouse", &["pastel"]),
];

impl Default for Platform {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Platform {
    /// The built-in Grid'5000 description
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            name: default_platform_name(),
            sites: BUILTIN_SITES
                .iter()
                .map(|(site, clusters)| SiteSpec {
                    name: (*site).to_string(),
                    clusters: clusters.iter().map(|c| (*c).to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Load a platform file. `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read platform file '{}'", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let platform: Platform = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse platform file '{}'", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse platform file '{}'", path.display()))?
        };

        platform.validate()?;
        tracing::debug!(
            path = %path.display(),
            sites = platform.sites.len(),
            "loaded platform description"
        );
        Ok(platform)
    }

    /// Load from `path` when given, otherwise use the built-in description
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Check that names are non-empty and site names are unique
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Platform name must not be empty");
        }

        let mut seen = HashSet::new();
        for site in &self.sites {
            if site.name.trim().is_empty() {
                bail!("Site names must not be empty");
            }
            if !seen.insert(site.name.as_str()) {
                bail!("Site '{}' is declared more than once", site.name);
            }
            if let Some(cluster) = site.clusters.iter().find(|c| c.trim().is_empty()) {
                bail!("Site '{}' has an empty cluster name '{}'", site.name, cluster);
            }
        }

        Ok(())
    }

    /// Total number of clusters across all sites
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.sites.iter().map(|s| s.clusters.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_platform_is_valid() {
        let platform = Platform::builtin();
        assert!(platform.validate().is_ok());
        assert_eq!(platform.name, "grid5000");
        assert!(platform.sites.iter().any(|s| s.name == "rennes"));
        // single-cluster sites exist in the built-in layout
        assert!(platform.sites.iter().any(|s| s.clusters.len() == 1));
    }

    #[test]
    fn test_parse_toml_platform() {
        let content = r#"
            name = "testbed"

            [[sites]]
            name = "rennes"
            clusters = ["paradent", "parapluie"]

            [[sites]]
            name = "reims"
            clusters = ["stremi"]
        "#;
        let platform: Platform = toml::from_str(content).unwrap();
        assert_eq!(platform.name, "testbed");
        assert_eq!(platform.sites.len(), 2);
        assert_eq!(platform.cluster_count(), 3);
    }

    #[test]
    fn test_parse_json_platform_defaults() {
        let platform: Platform =
            serde_json::from_str(r#"{"sites": [{"name": "lyon"}]}"#).unwrap();
        assert_eq!(platform.name, DEFAULT_PLATFORM_NAME);
        assert!(platform.sites[0].clusters.is_empty());
    }

    #[test]
    fn test_validate_duplicate_site() {
        let platform = Platform {
            name: "grid5000".to_string(),
            sites: vec![
                SiteSpec { name: "lyon".to_string(), clusters: vec![] },
                SiteSpec { name: "lyon".to_string(), clusters: vec![] },
            ],
        };
        let err = platform.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_empty_cluster_name() {
        let platform = Platform {
            name: "grid5000".to_string(),
            sites: vec![SiteSpec {
                name: "lyon".to_string(),
                clusters: vec![" ".to_string()],
            }],
        };
        assert!(platform.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Platform::load(Path::new("/nonexistent/platform.toml")).unwrap_err();
        assert!(err.to_string().contains("Could not read platform file"));
    }

    #[test]
    fn test_load_or_builtin_without_path() {
        let platform = Platform::load_or_builtin(None).unwrap();
        assert_eq!(platform, Platform::builtin());
    }
}
