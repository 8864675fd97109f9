//! Indicator catalog
//!
//! The catalog maps each ecosystem tag to the file patterns that reveal it and
//! how conclusive each pattern is. It is plain data: adding an ecosystem means
//! adding an entry, not touching the detection algorithm. The built-in table
//! can be replaced by a YAML file with the same shape:
//!
//! ```yaml
//! - ecosystem: npm
//!   indicators:
//!     - { pattern: package-lock.json, weight: 1.0 }
//!     - { pattern: package.json, weight: 0.8 }
//! - ecosystem: docker
//!   root-only: true
//!   indicators:
//!     - { pattern: "Dockerfile.*", weight: 0.9 }
//! ```

use crate::error::{Error, Result};
use crate::path::{matches_indicator, PathMatcher};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// A file pattern and how strongly it signals its ecosystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub pattern: String,
    /// Confidence in (0, 1]
    pub weight: f64,
    /// Compiled `pattern`, filled in when the catalog is built
    #[serde(skip)]
    matcher: Option<PathMatcher>,
}

impl Indicator {
    pub fn new(pattern: impl Into<String>, weight: f64) -> Self {
        let pattern = pattern.into();
        let matcher = PathMatcher::new(&pattern).ok();
        Self {
            pattern,
            weight,
            matcher,
        }
    }

    pub fn matcher(&self) -> Option<&PathMatcher> {
        self.matcher.as_ref()
    }

    /// Whether `path` is evidence for this indicator
    pub fn matches(&self, path: &str) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.matches(path),
            None => matches_indicator(path, &self.pattern),
        }
    }
}

/// All indicators for one ecosystem tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EcosystemIndicators {
    pub ecosystem: String,
    /// Configured once for the whole repository, always at `/`
    #[serde(default)]
    pub root_only: bool,
    pub indicators: Vec<Indicator>,
}

/// Read-only table of ecosystems and their indicators
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorCatalog {
    entries: Vec<EcosystemIndicators>,
}

type BuiltinEntry = (&'static str, bool, &'static [(&'static str, f64)]);

const BUILTIN: &[BuiltinEntry] = &[
    (
        "npm",
        false,
        &[
            ("package-lock.json", 1.0),
            ("yarn.lock", 1.0),
            ("pnpm-lock.yaml", 1.0),
            ("package.json", 0.8),
        ],
    ),
    ("gomod", false, &[("go.sum", 1.0), ("go.mod", 0.9)]),
    (
        "pip",
        false,
        &[
            ("poetry.lock", 1.0),
            ("Pipfile.lock", 1.0),
            ("requirements.txt", 0.8),
            ("setup.py", 0.7),
            ("pyproject.toml", 0.9),
        ],
    ),
    (
        "docker",
        true,
        &[
            ("Dockerfile", 0.9),
            ("docker-compose.yml", 0.8),
            ("docker-compose.yaml", 0.8),
            ("Dockerfile.*", 0.9),
        ],
    ),
    ("maven", false, &[("pom.xml", 0.9)]),
    (
        "gradle",
        false,
        &[
            ("gradle.lock", 1.0),
            ("build.gradle", 0.8),
            ("build.gradle.kts", 0.8),
        ],
    ),
    ("bundler", false, &[("Gemfile.lock", 1.0), ("Gemfile", 0.8)]),
    ("cargo", false, &[("Cargo.lock", 1.0), ("Cargo.toml", 0.8)]),
    (
        "composer",
        false,
        &[("composer.lock", 1.0), ("composer.json", 0.8)],
    ),
    (
        "nuget",
        false,
        &[
            ("packages.config", 0.8),
            ("*.csproj", 0.7),
            ("*.fsproj", 0.7),
            ("*.vbproj", 0.7),
        ],
    ),
    (
        "github-actions",
        true,
        &[
            (".github/workflows/*.yml", 0.9),
            (".github/workflows/*.yaml", 0.9),
        ],
    ),
    (
        "terraform",
        true,
        &[("*.tf", 0.8), (".terraform.lock.hcl", 1.0)],
    ),
    ("elm", false, &[("elm.json", 0.9), ("elm-package.json", 0.8)]),
    ("gitsubmodule", true, &[(".gitmodules", 0.9)]),
    ("pub", false, &[("pubspec.yaml", 0.9), ("pubspec.lock", 1.0)]),
    ("mix", false, &[("mix.exs", 0.9), ("mix.lock", 1.0)]),
];

impl Default for IndicatorCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IndicatorCatalog {
    /// The catalog shipped with the tool
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(ecosystem, root_only, indicators)| EcosystemIndicators {
                ecosystem: (*ecosystem).to_string(),
                root_only: *root_only,
                indicators: indicators
                    .iter()
                    .map(|(pattern, weight)| Indicator::new(*pattern, *weight))
                    .collect(),
            })
            .collect();
        Self { entries }
    }

    /// Build a catalog from explicit entries, validating and compiling each one
    pub fn from_entries(mut entries: Vec<EcosystemIndicators>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for entry in &mut entries {
            if !seen.insert(entry.ecosystem.clone()) {
                return Err(Error::Catalog {
                    ecosystem: entry.ecosystem.clone(),
                    message: "ecosystem is listed more than once".to_string(),
                });
            }
            validate_entry(entry)?;
        }
        Ok(Self { entries })
    }

    /// Parse a catalog from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        let entries: Vec<EcosystemIndicators> = serde_yaml::from_str(content)?;
        Self::from_entries(entries)
    }

    /// Load a catalog from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn entries(&self) -> &[EcosystemIndicators] {
        &self.entries
    }

    pub fn get(&self, ecosystem: &str) -> Option<&EcosystemIndicators> {
        self.entries.iter().find(|e| e.ecosystem == ecosystem)
    }

    pub fn is_root_only(&self, ecosystem: &str) -> bool {
        self.get(ecosystem).is_some_and(|e| e.root_only)
    }

    /// Tags whose rules are always placed at `/`
    pub fn root_only_tags(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .filter(|e| e.root_only)
            .map(|e| e.ecosystem.clone())
            .collect()
    }

    /// Every ecosystem tag in catalog order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.ecosystem.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_entry(entry: &mut EcosystemIndicators) -> Result<()> {
    let ecosystem = entry.ecosystem.clone();
    let fail = |message: String| Error::Catalog {
        ecosystem: ecosystem.clone(),
        message,
    };

    if entry.ecosystem.trim().is_empty() {
        return Err(fail("ecosystem tag is empty".to_string()));
    }
    if entry.indicators.is_empty() {
        return Err(fail("no indicators listed".to_string()));
    }
    for indicator in &mut entry.indicators {
        if !(indicator.weight > 0.0 && indicator.weight <= 1.0) {
            return Err(fail(format!(
                "weight {} for '{}' is outside (0, 1]",
                indicator.weight, indicator.pattern
            )));
        }
        let matcher = PathMatcher::new(&indicator.pattern)
            .map_err(|err| fail(format!("invalid pattern '{}': {}", indicator.pattern, err)))?;
        indicator.matcher = Some(matcher);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = IndicatorCatalog::builtin();
        let rebuilt = IndicatorCatalog::from_entries(builtin.entries().to_vec()).unwrap();
        assert_eq!(builtin, rebuilt);
        assert!(builtin.len() >= 15);
    }

    #[test]
    fn test_builtin_root_only_tags() {
        let catalog = IndicatorCatalog::builtin();
        let root_only: Vec<String> = catalog.root_only_tags().into_iter().collect();
        assert_eq!(
            root_only,
            vec!["docker", "github-actions", "gitsubmodule", "terraform"]
        );
        assert!(!catalog.is_root_only("npm"));
        assert!(!catalog.is_root_only("unknown"));
    }

    #[test]
    fn test_lock_files_carry_full_weight() {
        let catalog = IndicatorCatalog::builtin();
        let npm = catalog.get("npm").unwrap();
        let lock = npm
            .indicators
            .iter()
            .find(|i| i.pattern == "package-lock.json")
            .unwrap();
        assert_eq!(lock.weight, 1.0);
    }

    #[test]
    fn test_from_yaml() {
        let catalog = IndicatorCatalog::from_yaml(
            r#"
- ecosystem: npm
  indicators:
    - { pattern: package.json, weight: 0.8 }
- ecosystem: docker
  root-only: true
  indicators:
    - { pattern: "Dockerfile*", weight: 0.9 }
"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.is_root_only("docker"));
        assert_eq!(catalog.tags().collect::<Vec<_>>(), vec!["npm", "docker"]);
    }

    #[test]
    fn test_loaded_indicators_are_compiled() {
        let catalog = IndicatorCatalog::from_yaml(
            "- ecosystem: terraform\n  root-only: true\n  indicators:\n    - { pattern: \"*.tf\", weight: 0.8 }\n    - { pattern: .terraform.lock.hcl, weight: 1.0 }\n",
        )
        .unwrap();
        let indicators = &catalog.get("terraform").unwrap().indicators;

        assert!(matches!(indicators[0].matcher(), Some(PathMatcher::Glob(_))));
        assert!(matches!(indicators[1].matcher(), Some(PathMatcher::Literal(_))));
        assert!(indicators[0].matches("infra/main.tf"));
        assert!(indicators[1].matches(".terraform.lock.hcl"));
    }

    #[test]
    fn test_rejects_weight_out_of_range() {
        let err = IndicatorCatalog::from_yaml(
            "- ecosystem: npm\n  indicators:\n    - { pattern: package.json, weight: 1.5 }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside (0, 1]"));

        let err = IndicatorCatalog::from_yaml(
            "- ecosystem: npm\n  indicators:\n    - { pattern: package.json, weight: 0.0 }\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Catalog { .. }));
    }

    #[test]
    fn test_rejects_invalid_glob() {
        let err = IndicatorCatalog::from_yaml(
            "- ecosystem: nuget\n  indicators:\n    - { pattern: \"[*.csproj\", weight: 0.7 }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid pattern"));
    }

    #[test]
    fn test_rejects_duplicate_ecosystem() {
        let entry = EcosystemIndicators {
            ecosystem: "npm".to_string(),
            root_only: false,
            indicators: vec![Indicator::new("package.json", 0.8)],
        };
        let err = IndicatorCatalog::from_entries(vec![entry.clone(), entry]).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }
}
