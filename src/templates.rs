//! # Template Loading
//!
//! The organization's canonical configuration is a directory of template
//! documents, one per ecosystem. Two layouts are accepted side by side:
//!
//! ```text
//! configs/
//! ├── npm/default.yml       # <name>/default.yml or <name>/default.yaml
//! ├── golang/default.yml    # directory names may be aliases
//! └── docker.yml            # or a single <name>.yml / <name>.yaml file
//! ```
//!
//! Directory and file names are mapped to ecosystem tags through
//! [`TEMPLATE_ALIASES`]; any other name is taken as the tag itself. Rules in a
//! template that leave `package-ecosystem` empty inherit the tag.

use crate::config::{self, DependabotConfig};
use crate::error::{Error, Result};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// Directory names that differ from the ecosystem tag they configure
pub const TEMPLATE_ALIASES: &[(&str, &str)] = &[
    ("golang", "gomod"),
    ("python", "pip"),
    ("actions", "github-actions"),
    ("elixir", "mix"),
];

/// File names tried inside a per-ecosystem template directory
const DEFAULT_TEMPLATE_FILES: &[&str] = &["default.yml", "default.yaml"];

/// Map a template directory name to the ecosystem tag it configures
///
/// # Examples
///
/// ```
/// use dependabot_sync::templates::ecosystem_for_name;
///
/// assert_eq!(ecosystem_for_name("golang"), "gomod");
/// assert_eq!(ecosystem_for_name("npm"), "npm");
/// ```
pub fn ecosystem_for_name(name: &str) -> &str {
    TEMPLATE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, tag)| *tag)
        .unwrap_or(name)
}

/// Template documents keyed by ecosystem tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateSet {
    templates: BTreeMap<String, DependabotConfig>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the template for `ecosystem`, replacing any previous one
    pub fn insert(&mut self, ecosystem: impl Into<String>, mut template: DependabotConfig) {
        let ecosystem = ecosystem.into();
        for rule in &mut template.updates {
            if rule.package_ecosystem.is_empty() {
                rule.package_ecosystem = ecosystem.clone();
            }
        }
        self.templates.insert(ecosystem, template);
    }

    pub fn get(&self, ecosystem: &str) -> Option<&DependabotConfig> {
        self.templates.get(ecosystem)
    }

    pub fn contains(&self, ecosystem: &str) -> bool {
        self.templates.contains_key(ecosystem)
    }

    /// Ecosystem tags that have a template, in sorted order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Templates with their tags, in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DependabotConfig)> {
        self.templates.iter().map(|(tag, doc)| (tag.as_str(), doc))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Load every template found directly under `dir`
    ///
    /// Entries are visited in file-name order. When two entries map to the same
    /// tag (`golang/` and `gomod/`, say) the first one is kept. Templates with
    /// no update rules are skipped, so their ecosystem counts as untemplated.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::TemplateLoad {
                path: dir.display().to_string(),
                message: "template directory not found".to_string(),
            });
        }

        let mut set = Self::new();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let (tag, file) = if entry.file_type().is_dir() {
                let Some(file) = DEFAULT_TEMPLATE_FILES
                    .iter()
                    .map(|f| path.join(f))
                    .find(|candidate| candidate.is_file())
                else {
                    debug!("No default template in {}", path.display());
                    continue;
                };
                (ecosystem_for_name(name).to_string(), file)
            } else if let Some(stem) = name
                .strip_suffix(".yml")
                .or_else(|| name.strip_suffix(".yaml"))
            {
                (ecosystem_for_name(stem).to_string(), path.to_path_buf())
            } else {
                continue;
            };

            if set.contains(&tag) {
                warn!(
                    "Ignoring {}: a template for {} is already loaded",
                    file.display(),
                    tag
                );
                continue;
            }

            let template = load_file(&file)?;
            if template.updates.is_empty() {
                warn!("Ignoring {}: template has no update rules", file.display());
                continue;
            }
            debug!(
                "Loaded template for {} ({} rules) from {}",
                tag,
                template.updates.len(),
                file.display()
            );
            set.insert(tag, template);
        }

        Ok(set)
    }
}

/// Parse one template file
pub fn load_file(path: &Path) -> Result<DependabotConfig> {
    let content = std::fs::read_to_string(path).map_err(|err| Error::TemplateLoad {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    config::parse(&content).map_err(|err| Error::TemplateLoad {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}
