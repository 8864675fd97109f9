//! # Configuration Merge Engine
//!
//! Combines the organization's template documents with a repository's
//! existing dependabot configuration, guided by the ecosystems the detector
//! found. The engine is a total function: any well-formed input produces a
//! document, and missing templates or partial existing rules are never errors.
//!
//! ## Creating (no existing document)
//!
//! Every detected ecosystem gets one rule per detected directory. With a
//! template the template rule is copied and its directory overwritten;
//! without one a minimal default rule is synthesized (weekly, `dependencies`
//! label, a limit of ten open pull requests).
//!
//! ## Reconciling (existing document present)
//!
//! For each detected ecosystem that has a template, each detected directory
//! is looked up in the existing document. Root-only ecosystems match an
//! existing rule in any directory. A match is merged field by field with the
//! template (see [`policy`]); otherwise the template is instantiated. Existing
//! rules that were not produced this way are carried forward untouched apart
//! from root-only directory normalization, so repository-specific rules and
//! ecosystems the catalog does not know survive.
//!
//! ## Determinism
//!
//! Rules are identified by (ecosystem, directory), which is unique in the
//! output: if two sources produce the same identity the first one wins. The
//! final list is sorted by ecosystem, then directory. Feeding the output back
//! in as the existing document with the same templates and detection result
//! yields an equal document.

pub mod policy;

use crate::config::{DependabotConfig, Schedule, UpdateRule};
use crate::defaults;
use crate::detector::DetectedEcosystem;
use crate::path::ROOT_DIRECTORY;
use crate::templates::TemplateSet;
use log::{debug, warn};
use std::collections::BTreeSet;

/// Merges template documents into repository configurations
#[derive(Debug, Clone)]
pub struct Merger {
    templates: TemplateSet,
    root_only: BTreeSet<String>,
}

impl Merger {
    /// Create a merger over `templates`
    ///
    /// `root_only` names the ecosystems whose rules always live at `/`,
    /// normally [`IndicatorCatalog::root_only_tags`](crate::detector::IndicatorCatalog::root_only_tags).
    pub fn new(templates: TemplateSet, root_only: BTreeSet<String>) -> Self {
        Self {
            templates,
            root_only,
        }
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn is_root_only(&self, ecosystem: &str) -> bool {
        self.root_only.contains(ecosystem)
    }

    /// Merge the templates with an optional existing document
    pub fn merge(
        &self,
        existing: Option<&DependabotConfig>,
        detected: &[DetectedEcosystem],
    ) -> DependabotConfig {
        let rules = match existing {
            None => self.create_from_templates(detected),
            Some(existing) => self.reconcile(existing, detected),
        };
        DependabotConfig::with_updates(rules.into_sorted())
    }

    fn create_from_templates(&self, detected: &[DetectedEcosystem]) -> RuleSet {
        let mut rules = RuleSet::default();

        for eco in detected {
            let template = self.template_for(&eco.ecosystem);
            for dir in &eco.directories {
                let directory = self.placement(&eco.ecosystem, dir);
                match template {
                    Some(template) => {
                        for tmpl in &template.updates {
                            rules.push(instantiate(tmpl, &eco.ecosystem, directory));
                        }
                    }
                    None => {
                        debug!(
                            "No template for {}, using default rule at {}",
                            eco.ecosystem, directory
                        );
                        rules.push(default_rule(&eco.ecosystem, directory));
                    }
                }
            }
        }

        rules
    }

    fn reconcile(&self, existing: &DependabotConfig, detected: &[DetectedEcosystem]) -> RuleSet {
        let mut rules = RuleSet::default();

        for eco in detected {
            let Some(template) = self.template_for(&eco.ecosystem) else {
                debug!("No template for {}, leaving existing rules", eco.ecosystem);
                continue;
            };
            let root_only = self.is_root_only(&eco.ecosystem);

            for dir in &eco.directories {
                let directory = self.placement(&eco.ecosystem, dir);
                let current = existing.updates.iter().find(|rule| {
                    rule.package_ecosystem == eco.ecosystem
                        && (root_only || rule.directory == *dir)
                });

                for tmpl in &template.updates {
                    let rule = match current {
                        Some(current) => {
                            let mut merged = policy::merge_rule(current, tmpl);
                            merged.package_ecosystem = eco.ecosystem.clone();
                            merged.directory = directory.to_string();
                            merged
                        }
                        None => instantiate(tmpl, &eco.ecosystem, directory),
                    };
                    rules.push(rule);
                }
            }
        }

        for rule in &existing.updates {
            let root_only = self.is_root_only(&rule.package_ecosystem);
            let covered = if root_only {
                rules.has_ecosystem(&rule.package_ecosystem)
            } else {
                rules.contains(&rule.package_ecosystem, &rule.directory)
            };
            if covered {
                continue;
            }

            let mut carried = rule.clone();
            if root_only {
                carried.directory = ROOT_DIRECTORY.to_string();
            }
            debug!(
                "Carrying forward {} at {}",
                carried.package_ecosystem, carried.directory
            );
            rules.push(carried);
        }

        rules
    }

    /// The template for `ecosystem`, if it has any rules
    fn template_for(&self, ecosystem: &str) -> Option<&DependabotConfig> {
        self.templates
            .get(ecosystem)
            .filter(|template| !template.updates.is_empty())
    }

    fn placement<'a>(&self, ecosystem: &str, directory: &'a str) -> &'a str {
        if self.is_root_only(ecosystem) {
            ROOT_DIRECTORY
        } else {
            directory
        }
    }
}

/// Copy a template rule into place
///
/// List fields are de-duplicated so a second merge pass sees the same values.
fn instantiate(template: &UpdateRule, ecosystem: &str, directory: &str) -> UpdateRule {
    let mut rule = template.clone();
    rule.package_ecosystem = ecosystem.to_string();
    rule.directory = directory.to_string();
    rule.labels = policy::union(&template.labels, &[]);
    rule.reviewers = policy::union(&template.reviewers, &[]);
    rule.assignees = policy::union(&template.assignees, &[]);
    rule
}

/// The rule used when an ecosystem has no template
pub fn default_rule(ecosystem: &str, directory: &str) -> UpdateRule {
    let mut rule = UpdateRule::new(ecosystem, directory);
    rule.schedule = Schedule::every(defaults::DEFAULT_INTERVAL);
    rule.open_pull_requests_limit = defaults::DEFAULT_OPEN_PULL_REQUESTS_LIMIT;
    rule.labels = defaults::DEFAULT_LABELS
        .iter()
        .map(|label| label.to_string())
        .collect();
    rule
}

/// Rules keyed by (ecosystem, directory), first insertion wins
#[derive(Debug, Default)]
struct RuleSet {
    rules: Vec<UpdateRule>,
    keys: BTreeSet<(String, String)>,
}

impl RuleSet {
    fn push(&mut self, rule: UpdateRule) {
        let key = (rule.package_ecosystem.clone(), rule.directory.clone());
        if self.keys.insert(key) {
            self.rules.push(rule);
        } else {
            warn!(
                "Dropping duplicate rule for {} at {}",
                rule.package_ecosystem, rule.directory
            );
        }
    }

    fn contains(&self, ecosystem: &str, directory: &str) -> bool {
        self.keys
            .contains(&(ecosystem.to_string(), directory.to_string()))
    }

    fn has_ecosystem(&self, ecosystem: &str) -> bool {
        self.rules.iter().any(|r| r.package_ecosystem == ecosystem)
    }

    fn into_sorted(mut self) -> Vec<UpdateRule> {
        sort_rules(&mut self.rules);
        self.rules
    }
}

/// Sort rules by ecosystem, then directory
pub fn sort_rules(rules: &mut [UpdateRule]) {
    rules.sort_by(|a, b| {
        a.package_ecosystem
            .cmp(&b.package_ecosystem)
            .then_with(|| a.directory.cmp(&b.directory))
    });
}
