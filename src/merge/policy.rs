//! Field-level merge policy
//!
//! When an existing update rule meets the organization's template rule for
//! the same ecosystem and directory, each field is reconciled by exactly one
//! policy. [`FIELD_POLICIES`] holds the table below as data and
//! [`merge_rule`] walks it, resolving each field with the small policy
//! functions in this module.
//!
//! | Field | Policy |
//! |---|---|
//! | directory, target-branch, vendor | preserve |
//! | labels, reviewers, assignees | union |
//! | schedule | replace |
//! | open-pull-requests-limit, versioning-strategy | replace if set |
//! | groups | deep merge |
//! | commit-message | fill if absent |
//! | ignore, allow, insecure-external-code-execution, registries, milestone, rebase-strategy | preserve |

use crate::config::{GroupConfig, Schedule, UpdateRule};
use std::collections::BTreeMap;

/// How one field of a rule is reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep the existing value
    Preserve,
    /// Existing items first, then template items not already present
    Union,
    /// Template value wins unconditionally
    Replace,
    /// Template value wins only when it is set (non-zero, non-empty)
    ReplaceIfSet,
    /// Template entries overwrite same-named entries, others are kept
    DeepMerge,
    /// Template value is used only when the existing value is unset
    FillIfAbsent,
}

/// Fields of an update rule that the merge touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuleField {
    Directory,
    TargetBranch,
    Vendor,
    Labels,
    Reviewers,
    Assignees,
    Schedule,
    OpenPullRequestsLimit,
    VersioningStrategy,
    Groups,
    CommitMessage,
    Ignore,
    Allow,
    Insecure,
    Registries,
    Milestone,
    RebaseStrategy,
}

/// Policy for every rule field
pub const FIELD_POLICIES: &[(RuleField, MergePolicy)] = &[
    (RuleField::Directory, MergePolicy::Preserve),
    (RuleField::TargetBranch, MergePolicy::Preserve),
    (RuleField::Vendor, MergePolicy::Preserve),
    (RuleField::Labels, MergePolicy::Union),
    (RuleField::Reviewers, MergePolicy::Union),
    (RuleField::Assignees, MergePolicy::Union),
    (RuleField::Schedule, MergePolicy::Replace),
    (RuleField::OpenPullRequestsLimit, MergePolicy::ReplaceIfSet),
    (RuleField::VersioningStrategy, MergePolicy::ReplaceIfSet),
    (RuleField::Groups, MergePolicy::DeepMerge),
    (RuleField::CommitMessage, MergePolicy::FillIfAbsent),
    (RuleField::Ignore, MergePolicy::Preserve),
    (RuleField::Allow, MergePolicy::Preserve),
    (RuleField::Insecure, MergePolicy::Preserve),
    (RuleField::Registries, MergePolicy::Preserve),
    (RuleField::Milestone, MergePolicy::Preserve),
    (RuleField::RebaseStrategy, MergePolicy::Preserve),
];

/// A field value the policies know how to reconcile
pub trait FieldValue: Clone {
    /// Whether the value is something other than its zero value
    fn is_set(&self) -> bool;

    /// Combine two collections, used by `Union` and `DeepMerge`
    ///
    /// Scalars have nothing to combine and take the template value when set.
    fn combine(existing: &Self, template: &Self) -> Self {
        replace_if_set(existing.clone(), template.clone(), Self::is_set)
    }
}

impl FieldValue for String {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl FieldValue for u32 {
    fn is_set(&self) -> bool {
        *self > 0
    }
}

impl FieldValue for bool {
    fn is_set(&self) -> bool {
        *self
    }
}

impl FieldValue for Schedule {
    fn is_set(&self) -> bool {
        !self.interval.is_empty()
    }
}

impl<T: Clone> FieldValue for Option<T> {
    fn is_set(&self) -> bool {
        self.is_some()
    }
}

impl<T: Clone + PartialEq> FieldValue for Vec<T> {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }

    fn combine(existing: &Self, template: &Self) -> Self {
        union(existing, template)
    }
}

impl FieldValue for BTreeMap<String, GroupConfig> {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }

    fn combine(existing: &Self, template: &Self) -> Self {
        deep_merge_groups(existing, template)
    }
}

/// Reconcile one field value under `policy`
pub fn resolve<T: FieldValue>(policy: MergePolicy, existing: &T, template: &T) -> T {
    match policy {
        MergePolicy::Preserve => existing.clone(),
        MergePolicy::Replace => replace(existing, template),
        MergePolicy::ReplaceIfSet => {
            replace_if_set(existing.clone(), template.clone(), T::is_set)
        }
        MergePolicy::Union | MergePolicy::DeepMerge => T::combine(existing, template),
        MergePolicy::FillIfAbsent => fill_if_absent(existing, template),
    }
}

/// Merge one existing rule with one template rule using [`FIELD_POLICIES`]
pub fn merge_rule(existing: &UpdateRule, template: &UpdateRule) -> UpdateRule {
    merge_rule_with(FIELD_POLICIES, existing, template)
}

/// Merge one existing rule with one template rule under a given policy table
///
/// Fields the table does not name keep their existing value.
pub fn merge_rule_with(
    policies: &[(RuleField, MergePolicy)],
    existing: &UpdateRule,
    template: &UpdateRule,
) -> UpdateRule {
    let mut merged = existing.clone();
    for &(field, policy) in policies {
        apply(field, policy, &mut merged, existing, template);
    }
    merged
}

fn apply(
    field: RuleField,
    policy: MergePolicy,
    merged: &mut UpdateRule,
    existing: &UpdateRule,
    template: &UpdateRule,
) {
    macro_rules! set {
        ($name:ident) => {
            merged.$name = resolve(policy, &existing.$name, &template.$name)
        };
    }

    match field {
        RuleField::Directory => set!(directory),
        RuleField::TargetBranch => set!(target_branch),
        RuleField::Vendor => set!(vendor),
        RuleField::Labels => set!(labels),
        RuleField::Reviewers => set!(reviewers),
        RuleField::Assignees => set!(assignees),
        RuleField::Schedule => set!(schedule),
        RuleField::OpenPullRequestsLimit => set!(open_pull_requests_limit),
        RuleField::VersioningStrategy => set!(versioning_strategy),
        RuleField::Groups => set!(groups),
        RuleField::CommitMessage => set!(commit_message),
        RuleField::Ignore => set!(ignore),
        RuleField::Allow => set!(allow),
        RuleField::Insecure => set!(insecure),
        RuleField::Registries => set!(registries),
        RuleField::Milestone => set!(milestone),
        RuleField::RebaseStrategy => set!(rebase_strategy),
    }
}

/// Template value wins
pub fn replace<T: Clone>(_existing: &T, template: &T) -> T {
    template.clone()
}

/// Template value wins when `is_set` says it carries a value
pub fn replace_if_set<T>(existing: T, template: T, is_set: impl Fn(&T) -> bool) -> T {
    if is_set(&template) {
        template
    } else {
        existing
    }
}

/// Ordered union without duplicates, first-seen order kept
///
/// # Examples
///
/// ```
/// use dependabot_sync::merge::policy::union;
///
/// let existing = vec!["dependencies".to_string(), "custom".to_string()];
/// let template = vec!["automated".to_string(), "dependencies".to_string()];
/// assert_eq!(union(&existing, &template), vec!["dependencies", "custom", "automated"]);
/// ```
pub fn union<T: Clone + PartialEq>(existing: &[T], template: &[T]) -> Vec<T> {
    let mut result: Vec<T> = Vec::with_capacity(existing.len() + template.len());
    for item in existing.iter().chain(template) {
        if !result.contains(item) {
            result.push(item.clone());
        }
    }
    result
}

/// Same-named template groups overwrite, new ones are added, others kept
pub fn deep_merge_groups(
    existing: &BTreeMap<String, GroupConfig>,
    template: &BTreeMap<String, GroupConfig>,
) -> BTreeMap<String, GroupConfig> {
    let mut merged = existing.clone();
    for (name, group) in template {
        merged.insert(name.clone(), group.clone());
    }
    merged
}

/// Existing value if set, otherwise the template's
pub fn fill_if_absent<T: FieldValue>(existing: &T, template: &T) -> T {
    if existing.is_set() {
        existing.clone()
    } else {
        template.clone()
    }
}
