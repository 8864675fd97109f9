//! Property-based tests for path handling, detection and merging.
//!
//! These tests use proptest to generate random trees and documents and
//! verify that invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::config::{DependabotConfig, Schedule, UpdateRule};
    use crate::detector::{Detector, IndicatorCatalog};
    use crate::merge::Merger;
    use crate::path::{containing_directory, glob_match};
    use crate::templates::TemplateSet;
    use proptest::prelude::*;

    const MANIFESTS: &[&str] = &[
        "package.json",
        "package-lock.json",
        "go.mod",
        "go.sum",
        "requirements.txt",
        "Dockerfile",
        "Cargo.toml",
        "main.tf",
        "pom.xml",
        "README.md",
    ];

    const ECOSYSTEMS: &[&str] = &["npm", "gomod", "pip", "docker", "cargo", "terraform", "swift"];

    fn repo_path() -> impl Strategy<Value = String> {
        (
            prop::collection::vec("[a-z]{1,6}", 0..3),
            prop::sample::select(MANIFESTS),
        )
            .prop_map(|(dirs, file)| {
                let mut parts = dirs;
                parts.push(file.to_string());
                parts.join("/")
            })
    }

    fn update_rule() -> impl Strategy<Value = UpdateRule> {
        (
            prop::sample::select(ECOSYSTEMS),
            prop::sample::select(vec!["/", "/web", "/api", "/tools"]),
            prop::sample::select(vec!["daily", "weekly", "monthly"]),
            0u32..20,
            prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "dependencies"]), 0..4),
            any::<bool>(),
        )
            .prop_map(|(eco, dir, interval, limit, labels, vendor)| {
                let mut rule = UpdateRule::new(eco, dir);
                rule.schedule = Schedule::every(interval);
                rule.open_pull_requests_limit = limit;
                rule.labels = labels.into_iter().map(String::from).collect();
                rule.vendor = vendor;
                rule
            })
    }

    fn merger() -> Merger {
        let mut templates = TemplateSet::new();
        for (eco, labels) in [("npm", vec!["npm", "dependencies"]), ("docker", vec!["docker"])] {
            let mut rule = UpdateRule::new(eco, "/");
            rule.schedule = Schedule::every("weekly");
            rule.open_pull_requests_limit = 5;
            rule.labels = labels.into_iter().map(String::from).collect();
            templates.insert(eco, DependabotConfig::with_updates(vec![rule]));
        }

        // A second npm rule for the same key, which the merge must drop
        let mut release = UpdateRule::new("npm", "/");
        release.schedule = Schedule::every("daily");
        release.target_branch = "release".to_string();
        release.labels = vec!["release".to_string()];
        if let Some(npm) = templates.get("npm").cloned() {
            let mut updates = npm.updates;
            updates.push(release);
            templates.insert("npm", DependabotConfig::with_updates(updates));
        }

        Merger::new(templates, IndicatorCatalog::builtin().root_only_tags())
    }

    proptest! {
        /// containing_directory always yields a `/`-rooted path without a trailing slash
        #[test]
        fn containing_directory_is_rooted(path in repo_path()) {
            let dir = containing_directory(&path);
            prop_assert!(dir.starts_with('/'));
            prop_assert!(dir == "/" || !dir.ends_with('/'));
        }

        /// "*" matches any single component and never crosses a separator
        #[test]
        fn glob_star_stays_in_segment(a in "[a-z0-9_.]{1,8}", b in "[a-z0-9_.]{1,8}") {
            let star = glob::Pattern::new("*").unwrap();
            prop_assert!(glob_match(&star, &a));
            let nested = format!("{}/{}", a, b);
            prop_assert!(!glob_match(&star, &nested));
        }
    }

    proptest! {
        /// Detection is deterministic and ordered by confidence then tag
        #[test]
        fn detect_is_ordered(paths in prop::collection::vec(repo_path(), 0..12)) {
            let detector = Detector::default();
            let found = detector.detect(&paths);
            prop_assert_eq!(&found, &detector.detect(&paths));

            for pair in found.windows(2) {
                let ordered = pair[0].confidence > pair[1].confidence
                    || (pair[0].confidence == pair[1].confidence
                        && pair[0].ecosystem < pair[1].ecosystem);
                prop_assert!(ordered, "{:?} before {:?}", pair[0], pair[1]);
            }
            for eco in &found {
                prop_assert!(eco.confidence > 0.0 && eco.confidence <= 1.0);
                if detector.catalog().is_root_only(&eco.ecosystem) {
                    prop_assert_eq!(eco.directories.iter().collect::<Vec<_>>(), vec!["/"]);
                }
            }
        }

        /// Merging twice gives the same document as merging once
        #[test]
        fn merge_is_idempotent(
            paths in prop::collection::vec(repo_path(), 0..12),
            existing in prop::option::of(prop::collection::vec(update_rule(), 0..6)),
        ) {
            let detected = Detector::default().detect(&paths);
            let merger = merger();
            let existing = existing.map(DependabotConfig::with_updates);

            let once = merger.merge(existing.as_ref(), &detected);
            let twice = merger.merge(Some(&once), &detected);
            prop_assert_eq!(once, twice);
        }

        /// Output is sorted, unique, and root-only rules sit at "/"
        #[test]
        fn merge_output_is_normalized(
            paths in prop::collection::vec(repo_path(), 0..12),
            existing in prop::collection::vec(update_rule(), 0..6),
        ) {
            let detected = Detector::default().detect(&paths);
            let merger = merger();
            let doc = merger.merge(Some(&DependabotConfig::with_updates(existing)), &detected);

            for pair in doc.updates.windows(2) {
                let a = (&pair[0].package_ecosystem, &pair[0].directory);
                let b = (&pair[1].package_ecosystem, &pair[1].directory);
                prop_assert!(a < b, "{:?} not strictly before {:?}", a, b);
            }
            for rule in &doc.updates {
                if merger.is_root_only(&rule.package_ecosystem) {
                    prop_assert_eq!(rule.directory.as_str(), "/");
                }
            }
        }

        /// Every existing label survives the merge
        #[test]
        fn merge_keeps_existing_labels(rule in update_rule()) {
            let detected = Detector::default().detect(&["package.json"]);
            let mut rule = rule;
            rule.package_ecosystem = "npm".to_string();
            rule.directory = "/".to_string();
            let existing = DependabotConfig::with_updates(vec![rule.clone()]);

            let doc = merger().merge(Some(&existing), &detected);
            let merged = doc.rules_for("npm").next().unwrap();
            for label in &rule.labels {
                prop_assert!(merged.labels.contains(label));
            }
            prop_assert_eq!(merged.vendor, rule.vendor);
            prop_assert_eq!(merged.schedule.interval.as_str(), "weekly");
            prop_assert!(!merged.labels.contains(&"release".to_string()));
        }
    }
}
