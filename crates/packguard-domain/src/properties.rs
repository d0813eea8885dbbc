//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - `fail_never` staying silent whatever the backlog holds
//! - per-protection offense ordering
//! - idempotence of protection defaulting

use crate::defaults::with_default_protections;
use crate::engine::get_offenses;
use crate::model::{Backlog, PackageManifest, PerFileViolation, ReferenceViolation, ViolationKind};
use crate::registry::Registry;
use crate::test_support::{protected_at, set_protection};
use crate::workspace::ProtectedWorkspace;
use packguard_types::{ViolationBehavior, ids};
use proptest::prelude::*;

const PACKAGES: [&str; 3] = ["packs/apples", "packs/trees", "packs/pears"];

// ============================================================================
// Strategies
// ============================================================================

fn arb_package() -> impl Strategy<Value = String> {
    prop::sample::select(PACKAGES.to_vec()).prop_map(str::to_string)
}

fn arb_kind() -> impl Strategy<Value = ViolationKind> {
    prop_oneof![
        Just(ViolationKind::Dependency),
        Just(ViolationKind::Privacy),
        Just(ViolationKind::Other("visibility".to_string())),
    ]
}

fn arb_class_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{1,6}::[A-Z][a-z]{1,6}").unwrap()
}

fn arb_file() -> impl Strategy<Value = String> {
    prop::string::string_regex("packs/[a-z]{1,5}/app/(public/)?[a-z]{1,5}\\.rb").unwrap()
}

fn arb_reference() -> impl Strategy<Value = ReferenceViolation> {
    (
        arb_package(),
        arb_class_name(),
        prop::collection::vec(arb_kind(), 1..3),
        prop::collection::vec(arb_file(), 1..4),
    )
        .prop_map(|(to_package, class_name, kinds, files)| ReferenceViolation {
            to_package,
            class_name,
            kinds,
            files,
        })
}

fn arb_backlog() -> impl Strategy<Value = Backlog> {
    (
        prop::collection::btree_map(arb_package(), prop::collection::vec(arb_reference(), 0..4), 0..3),
        prop::collection::btree_set(arb_file(), 0..6),
    )
        .prop_map(|(ledgers, flagged)| {
            let mut backlog = Backlog {
                ledgers,
                ..Backlog::default()
            };
            for rule in [
                ids::RULE_TYPED_PUBLIC_API,
                ids::RULE_NAMESPACED_UNDER_PACKAGE_NAME,
            ] {
                backlog.rule_todo.insert(rule.to_string(), flagged.clone());
            }
            backlog
        })
}

fn arb_new_violations() -> impl Strategy<Value = Vec<PerFileViolation>> {
    prop::collection::vec((arb_package(), arb_reference()), 0..5).prop_map(|pairs| {
        pairs
            .iter()
            .flat_map(|(from, raw)| PerFileViolation::expand(raw, from))
            .collect()
    })
}

fn arb_behavior() -> impl Strategy<Value = ViolationBehavior> {
    prop::sample::select(ViolationBehavior::ALL.to_vec())
}

fn packages_at(behavior: &str) -> Vec<PackageManifest> {
    PACKAGES.iter().map(|name| protected_at(name, behavior)).collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn fail_never_is_always_silent(backlog in arb_backlog(), new in arb_new_violations()) {
        let offenses = get_offenses(&Registry::default(), &packages_at("fail_never"), &new, &backlog)
            .unwrap();
        prop_assert!(offenses.is_empty());
    }

    #[test]
    fn each_protection_orders_its_offenses_by_message(
        backlog in arb_backlog(),
        new in arb_new_violations(),
    ) {
        let registry = Registry::default();
        let packages = packages_at("fail_on_any");
        let workspace = ProtectedWorkspace::build(&registry, &packages, &backlog).unwrap();

        for protection in registry.protections() {
            let offenses = protection.get_offenses(&workspace, &new).unwrap();
            prop_assert!(offenses.windows(2).all(|w| w[0].message <= w[1].message));
            prop_assert!(offenses.iter().all(|o| o.violation_type == protection.identifier()));
        }
    }

    #[test]
    fn fail_on_new_never_replays_the_ledger(backlog in arb_backlog()) {
        let offenses = get_offenses(&Registry::default(), &packages_at("fail_on_new"), &[], &backlog)
            .unwrap();
        prop_assert!(offenses.is_empty());
    }

    #[test]
    fn defaulting_is_idempotent(
        preset in prop::collection::vec((0usize..5, arb_behavior()), 0..5),
        enforce in any::<bool>(),
    ) {
        let registry = Registry::default();
        let identifiers = registry.identifiers();

        let mut manifest = PackageManifest::new("packs/apples");
        manifest.enforce_dependencies = enforce;
        for (index, behavior) in preset {
            manifest = set_protection(manifest, &identifiers[index], behavior.as_str());
        }

        let once = with_default_protections(&manifest, &registry, &identifiers);
        let twice = with_default_protections(&once, &registry, &identifiers);
        prop_assert_eq!(once, twice);
    }
}
