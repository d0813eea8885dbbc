//! Built-in protections.

use crate::protection::Protection;
use packguard_types::ids;

mod incoming_privacy;
mod namespace;
mod only_class_methods;
mod outgoing_dependency;
mod require_documented_apis;
mod typed_api;
mod visibility;


pub use incoming_privacy::IncomingPrivacyProtection;
pub use namespace::NamespaceProtection;
pub use only_class_methods::OnlyClassMethodsProtection;
pub use outgoing_dependency::OutgoingDependencyProtection;
pub use require_documented_apis::RequireDocumentedApisProtection;
pub use typed_api::TypedApiProtection;
pub use visibility::VisibilityProtection;

/// Every built-in identifier, default set first.
pub const BUILTIN_IDENTIFIERS: [&str; 7] = [
    ids::PROTECTION_OUTGOING_DEPENDENCY,
    ids::PROTECTION_INCOMING_PRIVACY,
    ids::PROTECTION_TYPED_API,
    ids::PROTECTION_NAMESPACE,
    ids::PROTECTION_VISIBILITY,
    ids::PROTECTION_ONLY_CLASS_METHODS,
    ids::PROTECTION_DOCUMENTED_APIS,
];

/// Protections active when no configuration replaces them.
pub const DEFAULT_IDENTIFIERS: [&str; 5] = [
    ids::PROTECTION_OUTGOING_DEPENDENCY,
    ids::PROTECTION_INCOMING_PRIVACY,
    ids::PROTECTION_TYPED_API,
    ids::PROTECTION_NAMESPACE,
    ids::PROTECTION_VISIBILITY,
];

pub fn builtin(identifier: &str) -> Option<Box<dyn Protection>> {
    let protection: Box<dyn Protection> = match identifier {
        ids::PROTECTION_OUTGOING_DEPENDENCY => Box::new(OutgoingDependencyProtection),
        ids::PROTECTION_INCOMING_PRIVACY => Box::new(IncomingPrivacyProtection),
        ids::PROTECTION_TYPED_API => Box::new(TypedApiProtection),
        ids::PROTECTION_NAMESPACE => Box::new(NamespaceProtection),
        ids::PROTECTION_VISIBILITY => Box::new(VisibilityProtection),
        ids::PROTECTION_ONLY_CLASS_METHODS => Box::new(OnlyClassMethodsProtection),
        ids::PROTECTION_DOCUMENTED_APIS => Box::new(RequireDocumentedApisProtection),
        _ => return None,
    };
    Some(protection)
}

pub fn default_set() -> Vec<Box<dyn Protection>> {
    DEFAULT_IDENTIFIERS
        .iter()
        .filter_map(|identifier| builtin(identifier))
        .collect()
}
