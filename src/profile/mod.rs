//! Profile merging
//!
//! A profile is a directory of partial entity documents maintained on top of
//! the upstream ("core") HSDS schema set. Each profile document is
//! merge-patched onto its core counterpart; an empty profile document
//! removes the entity, and every relation property pointing at a removed
//! entity is pruned from the rest of the set.

mod patch;

pub use crate::models::is_empty_document;
pub use patch::{check_conflicts, merge_patch};

use crate::error::{SchemaError, SchemaResult};
use crate::models::{DocumentSet, OPENAPI_FILE, property_reference};
use crate::storage::SchemaSource;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Result of merging a profile onto a core schema set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Final documents keyed by file name
    pub documents: DocumentSet,
    /// File names the profile marks as removed, whether or not core has them
    pub removed: Vec<String>,
}

/// Merge `profile` onto `core`.
///
/// - profile and core both have the file: merge-patch, then prune
/// - only the profile has it: emitted unchanged, removal markers included
/// - only core has it: pruned
///
/// `openapi.json` is never pruned.
pub fn merge_profile(core: &DocumentSet, profile: &DocumentSet) -> SchemaResult<MergeOutcome> {
    let removed: Vec<String> = profile
        .iter()
        .filter(|(_, document)| is_empty_document(document))
        .map(|(name, _)| name.clone())
        .collect();

    let mut documents = DocumentSet::new();

    for (name, document) in profile.iter() {
        let Some(core_document) = core.get(name) else {
            if is_empty_document(document) {
                warn!("Profile removes {} which is not in the core set", name);
            } else {
                debug!("{} added by profile", name);
            }
            documents.insert(name.clone(), document.clone());
            continue;
        };
        if is_empty_document(document) {
            info!("{} removed by profile", name);
            continue;
        }

        check_conflicts(name, core_document, document)?;
        let mut merged = core_document.clone();
        merge_patch(&mut merged, document);
        prune_removed(name, &mut merged, &removed)?;
        documents.insert(name.clone(), merged);
    }

    for (name, document) in core.iter() {
        if profile.contains(name) {
            continue;
        }
        let mut document = document.clone();
        prune_removed(name, &mut document, &removed)?;
        documents.insert(name.clone(), document);
    }

    info!(
        "Merged profile: {} document(s), {} removed",
        documents.len(),
        removed.len()
    );
    Ok(MergeOutcome { documents, removed })
}

/// Fetch the core set from `source` and merge `profile` onto it
pub fn merge_from_source(
    source: &dyn SchemaSource,
    profile: &DocumentSet,
) -> SchemaResult<MergeOutcome> {
    let core = source.fetch()?;
    info!("Fetched {} core document(s)", core.len());
    merge_profile(&core, profile)
}

/// Delete every relation property pointing at a removed file
fn prune_removed(name: &str, document: &mut Value, removed: &[String]) -> SchemaResult<()> {
    if name == OPENAPI_FILE || removed.is_empty() {
        return Ok(());
    }
    let properties = document
        .get_mut("properties")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| SchemaError::shape(name, "missing 'properties'"))?;

    properties.retain(|key, property| {
        let keep = !property_reference(property)
            .is_some_and(|(_, reference)| removed.iter().any(|file| file == reference));
        if !keep {
            debug!("Pruned {}.{}", name, key);
        }
        keep
    });
    Ok(())
}

/// Raw-content base URL for a profile repository.
///
/// `https://github.com/<owner>/<repo>` becomes
/// `https://raw.githubusercontent.com/<owner>/<repo>/<branch>`; any other
/// URL is returned unchanged.
pub fn profile_url_to_raw(url: &str, branch: &str) -> String {
    match url.strip_prefix("https://github.com") {
        Some(path) => format!(
            "https://raw.githubusercontent.com{}/{}",
            path.trim_end_matches('/'),
            branch
        ),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn core() -> DocumentSet {
        let mut core = DocumentSet::new();
        core.insert(
            "service.json",
            json!({
                "name": "service",
                "properties": {
                    "id": {"type": "string"},
                    "name": {"type": "string"},
                    "funding": {"type": "array", "items": {"$ref": "funding.json"}}
                }
            }),
        );
        core.insert(
            "funding.json",
            json!({"name": "funding", "properties": {"id": {"type": "string"}}}),
        );
        core.insert(OPENAPI_FILE, json!({"openapi": "3.1.0"}));
        core
    }

    #[test]
    fn test_empty_documents() {
        assert!(is_empty_document(&json!(null)));
        assert!(is_empty_document(&json!({})));
        assert!(is_empty_document(&json!([])));
        assert!(is_empty_document(&json!("")));
        assert!(!is_empty_document(&json!({"name": "x"})));
        assert!(!is_empty_document(&json!(0)));
    }

    #[test]
    fn test_removal_cascades() {
        let mut profile = DocumentSet::new();
        profile.insert("funding.json", json!({}));

        let outcome = merge_profile(&core(), &profile).unwrap();
        assert_eq!(outcome.removed, vec!["funding.json"]);
        assert!(!outcome.documents.contains("funding.json"));

        let service = outcome.documents.get("service.json").unwrap();
        assert!(service["properties"].get("funding").is_none());
        assert!(outcome.documents.contains(OPENAPI_FILE));
    }

    #[test]
    fn test_patch_and_additions() {
        let mut profile = DocumentSet::new();
        profile.insert(
            "service.json",
            json!({"properties": {"name": {"title": "Service name"}}}),
        );
        profile.insert(
            "program.json",
            json!({"name": "program", "properties": {"id": {"type": "string"}}}),
        );
        profile.insert("contact.json", json!(null));

        let outcome = merge_profile(&core(), &profile).unwrap();
        assert!(outcome.documents.contains("program.json"));

        // A marker with no core counterpart is kept and still recorded
        assert_eq!(outcome.removed, vec!["contact.json"]);
        assert_eq!(outcome.documents.get("contact.json"), Some(&json!(null)));
        assert!(outcome.documents.contains("funding.json"));

        let service = outcome.documents.get("service.json").unwrap();
        assert_eq!(
            service["properties"]["name"],
            json!({"type": "string", "title": "Service name"})
        );
        assert!(service["properties"].get("funding").is_some());
    }

    #[test]
    fn test_merge_is_deterministic() {
        let mut profile = DocumentSet::new();
        profile.insert("funding.json", json!({}));
        profile.insert("service.json", json!({"description": "Patched"}));

        let first = merge_profile(&core(), &profile).unwrap();
        let second = merge_profile(&core(), &profile).unwrap();
        let render = |outcome: &MergeOutcome| {
            outcome
                .documents
                .iter()
                .map(|(name, document)| {
                    format!("{}={}", name, serde_json::to_string_pretty(document).unwrap())
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(render(&first), render(&second));
    }

    #[test]
    fn test_prune_requires_properties() {
        let mut core = core();
        core.insert("broken.json", json!({"name": "broken"}));
        let mut profile = DocumentSet::new();
        profile.insert("funding.json", json!({}));

        let err = merge_profile(&core, &profile).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaShape { .. }));
    }

    #[test]
    fn test_profile_url_to_raw() {
        assert_eq!(
            profile_url_to_raw("https://github.com/openreferral/uk-profile/", "main"),
            "https://raw.githubusercontent.com/openreferral/uk-profile/main"
        );
        assert_eq!(
            profile_url_to_raw("https://example.org/profile", "main"),
            "https://example.org/profile"
        );
    }
}
