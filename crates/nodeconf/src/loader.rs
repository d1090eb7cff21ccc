//! Applying a configuration document to a registry.
//!
//! # Algorithm
//!
//! 1. Validate the document as a whole (duplicates, capacity)
//! 2. Build a fresh registry from `document.registry`
//! 3. Add primaries, then spares, in document order
//! 4. Configure backup targets once every node exists, so a spare may back a
//!    node listed after it
//!
//! Any failure discards the fresh registry; `reload` only swaps it in after
//! the whole document applied.

use crate::document::ClusterDocument;
use crate::error::{LoadError, Result};
use crate::source::ConfigSource;
use corelib::NodeRegistry;

/// Build a registry from a document.
pub fn build_registry(document: &ClusterDocument) -> Result<NodeRegistry> {
    document.validate()?;

    let mut registry = NodeRegistry::with_config(document.registry.clone())
        .map_err(|e| LoadError::registry("registry", e))?;

    for node in &document.nodes {
        registry
            .add_node(node.pnid, node.name.clone(), node.excluded_cores, false)
            .map_err(|e| LoadError::registry(&node.name, e))?;
    }
    for spare in &document.spares {
        registry
            .add_node(spare.pnid, spare.name.clone(), spare.excluded_cores, true)
            .map_err(|e| LoadError::registry(&spare.name, e))?;
    }
    for spare in document.spares.iter().filter(|s| !s.backs.is_empty()) {
        registry
            .set_backup_targets(spare.pnid, &spare.backs)
            .map_err(|e| LoadError::registry(&spare.name, e))?;
    }

    tracing::info!(
        nodes = registry.len(),
        spares = registry.spare_count(),
        max_nodes = registry.max_nodes(),
        "built physical node registry"
    );
    Ok(registry)
}

/// Load a document from `source` and build a registry from it.
pub fn load_registry(source: &dyn ConfigSource) -> Result<NodeRegistry> {
    let origin = source.describe();
    let document = source.load().map_err(|e| {
        tracing::error!(source = %origin, error = %e, "failed to load node configuration");
        e
    })?;
    tracing::debug!(source = %origin, entries = document.node_count(), "loaded node configuration");
    build_registry(&document)
}

/// Replace `registry` with one built from `document`.
///
/// On error `registry` is left exactly as it was.
pub fn reload(document: &ClusterDocument, registry: &mut NodeRegistry) -> Result<()> {
    let fresh = match build_registry(document) {
        Ok(fresh) => fresh,
        Err(e) => {
            tracing::warn!(error = %e, "node configuration rejected; keeping current registry");
            return Err(e);
        }
    };
    *registry = fresh;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::JsonSource;
    use corelib::{Pnid, RegistryConfig};

    const CLUSTER: &str = r#"{
        "registry": { "max_nodes": 6 },
        "nodes": [
            { "pnid": 0, "name": "n000" },
            { "pnid": 1, "name": "n001" },
            { "pnid": 2, "name": "n002" }
        ],
        "spares": [
            { "pnid": 3, "name": "s003", "backs": [0, 1] },
            { "pnid": 5, "name": "s005" }
        ]
    }"#;

    #[test]
    fn test_build_from_document() {
        let registry = load_registry(&JsonSource::from_text(CLUSTER)).unwrap();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.spare_count(), 2);
        assert_eq!(registry.next_free_pnid(), Some(Pnid(4)));

        let set = registry.compute_spare_set("n001");
        assert_eq!(set.names(), vec!["n000", "n001", "s003"]);
        assert_eq!(registry.compute_spare_set("s005").names(), vec!["s005"]);
        assert!(registry.compute_spare_set("n002").is_empty());
    }

    #[test]
    fn test_spare_may_back_later_node() {
        let doc = ClusterDocument::from_json(
            r#"{
                "registry": { "max_nodes": 4 },
                "spares": [ { "pnid": 0, "name": "s000", "backs": [1] } ],
                "nodes": [ { "pnid": 1, "name": "n001" } ]
            }"#,
        )
        .unwrap();
        let registry = build_registry(&doc).unwrap();
        assert_eq!(registry.compute_spare_set("n001").names(), vec!["n001", "s000"]);
    }

    #[test]
    fn test_out_of_range_pnid() {
        let doc = ClusterDocument::from_json(
            r#"{ "registry": { "max_nodes": 2 }, "nodes": [ { "pnid": 5, "name": "n005" } ] }"#,
        )
        .unwrap();
        let err = build_registry(&doc).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Registry {
                source: corelib::Error::InvalidPnid { .. },
                ..
            }
        ));
        assert!(err.to_string().contains("n005"));
    }

    #[test]
    fn test_reload_keeps_registry_on_error() {
        let mut registry = load_registry(&JsonSource::from_text(CLUSTER)).unwrap();

        let mut bad = ClusterDocument::from_json(CLUSTER).unwrap();
        bad.spares[0].backs = vec![Pnid(9)];
        assert!(reload(&bad, &mut registry).is_err());
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.compute_spare_set("n000").len(), 3);

        let mut good = ClusterDocument::from_json(CLUSTER).unwrap();
        good.registry = RegistryConfig::with_max_nodes(3);
        good.nodes.truncate(1);
        good.spares.truncate(1);
        good.spares[0].pnid = Pnid(1);
        good.spares[0].backs = vec![Pnid(0)];
        reload(&good, &mut registry).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.max_nodes(), 3);
    }
}
