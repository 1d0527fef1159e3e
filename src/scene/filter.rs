//! Pruning of scene content not referenced by matched elements

use std::collections::BTreeSet;

use super::COLLADA_NAMESPACE;
use super::document::{ItemId, SceneDocument};
use crate::error::Result;
use crate::identifiers::MatchedIds;

/// What a pruning pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PruneReport {
    /// Instance nodes visited
    pub nodes: usize,
    /// Nodes whose id is in the matched set
    pub nodes_retained: usize,
    /// Instance-geometry links removed from unmatched nodes
    pub links_removed: usize,
    /// Geometry definitions visited
    pub geometries: usize,
    /// Geometry ids referenced by retained links
    pub retained_geometry_ids: BTreeSet<String>,
    /// Mesh bodies removed from unreferenced geometries
    pub meshes_removed: usize,
}

/// Remove geometry links of unmatched nodes and meshes of unreferenced geometries
///
/// Nodes and geometry definitions themselves are never removed. Nodes
/// without an `id` attribute are treated as unmatched. Running the pass a
/// second time with the same ids changes nothing.
pub fn prune_scene(document: &mut SceneDocument, ids: &MatchedIds) -> Result<PruneReport> {
    let mut report = PruneReport::default();

    let mut detach: Vec<ItemId> = Vec::new();
    for node in document.find_all(COLLADA_NAMESPACE, "node") {
        report.nodes += 1;
        let links = document.child_elements(node, COLLADA_NAMESPACE, "instance_geometry");
        let matched = document
            .attribute(node, "id")?
            .is_some_and(|id| ids.contains(&id));

        if matched {
            report.nodes_retained += 1;
            for link in links {
                if let Some(url) = document.attribute(link, "url")? {
                    let geometry = url.strip_prefix('#').unwrap_or(&url);
                    report.retained_geometry_ids.insert(geometry.to_string());
                }
            }
        } else {
            detach.extend(links);
        }
    }
    report.links_removed = detach.len();
    for id in detach.drain(..) {
        document.detach(id);
    }

    for geometry in document.find_all(COLLADA_NAMESPACE, "geometry") {
        report.geometries += 1;
        let referenced = document
            .attribute(geometry, "id")?
            .is_some_and(|id| report.retained_geometry_ids.contains(&id));
        if !referenced {
            detach.extend(document.child_elements(geometry, COLLADA_NAMESPACE, "mesh"));
        }
    }
    report.meshes_removed = detach.len();
    for id in detach {
        document.detach(id);
    }

    tracing::debug!(
        nodes = report.nodes,
        nodes_retained = report.nodes_retained,
        links_removed = report.links_removed,
        geometries = report.geometries,
        meshes_removed = report.meshes_removed,
        "Pruned scene document"
    );

    Ok(report)
}
