use std::collections::HashMap;

use glam::Vec3;
use tracing::warn;

use crate::backend::wire::{ClusterRecord, GraphSnapshot, RawNode};
use crate::util::{short_name, stable_triple};

use super::{Body, Cluster, GraphStore, Link, NodeHandle, NodeRecord};

fn seed_position(id: &str, node_count: usize) -> Vec3 {
    let spread = (node_count.max(1) as f32).cbrt() * 30.0;
    let (x, y, z) = stable_triple(id);
    Vec3::new(x, y, z) * spread
}

fn snapshot_position(node: &RawNode) -> Option<Vec3> {
    let position = Vec3::new(node.x?, node.y?, node.z?);
    position.is_finite().then_some(position)
}

impl GraphStore {
    pub fn from_snapshot(snapshot: GraphSnapshot, clusters: Vec<ClusterRecord>) -> Self {
        let node_count = snapshot.nodes.len();
        let mut records = Vec::with_capacity(node_count);
        let mut bodies = Vec::with_capacity(node_count);
        let mut index_by_id = HashMap::with_capacity(node_count);

        for node in snapshot.nodes {
            if node.id.is_empty() {
                warn!("skipping graph node with an empty id");
                continue;
            }
            if index_by_id.contains_key(&node.id) {
                warn!(node_id = %node.id, "skipping duplicate graph node");
                continue;
            }

            let position =
                snapshot_position(&node).unwrap_or_else(|| seed_position(&node.id, node_count));
            let name = node
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| short_name(&node.id).to_owned());

            index_by_id.insert(node.id.clone(), NodeHandle::new(records.len()));
            records.push(NodeRecord {
                id: node.id,
                name,
                cluster: node.cluster,
                code: node.code,
            });
            bodies.push(Body {
                position,
                velocity: Vec3::ZERO,
            });
        }

        let mut links = Vec::with_capacity(snapshot.links.len());
        let mut dropped = 0usize;
        for link in snapshot.links {
            let (Some(&source), Some(&target)) =
                (index_by_id.get(&link.source), index_by_id.get(&link.target))
            else {
                dropped += 1;
                continue;
            };

            links.push(Link { source, target });
        }
        if dropped > 0 {
            warn!(dropped, "dropped links referencing unknown nodes");
        }

        let clusters = clusters
            .into_iter()
            .map(|cluster| Cluster {
                id: cluster.id,
                name: cluster.name,
                node_count: if cluster.node_count == 0 {
                    cluster.nodes.len()
                } else {
                    cluster.node_count
                },
                members: cluster.nodes,
            })
            .collect();

        Self {
            records,
            bodies,
            links,
            clusters,
            index_by_id,
            revision: 0,
        }
    }
}
