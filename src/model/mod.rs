//! Arena-backed graph store.
//!
//! Nodes are split into two parallel vectors: [`NodeRecord`] holds the content
//! the viewer edits and [`Body`] holds the spatial state owned by the layout
//! engine. Both are addressed by the same [`NodeHandle`] and are never
//! reordered, removed or reallocated after load, so links and handles stay
//! valid for the lifetime of the store.

use std::collections::HashMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use glam::Vec3;

mod build;
mod mutate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(u32);

impl NodeHandle {
    fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub u32);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClusterId {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse().map(Self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub cluster: Option<ClusterId>,
    pub code: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: NodeHandle,
    pub target: NodeHandle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    pub id: ClusterId,
    pub name: String,
    pub node_count: usize,
    pub members: Vec<String>,
}

#[derive(Debug, Default)]
pub struct GraphStore {
    records: Vec<NodeRecord>,
    bodies: Vec<Body>,
    links: Vec<Link>,
    clusters: Vec<Cluster>,
    index_by_id: HashMap<String, NodeHandle>,
    revision: u64,
}

impl GraphStore {
    pub fn node_count(&self) -> usize {
        self.records.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn handle(&self, id: &str) -> Option<NodeHandle> {
        self.index_by_id.get(id).copied()
    }

    pub fn handle_at(&self, index: usize) -> Option<NodeHandle> {
        (index < self.records.len()).then(|| NodeHandle::new(index))
    }

    pub fn record(&self, handle: NodeHandle) -> &NodeRecord {
        &self.records[handle.index()]
    }

    pub fn position(&self, handle: NodeHandle) -> Vec3 {
        self.bodies[handle.index()].position
    }

    pub fn records(&self) -> impl Iterator<Item = (NodeHandle, &NodeRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| (NodeHandle::new(index), record))
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.iter().find(|cluster| cluster.id == id)
    }

    pub fn cluster_members(&self, id: ClusterId) -> impl Iterator<Item = NodeHandle> + '_ {
        self.records()
            .filter(move |(_, record)| record.cluster == Some(id))
            .map(|(handle, _)| handle)
    }

    pub fn member_positions(&self, id: ClusterId) -> Vec<Vec3> {
        self.cluster_members(id)
            .map(|handle| self.position(handle))
            .collect()
    }

    /// Mean of the current member positions. Recomputed on every call since
    /// positions drift under the simulation.
    pub fn cluster_centroid(&self, id: ClusterId) -> Option<Vec3> {
        let positions = self.member_positions(id);
        if positions.is_empty() {
            return None;
        }

        let sum = positions.iter().copied().sum::<Vec3>();
        Some(sum / positions.len() as f32)
    }

    /// Split borrow for the layout engine: positions are writable, topology is
    /// read-only and node content is not reachable at all.
    pub fn simulation_parts(&mut self) -> (&mut [Body], &[Link]) {
        (&mut self.bodies, &self.links)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::backend::wire::{ClusterRecord, GraphSnapshot, RawLink, RawNode};

    use super::{ClusterId, GraphStore};

    pub fn raw_node(id: &str, cluster: Option<u32>, position: [f32; 3]) -> RawNode {
        RawNode {
            id: id.to_owned(),
            name: Some(crate::util::short_name(id).to_owned()),
            cluster: cluster.map(ClusterId),
            x: Some(position[0]),
            y: Some(position[1]),
            z: Some(position[2]),
            code: Some(format!("fn {}() {{}}", crate::util::short_name(id))),
        }
    }

    pub fn raw_link(source: &str, target: &str) -> RawLink {
        RawLink {
            source: source.to_owned(),
            target: target.to_owned(),
        }
    }

    pub fn cluster_record(id: u32, name: &str, nodes: &[&str]) -> ClusterRecord {
        ClusterRecord {
            id: ClusterId(id),
            name: name.to_owned(),
            node_count: nodes.len(),
            nodes: nodes.iter().map(|id| (*id).to_owned()).collect(),
        }
    }

    pub fn sample_store() -> GraphStore {
        let snapshot = GraphSnapshot {
            nodes: vec![
                raw_node("a::f1", Some(0), [10.0, 0.0, 0.0]),
                raw_node("a::f2", Some(0), [20.0, 10.0, -4.0]),
                raw_node("a::f3", Some(0), [-6.0, 2.0, 8.0]),
                raw_node("auth::login", Some(1), [0.0, -30.0, 12.0]),
                raw_node("util::log", None, [5.0, 5.0, 5.0]),
            ],
            links: vec![
                raw_link("a::f2", "a::f1"),
                raw_link("a::f3", "a::f1"),
                raw_link("auth::login", "util::log"),
            ],
        };
        let clusters = vec![
            cluster_record(0, "Auth", &["a::f1", "a::f2", "a::f3"]),
            cluster_record(1, "Billing", &["auth::login"]),
        ];
        GraphStore::from_snapshot(snapshot, clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::sample_store;
    use super::*;

    #[test]
    fn test_handles_resolve_by_id() {
        let store = sample_store();
        let handle = store.handle("a::f2").unwrap();
        assert_eq!(store.record(handle).id, "a::f2");
        assert_eq!(store.position(handle), Vec3::new(20.0, 10.0, -4.0));
        assert!(store.handle("missing::node").is_none());
    }

    #[test]
    fn test_handle_at_is_bounded_by_node_count() {
        let store = sample_store();
        assert_eq!(store.handle_at(0), store.handle("a::f1"));
        assert!(store.handle_at(store.node_count()).is_none());
    }

    #[test]
    fn test_cluster_members_follow_node_cluster_field() {
        let store = sample_store();
        let members = store
            .cluster_members(ClusterId(0))
            .map(|handle| store.record(handle).id.clone())
            .collect::<Vec<_>>();
        assert_eq!(members, ["a::f1", "a::f2", "a::f3"]);
        assert_eq!(store.cluster_members(ClusterId(9)).count(), 0);
    }

    #[test]
    fn test_centroid_is_mean_of_member_positions() {
        let store = sample_store();
        let centroid = store.cluster_centroid(ClusterId(0)).unwrap();
        assert!((centroid - Vec3::new(8.0, 4.0, 4.0 / 3.0)).length() < 1e-5);
        assert!(store.cluster_centroid(ClusterId(42)).is_none());
    }

    #[test]
    fn test_centroid_tracks_moved_bodies() {
        let mut store = sample_store();
        let before = store.cluster_centroid(ClusterId(1)).unwrap();
        let handle = store.handle("auth::login").unwrap();
        let (bodies, _) = store.simulation_parts();
        bodies[handle.index()].position += Vec3::new(3.0, 0.0, 0.0);
        let after = store.cluster_centroid(ClusterId(1)).unwrap();
        assert!((after - before - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_cluster_id_parses_numeric_text() {
        assert_eq!(" 7 ".parse::<ClusterId>().unwrap(), ClusterId(7));
        assert!("seven".parse::<ClusterId>().is_err());
        assert_eq!(ClusterId(3).to_string(), "3");
    }
}
