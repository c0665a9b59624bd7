use std::sync::Arc;

use crate::model::{ClusterId, GraphStore, NodeHandle};

pub(in crate::app) const MAX_NODE_HITS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum SearchHit {
    Cluster(ClusterId),
    Node(NodeHandle),
}

/// Matching clusters in store order, then up to [`MAX_NODE_HITS`] matching
/// nodes. Matching is a case-insensitive substring test on names.
pub(in crate::app) fn search(store: &GraphStore, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let clusters = store
        .clusters()
        .iter()
        .filter(|cluster| cluster.name.to_lowercase().contains(&needle))
        .map(|cluster| SearchHit::Cluster(cluster.id));
    let nodes = store
        .records()
        .filter(|(_, record)| record.name.to_lowercase().contains(&needle))
        .map(|(handle, _)| SearchHit::Node(handle))
        .take(MAX_NODE_HITS);

    clusters.chain(nodes).collect()
}

struct SearchCache {
    query: String,
    revision: u64,
    hits: Arc<[SearchHit]>,
}

#[derive(Default)]
pub(in crate::app) struct SearchBox {
    pub query: String,
    cache: Option<SearchCache>,
}

impl SearchBox {
    pub(in crate::app) fn is_open(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub(in crate::app) fn hits(&mut self, store: &GraphStore) -> Arc<[SearchHit]> {
        let query = self.query.trim();
        if let Some(cached) = &self.cache
            && cached.revision == store.revision()
            && cached.query == query
        {
            return Arc::clone(&cached.hits);
        }

        let hits: Arc<[SearchHit]> = search(store, query).into();
        self.cache = Some(SearchCache {
            query: query.to_owned(),
            revision: store.revision(),
            hits: Arc::clone(&hits),
        });
        hits
    }

    /// Hits to list under the box. `None` keeps the dropdown closed, both for
    /// a blank query and for one that matches nothing.
    pub(in crate::app) fn dropdown(&mut self, store: &GraphStore) -> Option<Arc<[SearchHit]>> {
        if !self.is_open() {
            return None;
        }

        let hits = self.hits(store);
        (!hits.is_empty()).then_some(hits)
    }

    pub(in crate::app) fn take(&mut self, hit: SearchHit) -> SearchHit {
        self.query.clear();
        hit
    }
}
