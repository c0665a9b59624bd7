//! Collaborators reached over the network: the graph provider, the impact
//! analysis service and the conversational query service.

mod http;
pub mod wire;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::error::ViewerError;
use crate::model::GraphStore;

pub use http::HttpBackend;
use wire::{ClusterRecord, EditRequest, GraphSnapshot, ImpactResponse, QueryResponse};

pub trait GraphProvider: Send + Sync {
    fn fetch_graph(&self) -> Result<GraphSnapshot>;
    fn fetch_clusters(&self) -> Result<Vec<ClusterRecord>>;
}

pub trait ImpactService: Send + Sync {
    fn submit_edit(&self, request: &EditRequest) -> Result<ImpactResponse>;
}

pub trait QueryService: Send + Sync {
    fn ask(&self, question: &str) -> Result<QueryResponse>;
}

pub trait Backend: GraphProvider + ImpactService + QueryService {}

impl<T> Backend for T where T: GraphProvider + ImpactService + QueryService {}

pub type SharedBackend = Arc<dyn Backend>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImpactReport {
    pub affected: Vec<String>,
}

/// Fetches the graph and clusters and builds the store.
///
/// A failing cluster endpoint degrades to an empty cluster list; a failing
/// graph endpoint is fatal for the load.
pub fn load_graph<P>(provider: &P) -> Result<GraphStore, ViewerError>
where
    P: GraphProvider + ?Sized,
{
    let snapshot = provider
        .fetch_graph()
        .map_err(|error| ViewerError::data_unavailable(&error))?;

    let clusters = match provider.fetch_clusters() {
        Ok(clusters) => clusters,
        Err(error) => {
            warn!(error = %format!("{error:#}"), "cluster list unavailable; continuing without clusters");
            Vec::new()
        }
    };

    let store = GraphStore::from_snapshot(snapshot, clusters);
    info!(
        nodes = store.node_count(),
        links = store.link_count(),
        clusters = store.cluster_count(),
        "graph loaded"
    );
    Ok(store)
}

pub fn analyze_impact<S>(service: &S, request: &EditRequest) -> Result<ImpactReport, ViewerError>
where
    S: ImpactService + ?Sized,
{
    let response = service
        .submit_edit(request)
        .map_err(|error| ViewerError::impact_failure(format!("{error:#}")))?;

    if !response.is_updated() {
        return Err(ViewerError::impact_failure(format!(
            "service answered with status {:?}",
            response.status
        )));
    }

    Ok(ImpactReport {
        affected: response.affected_nodes,
    })
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::Mutex;

    use anyhow::{Result, anyhow};

    use super::wire::{ClusterRecord, EditRequest, GraphSnapshot, ImpactResponse, QueryResponse};
    use super::{GraphProvider, ImpactService, QueryService};

    #[derive(Default)]
    pub struct FakeBackend {
        pub graph: Option<GraphSnapshot>,
        pub clusters: Option<Vec<ClusterRecord>>,
        pub impact: Option<ImpactResponse>,
        pub answer: Option<String>,
        pub submitted: Mutex<Vec<EditRequest>>,
    }

    impl GraphProvider for FakeBackend {
        fn fetch_graph(&self) -> Result<GraphSnapshot> {
            self.graph.clone().ok_or_else(|| anyhow!("connection refused"))
        }

        fn fetch_clusters(&self) -> Result<Vec<ClusterRecord>> {
            self.clusters
                .clone()
                .ok_or_else(|| anyhow!("clusters endpoint returned 500"))
        }
    }

    impl ImpactService for FakeBackend {
        fn submit_edit(&self, request: &EditRequest) -> Result<ImpactResponse> {
            if let Ok(mut submitted) = self.submitted.lock() {
                submitted.push(request.clone());
            }
            self.impact.clone().ok_or_else(|| anyhow!("timed out"))
        }
    }

    impl QueryService for FakeBackend {
        fn ask(&self, _question: &str) -> Result<QueryResponse> {
            let response = self.answer.clone().ok_or_else(|| anyhow!("timed out"))?;
            Ok(QueryResponse { response })
        }
    }
}
