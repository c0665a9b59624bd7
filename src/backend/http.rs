use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::settings::BackendSettings;

use super::wire::{ClusterRecord, EditRequest, GraphSnapshot, ImpactResponse, QueryResponse};
use super::{GraphProvider, ImpactService, QueryService};

/// Blocking JSON client for the analysis backend. Only ever called from
/// worker threads.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let response = response
            .error_for_status()
            .with_context(|| format!("{what} returned an error status"))?;
        response
            .json()
            .with_context(|| format!("{what} returned malformed JSON"))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("GET {url} failed"))?;
        Self::read_json(response, &format!("GET {path}"))
    }
}

impl GraphProvider for HttpBackend {
    fn fetch_graph(&self) -> Result<GraphSnapshot> {
        self.get_json("/graph")
    }

    fn fetch_clusters(&self) -> Result<Vec<ClusterRecord>> {
        self.get_json("/clusters")
    }
}

impl ImpactService for HttpBackend {
    fn submit_edit(&self, request: &EditRequest) -> Result<ImpactResponse> {
        let url = self.url("/update_code");
        debug!(%url, node_id = %request.node_id, "POST");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .with_context(|| format!("POST {url} failed"))?;
        Self::read_json(response, "POST /update_code")
    }
}

impl QueryService for HttpBackend {
    fn ask(&self, question: &str) -> Result<QueryResponse> {
        let url = self.url("/query");
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .query(&[("q", question)])
            .send()
            .with_context(|| format!("POST {url} failed"))?;
        Self::read_json(response, "POST /query")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let settings = BackendSettings {
            base_url: "http://localhost:8005/".to_owned(),
            ..Default::default()
        };
        let backend = HttpBackend::new(&settings).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8005");
        assert_eq!(backend.url("/graph"), "http://localhost:8005/graph");
    }

    #[test]
    fn test_unreachable_backend_reports_context() {
        let settings = BackendSettings {
            base_url: "http://127.0.0.1:1".to_owned(),
            timeout_secs: 1,
        };
        let backend = HttpBackend::new(&settings).unwrap();
        let error = backend.fetch_graph().unwrap_err();
        assert!(format!("{error:#}").contains("GET http://127.0.0.1:1/graph failed"));
    }
}
