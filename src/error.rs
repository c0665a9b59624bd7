use thiserror::Error;

/// Failures surfaced by the viewer. Every variant except `DegenerateGeometry`
/// ends up as a user-visible notice.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewerError {
    #[error("graph data unavailable: {reason}")]
    DataUnavailable { reason: String },

    #[error("node {node_id} is no longer present in the graph; edit discarded")]
    MutationTargetMissing { node_id: String },

    #[error("impact analysis failed: {reason}")]
    ImpactServiceFailure { reason: String },

    #[error("cannot frame {subject}: degenerate geometry")]
    DegenerateGeometry { subject: String },
}

impl ViewerError {
    pub fn data_unavailable(error: &anyhow::Error) -> Self {
        Self::DataUnavailable {
            reason: format!("{error:#}"),
        }
    }

    pub fn impact_failure(reason: impl Into<String>) -> Self {
        Self::ImpactServiceFailure {
            reason: reason.into(),
        }
    }

    pub fn keeps_edit_buffer(&self) -> bool {
        matches!(self, Self::ImpactServiceFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_node() {
        let error = ViewerError::MutationTargetMissing {
            node_id: "a::f1".to_owned(),
        };
        assert!(error.to_string().contains("a::f1"));
    }

    #[test]
    fn test_only_service_failures_keep_the_buffer() {
        assert!(ViewerError::impact_failure("status ERROR").keeps_edit_buffer());
        assert!(
            !ViewerError::MutationTargetMissing {
                node_id: "x".to_owned()
            }
            .keeps_edit_buffer()
        );
    }

    #[test]
    fn test_data_unavailable_keeps_context_chain() {
        let error = anyhow::anyhow!("connection refused").context("GET /graph failed");
        let converted = ViewerError::data_unavailable(&error);
        let text = converted.to_string();
        assert!(text.contains("GET /graph failed"));
        assert!(text.contains("connection refused"));
    }
}
