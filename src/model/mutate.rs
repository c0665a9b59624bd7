use tracing::debug;

use crate::error::ViewerError;

use super::{GraphStore, NodeHandle};

impl GraphStore {
    /// Writes `code` onto the existing record for `node_id`.
    ///
    /// Bodies, links and handles are untouched; only the record's `code` field
    /// and the store revision change.
    pub fn apply_code_edit(
        &mut self,
        node_id: &str,
        code: String,
    ) -> Result<NodeHandle, ViewerError> {
        let Some(handle) = self.handle(node_id) else {
            return Err(ViewerError::MutationTargetMissing {
                node_id: node_id.to_owned(),
            });
        };

        self.records[handle.index()].code = Some(code);
        self.revision = self.revision.wrapping_add(1);
        debug!(node_id, revision = self.revision, "applied code edit");
        Ok(handle)
    }
}
