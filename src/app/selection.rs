//! What the user is looking at, and the edit / impact-review cycle attached to
//! a focused node.
//!
//! Every transition either applies completely and returns the camera move the
//! caller should animate, or is rejected and leaves the state untouched.

use std::collections::BTreeSet;

use glam::Vec3;
use tracing::debug;

use crate::backend::ImpactReport;
use crate::backend::wire::EditRequest;
use crate::error::ViewerError;
use crate::model::{ClusterId, GraphStore, NodeHandle};

use super::camera::{CameraMove, Framer};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ClusterFocus {
    pub cluster: ClusterId,
    pub centroid: Vec3,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) enum Focus {
    #[default]
    Overview,
    Node(NodeHandle),
    Cluster(ClusterFocus),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct EditSession {
    pub node_id: String,
    pub buffer: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct AffectedSet {
    ids: BTreeSet<String>,
}

impl AffectedSet {
    pub(in crate::app) fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub(in crate::app) fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub(in crate::app) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(in crate::app) fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    fn replace(&mut self, ids: Vec<String>) {
        self.ids = ids.into_iter().collect();
    }

    fn clear(&mut self) {
        self.ids.clear();
    }
}

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct StyleContext<'a> {
    pub focused_node: Option<NodeHandle>,
    pub focused_cluster: Option<ClusterId>,
    pub affected: &'a AffectedSet,
}

#[derive(Debug)]
pub(in crate::app) struct Selection {
    framer: Framer,
    focus: Focus,
    edit: Option<EditSession>,
    affected: AffectedSet,
    save_in_flight: bool,
}

impl Selection {
    pub(in crate::app) fn new(framer: Framer) -> Self {
        Self {
            framer,
            focus: Focus::Overview,
            edit: None,
            affected: AffectedSet::default(),
            save_in_flight: false,
        }
    }

    pub(in crate::app) fn focus(&self) -> Focus {
        self.focus
    }

    pub(in crate::app) fn focused_node(&self) -> Option<NodeHandle> {
        match self.focus {
            Focus::Node(handle) => Some(handle),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(in crate::app) fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub(in crate::app) fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    pub(in crate::app) fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        self.edit.as_mut().map(|session| &mut session.buffer)
    }

    pub(in crate::app) fn affected(&self) -> &AffectedSet {
        &self.affected
    }

    pub(in crate::app) fn save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    pub(in crate::app) fn framer(&self) -> &Framer {
        &self.framer
    }

    pub(in crate::app) fn style_context(&self) -> StyleContext<'_> {
        StyleContext {
            focused_node: self.focused_node(),
            focused_cluster: match self.focus {
                Focus::Cluster(focus) => Some(focus.cluster),
                _ => None,
            },
            affected: &self.affected,
        }
    }

    fn leave_current(&mut self) {
        self.edit = None;
        self.affected.clear();
    }

    fn enter_node(&mut self, store: &GraphStore, handle: NodeHandle) -> Option<CameraMove> {
        self.leave_current();
        self.focus = Focus::Node(handle);

        match self.framer.node(store.position(handle)) {
            Ok(camera_move) => Some(camera_move),
            Err(error) => {
                debug!(node_id = %store.record(handle).id, %error, "skipping node framing");
                None
            }
        }
    }

    fn enter_overview(&mut self) -> CameraMove {
        self.leave_current();
        self.focus = Focus::Overview;
        self.framer.overview()
    }

    /// Clicking the focused node again returns to the overview; any other node
    /// becomes the new focus.
    pub(in crate::app) fn click_node(
        &mut self,
        store: &GraphStore,
        handle: NodeHandle,
    ) -> Option<CameraMove> {
        if handle.index() >= store.node_count() {
            debug!(index = handle.index(), "rejecting click on unknown node");
            return None;
        }

        if self.focus == Focus::Node(handle) {
            return Some(self.enter_overview());
        }

        self.enter_node(store, handle)
    }

    /// Focuses a cluster from anywhere. Rejected when the cluster is unknown or
    /// has no member nodes to frame.
    pub(in crate::app) fn focus_cluster(
        &mut self,
        store: &GraphStore,
        cluster: ClusterId,
    ) -> Option<CameraMove> {
        if store.cluster(cluster).is_none() {
            debug!(%cluster, "rejecting focus on unknown cluster");
            return None;
        }

        let Some(centroid) = store.cluster_centroid(cluster) else {
            debug!(%cluster, "rejecting focus on cluster without members");
            return None;
        };

        let camera_move = match self.framer.cluster(&store.member_positions(cluster)) {
            Ok(camera_move) => camera_move,
            Err(error) => {
                debug!(%cluster, %error, "rejecting cluster focus");
                return None;
            }
        };

        self.leave_current();
        self.focus = Focus::Cluster(ClusterFocus { cluster, centroid });
        Some(camera_move)
    }

    pub(in crate::app) fn select_member(
        &mut self,
        store: &GraphStore,
        member_id: &str,
    ) -> Option<CameraMove> {
        if !matches!(self.focus, Focus::Cluster(_)) {
            return None;
        }

        let Some(handle) = store.handle(member_id) else {
            debug!(member_id, "rejecting unknown cluster member");
            return None;
        };

        self.enter_node(store, handle)
    }

    /// The cluster "back to cluster" would return to, if allowed right now.
    pub(in crate::app) fn back_target(&self, store: &GraphStore) -> Option<ClusterId> {
        let Focus::Node(handle) = self.focus else {
            return None;
        };
        if !self.affected.is_empty() {
            return None;
        }

        let cluster = store.record(handle).cluster?;
        store.cluster(cluster).map(|_| cluster)
    }

    pub(in crate::app) fn back_to_cluster(&mut self, store: &GraphStore) -> Option<CameraMove> {
        let cluster = self.back_target(store)?;
        self.focus_cluster(store, cluster)
    }

    pub(in crate::app) fn close(&mut self) -> Option<CameraMove> {
        if self.focus == Focus::Overview {
            return None;
        }

        Some(self.enter_overview())
    }

    pub(in crate::app) fn begin_edit(&mut self, store: &GraphStore) -> bool {
        let Focus::Node(handle) = self.focus else {
            return false;
        };
        if self.edit.is_some() || self.save_in_flight {
            return false;
        }

        let record = store.record(handle);
        self.edit = Some(EditSession {
            node_id: record.id.clone(),
            buffer: record.code.clone().unwrap_or_default(),
        });
        true
    }

    pub(in crate::app) fn cancel_edit(&mut self) {
        self.edit = None;
    }

    pub(in crate::app) fn begin_save(&mut self) -> Option<EditRequest> {
        if self.save_in_flight {
            return None;
        }

        let session = self.edit.as_ref()?;
        let request = EditRequest {
            node_id: session.node_id.clone(),
            code: session.buffer.clone(),
        };
        self.save_in_flight = true;
        self.affected.clear();
        Some(request)
    }

    /// Resolves the save started by [`Selection::begin_save`].
    ///
    /// On success the edit is written into the store even if the user has
    /// navigated elsewhere meanwhile; the impact review is only shown when the
    /// edited node is still focused.
    pub(in crate::app) fn finish_save(
        &mut self,
        store: &mut GraphStore,
        request: &EditRequest,
        outcome: Result<ImpactReport, ViewerError>,
    ) -> Result<(), ViewerError> {
        self.save_in_flight = false;

        let report = match outcome {
            Ok(report) => report,
            Err(error) => {
                if !error.keeps_edit_buffer() {
                    self.drop_session_for(&request.node_id);
                }
                return Err(error);
            }
        };

        let handle = match store.apply_code_edit(&request.node_id, request.code.clone()) {
            Ok(handle) => handle,
            Err(error) => {
                self.drop_session_for(&request.node_id);
                return Err(error);
            }
        };

        self.drop_session_for(&request.node_id);
        if self.focus == Focus::Node(handle) {
            self.affected.replace(report.affected);
        } else {
            debug!(node_id = %request.node_id, "focus moved during save; discarding impact review");
        }
        Ok(())
    }

    fn drop_session_for(&mut self, node_id: &str) {
        if self
            .edit
            .as_ref()
            .is_some_and(|session| session.node_id == node_id)
        {
            self.edit = None;
        }
    }

    pub(in crate::app) fn accept_changes(&mut self) {
        self.affected.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::test_support::sample_store;
    use crate::settings::CameraSettings;

    fn selection() -> Selection {
        Selection::new(Framer::new(CameraSettings::default()))
    }

    fn updated(ids: &[&str]) -> Result<ImpactReport, ViewerError> {
        Ok(ImpactReport {
            affected: ids.iter().map(|id| (*id).to_owned()).collect(),
        })
    }

    fn focus_node(selection: &mut Selection, store: &GraphStore, id: &str) -> NodeHandle {
        let handle = store.handle(id).unwrap();
        selection.click_node(store, handle);
        handle
    }

    #[test]
    fn test_node_click_frames_node() {
        let store = sample_store();
        let mut selection = selection();
        let handle = store.handle("a::f1").unwrap();

        let camera_move = selection.click_node(&store, handle).unwrap();

        assert_eq!(selection.focus(), Focus::Node(handle));
        assert!((camera_move.framing.position - Vec3::new(60.0, 0.0, 0.0)).length() < 1e-4);
        assert_eq!(camera_move.framing.look_at, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(camera_move.duration, Duration::from_millis(1500));
    }

    #[test]
    fn test_node_at_origin_is_focused_without_camera_move() {
        use crate::backend::wire::GraphSnapshot;
        use crate::model::test_support::raw_node;

        let store = GraphStore::from_snapshot(
            GraphSnapshot {
                nodes: vec![raw_node("a::origin", None, [0.0, 0.0, 0.0])],
                links: Vec::new(),
            },
            Vec::new(),
        );
        let mut selection = selection();
        let handle = store.handle("a::origin").unwrap();

        assert!(selection.click_node(&store, handle).is_none());
        assert_eq!(selection.focus(), Focus::Node(handle));
        assert!(selection.begin_edit(&store));
    }

    #[test]
    fn test_clicking_focused_node_returns_to_overview() {
        let store = sample_store();
        let mut selection = selection();
        let handle = focus_node(&mut selection, &store, "a::f1");

        let camera_move = selection.click_node(&store, handle).unwrap();

        assert_eq!(selection.focus(), Focus::Overview);
        assert_eq!(camera_move.framing.position, Vec3::new(0.0, 0.0, 220.0));
    }

    #[test]
    fn test_switching_nodes_clears_edit_and_review() {
        let mut store = sample_store();
        let mut selection = selection();
        focus_node(&mut selection, &store, "a::f1");
        selection.begin_edit(&store);
        let request = selection.begin_save().unwrap();
        selection
            .finish_save(&mut store, &request, updated(&["a::f2"]))
            .unwrap();
        assert!(!selection.affected().is_empty());

        focus_node(&mut selection, &store, "a::f2");
        assert!(selection.affected().is_empty());
        assert!(!selection.is_editing());
    }

    #[test]
    fn test_cluster_focus_uses_centroid_and_bounds() {
        let store = sample_store();
        let mut selection = selection();

        let camera_move = selection.focus_cluster(&store, ClusterId(0)).unwrap();

        let Focus::Cluster(focus) = selection.focus() else {
            panic!("expected cluster focus");
        };
        assert!((focus.centroid - Vec3::new(8.0, 4.0, 4.0 / 3.0)).length() < 1e-5);
        // bounds x -6..20, y 0..10, z -4..8: center (7, 5, 2), spread 26
        assert_eq!(camera_move.framing.look_at, Vec3::new(7.0, 5.0, 2.0));
        assert_eq!(camera_move.framing.position, Vec3::new(7.0, 5.0, 122.0));
        assert_eq!(camera_move.duration, Duration::from_millis(1800));
    }

    #[test]
    fn test_unknown_or_empty_cluster_is_rejected() {
        let store = sample_store();
        let mut selection = selection();
        let handle = focus_node(&mut selection, &store, "a::f2");

        assert!(selection.focus_cluster(&store, ClusterId(7)).is_none());
        assert_eq!(selection.focus(), Focus::Node(handle));
    }

    #[test]
    fn test_member_list_selects_node() {
        let store = sample_store();
        let mut selection = selection();
        selection.focus_cluster(&store, ClusterId(0));

        assert!(selection.select_member(&store, "a::f3").is_some());
        assert_eq!(
            selection.focus(),
            Focus::Node(store.handle("a::f3").unwrap())
        );
    }

    #[test]
    fn test_unknown_member_is_rejected() {
        let store = sample_store();
        let mut selection = selection();
        selection.focus_cluster(&store, ClusterId(0));
        let before = selection.focus();

        assert!(selection.select_member(&store, "gone::node").is_none());
        assert_eq!(selection.focus(), before);
    }

    #[test]
    fn test_member_selection_requires_cluster_focus() {
        let store = sample_store();
        let mut selection = selection();
        assert!(selection.select_member(&store, "a::f1").is_none());
        assert_eq!(selection.focus(), Focus::Overview);
    }

    #[test]
    fn test_back_to_cluster_only_without_pending_review() {
        let mut store = sample_store();
        let mut selection = selection();
        focus_node(&mut selection, &store, "a::f1");
        assert_eq!(selection.back_target(&store), Some(ClusterId(0)));

        selection.begin_edit(&store);
        let request = selection.begin_save().unwrap();
        selection
            .finish_save(&mut store, &request, updated(&["a::f2"]))
            .unwrap();
        assert!(selection.back_to_cluster(&store).is_none());

        selection.accept_changes();
        assert!(selection.back_to_cluster(&store).is_some());
        assert!(matches!(selection.focus(), Focus::Cluster(_)));
    }

    #[test]
    fn test_back_to_cluster_needs_cluster_on_node() {
        let store = sample_store();
        let mut selection = selection();
        let handle = focus_node(&mut selection, &store, "util::log");
        assert!(selection.back_to_cluster(&store).is_none());
        assert_eq!(selection.focus(), Focus::Node(handle));
    }

    #[test]
    fn test_close_returns_to_overview() {
        let store = sample_store();
        let mut selection = selection();
        assert!(selection.close().is_none());

        selection.focus_cluster(&store, ClusterId(1));
        assert!(selection.close().is_some());
        assert_eq!(selection.focus(), Focus::Overview);
    }

    #[test]
    fn test_edit_then_cancel_leaves_code_unchanged() {
        let store = sample_store();
        let mut selection = selection();
        let handle = focus_node(&mut selection, &store, "a::f1");
        let original = store.record(handle).code.clone();

        assert!(selection.begin_edit(&store));
        assert_eq!(
            selection.edit().map(|session| session.buffer.as_str()),
            original.as_deref()
        );
        selection
            .edit_buffer_mut()
            .unwrap()
            .push_str("\n// scratch");
        selection.cancel_edit();

        assert!(!selection.is_editing());
        assert_eq!(store.record(handle).code, original);
    }

    #[test]
    fn test_begin_edit_requires_node_focus() {
        let store = sample_store();
        let mut selection = selection();
        assert!(!selection.begin_edit(&store));
        selection.focus_cluster(&store, ClusterId(0));
        assert!(!selection.begin_edit(&store));
    }

    #[test]
    fn test_updated_save_applies_code_and_opens_review() {
        let mut store = sample_store();
        let mut selection = selection();
        let handle = focus_node(&mut selection, &store, "a::f1");
        selection.begin_edit(&store);
        *selection.edit_buffer_mut().unwrap() = "fn f1() { 2 }".to_owned();

        let request = selection.begin_save().unwrap();
        assert!(selection.save_in_flight());
        assert!(!selection.begin_edit(&store));
        assert!(selection.begin_save().is_none());

        selection
            .finish_save(&mut store, &request, updated(&["a::f2", "a::f3"]))
            .unwrap();

        assert!(!selection.save_in_flight());
        assert!(!selection.is_editing());
        assert_eq!(
            selection.affected().iter().collect::<Vec<_>>(),
            ["a::f2", "a::f3"]
        );
        assert_eq!(store.record(handle).code.as_deref(), Some("fn f1() { 2 }"));
    }

    #[test]
    fn test_failed_save_keeps_buffer_and_store() {
        let mut store = sample_store();
        let mut selection = selection();
        let handle = focus_node(&mut selection, &store, "a::f1");
        let original = store.record(handle).code.clone();
        let revision = store.revision();
        selection.begin_edit(&store);
        *selection.edit_buffer_mut().unwrap() = "broken".to_owned();

        let request = selection.begin_save().unwrap();
        let error = selection
            .finish_save(
                &mut store,
                &request,
                Err(ViewerError::impact_failure("service answered with status \"ERROR\"")),
            )
            .unwrap_err();

        assert!(matches!(error, ViewerError::ImpactServiceFailure { .. }));
        assert!(selection.is_editing());
        assert_eq!(
            selection.edit().map(|session| session.buffer.as_str()),
            Some("broken")
        );
        assert_eq!(store.record(handle).code, original);
        assert_eq!(store.revision(), revision);
        assert!(selection.affected().is_empty());
    }

    #[test]
    fn test_new_save_clears_previous_review() {
        let mut store = sample_store();
        let mut selection = selection();
        focus_node(&mut selection, &store, "a::f1");
        selection.begin_edit(&store);
        let request = selection.begin_save().unwrap();
        selection
            .finish_save(&mut store, &request, updated(&["a::f2"]))
            .unwrap();

        selection.begin_edit(&store);
        selection.begin_save().unwrap();
        assert!(selection.affected().is_empty());
    }

    #[test]
    fn test_save_completing_after_navigation_discards_review() {
        let mut store = sample_store();
        let mut selection = selection();
        let handle = focus_node(&mut selection, &store, "a::f1");
        selection.begin_edit(&store);
        *selection.edit_buffer_mut().unwrap() = "fn f1() { 3 }".to_owned();
        let request = selection.begin_save().unwrap();

        focus_node(&mut selection, &store, "a::f2");
        selection
            .finish_save(&mut store, &request, updated(&["a::f3"]))
            .unwrap();

        assert_eq!(store.record(handle).code.as_deref(), Some("fn f1() { 3 }"));
        assert!(selection.affected().is_empty());
        assert_eq!(
            selection.focus(),
            Focus::Node(store.handle("a::f2").unwrap())
        );
    }

    #[test]
    fn test_missing_target_discards_session() {
        let mut store = sample_store();
        let mut selection = selection();
        focus_node(&mut selection, &store, "a::f1");
        selection.begin_edit(&store);
        selection.begin_save().unwrap();
        let request = EditRequest {
            node_id: "a::f1".to_owned(),
            code: "x".to_owned(),
        };
        let stale = EditRequest {
            node_id: "gone::node".to_owned(),
            ..request
        };

        let error = selection
            .finish_save(&mut store, &stale, updated(&[]))
            .unwrap_err();
        assert!(matches!(error, ViewerError::MutationTargetMissing { .. }));
        assert!(!selection.save_in_flight());
    }

    #[test]
    fn test_style_context_reflects_focus() {
        let store = sample_store();
        let mut selection = selection();
        selection.focus_cluster(&store, ClusterId(1));
        let context = selection.style_context();
        assert_eq!(context.focused_cluster, Some(ClusterId(1)));
        assert_eq!(context.focused_node, None);
    }
}
