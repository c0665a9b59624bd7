use std::mem;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

use tracing::{debug, info, warn};

use crate::backend::{SharedBackend, analyze_impact};
use crate::error::ViewerError;
use crate::model::{ClusterId, NodeHandle};

use super::camera::CameraMove;
use super::search::SearchHit;
use super::selection::Focus;
use super::{Notice, PendingSave, ViewModel};

impl ViewModel {
    fn run_camera_move(&mut self, camera_move: Option<CameraMove>, now: f64) {
        let Some(camera_move) = camera_move else {
            return;
        };

        self.animator.animate(
            &self.camera,
            camera_move.framing.position,
            camera_move.framing.look_at,
            camera_move.duration,
            now,
        );
    }

    pub(in crate::app) fn click_node(&mut self, handle: NodeHandle, now: f64) {
        let camera_move = self.selection.click_node(&self.store, handle);
        self.run_camera_move(camera_move, now);
    }

    pub(in crate::app) fn focus_cluster(&mut self, cluster: ClusterId, now: f64) {
        let camera_move = self.selection.focus_cluster(&self.store, cluster);
        self.run_camera_move(camera_move, now);
    }

    pub(in crate::app) fn select_member(&mut self, member_id: &str, now: f64) {
        let camera_move = self.selection.select_member(&self.store, member_id);
        self.run_camera_move(camera_move, now);
    }

    pub(in crate::app) fn back_to_cluster(&mut self, now: f64) {
        let camera_move = self.selection.back_to_cluster(&self.store);
        self.run_camera_move(camera_move, now);
    }

    pub(in crate::app) fn back_to_overview(&mut self, now: f64) {
        let camera_move = self.selection.close();
        self.run_camera_move(camera_move, now);
    }

    pub(in crate::app) fn reset_camera(&mut self, now: f64) {
        let overview = self.selection.framer().overview();
        self.run_camera_move(Some(overview), now);
    }

    pub(in crate::app) fn select_hit(&mut self, hit: SearchHit, now: f64) {
        match self.search.take(hit) {
            SearchHit::Node(handle) => self.click_node(handle, now),
            SearchHit::Cluster(cluster) => self.focus_cluster(cluster, now),
        }
    }

    pub(in crate::app) fn start_save(&mut self) {
        let Some(request) = self.selection.begin_save() else {
            return;
        };

        info!(node_id = %request.node_id, "submitting code edit for impact analysis");
        let (tx, rx) = mpsc::channel();
        let backend = SharedBackend::clone(&self.backend);
        let submitted = request.clone();
        thread::spawn(move || {
            let result = analyze_impact(backend.as_ref(), &submitted);
            let _ = tx.send(result);
        });

        self.pending_save = Some(PendingSave { request, rx });
    }

    pub(in crate::app) fn poll_save(&mut self) -> bool {
        let Some(pending) = self.pending_save.take() else {
            return false;
        };

        let outcome = match pending.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => {
                self.pending_save = Some(pending);
                return true;
            }
            Err(TryRecvError::Disconnected) => {
                Err(ViewerError::impact_failure("impact worker disconnected"))
            }
        };

        match self
            .selection
            .finish_save(&mut self.store, &pending.request, outcome)
        {
            Ok(()) => {
                info!(
                    node_id = %pending.request.node_id,
                    affected = self.selection.affected().len(),
                    "code edit applied"
                );
            }
            Err(error) => self.push_notice(&error),
        }
        false
    }

    /// A reload replaces the store, so it waits until no edit or save is open.
    pub(in crate::app) fn can_reload(&self) -> bool {
        self.pending_save.is_none()
            && !self.selection.save_in_flight()
            && !self.selection.is_editing()
    }

    /// Carries chat, notices, panel layout, camera and focus over from the
    /// view being replaced by a reload.
    pub(in crate::app) fn adopt_session(&mut self, previous: &mut ViewModel) {
        self.chat = mem::take(&mut previous.chat);
        self.notices = mem::take(&mut previous.notices);
        self.breakpoint = mem::take(&mut previous.breakpoint);
        self.search.query = mem::take(&mut previous.search.query);
        self.show_chat = previous.show_chat;
        self.show_sidebar = previous.show_sidebar;
        self.camera = previous.camera;

        match previous.selection.focus() {
            Focus::Overview => {}
            Focus::Node(handle) => {
                let node_id = &previous.store.record(handle).id;
                match self.store.handle(node_id) {
                    Some(handle) => {
                        self.selection.click_node(&self.store, handle);
                    }
                    None => info!(%node_id, "focused node is gone after reload"),
                }
            }
            Focus::Cluster(focus) => {
                if self
                    .selection
                    .focus_cluster(&self.store, focus.cluster)
                    .is_none()
                {
                    info!(cluster = %focus.cluster, "focused cluster is gone after reload");
                }
            }
        }
    }

    pub(in crate::app) fn push_notice(&mut self, error: &ViewerError) {
        if matches!(error, ViewerError::DegenerateGeometry { .. }) {
            debug!(%error, "not surfacing geometry notice");
            return;
        }

        warn!(%error, "showing notice");
        self.notices.push(Notice {
            message: error.to_string(),
        });
    }

    pub(in crate::app) fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }
}
