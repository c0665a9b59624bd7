use eframe::egui::{self, RichText, Ui};

use crate::model::NodeHandle;
use crate::util::{module_name, short_name};

use super::super::ViewModel;
use super::super::selection::{ClusterFocus, Focus};
use super::super::style::cluster_color;

enum DetailsAction {
    BackToOverview,
    BackToCluster,
    SelectMember(String),
    BeginEdit,
    CancelEdit,
    Save,
    AcceptChanges,
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui, now: f64) {
        let mut action = None;

        match self.selection.focus() {
            Focus::Overview => {
                ui.label("Select a node or cluster to inspect it.");
            }
            Focus::Cluster(focus) => self.draw_cluster_details(ui, focus, &mut action),
            Focus::Node(handle) => self.draw_node_details(ui, handle, &mut action),
        }

        let Some(action) = action else {
            return;
        };

        match action {
            DetailsAction::BackToOverview => self.back_to_overview(now),
            DetailsAction::BackToCluster => self.back_to_cluster(now),
            DetailsAction::SelectMember(id) => self.select_member(&id, now),
            DetailsAction::BeginEdit => {
                self.selection.begin_edit(&self.store);
            }
            DetailsAction::CancelEdit => self.selection.cancel_edit(),
            DetailsAction::Save => self.start_save(),
            DetailsAction::AcceptChanges => self.selection.accept_changes(),
        }
    }

    fn draw_cluster_details(
        &self,
        ui: &mut Ui,
        focus: ClusterFocus,
        action: &mut Option<DetailsAction>,
    ) {
        let Some(cluster) = self.store.cluster(focus.cluster) else {
            ui.label("Focused cluster no longer exists in the graph.");
            return;
        };

        ui.label(
            RichText::new(cluster.name.as_str())
                .strong()
                .color(cluster_color(Some(cluster.id))),
        );
        ui.small(format!("cluster {} | {} nodes", cluster.id, cluster.node_count));
        ui.small(format!(
            "centroid ({:.1}, {:.1}, {:.1})",
            focus.centroid.x, focus.centroid.y, focus.centroid.z
        ));
        if ui.button("Back to overview").clicked() {
            *action = Some(DetailsAction::BackToOverview);
        }

        ui.separator();
        ui.label(RichText::new("Members").strong());
        if cluster.members.is_empty() {
            ui.label("No members listed for this cluster.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("cluster_members_scroll")
            .max_height(320.0)
            .show(ui, |ui| {
                for member in &cluster.members {
                    if ui
                        .link(short_name(member))
                        .on_hover_text(member.as_str())
                        .clicked()
                    {
                        *action = Some(DetailsAction::SelectMember(member.clone()));
                    }
                }
            });
    }

    fn draw_node_details(
        &mut self,
        ui: &mut Ui,
        handle: NodeHandle,
        action: &mut Option<DetailsAction>,
    ) {
        let record = self.store.record(handle);
        let saving = self.selection.save_in_flight();

        ui.label(RichText::new(record.name.as_str()).strong());
        ui.small(record.id.as_str());
        if let Some(module) = module_name(&record.id) {
            ui.label(format!("module: {module}"));
        }
        match record.cluster.and_then(|id| self.store.cluster(id)) {
            Some(cluster) => {
                ui.label(
                    RichText::new(format!("cluster: {}", cluster.name))
                        .color(cluster_color(Some(cluster.id))),
                );
            }
            None => {
                ui.label("cluster: none");
            }
        }

        ui.horizontal(|ui| {
            let can_go_back = self.selection.back_target(&self.store).is_some();
            if ui
                .add_enabled(can_go_back, egui::Button::new("Back to cluster"))
                .clicked()
            {
                *action = Some(DetailsAction::BackToCluster);
            }
            if ui.button("Close").clicked() {
                *action = Some(DetailsAction::BackToOverview);
            }
        });

        ui.separator();
        if saving {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Analyzing impact...");
            });
        }

        let heading = if self.selection.is_editing() {
            "Editing source"
        } else {
            "Source"
        };
        ui.label(RichText::new(heading).strong());

        if let Some(buffer) = self.selection.edit_buffer_mut() {
            ui.add_enabled(
                !saving,
                egui::TextEdit::multiline(buffer)
                    .code_editor()
                    .desired_rows(14)
                    .desired_width(f32::INFINITY),
            );
            ui.horizontal(|ui| {
                if ui.add_enabled(!saving, egui::Button::new("Save")).clicked() {
                    *action = Some(DetailsAction::Save);
                }
                if ui.add_enabled(!saving, egui::Button::new("Cancel")).clicked() {
                    *action = Some(DetailsAction::CancelEdit);
                }
            });
        } else {
            match &record.code {
                Some(code) => {
                    egui::ScrollArea::vertical()
                        .id_salt("code_preview_scroll")
                        .max_height(320.0)
                        .show(ui, |ui| {
                            ui.label(RichText::new(code.as_str()).monospace());
                        });
                }
                None => {
                    ui.label("No source available for this node.");
                }
            }
            if ui.add_enabled(!saving, egui::Button::new("Edit")).clicked() {
                *action = Some(DetailsAction::BeginEdit);
            }
        }

        let affected = self.selection.affected();
        if affected.is_empty() {
            return;
        }

        ui.separator();
        ui.label(RichText::new("Impact review").strong());
        ui.label(format!("{} affected nodes", affected.len()));
        for id in affected.iter() {
            ui.label(format!("- {}", short_name(id))).on_hover_text(id);
        }
        if ui.button("Accept changes").clicked() {
            *action = Some(DetailsAction::AcceptChanges);
        }
    }
}
