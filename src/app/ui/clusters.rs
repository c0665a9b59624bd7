use eframe::egui::{self, Sense, Ui, vec2};

use crate::model::ClusterId;

use super::super::ViewModel;
use super::super::style::cluster_color;

impl ViewModel {
    pub(in crate::app) fn draw_clusters(&mut self, ui: &mut Ui, now: f64) {
        if self.store.clusters().is_empty() {
            ui.label("No clusters detected");
            return;
        }

        let focused = self.selection.style_context().focused_cluster;
        let mut clicked: Option<ClusterId> = None;

        egui::ScrollArea::vertical()
            .id_salt("cluster_list_scroll")
            .max_height(280.0)
            .show(ui, |ui| {
                for cluster in self.store.clusters() {
                    ui.horizontal(|ui| {
                        let (swatch, _) = ui.allocate_exact_size(vec2(10.0, 10.0), Sense::hover());
                        ui.painter().circle_filled(
                            swatch.center(),
                            5.0,
                            cluster_color(Some(cluster.id)),
                        );

                        let selected = focused == Some(cluster.id);
                        if ui
                            .selectable_label(selected, cluster.name.as_str())
                            .clicked()
                        {
                            clicked = Some(cluster.id);
                        }
                        ui.small(format!("{} nodes", cluster.node_count));
                    });
                }
            });

        if let Some(cluster) = clicked {
            self.focus_cluster(cluster, now);
        }
    }
}
