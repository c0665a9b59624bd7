use eframe::egui::{self, Context, Rect, RichText, vec2};

use crate::util::short_name;

use super::super::ViewModel;
use super::super::search::SearchHit;
use super::super::style::cluster_color;

impl ViewModel {
    pub(in crate::app) fn draw_search(&mut self, ctx: &Context, canvas: Rect, now: f64) {
        let mut picked = None;

        egui::Area::new(egui::Id::new("graph_search"))
            .fixed_pos(canvas.left_top() + vec2(12.0, 12.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(280.0);
                    ui.add(
                        egui::TextEdit::singleline(&mut self.search.query)
                            .hint_text("Search nodes or clusters")
                            .desired_width(f32::INFINITY),
                    );

                    let Some(hits) = self.search.dropdown(&self.store) else {
                        return;
                    };

                    ui.separator();
                    for &hit in hits.iter() {
                        let (label, color, kind) = match hit {
                            SearchHit::Cluster(id) => {
                                let name = self
                                    .store
                                    .cluster(id)
                                    .map_or("unknown cluster", |cluster| cluster.name.as_str());
                                (name, cluster_color(Some(id)), "cluster")
                            }
                            SearchHit::Node(handle) => {
                                let record = self.store.record(handle);
                                (short_name(&record.id), cluster_color(record.cluster), "node")
                            }
                        };

                        ui.horizontal(|ui| {
                            if ui
                                .selectable_label(false, RichText::new(label).color(color))
                                .clicked()
                            {
                                picked = Some(hit);
                            }
                            ui.small(kind);
                        });
                    }
                });
            });

        if let Some(hit) = picked {
            self.select_hit(hit, now);
        }
    }
}
