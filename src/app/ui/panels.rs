use eframe::egui::{self, Align, Color32, Context, Layout, RichText};

use crate::backend::SharedBackend;
use crate::model::GraphStore;
use crate::settings::Settings;

use super::super::camera::{CameraAnimator, CameraRig, Framer};
use super::super::layout::ForceLayout;
use super::super::search::SearchBox;
use super::super::selection::Selection;
use super::super::{ViewModel, ViewScratch};
use super::chat::ChatState;
use super::responsive::Breakpoint;

const NOTICE_COLOR: Color32 = Color32::from_rgb(0xFF, 0x9F, 0x0A);

impl ViewModel {
    pub(in crate::app) fn new(
        mut store: GraphStore,
        settings: &Settings,
        backend: SharedBackend,
    ) -> Self {
        let framer = Framer::new(settings.camera.clone());
        let camera = CameraRig::new(framer.overview().framing);

        let mut layout = ForceLayout::new(settings.layout.clone());
        let (bodies, links) = store.simulation_parts();
        layout.warm_up(bodies, links);

        Self {
            store,
            backend,
            camera,
            animator: CameraAnimator::default(),
            selection: Selection::new(framer),
            layout: Box::new(layout),
            search: SearchBox::default(),
            pending_save: None,
            notices: Vec::new(),
            chat: ChatState::default(),
            breakpoint: Breakpoint::default(),
            show_chat: true,
            show_sidebar: true,
            view_scratch: ViewScratch::default(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        let now = ctx.input(|input| input.time);

        let saving = self.poll_save();
        let chatting = self.chat.poll();
        if saving || chatting {
            ctx.request_repaint();
        }

        if let Some(narrow) = self.breakpoint.observe(ctx.available_rect().width()) {
            self.show_chat = !narrow;
            self.show_sidebar = !narrow;
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("RippleScope");
                    ui.separator();
                    ui.label(format!("nodes: {}", self.store.node_count()));
                    ui.label(format!("links: {}", self.store.link_count()));
                    ui.label(format!("clusters: {}", self.store.cluster_count()));
                    ui.label(format!("distance: {:.0}", self.camera.distance()));
                    ui.separator();

                    let reload_button = ui
                        .add_enabled(
                            !is_reloading && self.can_reload(),
                            egui::Button::new("Reload graph"),
                        )
                        .on_disabled_hover_text("Save or cancel the open edit first");
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if is_reloading {
                        ui.spinner();
                    }
                    if ui.button("Reset camera").clicked() {
                        self.reset_camera(now);
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.toggle_value(&mut self.show_sidebar, "Details");
                        ui.toggle_value(&mut self.show_chat, "Chat");
                    });
                });
            });

        if !self.notices.is_empty() {
            let mut dismissed = None;
            egui::TopBottomPanel::top("notices").show(ctx, |ui| {
                for (index, notice) in self.notices.iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(notice.message.as_str()).color(NOTICE_COLOR));
                        if ui.small_button("Dismiss").clicked() {
                            dismissed = Some(index);
                        }
                    });
                }
            });
            if let Some(index) = dismissed {
                self.dismiss_notice(index);
            }
        }

        if self.show_chat {
            egui::SidePanel::left("chat")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| self.chat.draw(ui, &self.backend));
        }

        if self.show_sidebar {
            egui::SidePanel::right("sidebar")
                .resizable(true)
                .default_width(360.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("sidebar_scroll")
                        .show(ui, |ui| {
                            egui::CollapsingHeader::new("Artifact")
                                .default_open(true)
                                .show(ui, |ui| self.draw_details(ui, now));
                            egui::CollapsingHeader::new("Clusters")
                                .default_open(true)
                                .show(ui, |ui| self.draw_clusters(ui, now));
                        });
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let canvas = self.draw_graph(ui, now);
                self.draw_search(ui.ctx(), canvas, now);
            });
    }
}
