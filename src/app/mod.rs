use std::mem;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{info, warn};

use crate::backend::wire::EditRequest;
use crate::backend::{ImpactReport, SharedBackend, load_graph};
use crate::error::ViewerError;
use crate::model::GraphStore;
use crate::settings::Settings;

mod camera;
mod graph;
mod layout;
mod navigation;
mod render_utils;
mod search;
mod selection;
mod style;
mod ui;

use camera::{CameraAnimator, CameraRig, Projected};
use layout::LayoutEngine;
use search::SearchBox;
use selection::Selection;
use ui::chat::ChatState;
use ui::responsive::Breakpoint;

type LoadResult = Result<GraphStore, ViewerError>;

pub struct RippleApp {
    settings: Settings,
    backend: SharedBackend,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Unavailable(String),
}

struct ViewModel {
    store: GraphStore,
    backend: SharedBackend,
    camera: CameraRig,
    animator: CameraAnimator,
    selection: Selection,
    layout: Box<dyn LayoutEngine>,
    search: SearchBox,
    pending_save: Option<PendingSave>,
    notices: Vec<Notice>,
    chat: ChatState,
    breakpoint: Breakpoint,
    show_chat: bool,
    show_sidebar: bool,
    view_scratch: ViewScratch,
}

struct PendingSave {
    request: EditRequest,
    rx: Receiver<Result<ImpactReport, ViewerError>>,
}

struct Notice {
    message: String,
}

#[derive(Default)]
struct ViewScratch {
    projected: Vec<Option<Projected>>,
    radii: Vec<f32>,
    draw_order: Vec<usize>,
}

impl RippleApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings, backend: SharedBackend) -> Self {
        let state = Self::start_load(&backend);
        Self {
            settings,
            backend,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(backend: &SharedBackend) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();
        let backend = SharedBackend::clone(backend);

        thread::spawn(move || {
            let result = load_graph(backend.as_ref());
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(backend: &SharedBackend) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(backend),
        }
    }

    fn ready_or_unavailable(&self, result: LoadResult, previous: AppState) -> AppState {
        match result {
            Ok(store) => {
                let mut model =
                    ViewModel::new(store, &self.settings, SharedBackend::clone(&self.backend));
                if let AppState::Ready(mut previous) = previous {
                    model.adopt_session(&mut previous);
                    info!(nodes = model.store.node_count(), "graph reloaded");
                }
                AppState::Ready(Box::new(model))
            }
            Err(error) => {
                warn!(%error, "graph load failed");
                AppState::Unavailable(error.to_string())
            }
        }
    }
}

impl eframe::App for RippleApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err(ViewerError::DataUnavailable {
                            reason: "background load worker disconnected".to_owned(),
                        }));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading dependency graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Unavailable(reason) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Backend unavailable");
                        ui.add_space(6.0);
                        ui.label(reason.as_str());
                        ui.small(format!("backend: {}", self.settings.backend.base_url));
                        ui.add_space(10.0);
                        retry = ui.button("Retry").clicked();
                    });
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() && model.can_reload() {
                    info!("reloading graph in the background");
                    self.reload_rx = Some(Self::spawn_load(&self.backend));
                }

                if let Some(rx) = self.reload_rx.take() {
                    if !model.can_reload() {
                        self.reload_rx = Some(rx);
                    } else {
                        match rx.try_recv() {
                            Ok(Ok(store)) => transition = Some(Ok(store)),
                            Ok(Err(error)) => {
                                warn!(%error, "graph reload failed; keeping current graph");
                                model.push_notice(&error);
                            }
                            Err(TryRecvError::Empty) => {
                                self.reload_rx = Some(rx);
                                ctx.request_repaint();
                            }
                            Err(TryRecvError::Disconnected) => {
                                model.push_notice(&ViewerError::DataUnavailable {
                                    reason: "background load worker disconnected".to_owned(),
                                });
                            }
                        }
                    }
                }
            }
        }

        if retry {
            info!("retrying graph load");
            self.state = Self::start_load(&self.backend);
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            let previous = mem::replace(&mut self.state, AppState::Unavailable(String::new()));
            self.state = self.ready_or_unavailable(result, previous);
        }
    }
}
