use std::sync::Arc;

use eframe::egui;

use crate::config::Settings;
use crate::state::{AppState, Repaint, Tab};
use crate::ui::{aicrowd, hub, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DatasetFetcherApp {
    pub state: AppState,
    repaint: Repaint,
}

impl DatasetFetcherApp {
    pub fn new(ctx: &egui::Context, settings: Settings) -> Self {
        let ctx = ctx.clone();
        Self {
            state: AppState::new(settings),
            repaint: Arc::new(move || ctx.request_repaint()),
        }
    }
}

impl eframe::App for DatasetFetcherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_workers();

        // ---- Top panel: form selector ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: active form ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Aicrowd => aicrowd::aicrowd_form(ui, &mut self.state, &self.repaint),
            Tab::HuggingFace => hub::hub_form(ui, &mut self.state, &self.repaint),
        });

        // ---- Message window (info / error) ----
        panels::message_window(ctx, &mut self.state);
    }
}
