use eframe::egui::{self, Align2, Color32, RichText, Ui};

use crate::state::{AppState, MessageKind, Tab};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the form selector and a busy indicator.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Aicrowd, "AIcrowd");
        ui.selectable_value(&mut state.tab, Tab::HuggingFace, "Hugging Face");

        ui.separator();

        let busy: Vec<&str> = [
            (state.aicrowd.busy(), "aicrowd"),
            (state.hub.busy(), "Hugging Face"),
        ]
        .into_iter()
        .filter_map(|(busy, name)| busy.then_some(name))
        .collect();
        if !busy.is_empty() {
            ui.spinner();
            ui.label(format!("Working: {}", busy.join(", ")));
        }
    });
}

// ---------------------------------------------------------------------------
// Modal message
// ---------------------------------------------------------------------------

/// Show the pending message, if any, until the user clicks OK.
pub fn message_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(msg) = &state.message else {
        return;
    };

    let color = match msg.kind {
        MessageKind::Info => Color32::LIGHT_GREEN,
        MessageKind::Error => Color32::RED,
    };

    let mut dismissed = false;
    egui::Window::new(RichText::new(&msg.title).color(color).strong())
        .id(egui::Id::new("message_window"))
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(msg.body.as_str());
            ui.add_space(8.0);
            ui.vertical_centered(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    if dismissed {
        state.message = None;
    }
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

/// Let the user pick a directory; writes it into `target` when chosen.
pub fn browse_folder(title: &str, target: &mut String) {
    let folder = rfd::FileDialog::new().set_title(title).pick_folder();

    if let Some(path) = folder {
        log::info!("Selected folder {}", path.display());
        *target = path.display().to_string();
    }
}
