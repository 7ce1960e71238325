use eframe::egui::{self, Button, TextEdit, Ui};

use super::panels::browse_folder;
use crate::state::{AppState, Repaint};

const FIELD_WIDTH: f32 = 360.0;

// ---------------------------------------------------------------------------
// Hugging Face form
// ---------------------------------------------------------------------------

pub fn hub_form(ui: &mut Ui, state: &mut AppState, repaint: &Repaint) {
    ui.heading("Hugging Face Dataset Downloader");
    ui.separator();

    let busy = state.hub.busy();
    let form = &mut state.hub;
    let mut login_clicked = false;
    let mut splits_clicked = false;

    egui::Grid::new("hub_fields")
        .num_columns(3)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("HF Token:");
            ui.add(
                TextEdit::singleline(&mut form.token_input)
                    .password(true)
                    .desired_width(FIELD_WIDTH),
            );
            login_clicked = ui.add_enabled(!busy, Button::new("Login")).clicked();
            ui.end_row();

            ui.label("Dataset Name:");
            ui.add(
                TextEdit::singleline(&mut form.dataset)
                    .hint_text("owner/name")
                    .desired_width(FIELD_WIDTH),
            );
            ui.end_row();

            ui.label("Save Location:");
            ui.add(TextEdit::singleline(&mut form.save_dir).desired_width(FIELD_WIDTH));
            if ui.button("Browse").clicked() {
                browse_folder("Select save location", &mut form.save_dir);
            }
            ui.end_row();

            ui.label("Split:");
            egui::ComboBox::from_id_salt("hub_split")
                .width(FIELD_WIDTH)
                .selected_text(form.split.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for name in &form.splits {
                        ui.selectable_value(&mut form.split, name.clone(), name.as_str());
                    }
                });
            splits_clicked = ui
                .add_enabled(!busy, Button::new("Get Available Splits"))
                .clicked();
            ui.end_row();
        });

    ui.add_space(12.0);
    let mut download_clicked = false;
    ui.vertical_centered(|ui: &mut Ui| {
        download_clicked = ui
            .add_enabled(!busy, Button::new("Download Dataset"))
            .clicked();
        ui.add_space(6.0);
        if busy {
            ui.spinner();
        }
        if !form.status.is_empty() {
            ui.label(form.status.as_str());
        }
    });

    if login_clicked {
        state.hub_login(repaint);
    }
    if splits_clicked {
        state.hub_splits(repaint);
    }
    if download_clicked {
        state.hub_download(repaint);
    }
}
