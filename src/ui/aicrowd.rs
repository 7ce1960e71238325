use eframe::egui::{self, Button, ScrollArea, TextEdit, Ui};

use super::panels::browse_folder;
use crate::aicrowd::DownloadMode;
use crate::state::{AppState, Repaint};

const FIELD_WIDTH: f32 = 360.0;

// ---------------------------------------------------------------------------
// AIcrowd form
// ---------------------------------------------------------------------------

pub fn aicrowd_form(ui: &mut Ui, state: &mut AppState, repaint: &Repaint) {
    ui.heading("AIcrowd Dataset Downloader");
    ui.separator();

    let busy = state.aicrowd.busy();
    let form = &mut state.aicrowd;

    egui::Grid::new("aicrowd_fields")
        .num_columns(3)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("API Key:");
            ui.add(
                TextEdit::singleline(&mut form.api_key)
                    .password(true)
                    .desired_width(FIELD_WIDTH),
            );
            ui.end_row();

            ui.label("Challenge Name:");
            ui.add(TextEdit::singleline(&mut form.challenge).desired_width(FIELD_WIDTH));
            ui.end_row();

            ui.label("Download Location:");
            ui.add(TextEdit::singleline(&mut form.download_dir).desired_width(FIELD_WIDTH));
            if ui.button("Browse").clicked() {
                browse_folder("Select download location", &mut form.download_dir);
            }
            ui.end_row();
        });

    ui.add_space(4.0);
    ui.radio_value(&mut form.mode, DownloadMode::Index, "Download by Index");
    ui.radio_value(&mut form.mode, DownloadMode::Filename, "Download by Filename");
    ui.add_space(4.0);

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Enter Index/Filename:");
        ui.add(TextEdit::singleline(&mut form.items).desired_width(FIELD_WIDTH));
    });
    ui.weak("(Use comma for multiple values)");

    ui.add_space(8.0);
    let mut list_clicked = false;
    let mut download_clicked = false;
    ui.horizontal(|ui: &mut Ui| {
        list_clicked = ui
            .add_enabled(!busy, Button::new("List Available Datasets"))
            .clicked();
        download_clicked = ui
            .add_enabled(!busy, Button::new("Download Dataset(s)"))
            .clicked();
        if busy {
            ui.spinner();
        }
    });

    ui.add_space(8.0);
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // Read-only view: a `&str` buffer cannot be edited.
            let mut output = state.aicrowd.output.as_str();
            ui.add(
                TextEdit::multiline(&mut output)
                    .code_editor()
                    .desired_rows(10)
                    .desired_width(f32::INFINITY),
            );
        });

    if list_clicked {
        state.aicrowd_list(repaint);
    }
    if download_clicked {
        state.aicrowd_download(repaint);
    }
}
