use crate::app::collect;
use crate::app::convert;
use crate::app::file_dialogs;
use crate::app::{App, FileDetail, FileStatus, JPEG_QUALITY};
use egui::{Color32, Frame, ProgressBar, RichText, Rounding, Stroke};
use std::path::PathBuf;
use std::sync::mpsc::channel;

const ACCENT: Color32 = Color32::from_rgb(100, 200, 250);

pub fn render(app: &mut App, ctx: &egui::Context) {
    let frame = Frame {
        fill: Color32::from_rgb(30, 30, 40),
        rounding: Rounding::same(10.0),
        stroke: Stroke::new(1.0, ACCENT),
        inner_margin: egui::style::Margin::same(20.0),
        ..Default::default()
    };

    egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
        ui.heading(RichText::new("HEIC to JPEG Converter").size(28.0).color(ACCENT));
        ui.add_space(20.0);

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                let button_width = 200.0;

                if ui
                    .add_enabled(!app.running, egui::Button::new("Select Files"))
                    .on_hover_text("Pick individual HEIC/HEIF images")
                    .clicked()
                {
                    if let Some(files) = file_dialogs::select_images() {
                        set_inputs(app, files);
                    }
                }
                ui.add_space(5.0);
                if ui
                    .add_enabled(!app.running, egui::Button::new("Select Folder"))
                    .on_hover_text("Scan a folder and its subfolders")
                    .clicked()
                {
                    if let Some(folder) = file_dialogs::select_folder() {
                        set_inputs(app, vec![folder]);
                    }
                }
                ui.add_space(5.0);
                if ui
                    .add_enabled(!app.running, egui::Button::new("Select Output Directory"))
                    .clicked()
                {
                    if let Some(dir) = file_dialogs::select_output_directory() {
                        ui_log(app, format!("Output directory: {}", dir.display()));
                        app.output_directory = Some(dir);
                    }
                }

                ui.add_space(10.0);

                // Display output directory
                ui.group(|ui| {
                    ui.set_width(button_width);
                    ui.label(RichText::new("Output Directory:").size(16.0).color(ACCENT));
                    if let Some(dir) = &app.output_directory {
                        ui.label(dir.to_string_lossy());
                    } else {
                        ui.label("Not selected (JPG_Output beside the input)");
                    }
                });

                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.set_width(button_width);
                    ui.label(RichText::new("Results").size(16.0).color(ACCENT));
                    ui.label(
                        RichText::new(format!("Files: {}", app.files.len()))
                            .color(Color32::from_rgb(200, 200, 200)),
                    );
                    ui.label(
                        RichText::new(format!("Succeeded: {}", app.ok_count))
                            .color(Color32::from_rgb(200, 200, 200)),
                    );
                    ui.label(
                        RichText::new(format!("Failed: {}", app.fail_count))
                            .color(Color32::from_rgb(200, 200, 200)),
                    );
                });

                ui.add_space(10.0);

                if ui
                    .add_enabled(!app.running, egui::Button::new("Start Conversion"))
                    .clicked()
                {
                    if app.files.is_empty() {
                        ui_log(app, "No HEIC/HEIF files selected.".to_string());
                    } else {
                        ui_log(app, "Starting conversion...".to_string());
                        start_conversion(app);
                    }
                }
                ui.add_space(5.0);
                let can_open = app.last_output_dir.is_some() && !app.running;
                if ui
                    .add_enabled(can_open, egui::Button::new("Open Output Folder"))
                    .clicked()
                {
                    if let Some(dir) = app.last_output_dir.clone() {
                        if let Err(e) = open::that(&dir) {
                            ui_log(app, format!("Could not open {}: {}", dir.display(), e));
                        }
                    }
                }
            });

            ui.add_space(10.0);

            // Selected files (scrollable table)
            ui.vertical(|ui| {
                ui.group(|ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(ui.available_height() - 250.0);
                    ui.label(RichText::new("Selected Files:").size(16.0).color(ACCENT));

                    egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                        egui::Grid::new("file_details_grid")
                            .num_columns(3)
                            .striped(true)
                            .show(ui, |ui| {
                                ui.label(RichText::new("#").strong());
                                ui.label(RichText::new("Name").strong());
                                ui.label(RichText::new("Status").strong());
                                ui.end_row();

                                for (index, detail) in app.file_details.iter().enumerate() {
                                    let text_color = if Some(index) == app.currently_processing {
                                        Color32::YELLOW
                                    } else {
                                        Color32::WHITE
                                    };

                                    ui.label(
                                        RichText::new(format!("{}", index + 1)).color(text_color),
                                    );
                                    ui.label(RichText::new(&detail.name).color(text_color));

                                    let status_color = match detail.status {
                                        FileStatus::Pending => text_color,
                                        FileStatus::Processing => Color32::YELLOW,
                                        FileStatus::Succeeded => Color32::GREEN,
                                        FileStatus::Failed => Color32::RED,
                                    };
                                    let status_text = match (&detail.status, &detail.error_message) {
                                        (FileStatus::Failed, Some(err)) => {
                                            format!("{}: {}", detail.status.label(), err)
                                        }
                                        _ => detail.status.label().to_string(),
                                    };
                                    ui.label(RichText::new(status_text).color(status_color));
                                    ui.end_row();
                                }
                            });
                    });
                });
            });
        });

        ui.add_space(20.0);

        // Conversion log with progress bar
        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("Conversion Log").size(16.0).color(ACCENT));

            if app.progress.total > 0 {
                let progress_ratio = app.progress.completed as f32 / app.progress.total as f32;
                ui.add(
                    ProgressBar::new(progress_ratio)
                        .text(format!("{:.0}%", progress_ratio * 100.0)),
                );
            }

            egui::ScrollArea::vertical()
                .max_height(160.0)
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    for log in &app.log_lines {
                        if log.contains("FAILED") || log.contains("Could not") {
                            ui.label(RichText::new(log).color(Color32::RED));
                        } else {
                            ui.label(log);
                        }
                    }
                });

            ui.label(format!(
                "JPEG quality: {} | Succeeded: {} | Failed: {} | {}",
                JPEG_QUALITY, app.ok_count, app.fail_count, app.status
            ));
        });
    });
}

/// Takes a fresh selection, scans it, and fills the file table. An empty
/// scan is announced with an info box, not treated as an error.
fn set_inputs(app: &mut App, inputs: Vec<PathBuf>) {
    app.status = String::from("Scanning for HEIC/HEIF files...");
    let files = collect::collect_files(&inputs);
    app.input_paths = inputs;

    if files.is_empty() {
        app.files.clear();
        app.file_details.clear();
        app.status = String::from("No HEIC/HEIF files found.");
        ui_log(app, "No HEIC/HEIF files found.".to_string());
        file_dialogs::show_info("HEIC to JPEG Converter", "No HEIC/HEIF files found.");
        return;
    }

    app.file_details = files
        .iter()
        .map(|path| {
            FileDetail::new(
                path.file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .into_owned(),
            )
        })
        .collect();
    app.status = format!("{} file(s) ready to convert", files.len());
    ui_log(app, format!("Found {} HEIC/HEIF file(s).", files.len()));
    app.files = files;
}

fn start_conversion(app: &mut App) {
    let files = app.files.clone();
    let output_directory = app
        .output_directory
        .clone()
        .unwrap_or_else(|| convert::default_output_dir(&app.input_paths));

    app.progress.total = files.len();
    app.progress.completed = 0;
    app.ok_count = 0;
    app.fail_count = 0;
    for detail in &mut app.file_details {
        detail.status = FileStatus::Pending;
        detail.error_message = None;
    }
    app.running = true;
    app.status = String::from("Converting...");
    app.last_output_dir = Some(output_directory.clone());

    let (sender, receiver) = channel();
    app.conversion_receiver = Some(receiver);

    std::thread::spawn(move || {
        convert::run_conversion(files, output_directory, sender);
    });
}

fn ui_log(app: &mut App, message: String) {
    app.log_lines.push(format!(
        "[{}] {}",
        chrono::Local::now().format("%H:%M:%S"),
        message
    ));
}
