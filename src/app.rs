// app.rs
pub mod collect;
pub mod convert;
pub mod file_dialogs;
pub mod gui;

use eframe::egui;
use eframe::App as EframeApp;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

/// Fixed JPEG output quality.
pub const JPEG_QUALITY: u8 = 92;

pub struct App {
    // Application state. All of it lives on the UI thread; the worker only
    // ever talks to it through the ConversionUpdate channel.
    pub input_paths: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub last_output_dir: Option<PathBuf>,
    pub file_details: Vec<FileDetail>,
    pub progress: ConversionProgress,
    pub ok_count: usize,
    pub fail_count: usize,
    pub status: String,
    pub log_lines: Vec<String>,
    pub running: bool,
    pub currently_processing: Option<usize>,
    pub conversion_receiver: Option<Receiver<ConversionUpdate>>,
}

/// Messages the conversion worker sends back to the UI thread. Indices refer
/// to positions in `App::file_details`.
pub enum ConversionUpdate {
    Log(String),
    Converting(usize),
    FileDone { index: usize, error: Option<String> },
    Completed { ok: usize, failed: usize },
}

#[derive(Default)]
pub struct ConversionProgress {
    pub total: usize,
    pub completed: usize,
}

#[derive(Clone, Debug)]
pub struct FileDetail {
    pub name: String,
    pub status: FileStatus,
    pub error_message: Option<String>,
}

impl FileDetail {
    pub fn new(name: String) -> Self {
        Self {
            name,
            status: FileStatus::Pending,
            error_message: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
}

impl FileStatus {
    pub fn label(self) -> &'static str {
        match self {
            FileStatus::Pending => "Pending",
            FileStatus::Processing => "Processing...",
            FileStatus::Succeeded => "Converted",
            FileStatus::Failed => "Failed",
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self {
            input_paths: Vec::new(),
            files: Vec::new(),
            output_directory: None,
            last_output_dir: None,
            file_details: Vec::new(),
            progress: ConversionProgress::default(),
            ok_count: 0,
            fail_count: 0,
            status: String::from("Select HEIC/HEIF files or a folder"),
            log_lines: Vec::new(),
            running: false,
            currently_processing: None,
            conversion_receiver: None,
        }
    }
}

impl App {
    /// Applies one worker message to the UI state.
    pub fn apply_update(&mut self, update: ConversionUpdate) {
        match update {
            ConversionUpdate::Log(line) => {
                self.log_lines.push(line);
            }
            ConversionUpdate::Converting(index) => {
                self.currently_processing = Some(index);
                if let Some(detail) = self.file_details.get_mut(index) {
                    detail.status = FileStatus::Processing;
                    self.status = format!(
                        "({}/{}) converting {}",
                        index + 1,
                        self.progress.total,
                        detail.name
                    );
                }
            }
            ConversionUpdate::FileDone { index, error } => {
                self.progress.completed += 1;
                self.currently_processing = None;
                if error.is_some() {
                    self.fail_count += 1;
                } else {
                    self.ok_count += 1;
                }
                if let Some(detail) = self.file_details.get_mut(index) {
                    detail.status = if error.is_some() {
                        FileStatus::Failed
                    } else {
                        FileStatus::Succeeded
                    };
                    detail.error_message = error;
                }
            }
            ConversionUpdate::Completed { ok, failed } => {
                self.running = false;
                self.currently_processing = None;
                self.ok_count = ok;
                self.fail_count = failed;
                self.status = String::from("Conversion complete.");
            }
        }
    }
}

impl EframeApp for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain the worker channel first so the frame renders current state.
        let mut updates = Vec::new();
        if let Some(receiver) = &self.conversion_receiver {
            while let Ok(update) = receiver.try_recv() {
                updates.push(update);
            }
        }
        let mut finished = false;
        let needs_redraw = !updates.is_empty();
        for update in updates {
            if matches!(update, ConversionUpdate::Completed { .. }) {
                finished = true;
            }
            self.apply_update(update);
        }
        if finished {
            self.conversion_receiver = None;
        }

        // Render the GUI
        gui::render(self, ctx);

        // Keep repainting while a run is live, otherwise messages sit in the
        // channel until the next input event wakes us up.
        if needs_redraw || self.running {
            ctx.request_repaint();
        }
    }
}
