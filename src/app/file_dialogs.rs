// file_dialogs.rs
use rfd::{FileDialog, MessageDialog, MessageLevel};
use std::path::PathBuf;

pub fn select_images() -> Option<Vec<PathBuf>> {
    FileDialog::new()
        .add_filter("HEIC/HEIF", &["heic", "heif"])
        .pick_files()
}

pub fn select_folder() -> Option<PathBuf> {
    FileDialog::new().pick_folder()
}

pub fn select_output_directory() -> Option<PathBuf> {
    FileDialog::new().pick_folder()
}

/// Blocking info box, e.g. for "nothing found".
pub fn show_info(title: &str, text: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(title)
        .set_description(text)
        .show();
}
