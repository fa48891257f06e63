// main.rs
mod app;
mod utils;

use app::App;
use eframe::NativeOptions;

fn main() {
    // When launched from a desktop shortcut there is no terminal to read a
    // backtrace from, so fatal failures (graphics init, a panicking worker)
    // get a blocking error dialog before the process dies.
    std::panic::set_hook(Box::new(|info| {
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown error".to_string());
        eprintln!("fatal: {}", message);
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("HEIC to JPEG Converter")
            .set_description(&format!("The program failed unexpectedly:\n{}", message))
            .show();
    }));

    let native_options = NativeOptions {
        initial_window_size: Some(egui::Vec2::new(760.0, 540.0)),
        resizable: true,
        ..Default::default()
    };
    eframe::run_native(
        "HEIC to JPEG Converter",
        native_options,
        Box::new(|_cc| Box::new(App::default())),
    );
}
