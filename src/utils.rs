use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crate::app::ConversionUpdate;

/// Worker-side logger: timestamps each line and marshals it to the UI
/// thread over the update channel. Sends to a closed channel (window
/// already gone) are dropped.
pub struct Logger {
    sender: Sender<ConversionUpdate>,
}

impl Logger {
    pub fn new(sender: Sender<ConversionUpdate>) -> Self {
        Logger { sender }
    }

    pub fn log(&self, message: String) {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        let log_message = format!("[{}] {}", timestamp, message);
        self.sender
            .send(ConversionUpdate::Log(log_message))
            .unwrap_or_default();
    }
}

pub fn measure_time<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let duration = start.elapsed();
    (result, duration)
}

pub fn get_memory_usage() -> String {
    if let Ok(mem_info) = sys_info::mem_info() {
        format!(
            "Memory: Total: {} MB, Free: {} MB, Used: {} MB",
            mem_info.total / 1024,
            mem_info.free / 1024,
            (mem_info.total - mem_info.free) / 1024
        )
    } else {
        "Unable to get memory info".to_string()
    }
}
