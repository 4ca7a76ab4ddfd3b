// Adapters - External system implementations

pub mod clock_engine;
pub mod console;
pub mod preview_ffmpeg;
pub mod probe_ffprobe;
pub mod render_ffmpeg;

// Re-export adapters
pub use clock_engine::ClockPlaybackEngine;
pub use console::{ArgsFilePicker, StderrAlert};
pub use preview_ffmpeg::FfmpegPreviewAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use render_ffmpeg::FfmpegRenderAdapter;
