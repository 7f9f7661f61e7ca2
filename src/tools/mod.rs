mod ffmpeg_command;
mod file_scanner;
mod path_validator;
mod transcoder;

pub use ffmpeg_command::FfmpegCommand;
pub use file_scanner::{SourceFile, discover, exclude_organized};
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
pub use transcoder::{FfmpegTranscoder, Transcoder};
