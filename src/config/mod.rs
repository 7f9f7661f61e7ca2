pub mod job;
pub mod load;
pub mod types;

pub use job::{Job, normalize_format};
pub use types::{
    ConverterSettings, DEFAULT_FFMPEG_PATH, DEFAULT_INPUT_FORMAT, DEFAULT_OUTPUT_FORMATS,
};
