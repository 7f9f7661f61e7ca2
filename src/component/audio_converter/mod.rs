//! 批次音訊轉檔元件
//!
//! 使用 ffmpeg 將輸入格式的音訊轉成多個輸出格式，輸出放在原始檔旁的格式資料夾，
//! 全部轉完後原始檔移到以自身格式命名的資料夾

mod layout;
mod main;
mod relocator;
mod report;
mod task_scheduler;
mod worker;

pub use layout::{
    format_directory, output_collisions, output_path_for, relocation_path_for, resolve_output_path,
    resolve_relocation_path,
};
pub use main::AudioConverter;
pub use relocator::{RelocationOutcome, relocate};
pub use report::{
    ConvertedFile, FailedConversion, RelocationFailure, RunReport, SkippedConversion, aggregate,
};
pub use task_scheduler::{
    ProgressSnapshot, RelocationRecord, ScheduleResult, TaskRecord, TaskScheduler,
};
pub use worker::{ConversionOutcome, ConversionTask, ConversionWorker, SkipReason, TaskState};
