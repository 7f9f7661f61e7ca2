use anyhow::Result;
use audio_batch_convert::cli::Args;
use audio_batch_convert::component::AudioConverter;
use audio_batch_convert::init;
use audio_batch_convert::signal::setup_shutdown_signal;
use audio_batch_convert::tools::FfmpegTranscoder;
use clap::Parser;
use console::style;
use log::{info, warn};
use std::process::ExitCode;
use std::sync::Arc;

/// 中斷結束時的狀態碼（128 + SIGINT）
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init::init(args.verbose);

    let shutdown_signal = setup_shutdown_signal()?;
    let (job, settings) = args.resolve()?;
    let transcoder = Arc::new(FfmpegTranscoder::from_settings(&settings));

    let converter = AudioConverter::new(job, settings, transcoder, shutdown_signal);
    let report = converter.run()?;

    if report.interrupted {
        warn!("Program interrupted, {} tasks abandoned", report.abandoned());
        eprintln!(
            "\n{}",
            style(format!(
                "轉檔已中斷：完成 {} 個任務，{} 個未執行",
                report.completed(),
                report.abandoned()
            ))
            .yellow()
            .bold()
        );
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }

    if report.has_failures() {
        warn!(
            "Finished with {} failed conversions and {} failed relocations",
            report.failed.len(),
            report.relocation_failures.len()
        );
    }

    info!("Program exited normally");
    Ok(ExitCode::SUCCESS)
}
