//! E2E Integration Tests
//!
//! 使用真正的 ffmpeg 轉檔；系統沒有 ffmpeg 時跳過

use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use audio_batch_convert::component::AudioConverter;
use audio_batch_convert::config::{ConverterSettings, Job};
use audio_batch_convert::tools::FfmpegTranscoder;
use tempfile::TempDir;

/// 以 lavfi 產生一秒的正弦波 wav
fn generate_tone(path: &Path) -> bool {
    Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y", "-f", "lavfi", "-i"])
        .arg("sine=frequency=440:duration=1")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

#[test]
fn test_ffmpeg_wav_to_flac_e2e() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();

    if !generate_tone(&base.join("tone.wav")) || !generate_tone(&base.join("beep.wav")) {
        println!("跳過測試：找不到 ffmpeg 或無法產生測試音訊");
        return;
    }

    let settings = ConverterSettings {
        jobs: Some(2),
        ..ConverterSettings::default()
    };
    let job = Job::new(base, "wav", &["flac", "wav"]).unwrap();
    let transcoder = Arc::new(FfmpegTranscoder::from_settings(&settings));

    let report = AudioConverter::new(job, settings, transcoder, Arc::new(AtomicBool::new(false)))
        .quiet()
        .run()
        .unwrap();

    println!(
        "成功 {} / 跳過 {} / 失敗 {}",
        report.succeeded.len(),
        report.skipped.len(),
        report.failed.len()
    );

    assert!(report.failed.is_empty(), "不應該有失敗: {:?}", report.failed);
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.skipped.len(), 2);

    for name in ["tone", "beep"] {
        let flac = base.join("flac").join(format!("{name}.flac"));
        assert!(flac.metadata().unwrap().len() > 0, "flac 輸出不應為空");
        assert!(base.join("wav").join(format!("{name}.wav")).exists());
        assert!(!base.join(format!("{name}.wav")).exists());
    }

    println!("✓ ffmpeg 端對端測試通過");
}

#[test]
fn test_missing_ffmpeg_reports_failures() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();
    std::fs::write(base.join("a.mp3"), b"not really audio").unwrap();

    let settings = ConverterSettings {
        ffmpeg_path: base.join("definitely-not-ffmpeg"),
        ..ConverterSettings::default()
    };
    let job = Job::new(base, "mp3", &["ogg", "flac"]).unwrap();
    let transcoder = Arc::new(FfmpegTranscoder::from_settings(&settings));

    let report = AudioConverter::new(job, settings, transcoder, Arc::new(AtomicBool::new(false)))
        .quiet()
        .run()
        .unwrap();

    assert_eq!(report.failed.len(), 2);
    assert_eq!(report.failed_sources(), vec![base.join("a.mp3").as_path()]);
    // 全部任務都結束後仍會搬移原始檔
    assert!(base.join("mp3/a.mp3").exists());
    assert!(!base.join("ogg/a.ogg").exists());
}
