use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub struct FfmpegCommand {
    program: PathBuf,
    source_path: PathBuf,
    destination_path: PathBuf,
    codec_args: Vec<String>,
}

impl FfmpegCommand {
    #[must_use]
    pub fn new(program: &Path, source_path: &Path, destination_path: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
            source_path: source_path.to_path_buf(),
            destination_path: destination_path.to_path_buf(),
            codec_args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_codec_args(mut self, args: &[String]) -> Self {
        self.codec_args = args.to_vec();
        self
    }

    /// 建立 ffmpeg 指令，stdout/stdin 關閉，stderr 保留給錯誤訊息
    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);

        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y", "-i"]);
        cmd.arg(&self.source_path);
        cmd.args(&self.codec_args);
        cmd.arg(&self.destination_path);

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(OsStr::to_string_lossy)
            .map(|s| s.into_owned())
            .collect()
    }

    #[test]
    fn test_build_command_plain() {
        let cmd = FfmpegCommand::new(
            Path::new("ffmpeg"),
            Path::new("/music/a.mp3"),
            Path::new("/music/flac/a.flac"),
        )
        .build_command();

        assert_eq!(cmd.get_program(), "ffmpeg");
        assert_eq!(
            args_of(&cmd),
            vec![
                "-hide_banner",
                "-nostdin",
                "-loglevel",
                "error",
                "-y",
                "-i",
                "/music/a.mp3",
                "/music/flac/a.flac",
            ]
        );
    }

    #[test]
    fn test_build_command_with_codec_args() {
        let codec: Vec<String> = ["-c:a", "libvorbis", "-q:a", "5"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let ffmpeg = FfmpegCommand::new(
            Path::new("/usr/bin/ffmpeg"),
            Path::new("/music/a.mp3"),
            Path::new("/music/ogg/a.ogg"),
        )
        .with_codec_args(&codec);
        let args = args_of(&ffmpeg.build_command());

        let input = args.iter().position(|a| a == "/music/a.mp3").unwrap();
        assert_eq!(&args[input + 1..input + 5], codec.as_slice());
        assert_eq!(args.last().map(String::as_str), Some("/music/ogg/a.ogg"));
    }
}
