//! ffmpeg argument builders for the fixed encoding profile.

use std::path::Path;

/// Seek position of the extracted thumbnail frame.
pub const THUMBNAIL_OFFSET: &str = "00:00:01";

const VIDEO_CODEC: &str = "libvpx-vp9";
const VIDEO_CRF: &str = "30";
const VIDEO_BITRATE: &str = "1M";
const AUDIO_CODEC: &str = "libopus";
const AUDIO_BITRATE: &str = "128k";

/// Turn `720p` into the scale expression `-1:720` (auto width, fixed height).
///
/// Anything that is not a positive integer followed by `p` yields `None`.
pub fn resolution_to_scale(resolution: &str) -> Option<String> {
    let height = resolution.strip_suffix('p')?;
    if height.is_empty() || !height.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match height.parse::<u32>() {
        Ok(h) if h > 0 => Some(format!("-1:{}", h)),
        _ => None,
    }
}

pub fn transcode_args(input: &Path, output: &Path, resolution: Option<&str>) -> Vec<String> {
    let mut args = vec!["-i".to_string(), path_arg(input)];
    if let Some(scale) = resolution.and_then(resolution_to_scale) {
        args.push("-vf".to_string());
        args.push(format!("scale={}", scale));
    }
    args.extend(
        [
            "-c:v",
            VIDEO_CODEC,
            "-crf",
            VIDEO_CRF,
            "-b:v",
            VIDEO_BITRATE,
            "-c:a",
            AUDIO_CODEC,
            "-b:a",
            AUDIO_BITRATE,
            "-y",
        ]
        .map(String::from),
    );
    args.push(path_arg(output));
    args
}

pub fn thumbnail_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        path_arg(input),
        "-ss".to_string(),
        THUMBNAIL_OFFSET.to_string(),
        "-vframes".to_string(),
        "1".to_string(),
        "-y".to_string(),
        path_arg(output),
    ]
}

/// Re-encode an extracted frame into the delivery image format.
pub fn convert_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        path_arg(input),
        "-y".to_string(),
        path_arg(output),
    ]
}

pub fn probe_dimensions_args(input: &Path) -> Vec<String> {
    [
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "stream=width,height",
        "-of",
        "csv=s=x:p=0",
    ]
    .into_iter()
    .map(String::from)
    .chain(std::iter::once(path_arg(input)))
    .collect()
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
