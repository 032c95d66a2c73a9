//! Tag writing through the FFmpeg binary

use crate::{Container, TagError, TagSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug)]
pub(crate) struct FfmpegTagger {
    ffmpeg_path: PathBuf,
}

impl FfmpegTagger {
    pub(crate) fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    /// Rewrite `audio` in place with `tags` and an optional front cover.
    pub(crate) async fn write(
        &self,
        audio: &Path,
        container: Container,
        tags: &TagSet,
        cover: Option<&Path>,
    ) -> Result<(), TagError> {
        info!("Writing {} tags to {}", tags.len(), audio.display());

        // FFmpeg cannot edit in place, so write next to the original and swap
        let dir = match audio.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let staged = tempfile::Builder::new()
            .prefix(".lyrictag-")
            .suffix(&format!(".{}", container.extension()))
            .tempfile_in(dir)?
            .into_temp_path();

        let status = Command::new(&self.ffmpeg_path)
            .args(build_args(audio, &staged, container, tags, cover))
            .status()
            .await?;

        if !status.success() {
            return Err(TagError::FfmpegFailed(status.code()));
        }

        staged.persist(audio).map_err(std::io::Error::from)?;

        debug!("Tags written to: {}", audio.display());
        Ok(())
    }
}

pub(crate) fn build_args(
    input: &Path,
    output: &Path,
    container: Container,
    tags: &TagSet,
    cover: Option<&Path>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    push_all(&mut args, &["-hide_banner", "-loglevel", "error"]);

    args.push("-i".into());
    args.push(input.into());
    if let Some(art) = cover {
        args.push("-i".into());
        args.push(art.into());
    }

    push_all(&mut args, &["-map", "0:a"]);
    if cover.is_some() {
        push_all(
            &mut args,
            &["-map", "1:v", "-c:v", "mjpeg", "-disposition:v", "attached_pic"],
        );
    }

    // Drop whatever tags the file carried before
    push_all(&mut args, &["-map_metadata", "-1"]);

    for (key, value) in tags.iter() {
        args.push("-metadata".into());
        args.push(format!("{}={}", key, value).into());
    }

    if cover.is_some() {
        push_all(
            &mut args,
            &[
                "-metadata:s:v",
                "title=Cover",
                "-metadata:s:v",
                "comment=Cover (front)",
            ],
        );
    }

    push_all(&mut args, &["-c:a", "copy"]);

    if container == Container::Mp3 {
        push_all(&mut args, &["-id3v2_version", "3"]);
    }

    args.push("-y".into());
    args.push(output.into());
    args
}

fn push_all(args: &mut Vec<OsString>, items: &[&str]) {
    args.extend(items.iter().map(OsString::from));
}
