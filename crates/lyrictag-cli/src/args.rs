use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lyrictag")]
#[command(author, version, about = "Synchronized lyrics conversion and audio tagging")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the lyrics format and print plain and line-timed forms
    Split {
        /// Lyrics file, or `-` for stdin
        input: PathBuf,

        /// Write the plain form here instead of printing it
        #[arg(long)]
        plain_out: Option<PathBuf>,

        /// Write the normalized line-timed form here instead of printing it
        #[arg(long)]
        lrc_out: Option<PathBuf>,
    },

    /// List the timed entries of line-timed lyrics
    Entries {
        /// Lyrics file, or `-` for stdin
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert line-timed lyrics to a SubRip (.srt) file
    Srt {
        /// Lyrics file, or `-` for stdin
        input: PathBuf,

        /// Output file (prints to stdout if not set)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write metadata and lyrics tags into a FLAC or MP3 file
    Tag {
        /// Audio file to tag in place
        audio: PathBuf,

        #[command(flatten)]
        options: TagOptions,
    },

    /// Convert a directory or list of lyrics files to SubRip
    Batch {
        /// Directory of .lrc/.txt files, or a file listing paths (one per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum files converted at once
        #[arg(short, long)]
        parallel: Option<usize>,

        /// Output directory (next to each input if not set)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Estimate the download size of a track
    Estimate {
        /// Track duration in seconds
        #[arg(short, long)]
        duration: u64,

        /// Stream quality
        #[arg(short, long, value_enum, default_value = "flac")]
        quality: QualityArg,
    },

    /// Summarize stream availability results saved as JSON
    QualityReport {
        /// JSON object keyed by quality (flac, high, mid)
        input: PathBuf,

        /// Track the results belong to
        #[arg(long, default_value = "0")]
        track_id: u64,
    },

    /// Check external dependencies
    Doctor,

    /// Show configuration
    Config,
}

#[derive(clap::Args, Clone)]
pub struct TagOptions {
    /// Raw lyrics file (plain or line-timed)
    #[arg(short, long)]
    pub lyrics: Option<PathBuf>,

    /// Track metadata as JSON; the flags below override it
    #[arg(short, long)]
    pub metadata: Option<PathBuf>,

    /// Track title
    #[arg(long)]
    pub title: Option<String>,

    /// Artist (repeat for several, the first one is used)
    #[arg(long = "artist")]
    pub artists: Vec<String>,

    /// Album title
    #[arg(long)]
    pub album: Option<String>,

    /// Track number
    #[arg(long)]
    pub position: Option<u32>,

    /// Genre (repeat for several, the first one is used)
    #[arg(long = "genre")]
    pub genres: Vec<String>,

    /// Credits (FLAC album artist)
    #[arg(long)]
    pub credits: Option<String>,

    /// Front cover image
    #[arg(long)]
    pub cover: Option<PathBuf>,

    /// Also write a .srt file next to the audio
    #[arg(long)]
    pub srt: bool,

    /// Embed plain lyrics even when line-timed lyrics are available
    #[arg(long)]
    pub plain: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualityArg {
    /// FLAC - Lossless
    Flac,
    /// MP3 320 kbps
    High,
    /// MP3 128 kbps
    Mid,
}
