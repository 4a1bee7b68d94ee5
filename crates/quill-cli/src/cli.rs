//! CLI argument definitions using Clap v4

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use quill::{LayoutParams, PageGeometry, RenderFlags, Selection};

/// Quill - render text as shorthand pen strokes
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render text to a JSON stroke document
    #[command(alias = "r")]
    Render(Box<RenderArgs>),

    /// Display a summary of a system folder
    #[command(alias = "i")]
    Info(InfoArgs),

    /// Render JSONL jobs, one result line per job
    Batch(BatchArgs),
}

/// Arguments for the render command
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Input text to render (reads from stdin if omitted)
    pub text: Option<String>,

    /// Read input text from file
    #[arg(short = 'T', long = "text-file", conflicts_with = "text")]
    pub text_file: Option<PathBuf>,

    /// System folder with glyphs.json, modes.json, phrases.json, rules.json
    #[arg(short = 's', long = "system")]
    pub system: PathBuf,

    /// Output file (stdout if not specified)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub layout: LayoutArgs,

    #[command(flatten)]
    pub flags: FlagArgs,
}

/// Which rules and modes are active
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Comma-separated rule names to apply (all rules if omitted)
    #[arg(long, value_delimiter = ',')]
    pub rules: Option<Vec<String>>,

    /// Comma-separated mode names to match (all modes if omitted)
    #[arg(long, value_delimiter = ',')]
    pub modes: Option<Vec<String>>,
}

impl SelectionArgs {
    pub fn rules(&self) -> Selection {
        selection(self.rules.as_deref())
    }

    pub fn modes(&self) -> Selection {
        selection(self.modes.as_deref())
    }
}

/// `--rules ""` selects nothing rather than a rule named ""
fn selection(names: Option<&[String]>) -> Selection {
    match names {
        None => Selection::All,
        Some(names) => Selection::only(names.iter().filter(|n| !n.is_empty()).cloned()),
    }
}

/// Page presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PageSize {
    /// US Letter, 8.5x11in
    Letter,
    /// ISO A4, 8.27x11.69in
    A4,
    /// One unbounded line per paragraph
    None,
}

impl PageSize {
    pub fn geometry(self) -> Option<PageGeometry> {
        match self {
            Self::Letter => Some(PageGeometry::letter()),
            Self::A4 => Some(PageGeometry::a4()),
            Self::None => None,
        }
    }
}

/// Sizing and spacing
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Page size
    #[arg(long, value_enum, default_value = "letter")]
    pub page: PageSize,

    /// Glyph units per document unit
    #[arg(long, default_value = "1.0")]
    pub scale: f64,

    /// Gap between words, in glyph units
    #[arg(long = "word-spacing", default_value = "0.2")]
    pub word_spacing: f64,

    /// Gap between lines, in glyph units
    #[arg(long = "line-spacing", default_value = "0.4")]
    pub line_spacing: f64,

    /// Samples per interpolated stroke
    #[arg(long, default_value = "100")]
    pub samples: usize,
}

impl LayoutArgs {
    pub fn params(&self) -> LayoutParams {
        LayoutParams {
            scale: self.scale,
            word_spacing: self.word_spacing,
            line_spacing: self.line_spacing,
            sample_count: self.samples,
            page: self.page.geometry(),
        }
    }
}

/// Output switches
#[derive(Args, Debug, Clone, Default)]
pub struct FlagArgs {
    /// Include stroke control points
    #[arg(long)]
    pub knots: bool,

    /// Include a guide under every line
    #[arg(long)]
    pub baselines: bool,

    /// Drop single-point dot strokes
    #[arg(long = "no-dots")]
    pub no_dots: bool,

    /// Spell out phrases instead of using phrase glyphs
    #[arg(long = "no-abbreviate")]
    pub no_abbreviate: bool,

    /// Treat newlines as paragraph breaks
    #[arg(long = "hard-breaks")]
    pub hard_breaks: bool,
}

impl FlagArgs {
    pub fn flags(&self) -> RenderFlags {
        RenderFlags {
            show_knots: self.knots,
            show_baselines: self.baselines,
            show_dots: !self.no_dots,
            abbreviate: !self.no_abbreviate,
            hard_breaks: self.hard_breaks,
        }
    }
}

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// System folder to describe
    #[arg(short = 's', long = "system")]
    pub system: PathBuf,

    /// List every rule, mode and phrase by name
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// System folder shared by every job
    #[arg(short = 's', long = "system")]
    pub system: PathBuf,

    /// Input JSONL file (one job per line, stdin if omitted)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output JSONL file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    pub jobs: usize,

    /// Defaults for jobs that leave layout fields out
    #[command(flatten)]
    pub layout: LayoutArgs,
}
