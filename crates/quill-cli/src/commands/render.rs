//! Render command implementation
//!
//! Loads a system folder, renders one text and writes the document as JSON.

use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result};

use quill::{export::JsonExporter, standard_pipeline, system_dir, traits::Exporter, RenderRequest};

use super::output_writer;
use crate::cli::RenderArgs;

pub fn run(args: &RenderArgs) -> Result<()> {
    let text = read_text(args)?;
    let system = system_dir::load(&args.system)
        .with_context(|| format!("Failed to load system {}", args.system.display()))?;

    let request = RenderRequest::new(text)
        .with_rules(args.selection.rules())
        .with_modes(args.selection.modes())
        .with_flags(args.flags.flags());

    let document = standard_pipeline()?.render(&request, &system, &args.layout.params())?;
    log::info!(
        "Rendered {} words on {} lines across {} pages",
        document.word_count(),
        document.lines.len(),
        document.pages
    );
    for warning in system.warnings().iter().chain(&document.warnings) {
        log::debug!("warning: {warning}");
    }

    let exporter = if args.pretty {
        JsonExporter::with_pretty_print()
    } else {
        JsonExporter::new()
    };
    let bytes = exporter.export(&document)?;

    let mut out = output_writer(args.output.as_deref())?;
    out.write_all(&bytes).context("Failed to write document")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn read_text(args: &RenderArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.text_file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    Ok(text)
}
