//! Info command implementation
//!
//! Summarises a system folder: dictionary sizes and the entries that were
//! skipped while loading it.

use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use quill::{system_dir, System, Warning};

use crate::cli::InfoArgs;

#[derive(Debug, Serialize)]
struct SystemSummary {
    glyphs: usize,
    modes: usize,
    phrases: usize,
    rules: usize,
    invalid_rules: Vec<String>,
    invalid_modes: Vec<String>,
    missing_dictionaries: Vec<String>,
    tie_breaks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    names: Option<Names>,
}

#[derive(Debug, Serialize)]
struct Names {
    rules: Vec<String>,
    modes: Vec<String>,
    phrases: Vec<String>,
}

impl SystemSummary {
    fn new(system: &System, list: bool) -> Self {
        let mut invalid_rules = Vec::new();
        let mut invalid_modes = Vec::new();
        let mut missing_dictionaries = Vec::new();
        for warning in system.warnings() {
            match warning {
                Warning::InvalidRule { name, .. } => invalid_rules.push(name.clone()),
                Warning::InvalidMode { name, .. } => invalid_modes.push(name.clone()),
                Warning::MissingDictionary { dictionary } => {
                    missing_dictionaries.push(dictionary.clone())
                },
                _ => {},
            }
        }

        let names = list.then(|| Names {
            rules: system.rules().iter().map(|r| r.name.clone()).collect(),
            modes: system.modes().iter().map(|m| m.name.clone()).collect(),
            phrases: system.phrases().iter().map(|p| p.key.clone()).collect(),
        });

        Self {
            glyphs: system.glyphs().len(),
            modes: system.modes().len(),
            phrases: system.phrases().len(),
            rules: system.rules().len(),
            invalid_rules,
            invalid_modes,
            missing_dictionaries,
            tie_breaks: system.options().tie_breaks.len(),
            names,
        }
    }

    fn print(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Quill v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out)?;
        writeln!(out, "Glyphs:  {}", self.glyphs)?;
        writeln!(out, "Modes:   {}", self.modes)?;
        writeln!(out, "Phrases: {}", self.phrases)?;
        writeln!(out, "Rules:   {}", self.rules)?;
        if self.tie_breaks > 0 {
            writeln!(out, "Extra tie-breaks: {}", self.tie_breaks)?;
        }

        for (label, names) in [
            ("Invalid rules", &self.invalid_rules),
            ("Invalid modes", &self.invalid_modes),
            ("Missing dictionaries", &self.missing_dictionaries),
        ] {
            if !names.is_empty() {
                writeln!(out, "{label}: {}", names.join(", "))?;
            }
        }

        if let Some(names) = &self.names {
            for (label, list) in [
                ("rules", &names.rules),
                ("modes", &names.modes),
                ("phrases", &names.phrases),
            ] {
                writeln!(out)?;
                writeln!(out, "{}:", label)?;
                for name in list {
                    writeln!(out, "  {name}")?;
                }
            }
        }
        Ok(())
    }
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let system = system_dir::load(&args.system)
        .with_context(|| format!("Failed to load system {}", args.system.display()))?;
    let summary = SystemSummary::new(&system, args.list);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &summary).context("Failed to write summary")?;
        writeln!(out)?;
    } else {
        summary.print(&mut out)?;
    }
    Ok(())
}
