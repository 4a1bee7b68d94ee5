//! Batch command implementation
//!
//! Reads one JSON job per line, renders the jobs in parallel against a
//! shared system and pipeline, and writes one JSON result per line in input
//! order. A bad job produces an error result; the batch carries on.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use quill::{
    standard_pipeline, system_dir, Document, LayoutParams, Pipeline, RenderFlags, RenderRequest,
    Selection, System,
};

use super::output_writer;
use crate::cli::BatchArgs;

/// One line of batch input
#[derive(Debug, Deserialize)]
struct BatchJob {
    /// Echoed back in the result; defaults to the line number
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    rules: Option<Vec<String>>,
    #[serde(default)]
    modes: Option<Vec<String>>,
    #[serde(default)]
    flags: RenderFlags,
    /// Overrides the command-line layout when present
    #[serde(default)]
    layout: Option<LayoutParams>,
}

/// One line of batch output
#[derive(Debug, Serialize)]
struct BatchResult {
    id: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    elapsed_ms: f64,
}

impl BatchResult {
    fn failed(id: String, error: &dyn std::fmt::Display, start: Instant) -> Self {
        Self {
            id,
            status: "error",
            document: None,
            error: Some(error.to_string()),
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let start = Instant::now();

    if args.jobs > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.jobs)
            .build_global()
            .context("Failed to initialize thread pool")?;
    }

    let system = system_dir::load(&args.system)
        .with_context(|| format!("Failed to load system {}", args.system.display()))?;
    let pipeline = standard_pipeline()?;
    let defaults = args.layout.params();

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let lines = reader
        .lines()
        .enumerate()
        .map(|(index, line)| line.map(|line| (index + 1, line)))
        .collect::<io::Result<Vec<_>>>()
        .context("Failed to read jobs")?;

    log::info!("Processing {} lines", lines.len());

    let results: Vec<BatchResult> = lines
        .par_iter()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| process_line(*number, line, &pipeline, &system, &defaults))
        .collect();

    let mut out = output_writer(args.output.as_deref())?;
    for result in &results {
        serde_json::to_writer(&mut out, result).context("Failed to write JSON result")?;
        writeln!(out).context("Failed to write newline")?;
    }
    out.flush().context("Failed to flush output")?;

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    let elapsed = start.elapsed();
    log::info!(
        "Completed {} jobs ({} failed) in {:.2}s",
        results.len(),
        failed,
        elapsed.as_secs_f64()
    );
    if let Some(stats) = pipeline.token_cache_stats() {
        log::debug!(
            "Token cache: {} hits, {} misses ({:.0}% hit rate)",
            stats.hits,
            stats.misses,
            stats.hit_rate * 100.0
        );
    }

    Ok(())
}

fn process_line(
    number: usize,
    line: &str,
    pipeline: &Pipeline,
    system: &System,
    defaults: &LayoutParams,
) -> BatchResult {
    let start = Instant::now();

    let job: BatchJob = match serde_json::from_str(line) {
        Ok(job) => job,
        Err(e) => {
            log::error!("Line {number}: Failed to parse JSON: {e}");
            return BatchResult::failed(number.to_string(), &e, start);
        },
    };
    let id = job.id.unwrap_or_else(|| number.to_string());

    let request = RenderRequest::new(job.text)
        .with_rules(Selection::from(job.rules))
        .with_modes(Selection::from(job.modes))
        .with_flags(job.flags);
    let params = job.layout.unwrap_or(*defaults);

    match pipeline.render(&request, system, &params) {
        Ok(document) => BatchResult {
            id,
            status: "success",
            document: Some(document),
            error: None,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        },
        Err(e) => {
            log::error!("Job {id}: {e}");
            BatchResult::failed(id, &e, start)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill::SystemSource;

    fn fixture() -> (Pipeline, System) {
        let system = System::from_source(
            SystemSource::empty()
                .with_glyph("a", vec![vec![[0.0, 0.0], [1.0, 0.0]]])
                .with_glyph("b", vec![vec![[0.0, 0.0], [0.0, 1.0]]]),
        )
        .unwrap();
        (standard_pipeline().unwrap(), system)
    }

    #[test]
    fn test_job_defaults() {
        let job: BatchJob = serde_json::from_str(r#"{"text": "ab"}"#).unwrap();
        assert_eq!(job.flags, RenderFlags::default());
        assert!(job.rules.is_none());
        assert!(job.layout.is_none());
    }

    #[test]
    fn test_successful_line() {
        let (pipeline, system) = fixture();
        let result = process_line(
            3,
            r#"{"text": "ab ba", "flags": {"show_knots": true}}"#,
            &pipeline,
            &system,
            &LayoutParams::default(),
        );

        assert_eq!(result.id, "3");
        assert_eq!(result.status, "success");
        let document = result.document.unwrap();
        assert_eq!(document.word_count(), 2);
        assert!(document.strokes.iter().all(|s| s.control_points.is_some()));
    }

    #[test]
    fn test_bad_json_line() {
        let (pipeline, system) = fixture();
        let result = process_line(1, "{oops", &pipeline, &system, &LayoutParams::default());
        assert_eq!(result.status, "error");
        assert!(result.document.is_none());
        assert!(result.error.is_some());
    }

    #[test]
    fn test_invalid_layout_is_a_job_error() {
        let (pipeline, system) = fixture();
        let result = process_line(
            1,
            r#"{"id": "neg", "text": "a", "layout": {"word_spacing": -1}}"#,
            &pipeline,
            &system,
            &LayoutParams::default(),
        );
        assert_eq!(result.id, "neg");
        assert_eq!(result.status, "error");
        assert!(result.error.unwrap().contains("spacing"));
    }
}
