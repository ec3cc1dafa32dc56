//! Metrics export and snapshot persistence.
//!
//! All formats render the same [`MetricsSnapshot`]; no format keeps state of
//! its own. JSON doubles as the persisted snapshot format.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use super::MetricsSnapshot;
use crate::MetricsError;

/// Directory metrics files land in unless a path is given.
pub const DEFAULT_METRICS_DIR: &str = "saved/validation";

/// Output format for [`MetricsSnapshot::export`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    /// Structured snapshot (also the persistence format).
    #[strum(to_string = "json", serialize = "structured")]
    Json,
    /// Flat table: one row per counter, error message, or timing.
    #[strum(to_string = "csv", serialize = "tabular")]
    Csv,
    /// Human-readable page.
    #[strum(to_string = "html", serialize = "human", serialize = "human-readable")]
    Html,
}

impl ExportFormat {
    /// Parses a format name, accepting `json`/`structured`, `csv`/`tabular`,
    /// and `html`/`human-readable`.
    pub fn from_name(name: &str) -> Result<Self, MetricsError> {
        name.parse()
            .map_err(|_| MetricsError::UnsupportedFormat(name.to_string()))
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }

    /// `saved/validation/metrics.<ext>`
    pub fn default_path(&self) -> PathBuf {
        Path::new(DEFAULT_METRICS_DIR).join(format!("metrics.{}", self.extension()))
    }
}

impl MetricsSnapshot {
    /// Renders this snapshot in `format`.
    pub fn render(&self, format: ExportFormat) -> Result<String, MetricsError> {
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ExportFormat::Csv => self.render_csv(),
            ExportFormat::Html => Ok(self.render_html()),
        }
    }

    /// Writes this snapshot to `path` in `format`.
    ///
    /// The file is written to a sibling temp file and renamed into place, so
    /// readers never see a partial export.
    pub fn export(&self, format: ExportFormat, path: &Path) -> Result<(), MetricsError> {
        let rendered = self.render(format)?;
        write_atomic(path, rendered.as_bytes())?;
        info!(
            target: "validation::metrics",
            format = %format,
            path = %path.display(),
            "Exported validation metrics"
        );
        Ok(())
    }

    /// Persists this snapshot as JSON.
    pub fn save(&self, path: &Path) -> Result<(), MetricsError> {
        self.export(ExportFormat::Json, path)
    }

    /// Loads a snapshot previously written by [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self, MetricsError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn render_csv(&self) -> Result<String, MetricsError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["section", "key", "count", "total_nanos", "average_nanos"])?;

        let counters = [
            ("total_validations", self.total_validations),
            ("passed_validations", self.passed_validations),
            ("failed_validations", self.failed_validations),
        ];
        for (key, value) in counters {
            writer.write_record(["summary", key, value.to_string().as_str(), "", ""])?;
        }
        for (message, count) in self.top_errors(usize::MAX) {
            writer.write_record(["error", message, count.to_string().as_str(), "", ""])?;
        }
        for (section, rows) in [
            ("rule", self.slowest_rules(usize::MAX)),
            ("system", self.slowest_systems(usize::MAX)),
        ] {
            for (name, stat) in rows {
                writer.write_record([
                    section,
                    name,
                    stat.count.to_string().as_str(),
                    stat.total_nanos.to_string().as_str(),
                    stat.average().as_nanos().to_string().as_str(),
                ])?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| MetricsError::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| MetricsError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    fn render_html(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "<!DOCTYPE html>");
        let _ = writeln!(out, "<html><head><meta charset=\"utf-8\">");
        let _ = writeln!(out, "<title>Validation Metrics</title></head><body>");
        let _ = writeln!(out, "<h1>Validation Metrics</h1>");
        let _ = writeln!(
            out,
            "<p>Recorded at {}</p>",
            escape_html(&self.recorded_at.to_rfc3339())
        );
        let _ = writeln!(out, "<table>");
        let _ = writeln!(out, "<tr><th>Total</th><td>{}</td></tr>", self.total_validations);
        let _ = writeln!(out, "<tr><th>Passed</th><td>{}</td></tr>", self.passed_validations);
        let _ = writeln!(out, "<tr><th>Failed</th><td>{}</td></tr>", self.failed_validations);
        let _ = writeln!(out, "<tr><th>Pass rate</th><td>{:.1}%</td></tr>", self.pass_rate());
        let _ = writeln!(out, "</table>");

        let _ = writeln!(out, "<h2>Errors</h2>");
        let _ = writeln!(out, "<table><tr><th>Message</th><th>Count</th></tr>");
        for (message, count) in self.top_errors(usize::MAX) {
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{count}</td></tr>",
                escape_html(message)
            );
        }
        let _ = writeln!(out, "</table>");

        for (title, rows) in [
            ("Rule timings", self.slowest_rules(usize::MAX)),
            ("System timings", self.slowest_systems(usize::MAX)),
        ] {
            let _ = writeln!(out, "<h2>{title}</h2>");
            let _ = writeln!(
                out,
                "<table><tr><th>Name</th><th>Average (us)</th><th>Total (us)</th><th>Count</th></tr>"
            );
            for (name, stat) in rows {
                let _ = writeln!(
                    out,
                    "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{}</td></tr>",
                    escape_html(name),
                    stat.average().as_secs_f64() * 1_000_000.0,
                    stat.total().as_secs_f64() * 1_000_000.0,
                    stat.count
                );
            }
            let _ = writeln!(out, "</table>");
        }
        let _ = writeln!(out, "</body></html>");
        out
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let written = fs::write(&temp_path, bytes).and_then(|()| fs::rename(&temp_path, path));
    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}
