//! Output layer shared by every subcommand.
//!
//! Commands build a serializable report and hand it to [`emit`], which picks
//! JSON, tab-separated text or the labelled human layout. The mode comes from
//! `--format` (or the hidden `--json`), then `DAGOLOGY_FORMAT`, then whether
//! stdout is a terminal.

use clap::ValueEnum;
use dagology_core::DagologyError;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

const KEY_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Labelled sections for humans.
    Pretty,
    /// Tab-separated rows for pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Resolve from flags, `DAGOLOGY_FORMAT` and the terminal.
    pub fn resolve(format: Option<Self>, json: bool) -> Self {
        let env = std::env::var("DAGOLOGY_FORMAT").ok();
        Self::resolve_with(format, json, env.as_deref(), io::stdout().is_terminal())
    }

    fn resolve_with(format: Option<Self>, json: bool, env: Option<&str>, tty: bool) -> Self {
        format
            .or(json.then_some(Self::Json))
            .or_else(|| env.and_then(|v| Self::from_str(v, true).ok()))
            .unwrap_or(if tty { Self::Pretty } else { Self::Text })
    }
}

/// A command result that knows its non-JSON layouts.
pub trait Report: Serialize {
    /// One tab-separated record per line, no headers.
    fn write_text(&self, w: &mut dyn Write) -> io::Result<()>;

    fn write_pretty(&self, w: &mut dyn Write) -> io::Result<()>;
}

/// Write `report` to stdout in `mode`.
pub fn emit(mode: OutputMode, report: &impl Report) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, report)?;
            writeln!(out)?;
        }
        OutputMode::Text => report.write_text(&mut out)?,
        OutputMode::Pretty => report.write_pretty(&mut out)?,
    }
    out.flush()?;
    Ok(())
}

/// Title underlined to its own width.
pub fn heading(w: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(w, "{title}\n{}", "=".repeat(title.chars().count()))
}

pub fn field(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "  {key:<KEY_WIDTH$} {}", value.as_ref())
}

/// Four significant decimals, switching to scientific outside `[1e-3, 1e6)`.
pub fn fmt_f64(value: f64) -> String {
    if value == 0.0 || (1e-3..1e6).contains(&value.abs()) {
        format!("{value:.4}")
    } else {
        format!("{value:.4e}")
    }
}

/// Failure as shown to the user: the full context chain plus the
/// library's error code and hint when one is underneath.
#[derive(Debug, Serialize)]
pub struct CliError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl From<&anyhow::Error> for CliError {
    fn from(err: &anyhow::Error) -> Self {
        let inner = err.downcast_ref::<DagologyError>();
        Self {
            code: inner.map(|e| e.code().code()),
            message: format!("{err:#}"),
            hint: inner.and_then(DagologyError::hint),
        }
    }
}

impl CliError {
    /// Write to stderr; JSON mode wraps the error in `{"error": ...}`.
    pub fn report(&self, mode: OutputMode) -> io::Result<()> {
        let mut out = io::stderr().lock();
        if mode.is_json() {
            let wrapped = serde_json::json!({ "error": self });
            serde_json::to_writer_pretty(&mut out, &wrapped)?;
            return writeln!(out);
        }
        match self.code {
            Some(code) => writeln!(out, "error[{code}]: {}", self.message)?,
            None => writeln!(out, "error: {}", self.message)?,
        }
        if let Some(hint) = self.hint {
            writeln!(out, "  hint: {hint}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_env_and_tty() {
        assert_eq!(
            OutputMode::resolve_with(Some(OutputMode::Text), true, Some("json"), true),
            OutputMode::Text
        );
        assert_eq!(
            OutputMode::resolve_with(None, true, Some("pretty"), true),
            OutputMode::Json
        );
    }

    #[test]
    fn env_beats_tty_default() {
        assert_eq!(
            OutputMode::resolve_with(None, false, Some("JSON"), true),
            OutputMode::Json
        );
        assert_eq!(
            OutputMode::resolve_with(None, false, Some("bogus"), false),
            OutputMode::Text
        );
        assert_eq!(OutputMode::resolve_with(None, false, None, true), OutputMode::Pretty);
    }

    #[test]
    fn wrapped_core_errors_keep_code_and_context() {
        let err = anyhow::Error::new(DagologyError::SelfLoop(3)).context("reading graph.json");
        let cli = CliError::from(&err);
        assert!(cli.message.starts_with("reading graph.json"));
        assert_eq!(cli.code, Some("E2002"));
        assert!(cli.hint.is_some());

        let plain = CliError::from(&anyhow::anyhow!("boom"));
        assert_eq!(plain.code, None);
        assert_eq!(plain.message, "boom");
    }

    #[test]
    fn heading_underline_matches_title() {
        let mut buf = Vec::new();
        heading(&mut buf, "de Sitter fit").expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "de Sitter fit\n=============\n");
    }

    #[test]
    fn float_formatting() {
        assert_eq!(fmt_f64(2.0), "2.0000");
        assert_eq!(fmt_f64(0.0), "0.0000");
        assert_eq!(fmt_f64(0.000_25), "2.5000e-4");
    }
}
