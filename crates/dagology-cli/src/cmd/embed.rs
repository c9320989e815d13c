//! `dagology embed`: Lorentzian MDS coordinates for a DAG.

use anyhow::{Context, Result};
use clap::Args;
use dagology_core::AnalysisConfig;
use dagology_core::embed::embed_with_config;
use dagology_core::mds::{LandmarkSelection, Signature};
use dagology_core::separation::SpacelikeMethod;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::cmd::load_dag;
use crate::output::{OutputMode, Report, emit, fmt_f64, heading};

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Edge-list JSON file, or `-` for stdin.
    pub input: PathBuf,

    /// Embedding dimension (overrides config).
    #[arg(short, long)]
    pub dimension: Option<usize>,

    /// Spacelike distance rule: naive or two-link.
    #[arg(long)]
    pub method: Option<SpacelikeMethod>,

    /// Signature: lorentzian or euclidean.
    #[arg(long)]
    pub signature: Option<Signature>,

    /// Use landmark MDS with this many landmarks.
    #[arg(long)]
    pub landmarks: Option<usize>,

    /// Landmark selection: max-min or first.
    #[arg(long)]
    pub selection: Option<LandmarkSelection>,
}

#[derive(Debug, Serialize)]
pub struct EmbedReport {
    pub dimension: usize,
    pub signature: String,
    pub method: String,
    pub coordinates: Vec<Vec<f64>>,
}

/// Apply command-line overrides on top of the loaded config.
fn effective_config(args: &EmbedArgs, config: &AnalysisConfig) -> AnalysisConfig {
    let mut config = config.clone();
    let embedding = &mut config.embedding;
    if let Some(d) = args.dimension {
        embedding.dimension = d;
    }
    if let Some(signature) = args.signature {
        embedding.signature = signature;
    }
    if let Some(k) = args.landmarks {
        embedding.landmarks = true;
        embedding.landmark_count = Some(k);
    }
    if let Some(selection) = args.selection {
        embedding.landmark_selection = selection;
    }
    if let Some(method) = args.method {
        config.separation.method = method;
    }
    config
}

pub fn run_embed(args: &EmbedArgs, config: &AnalysisConfig, output: OutputMode) -> Result<()> {
    let dag = load_dag(&args.input)?;
    let config = effective_config(args, config);
    let coords = embed_with_config(&dag, &config.embedding, &config.separation)
        .context("Embedding failed")?;

    let report = EmbedReport {
        dimension: config.embedding.dimension,
        signature: config.embedding.signature.to_string(),
        method: config.separation.method.to_string(),
        coordinates: coords
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect(),
    };

    emit(output, &report)
}

impl Report for EmbedReport {
    fn write_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for (i, row) in self.coordinates.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(w, "{i}\t{}", cells.join("\t"))?;
        }
        Ok(())
    }

    fn write_pretty(&self, w: &mut dyn Write) -> std::io::Result<()> {
        heading(
            w,
            &format!(
                "{}-dimensional {} embedding ({} separations)",
                self.dimension, self.signature, self.method
            ),
        )?;
        for (i, row) in self.coordinates.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|v| format!("{:>12}", fmt_f64(*v))).collect();
            writeln!(w, "{i:>6} {}", cells.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_config() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: EmbedArgs,
        }
        let w = Wrapper::parse_from([
            "test",
            "graph.json",
            "--dimension",
            "3",
            "--method",
            "two-link",
            "--landmarks",
            "20",
        ]);
        let config = effective_config(&w.args, &AnalysisConfig::default());
        assert_eq!(config.embedding.dimension, 3);
        assert!(config.embedding.landmarks);
        assert_eq!(config.embedding.landmark_count, Some(20));
        assert_eq!(config.separation.method, SpacelikeMethod::TwoLink);
        assert_eq!(config.embedding.signature, Signature::Lorentzian);
    }
}
