//! `dagology dimension`: Myrheim–Meyer and midpoint-scaling estimates.

use anyhow::{Context, Result};
use clap::Args;
use dagology_core::AnalysisConfig;
use dagology_core::cache::LookupCache;
use dagology_core::dimension::{midpoint_scaling_dimension, myrheim_meyer_dimension};
use dagology_core::order::{count_chains, ordering_fraction};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::cmd::load_dag;
use crate::output::{OutputMode, Report, emit, field, fmt_f64, heading};

#[derive(Args, Debug)]
pub struct DimensionArgs {
    /// Edge-list JSON file, or `-` for stdin.
    pub input: PathBuf,

    /// Chain length for Myrheim–Meyer (overrides config).
    #[arg(short = 'k', long)]
    pub chain_length: Option<usize>,

    /// Skip the on-disk lookup-table cache.
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Debug, Serialize)]
pub struct DimensionReport {
    pub nodes: usize,
    pub edges: usize,
    pub chain_length: usize,
    pub chains: u128,
    pub ordering_fraction: f64,
    pub myrheim_meyer: f64,
    pub midpoint_scaling: f64,
}

pub fn run_dimension(
    args: &DimensionArgs,
    config: &AnalysisConfig,
    output: OutputMode,
) -> Result<()> {
    let dag = load_dag(&args.input)?;
    let relation = dag.to_order();
    let k = args.chain_length.unwrap_or(config.myrheim_meyer.chain_length);

    let mut cache = if args.no_cache {
        None
    } else {
        config.cache.file_cache()
    };
    let myrheim_meyer = myrheim_meyer_dimension(
        &relation,
        k,
        cache.as_mut().map(|c| c as &mut dyn LookupCache),
    )
    .context("Myrheim-Meyer estimate failed")?;

    let chains = count_chains(&relation, k)?;
    let report = DimensionReport {
        nodes: dag.node_count(),
        edges: dag.edge_count(),
        chain_length: k,
        chains,
        ordering_fraction: ordering_fraction(chains as f64, dag.node_count(), k),
        myrheim_meyer,
        midpoint_scaling: midpoint_scaling_dimension(&dag),
    };

    emit(output, &report)
}

impl Report for DimensionReport {
    fn write_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            self.nodes, self.edges, self.chain_length, self.myrheim_meyer, self.midpoint_scaling
        )
    }

    fn write_pretty(&self, w: &mut dyn Write) -> std::io::Result<()> {
        heading(w, "Dimension estimates")?;
        field(w, "nodes", self.nodes.to_string())?;
        field(w, "edges", self.edges.to_string())?;
        field(w, &format!("{}-chains", self.chain_length), self.chains.to_string())?;
        field(w, "ordering frac", fmt_f64(self.ordering_fraction))?;
        field(w, "myrheim-meyer", fmt_f64(self.myrheim_meyer))?;
        field(w, "midpoint", fmt_f64(self.midpoint_scaling))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_report_lists_estimates() {
        let report = DimensionReport {
            nodes: 11,
            edges: 10,
            chain_length: 2,
            chains: 55,
            ordering_fraction: 55.0 / 121.0,
            myrheim_meyer: 1.16,
            midpoint_scaling: 1.0,
        };
        let mut buf = Vec::new();
        report.write_pretty(&mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("2-chains"));
        assert!(text.contains("1.1600"));
    }
}
