#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use dagology_core::AnalysisConfig;
use output::{CliError, OutputMode};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "dagology: causal-set geometry of directed acyclic graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Analysis config file (default: ./dagology.toml, then the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        OutputMode::resolve(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Generate",
        about = "Sprinkle a synthetic causal set",
        long_about = "Sample points in a causal interval (or draw a random DAG) and write the induced order as a JSON edge list.",
        after_help = "EXAMPLES:\n    # 200 points in a 2D Minkowski interval\n    dagology sprinkle -n 200 --seed 7 -o graph.json\n\n    # 3D de Sitter interval with coordinates\n    dagology sprinkle -n 500 -d 3 --space de-sitter --kt2 0.5 --coords\n\n    # Random DAG with two parents per node\n    dagology sprinkle -n 50 --space random --degree 2"
    )]
    Sprinkle(cmd::sprinkle::SprinkleArgs),

    #[command(
        next_help_heading = "Analyse",
        about = "Estimate the dimension of a DAG",
        long_about = "Myrheim-Meyer (ordering fraction) and midpoint-scaling dimension estimates for a DAG read from a JSON edge list.",
        after_help = "EXAMPLES:\n    # Estimate with 2-chains\n    dagology dimension graph.json\n\n    # Use 3-chains and skip the lookup-table cache\n    dagology dimension graph.json -k 3 --no-cache\n\n    # Pipe from sprinkle\n    dagology sprinkle -n 100 | dagology dimension - --json"
    )]
    Dimension(cmd::dimension::DimensionArgs),

    #[command(
        next_help_heading = "Analyse",
        about = "Embed a DAG in Minkowski space",
        long_about = "Compute spacetime coordinates from longest-path separations with Lorentzian multidimensional scaling.",
        after_help = "EXAMPLES:\n    # 2D embedding\n    dagology embed graph.json\n\n    # 3D embedding with two-link spacelike distances\n    dagology embed graph.json -d 3 --method two-link\n\n    # Landmark MDS with 20 landmarks\n    dagology embed graph.json --landmarks 20 --json"
    )]
    Embed(cmd::embed::EmbedArgs),

    #[command(
        next_help_heading = "Analyse",
        about = "Fit de Sitter parameters to chain counts",
        long_about = "Fit interval height, spatial dimension and curvature to the 1-, 2- and 3-chain counts of a DAG or to counts given directly.",
        after_help = "EXAMPLES:\n    # Fit a graph\n    dagology de-sitter graph.json\n\n    # Fit given counts with an initial guess\n    dagology de-sitter --chains 200 4500 30000 --guess 20 2 0.001"
    )]
    DeSitter(cmd::de_sitter::DeSitterArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DAGOLOGY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "dagology=debug,info"
        } else {
            "dagology=info,warn"
        })
    });

    let format = env::var("DAGOLOGY_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let config = AnalysisConfig::discover(cli.config.as_deref())?;
    debug!(?config, "config loaded");

    match &cli.command {
        Commands::Sprinkle(args) => cmd::sprinkle::run_sprinkle(args),
        Commands::Dimension(args) => cmd::dimension::run_dimension(args, &config, output),
        Commands::Embed(args) => cmd::embed::run_embed(args, &config, output),
        Commands::DeSitter(args) => cmd::de_sitter::run_de_sitter(args, &config, output),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    if let Err(err) = run(&cli, output) {
        CliError::from(&err).report(output)?;
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["dagology", "--json", "dimension", "g.json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn format_flag_after_subcommand() {
        let cli = Cli::parse_from(["dagology", "embed", "g.json", "--format", "json"]);
        assert_eq!(cli.format, Some(OutputMode::Json));
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["dagology", "dimension", "g.json", "--config", "a.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
    }

    #[test]
    fn de_sitter_accepts_chain_triple() {
        let cli = Cli::parse_from([
            "dagology",
            "de-sitter",
            "--chains",
            "200",
            "4500",
            "30000",
            "--guess",
            "20",
            "2",
            "0.001",
        ]);
        let Commands::DeSitter(args) = cli.command else {
            panic!("expected de-sitter");
        };
        assert_eq!(args.chains, Some(vec![200.0, 4500.0, 30000.0]));
        assert_eq!(args.guess, Some(vec![20.0, 2.0, 0.001]));
        assert!(args.input.is_none());
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["dagology", "sprinkle"],
            vec!["dagology", "sprinkle", "--space", "random", "-n", "10"],
            vec!["dagology", "dimension", "g.json", "-k", "3"],
            vec!["dagology", "embed", "-", "--signature", "euclidean"],
            vec!["dagology", "embed", "g.json", "--selection", "first", "--landmarks", "5"],
            vec!["dagology", "de-sitter", "g.json"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?}: {:?}",
                args,
                result.err()
            );
        }
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert!(Cli::try_parse_from(["dagology", "embed", "g.json", "--method", "bogus"]).is_err());
    }
}
