//! ParamLab CLI — sweeps, parameter grids and experiment payloads.
//!
//! Commands:
//! - `sweep`: evenly spaced values across one interval
//! - `grid`: the temperature × top_p grid as a table, JSON or CSV
//! - `payload`: validate an experiment and print its payload and dry-run receipt

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use paramlab_core::{sweep, Interval, ParamSet, Preset};
use paramlab_runner::{
    format_values, DryRunSubmitter, ExperimentConfigController, ExperimentDraft, LabConfig,
    Provider, Submitter,
};

/// Upper bound for `sweep --steps`; the values are collected in memory.
const MAX_SWEEP_STEPS: u64 = 1000;

#[derive(Parser)]
#[command(
    name = "paramlab",
    about = "ParamLab CLI — sampling-parameter sweeps for LLM experiments"
)]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print evenly spaced values from MIN to MAX, rounded to two decimals.
    Sweep {
        #[arg(long, allow_negative_numbers = true)]
        min: f64,

        #[arg(long, allow_negative_numbers = true)]
        max: f64,

        /// Number of values, at most 1000. 0 and 1 both yield just MIN.
        #[arg(
            long,
            default_value_t = 3,
            value_parser = clap::value_parser!(u64).range(..=MAX_SWEEP_STEPS)
        )]
        steps: u64,
    },
    /// Print the temperature × top_p parameter grid.
    Grid {
        #[command(flatten)]
        grid: GridArgs,

        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Validate an experiment and print its payload JSON and dry-run receipt.
    Payload {
        #[command(flatten)]
        grid: GridArgs,

        /// Prompt sent with every combination (truncated to 2000 characters).
        #[arg(long)]
        prompt: String,

        /// Experiment title. Defaults to the config value.
        #[arg(long)]
        title: Option<String>,

        /// gemini, openai, groq or mock.
        #[arg(long)]
        provider: Option<Provider>,

        /// Model name. Defaults to the provider's default model.
        #[arg(long)]
        model: Option<String>,
    },
}

/// Grid options shared by `grid` and `payload`. Later flags win:
/// config file, then preset, then explicit intervals.
#[derive(Args)]
struct GridArgs {
    /// Path to a TOML lab config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// creative, balanced or precise.
    #[arg(long)]
    preset: Option<Preset>,

    /// Temperature interval as LO:HI, within 0..2.
    #[arg(long, value_parser = parse_interval)]
    temperature: Option<Interval>,

    /// Top-p interval as LO:HI, within 0..1.
    #[arg(long, value_parser = parse_interval)]
    top_p: Option<Interval>,

    /// Values per interval, 1 to 5.
    #[arg(long)]
    steps: Option<usize>,

    #[arg(long)]
    max_tokens: Option<u32>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Sweep { min, max, steps } => {
            if !min.is_finite() || !max.is_finite() {
                bail!("--min and --max must be finite numbers");
            }
            writeln!(out, "{}", format_values(&sweep(min, max, steps as usize)))?;
        }
        Commands::Grid { grid, format } => {
            let (ctl, _) = build_controller(&grid)?;
            write_grid(&mut out, &ctl.materialize(), format)?;
        }
        Commands::Payload {
            grid,
            prompt,
            title,
            provider,
            model,
        } => {
            let (ctl, cfg) = build_controller(&grid)?;
            let mut draft = ExperimentDraft {
                title: cfg.experiment.title.clone(),
                prompt,
                provider: cfg.experiment.provider,
                model: cfg.experiment.model.clone(),
            };
            if let Some(p) = provider {
                draft.set_provider(p);
            }
            if let Some(t) = title {
                draft.title = t;
            }
            if model.is_some() {
                draft.model = model;
            }

            let payload = ctl.build_payload(&draft)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
            let receipt = DryRunSubmitter.submit(&payload)?;
            eprintln!(
                "dry run: experiment_id={} num_responses={}",
                receipt.experiment_id, receipt.num_responses
            );
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "paramlab={level},paramlab_runner={level},paramlab_core={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// `LO:HI` (or `LO,HI`) in either order.
fn parse_interval(s: &str) -> Result<Interval, String> {
    let (a, b) = s
        .split_once(':')
        .or_else(|| s.split_once(','))
        .ok_or_else(|| format!("expected LO:HI, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .ok_or_else(|| format!("'{}' is not a finite number", v.trim()))
    };
    Ok(Interval::new(parse(a)?, parse(b)?))
}

fn build_controller(args: &GridArgs) -> Result<(ExperimentConfigController, LabConfig)> {
    let cfg = match &args.config {
        Some(path) => LabConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LabConfig::default(),
    };

    let mut ctl = ExperimentConfigController::from_config(&cfg);
    if let Some(preset) = args.preset {
        ctl.apply_preset(preset);
    }
    if let Some(iv) = args.temperature {
        ctl.set_temperature_interval(iv);
    }
    if let Some(iv) = args.top_p {
        ctl.set_top_p_interval(iv);
    }
    if let Some(steps) = args.steps {
        let kept = ctl.set_steps(steps);
        if kept != steps {
            eprintln!("note: --steps {steps} is out of range, using {kept}");
        }
    }
    if let Some(mt) = args.max_tokens {
        ctl.set_max_tokens(mt);
    }
    tracing::debug!(
        temperature = %ctl.temperature(),
        top_p = %ctl.top_p(),
        steps = ctl.steps(),
        max_tokens = ctl.max_tokens(),
        "grid configured"
    );
    Ok((ctl, cfg))
}

fn write_grid(out: &mut impl Write, sets: &[ParamSet], format: Format) -> Result<()> {
    match format {
        Format::Table => {
            writeln!(
                out,
                "{:>3}  {:>11}  {:>5}  {:>10}",
                "#", "temperature", "top_p", "max_tokens"
            )?;
            for (i, s) in sets.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}  {:>11.2}  {:>5.2}  {:>10}",
                    i + 1,
                    s.temperature,
                    s.top_p,
                    s.max_tokens
                )?;
            }
            writeln!(out, "{} combinations", sets.len())?;
        }
        Format::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(sets)?)?;
        }
        Format::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            for s in sets {
                wtr.serialize(s)?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_args(argv: &[&str]) -> GridArgs {
        let mut full = vec!["paramlab", "grid"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Grid { grid, .. } => grid,
            _ => unreachable!(),
        }
    }

    #[test]
    fn parses_intervals() {
        assert_eq!(parse_interval("0.2:0.9").unwrap(), Interval::new(0.2, 0.9));
        assert_eq!(parse_interval("1.5, 0.5").unwrap(), Interval::new(0.5, 1.5));
        assert!(parse_interval("0.5").is_err());
        assert!(parse_interval("a:1").is_err());
        assert!(parse_interval("NaN:1").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let args = grid_args(&["--preset", "precise", "--top-p", "0.5:0.6", "--steps", "2"]);
        let (ctl, _) = build_controller(&args).unwrap();
        assert_eq!(ctl.temperature(), Interval::new(0.1, 0.7));
        assert_eq!(ctl.top_p(), Interval::new(0.5, 0.6));
        assert_eq!(ctl.combination_count(), 4);
    }

    #[test]
    fn steps_flag_is_clamped() {
        let (ctl, _) = build_controller(&grid_args(&["--steps", "8"])).unwrap();
        assert_eq!(ctl.steps(), 5);
    }

    #[test]
    fn config_file_seeds_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab.toml");
        std::fs::write(&path, "[sweep]\nsteps = 1\nmax_tokens = 64\n").unwrap();
        let args = grid_args(&["--config", path.to_str().unwrap()]);
        let (ctl, _) = build_controller(&args).unwrap();
        let sets = ctl.materialize();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].max_tokens, 64);
    }

    #[test]
    fn missing_config_is_an_error() {
        let args = grid_args(&["--config", "/nonexistent/lab.toml"]);
        assert!(build_controller(&args).is_err());
    }

    #[test]
    fn unknown_preset_is_rejected_by_clap() {
        assert!(Cli::try_parse_from(["paramlab", "grid", "--preset", "wild"]).is_err());
    }

    #[test]
    fn table_lists_every_combination() {
        let sets = paramlab_core::build_param_sets(
            Interval::new(0.0, 1.0),
            Interval::new(0.5, 1.0),
            2,
        );
        let mut buf = Vec::new();
        write_grid(&mut buf, &sets, Format::Table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("4 combinations"));
        assert!(text.lines().nth(1).unwrap().contains("0.00"));
    }

    #[test]
    fn csv_has_header_and_rows() {
        let sets = paramlab_core::build_param_sets(
            Interval::new(0.2, 0.2),
            Interval::new(0.9, 0.9),
            1,
        );
        let mut buf = Vec::new();
        write_grid(&mut buf, &sets, Format::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "temperature,top_p,max_tokens\n0.2,0.9,256\n");
    }

    #[test]
    fn sweep_steps_are_bounded() {
        let parsed = Cli::try_parse_from(["paramlab", "sweep", "--min", "0", "--max", "1"]);
        match parsed.unwrap().command {
            Commands::Sweep { steps, .. } => assert_eq!(steps, 3),
            _ => panic!("expected sweep command"),
        }

        let at_limit = ["paramlab", "sweep", "--min", "0", "--max", "1", "--steps", "1000"];
        assert!(Cli::try_parse_from(at_limit).is_ok());

        for huge in ["1001", "18446744073709551615", "99999999999999999999"] {
            let argv = ["paramlab", "sweep", "--min", "0", "--max", "1", "--steps", huge];
            assert!(Cli::try_parse_from(argv).is_err(), "--steps {huge} accepted");
        }
    }

    #[test]
    fn payload_command_parses_provider() {
        let cli = Cli::try_parse_from([
            "paramlab", "payload", "--prompt", "hi", "--provider", "groq", "--steps", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Payload { provider, grid, .. } => {
                assert_eq!(provider, Some(Provider::Groq));
                assert_eq!(grid.steps, Some(2));
            }
            _ => panic!("expected payload command"),
        }
    }
}
