use anyhow::{Context, Result};
use clap::Parser;
use hotelstat::cli::{Cli, Command, OutputFormat};
use hotelstat::config::AnalysisConfig;
use hotelstat::dataset::Dataset;
use hotelstat::engine::{self, Estimate, Undefined};
use hotelstat::profile::profile;
use hotelstat::report::{render, CiReport, ImportanceReport, ProfileReport, Report};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_file(path),
        None => AnalysisConfig::default_hotel_bookings(),
    }
}

fn load_dataset(path: &Path, config: &AnalysisConfig) -> Result<Dataset> {
    let ds = Dataset::from_csv_path(path, &config.schema)
        .with_context(|| format!("Failed to load dataset: {}", path.display()))?;
    tracing::info!(
        "Loaded {} rows x {} columns from {}",
        ds.n_rows(),
        ds.n_columns(),
        path.display()
    );
    Ok(ds)
}

fn print<R: Report>(report: &R, format: OutputFormat) -> Result<()> {
    let output = render(report, format)?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let format = cli.format;

    match cli.command {
        Command::Associate { data, var1, var2 } => {
            let ds = load_dataset(&data, &config)?;
            print(&engine::association_test(&ds, &var1, &var2)?, format)
        }
        Command::Compare {
            data,
            value,
            group,
            first,
            second,
        } => {
            let ds = load_dataset(&data, &config)?;
            let result =
                engine::compare_groups(&ds, &value, &group, &first, &second, &config.engine)?;
            print(&result, format)
        }
        Command::Anova { data, value, group } => {
            let ds = load_dataset(&data, &config)?;
            print(&engine::anova(&ds, &value, &group)?, format)
        }
        Command::Metrics {
            data,
            by,
            outcome,
            confidence,
        } => {
            let ds = load_dataset(&data, &config)?;
            let outcome = outcome.unwrap_or_else(|| config.roles.outcome.clone());
            let group_vars: Vec<&str> = by.iter().map(String::as_str).collect();
            let result = engine::cancellation_metrics(
                &ds,
                &outcome,
                &group_vars,
                confidence.unwrap_or(config.engine.confidence_level),
            )?;
            print(&result, format)
        }
        Command::Importance {
            data,
            target,
            features,
        } => {
            let ds = load_dataset(&data, &config)?;
            let target = target.unwrap_or_else(|| config.importance.target.clone());
            let features = if features.is_empty() {
                config.importance.features.clone()
            } else {
                features
            };
            if features.is_empty() {
                anyhow::bail!(
                    "No features to rank: pass --features or list them under [importance] in the config"
                );
            }
            let names: Vec<&str> = features.iter().map(String::as_str).collect();
            let ranked = engine::feature_importance(&ds, &target, &names)?;
            print(
                &ImportanceReport {
                    target,
                    features: ranked,
                },
                format,
            )
        }
        Command::Summary { data } => {
            let ds = load_dataset(&data, &config)?;
            print(&engine::business_metrics(&ds, &config.roles)?, format)
        }
        Command::Profile { data } => {
            let ds = load_dataset(&data, &config)?;
            let report = ProfileReport {
                n_rows: ds.n_rows(),
                columns: profile(&ds)?,
            };
            print(&report, format)
        }
        Command::Ci {
            successes,
            total,
            confidence,
        } => {
            let interval = engine::proportion_ci(successes, total, confidence)?;
            let report = CiReport {
                successes,
                total,
                confidence,
                proportion: Estimate::ratio(
                    successes as f64,
                    total as f64,
                    Undefined::NoObservations,
                ),
                interval,
            };
            print(&report, format)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    run(cli)
}
