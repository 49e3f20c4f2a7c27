//! deploy-profiles CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use deploy_profiles::config::{ConfigResolver, ProcessEnv};
use deploy_profiles::{DeployConfig, DeploymentProfile, Error};

#[derive(Debug, Parser)]
#[command(name = "deploy-profiles", version, about = "Resolve and validate deployment targets")]
struct Cli {
    /// TOML file with target definitions (built-in targets if omitted)
    #[arg(long, env = "DEPLOY_TARGETS_FILE")]
    targets: Option<PathBuf>,

    /// Override the compiler version
    #[arg(long)]
    compiler: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve every target and report missing variables
    Check,
    /// List resolved targets
    List,
    /// Show one resolved target
    Show { target: String },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "configuration resolution failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let mut builder = ConfigResolver::builder().with_env(ProcessEnv::snapshot());
    if let Some(path) = cli.targets {
        builder = builder.with_targets_file(path);
    }
    if let Some(version) = cli.compiler {
        builder = builder.with_compiler_version(version);
    }
    let resolver = builder.build()?;

    if matches!(cli.command, Command::Check) {
        for key in resolver.missing_keys() {
            eprintln!("missing: {key}");
        }
    }

    let config = DeployConfig::resolve(&resolver)?;

    match cli.command {
        Command::Check => {
            println!(
                "ok: {} targets, compiler {}",
                config.profiles().len(),
                config.compiler()
            );
        }
        Command::List => {
            for profile in config.profiles().values() {
                println!(
                    "{:<12} {:<40} network {}",
                    profile.name(),
                    profile.endpoint().to_string(),
                    profile.network_id()
                );
            }
        }
        Command::Show { target } => {
            print_profile(config.profile(&target)?);
            println!("{:<14}{}", "compiler:", config.compiler());
        }
    }

    Ok(())
}

fn print_profile(profile: &DeploymentProfile) {
    let optional = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    let credential = profile
        .credential()
        .map_or_else(|| "-".to_string(), ToString::to_string);

    println!("{:<14}{}", "name:", profile.name());
    println!("{:<14}{}", "endpoint:", profile.endpoint());
    println!("{:<14}{}", "credential:", credential);
    println!("{:<14}{}", "network id:", profile.network_id());
    println!("{:<14}{}", "gas limit:", optional(profile.gas_limit()));
    println!("{:<14}{}", "gas price:", optional(profile.gas_price()));
    println!("{:<14}{}", "skip dry run:", profile.skip_dry_run());
}
