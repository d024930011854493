// Copyright 2026 Herorates Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use herorates::cli::{self, HarvestOptions};
use herorates::fetch::{DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS};
use herorates::params::{InputMethod, Region, Role, Tier};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "herorates",
    about = "Herorates — mirror a remote hero rates API into local CSV datasets",
    version,
    after_help = "Run 'herorates <command> --help' for details on each command."
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by the scrape and single subcommands.
#[derive(clap::Args)]
struct HarvestArgs {
    /// Output directory for CSV files
    #[arg(long, default_value = "data")]
    output_dir: PathBuf,

    /// Delay between requests in seconds
    #[arg(long, default_value_t = 1.0)]
    delay: f64,

    /// Rates endpoint to fetch from
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Attempt budget per combination
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,
}

impl HarvestArgs {
    fn into_options(self) -> HarvestOptions {
        HarvestOptions {
            output_dir: self.output_dir,
            base_url: self.base_url,
            delay_secs: self.delay,
            max_attempts: self.max_attempts,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Harvest every parameter combination
    Scrape {
        /// Stop after the first N combinations
        #[arg(long)]
        limit: Option<usize>,

        #[command(flatten)]
        harvest: HarvestArgs,
    },
    /// Harvest one explicit combination
    Single {
        /// Input method
        #[arg(long, value_enum)]
        input: Option<InputMethod>,

        /// Map slug
        #[arg(long, default_value = "all-maps")]
        map: String,

        /// Region
        #[arg(long, value_enum)]
        region: Option<Region>,

        /// Role filter
        #[arg(long, value_enum)]
        role: Option<Role>,

        /// Role queue flag
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
        rq: Option<u8>,

        /// Competitive tier
        #[arg(long, value_enum)]
        tier: Option<Tier>,

        #[command(flatten)]
        harvest: HarvestArgs,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Scrape { limit, harvest } => {
            cli::scrape_cmd::run(&harvest.into_options(), limit).await
        }
        Commands::Single {
            input,
            map,
            region,
            role,
            rq,
            tier,
            harvest,
        } => {
            cli::single_cmd::run(
                &harvest.into_options(),
                input,
                map,
                region,
                role,
                rq,
                tier,
            )
            .await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "herorates", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let directive = if verbose {
        "herorates=debug"
    } else {
        "herorates=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().unwrap()),
        )
        .init();
}
