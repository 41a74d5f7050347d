// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use treelock::commands::audit::AuditCommand;
use treelock::commands::config_cmd::ConfigCommand;
use treelock::commands::run::RunCommand;
use treelock::config::new_treelock_config;
use treelock::engine::UpgradeStrategy;
use treelock::error::{Result, TreelockError, format_error_with_color, get_exit_code};
use treelock::logging;

#[derive(Parser)]
#[command(name = "treelock")]
#[command(author, version, about = "Hierarchical lock engine over a labeled tree", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer lock, unlock and upgrade queries
    #[command(long_about = "Answer lock, unlock and upgrade queries

Reads '<nodes> <fan-out> <queries>', the node labels in breadth-first order,
then one '<op> <label> <user>' triple per query (1 = lock, 2 = unlock,
3 = upgrade). Prints 'true' or 'false' for each query.

Examples:
  treelock run < queries.txt
  treelock run --input queries.txt --strategy naive")]
    Run {
        /// Read the problem from a file instead of stdin
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// How upgrades release descendant locks (batched or naive)
        #[arg(long, value_name = "STRATEGY")]
        strategy: Option<UpgradeStrategy>,
    },

    /// Process queries and verify every lock counter by recomputation
    Audit {
        /// Read the problem from a file instead of stdin
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// How upgrades release descendant locks (batched or naive)
        #[arg(long, value_name = "STRATEGY")]
        strategy: Option<UpgradeStrategy>,

        /// Output the report in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Write the effective configuration to config.toml
        #[arg(long)]
        save: bool,
    },
}

fn setup_logger(cli: &Cli) {
    logging::setup_logger(cli.verbose);
}

fn exit_with(error: &TreelockError) -> ! {
    eprint!(
        "{}",
        format_error_with_color(error, std::io::stderr().is_terminal())
    );
    std::process::exit(get_exit_code(error));
}

fn main() {
    let cli = Cli::parse();

    // Initialize logger based on CLI flags and environment
    setup_logger(&cli);

    // Load configuration once at startup
    let config = match new_treelock_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let result: Result<()> = match cli.command {
        Commands::Run { input, strategy } => {
            RunCommand::new(&config).and_then(|command| command.execute(input.as_deref(), strategy))
        }
        Commands::Audit {
            input,
            strategy,
            json,
        } => AuditCommand::new(&config)
            .and_then(|command| command.execute(input.as_deref(), strategy, json)),
        Commands::Config { json, save } => {
            ConfigCommand::new(&config).and_then(|command| command.execute(json, save))
        }
    };

    if let Err(e) = result {
        exit_with(&e);
    }
}
