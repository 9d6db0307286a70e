/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

mod commands;
use commands::{
  crawl::CrawlArgs, export::ExportArgs, report::ReportArgs, whitelist::WhitelistCommand,
};

mod config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "rsc")]
#[command(propagate_version = true)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Verbose output
  #[arg(short, long, global = true)]
  verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Build or refresh the ticker whitelist file
  Whitelist(WhitelistCommand),

  /// Crawl a subreddit for ticker mentions
  Crawl(CrawlArgs),

  /// Print today's top mentions and biggest movers
  Report(ReportArgs),

  /// Write mentions to JSON lines and CSV
  Export(ExportArgs),
}

#[tokio::main]
async fn main() {
  // Load environment variables
  dotenv().ok();

  let cli = Cli::parse();

  // RUST_LOG wins over --verbose
  let log_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
  tracing_subscriber::fmt().with_env_filter(filter).init();

  tokio::select! {
    outcome = run(cli) => {
      if let Err(e) = outcome {
        error!("{:#}", e);
        std::process::exit(1);
      }
    }
    _ = tokio::signal::ctrl_c() => {
      warn!("Interrupted by user");
    }
  }
}

async fn run(cli: Cli) -> Result<()> {
  let config = config::Config::from_env()?;

  match cli.command {
    Commands::Whitelist(cmd) => commands::whitelist::execute(cmd, config).await,
    Commands::Crawl(args) => commands::crawl::execute(args, config).await,
    Commands::Report(args) => commands::report::execute(args, config),
    Commands::Export(args) => commands::export::execute(args, config),
  }
}
