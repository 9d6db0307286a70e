use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use rsc_core::{SymbolNormalizer, SymbolRules, WordFrequencyTable};
use rsc_loaders::whitelist::verify::{YahooVerifier, DEFAULT_VERIFY_WORKERS};
use rsc_loaders::whitelist::{BuildReport, DEFAULT_MARKETS, DEFAULT_TOP_CRYPTO};
use rsc_loaders::{BuildOptions, CsvProcessor, Market, WhitelistBuilder};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct WhitelistCommand {
  #[command(subcommand)]
  command: WhitelistSubcommands,
}

#[derive(Subcommand, Debug)]
enum WhitelistSubcommands {
  /// Download listings, normalize them and write the whitelist CSV
  Build(BuildArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
  /// Comma separated markets: us, de, cn, crypto
  #[arg(long, default_value = DEFAULT_MARKETS)]
  markets: String,

  /// Coins taken from the market cap ranking when crypto is selected
  #[arg(long, default_value_t = DEFAULT_TOP_CRYPTO)]
  top_crypto: u32,

  /// Drop symbols the quote service does not know
  #[arg(long)]
  verify: bool,

  /// Concurrent verification lookups
  #[arg(long, default_value_t = DEFAULT_VERIFY_WORKERS)]
  workers: usize,

  /// Fail if any source fails
  #[arg(long)]
  strict: bool,

  /// Output CSV (defaults to TICKER_FILE)
  #[arg(short, long)]
  out: Option<PathBuf>,

  /// Word frequency table (`word<TAB>zipf`) replacing the built-in one
  #[arg(long)]
  word_freq_file: Option<PathBuf>,
}

pub async fn execute(cmd: WhitelistCommand, config: Config) -> Result<()> {
  match cmd.command {
    WhitelistSubcommands::Build(args) => build(args, config).await,
  }
}

async fn build(args: BuildArgs, config: Config) -> Result<()> {
  let markets = Market::parse_list(&args.markets);
  if markets.is_empty() {
    bail!("No known market in --markets {:?}", args.markets);
  }

  let mut rules = SymbolRules::default();
  if let Some(path) = args.word_freq_file.as_ref().or(config.word_freq_file.as_ref()) {
    let table = WordFrequencyTable::load(path)
      .with_context(|| format!("Failed to load word frequencies from {}", path.display()))?;
    info!("Loaded {} word frequencies from {}", table.len(), path.display());
    rules = rules.with_word_freq(table);
  }

  let mut builder = WhitelistBuilder::new(SymbolNormalizer::new(rules))?;
  if args.verify {
    let verifier = YahooVerifier::new(YahooVerifier::DEFAULT_BASE_URL)
      .context("Failed to create quote verifier")?;
    builder = builder.with_verifier(Arc::new(verifier));
  }

  let options = BuildOptions {
    markets,
    top_crypto: args.top_crypto,
    verify: args.verify,
    workers: args.workers.max(1),
    strict: args.strict,
    show_progress: true,
  };
  let (whitelist, report) = builder.build(&options).await?;

  let out = args.out.unwrap_or_else(|| config.ticker_file.clone());
  CsvProcessor::new().write_whitelist(&whitelist, &out)?;

  print_build_report(&report);
  println!("💾 Wrote {} symbols to {}", whitelist.len(), out.display());
  Ok(())
}

fn print_build_report(report: &BuildReport) {
  println!("\n📋 Whitelist build");
  println!("==================");
  println!("Sources ok:       {}", report.succeeded_sources.join(", "));
  for (name, error) in &report.failed_sources {
    println!("Source failed:    {} ({})", name, error);
  }
  println!("Raw symbols:      {}", report.raw_count);
  println!("Rejected:         {}", report.rejected_total());

  let mut rejected: Vec<_> = report.rejected.iter().collect();
  rejected.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.to_string().cmp(&b.0.to_string())));
  for (reason, count) in rejected {
    println!("  {:<32} {:>6}", reason.to_string(), count);
  }

  println!("Normalized:       {}", report.normalized_count);
  if let Some((kept, checked)) = report.verified {
    println!("Verified:         {} of {}", kept, checked);
  }
  println!("Final:            {}", report.final_count);
}
