use anyhow::{Context, Result};
use clap::Args;
use rsc_loaders::crawl::today;
use rsc_loaders::export_mentions;
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ExportArgs {
  /// SQLite database file (defaults to DATABASE_URL)
  #[arg(long)]
  db: Option<String>,

  /// Output directory (defaults to EXPORT_DIR)
  #[arg(long)]
  out_dir: Option<PathBuf>,

  /// Export every stored mention instead of today's
  #[arg(long)]
  all: bool,
}

pub fn execute(args: ExportArgs, config: Config) -> Result<()> {
  let mut conn = super::connect(config.database_url(args.db.as_deref()))?;
  let out_dir = args.out_dir.unwrap_or_else(|| config.export_dir.clone());
  let day = if args.all { None } else { Some(today()) };

  let summary = export_mentions(&mut conn, &out_dir, day)
    .with_context(|| format!("Export to {} failed", out_dir.display()))?;

  info!(
    "Exported {} mentions to {} and {}",
    summary.rows,
    summary.json_path.display(),
    summary.csv_path.display()
  );
  Ok(())
}
