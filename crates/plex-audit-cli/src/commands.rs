use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "plex-audit")]
#[command(about = "Find old, unwatched media in a Plex library", long_about = None)]
pub struct Cli {
    /// Library database to read (overrides configuration)
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List library sections by total media size
    Sections,
    /// Report decaying items in one library section
    Decay(DecayArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct DecayArgs {
    /// Library section id, as listed by `sections`
    #[arg(short, long)]
    pub section: Option<i64>,

    /// Staleness window in calendar months
    #[arg(short, long)]
    pub months: Option<u32>,

    /// Reference date (YYYY-MM-DD, UTC) instead of today
    #[arg(long)]
    pub now: Option<String>,

    /// Also write the report to this CSV file
    #[arg(long)]
    pub csv: Option<String>,
}
