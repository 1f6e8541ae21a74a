use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cdwalk")]
#[command(version)]
#[command(about = "List the central directory of a ZIP/JAR archive", long_about = None)]
#[command(after_help = "Examples:\n  \
  cdwalk app.jar                 list entry names\n  \
  cdwalk -v -s launcher.sh       verbose listing of an archive behind a script\n  \
  CDWALK_LOG=trace cdwalk a.zip  log every decoded header")]
pub struct Cli {
    /// ZIP or JAR file path
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Strip bytes in front of the archive before walking it
    #[arg(short = 's', long = "skip-prefix")]
    pub skip_prefix: bool,

    /// List verbosely (offsets, sizes, dates)
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Quiet mode, no summary line
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Enable debug logging (overridden by CDWALK_LOG)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Filter directive used when CDWALK_LOG is not set
    pub fn default_log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "warn" }
    }
}
