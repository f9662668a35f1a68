mod session;

pub use session::*;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::application::{DEFAULT_MIN_NAME_CHARS, LedgerService, Settings};

/// Tally - in-memory personal finance ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Record purchases and sales for one session, checked against your categories and persons")]
#[command(version)]
pub struct Cli {
    /// Minimum number of non-space characters in category and person names
    #[arg(long, default_value_t = DEFAULT_MIN_NAME_CHARS)]
    pub min_name_chars: usize,

    /// Create persons named in a transaction that are not in the ledger yet
    #[arg(long)]
    pub create_persons: bool,

    /// Approve category overrides without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings::default()
            .with_min_name_chars(self.min_name_chars)
            .with_create_unknown_persons(self.create_persons)
    }

    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let service = LedgerService::new(self.settings());
        let stdin = io::stdin();
        let mut session =
            Session::new(service, stdin.lock(), io::stdout()).with_assume_yes(self.yes);
        session.run()
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "tally=debug" } else { "tally=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // Logs go to stderr so they never interleave with session output.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let cli = Cli::parse_from(["tally"]);
        assert_eq!(cli.settings(), Settings::default());
        assert!(!cli.yes);
    }

    #[test]
    fn test_flags_map_to_settings() {
        let cli = Cli::parse_from(["tally", "--min-name-chars", "5", "--create-persons", "-y"]);
        let settings = cli.settings();
        assert_eq!(settings.min_name_chars, 5);
        assert!(settings.create_unknown_persons);
        assert!(cli.yes);
    }
}
