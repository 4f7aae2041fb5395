//! Command-line surface: a `clap`-derive `Cli` struct parsed in `main`.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interpreter for the Grin scripting language")]
pub struct Cli {
    /// Increase logging verbosity; repeat for more detail (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Maximum GOSUB nesting depth before MAXIMUM RECURSION REACHED.
    #[arg(long, default_value_t = grin::DEFAULT_RECURSION_LIMIT)]
    pub recursion_limit: usize,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
