use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rewind")]
#[command(author, version, about)]
#[command(long_about = "A touch-driven year-in-review story with timed quizzes.\n\n\
    Swipe or tap through full-screen slides, answer the quizzes along the way\n\
    and replay the whole story at the end.\n\n\
    Examples:\n  \
    rewind                       Play the built-in Rewind 2025 deck\n  \
    rewind my-year.yaml          Play a deck file (fullscreen)\n  \
    rewind --windowed --sound    Play in a phone-sized window with sound on\n  \
    rewind deck check my.yaml    Validate a deck file")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck file to play (YAML). Plays the built-in deck when omitted.
    pub deck: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Start with sound on
    #[arg(long, global = false)]
    pub sound: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Inspect story decks
    Deck {
        #[command(subcommand)]
        command: DeckCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.sound, defaults.quiz_timer)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Subcommand)]
pub enum DeckCommands {
    /// Validate a deck file and print a summary
    Check {
        /// Deck file (YAML)
        file: PathBuf,
    },

    /// Print the built-in deck as YAML
    Show,
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Deck { command }) => crate::commands::deck::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::banner::print_banner_with_version();
                Ok(())
            }
            None => {
                if let Some(file) = &self.deck {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                }
                crate::app::run(crate::app::LaunchOptions {
                    deck: self.deck,
                    windowed: self.windowed,
                    start_slide: self.slide,
                    sound: self.sound,
                })
            }
        }
    }
}
