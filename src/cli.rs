use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML
    #[arg(long, default_value = "madpads.toml")]
    pub config: String,

    /// RNG seed (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Rounds to play before exiting
    #[arg(long, default_value_t = 2)]
    pub rounds: u32,

    /// Probability per step that the demo bot hits a wrong pad
    #[arg(long, default_value_t = 0.1)]
    pub mistake_chance: f64,

    /// Seconds between bot plays
    #[arg(long, default_value_t = 0.8)]
    pub play_interval: f64,
}
