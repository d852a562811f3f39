use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Total sequence duration budget in seconds; the difficulty knob.
    #[serde(default = "SessionConfig::default_sequence_length")]
    pub sequence_length: f64,
    /// Note values a random sequence may use, in seconds
    /// (eighth, quarter, half, dotted half at 75 bpm).
    #[serde(default = "SessionConfig::default_possible_durations")]
    pub possible_durations: Vec<f64>,
    /// Seconds the group has to play the next correct pad.
    #[serde(default = "SessionConfig::default_response_timeout")]
    pub response_timeout: f64,
}

impl SessionConfig {
    fn default_sequence_length() -> f64 {
        9.6
    }
    fn default_possible_durations() -> Vec<f64> {
        vec![0.4, 0.8, 1.6, 2.4]
    }
    fn default_response_timeout() -> f64 {
        3.0
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sequence_length: Self::default_sequence_length(),
            possible_durations: Self::default_possible_durations(),
            response_timeout: Self::default_response_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Resolution of the engine clock.
    #[serde(default = "EngineConfig::default_tick_hz")]
    pub tick_hz: u32,
    /// Fixed RNG seed for reproducible sessions; omitted means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EngineConfig {
    fn default_tick_hz() -> u32 {
        1_000
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_hz: Self::default_tick_hz(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl GameConfig {
    /// Load the config, falling back to defaults on a missing or broken
    /// file. A missing file is written back as commented-out defaults so
    /// the knobs are discoverable.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write defaults and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                let mut commented = String::new();
                for line in text.lines() {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        commented.push('\n');
                    } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
                        commented.push_str(line);
                        commented.push('\n');
                    } else {
                        commented.push_str("# ");
                        commented.push_str(line);
                        commented.push('\n');
                    }
                }
                if let Err(err) = fs::write(path_obj, commented) {
                    eprintln!("Failed to write default config to {path}: {err}");
                }
            }
            Err(_) => {
                eprintln!("Failed to serialize default config; continuing with defaults");
            }
        }
        default_cfg
    }
}
