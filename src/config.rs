use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub seed: SeedSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Below-ring partners admissible under high competition. Kept signed so
    /// a negative value reaches the matcher and is rejected there.
    #[serde(default = "default_expansion_limit")]
    pub expansion_limit: i64,
    /// Attach a neighborhood survey of this radius to each report
    #[serde(default)]
    pub survey_radius_m: Option<f64>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            expansion_limit: default_expansion_limit(),
            survey_radius_m: None,
        }
    }
}

fn default_expansion_limit() -> i64 { 5 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputSettings {
    /// JSON snapshot of partners and leads; synthetic data when absent
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSettings {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "default_center_lng")]
    pub center_lng: f64,
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,
    #[serde(default = "default_partners")]
    pub partners: usize,
    #[serde(default = "default_leads")]
    pub leads: usize,
    #[serde(default = "default_customers")]
    pub customers: usize,
    #[serde(default = "default_splitters")]
    pub splitters: usize,
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,
    #[serde(default = "default_probe_leads")]
    pub probe_leads: usize,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            radius_m: default_radius_m(),
            partners: default_partners(),
            leads: default_leads(),
            customers: default_customers(),
            splitters: default_splitters(),
            rng_seed: default_rng_seed(),
            probe_leads: default_probe_leads(),
        }
    }
}

fn default_center_lat() -> f64 { 28.65 }
fn default_center_lng() -> f64 { 77.275 }
fn default_radius_m() -> f64 { 1000.0 }
fn default_partners() -> usize { 10 }
fn default_leads() -> usize { 50 }
fn default_customers() -> usize { 20 }
fn default_splitters() -> usize { 30 }
fn default_rng_seed() -> u64 { 42 }
fn default_probe_leads() -> usize { 1 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PARTNER_MATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PARTNER_MATCH__MATCHING__EXPANSION_LIMIT -> matching.expansion_limit
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("PARTNER_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.expansion_limit, 5);
        assert!(matching.survey_radius_m.is_none());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_default_seed() {
        let seed = SeedSettings::default();
        assert_eq!(seed.center_lat, 28.65);
        assert_eq!(seed.center_lng, 77.275);
        assert_eq!(seed.partners, 10);
        assert_eq!(seed.rng_seed, 42);
    }

    #[test]
    fn test_load_from_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[matching]\nexpansion_limit = 3\n\n[seed]\npartners = 4").unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.matching.expansion_limit, 3);
        assert_eq!(settings.seed.partners, 4);
        assert_eq!(settings.seed.customers, 20);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.input.snapshot_path.is_none());
    }
}
