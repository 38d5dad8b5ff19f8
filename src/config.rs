use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::entry::Level;
use crate::error::{SimError, SimResult};

pub const DEFAULT_OUTPUT_DIR: &str = "output_logs";
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(SimError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A simulated source system and the messages it can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceProfile {
    pub name: String,
    pub messages: Vec<String>,
}

impl ServiceProfile {
    pub fn new(name: &str, messages: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            messages: messages.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn default_set() -> Vec<ServiceProfile> {
        vec![
            ServiceProfile::new(
                "auth",
                &["User login success", "Invalid password", "Token expired"],
            ),
            ServiceProfile::new(
                "billing",
                &["Payment processed", "Card declined", "Refund issued"],
            ),
            ServiceProfile::new(
                "inventory",
                &["Item stock updated", "Out of stock", "Inventory sync failed"],
            ),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub output_root: PathBuf,
    pub batch_size: usize,
    /// Generation order; also the order files are written in.
    pub services: Vec<ServiceProfile>,
    pub level_weights: [(Level, f64); 4],
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_DIR),
            batch_size: DEFAULT_BATCH_SIZE,
            services: ServiceProfile::default_set(),
            level_weights: [
                (Level::Debug, 0.2),
                (Level::Info, 0.5),
                (Level::Warn, 0.2),
                (Level::Error, 0.1),
            ],
        }
    }
}

impl SimConfig {
    pub fn with_output_root(mut self, root: impl AsRef<Path>) -> Self {
        self.output_root = root.as_ref().to_path_buf();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_services(mut self, services: Vec<ServiceProfile>) -> Self {
        self.services = services;
        self
    }

    pub fn service(&self, name: &str) -> Option<&ServiceProfile> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.services.is_empty() {
            return Err(SimError::InvalidConfig("no services configured".to_string()));
        }
        for (i, s) in self.services.iter().enumerate() {
            if self.services[..i].iter().any(|prev| prev.name == s.name) {
                return Err(SimError::InvalidConfig(format!(
                    "service '{}' listed more than once",
                    s.name
                )));
            }
        }
        if let Some(s) = self.services.iter().find(|s| s.messages.is_empty()) {
            return Err(SimError::InvalidConfig(format!(
                "service '{}' has no messages",
                s.name
            )));
        }
        let total: f64 = self.level_weights.iter().map(|(_, w)| *w).sum();
        if self.level_weights.iter().any(|(_, w)| !w.is_finite() || *w < 0.0) || total <= 0.0 {
            return Err(SimError::InvalidConfig(
                "level weights must be non-negative with a positive sum".to_string(),
            ));
        }
        Ok(())
    }
}
