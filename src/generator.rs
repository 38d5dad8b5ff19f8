//! Random log entry generation.
//!
//! The random source is injected so callers can pass a seeded `StdRng`
//! and get a reproducible batch (modulo timestamps).

use chrono::{SecondsFormat, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::SimConfig;
use crate::entry::{Level, LogContext, LogEntry};
use crate::error::{SimError, SimResult};

pub const USER_ID_RANGE: std::ops::RangeInclusive<u32> = 1000..=9999;
pub const REQUEST_ID_RANGE: std::ops::RangeInclusive<u32> = 10000..=99999;

pub struct EntryGenerator<R: Rng> {
    rng: R,
    config: SimConfig,
    levels: [Level; 4],
    level_dist: WeightedIndex<f64>,
}

impl EntryGenerator<StdRng> {
    pub fn from_entropy(config: &SimConfig) -> SimResult<Self> {
        Self::new(config, StdRng::from_entropy())
    }

    pub fn seeded(config: &SimConfig, seed: u64) -> SimResult<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> EntryGenerator<R> {
    pub fn new(config: &SimConfig, rng: R) -> SimResult<Self> {
        config.validate()?;
        let levels = config.level_weights.map(|(level, _)| level);
        let level_dist = WeightedIndex::new(config.level_weights.iter().map(|(_, w)| *w))
            .map_err(|e| SimError::InvalidConfig(format!("level weights: {}", e)))?;
        Ok(Self {
            rng,
            config: config.clone(),
            levels,
            level_dist,
        })
    }

    /// Build one entry for `service`. Names outside the catalog are an error,
    /// never a fallback to some other service's messages.
    pub fn generate(&mut self, service: &str) -> SimResult<LogEntry> {
        let profile = self
            .config
            .service(service)
            .ok_or_else(|| SimError::UnknownService(service.to_string()))?;

        let level = self.levels[self.level_dist.sample(&mut self.rng)];
        let message = profile
            .messages
            .choose(&mut self.rng)
            .ok_or_else(|| {
                SimError::InvalidConfig(format!("service '{}' has no messages", service))
            })?
            .clone();
        let context = LogContext {
            user_id: self.rng.gen_range(USER_ID_RANGE).to_string(),
            request_id: format!("req_{}", self.rng.gen_range(REQUEST_ID_RANGE)),
        };

        Ok(LogEntry::new(
            Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            service,
            level,
            message,
            context,
        ))
    }

    pub fn generate_batch(&mut self, service: &str, n: usize) -> SimResult<Vec<LogEntry>> {
        if self.config.service(service).is_none() {
            return Err(SimError::UnknownService(service.to_string()));
        }
        (0..n).map(|_| self.generate(service)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::collections::HashMap;

    fn seeded(seed: u64) -> EntryGenerator<StdRng> {
        EntryGenerator::seeded(&SimConfig::default(), seed).unwrap()
    }

    #[test]
    fn entry_service_and_message_match_catalog() {
        let cfg = SimConfig::default();
        let mut gen = seeded(7);
        for profile in &cfg.services {
            for _ in 0..50 {
                let entry = gen.generate(&profile.name).unwrap();
                assert_eq!(entry.service(), profile.name);
                assert!(profile.messages.iter().any(|m| m == entry.message()));
            }
        }
    }

    #[test]
    fn unknown_service_fails_fast() {
        let mut gen = seeded(1);
        let err = gen.generate("shipping").unwrap_err();
        assert!(matches!(err, SimError::UnknownService(ref s) if s == "shipping"));
    }

    #[test]
    fn empty_batch_for_unknown_service_still_fails() {
        let mut gen = seeded(1);
        let err = gen.generate_batch("nope", 0).unwrap_err();
        assert!(matches!(err, SimError::UnknownService(ref s) if s == "nope"));
        assert!(gen.generate_batch("auth", 0).unwrap().is_empty());
    }

    #[test]
    fn context_ids_are_in_range() {
        let mut gen = seeded(42);
        for _ in 0..2_000 {
            let entry = gen.generate("billing").unwrap();
            let ctx = entry.context();

            assert_eq!(ctx.user_id.len(), 4);
            let user: u32 = ctx.user_id.parse().unwrap();
            assert!(USER_ID_RANGE.contains(&user));

            let digits = ctx.request_id.strip_prefix("req_").unwrap();
            assert_eq!(digits.len(), 5);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
            let req: u32 = digits.parse().unwrap();
            assert!(REQUEST_ID_RANGE.contains(&req));
        }
    }

    #[test]
    fn level_distribution_tracks_weights() {
        let mut gen = seeded(2024);
        let n = 10_000;
        let mut counts: HashMap<Level, usize> = HashMap::new();
        for _ in 0..n {
            *counts.entry(gen.generate("inventory").unwrap().level()).or_default() += 1;
        }
        let expected = [
            (Level::Debug, 0.2),
            (Level::Info, 0.5),
            (Level::Warn, 0.2),
            (Level::Error, 0.1),
        ];
        for (level, p) in expected {
            let observed = *counts.get(&level).unwrap_or(&0) as f64 / n as f64;
            // ~5 sigma for p=0.5 at n=10k is 0.025
            assert!(
                (observed - p).abs() < 0.03,
                "{} observed {:.3} expected {:.1}",
                level,
                observed,
                p
            );
        }
    }

    #[test]
    fn same_seed_same_batch_contents() {
        let a = seeded(99).generate_batch("auth", 20).unwrap();
        let b = seeded(99).generate_batch("auth", 20).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.level(), y.level());
            assert_eq!(x.message(), y.message());
            assert_eq!(x.context(), y.context());
        }
    }

    #[test]
    fn timestamp_is_utc_iso8601() {
        let entry = seeded(3).generate("auth").unwrap();
        assert!(entry.timestamp().ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(entry.timestamp()).is_ok());
    }

    #[test]
    fn batch_has_requested_length() {
        let batch = seeded(5).generate_batch("inventory", 17).unwrap();
        assert_eq!(batch.len(), 17);
        assert!(batch.iter().all(|e| e.service() == "inventory"));
    }
}
