//! One pass over the service catalog: generate, place, write, report.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{OutputFormat, SimConfig};
use crate::error::SimResult;
use crate::generator::EntryGenerator;
use crate::logging::{self, v_str, ProfileScope};
use crate::serializer::file_sha256;

pub const DATE_DIR_FORMAT: &str = "%Y-%m-%d";
pub const FILE_TS_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub service: String,
    pub path: PathBuf,
    pub count: usize,
    pub sha256: String,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub format: OutputFormat,
    pub files: Vec<WrittenFile>,
}

impl RunSummary {
    pub fn total_entries(&self) -> usize {
        self.files.iter().map(|f| f.count).sum()
    }
}

/// `<root>/<service>/<YYYY-MM-DD>/logs-<service>-<YYYY-MM-DDTHH-MM-SS>.<ext>`
///
/// Date directory and file timestamp come from the same instant so a batch
/// written across midnight never lands in the wrong day's directory.
pub fn output_path(root: &Path, service: &str, at: DateTime<Utc>, format: OutputFormat) -> PathBuf {
    let file_name = format!(
        "logs-{}-{}.{}",
        service,
        at.format(FILE_TS_FORMAT),
        format.extension()
    );
    root.join(service)
        .join(at.format(DATE_DIR_FORMAT).to_string())
        .join(file_name)
}

pub struct Driver<R: Rng> {
    config: SimConfig,
    generator: EntryGenerator<R>,
}

impl Driver<StdRng> {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let generator = EntryGenerator::from_entropy(&config)?;
        Ok(Self { config, generator })
    }
}

impl<R: Rng> Driver<R> {
    pub fn with_rng(config: SimConfig, rng: R) -> SimResult<Self> {
        let generator = EntryGenerator::new(&config, rng)?;
        Ok(Self { config, generator })
    }

    /// Validates `format` before touching the filesystem, then writes every
    /// service. The first failing service aborts the run.
    pub fn run(&mut self, format: &str) -> SimResult<RunSummary> {
        let format: OutputFormat = format.parse()?;
        self.run_format(format)
    }

    pub fn run_format(&mut self, format: OutputFormat) -> SimResult<RunSummary> {
        let started = Instant::now();
        let services: Vec<String> = self.config.services.iter().map(|s| s.name.clone()).collect();
        let names: Vec<&str> = services.iter().map(String::as_str).collect();
        logging::log_run_start(
            format.extension(),
            &self.config.output_root,
            self.config.batch_size,
            &names,
        );

        let mut files = Vec::with_capacity(services.len());
        for service in &services {
            files.push(self.write_service(service, format)?);
        }

        let summary = RunSummary { format, files };
        logging::log_run_summary(
            summary.files.len(),
            summary.total_entries(),
            started.elapsed().as_secs_f64() * 1000.0,
        );
        Ok(summary)
    }

    fn write_service(&mut self, service: &str, format: OutputFormat) -> SimResult<WrittenFile> {
        let _scope = ProfileScope::with_context("write_service", &[("service", v_str(service))]);

        let batch = self.generator.generate_batch(service, self.config.batch_size)?;
        logging::log_batch_generated(service, batch.len());

        let path = output_path(&self.config.output_root, service, Utc::now(), format);
        format.write(&batch, &path)?;
        let sha256 = file_sha256(&path)?;

        println!(
            "[+] Generated {} logs for {} → {}",
            batch.len(),
            service,
            path.display()
        );
        logging::log_batch_written(service, &path, batch.len(), &sha256);

        Ok(WrittenFile {
            service: service.to_string(),
            path,
            count: batch.len(),
            sha256,
        })
    }
}
