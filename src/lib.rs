pub mod config;
pub mod driver;
pub mod entry;
pub mod error;
pub mod generator;
pub mod logging;
pub mod serializer;

pub use config::{OutputFormat, ServiceProfile, SimConfig};
pub use driver::{Driver, RunSummary, WrittenFile};
pub use entry::{Level, LogContext, LogEntry};
pub use error::{SimError, SimResult};
pub use generator::EntryGenerator;
