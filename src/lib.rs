// krusty-exportdata: exports printer temperature and job status as text files

pub mod config;
pub mod exporter;
pub mod file_manager;
pub mod format;
pub mod snapshot;

pub use config::{Config, ConfigError, ExportSettings};
pub use exporter::{Exporter, DEFAULT_INTERVAL};
pub use format::{format_duration, render_status, render_temperature};
pub use snapshot::{
    IdleProvider, JsonFileProvider, PrinterStateProvider, PrinterStatusSnapshot,
    TemperatureReading, TemperatureSnapshot,
};
