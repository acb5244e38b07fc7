// src/exporter.rs - Periodic export of printer state to text files
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::ExportSettings;
use crate::file_manager::{self, FileError};
use crate::format::{render_status, render_temperature};
use crate::snapshot::PrinterStateProvider;

/// Refresh cadence used unless the host asks for another one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

struct RefreshTask {
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

/// Owns the export settings and the refresh timer. The host drives it through
/// [`Exporter::on_startup`] and [`Exporter::on_settings_changed`].
pub struct Exporter {
    provider: Arc<dyn PrinterStateProvider>,
    interval: Duration,
    settings: Option<ExportSettings>,
    task: Option<RefreshTask>,
    timer_starts: u64,
}

impl Exporter {
    pub fn new(provider: Arc<dyn PrinterStateProvider>) -> Self {
        Self::with_interval(provider, DEFAULT_INTERVAL)
    }

    pub fn with_interval(provider: Arc<dyn PrinterStateProvider>, interval: Duration) -> Self {
        Self {
            provider,
            interval,
            settings: None,
            task: None,
            timer_starts: 0,
        }
    }

    /// Settings currently in effect, if any were accepted yet.
    pub fn settings(&self) -> Option<&ExportSettings> {
        self.settings.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// How many times the refresh timer has been (re)started. Lets callers
    /// and tests confirm that unchanged settings did not restart the timer.
    pub fn timer_starts(&self) -> u64 {
        self.timer_starts
    }

    pub async fn on_startup(&mut self, settings: ExportSettings) -> bool {
        self.reconcile(settings).await
    }

    pub async fn on_settings_changed(
        &mut self,
        folder: impl Into<PathBuf>,
        temperature_file: impl Into<String>,
        status_file: impl Into<String>,
    ) -> bool {
        self.reconcile(ExportSettings::new(folder, temperature_file, status_file)).await
    }

    /// Bring files on disk and the refresh timer in line with `new`.
    ///
    /// Returns whether anything changed. Filesystem failures are logged and
    /// never abort the reconciliation.
    pub async fn reconcile(&mut self, new: ExportSettings) -> bool {
        if let Err(e) = new.validate() {
            tracing::error!("Ignoring export settings: {}", e);
            return false;
        }

        let (folder_changed, temperature_changed, status_changed) = match &self.settings {
            Some(old) => (
                old.folder != new.folder,
                old.temperature_file != new.temperature_file,
                old.status_file != new.status_file,
            ),
            None => (true, true, true),
        };

        if !(folder_changed || temperature_changed || status_changed) {
            tracing::debug!("Export settings unchanged");
            return false;
        }

        tracing::info!(
            folder = %new.folder.display(),
            temperature = %new.temperature_file,
            status = %new.status_file,
            "New export settings"
        );

        // No tick may write under the old names once cleanup starts.
        self.stop_timer().await;

        if let Some(old) = &self.settings {
            if folder_changed {
                remove_output(&old.folder, &old.temperature_file).await;
                remove_output(&old.folder, &old.status_file).await;
                remove_folder(&old.folder).await;
            } else {
                if temperature_changed {
                    remove_output(&old.folder, &old.temperature_file).await;
                }
                if status_changed {
                    remove_output(&old.folder, &old.status_file).await;
                }
            }
        }

        if folder_changed {
            if let Err(e) = file_manager::touch_path(&new.folder).await {
                tracing::error!("Export folder couldn't be created: {}", e);
            }
        }

        self.settings = Some(new);
        self.start_timer();
        true
    }

    /// Stop the refresh timer. Settings are kept.
    pub async fn shutdown(&mut self) {
        self.stop_timer().await;
    }

    fn start_timer(&mut self) {
        let Some(settings) = self.settings.clone() else {
            return;
        };
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let provider = Arc::clone(&self.provider);
        // tokio::time::interval panics on a zero period.
        let period = self.interval.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        tracing::debug!("Export refresh loop shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        refresh(provider.as_ref(), &settings).await;
                    }
                }
            }
        });

        self.timer_starts += 1;
        tracing::info!("Export refresh started, every {:?}", period);
        self.task = Some(RefreshTask { shutdown_tx, handle });
    }

    async fn stop_timer(&mut self) {
        if let Some(task) = self.task.take() {
            // A tick in progress finishes its writes before the loop sees this.
            let _ = task.shutdown_tx.send(());
            if let Err(e) = task.handle.await {
                tracing::error!("Export refresh task failed: {}", e);
            }
        }
    }
}

/// One refresh tick: poll the provider and rewrite both files.
pub async fn refresh(provider: &dyn PrinterStateProvider, settings: &ExportSettings) {
    let status = provider.get_current_status();
    let temperatures = provider.get_current_temperatures();

    let temperature_text = render_temperature(temperatures.as_ref());
    write_output(&settings.folder, &settings.temperature_file, &temperature_text).await;

    let status_text = render_status(status.as_ref());
    write_output(&settings.folder, &settings.status_file, &status_text).await;
}

async fn write_output(folder: &Path, file: &str, data: &str) {
    match file_manager::touch_file(folder, file, data).await {
        Ok(()) => tracing::trace!("Wrote {}", folder.join(file).display()),
        Err(e) => tracing::error!("File '{}' couldn't be written: {}", file, e),
    }
}

async fn remove_output(folder: &Path, file: &str) {
    match file_manager::remove_file(folder, file).await {
        Ok(()) => {}
        Err(e) if e.kind() == Some(ErrorKind::NotFound) => {
            tracing::debug!("Nothing to remove: {}", e);
        }
        Err(e) => tracing::error!("File couldn't be removed: {}", e),
    }
}

async fn remove_folder(folder: &Path) {
    match file_manager::remove_path(folder).await {
        Ok(()) => {}
        Err(FileError::Io { source, .. })
            if matches!(source.kind(), ErrorKind::NotFound | ErrorKind::DirectoryNotEmpty) =>
        {
            tracing::debug!("Kept folder {}: {}", folder.display(), source);
        }
        Err(e) => tracing::warn!("Folder couldn't be removed: {}", e),
    }
}
