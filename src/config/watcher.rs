//! Configuration file watcher for hot reload.
//!
//! The watch sits on the file's directory so that saves which rename a new
//! file over the path keep being seen. Events are filtered down to the
//! configured file name. When the path is a symlink (a mounted Kubernetes
//! ConfigMap) the target is swapped through sibling entries, so any create or
//! rename in the directory counts.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::loader::{load_config, ConfigError};
use crate::config::store::ConfigStore;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

type EventRx = mpsc::UnboundedReceiver<notify::Result<Event>>;

/// Reloads the configuration file into a [`ConfigStore`] whenever it changes.
pub struct ConfigWatcher {
    path: PathBuf,
    store: Arc<ConfigStore>,
    debounce: Duration,
}

impl ConfigWatcher {
    /// Create a watcher for `path` that installs into `store`.
    pub fn new(path: &Path, store: Arc<ConfigStore>) -> Self {
        Self {
            path: path.to_path_buf(),
            store,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// How long to wait for a burst of file events to settle before reloading.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Load the file and install it. On error the current configuration stays.
    pub fn reload(&self) -> Result<(), ConfigError> {
        match load_config(&self.path) {
            Ok(config) => {
                tracing::info!(
                    path = %self.path.display(),
                    schedules = config.schedules.len(),
                    localized_timezones = config.localized_timezones.len(),
                    "Config reloaded"
                );
                self.store.set(config);
                metrics::record_config_reload(true);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to reload config, keeping current configuration"
                );
                metrics::record_config_reload(false);
                Err(e)
            }
        }
    }

    /// Start watching the file's directory and spawn the reload task.
    ///
    /// The task runs until `shutdown` fires.
    pub fn spawn(self, shutdown: ShutdownSignal) -> Result<JoinHandle<()>, notify::Error> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;
        let dir = self.watch_dir();
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(
            path = %self.path.display(),
            dir = %dir.display(),
            "Config watcher started"
        );
        Ok(tokio::spawn(self.run(watcher, rx, shutdown)))
    }

    fn watch_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    async fn run(self, watcher: RecommendedWatcher, mut events: EventRx, mut shutdown: ShutdownSignal) {
        // Dropping the watcher stops notifications.
        let _watcher = watcher;
        let file_name = self.path.file_name().map(OsString::from);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Config watcher received shutdown signal, exiting loop");
                    break;
                }
                event = events.recv() => match event {
                    Some(Ok(event)) if self.concerns_config(&event, file_name.as_deref()) => {
                        tracing::debug!(kind = ?event.kind, "Config file change detected");
                        self.settle(&mut events).await;
                        if self.path.exists() {
                            let _ = self.reload();
                        } else {
                            tracing::debug!(
                                path = %self.path.display(),
                                "Config file removed, waiting for it to reappear"
                            );
                        }
                    }
                    Some(Ok(event)) => {
                        tracing::trace!(kind = ?event.kind, paths = ?event.paths, "Ignoring watcher event");
                    }
                    Some(Err(e)) => tracing::error!(error = %e, "Watch error"),
                    None => break,
                }
            }
        }
    }

    /// Whether `event` can have changed what `self.path` resolves to.
    fn concerns_config(&self, event: &Event, file_name: Option<&OsStr>) -> bool {
        let kind = event.kind;
        if !(kind.is_modify() || kind.is_create() || kind.is_remove()) {
            return false;
        }
        let names_config = event.paths.iter().any(|p| p.file_name() == file_name);
        names_config || (self.is_symlink() && (kind.is_create() || kind.is_modify()))
    }

    fn is_symlink(&self) -> bool {
        std::fs::symlink_metadata(&self.path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// Wait for the writer to finish and drain the events it produced meanwhile.
    async fn settle(&self, events: &mut EventRx) {
        tokio::time::sleep(self.debounce).await;
        drain_pending(events);
    }
}

/// Empty the queue, logging backend errors. Returns how many there were.
fn drain_pending(events: &mut EventRx) -> usize {
    let mut errors = 0;
    while let Ok(res) = events.try_recv() {
        if let Err(e) = res {
            tracing::error!(error = %e, "Watch error");
            errors += 1;
        }
    }
    errors
}
