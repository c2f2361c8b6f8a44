//! Debounced re-rendering on settings changes.
//!
//! ```text
//! SettingsStore ──watch──► scheduler task ──Debouncer(300ms)──► Render (blocking pool) ──watch──► current graphic
//! ```
//!
//! Only the latest settings are ever rendered: every change restarts the
//! pending timer. Clearing `data` removes the graphic immediately.
//!
//! Every change bumps a generation counter. A render publishes its result
//! only while its generation is still the latest, so a render that was
//! already running when the data changed or was cleared is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::debounce::Debouncer;
use super::{Render, RenderOptions, RenderedQr};
use crate::settings::Settings;
use crate::store::SettingsStore;

/// Default quiet period before re-rendering.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub type CurrentGraphic = Option<Arc<RenderedQr>>;

/// Keeps the rendered graphic in sync with a [`SettingsStore`].
pub struct RenderScheduler {
    current: watch::Receiver<CurrentGraphic>,
    task: JoinHandle<()>,
}

/// State shared between the scheduler task and in-flight renders.
struct Shared<R> {
    renderer: Mutex<R>,
    generation: AtomicU64,
    tx: watch::Sender<CurrentGraphic>,
}

impl RenderScheduler {
    /// Start watching `store`. The renderer is created by the caller once and
    /// reused for every render.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(store: &SettingsStore, renderer: R, delay: Duration) -> Self
    where
        R: Render + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let shared = Arc::new(Shared {
            renderer: Mutex::new(renderer),
            generation: AtomicU64::new(0),
            tx,
        });
        let mut settings_rx = store.subscribe();

        let task = tokio::spawn(async move {
            let mut debouncer = Debouncer::new(delay);

            let initial = settings_rx.borrow_and_update().clone();
            schedule(&mut debouncer, &shared, &initial);

            while settings_rx.changed().await.is_ok() {
                let settings = settings_rx.borrow_and_update().clone();
                schedule(&mut debouncer, &shared, &settings);
            }
            tracing::debug!("settings store closed, render scheduler stopping");
        });

        Self { current: rx, task }
    }

    /// The most recent graphic, or `None` when there is no data.
    pub fn current(&self) -> CurrentGraphic {
        self.current.borrow().clone()
    }

    /// Receiver notified whenever the graphic is replaced or cleared.
    pub fn subscribe(&self) -> watch::Receiver<CurrentGraphic> {
        self.current.clone()
    }
}

impl Drop for RenderScheduler {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn schedule<R>(debouncer: &mut Debouncer, shared: &Arc<Shared<R>>, settings: &Settings)
where
    R: Render + 'static,
{
    let generation = shared.generation.fetch_add(1, Ordering::SeqCst) + 1;

    if !settings.has_data() {
        debouncer.cancel();
        if shared.tx.borrow().is_some() {
            tracing::debug!("data cleared, dropping rendered graphic");
        }
        shared.tx.send_replace(None);
        return;
    }

    let options = RenderOptions::from_settings(settings);
    let shared = shared.clone();

    debouncer.call(async move {
        let worker = shared.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut renderer = worker.renderer.lock().unwrap_or_else(PoisonError::into_inner);
            renderer.render(&options)
        })
        .await;

        match result {
            Ok(Ok(qr)) => {
                let payload_len = qr.payload.len();
                let size = qr.width;
                let qr = Arc::new(qr);
                // Checked under the channel's write lock, so a clear that
                // lands after this point still wins.
                let published = shared.tx.send_if_modified(|current| {
                    if shared.generation.load(Ordering::SeqCst) == generation {
                        *current = Some(qr);
                        true
                    } else {
                        false
                    }
                });
                if published {
                    tracing::debug!(payload_len, size, "rendered QR graphic");
                } else {
                    tracing::debug!(generation, "discarding superseded render");
                }
            }
            // The previous graphic stays in place
            Ok(Err(e)) => tracing::error!("Error generating QR code: {}", e),
            Err(e) => tracing::error!("Render task failed: {}", e),
        }
    });
}
