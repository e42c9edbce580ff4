//! Helper functions for UI operations.
//!
//! Background fetch spawning, panic capture for spawned tasks and the
//! guarded browser launch.

use crate::app::{App, AppEvent};
use crate::news::NewsClient;
use crate::state::FetchRequest;
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of a panicking task silently disappearing, the panic payload is
/// turned into `Err(String)` so the event loop can clear its loading state.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic payload".to_string()
            }
        })
}

/// Spawn a background task that performs `request` and reports a
/// `AppEvent::PageLoaded`.
///
/// Returns the JoinHandle so a superseding fetch can abort this one.
pub(super) fn spawn_page_fetch(
    client: NewsClient,
    request: FetchRequest,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    let FetchRequest {
        category,
        page,
        generation,
    } = request;

    tokio::spawn(async move {
        let tx_panic = tx.clone();
        match catch_task_panic(client.fetch_page(category, page)).await {
            Ok(result) => {
                let event = AppEvent::PageLoaded {
                    generation,
                    category,
                    page,
                    result,
                };
                if let Err(e) = tx.send(event).await {
                    tracing::warn!(
                        error = %e,
                        event = "PageLoaded",
                        "Channel send failed (receiver dropped)"
                    );
                }
            }
            Err(panic_msg) => {
                tracing::error!(
                    task = "page_fetch",
                    generation,
                    error = %panic_msg,
                    "Background task panicked"
                );
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "page_fetch",
                        generation,
                        error: panic_msg,
                    })
                    .await;
            }
        }
    })
}

/// Run the fetch a state transition asked for, if any.
pub(super) fn dispatch_fetch(
    app: &mut App,
    request: Option<FetchRequest>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let Some(request) = request else {
        return;
    };

    tracing::debug!(
        category = %request.category,
        page = request.page,
        generation = request.generation,
        "Dispatching page fetch"
    );
    let handle = spawn_page_fetch(app.client.clone(), request, event_tx.clone());
    app.track_fetch(handle);
}

/// Open the selected article's link in the system browser.
pub(super) fn open_selected_article(app: &mut App) {
    let Some(url) = app.selected_article().map(|a| a.url.clone()) else {
        return;
    };

    if url.is_empty() {
        app.set_status("Article has no link");
        return;
    }

    // Validate before open::that() since the link comes from the remote API
    match validate_url_for_open(&url) {
        Err(e) => app.set_status(e.to_string()),
        Ok(valid) => match open::that(valid.as_str()) {
            Ok(()) => app.set_status("Opened in browser"),
            Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
        },
    }
}
