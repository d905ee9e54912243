//! Background mesh-loading thread.
//!
//! Loading runs off the session thread so a large STL never stalls the
//! render loop. Each request carries a generation token; when several
//! requests queue up, only the newest is loaded (the older ones are
//! superseded before any work is done), and the session discards any
//! result whose token is not the latest it issued.

use std::sync::mpsc;

use web_time::Duration;

use super::{load_stl, MeshData};
use crate::error::ViewerError;

enum LoadRequest {
    Load { generation: u64, path: String },
    Shutdown,
}

/// A finished load, successful or not, tagged with its request token.
pub struct LoadResult {
    /// Generation token of the request that produced this result.
    pub generation: u64,
    /// The parsed mesh, or the underlying load error.
    pub outcome: Result<MeshData, ViewerError>,
}

/// Handle to the `mesh-loader` background thread.
pub struct MeshLoader {
    request_tx: mpsc::Sender<LoadRequest>,
    result_rx: mpsc::Receiver<LoadResult>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl MeshLoader {
    /// Spawn the background loading thread.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] if the thread fails to spawn.
    pub fn new() -> Result<Self, std::io::Error> {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (result_tx, result_rx) = mpsc::channel::<LoadResult>();

        let thread = std::thread::Builder::new()
            .name("mesh-loader".into())
            .spawn(move || {
                Self::thread_loop(&request_rx, &result_tx);
            })?;

        Ok(Self {
            request_tx,
            result_rx,
            thread: Some(thread),
        })
    }

    /// Submit a load request (non-blocking send).
    pub fn submit(&self, generation: u64, path: String) {
        let _ = self
            .request_tx
            .send(LoadRequest::Load { generation, path });
    }

    /// Non-blocking check for a finished load.
    pub fn try_recv(&self) -> Option<LoadResult> {
        self.result_rx.try_recv().ok()
    }

    /// Blocking check for a finished load, up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<LoadResult> {
        self.result_rx.recv_timeout(timeout.into()).ok()
    }

    /// Shut down the background thread and wait for it to finish.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(LoadRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    fn thread_loop(
        request_rx: &mpsc::Receiver<LoadRequest>,
        result_tx: &mpsc::Sender<LoadResult>,
    ) {
        while let Ok(request) = request_rx.recv() {
            match drain_latest(request, request_rx) {
                LoadRequest::Shutdown => break,
                LoadRequest::Load { generation, path } => {
                    log::debug!("loading {path} (generation {generation})");
                    let outcome = load_stl(&path);
                    let _ = result_tx.send(LoadResult {
                        generation,
                        outcome,
                    });
                }
            }
        }
    }
}

impl Drop for MeshLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Collapse queued requests down to the newest one. A shutdown anywhere
/// in the queue wins.
fn drain_latest(
    mut latest: LoadRequest,
    request_rx: &mpsc::Receiver<LoadRequest>,
) -> LoadRequest {
    while let Ok(next) = request_rx.try_recv() {
        if matches!(next, LoadRequest::Shutdown) {
            return LoadRequest::Shutdown;
        }
        latest = next;
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_load_failure() {
        let loader = MeshLoader::new().unwrap();
        loader.submit(7, "/nonexistent/path/model.stl".into());

        let result = loader
            .recv_timeout(Duration::from_secs(5))
            .expect("loader should respond");
        assert_eq!(result.generation, 7);
        assert!(matches!(
            result.outcome,
            Err(ViewerError::MeshLoad(_))
        ));
    }

    #[test]
    fn shutdown_joins_cleanly() {
        let mut loader = MeshLoader::new().unwrap();
        loader.shutdown();
        // Second shutdown (e.g. from Drop) is a no-op.
        loader.shutdown();
    }
}
