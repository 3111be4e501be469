use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use directory_logging::{directory_debug, directory_info};

use crate::fetch::{Backend, FetchSettings, ReqwestBackend};
use crate::{Collection, EngineEvent, FetchError, ListingRequest, RequestSeq};

enum EngineCommand {
    Listing {
        seq: RequestSeq,
        request: ListingRequest,
    },
    Categories {
        collection: Collection,
    },
    Detail {
        collection: Collection,
        id: i64,
    },
}

/// Runs backend calls off the controller thread.
///
/// Commands never block the caller; results come back as [`EngineEvent`]s in
/// completion order, which need not match submission order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(backend: Arc<dyn Backend>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), command, event_tx).await;
                });
            }
            directory_debug!("engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn with_reqwest(base_url: &str, settings: FetchSettings) -> Result<Self, FetchError> {
        let backend = ReqwestBackend::new(base_url, settings)?;
        directory_info!("engine targeting {}", base_url);
        Self::new(Arc::new(backend)).map_err(|err| {
            FetchError::new(crate::FailureKind::Network, format!("runtime: {err}"))
        })
    }

    pub fn fetch_listing(&self, seq: RequestSeq, request: ListingRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Listing { seq, request });
    }

    pub fn fetch_categories(&self, collection: Collection) {
        let _ = self.cmd_tx.send(EngineCommand::Categories { collection });
    }

    pub fn fetch_detail(&self, collection: Collection, id: i64) {
        let _ = self.cmd_tx.send(EngineCommand::Detail { collection, id });
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    backend: &dyn Backend,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Listing { seq, request } => EngineEvent::ListingCompleted {
            seq,
            result: backend.fetch_listing(&request).await,
        },
        EngineCommand::Categories { collection } => EngineEvent::CategoriesCompleted {
            collection,
            result: backend.fetch_categories(collection).await,
        },
        EngineCommand::Detail { collection, id } => EngineEvent::DetailCompleted {
            collection,
            id,
            result: backend.fetch_detail(collection, id).await,
        },
    };
    let _ = event_tx.send(event);
}
