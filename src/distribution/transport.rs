//! Built-in transports.

use super::{DeliveryId, DistributionError, OutgoingMessage, Transport};
use chrono::Utc;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Writes each message as a JSON file into an outbox directory.
///
/// A mail relay (or a person) picks messages up from there.
pub struct OutboxTransport {
    dir: PathBuf,
    sequence: AtomicU64,
}

impl OutboxTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sequence: AtomicU64::new(0),
        }
    }

    fn next_id(&self) -> DeliveryId {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        DeliveryId(format!("{}-{:03}", Utc::now().format("%Y%m%d-%H%M%S"), n))
    }
}

impl Transport for OutboxTransport {
    fn send<'a>(
        &'a self,
        message: &'a OutgoingMessage,
    ) -> BoxFuture<'a, Result<DeliveryId, DistributionError>> {
        async move {
            tokio::fs::create_dir_all(&self.dir).await?;
            let json = serde_json::to_string_pretty(message)?;

            // Another process may share the outbox; never replace its files.
            loop {
                let id = self.next_id();
                let path = self.dir.join(format!("{}.json", id));
                let mut file = match OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&path)
                    .await
                {
                    Ok(file) => file,
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                        debug!("{} already queued, trying the next id", path.display());
                        continue;
                    }
                    Err(e) => return Err(DistributionError::Io(e)),
                };
                file.write_all(json.as_bytes()).await?;
                file.flush().await?;

                info!(
                    "📧 Queued {:?} for {} recipient(s) at {}",
                    message.subject,
                    message.to.len(),
                    path.display()
                );
                return Ok(id);
            }
        }
        .boxed()
    }
}

/// Dry-run transport: logs what would be sent.
#[derive(Default)]
pub struct LogTransport {
    sequence: AtomicU64,
}

impl Transport for LogTransport {
    fn send<'a>(
        &'a self,
        message: &'a OutgoingMessage,
    ) -> BoxFuture<'a, Result<DeliveryId, DistributionError>> {
        async move {
            let n = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
            info!(
                "[dry run] {:?} to {} ({:?} priority, {} bytes html)",
                message.subject,
                message.to.join(", "),
                message.priority,
                message.html.len()
            );
            Ok(DeliveryId(format!("dry-run-{}", n)))
        }
        .boxed()
    }
}
