//! Outbound dispatcher: a queue-draining loop in front of a link.
//!
//! Game code enqueues encoded lines and moves on; one task per link
//! owns the actual writes. The queue ends with an explicit [`Fin`]
//! marker, after which the link is closed and the loop stops — so
//! shutdown is an ordinary message, ordered after every line that
//! still matters.
//!
//! Spawn it yourself: `tokio::spawn(run_dispatcher(link, queue))`.
//! Spawning at the call site keeps the link type concrete, which is
//! what lets the runtime move the task across threads.
//!
//! [`Fin`]: Outbound::Fin

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::Link;

/// One item in a dispatcher's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// An encoded command line to deliver.
    Line(String),
    /// Terminal marker: close the link and stop.
    Fin,
}

/// Drains `queue` onto `link` until [`Outbound::Fin`] arrives, the
/// queue's senders all drop, or a send fails.
pub async fn run_dispatcher<L: Link>(
    link: Arc<L>,
    mut queue: mpsc::Receiver<Outbound>,
) {
    while let Some(item) = queue.recv().await {
        match item {
            Outbound::Line(line) => {
                if let Err(error) = link.send_line(&line).await {
                    tracing::warn!(
                        peer = %link.id(),
                        %error,
                        "send failed, dispatcher stopping"
                    );
                    return;
                }
            }
            Outbound::Fin => {
                if let Err(error) = link.close().await {
                    tracing::debug!(
                        peer = %link.id(),
                        %error,
                        "close on fin failed"
                    );
                }
                break;
            }
        }
    }
    tracing::debug!(peer = %link.id(), "dispatcher stopped");
}
