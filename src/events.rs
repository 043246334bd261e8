//! Host lifecycle events
//!
//! The host publishes a [`BindingEvent`] for every edge of a service's
//! hosted lifetime. Consumers either take a raw broadcast receiver from
//! [`Host::events`](crate::host::Host::events) or a [`Subscription`] that
//! forwards events into an owned channel and cancels itself when dropped.

use std::fmt;
use std::pin::Pin;
use std::task::{ Context, Poll };

use futures::stream::Stream;
use serde::{ Deserialize, Serialize };
use tokio::sync::{ broadcast, mpsc, oneshot };
use tracing::debug;
use uuid::Uuid;

/// Lifecycle event types published by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BindingEvent {
    /// The first binding caused the service instance to be created
    ServiceCreated {
        /// Registry name of the service
        service: String,
    },

    /// A binding reached its connected state
    Connected {
        /// Registry name of the service
        service: String,
        /// Id of the binding
        binding: Uuid,
    },

    /// A binding was released
    Disconnected {
        /// Registry name of the service
        service: String,
        /// Id of the binding
        binding: Uuid,
    },

    /// The last release tore the service instance down
    ServiceDestroyed {
        /// Registry name of the service
        service: String,
    },
}

impl BindingEvent {
    /// Registry name of the service the event concerns
    pub fn service(&self) -> &str {
        match self {
            BindingEvent::ServiceCreated { service } => service,
            BindingEvent::Connected { service, .. } => service,
            BindingEvent::Disconnected { service, .. } => service,
            BindingEvent::ServiceDestroyed { service } => service,
        }
    }
}

/// A token that cancels a subscription when dropped
pub struct CancelToken {
    cancel_tx: Option<oneshot::Sender<()>>,
    subscription_id: String,
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken").field("subscription_id", &self.subscription_id).finish()
    }
}

impl Drop for CancelToken {
    fn drop(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            if tx.send(()).is_err() {
                debug!("Failed to send cancellation signal - receiver dropped");
            }
        }
    }
}

/// A subscription to host lifecycle events
pub struct Subscription<T> {
    /// Receiver for the forwarded events
    rx: mpsc::Receiver<T>,

    /// Token that cancels the subscription when dropped
    _cancel_token: CancelToken,
}

impl<T> Subscription<T> {
    pub(crate) fn new(rx: mpsc::Receiver<T>, cancel_token: CancelToken) -> Self {
        Self {
            rx,
            _cancel_token: cancel_token,
        }
    }

    /// Get the next event, or None if the subscription has ended
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Convert the subscription into a stream
    pub fn into_stream(self) -> SubscriptionStream<T> {
        SubscriptionStream {
            rx: self.rx,
            _cancel_token: self._cancel_token,
        }
    }
}

/// A stream that yields events from a subscription
pub struct SubscriptionStream<T> {
    /// Receiver for the forwarded events
    rx: mpsc::Receiver<T>,

    /// Token that cancels the subscription when dropped
    _cancel_token: CancelToken,
}

impl<T> Stream for SubscriptionStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_recv(cx)
    }
}

/// Forward a broadcast receiver into an owned subscription.
///
/// Spawns a task that forwards until the subscription is dropped or the
/// broadcast channel closes. Lagged receivers skip ahead rather than
/// ending the subscription.
pub(crate) fn from_broadcast<T>(
    mut broadcast_rx: broadcast::Receiver<T>,
    subscription_id: String
) -> Subscription<T>
    where T: Clone + Send + 'static
{
    // Convert broadcast to mpsc channel
    let (tx, rx) = mpsc::channel(100);

    // Create a cancel token
    let (cancel_tx, mut cancel_rx) = oneshot::channel();

    // Spawn a task that forwards from broadcast to mpsc
    tokio::spawn(async move {
        loop {
            tokio::select! {
                // Wait for cancellation
                _ = &mut cancel_rx => break,

                // Forward events
                result = broadcast_rx.recv() => {
                    match result {
                        Ok(item) => {
                            if tx.send(item).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                        Err(broadcast::error::RecvError::Lagged(_)) => {
                            // Just continue if we lagged
                            continue;
                        }
                    }
                }
            }
        }
    });

    // Create the subscription
    Subscription::new(rx, CancelToken {
        cancel_tx: Some(cancel_tx),
        subscription_id,
    })
}
