// libnfctag/src/controller/dispatch.rs
//! Event delivery from a controller stack into an [`EventHandler`].

use std::io;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use log::debug;

use crate::controller::event::ControllerEvent;
use crate::controller::traits::EventHandler;

/// Start the controller event thread. It forwards every event received on
/// `events` and exits once the sending side is dropped, returning the
/// number of events delivered.
pub fn spawn_dispatcher(
    handler: Arc<dyn EventHandler>,
    events: Receiver<ControllerEvent>,
) -> io::Result<JoinHandle<usize>> {
    thread::Builder::new()
        .name("nfc-events".into())
        .spawn(move || {
            let mut delivered = 0;
            for event in events {
                #[cfg(feature = "diagnostics")]
                log::trace!("dispatch {:?}", event);
                handler.handle_event(event);
                delivered += 1;
            }
            debug!("event channel closed after {} events", delivered);
            delivered
        })
}

#[cfg(feature = "async")]
pub use self::async_source::{AsyncEventSource, pump_events};

#[cfg(feature = "async")]
mod async_source {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use crate::controller::event::ControllerEvent;
    use crate::controller::traits::EventHandler;

    /// Asynchronous stream of controller events.
    #[async_trait]
    pub trait AsyncEventSource: Send {
        /// Next event, or `None` once the source is closed.
        async fn next_event(&mut self) -> Option<ControllerEvent>;
    }

    #[async_trait]
    impl AsyncEventSource for mpsc::Receiver<ControllerEvent> {
        async fn next_event(&mut self) -> Option<ControllerEvent> {
            self.recv().await
        }
    }

    #[async_trait]
    impl AsyncEventSource for mpsc::UnboundedReceiver<ControllerEvent> {
        async fn next_event(&mut self) -> Option<ControllerEvent> {
            self.recv().await
        }
    }

    /// Drain `source` into `handler` until it closes.
    pub async fn pump_events<S>(source: &mut S, handler: Arc<dyn EventHandler>) -> usize
    where
        S: AsyncEventSource + ?Sized,
    {
        let mut delivered = 0;
        while let Some(event) = source.next_event().await {
            handler.handle_event(event);
            delivered += 1;
        }
        delivered
    }
}
