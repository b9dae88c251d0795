// libnfctag/src/controller/mock.rs

use std::sync::{Arc, Mutex, Weak};

use crate::controller::command::Command;
use crate::controller::event::ControllerEvent;
use crate::controller::traits::{CommandSink, EventHandler};
use crate::types::Status;
use crate::utils::sync::lock;
use crate::{Error, Result};

/// Scripted controller behaviour: events to report for a command.
pub type Responder = Box<dyn FnMut(&Command) -> Vec<ControllerEvent> + Send>;

/// Mock controller for tests. It records submitted commands and feeds the
/// responder's events back to the attached handler before `submit`
/// returns.
#[derive(Default)]
pub struct MockController {
    sent: Mutex<Vec<Command>>,
    responder: Mutex<Option<Responder>>,
    handler: Mutex<Option<Weak<dyn EventHandler>>>,
    /// Names of commands `submit` refuses to accept.
    rejected: Mutex<Vec<&'static str>>,
}

impl std::fmt::Debug for MockController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockController")
            .field("sent", &*lock(&self.sent))
            .field("rejected", &*lock(&self.rejected))
            .finish_non_exhaustive()
    }
}

impl MockController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responder(
        responder: impl FnMut(&Command) -> Vec<ControllerEvent> + Send + 'static,
    ) -> Self {
        let mock = Self::new();
        mock.set_responder(responder);
        mock
    }

    pub fn set_responder(
        &self,
        responder: impl FnMut(&Command) -> Vec<ControllerEvent> + Send + 'static,
    ) {
        *lock(&self.responder) = Some(Box::new(responder));
    }

    /// Attach the handler events are delivered to. Only a weak reference is
    /// kept so the engine and the mock can point at each other.
    pub fn attach(&self, handler: &Arc<dyn EventHandler>) {
        *lock(&self.handler) = Some(Arc::downgrade(handler));
    }

    /// Make `submit` refuse commands with this name.
    pub fn reject(&self, command: &'static str) {
        lock(&self.rejected).push(command);
    }

    /// Deliver an unsolicited event, as the controller thread would.
    pub fn inject(&self, event: ControllerEvent) {
        let handler = lock(&self.handler).as_ref().and_then(Weak::upgrade);
        match handler {
            Some(h) => h.handle_event(event),
            None => log::warn!("mock controller has no handler for {}", event.name()),
        }
    }

    pub fn sent(&self) -> Vec<Command> {
        lock(&self.sent).clone()
    }

    /// Number of recorded commands with this name.
    pub fn count(&self, name: &str) -> usize {
        lock(&self.sent).iter().filter(|c| c.name() == name).count()
    }

    pub fn clear_sent(&self) {
        lock(&self.sent).clear();
    }
}

impl CommandSink for MockController {
    fn submit(&self, command: Command) -> Result<()> {
        let name = command.name();
        if lock(&self.rejected).contains(&name) {
            return Err(Error::Command {
                command: name,
                status: Status::Rejected,
            });
        }
        lock(&self.sent).push(command.clone());

        let events = match lock(&self.responder).as_mut() {
            Some(responder) => responder(&command),
            None => Vec::new(),
        };
        for event in events {
            self.inject(event);
        }
        Ok(())
    }
}
