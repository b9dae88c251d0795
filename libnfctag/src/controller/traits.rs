// libnfctag/src/controller/traits.rs

use crate::Result;
use crate::controller::command::{Command, MifareCommand};
use crate::controller::event::ControllerEvent;
use crate::types::{DiscoveryHandle, PresenceCheckAlgorithm, ProtocolKind, RfInterface};

/// Command sink abstracts the controller stack away from the engine.
///
/// `submit` only reports whether the command was accepted; the outcome is
/// delivered later through the [`EventHandler`].
pub trait CommandSink: Send + Sync {
    /// Hand one command to the controller stack
    fn submit(&self, command: Command) -> Result<()>;

    fn start_discovery(&self) -> Result<()> {
        self.submit(Command::StartDiscovery)
    }

    fn stop_discovery(&self) -> Result<()> {
        self.submit(Command::StopDiscovery)
    }

    fn select(
        &self,
        handle: DiscoveryHandle,
        protocol: ProtocolKind,
        interface: RfInterface,
    ) -> Result<()> {
        self.submit(Command::Select {
            handle,
            protocol,
            interface,
        })
    }

    fn deactivate(&self, to_sleep: bool) -> Result<()> {
        self.submit(Command::Deactivate { to_sleep })
    }

    fn read_ndef(&self) -> Result<()> {
        self.submit(Command::ReadNdef)
    }

    fn write_ndef(&self, payload: &[u8]) -> Result<()> {
        self.submit(Command::WriteNdef(payload.to_vec()))
    }

    fn detect_ndef(&self) -> Result<()> {
        self.submit(Command::DetectNdef)
    }

    fn format(&self) -> Result<()> {
        self.submit(Command::Format)
    }

    fn set_read_only(&self, hard: bool) -> Result<()> {
        self.submit(Command::SetReadOnly { hard })
    }

    fn presence_check(&self, algorithm: PresenceCheckAlgorithm) -> Result<()> {
        self.submit(Command::PresenceCheck(algorithm))
    }

    fn send_raw_frame(&self, frame: &[u8]) -> Result<()> {
        self.submit(Command::SendRawFrame(frame.to_vec()))
    }

    fn mifare(&self, command: MifareCommand) -> Result<()> {
        self.submit(Command::Mifare(command))
    }
}

/// Receiver of controller notifications. Called from the controller
/// event thread; implementations must not block on their own commands.
pub trait EventHandler: Send + Sync {
    fn handle_event(&self, event: ControllerEvent);
}
