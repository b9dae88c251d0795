// libnfctag/src/controller/mod.rs
//! The seam between the engine and the NFC controller stack: commands
//! going down, already-decoded events coming back up.

pub mod command;
pub mod dispatch;
pub mod event;
pub mod mock;
pub mod traits;

pub use command::{Command, MifareCommand};
pub use dispatch::spawn_dispatcher;
#[cfg(feature = "async")]
pub use dispatch::{AsyncEventSource, pump_events};
pub use event::ControllerEvent;
pub use mock::MockController;
pub use traits::{CommandSink, EventHandler};
