// libnfctag/src/mifare.rs
//! Mifare Classic sub-protocol seam.
//!
//! Mifare Classic tags are driven through a dedicated controller
//! extension. The engine calls into a [`MifareClassic`] wherever it needs
//! the Mifare-specific path; requests complete through the usual
//! controller events.

use crate::controller::{CommandSink, MifareCommand};
use crate::{Error, Result};

/// Mifare Classic collaborator.
pub trait MifareClassic: Send + Sync {
    /// Called once per activation of a Mifare Classic tag.
    fn init(&self, sink: &dyn CommandSink) -> Result<()>;

    fn read_ndef(&self, sink: &dyn CommandSink) -> Result<()>;

    fn write_ndef(&self, sink: &dyn CommandSink, payload: &[u8]) -> Result<()>;

    fn check_ndef(&self, sink: &dyn CommandSink) -> Result<()>;

    fn format(&self, sink: &dyn CommandSink, key: &[u8; 6]) -> Result<()>;

    fn set_read_only(&self, sink: &dyn CommandSink, key: &[u8; 6]) -> Result<()>;

    fn presence_check(&self, sink: &dyn CommandSink) -> Result<()>;

    fn transceive(&self, sink: &dyn CommandSink, frame: &[u8]) -> Result<()>;

    /// Check a raw response and return the payload the caller sees.
    fn validate_response(&self, response: &[u8]) -> Result<Vec<u8>>;
}

/// Forwards every request to the controller's Mifare extension commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct MifareExtension;

impl MifareClassic for MifareExtension {
    fn init(&self, sink: &dyn CommandSink) -> Result<()> {
        sink.mifare(MifareCommand::Init)
    }

    fn read_ndef(&self, sink: &dyn CommandSink) -> Result<()> {
        sink.mifare(MifareCommand::ReadNdef)
    }

    fn write_ndef(&self, sink: &dyn CommandSink, payload: &[u8]) -> Result<()> {
        sink.mifare(MifareCommand::WriteNdef(payload.to_vec()))
    }

    fn check_ndef(&self, sink: &dyn CommandSink) -> Result<()> {
        sink.mifare(MifareCommand::DetectNdef)
    }

    fn format(&self, sink: &dyn CommandSink, key: &[u8; 6]) -> Result<()> {
        sink.mifare(MifareCommand::Format { key: *key })
    }

    fn set_read_only(&self, sink: &dyn CommandSink, key: &[u8; 6]) -> Result<()> {
        sink.mifare(MifareCommand::SetReadOnly { key: *key })
    }

    fn presence_check(&self, sink: &dyn CommandSink) -> Result<()> {
        sink.mifare(MifareCommand::PresenceCheck)
    }

    fn transceive(&self, sink: &dyn CommandSink, frame: &[u8]) -> Result<()> {
        sink.mifare(MifareCommand::Transceive(frame.to_vec()))
    }

    /// The extension appends a status byte; 0x00 means the exchange was
    /// authenticated and the data is valid.
    fn validate_response(&self, response: &[u8]) -> Result<Vec<u8>> {
        match response.split_last() {
            Some((0x00, data)) => Ok(data.to_vec()),
            Some((status, _)) => Err(Error::Validation(format!(
                "mifare status byte {:#04x}",
                status
            ))),
            None => Err(Error::Validation("empty mifare response".into())),
        }
    }
}
