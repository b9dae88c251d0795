// libnfctag/src/constants.rs
//! Common protocol constants used across the crate

/// Maximum number of technology records reported in one discovery cycle.
pub const MAX_DISCOVERY_RECORDS: usize = 11;

/// Out-of-band status code reported when the tag is gone.
pub const STATUS_CODE_TARGET_LOST: u8 = 146;

/// Generic failure status code.
pub const STATUS_CODE_FAILED: u8 = 0xFF;

/// Default transceive timeouts in milliseconds, per technology.
pub const NFC_A_TIMEOUT_MS: u64 = 618;
pub const NFC_B_TIMEOUT_MS: u64 = 1000;
pub const ISO_DEP_TIMEOUT_MS: u64 = 618;
pub const FELICA_TIMEOUT_MS: u64 = 255;
pub const NFC_V_TIMEOUT_MS: u64 = 1000;
pub const MIFARE_CLASSIC_TIMEOUT_MS: u64 = 618;
pub const MIFARE_ULTRALIGHT_TIMEOUT_MS: u64 = 618;
pub const KOVIO_TIMEOUT_MS: u64 = 1000;
pub const UNKNOWN_TIMEOUT_MS: u64 = 1000;

/// FWI range used to derive the ISO-DEP frame waiting time.
pub const MIN_FWI: u8 = 11;
pub const MAX_FWI: u8 = 14;

/// FWT at FWI=11, in milliseconds: 2^11 * 256 * 16 / 13.56 MHz.
pub const FWT_BASE_MS: u64 = 618;

/// Type-1 header ROM byte 0 values.
pub const T1T_HR0_TOPAZ96: u8 = 0x11;
pub const T1T_HR0_TOPAZ512: u8 = 0x12;

/// Max NDEF message sizes of the known Type-1 variants.
pub const T1T_TOPAZ96_MAX_MESSAGE_SIZE: u32 = 90;
pub const T1T_TOPAZ512_MAX_MESSAGE_SIZE: u32 = 462;

/// Window within which a repeated Kovio activation is a duplicate.
pub const KOVIO_DEDUP_WINDOW_MS: u64 = 500;

/// Type-2 ACK nibble; any other single-byte response is a NACK.
pub const T2T_ACK: u8 = 0x0A;

/// Type-2 SLP_REQ frame.
pub const T2T_SLP_REQ: [u8; 2] = [0x50, 0x00];

/// ISO-DEP S(DESELECT) frame.
pub const ISO_DEP_DESELECT: [u8; 1] = [0xC2];

/// A single empty NDEF record (MB|ME|SR, TNF=empty).
pub const EMPTY_NDEF_MESSAGE: [u8; 3] = [0xD0, 0x00, 0x00];

/// Mifare Classic factory keys tried in order when formatting.
pub const MIFARE_KEY_MAD: [u8; 6] = [0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5];
pub const MIFARE_KEY_DEFAULT: [u8; 6] = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

/// Mifare Classic NDEF public key, used when locking a tag read-only.
pub const MIFARE_KEY_NDEF: [u8; 6] = [0xD3, 0xF7, 0xD3, 0xF7, 0xD3, 0xF7];

/// Felica Lite system code.
pub const FELICA_LITE_SYSTEM_CODE: u16 = 0x88B4;

/// NXP manufacturer byte (first UID byte) used to spot Ultralight tags.
pub const NXP_MANUFACTURER_ID: u8 = 0x04;

/// First NFCID1 byte of a random (dynamic) UID.
pub const RANDOM_UID_PREFIX: u8 = 0x08;

/// Max transceive lengths in bytes.
pub const MAX_TRANSCEIVE_NFC_A: usize = 253;
pub const MAX_TRANSCEIVE_NFC_B: usize = 253;
pub const MAX_TRANSCEIVE_ISO_DEP: usize = 261;
pub const MAX_TRANSCEIVE_FELICA: usize = 255;
pub const MAX_TRANSCEIVE_NFC_V: usize = 253;
pub const MAX_TRANSCEIVE_MIFARE: usize = 253;
