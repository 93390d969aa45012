use crate::constants::{CHUNK_SIZE, MAX_CHANNEL, MAX_CHUNK_COUNT, RECORD_SIZE};
use crate::error::NiosError;
use modular_bitfield::prelude::*;
use num_enum::{FromPrimitive, IntoPrimitive};
use strum_macros::Display;

/// The 4-byte acquisition command as laid out on the wire.
///
/// Transmitted MSB-first: the flag byte leads and the low chunk-count byte
/// trails. The 26-bit chunk count is split across the word, 2 high bits in
/// the flag byte and 24 low bits in the remaining three bytes.
#[bitfield(bytes = 4)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandWord {
    pub chunk_count: B26,
    pub channel: B3,
    pub data_type: B2,
    pub start_stop: bool,
}

impl CommandWord {
    /// Render the word in wire byte order (big-endian).
    pub fn to_wire(self) -> [u8; 4] {
        u32::from_le_bytes(self.into_bytes()).to_be_bytes()
    }

    /// Parse a word from wire byte order (big-endian).
    pub fn from_wire(bytes: [u8; 4]) -> Self {
        Self::from_bytes(u32::from_be_bytes(bytes).to_le_bytes())
    }
}

/// Data-type selector in the command word (2 bits).
///
/// The acquisition server only answers `Raw` today; the remaining values
/// are reserved by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum DataType {
    #[strum(to_string = "raw samples")]
    Raw = 0,

    #[strum(to_string = "reserved")]
    #[num_enum(catch_all)]
    Reserved(u8),
}

impl Default for DataType {
    fn default() -> Self {
        DataType::Raw
    }
}

/// A validated acquisition command.
///
/// Constructed once per session and never mutated; `encode` serializes it
/// to exactly [`crate::constants::COMMAND_SIZE`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandRequest {
    start_stop: bool,
    data_type: DataType,
    channel: u8,
    chunk_count: u32,
}

impl CommandRequest {
    /// Build a command, rejecting field values the wire format cannot carry.
    pub fn new(
        start_stop: bool,
        data_type: DataType,
        channel: u8,
        chunk_count: u32,
    ) -> Result<Self, NiosError> {
        if channel > MAX_CHANNEL {
            return Err(NiosError::InvalidArgument(format!(
                "channels go from 0 to {MAX_CHANNEL}, got {channel}"
            )));
        }
        let data_type_raw: u8 = data_type.into();
        if data_type_raw > 3 {
            return Err(NiosError::InvalidArgument(format!(
                "data type {data_type_raw} does not fit the 2-bit selector"
            )));
        }
        if chunk_count > MAX_CHUNK_COUNT {
            return Err(NiosError::InvalidArgument(format!(
                "chunk count {chunk_count} does not fit the 26-bit count field"
            )));
        }
        Ok(Self {
            start_stop,
            data_type,
            channel,
            chunk_count,
        })
    }

    /// Command starting a raw acquisition of `chunk_count` chunks.
    pub fn start(channel: u8, chunk_count: u32) -> Result<Self, NiosError> {
        Self::new(true, DataType::Raw, channel, chunk_count)
    }

    /// Command stopping the acquisition on `channel`.
    pub fn stop(channel: u8) -> Result<Self, NiosError> {
        Self::new(false, DataType::Raw, channel, 0)
    }

    /// Serialize to the 4 wire bytes. Pure; performs no I/O.
    pub fn encode(&self) -> [u8; 4] {
        CommandWord::new()
            .with_chunk_count(self.chunk_count)
            .with_channel(self.channel)
            .with_data_type(self.data_type.into())
            .with_start_stop(self.start_stop)
            .to_wire()
    }

    /// Recover the field values from 4 wire bytes.
    pub fn from_wire(bytes: [u8; 4]) -> Self {
        let word = CommandWord::from_wire(bytes);
        Self {
            start_stop: word.start_stop(),
            data_type: DataType::from_primitive(word.data_type()),
            channel: word.channel(),
            chunk_count: word.chunk_count(),
        }
    }

    pub fn start_stop(&self) -> bool {
        self.start_stop
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn chunk_count(&self) -> u32 {
        self.chunk_count
    }

    /// Number of sample records the server will send in response.
    pub fn record_count(&self) -> usize {
        self.chunk_count as usize * CHUNK_SIZE
    }

    /// Total response length in bytes.
    pub fn expected_response_len(&self) -> usize {
        self.record_count() * RECORD_SIZE
    }
}
