// Protocol constants for the NIOS acquisition server

/// Sample records per chunk, the granularity of the command's count field
pub const CHUNK_SIZE: usize = 350;

/// Size of one sample record on the wire (4 bytes, big-endian)
pub const RECORD_SIZE: usize = 4;

/// Size of the fixed command word (4 bytes)
pub const COMMAND_SIZE: usize = 4;

/// Largest value the 26-bit chunk-count field can carry
pub const MAX_CHUNK_COUNT: u32 = 0x03FF_FFFF;

/// Highest addressable channel (channels are 0-indexed on the wire)
pub const MAX_CHANNEL: u8 = 7;

/// The rolling sequence counter wraps at 64
pub const COUNTER_MODULUS: u8 = 64;

/// Dropped-packet notices beyond this count are suppressed
pub const LOSS_NOTICE_LIMIT: u32 = 5;

/// Nominal acquisition period per sample; the test bench samples at 25 kHz
pub const SAMPLE_PERIOD_US: u64 = 40;

/// Number of chunks needed to cover at least `records` sample records.
pub fn chunks_for_records(records: usize) -> u32 {
    records.div_ceil(CHUNK_SIZE) as u32
}
