//! Common test utilities and shared imports

#[allow(unused_imports)]
pub use nios_lib::command::{CommandRequest, CommandWord, DataType};
#[allow(unused_imports)]
pub use nios_lib::constants::{
    CHUNK_SIZE, COMMAND_SIZE, LOSS_NOTICE_LIMIT, MAX_CHANNEL, MAX_CHUNK_COUNT, RECORD_SIZE,
    chunks_for_records,
};
#[allow(unused_imports)]
pub use nios_lib::decoder::{Acquisition, DecodeSession, decode_stream};
#[allow(unused_imports)]
pub use nios_lib::error::NiosError;
#[allow(unused_imports)]
pub use nios_lib::sample::RawSampleRecord;

/// Route decoder diagnostics to the test output when RUST_LOG asks for them.
#[allow(dead_code)]
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a raw wire word from a 22-bit payload and a 6-bit counter.
///
/// Bit 21 is shared between the payload sign bit and the counter's low
/// bit, so the two fields are OR-ed together the same way the device packs
/// them. Callers combining a negative payload with an even counter get the
/// overlap, exactly as a real stream would.
#[allow(dead_code)]
pub fn make_word(payload22: u32, counter: u8) -> u32 {
    (payload22 & 0x003F_FFFF) | ((counter as u32 & 0x3F) << 21)
}

/// Serialize a sequence of words into a big-endian byte stream.
#[allow(dead_code)]
pub fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

/// A counter-contiguous stream of `n` zero-payload records.
#[allow(dead_code)]
pub fn contiguous_stream(n: usize) -> Vec<u8> {
    let words: Vec<u32> = (0..n).map(|i| make_word(0, (i % 64) as u8)).collect();
    words_to_bytes(&words)
}

/// A stream carrying exactly the given counters, zero payload.
#[allow(dead_code)]
pub fn stream_with_counters(counters: &[u8]) -> Vec<u8> {
    let words: Vec<u32> = counters.iter().map(|&c| make_word(0, c)).collect();
    words_to_bytes(&words)
}
