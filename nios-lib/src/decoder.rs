use std::time::Duration;

use bytes::Buf;
use tracing::warn;

use crate::constants::{COUNTER_MODULUS, LOSS_NOTICE_LIMIT, RECORD_SIZE, SAMPLE_PERIOD_US};
use crate::error::NiosError;
use crate::sample::RawSampleRecord;

/// Per-acquisition decode state.
///
/// Holds the next expected sequence counter and the number of
/// discontinuities seen so far. A fresh session expects counter 0, the
/// value the server starts every acquisition with.
#[derive(Debug, Default)]
pub struct DecodeSession {
    expected_counter: u8,
    loss_events: u32,
}

impl DecodeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one record's sequence counter.
    ///
    /// A mismatch is counted and logged, never fatal: the session resyncs
    /// to the observed counter and keeps decoding. Notices stop after
    /// [`LOSS_NOTICE_LIMIT`] events.
    pub fn accept(&mut self, record: RawSampleRecord) {
        let counter = record.counter();
        if counter != self.expected_counter {
            self.loss_events += 1;
            if self.loss_events <= LOSS_NOTICE_LIMIT {
                warn!(
                    "Dropping packets: payload counter is {}, expected payload counter is {}",
                    counter, self.expected_counter
                );
            }
            if self.loss_events == LOSS_NOTICE_LIMIT {
                warn!("Further dropped packet notices will be suppressed.");
            }
            self.expected_counter = counter;
        }
        // Next expected value after the counter just seen; rolls over at 64.
        self.expected_counter = (self.expected_counter + 1) % COUNTER_MODULUS;
    }

    pub fn loss_events(&self) -> u32 {
        self.loss_events
    }

    pub fn expected_counter(&self) -> u8 {
        self.expected_counter
    }
}

/// The decoded result of one acquisition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquisition {
    samples: Vec<i32>,
    loss_events: u32,
}

impl Acquisition {
    /// Decoded samples in stream order.
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// Number of sequence-counter discontinuities seen during decode.
    pub fn loss_events(&self) -> u32 {
        self.loss_events
    }

    /// True when no data was lost between the device and this client.
    pub fn is_contiguous(&self) -> bool {
        self.loss_events == 0
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Wall-clock span the samples cover at the bench's 25 kHz sample rate.
    pub fn duration_covered(&self) -> Duration {
        Duration::from_micros(self.samples.len() as u64 * SAMPLE_PERIOD_US)
    }

    /// Flat hex rendering of the sample sequence: 8 hex characters per
    /// sample, big-endian byte order, no separators.
    pub fn to_hex(&self) -> String {
        let mut raw = Vec::with_capacity(self.samples.len() * RECORD_SIZE);
        for sample in &self.samples {
            raw.extend_from_slice(&sample.to_be_bytes());
        }
        hex::encode(raw)
    }
}

/// Decode a complete response payload of exactly `record_count` records.
///
/// The buffer length must match `record_count * RECORD_SIZE`; anything else
/// is a precondition violation and no partial-record decoding is attempted.
pub fn decode_stream(bytes: &[u8], record_count: usize) -> Result<Acquisition, NiosError> {
    let expected = record_count * RECORD_SIZE;
    if bytes.len() != expected {
        return Err(NiosError::InvalidInput {
            expected,
            actual: bytes.len(),
        });
    }

    let mut session = DecodeSession::new();
    let mut samples = Vec::with_capacity(record_count);
    let mut cursor = bytes;
    for _ in 0..record_count {
        let record = RawSampleRecord::from_word(cursor.get_u32());
        session.accept(record);
        samples.push(record.value());
    }

    let loss_events = session.loss_events();
    if loss_events > LOSS_NOTICE_LIMIT {
        warn!("{} dropped packet events were counted; further notices were suppressed.", loss_events);
    }

    Ok(Acquisition {
        samples,
        loss_events,
    })
}
