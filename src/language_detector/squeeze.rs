// WHY: Repetitive boilerplate and space-heavy chunks drown out real language evidence
// Cheap single-pass filter over cleaned span text; no allocation when nothing is removed

use std::borrow::Cow;

/// Target chunk length; chunks are extended to the next space
pub const CHUNK_SIZE: usize = 48;

/// Chunks with more spaces than this share are dropped
pub const SPACES_THRESH_PERCENT: usize = 30;

/// Chunks whose bytes are predictable beyond this share are dropped
pub const PREDICT_THRESH_PERCENT: usize = 40;

const PREDICTION_TABLE_SIZE: usize = 4096;

/// Remove repetitive or mostly-space chunks from cleaned span text
/// Text no longer than one chunk is returned unchanged
pub fn cheap_squeeze(text: &str) -> Cow<'_, str> {
    if text.len() <= CHUNK_SIZE {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut predictor = BytePredictor::new();
    let mut kept: Vec<(usize, usize)> = Vec::new();
    let mut dropped_any = false;

    let mut start = 0;
    while start < bytes.len() {
        let end = chunk_end(bytes, start);
        let chunk = &bytes[start..end];

        let mut spaces = 0;
        let mut predicted = 0;
        for &byte in chunk {
            if byte == b' ' {
                spaces += 1;
            }
            if predictor.observe(byte) {
                predicted += 1;
            }
        }

        let too_sparse = spaces * 100 > chunk.len() * SPACES_THRESH_PERCENT;
        let too_predictable = predicted * 100 > chunk.len() * PREDICT_THRESH_PERCENT;
        if too_sparse || too_predictable {
            dropped_any = true;
        } else {
            kept.push((start, end));
        }
        start = end;
    }

    if !dropped_any {
        return Cow::Borrowed(text);
    }

    let mut squeezed = String::with_capacity(text.len());
    for (start, end) in kept {
        // chunk edges sit on ASCII spaces, so they are char boundaries
        squeezed.push_str(&text[start..end]);
    }
    Cow::Owned(squeezed)
}

/// First space at or after `start + CHUNK_SIZE`, or the end of the text
fn chunk_end(bytes: &[u8], start: usize) -> usize {
    let target = start + CHUNK_SIZE;
    if target >= bytes.len() {
        return bytes.len();
    }
    bytes[target..]
        .iter()
        .position(|&b| b == b' ')
        .map(|offset| target + offset)
        .unwrap_or(bytes.len())
        .max(start + 1)
}

/// Predicts each byte from a hash of the four bytes before it
struct BytePredictor {
    table: Vec<u8>,
    context: u32,
}

impl BytePredictor {
    fn new() -> Self {
        Self {
            table: vec![0; PREDICTION_TABLE_SIZE],
            context: 0,
        }
    }

    /// Returns whether `byte` was predicted, then learns it
    fn observe(&mut self, byte: u8) -> bool {
        let slot = (self.context.wrapping_mul(0x9E37_79B1) >> 20) as usize % PREDICTION_TABLE_SIZE;
        let hit = self.table[slot] == byte;
        self.table[slot] = byte;
        self.context = (self.context << 8) | u32::from(byte);
        hit
    }
}
