//! MSB-first bit packing for JPEG entropy-coded data.

/// A bit writer that packs variable-length codes MSB first and applies
/// JPEG byte stuffing (`0xFF` is always followed by `0x00`).
#[derive(Debug)]
pub struct BitWriter {
    buffer: Vec<u8>,
    acc: u32,
    bit_count: u8,
    stuffed: usize,
}

impl BitWriter {
    /// Create a new bit writer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new bit writer with specified byte capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(Vec::with_capacity(capacity))
    }

    /// Append to an existing buffer, keeping its contents.
    pub fn from_vec(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            acc: 0,
            bit_count: 0,
            stuffed: 0,
        }
    }

    /// Write the low `length` bits of `code`, most significant first.
    ///
    /// # Arguments
    /// * `code` - The value to write (bits above `length` are ignored)
    /// * `length` - Number of bits to write (0-16)
    #[inline]
    pub fn write_bits(&mut self, code: u32, length: u8) {
        debug_assert!(length <= 16);
        if length == 0 {
            return;
        }

        let mask = (1u32 << length) - 1;
        // bit_count < 8 between calls, so at most 23 live bits.
        self.acc = (self.acc << length) | (code & mask);
        self.bit_count += length;

        while self.bit_count >= 8 {
            self.bit_count -= 8;
            let byte = (self.acc >> self.bit_count) as u8;
            self.push_byte(byte);
        }
        self.acc &= (1u32 << self.bit_count) - 1;
    }

    #[inline]
    fn push_byte(&mut self, byte: u8) {
        self.buffer.push(byte);
        if byte == 0xFF {
            self.buffer.push(0x00);
            self.stuffed += 1;
        }
    }

    /// Pads the partial byte with 1s and emits it. No-op when byte-aligned.
    pub fn flush(&mut self) {
        if self.bit_count > 0 {
            let pad = 8 - self.bit_count;
            self.write_bits((1u32 << pad) - 1, pad);
        }
    }

    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.buffer
    }

    /// Returns length in bytes (not counting partial byte).
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.bit_count == 0
    }

    /// Number of bits waiting in the accumulator.
    pub fn pending_bits(&self) -> u8 {
        self.bit_count
    }

    /// Number of `0x00` bytes inserted after `0xFF`.
    pub fn stuffed_bytes(&self) -> usize {
        self.stuffed
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
