//! Append-only code stream for one compilation unit.
//!
//! The emitter writes through the [`CodeSink`] trait rather than a concrete
//! buffer, so one stream instance is injected per compiled function or
//! module body and nothing is shared through globals. [`CodeStream`] is the
//! standard growable implementation; its LEB writers route through the
//! codec in [`crate::leb128`] so there is exactly one copy of the bit logic.

use crate::leb128::{self, EncodeError, FIXED_ULEB16_LEN, MAX_LEN_U32};

/// Destination for emitted instruction bytes.
///
/// Append-only: each call increases the stream length by the byte count of
/// the respective encoding. Growable implementations cannot fail.
pub trait CodeSink {
    /// Append a single raw byte.
    fn write_byte(&mut self, byte: u8);

    /// Append an unsigned LEB128 encoding of `value`.
    fn write_uleb128(&mut self, value: u32);

    /// Append a signed LEB128 encoding of `value`.
    fn write_sleb128(&mut self, value: i32);
}

/// Offset of a reserved fixed-width field, to be patched later.
///
/// Returned by [`CodeStream::reserve_fixed_uleb16`] and consumed by
/// [`CodeStream::patch_fixed_uleb16`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchLabel(pub usize);

/// Growable byte buffer accumulating the bytecode for one compilation unit.
///
/// Single-writer, monotonically growing. Create one per compiled
/// function/module body and finalize it with [`CodeStream::into_bytes`].
#[derive(Debug, Clone, Default)]
pub struct CodeStream {
    code: Vec<u8>,
}

impl CodeStream {
    /// Create a new empty code stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a code stream with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            code: Vec::with_capacity(capacity),
        }
    }

    /// Get the accumulated bytes.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Consume the stream, returning the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.code
    }

    /// Get the length of the accumulated bytecode.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the stream is empty.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Get the current write offset (for later patching).
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Reserve a two-byte fixed-width field at the current offset.
    ///
    /// Writes a placeholder zero and returns a label for
    /// [`CodeStream::patch_fixed_uleb16`]. Used for forward references
    /// whose true value (a size or offset) is only known once later bytes
    /// have been emitted.
    pub fn reserve_fixed_uleb16(&mut self) -> PatchLabel {
        let label = PatchLabel(self.code.len());
        self.code.extend_from_slice(&[0; FIXED_ULEB16_LEN]);
        label
    }

    /// Patch a previously reserved fixed-width field with its true value.
    ///
    /// Fails with [`EncodeError::ValueOutOfRange`] for values above 16383
    /// and [`EncodeError::BufferOverflow`] if the label does not point at
    /// two reserved bytes inside the stream.
    pub fn patch_fixed_uleb16(&mut self, label: PatchLabel, value: u16) -> Result<(), EncodeError> {
        leb128::write_fixed_uleb16(&mut self.code, label.0, value)
    }
}

impl CodeSink for CodeStream {
    fn write_byte(&mut self, byte: u8) {
        self.code.push(byte);
    }

    fn write_uleb128(&mut self, value: u32) {
        let mut scratch = [0u8; MAX_LEN_U32];
        let len = leb128::uleb128_into(&mut scratch, value);
        self.code.extend_from_slice(&scratch[..len]);
    }

    fn write_sleb128(&mut self, value: i32) {
        let mut scratch = [0u8; MAX_LEN_U32];
        let len = leb128::sleb128_into(&mut scratch, value);
        self.code.extend_from_slice(&scratch[..len]);
    }
}
