//! WASM operation codes emitted by this backend.
//!
//! Each opcode is a single byte taken from the WebAssembly binary format,
//! with any immediates following inline. Only the instructions the emitter
//! actually produces are listed; this is not a full instruction set.

/// Operation codes for the emitted instructions.
///
/// The target is a stack machine: operands are pushed with `I32Const` (or
/// produced by earlier instructions) and consumed from the top of the
/// operand stack. Discriminants are the WASM binary opcode bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Call function by index.
    /// Immediate: function index (ULEB128)
    Call = 0x10,
    /// Load i32 from linear memory.
    /// Immediates: alignment, offset
    I32Load = 0x28,
    /// Load u16 from linear memory, zero-extended to i32.
    /// Immediates: alignment, offset
    I32Load16U = 0x2F,
    /// Store i32 to linear memory.
    /// Immediates: alignment, offset
    I32Store = 0x36,
    /// Push constant i32.
    /// Immediate: value (LEB128, signed or unsigned interpretation)
    I32Const = 0x41,
    /// Add two i32 values.
    I32Add = 0x6A,
    /// Bitwise AND of two i32 values.
    I32And = 0x71,
    /// Shift i32 left by i32 bit count.
    I32Shl = 0x74,
}

impl OpCode {
    /// Convert from a raw opcode byte, returning None for bytes this
    /// backend does not emit.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x10 => Some(OpCode::Call),
            0x28 => Some(OpCode::I32Load),
            0x2F => Some(OpCode::I32Load16U),
            0x36 => Some(OpCode::I32Store),
            0x41 => Some(OpCode::I32Const),
            0x6A => Some(OpCode::I32Add),
            0x71 => Some(OpCode::I32And),
            0x74 => Some(OpCode::I32Shl),
            _ => None,
        }
    }

    /// Human-readable mnemonic for diagnostics and test output.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Call => "call",
            OpCode::I32Load => "i32.load",
            OpCode::I32Load16U => "i32.load16_u",
            OpCode::I32Store => "i32.store",
            OpCode::I32Const => "i32.const",
            OpCode::I32Add => "i32.add",
            OpCode::I32And => "i32.and",
            OpCode::I32Shl => "i32.shl",
        }
    }
}

/// Memory-immediate configuration shared by every memory access.
///
/// The WASM binary format follows each load/store opcode with an alignment
/// immediate and a static offset immediate, in that order. This backend uses
/// one fixed configuration for all 16-bit and 32-bit accesses rather than
/// computing immediates per call, so the pair is passed to the emitter once
/// at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemImmediates {
    /// Alignment hint as log2 of the access alignment. Zero (byte
    /// alignment) is valid for every access width.
    pub alignment: u8,
    /// Static offset added to the address operand.
    pub offset: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_round_trips_known_opcodes() {
        for op in [
            OpCode::Call,
            OpCode::I32Load,
            OpCode::I32Load16U,
            OpCode::I32Store,
            OpCode::I32Const,
            OpCode::I32Add,
            OpCode::I32And,
            OpCode::I32Shl,
        ] {
            assert_eq!(OpCode::from_u8(op as u8), Some(op));
        }
    }

    #[test]
    fn from_u8_rejects_unknown_bytes() {
        assert_eq!(OpCode::from_u8(0x00), None);
        assert_eq!(OpCode::from_u8(0x0B), None); // end: framing, not emitted here
        assert_eq!(OpCode::from_u8(0xFF), None);
    }

    #[test]
    fn opcode_bytes_match_wasm_binary_format() {
        assert_eq!(OpCode::I32Const as u8, 0x41);
        assert_eq!(OpCode::I32Load as u8, 0x28);
        assert_eq!(OpCode::I32Load16U as u8, 0x2F);
        assert_eq!(OpCode::I32Store as u8, 0x36);
        assert_eq!(OpCode::Call as u8, 0x10);
    }

    #[test]
    fn default_mem_immediates_are_byte_aligned_zero_offset() {
        let mem = MemImmediates::default();
        assert_eq!(mem.alignment, 0);
        assert_eq!(mem.offset, 0);
    }
}
