//! Instruction emitter for the WASM backend.
//!
//! [`InstructionEmitter`] writes one complete instruction per call — the
//! opcode byte followed by its immediates — to an injected [`CodeSink`].
//! Instructions that need an operand value push it with the constant-push
//! primitive first; the caller composes emitter calls in the order operands
//! must appear on the target's evaluation stack.
//!
//! # Example
//!
//! ```
//! use wasmgen::emit::InstructionEmitter;
//! use wasmgen::stream::CodeStream;
//!
//! let mut stream = CodeStream::new();
//! let mut emitter = InstructionEmitter::new(&mut stream);
//!
//! // result_addr <- *value_addr + 1
//! emitter.push_u32(0x100); // store address first (stack discipline)
//! emitter.load_i32(0x200);
//! emitter.push_i32(1);
//! emitter.add_i32();
//! emitter.store_i32();
//!
//! assert!(!stream.is_empty());
//! ```

use crate::opcode::{MemImmediates, OpCode};
use crate::stream::CodeSink;

/// Emits WASM instructions to a code sink.
///
/// Each method writes one self-consistent opcode + immediates sequence.
/// The emitter is stateless apart from the monotonically growing sink;
/// operand-stack discipline (pushing enough operands before `add_i32` and
/// friends) is the caller's responsibility.
pub struct InstructionEmitter<'a, S: CodeSink> {
    /// Destination stream for one compilation unit
    sink: &'a mut S,

    /// Memory immediates shared by every load/store
    mem: MemImmediates,
}

impl<'a, S: CodeSink> InstructionEmitter<'a, S> {
    /// Create an emitter with the default memory-immediate configuration.
    pub fn new(sink: &'a mut S) -> Self {
        Self::with_mem_immediates(sink, MemImmediates::default())
    }

    /// Create an emitter with an explicit memory-immediate configuration.
    pub fn with_mem_immediates(sink: &'a mut S, mem: MemImmediates) -> Self {
        Self { sink, mem }
    }

    /// The memory-immediate configuration used by this emitter.
    pub fn mem_immediates(&self) -> MemImmediates {
        self.mem
    }

    fn op(&mut self, op: OpCode) {
        self.sink.write_byte(op as u8);
    }

    /// Alignment byte then offset byte, in that order, after every
    /// memory-access opcode.
    fn mem_args(&mut self) {
        self.sink.write_byte(self.mem.alignment);
        self.sink.write_byte(self.mem.offset);
    }

    // ==========================================================================
    // Constants
    // ==========================================================================

    /// Push a constant i32.
    pub fn push_i32(&mut self, value: i32) {
        self.op(OpCode::I32Const);
        self.sink.write_sleb128(value);
    }

    /// Push a constant u32.
    ///
    /// Same opcode as [`push_i32`](Self::push_i32); addresses and other
    /// inherently unsigned values take the unsigned encoding.
    pub fn push_u32(&mut self, value: u32) {
        self.op(OpCode::I32Const);
        self.sink.write_uleb128(value);
    }

    // ==========================================================================
    // Memory Access
    // ==========================================================================

    /// Load a u16 from `addr`, zero-extended to i32.
    ///
    /// Pushes the address itself, so nothing need be on the stack.
    pub fn load_u16(&mut self, addr: u32) {
        self.push_u32(addr);
        self.op(OpCode::I32Load16U);
        self.mem_args();
    }

    /// Load an i32 from `addr`.
    ///
    /// Pushes the address itself, so nothing need be on the stack.
    pub fn load_i32(&mut self, addr: u32) {
        self.push_u32(addr);
        self.op(OpCode::I32Load);
        self.mem_args();
    }

    /// Store an i32.
    ///
    /// Expects address then value already pushed, in that order.
    pub fn store_i32(&mut self) {
        self.op(OpCode::I32Store);
        self.mem_args();
    }

    // ==========================================================================
    // Arithmetic and Bitwise
    // ==========================================================================

    /// Add the top two i32 values.
    pub fn add_i32(&mut self) {
        self.op(OpCode::I32Add);
    }

    /// Bitwise AND of the top two i32 values.
    pub fn and_i32(&mut self) {
        self.op(OpCode::I32And);
    }

    /// Shift the second i32 left by the top i32.
    pub fn shl_i32(&mut self) {
        self.op(OpCode::I32Shl);
    }

    // ==========================================================================
    // Function Calls
    // ==========================================================================

    /// Call the function at `fn_idx`.
    ///
    /// The index is written as a single byte, which for indices below 128
    /// coincides with its ULEB128 encoding; the `u8` parameter keeps that
    /// constraint visible at the call site.
    pub fn call(&mut self, fn_idx: u8) {
        self.op(OpCode::Call);
        self.sink.write_byte(fn_idx);
    }

    /// Push `arg0` and call the function at `fn_idx`.
    pub fn call_with_arg(&mut self, fn_idx: u8, arg0: i32) {
        self.push_i32(arg0);
        self.call(fn_idx);
    }
}
