//! WASM instruction emission core.
//!
//! This crate is the binary-encoding layer of a compiler backend that lowers
//! a small set of operations (push constant, load, store, add, and, shift,
//! call) into a byte-exact WASM bytecode stream. The front-end that decides
//! which operations to emit, and the module/section framing around the
//! produced bytes, live elsewhere; this crate owns only the encodings and
//! the per-instruction byte layout, which a downstream runtime will silently
//! misinterpret rather than reject if they diverge by a single bit.
//!
//! ## Modules
//!
//! - [`leb128`]: unsigned/signed LEB128 codec and the fixed-width two-byte
//!   encoder for patchable fields
//! - [`opcode`]: typed opcode table and memory-immediate configuration
//! - [`stream`]: append-only code stream ([`CodeStream`]) behind the
//!   injected [`CodeSink`] seam
//! - [`emit`]: [`InstructionEmitter`], one method per instruction
//!
//! ## Example
//!
//! ```
//! use wasmgen::{CodeStream, InstructionEmitter};
//!
//! let mut stream = CodeStream::new();
//! let mut emitter = InstructionEmitter::new(&mut stream);
//! emitter.call_with_arg(2, 40);
//!
//! // i32.const 40, call 2
//! assert_eq!(stream.code(), [0x41, 0x28, 0x10, 0x02]);
//! ```

pub mod emit;
pub mod leb128;
pub mod opcode;
pub mod stream;

pub use emit::InstructionEmitter;
pub use leb128::{
    EncodeError, FIXED_ULEB16_LEN, FIXED_ULEB16_MAX, MAX_LEN_U32, write_fixed_uleb16,
    write_sleb128, write_uleb128,
};
pub use opcode::{MemImmediates, OpCode};
pub use stream::{CodeSink, CodeStream, PatchLabel};
