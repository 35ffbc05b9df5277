//! IR toolchain boundary.
//!
//! The [`Toolchain`] trait abstracts whatever turns WebAssembly text into a
//! binary module. The call is synchronous and atomic: it either returns the
//! complete binary or fails with the toolchain's own message.

mod encoder;
pub use encoder::WatToolchain;

use crate::error::CompileError;

/// Validates and encodes WebAssembly text into a binary module.
pub trait Toolchain {
    /// Encode `wat` to a `.wasm` binary.
    ///
    /// Failures are reported as [`CompileError::Toolchain`] carrying the
    /// toolchain's message verbatim.
    fn assemble(&self, wat: &str) -> Result<Vec<u8>, CompileError>;
}
