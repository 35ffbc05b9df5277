//! Default toolchain: `wat` for encoding, `wasmparser` for validation.

use super::Toolchain;
use crate::error::CompileError;
use tracing::debug;
use wasmparser::{Validator, WasmFeatures};

/// Encodes text with the `wat` crate and optionally validates the result.
#[derive(Debug, Clone, Copy)]
pub struct WatToolchain {
    validate: bool,
}

impl WatToolchain {
    pub fn new(validate: bool) -> Self {
        Self { validate }
    }

    /// Features accepted during validation. Struct types need GC.
    fn features() -> WasmFeatures {
        WasmFeatures::default()
            | WasmFeatures::REFERENCE_TYPES
            | WasmFeatures::FUNCTION_REFERENCES
            | WasmFeatures::GC
    }
}

impl Default for WatToolchain {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Toolchain for WatToolchain {
    fn assemble(&self, wat: &str) -> Result<Vec<u8>, CompileError> {
        let bytes = wat::parse_str(wat).map_err(|e| CompileError::Toolchain(e.to_string()))?;

        if self.validate {
            Validator::new_with_features(Self::features())
                .validate_all(&bytes)
                .map_err(|e| CompileError::Toolchain(e.to_string()))?;
        }

        debug!(bytes = bytes.len(), validated = self.validate, "encoded module");
        Ok(bytes)
    }
}
