use std::error::Error;

/// Errors while reading an object file into memory, reported before execution starts.
#[derive(Debug, displaydoc::Display, Clone, PartialEq, Eq)]
pub enum LoadProgramError {
    /// Cannot open file {path}: {message}
    LoadFailure { path: String, message: String },
}
impl Error for LoadProgramError {}

/// Errors ending a program run before it reaches `HALT`.
#[derive(Debug, displaydoc::Display, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// Invalid trap vector {vector:#04X}, valid vectors are 0x20 to 0x27
    InvalidTrap { vector: u8 },
    /// Unimplemented opcode {opcode:#06b} at address {address:#06X}
    UnimplementedOpcode { opcode: u8, address: u16 },
    /// Unimplemented trap vector {vector:#04X}
    UnimplementedTrap { vector: u8 },
    /// Error during reading Stdin or writing program output to Stdout: {0}
    IOInputOutputError(String),
}
impl Error for ExecutionError {}

impl From<std::io::Error> for ExecutionError {
    fn from(e: std::io::Error) -> Self {
        Self::IOInputOutputError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    fn test_error_messages() {
        expect_that!(
            ExecutionError::InvalidTrap { vector: 0x29 }.to_string(),
            eq("Invalid trap vector 0x29, valid vectors are 0x20 to 0x27")
        );
        expect_that!(
            ExecutionError::UnimplementedOpcode {
                opcode: 0b1101,
                address: 0x3004
            }
            .to_string(),
            eq("Unimplemented opcode 0b1101 at address 0x3004")
        );
        expect_that!(
            LoadProgramError::LoadFailure {
                path: "missing.obj".into(),
                message: "not found".into()
            }
            .to_string(),
            eq("Cannot open file missing.obj: not found")
        );
    }
}
