//! # LC-3 Virtual Machine.
//!
//! `lc3-vm` executes machine code for a 16-bit LC-3 style CPU loaded from a raw,
//! header-less object file. Usage starts with loading a program via
//! `emulator::Emulator::load_file` (or `load_bytes`/`load_words`) and then running it
//! until `HALT` with `emulator::Emulator::execute`.
//!
//!  # Example
//! ```
//! use lc3_vm::emulator::Emulator;
//! let mut emu = Emulator::new();
//! // read two numbers, add them, print the sum, halt
//! emu.load_words(&[0xF026, 0x1220, 0xF026, 0x1240, 0x1060, 0xF027, 0xF025]);
//! let mut output = Vec::new();
//! emu.execute_with(&mut "3\n4\n".as_bytes(), &mut output).unwrap();
//! assert_eq!(output, b"7\n");
//! ```
//! # Errors
//! - Object file missing or unreadable
//! - Trap vector outside of the trap table
//! - Unimplemented opcode or trap, only in strict mode

pub mod emulator;
pub mod errors;
pub mod hardware;
pub mod numbers;
pub(crate) mod terminal;
