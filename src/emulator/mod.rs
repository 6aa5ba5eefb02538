//! The machine: owned memory and registers plus the fetch, decode, execute loop.
pub mod dump;
pub mod instruction;
pub mod loader;
pub mod opcodes;
#[cfg(test)]
pub(crate) mod test_helpers;
pub mod trap_routines;

use crate::emulator::instruction::{Instruction, InstructionWord};
use crate::emulator::loader::Endianness;
use crate::errors::{ExecutionError, LoadProgramError};
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use std::io;
use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use std::path::Path;
use tracing::{debug, trace};

/// Conventional load address of user programs.
pub const PROGRAM_SECTION_START: u16 = 0x3000;

/// Settings fixed for the lifetime of one [`Emulator`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EmulatorOptions {
    /// Base address programs are loaded to.
    pub origin: u16,
    /// Added to `origin` to get the load and start address.
    pub offset: u16,
    /// Byte order of object files.
    pub endianness: Endianness,
    /// Fail on `RTI`, the reserved opcode and the reserved trap instead of skipping them.
    pub strict: bool,
    /// Switch the terminal to raw mode while reading a character.
    pub raw_terminal: bool,
}

impl Default for EmulatorOptions {
    fn default() -> Self {
        Self {
            origin: PROGRAM_SECTION_START,
            offset: 0,
            endianness: Endianness::default(),
            strict: false,
            raw_terminal: false,
        }
    }
}

impl EmulatorOptions {
    /// First address of a loaded program, which is also where execution starts.
    #[must_use]
    pub const fn start_address(&self) -> u16 {
        self.origin.wrapping_add(self.offset)
    }
}

/// Whether the machine may still fetch instructions. Only `HALT` moves it to `Halted`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Halted,
}

/// Outcome of loading a program.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub start_address: u16,
    /// Words placed in memory.
    pub loaded: usize,
    /// Words dropped because they did not fit below the end of memory.
    pub truncated: usize,
}

/// The public facing emulator used to run LC-3 programs.
#[derive(Debug)]
pub struct Emulator {
    memory: Memory,
    registers: Registers,
    state: RunState,
    options: EmulatorOptions,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates an emulator with default options and loads the object file at `path`.
///
/// # Errors
/// - See [`Emulator::load_file`]
pub fn from_program(path: impl AsRef<Path>) -> Result<Emulator, LoadProgramError> {
    let mut emu = Emulator::new();
    emu.load_file(path)?;
    Ok(emu)
}

impl Emulator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(EmulatorOptions::default())
    }

    #[must_use]
    pub fn with_options(options: EmulatorOptions) -> Self {
        let mut registers = Registers::new();
        registers.set_pc(options.start_address());
        Self {
            memory: Memory::new(),
            registers,
            state: RunState::Running,
            options,
        }
    }

    /// Loads the object file at `path` to the start address.
    ///
    /// # Errors
    /// - `LoadFailure` if the file is missing or unreadable
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, LoadProgramError> {
        let path = path.as_ref();
        let words = loader::read_object_file(path, self.options.endianness)?;
        debug!("read {} words from {}", words.len(), path.display());
        Ok(self.load_words(&words))
    }

    /// Loads the raw object file contents `bytes` to the start address.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> LoadReport {
        self.load_words(&loader::words_from_bytes(bytes, self.options.endianness))
    }

    /// Loads `words` to the start address, anything beyond the end of memory is dropped.
    pub fn load_words(&mut self, words: &[u16]) -> LoadReport {
        let start_address = self.options.start_address();
        let loaded = self.memory.load_words(start_address, words);
        let report = LoadReport {
            start_address,
            loaded,
            truncated: words.len() - loaded,
        };
        debug!(?report, "program loaded");
        report
    }

    pub const fn registers(&self) -> &Registers {
        &self.registers
    }
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }
    pub const fn state(&self) -> RunState {
        self.state
    }
    pub const fn options(&self) -> &EmulatorOptions {
        &self.options
    }

    /// Fetches the instruction at PC, advances PC and executes the instruction.
    ///
    /// Does nothing once halted.
    ///
    /// # Errors
    /// - `InvalidTrap` for a trap vector outside the table
    /// - `UnimplementedOpcode` / `UnimplementedTrap` in strict mode
    /// - `IOInputOutputError` if reading input or writing output fails
    pub fn step(
        &mut self,
        stdin: &mut impl BufRead,
        stdout: &mut impl Write,
    ) -> Result<RunState, ExecutionError> {
        if self.state == RunState::Halted {
            return Ok(self.state);
        }
        let address = self.registers.pc();
        let word = InstructionWord::from(self.memory[address]);
        self.registers.increment_pc();
        let instruction = Instruction::decode(word);
        trace!("{address:#06X}: {word:?} {instruction:?}");
        if let ControlFlow::Break(res) =
            self.execute_instruction(instruction, word, address, stdin, stdout)
        {
            res?;
            self.state = RunState::Halted;
        }
        Ok(self.state)
    }

    fn execute_instruction(
        &mut self,
        instruction: Instruction,
        word: InstructionWord,
        address: u16,
        stdin: &mut impl BufRead,
        stdout: &mut impl Write,
    ) -> ControlFlow<Result<(), ExecutionError>> {
        let r = &mut self.registers;
        let mem = &mut self.memory;
        match instruction {
            Instruction::Br { nzp, offset } => opcodes::br(nzp, offset, r),
            Instruction::Add { dr, sr1, operand } => opcodes::add(dr, sr1, operand, r),
            Instruction::Ld { dr, offset } => opcodes::ld(dr, offset, r, mem),
            Instruction::St { sr, offset } => opcodes::st(sr, offset, r, mem),
            Instruction::Jsr { target } => opcodes::jsr(target, r),
            Instruction::And { dr, sr1, operand } => opcodes::and(dr, sr1, operand, r),
            Instruction::Ldr { dr, base, offset } => opcodes::ldr(dr, base, offset, r, mem),
            Instruction::Str { sr, base, offset } => opcodes::str(sr, base, offset, r, mem),
            Instruction::Not { dr, sr } => opcodes::not(dr, sr, r),
            Instruction::Ldi { dr, offset } => opcodes::ldi(dr, offset, r, mem),
            Instruction::Sti { sr, offset } => opcodes::sti(sr, offset, r, mem),
            Instruction::Jmp { base } => opcodes::jmp_or_ret(base, r),
            Instruction::Lea { dr, offset } => opcodes::lea(dr, offset, r),
            Instruction::Rti | Instruction::Reserved => {
                if self.options.strict {
                    return ControlFlow::Break(Err(ExecutionError::UnimplementedOpcode {
                        opcode: word.op_code(),
                        address,
                    }));
                }
                debug!(
                    "ignoring unimplemented opcode {:#06b} at {address:#06X}",
                    word.op_code()
                );
            }
            Instruction::Trap { vector } => {
                return trap_routines::execute_trap(vector, r, mem, stdin, stdout, &self.options);
            }
        }
        ControlFlow::Continue(())
    }

    /// Runs until `HALT` on the given input and output streams.
    ///
    /// A program that never halts keeps running.
    ///
    /// # Errors
    /// - See [`Emulator::step`]
    pub fn execute_with(
        &mut self,
        stdin: &mut impl BufRead,
        stdout: &mut impl Write,
    ) -> Result<(), ExecutionError> {
        while self.step(stdin, stdout)? == RunState::Running {}
        Ok(())
    }

    /// Runs until `HALT` reading from stdin and writing to stdout.
    ///
    /// # Errors
    /// - See [`Emulator::step`]
    pub fn execute(&mut self) -> Result<(), ExecutionError> {
        let mut stdin = io::stdin().lock();
        let mut stdout = io::stdout().lock();
        self.execute_with(&mut stdin, &mut stdout)
    }
}
