//! The trap vector table: character and decimal I/O on R0 plus `HALT`.
//!
//! Every routine returns [`ControlFlow::Continue`] to keep executing,
//! `Break(Ok(()))` to halt and `Break(Err(_))` to abort the run.
use crate::emulator::EmulatorOptions;
use crate::errors::ExecutionError;
use crate::hardware::memory::{MEMORY_SIZE_U16, Memory};
use crate::hardware::registers::{Reg, Registers};
use crate::terminal;
use crate::terminal::EchoOptions;
use std::io;
use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use tracing::{debug, info, trace, warn};

/// Subtracted from the trap instruction's low byte to index the table.
pub const TRAP_VECTOR_BASE: u8 = 0x20;

/// Entries of the trap vector table, discriminants are the `trapvect8` values.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, enumn::N)]
pub enum TrapVector {
    GetC = 0x20,
    Out,
    PutS,
    In,
    PutSp,
    Halt,
    InU16,
    OutU16,
}

/// Runs the routine selected by the low byte of a `TRAP` instruction.
pub fn execute_trap(
    vector: u8,
    regs: &mut Registers,
    mem: &Memory,
    stdin: &mut impl BufRead,
    stdout: &mut impl Write,
    options: &EmulatorOptions,
) -> ControlFlow<Result<(), ExecutionError>> {
    let Some(trap) = TrapVector::n(vector) else {
        return ControlFlow::Break(Err(ExecutionError::InvalidTrap { vector }));
    };
    trace!("trap {trap:?}, table entry {}", vector - TRAP_VECTOR_BASE);
    match trap {
        TrapVector::GetC => get_c(regs, stdin, options.raw_terminal),
        TrapVector::Out => out(regs, stdout),
        TrapVector::PutS => put_s(regs, mem, stdout),
        TrapVector::In => in_trap(regs, stdin, stdout, options.raw_terminal),
        TrapVector::PutSp => {
            if options.strict {
                ControlFlow::Break(Err(ExecutionError::UnimplementedTrap { vector }))
            } else {
                debug!("ignoring reserved trap {vector:#04X}");
                ControlFlow::Continue(())
            }
        }
        TrapVector::Halt => halt(),
        TrapVector::InU16 => in_u16(regs, stdin),
        TrapVector::OutU16 => out_u16(regs, stdout),
    }
}

/// Reads a single byte, `None` on end of input.
fn read_byte(stdin: &mut impl BufRead) -> io::Result<Option<u8>> {
    let mut b = [0; 1];
    match stdin.read_exact(&mut b) {
        Ok(()) => Ok(Some(b[0])),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

fn read_character_from_console(
    regs: &mut Registers,
    eo: EchoOptions,
    raw_terminal: bool,
    stdin: &mut impl BufRead,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    let read = {
        let _lock = terminal::set_terminal_raw(raw_terminal);
        read_byte(stdin)
    };
    match read {
        Ok(Some(b)) => {
            regs.set(Reg::IO, u16::from(b));
            if eo == EchoOptions::EchoOn {
                write_bytes_out(&[b], stdout)?;
            }
            ControlFlow::Continue(())
        }
        Ok(None) => {
            // end of input reads as -1
            regs.set(Reg::IO, 0xFFFF);
            ControlFlow::Continue(())
        }
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

/// GETC: Read a single character from the keyboard. The character is not echoed onto the console.
///
/// Its ASCII code is copied into R0. The high eight bits of R0 are cleared.
pub fn get_c(
    regs: &mut Registers,
    stdin: &mut impl BufRead,
    raw_terminal: bool,
) -> ControlFlow<Result<(), ExecutionError>> {
    read_character_from_console(
        regs,
        EchoOptions::EchoOff,
        raw_terminal,
        stdin,
        &mut io::sink(),
    )
}

/// IN: Read a single character and echo it back to the console.
///
/// Otherwise, like 0x20 GETC.
pub fn in_trap(
    regs: &mut Registers,
    stdin: &mut impl BufRead,
    stdout: &mut impl Write,
    raw_terminal: bool,
) -> ControlFlow<Result<(), ExecutionError>> {
    read_character_from_console(regs, EchoOptions::EchoOn, raw_terminal, stdin, stdout)
}

/// OUT: Write a character in R0[7:0] to the console display.
pub fn out(regs: &Registers, stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    write_bytes_out(&[low_byte(regs.get(Reg::IO))], stdout)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Truncation is what is expected here"
)]
const fn low_byte(word: u16) -> u8 {
    word as u8
}

/// PUTS: print null-delimited string starting at R0's address, one character per word.
///
/// Reading continues across the end of memory at address 0 and stops after a full lap
/// if no terminating 0 is found.
pub fn put_s(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    let mut address = regs.get(Reg::IO);
    let mut s = Vec::with_capacity(120);
    for _ in 0..MEMORY_SIZE_U16 {
        let word = mem[address];
        if word == 0 {
            break;
        }
        s.push(low_byte(word));
        address = address.wrapping_add(1);
    }
    write_bytes_out(&s, stdout)
}

/// HALT: End program execution.
pub fn halt() -> ControlFlow<Result<(), ExecutionError>> {
    info!("program halted");
    ControlFlow::Break(Ok(()))
}

/// Reads a decimal unsigned number after skipping leading whitespace, like `scanf("%hu")`.
///
/// One `+` or `-` may precede the digits, a negative number wraps to its two's complement.
/// The delimiter after the digits stays in the input. Values above `u16::MAX` wrap.
/// `None` if no digit is found.
fn read_u16_decimal(stdin: &mut impl BufRead) -> io::Result<Option<u16>> {
    let mut next = stdin.fill_buf()?.first().copied();
    while let Some(b) = next
        && b.is_ascii_whitespace()
    {
        stdin.consume(1);
        next = stdin.fill_buf()?.first().copied();
    }
    let negative = next == Some(b'-');
    if matches!(next, Some(b'-' | b'+')) {
        stdin.consume(1);
    }
    let mut value: Option<u16> = None;
    loop {
        let next = stdin.fill_buf()?.first().copied();
        match next {
            Some(b) if b.is_ascii_digit() => {
                value = Some(
                    value
                        .unwrap_or(0)
                        .wrapping_mul(10)
                        .wrapping_add(u16::from(b - b'0')),
                );
                stdin.consume(1);
            }
            _ => break,
        }
    }
    Ok(value.map(|v| if negative { v.wrapping_neg() } else { v }))
}

/// `IN_U16`: Read a decimal formatted unsigned 16 bit number into R0.
///
/// R0 stays unchanged if the input holds no number.
pub fn in_u16(
    regs: &mut Registers,
    stdin: &mut impl BufRead,
) -> ControlFlow<Result<(), ExecutionError>> {
    match read_u16_decimal(stdin) {
        Ok(Some(value)) => regs.set(Reg::IO, value),
        Ok(None) => warn!("no decimal number in input, R0 unchanged"),
        Err(e) => return wrap_io_error_in_cf(&e),
    }
    ControlFlow::Continue(())
}

/// `OUT_U16`: Write R0 as decimal unsigned number followed by a newline.
pub fn out_u16(regs: &Registers, stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    write_bytes_out(format!("{}\n", regs.get(Reg::IO)).as_bytes(), stdout)
}

fn write_bytes_out(
    message: &[u8],
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    match stdout.write_all(message).and_then(|()| stdout.flush()) {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

fn wrap_io_error_in_cf(error: &io::Error) -> ControlFlow<Result<(), ExecutionError>, ()> {
    ControlFlow::Break(Err(ExecutionError::IOInputOutputError(error.to_string())))
}
