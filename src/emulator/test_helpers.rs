use crate::emulator::{Emulator, EmulatorOptions};
use crate::errors::ExecutionError;
use std::io;
use std::io::{BufRead, Read, Write};

pub struct StringWriter {
    vec: Vec<u8>,
}
impl Write for StringWriter {
    fn write(&mut self, data: &[u8]) -> Result<usize, io::Error> {
        self.vec.write(data)
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}
impl StringWriter {
    pub fn new() -> Self {
        let vec = Vec::<u8>::with_capacity(120);
        Self { vec }
    }
    pub fn get_string(&self) -> String {
        String::from_utf8(self.vec.clone()).unwrap()
    }
}

/// Input stream failing every read with the given message.
pub struct FailingReader {
    message: &'static str,
}
impl FailingReader {
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}
impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other(self.message))
    }
}
impl BufRead for FailingReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Err(io::Error::other(self.message))
    }
    fn consume(&mut self, _amt: usize) {}
}

/// Emulator with `program` loaded at the default origin, fed from `stdin_data`.
pub struct FakeEmulator<'a> {
    pub inner: Emulator,
    stdin_data: &'a [u8],
    pub stdout: StringWriter,
}
impl<'a> FakeEmulator<'a> {
    pub fn new(program: &[u16]) -> Self {
        Self::with_options(program, EmulatorOptions::default())
    }
    pub fn with_options(program: &[u16], options: EmulatorOptions) -> Self {
        let mut emu = Emulator::with_options(options);
        emu.load_words(program);
        Self {
            inner: emu,
            stdin_data: b"",
            stdout: StringWriter::new(),
        }
    }
    pub const fn add_stdin_input(&mut self, input: &'a [u8]) -> &mut Self {
        self.stdin_data = input;
        self
    }
    pub fn execute(&mut self) -> Result<(), ExecutionError> {
        self.inner
            .execute_with(&mut self.stdin_data, &mut self.stdout)
    }
}
