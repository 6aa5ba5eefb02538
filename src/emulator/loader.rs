//! Reading raw object files: a header-less sequence of 16 bit words.
use crate::errors::LoadProgramError;
use crate::hardware::memory::MEMORY_SIZE_U16;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes of an object file that can end up in memory, anything after them is never read.
pub const MAX_OBJECT_FILE_BYTES: u64 = 2 * MEMORY_SIZE_U16 as u64;

/// Byte order of the words in an object file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Endianness {
    /// Layout of a raw word dump written on a little endian host.
    #[default]
    Little,
    /// Layout of the usual LC-3 toolchain images.
    Big,
}

/// Splits `bytes` into words, a trailing odd byte is ignored.
#[must_use]
pub fn words_from_bytes(bytes: &[u8], endianness: Endianness) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            match endianness {
                Endianness::Little => u16::from_le_bytes(pair),
                Endianness::Big => u16::from_be_bytes(pair),
            }
        })
        .collect()
}

/// Reads the object file at `path` as words, at most [`MAX_OBJECT_FILE_BYTES`] of it.
///
/// # Errors
/// - `LoadFailure` if the file cannot be opened or read
pub fn read_object_file(
    path: impl AsRef<Path>,
    endianness: Endianness,
) -> Result<Vec<u16>, LoadProgramError> {
    let path = path.as_ref();
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|file| file.take(MAX_OBJECT_FILE_BYTES).read_to_end(&mut bytes))
        .map_err(|e| LoadProgramError::LoadFailure {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(words_from_bytes(&bytes, endianness))
}
