use std::fmt::{Debug, Formatter};
use std::ops::{Index, IndexMut};

/// Number of addressable 16 bit cells, one for every `u16` address.
pub const MEMORY_SIZE_U16: usize = 1 << 16;

/// The word store: a flat array of 65536 16-bit cells indexed by `u16` address.
///
/// Since every `u16` is a valid address there are no failure modes on access.
pub struct Memory {
    /// Index equals memory address
    data: Box<[u16]>,
}

impl Debug for Memory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Memory {{ occupied cells: {} }}",
            self.data.iter().filter(|w| **w != 0).count()
        )
    }
}

impl Index<u16> for Memory {
    type Output = u16;
    fn index(&self, index: u16) -> &Self::Output {
        &self.data[usize::from(index)]
    }
}
impl IndexMut<u16> for Memory {
    fn index_mut(&mut self, index: u16) -> &mut Self::Output {
        &mut self.data[usize::from(index)]
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: vec![0x0u16; MEMORY_SIZE_U16].into_boxed_slice(),
        }
    }
    #[must_use]
    pub fn read(&self, address: u16) -> u16 {
        self[address]
    }
    pub fn write(&mut self, address: u16, value: u16) {
        self[address] = value;
    }
    /// Copies `words` into memory starting at `start`.
    ///
    /// Words that would land beyond the last address are dropped instead of wrapping
    /// around to address 0. Returns the number of words actually stored.
    pub fn load_words(&mut self, start: u16, words: &[u16]) -> usize {
        let start = usize::from(start);
        let count = words.len().min(MEMORY_SIZE_U16 - start);
        self.data[start..start + count].copy_from_slice(&words[..count]);
        count
    }
    /// Iterates over all cells holding a value other than 0 in address order.
    pub fn occupied(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        (0..=u16::MAX)
            .zip(self.data.iter().copied())
            .filter(|(_, value)| *value != 0)
    }
}
