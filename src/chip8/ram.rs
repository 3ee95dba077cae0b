use crate::chip8::error::{Fault, Result};

pub const RAM_SIZE: usize = 4096;
/// Where programs are loaded and where execution starts.
pub const PROGRAM_ADDR: u16 = 0x200;
/// Rows per built-in digit sprite.
pub const GLYPH_HEIGHT: u16 = 5;

const GLYPHS: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub struct RAM {
    memory: [u8; RAM_SIZE],
}

impl RAM {
    /// Create a new RAM instance.
    /// Everything is zeroed except the digit glyphs at `0x000..0x050`.
    pub fn new() -> Self {
        let mut ram = RAM {
            memory: [0; RAM_SIZE],
        };
        ram.reset();
        ram
    }

    /// Zero the whole memory and reinstall the digit glyphs.
    pub fn reset(&mut self) {
        self.memory = [0; RAM_SIZE];
        self.memory[..GLYPHS.len()].copy_from_slice(&GLYPHS);
    }

    /// Read a single byte from memory.
    pub fn read(&self, addr: usize) -> Result<u8> {
        self.memory
            .get(addr)
            .copied()
            .ok_or(Fault::AddressOutOfRange { address: addr })
    }

    /// Write a single byte to memory.
    pub fn write(&mut self, addr: usize, value: u8) -> Result<()> {
        let cell = self
            .memory
            .get_mut(addr)
            .ok_or(Fault::AddressOutOfRange { address: addr })?;
        *cell = value;
        Ok(())
    }

    /// Read the big-endian instruction word at `addr`.
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let hi = self.read(addr)?;
        let lo = self.read(addr + 1)?;
        Ok(u16::from(hi) << 8 | u16::from(lo))
    }

    /// Read a byte, wrapping `addr` into the 4K address space.
    ///
    /// Used by instructions addressing through `I`, which must never fault.
    pub fn read_wrapping(&self, addr: usize) -> u8 {
        self.memory[addr % RAM_SIZE]
    }

    /// Write a byte, wrapping `addr` into the 4K address space.
    pub fn write_wrapping(&mut self, addr: usize, value: u8) {
        self.memory[addr % RAM_SIZE] = value;
    }

    /// Copy `program` to [`PROGRAM_ADDR`].
    ///
    /// Fails without touching memory if the program does not fit.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        let start = PROGRAM_ADDR as usize;
        if program.len() + start >= RAM_SIZE {
            return Err(Fault::ProgramTooLarge {
                len: program.len(),
                max: RAM_SIZE - start - 1,
                load_addr: PROGRAM_ADDR,
            });
        }
        self.memory[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }
}

impl Default for RAM {
    fn default() -> Self {
        Self::new()
    }
}
