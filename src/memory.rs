use crate::error::LoadError;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents memory map, ROM, RAM etc.
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM"; panics if it runs off the end
    fn write(&mut self, data: &[u8], addr: u16) {
        self.get_rw_slice(addr, data.len()).copy_from_slice(data);
    }

    /// read one byte, wrapping the address into the 12-bit space
    fn read_byte(&self, addr: u16) -> u8 {
        self.get_ro_slice(addr & CHIP8_ADDR_MASK, 1)[0]
    }

    /// write one byte, wrapping the address into the 12-bit space
    fn write_byte(&mut self, addr: u16, value: u8) {
        self.get_rw_slice(addr & CHIP8_ADDR_MASK, 1)[0] = value;
    }

    /// get a big-endian two-byte word (instruction fetch); `None` if the
    /// second byte would fall off the end of memory
    fn get_word(&self, addr: u16) -> Option<u16> {
        if addr as usize + 1 >= self.size() {
            return None;
        }
        let word = self.get_ro_slice(addr, 2);
        Some(((word[0] as u16) << 8) | (word[1] as u16))
    }

    /// total addressable bytes
    fn size(&self) -> usize;

    /// get a r/w slice of the underlying memory (heap)
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8];

    /// get a r/o slice of the underlying memory (heap)
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8];
}

/// Defines the CHIP-8 standard memory map (4K configuration):
///   0x0000-0x01ff  interpreter (font lives at 0x0050)
///   0x0200-0x0fff  program and working data
///
/// the call stack and display live outside addressable memory
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
    pub font_addr: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn size(&self) -> usize {
        self.bytes.len()
    }
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8] {
        let a = addr as usize;
        &mut self.bytes[a..(a + len)]
    }
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8] {
        let a = addr as usize;
        &self.bytes[a..(a + len)]
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// addresses are 12 bits wide
pub const CHIP8_ADDR_MASK: u16 = 0x0fff;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// where the hex font is baked in, and how tall each glyph is
pub const CHIP8_FONT_ADDR: u16 = 0x050;
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

impl Chip8MemoryMap {
    /// zeroed memory with the font baked into the interpreter area
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
            program_addr: CHIP8_PROGRAM_ADDR,
            font_addr: CHIP8_FONT_ADDR,
        };
        mm.write(&CHIP8_CONTEMPORARY_FONT, CHIP8_FONT_ADDR);
        mm
    }

    /// return to the freshly-constructed state
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        self.write(&CHIP8_CONTEMPORARY_FONT, self.font_addr);
    }

    /// room left for a program past the load address
    pub fn program_capacity(&self) -> usize {
        self.size() - self.program_addr as usize
    }

    /// load a CHIP-8 program at 0x200; nothing is written if it doesn't fit
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        let max = self.program_capacity();
        if program.len() > max {
            return Err(LoadError::ProgramTooLarge {
                size: program.len(),
                max,
            });
        }
        self.write(program, self.program_addr);
        Ok(())
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

const CHIP8_CONTEMPORARY_FONT: [u8; 80] = [
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
