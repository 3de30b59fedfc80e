use std::io;

use crate::error::LoadError;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// every effective address is reduced into the 4K space with this
pub const CHIP8_ADDRESS_MASK: u16 = 0x0fff;

/// where the program is loaded; everything below is reserved for the interpreter
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// where the hex font lives, and how many bytes each glyph takes
pub const CHIP8_FONT_ADDR: u16 = 0x0000;
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Represents memory map, ROM, RAM etc.
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM"; refuses anything that would run off the end
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), LoadError> {
        let max = self.capacity().saturating_sub(addr as usize);
        if data.len() > max {
            return Err(LoadError::ImageTooLarge {
                size: data.len(),
                max,
            });
        }
        self.get_rw_slice(addr, data.len()).copy_from_slice(data);
        Ok(())
    }

    /// get a big-endian two-byte word (instruction fetch)
    fn get_word(&self, addr: u16) -> u16 {
        let word = self.get_ro_slice(addr, 2);
        ((word[0] as u16) << 8) | (word[1] as u16)
    }

    /// read one byte, wrapping the address into the 4K space
    fn get_byte(&self, addr: u16) -> u8 {
        self.get_ro_slice(addr & CHIP8_ADDRESS_MASK, 1)[0]
    }

    /// write one byte, wrapping the address into the 4K space
    fn set_byte(&mut self, addr: u16, value: u8) {
        self.get_rw_slice(addr & CHIP8_ADDRESS_MASK, 1)[0] = value;
    }

    /// total addressable bytes
    fn capacity(&self) -> usize;

    /// get a r/w slice of the underlying memory (heap)
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8];

    /// get a r/o slice of the underlying memory (heap)
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8];
}

/// Defines the CHIP-8 memory map as the interpreter sees it:
///   0x0000-0x004f  hex font, 16 glyphs of 5 bytes
///   0x0050-0x01ff  reserved, zero
///   0x0200-0x0fff  program and data
///
/// the call stack, timers and display live outside of memory, so programs
/// cannot trample them
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn capacity(&self) -> usize {
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

impl Chip8MemoryMap {
    /// zeroed memory with the font installed
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
            program_addr: CHIP8_PROGRAM_ADDR,
        };
        mm.install_font();
        mm
    }

    /// zero everything and put the font back
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        self.install_font();
    }

    /// reset, then copy a program image in at 0x200. an oversized image is
    /// rejected before anything is touched
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), LoadError> {
        let max = self.capacity() - self.program_addr as usize;
        if image.len() > max {
            return Err(LoadError::ImageTooLarge {
                size: image.len(),
                max,
            });
        }
        self.reset();
        self.write(image, self.program_addr)
    }

    /// read a whole CHIP-8 program from `reader` and load it at 0x200
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, LoadError> {
        let mut image = Vec::new();
        let len = reader.read_to_end(&mut image)?;
        self.load_image(&image)?;
        Ok(len)
    }

    fn install_font(&mut self) {
        let a = CHIP8_FONT_ADDR as usize;
        self.bytes[a..a + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

pub const CHIP8_FONT: [u8; 80] = [
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed_except_font() {
        let m = Chip8MemoryMap::new();
        assert_eq!(m.bytes[..80], CHIP8_FONT);
        assert!(m.bytes[80..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_slice_ok() -> Result<(), LoadError> {
        let mut dst = Chip8MemoryMap::new();
        dst.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x300)?;
        assert_eq!(dst.get_ro_slice(0x2fc, 12), &[0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]);
        Ok(())
    }

    #[test]
    fn test_read_word() {
        let mut m = Chip8MemoryMap::new();
        m.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x200).unwrap();
        assert_eq!(m.get_word(0x204), 0x0405);
    }

    #[test]
    fn test_byte_access_wraps() {
        let mut m = Chip8MemoryMap::new();
        m.set_byte(0x1205, 0xab);
        assert_eq!(m.get_byte(0x0205), 0xab);
        assert_eq!(m.get_byte(0xf205), 0xab);
    }

    #[test]
    fn test_write_too_much_rejected() {
        let mut dst = Chip8MemoryMap::new();
        let err = dst.write(&[0; 8], 4089).unwrap_err();
        assert!(matches!(err, LoadError::ImageTooLarge { size: 8, max: 7 }));
    }

    #[test]
    fn test_program_load_ok() -> Result<(), LoadError> {
        let mut dst = Chip8MemoryMap::new();
        let mut prog: &[u8] = &[0x00, 0xe0]; // clear screen
        assert_eq!(dst.load_program(&mut prog)?, 2);
        assert_eq!(dst.get_ro_slice(0x200, 2), &[0x00, 0xe0]);
        Ok(())
    }

    #[test]
    fn test_largest_program_fits() -> Result<(), LoadError> {
        let mut dst = Chip8MemoryMap::new();
        dst.load_image(&[0x12; 0xe00])?;
        assert_eq!(dst.get_byte(0xfff), 0x12);
        Ok(())
    }

    #[test]
    fn test_oversized_program_leaves_memory_alone() {
        let mut dst = Chip8MemoryMap::new();
        dst.load_image(&[0xaa; 4]).unwrap();
        let err = dst.load_image(&[0x12; 0xe01]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ImageTooLarge {
                size: 0xe01,
                max: 0xe00
            }
        ));
        assert_eq!(dst.get_ro_slice(0x200, 4), &[0xaa; 4]);
    }

    #[test]
    fn test_reload_clears_previous_program() -> Result<(), LoadError> {
        let mut dst = Chip8MemoryMap::new();
        dst.load_image(&[0xaa; 16])?;
        dst.load_image(&[0xbb; 2])?;
        assert_eq!(dst.get_ro_slice(0x200, 4), &[0xbb, 0xbb, 0, 0]);
        Ok(())
    }
}
