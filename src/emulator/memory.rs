use super::basics::{Address, FONT_OFFSET, MEMORY_SIZE, PROGRAM_START};
use super::error::VmError;

/// Hexadecimal digit sprites 0 to F, five rows each.
pub const FONT_SPRITES: [u8; 80] = [
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

/// Flat RAM. Every access is range checked; nothing wraps.
pub struct Memory {
    cells: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Creates zeroed memory with the font sprites in place.
    pub fn new() -> Memory {
        let mut cells = [0; MEMORY_SIZE];
        for (cell, font_byte) in cells
            .iter_mut()
            .skip(FONT_OFFSET as usize)
            .zip(FONT_SPRITES.iter())
        {
            *cell = *font_byte;
        }
        Memory { cells }
    }

    /// Copies a program to the load address.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), VmError> {
        let start = PROGRAM_START as usize;
        let max = MEMORY_SIZE - start;
        if program.len() > max {
            return Err(VmError::ProgramTooLarge {
                size: program.len(),
                max,
            });
        }
        self.cells[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn read(&self, addr: Address) -> Result<u8, VmError> {
        self.cells
            .get(addr.0 as usize)
            .copied()
            .ok_or(VmError::OutOfBounds {
                addr: addr.0 as usize,
            })
    }

    /// Reads a big-endian instruction word.
    pub fn read_word(&self, addr: Address) -> Result<u16, VmError> {
        let high = self.read(addr)?;
        let low = self.read(addr.offset(1))?;
        Ok(u16::from_be_bytes([high, low]))
    }

    /// Borrows `len` bytes starting at `addr`, failing if any of them is out
    /// of range. The error names the first cell past the end of memory.
    pub fn slice(&self, addr: Address, len: usize) -> Result<&[u8], VmError> {
        let start = addr.0 as usize;
        self.cells
            .get(start..start + len)
            .ok_or_else(|| first_out_of_range(start))
    }

    pub fn slice_mut(&mut self, addr: Address, len: usize) -> Result<&mut [u8], VmError> {
        let start = addr.0 as usize;
        self.cells
            .get_mut(start..start + len)
            .ok_or_else(|| first_out_of_range(start))
    }
}

fn first_out_of_range(start: usize) -> VmError {
    VmError::OutOfBounds {
        addr: start.max(MEMORY_SIZE),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_memory_new() {
        let memory = Memory::new();
        let font = memory.slice(Address(FONT_OFFSET), FONT_SPRITES.len()).unwrap();
        assert_eq!(font, &FONT_SPRITES[..]);
        for x in memory.slice(Address(PROGRAM_START), 0x100).unwrap() {
            assert_eq!(*x, 0);
        }
    }

    #[test]
    fn test_load_program() {
        let mut memory = Memory::new();
        memory.load_program(&[0x12, 0x34, 0x56]).unwrap();
        assert_eq!(memory.read_word(Address(0x200)).unwrap(), 0x1234);
        assert_eq!(memory.read(Address(0x202)).unwrap(), 0x56);
    }

    #[test]
    fn test_program_too_large() {
        let mut memory = Memory::new();
        let program = vec![0u8; MEMORY_SIZE - PROGRAM_START as usize + 1];
        assert_eq!(
            memory.load_program(&program),
            Err(VmError::ProgramTooLarge {
                size: 3585,
                max: 3584
            })
        );
        let program = vec![0xAAu8; MEMORY_SIZE - PROGRAM_START as usize];
        memory.load_program(&program).unwrap();
        assert_eq!(memory.read(Address(0xFFF)).unwrap(), 0xAA);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut memory = Memory::new();
        assert_eq!(
            memory.read(Address(0x1000)),
            Err(VmError::OutOfBounds { addr: 0x1000 })
        );
        assert!(memory.read_word(Address(0xFFF)).is_err());
        assert!(memory.slice(Address(0xFFE), 3).is_err());
        assert!(memory.slice(Address(0xFFD), 3).is_ok());
    }

    #[test]
    fn test_slice_reports_first_cell_past_the_end() {
        let mut memory = Memory::new();
        assert_eq!(
            memory.slice(Address(0xFFE), 3),
            Err(VmError::OutOfBounds { addr: 0x1000 })
        );
        assert_eq!(
            memory.slice(Address(0x2000), 3),
            Err(VmError::OutOfBounds { addr: 0x2000 })
        );
        assert_eq!(
            memory.slice_mut(Address(0x1005), 1).map(|cells| cells.len()),
            Err(VmError::OutOfBounds { addr: 0x1005 })
        );
        assert_eq!(
            memory.slice_mut(Address(0xFF0), 0x20).map(|cells| cells.len()),
            Err(VmError::OutOfBounds { addr: 0x1000 })
        );
    }
}
