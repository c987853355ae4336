pub const MEMORY_SIZE: usize = 4096;
pub const SCREEN_WIDTH: u8 = 64;
pub const SCREEN_HEIGHT: u8 = 32;
pub const FONT_OFFSET: u16 = 0;
pub const FONT_SPRITE_HEIGHT: u16 = 5;
pub const PROGRAM_START: u16 = 0x200;
pub const STACK_DEPTH: usize = 16;
pub const REGISTER_COUNT: usize = 16;
pub const KEY_COUNT: usize = 16;

/// Reserved opcode that pauses execution for external inspection.
pub const BREAK_OPCODE: u16 = 0x00A0;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Address(pub u16);

impl Address {
    pub fn offset(self, by: u16) -> Address {
        Address(self.0.wrapping_add(by))
    }
}

/// Index of one of the sixteen general purpose registers.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Register(pub u8);

impl Register {
    pub const V0: Register = Register(0);
    /// Carry, borrow and collision output.
    pub const VF: Register = Register(0xF);
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct Value(pub u8);
