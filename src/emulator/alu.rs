//! Register-to-register arithmetic.
//!
//! Operations with a carry, borrow or shifted-out bit return it next to the
//! result instead of writing VF themselves; the machine routes the flag.

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct AluResult {
    pub primary: u8,
    pub flag: bool,
}

impl AluResult {
    fn new(primary: u8, flag: bool) -> AluResult {
        AluResult { primary, flag }
    }
}

/// `a + b`, flag set on carry out of bit 7.
pub fn add(a: u8, b: u8) -> AluResult {
    let (sum, carry) = a.overflowing_add(b);
    AluResult::new(sum, carry)
}

/// `a - b`, flag set when no borrow occurred.
pub fn sub(a: u8, b: u8) -> AluResult {
    AluResult::new(a.wrapping_sub(b), a >= b)
}

/// `b - a`, flag set when no borrow occurred.
pub fn subn(a: u8, b: u8) -> AluResult {
    sub(b, a)
}

/// Flag receives the bit shifted out on the right.
pub fn shr(a: u8) -> AluResult {
    AluResult::new(a >> 1, a & 0x01 != 0)
}

/// Flag receives the bit shifted out on the left.
pub fn shl(a: u8) -> AluResult {
    AluResult::new(a << 1, a & 0x80 != 0)
}

pub fn or(a: u8, b: u8) -> u8 {
    a | b
}

pub fn and(a: u8, b: u8) -> u8 {
    a & b
}

pub fn xor(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Hundreds, tens and ones digits.
pub fn bcd(a: u8) -> [u8; 3] {
    [a / 100, a / 10 % 10, a % 10]
}
