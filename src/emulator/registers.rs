use super::basics::{Address, Register, Value, PROGRAM_START, REGISTER_COUNT, STACK_DEPTH};
use super::error::VmError;
use arrayvec::ArrayVec;

/// General purpose registers, the index register, the program counter and
/// the return address stack.
pub struct RegisterFile {
    v: [Value; REGISTER_COUNT],
    pub index: Address,
    pub program_counter: Address,
    stack: ArrayVec<[Address; STACK_DEPTH]>,
}

impl RegisterFile {
    pub fn new() -> RegisterFile {
        RegisterFile {
            v: [Value(0); REGISTER_COUNT],
            index: Address(0),
            program_counter: Address(PROGRAM_START),
            stack: ArrayVec::new(),
        }
    }

    pub fn get(&self, reg: Register) -> Value {
        self.v[reg.0 as usize]
    }

    pub fn set(&mut self, reg: Register, value: Value) {
        self.v[reg.0 as usize] = value;
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.set(Register::VF, Value(flag as u8));
    }

    pub fn values(&self) -> &[Value; REGISTER_COUNT] {
        &self.v
    }

    /// Number of return addresses currently on the stack.
    pub fn stack_pointer(&self) -> u8 {
        self.stack.len() as u8
    }

    pub fn stack(&self) -> &[Address] {
        &self.stack
    }

    pub fn push(&mut self, addr: Address) -> Result<(), VmError> {
        self.stack
            .try_push(addr)
            .map_err(|_| VmError::StackOverflow)
    }

    pub fn pop(&mut self) -> Result<Address, VmError> {
        self.stack.pop().ok_or(VmError::StackUnderflow)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_register_file_new() {
        let regs = RegisterFile::new();
        assert_eq!(regs.program_counter, Address(0x200));
        assert_eq!(regs.index, Address(0));
        assert_eq!(regs.stack_pointer(), 0);
        for r in regs.values().iter() {
            assert_eq!(*r, Value(0));
        }
    }

    #[test]
    fn test_flag() {
        let mut regs = RegisterFile::new();
        regs.set_flag(true);
        assert_eq!(regs.get(Register::VF), Value(1));
        regs.set_flag(false);
        assert_eq!(regs.get(Register(15)), Value(0));
    }

    #[test]
    fn test_stack_bounds() {
        let mut regs = RegisterFile::new();
        assert_eq!(regs.pop(), Err(VmError::StackUnderflow));
        for i in 0..STACK_DEPTH as u16 {
            regs.push(Address(i)).unwrap();
        }
        assert_eq!(regs.stack_pointer(), 16);
        assert_eq!(regs.push(Address(0x300)), Err(VmError::StackOverflow));
        assert_eq!(regs.stack_pointer(), 16);
        assert_eq!(regs.pop(), Ok(Address(15)));
        assert_eq!(regs.stack_pointer(), 15);
    }
}
