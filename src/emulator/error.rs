use thiserror::Error;

/// Fatal conditions raised while loading or stepping a machine.
///
/// None of these are recoverable by the machine itself. The caller decides
/// whether to stop, reset or inspect.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    #[error("unrecognized opcode {0:#06x}")]
    Decode(u16),

    #[error("memory access out of bounds at {addr:#06x}")]
    OutOfBounds { addr: usize },

    #[error("call stack overflow")]
    StackOverflow,

    #[error("return with empty call stack")]
    StackUnderflow,

    #[error("register V{0} does not exist")]
    InvalidRegister(u8),

    #[error("key index {0:#04x} does not exist")]
    InvalidKey(u8),

    #[error("program of {size} bytes exceeds the {max} bytes available")]
    ProgramTooLarge { size: usize, max: usize },
}
