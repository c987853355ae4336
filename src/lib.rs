//! Interpreter for the CHIP-8 virtual CPU with a deterministic breakpoint
//! opcode (`00A0`) for driving single-instruction test ROMs.
//!
//! The machine is stepped by the caller one instruction at a time and its
//! timers are ticked separately, so the caller owns all pacing.

pub mod config;
pub mod emulator;

pub use config::{Config, Quirks};
pub use emulator::error::VmError;
pub use emulator::vm::{ExecState, StepOutcome, VirtualMachine};
