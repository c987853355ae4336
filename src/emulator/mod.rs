pub mod alu;
pub mod ascii_display;
pub mod basics;
pub mod display;
pub mod error;
pub mod executor;
pub mod input;
pub mod memory;
pub mod program;
pub mod registers;
pub mod timers;
pub mod vm;
