use super::alu::{self, AluResult};
use super::basics::{
    Address, Register, Value, FONT_OFFSET, FONT_SPRITE_HEIGHT, MEMORY_SIZE, REGISTER_COUNT,
};
use super::display::Display;
use super::error::VmError;
use super::input::Keypad;
use super::memory::Memory;
use super::program::Instruction;
use super::registers::RegisterFile;
use super::timers::Timers;
use crate::config::{Config, Quirks};
use log::{debug, trace, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fmt;

/// What a single `step` did, when it did not fail.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum StepOutcome {
    Continue,
    /// A breakpoint was executed. The program counter already points past it.
    Halted,
    /// A key wait is pending and no key is down.
    AwaitingInput,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ExecState {
    Ready,
    AwaitingKey(Register),
}

/// Holds the logic of a virtual machine in action, including things like the
/// program counter and the memory.
pub struct VirtualMachine {
    registers: RegisterFile,
    memory: Memory,
    timers: Timers,
    keypad: Keypad,
    display: Display,
    quirks: Quirks,
    rng: StdRng,
}

impl VirtualMachine {
    /// Creates a VM with the default configuration and `program` loaded at
    /// the program start address.
    pub fn new(program: &[u8]) -> Result<VirtualMachine, VmError> {
        VirtualMachine::with_config(program, &Config::default())
    }

    pub fn with_config(program: &[u8], config: &Config) -> Result<VirtualMachine, VmError> {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut vm = VirtualMachine {
            registers: RegisterFile::new(),
            memory: Memory::new(),
            timers: Timers::new(),
            keypad: Keypad::new(),
            display: Display::new(),
            quirks: config.quirks,
            rng,
        };
        vm.load(program)?;
        Ok(vm)
    }

    /// Writes `program` to memory at the program start address.
    pub fn load(&mut self, program: &[u8]) -> Result<(), VmError> {
        self.memory.load_program(program)?;
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Runs one fetch-decode-execute cycle.
    ///
    /// While a key wait is pending nothing is fetched; the step completes the
    /// wait if a key is down and reports `AwaitingInput` otherwise. On error
    /// the program counter is left on the offending instruction.
    pub fn step(&mut self) -> Result<StepOutcome, VmError> {
        if let Some(target) = self.keypad.pending_wait() {
            return Ok(self.resume_wait(target));
        }

        let pc = self.registers.program_counter;
        let word = self.memory.read_word(pc)?;
        let instruction = Instruction::from_word(word)?;
        trace!("{:#06x}: {:04x} {:?}", pc.0, word, instruction);

        self.registers.program_counter = pc.offset(2);
        self.execute_instruction(instruction, pc).map_err(|e| {
            self.registers.program_counter = pc;
            e
        })
    }

    /// Decrements both timers once. Call at 60 Hz, independently of `step`.
    pub fn tick(&mut self) {
        self.timers.tick();
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<(), VmError> {
        self.keypad.set_key(key, pressed)
    }

    pub fn release_keys(&mut self) {
        self.keypad.release_all();
    }

    pub fn state(&self) -> ExecState {
        match self.keypad.pending_wait() {
            Some(target) => ExecState::AwaitingKey(target),
            None => ExecState::Ready,
        }
    }

    pub fn pc(&self) -> Address {
        self.registers.program_counter
    }

    pub fn index(&self) -> Address {
        self.registers.index
    }

    pub fn sp(&self) -> u8 {
        self.registers.stack_pointer()
    }

    pub fn stack(&self) -> &[Address] {
        self.registers.stack()
    }

    /// Value of a general purpose register. `Register(16)` and above do not
    /// exist.
    pub fn register(&self, reg: Register) -> Result<Value, VmError> {
        self.registers
            .values()
            .get(reg.0 as usize)
            .copied()
            .ok_or(VmError::InvalidRegister(reg.0))
    }

    pub fn registers(&self) -> &[Value; REGISTER_COUNT] {
        self.registers.values()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Current sound timer value; a tone plays while it is non-zero.
    pub fn sound_timer(&self) -> Value {
        self.timers.sound
    }

    fn resume_wait(&mut self, target: Register) -> StepOutcome {
        match self.keypad.resolve_wait() {
            Some((target, key)) => {
                debug!("key {:#x} satisfies wait into V{:X}", key, target.0);
                self.registers.set(target, Value(key));
                self.registers.program_counter = self.registers.program_counter.offset(2);
                StepOutcome::Continue
            }
            None => {
                trace!("still waiting for a key into V{:X}", target.0);
                StepOutcome::AwaitingInput
            }
        }
    }

    fn reg(&self, reg: Register) -> u8 {
        self.registers.get(reg).0
    }

    /// Writes the result to `target`, then the flag to VF.
    fn write_with_flag(&mut self, target: Register, result: AluResult) {
        self.registers.set(target, Value(result.primary));
        self.registers.set_flag(result.flag);
    }

    fn logic(&mut self, vx: Register, vy: Register, op: fn(u8, u8) -> u8) {
        let value = op(self.reg(vx), self.reg(vy));
        self.registers.set(vx, Value(value));
        if self.quirks.logic_resets_flag {
            self.registers.set_flag(false);
        }
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.registers.program_counter = self.registers.program_counter.offset(2);
        }
    }

    /// Returns the control flow from a subroutine.
    fn return_subroutine(&mut self) -> Result<(), VmError> {
        let addr = self.registers.pop()?;
        debug!("return to {:#06x}", addr.0);
        self.registers.program_counter = addr;
        Ok(())
    }

    /// Calls a subroutine. Fails if the stack depth is exceeded.
    fn call_subroutine(&mut self, addr: Address) -> Result<(), VmError> {
        self.registers.push(self.registers.program_counter)?;
        debug!(
            "call {:#06x}, depth {}",
            addr.0,
            self.registers.stack_pointer()
        );
        self.registers.program_counter = addr;
        Ok(())
    }

    fn jump_with_offset(&mut self, addr: Address) {
        let target = addr.offset(self.reg(Register::V0) as u16);
        self.registers.program_counter = if self.quirks.mask_jump_offset {
            Address(target.0 & 0x0FFF)
        } else {
            target
        };
    }

    fn draw(&mut self, vx: Register, vy: Register, rows: Value) -> Result<(), VmError> {
        let x = self.reg(vx);
        let y = self.reg(vy);
        let sprite = self.memory.slice(self.registers.index, rows.0 as usize)?;
        let collided = self.display.draw(x, y, sprite);
        self.registers.set_flag(collided);
        Ok(())
    }

    fn wait_key(&mut self, vx: Register, at: Address) -> StepOutcome {
        match self.keypad.first_pressed() {
            Some(key) => {
                self.registers.set(vx, Value(key));
                StepOutcome::Continue
            }
            None => {
                debug!("waiting for a key into V{:X}", vx.0);
                self.keypad.begin_wait(vx);
                self.registers.program_counter = at;
                StepOutcome::AwaitingInput
            }
        }
    }

    fn store_registers(&mut self, last: Register) -> Result<(), VmError> {
        let count = last.0 as usize + 1;
        let cells = self.memory.slice_mut(self.registers.index, count)?;
        for (cell, value) in cells.iter_mut().zip(self.registers.values().iter()) {
            *cell = value.0;
        }
        Ok(())
    }

    fn load_registers(&mut self, last: Register) -> Result<(), VmError> {
        let count = last.0 as usize + 1;
        let cells = self.memory.slice(self.registers.index, count)?;
        for (i, cell) in cells.iter().enumerate() {
            self.registers.set(Register(i as u8), Value(*cell));
        }
        Ok(())
    }

    fn store_decimal(&mut self, vx: Register) -> Result<(), VmError> {
        let digits = alu::bcd(self.reg(vx));
        self.memory
            .slice_mut(self.registers.index, digits.len())?
            .copy_from_slice(&digits);
        Ok(())
    }

    /// Executes a single instruction located at `at`. The program counter
    /// already points at the following instruction; jumps, calls and skips
    /// adjust it from there.
    fn execute_instruction(
        &mut self,
        instruction: Instruction,
        at: Address,
    ) -> Result<StepOutcome, VmError> {
        match instruction {
            // Control
            Instruction::Break => {
                debug!("breakpoint at {:#06x}", at.0);
                return Ok(StepOutcome::Halted);
            }
            Instruction::MachineCodeRoutine(addr) => {
                warn!(
                    "ignoring machine code routine {:#06x} at {:#06x}",
                    addr.0, at.0
                );
            }

            // Jumps
            Instruction::CallSubroutine(addr) => self.call_subroutine(addr)?,
            Instruction::ReturnSubroutine => self.return_subroutine()?,
            Instruction::Jump(addr) => self.registers.program_counter = addr,
            Instruction::JumpAdd(addr) => self.jump_with_offset(addr),

            // Conditionals
            Instruction::SkipIfEqualConst(vx, n) => {
                let condition = self.reg(vx) == n.0;
                self.skip_if(condition);
            }
            Instruction::SkipIfNotEqualConst(vx, n) => {
                let condition = self.reg(vx) != n.0;
                self.skip_if(condition);
            }
            Instruction::SkipIfEqual(vx, vy) => {
                let condition = self.reg(vx) == self.reg(vy);
                self.skip_if(condition);
            }
            Instruction::SkipIfNotEqual(vx, vy) => {
                let condition = self.reg(vx) != self.reg(vy);
                self.skip_if(condition);
            }

            // Register Arithmetic
            Instruction::SetConst(vx, n) => self.registers.set(vx, n),
            Instruction::AddConst(vx, n) => {
                let value = self.reg(vx).wrapping_add(n.0);
                self.registers.set(vx, Value(value));
            }
            Instruction::Set(vx, vy) => {
                let value = self.registers.get(vy);
                self.registers.set(vx, value);
            }
            Instruction::Or(vx, vy) => self.logic(vx, vy, alu::or),
            Instruction::And(vx, vy) => self.logic(vx, vy, alu::and),
            Instruction::Xor(vx, vy) => self.logic(vx, vy, alu::xor),
            Instruction::Add(vx, vy) => {
                let result = alu::add(self.reg(vx), self.reg(vy));
                self.write_with_flag(vx, result);
            }
            Instruction::Sub(vx, vy) => {
                let result = alu::sub(self.reg(vx), self.reg(vy));
                self.write_with_flag(vx, result);
            }
            Instruction::NegSub(vx, vy) => {
                let result = alu::subn(self.reg(vx), self.reg(vy));
                self.write_with_flag(vx, result);
            }
            Instruction::RightShift(vx) => {
                let result = alu::shr(self.reg(vx));
                self.write_with_flag(vx, result);
            }
            Instruction::LeftShift(vx) => {
                let result = alu::shl(self.reg(vx));
                self.write_with_flag(vx, result);
            }
            Instruction::Rand(vx, n) => {
                let random: u8 = self.rng.gen();
                self.registers.set(vx, Value(random & n.0));
            }

            // Key presses
            Instruction::SkipIfKey(vx) => {
                let pressed = self.keypad.is_pressed(self.reg(vx))?;
                self.skip_if(pressed);
            }
            Instruction::SkipIfNotKey(vx) => {
                let pressed = self.keypad.is_pressed(self.reg(vx))?;
                self.skip_if(!pressed);
            }
            Instruction::WaitKey(vx) => return Ok(self.wait_key(vx, at)),

            // Graphics
            Instruction::ClearDisplay => self.display.clear(),
            Instruction::Draw(vx, vy, n) => self.draw(vx, vy, n)?,
            Instruction::SpriteAddr(vx) => {
                let digit = (self.reg(vx) & 0x0F) as u16;
                self.registers.index = Address(FONT_OFFSET + digit * FONT_SPRITE_HEIGHT);
            }

            // Timers
            Instruction::GetDelayTimer(vx) => self.registers.set(vx, self.timers.delay),
            Instruction::SetDelayTimer(vx) => self.timers.delay = self.registers.get(vx),
            Instruction::SetSoundTimer(vx) => self.timers.sound = self.registers.get(vx),

            // I register
            Instruction::SetI(addr) => self.registers.index = addr,
            Instruction::AddToI(vx) => {
                let offset = self.reg(vx) as u16;
                self.registers.index = self.registers.index.offset(offset);
            }
            Instruction::Decimal(vx) => self.store_decimal(vx)?,
            Instruction::StoreRegisters(vx) => self.store_registers(vx)?,
            Instruction::LoadRegisters(vx) => self.load_registers(vx)?,
        }
        Ok(StepOutcome::Continue)
    }
}

impl fmt::Debug for VirtualMachine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Registers:")?;
        for (i, value) in self.registers.values().iter().enumerate() {
            writeln!(f, "  V{:X}: {:#04x}", i, value.0)?;
        }
        writeln!(f, "PC: {:#06x}", self.pc().0)?;
        writeln!(f, "I: {:#06x}", self.index().0)?;
        writeln!(f, "SP: {}", self.sp())?;
        writeln!(f, "State: {:?}", self.state())?;
        writeln!(f, "Stack:")?;
        for (i, addr) in self.stack().iter().enumerate() {
            writeln!(f, "  {}: {:#06x}", i, addr.0)?;
        }

        let pc = self.pc().0 as usize;
        if pc >= MEMORY_SIZE {
            return writeln!(f, "Memory around PC: PC is past the end of memory");
        }
        let low = pc.saturating_sub(10);
        let high = (pc + 10).min(MEMORY_SIZE - 1);
        writeln!(f, "Memory around PC ({:#06x} to {:#06x}):", low, high)?;
        if let Ok(cells) = self.memory.slice(Address(low as u16), high + 1 - low) {
            for (i, cell) in cells.iter().enumerate() {
                writeln!(f, "  {:#06x}: {:#04x}", low + i, cell)?;
            }
        }
        Ok(())
    }
}
