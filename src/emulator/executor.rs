use super::error::VmError;
use super::vm::{StepOutcome, VirtualMachine};
use crate::config::Config;
use log::{debug, error};
use std::{thread, time::Duration};

/// Why `Executor::run` handed control back.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum RunExit {
    Halted,
    AwaitingInput,
    StepLimit,
}

/// Drives a VM on the calling thread, ticking its timers once every
/// `steps_per_tick` instructions.
pub struct Executor {
    vm: VirtualMachine,
    steps_per_tick: u32,
    instruction_sleep: Duration,
    steps_since_tick: u32,
}

impl Executor {
    pub fn new(vm: VirtualMachine, config: &Config) -> Executor {
        Executor {
            vm,
            steps_per_tick: config.steps_per_tick.max(1),
            instruction_sleep: config.instruction_sleep,
            steps_since_tick: 0,
        }
    }

    pub fn vm(&self) -> &VirtualMachine {
        &self.vm
    }

    pub fn vm_mut(&mut self) -> &mut VirtualMachine {
        &mut self.vm
    }

    pub fn into_vm(self) -> VirtualMachine {
        self.vm
    }

    /// Steps until a breakpoint, an unsatisfied key wait, a fatal error, or
    /// `max_steps` executed instructions. Calling again after `Halted`
    /// resumes behind the breakpoint.
    pub fn run(&mut self, max_steps: Option<u64>) -> Result<RunExit, VmError> {
        let mut steps = 0;
        loop {
            if max_steps.map_or(false, |max| steps >= max) {
                return Ok(RunExit::StepLimit);
            }
            let outcome = self.vm.step().map_err(|e| {
                error!("execution stopped at {:#06x}: {}", self.vm.pc().0, e);
                e
            })?;
            match outcome {
                StepOutcome::Continue => {}
                StepOutcome::Halted => {
                    self.count_step();
                    return Ok(RunExit::Halted);
                }
                StepOutcome::AwaitingInput => {
                    debug!("no key down, yielding to the caller");
                    return Ok(RunExit::AwaitingInput);
                }
            }
            self.count_step();
            steps += 1;
            if self.instruction_sleep > Duration::from_millis(0) {
                thread::sleep(self.instruction_sleep);
            }
        }
    }

    fn count_step(&mut self) {
        self.steps_since_tick += 1;
        if self.steps_since_tick >= self.steps_per_tick {
            self.steps_since_tick = 0;
            self.vm.tick();
        }
    }
}
