use super::basics::{Register, KEY_COUNT};
use super::error::VmError;

/// Sixteen key hex keypad plus the slot for a pending key wait.
///
/// Key state is only ever changed by the harness. The machine reads it when
/// executing key instructions and parks the target register of a key wait in
/// `pending_wait` until a key is down.
#[derive(Debug, Default)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
    pending_wait: Option<Register>,
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<(), VmError> {
        let state = self
            .keys
            .get_mut(key as usize)
            .ok_or(VmError::InvalidKey(key))?;
        *state = pressed;
        Ok(())
    }

    pub fn is_pressed(&self, key: u8) -> Result<bool, VmError> {
        self.keys
            .get(key as usize)
            .copied()
            .ok_or(VmError::InvalidKey(key))
    }

    /// Lowest numbered key currently held down.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|k| *k).map(|k| k as u8)
    }

    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn pending_wait(&self) -> Option<Register> {
        self.pending_wait
    }

    /// Parks `target` until a key is down. Replaces any earlier request, so
    /// there is never more than one.
    pub fn begin_wait(&mut self, target: Register) {
        self.pending_wait = Some(target);
    }

    /// Completes the pending wait if a key is down, handing back the target
    /// register and the key.
    pub fn resolve_wait(&mut self) -> Option<(Register, u8)> {
        let target = self.pending_wait?;
        let key = self.first_pressed()?;
        self.pending_wait = None;
        Some((target, key))
    }
}
