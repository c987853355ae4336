use super::basics::Value;

/// Delay and sound counters, decremented by an external 60 Hz tick.
#[derive(Default, Debug)]
pub struct Timers {
    pub delay: Value,
    pub sound: Value,
}

impl Timers {
    pub fn new() -> Timers {
        Timers::default()
    }

    pub fn tick(&mut self) {
        if self.delay.0 > 0 {
            self.delay.0 -= 1;
        }
        if self.sound.0 > 0 {
            self.sound.0 -= 1;
        }
    }
}
