use lazy_static::lazy_static;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Behaviours that differ between interpreters of this architecture.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Quirks {
    /// OR, AND and XOR clear VF after writing their result.
    pub logic_resets_flag: bool,
    /// The V0-offset jump target is wrapped to 12 bits instead of being used
    /// as computed. Unmasked targets past the end of memory fail on the next
    /// fetch.
    pub mask_jump_offset: bool,
}

impl Default for Quirks {
    fn default() -> Quirks {
        Quirks {
            logic_resets_flag: true,
            mask_jump_offset: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub quirks: Quirks,
    /// Seed for the random instruction. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    /// Instructions executed per timer tick by the executor.
    pub steps_per_tick: u32,
    pub instruction_sleep: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            quirks: Quirks::default(),
            rng_seed: None,
            steps_per_tick: 10,
            instruction_sleep: Duration::from_millis(0),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown profile `{0}`")]
    UnknownProfile(String),

    #[error("character `{0}` is not on the keypad")]
    UnknownKey(char),
}

lazy_static! {
    static ref PROFILES: HashMap<&'static str, Quirks> = vec![
        ("vip", Quirks::default()),
        ("modern", Quirks {
            logic_resets_flag: false,
            mask_jump_offset: true,
        }),
    ]
    .into_iter()
    .collect();

    // 1 2 3 C      1 2 3 4
    // 4 5 6 D  <-  Q W E R
    // 7 8 9 E      A S D F
    // A 0 B F      Z X C V
    static ref KEYBOARD_LAYOUT: HashMap<char, u8> = vec![
        ('X', 0x0),
        ('1', 0x1),
        ('2', 0x2),
        ('3', 0x3),
        ('Q', 0x4),
        ('W', 0x5),
        ('E', 0x6),
        ('A', 0x7),
        ('S', 0x8),
        ('D', 0x9),
        ('Z', 0xA),
        ('C', 0xB),
        ('4', 0xC),
        ('R', 0xD),
        ('F', 0xE),
        ('V', 0xF),
    ]
    .into_iter()
    .collect();
}

pub fn profile(name: &str) -> Result<Quirks, ConfigError> {
    PROFILES
        .get(name)
        .copied()
        .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))
}

/// Maps keyboard characters onto keypad indices, ignoring case.
pub fn parse_keys(keys: &str) -> Result<Vec<u8>, ConfigError> {
    keys.chars()
        .map(|c| {
            KEYBOARD_LAYOUT
                .get(&c.to_ascii_uppercase())
                .copied()
                .ok_or(ConfigError::UnknownKey(c))
        })
        .collect()
}
