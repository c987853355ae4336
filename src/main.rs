use anyhow::Context;
use chip8_vm::config::{self, Config};
use chip8_vm::emulator::ascii_display;
use chip8_vm::emulator::executor::{Executor, RunExit};
use chip8_vm::VirtualMachine;
use clap::Parser;
use log::info;
use std::io::{self, Write};
use std::path::PathBuf;

/// Runs a ROM headless, dumping machine state at every breakpoint.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// ROM image, loaded at 0x200
    rom: PathBuf,

    /// Quirk profile (`vip` or `modern`)
    #[arg(long, default_value = "vip")]
    profile: String,

    /// Keys held down for the whole run, as keyboard characters (1234 QWER ASDF ZXCV)
    #[arg(long, default_value = "")]
    press: String,

    /// Stop after this many instructions between breakpoints
    #[arg(long)]
    max_steps: Option<u64>,

    /// Exit cleanly once this many breakpoints have been hit
    #[arg(long)]
    breaks: Option<u64>,

    /// Instructions per 60 Hz timer tick
    #[arg(long, default_value_t = 10)]
    steps_per_tick: u32,

    /// Seed for the random instruction
    #[arg(long)]
    seed: Option<u64>,
}

/// How a run ended when no fatal error stopped it.
#[derive(PartialEq, Eq, Debug)]
enum Finish {
    Breakpoints(u64),
    AwaitingInput,
    StepLimit,
}

fn drive<W: Write>(executor: &mut Executor, args: &Args, out: &mut W) -> anyhow::Result<Finish> {
    let mut hits = 0;
    loop {
        match executor.run(args.max_steps)? {
            RunExit::Halted => {
                hits += 1;
                info!("breakpoint {} hit", hits);
                writeln!(out, "{:?}", executor.vm())?;
                writeln!(out, "{}", ascii_display::render(executor.vm().display()))?;
                if args.breaks.map_or(false, |breaks| hits >= breaks) {
                    return Ok(Finish::Breakpoints(hits));
                }
            }
            RunExit::AwaitingInput => {
                writeln!(out, "waiting for a key that is never pressed")?;
                writeln!(out, "{:?}", executor.vm())?;
                return Ok(Finish::AwaitingInput);
            }
            RunExit::StepLimit => {
                info!("step limit reached");
                return Ok(Finish::StepLimit);
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config {
        quirks: config::profile(&args.profile)?,
        rng_seed: args.seed,
        steps_per_tick: args.steps_per_tick,
        ..Config::default()
    };
    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("could not read {}", args.rom.display()))?;
    let mut vm = VirtualMachine::with_config(&rom, &config)?;
    for key in config::parse_keys(&args.press)? {
        vm.set_key(key, true)?;
    }

    let mut executor = Executor::new(vm, &config);
    let stdout = io::stdout();
    let finish = drive(&mut executor, &args, &mut stdout.lock())?;
    info!("finished: {:?}", finish);
    Ok(())
}
