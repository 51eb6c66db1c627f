use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chip8::display::{Display, MonoTermDisplay};
use chip8::input::{Input, StdinInput};
use chip8::interpreter::Chip8Interpreter;
use chip8::sound::{Mute, SimpleBeep, Sound};

/// Run a CHIP-8 program in the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// program to load at 0x200
    rom: PathBuf,

    /// cycles per second; the timers tick once per cycle
    #[arg(long, default_value_t = 60)]
    hz: u32,

    /// stop after this many cycles
    #[arg(long)]
    max_cycles: Option<u64>,

    /// don't beep
    #[arg(long)]
    mute: bool,

    /// seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // initialise
    let mut interpreter = match args.seed {
        Some(seed) => Chip8Interpreter::with_seed(seed),
        None => Chip8Interpreter::new(),
    };
    let mut f = File::open(&args.rom)?;
    interpreter.load_program_from(&mut f)?;

    let mut sound: Box<dyn Sound> = if args.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    {
        let mut display = MonoTermDisplay::new()?;
        let mut input = StdinInput::new()?;
        run(&mut interpreter, &mut display, &mut input, sound.as_mut(), &args)?;
    }
    sound.follow_timer(false)?;

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..12 {
        println!();
    }
    if let Some(fault) = interpreter.last_fault() {
        eprintln!(
            "halted after {} cycles at {:#06x}: {}",
            interpreter.cycles(),
            interpreter.program_counter(),
            fault
        );
    }
    Ok(())
}

/// one cycle per tick until halted, quit, or out of cycles
fn run(
    interpreter: &mut Chip8Interpreter,
    display: &mut impl Display,
    input: &mut impl Input,
    sound: &mut dyn Sound,
    args: &Args,
) -> Result<(), Box<dyn Error>> {
    let tick = Duration::from_secs(1) / args.hz.max(1);
    loop {
        let started = Instant::now();

        interpreter.set_keys(input.poll_keys()?);
        if input.quit_requested() {
            break;
        }
        interpreter.cycle();
        if interpreter.is_dirty() {
            display.draw(&interpreter.consume_frame())?;
        }
        sound.follow_timer(interpreter.sound_timer_active())?;

        if interpreter.is_halted() {
            break;
        }
        if matches!(args.max_cycles, Some(max) if interpreter.cycles() >= max) {
            break;
        }
        if let Some(rest) = tick.checked_sub(started.elapsed()) {
            spin_sleep::sleep(rest);
        }
    }
    Ok(())
}
