//!
//! ## Design
//!
//! * the interpreter owns all machine state: memory, registers, call stack,
//!   timers, framebuffer and the halt flag
//! * the host drives it one `.cycle()` at a time; each cycle is a complete
//!   fetch/decode/execute/timer-tick, so the host never sees half an
//!   instruction
//! * faults (bad opcode, stack misuse, running off the end of memory) halt
//!   the interpreter; only `.reset()` gets it going again
//! * display, input and audio are abstracted behind traits so the terminal
//!   front-end can be swapped out
//!
//! Model
//!
//! ```text
//! Host (main.rs)
//!  |-- display, input, sound, args
//!  |-- interpreter
//!  |    |-- memory map (program + font)
//!  |    |-- registers, call stack, timers
//!  |    `-- framebuffer (+ dirty flag)
//!  `-- main loop
//!       |-- interpreter.set_keys(input.poll_keys())
//!       |-- interpreter.cycle()
//!       |-- if interpreter.is_dirty() { display.draw(interpreter.consume_frame()) }
//!       |-- sound.follow_timer(interpreter.sound_timer_active())
//!       `-- sleep until the next tick
//! ```
pub mod display;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod stack;
pub mod timers;

pub use error::{Fault, LoadError};
pub use interpreter::Chip8Interpreter;
