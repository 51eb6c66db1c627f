//! # interpreter
//!
//! The fetch/decode/execute engine. One call to `cycle()` is one complete
//! step: fetch the big-endian word at the program counter, decode it, apply
//! it, then tick both timers. The host sees state only between cycles.
//!
//! Execution is either running or halted. Unknown opcodes, stack misuse and
//! fetching past the end of memory halt the interpreter and record a
//! `Fault`; after that `cycle()` does nothing until `reset()`.
//!
//! Waiting for a key (FX0A) never blocks: the program counter just stays put
//! so the same instruction runs again on the next cycle.
use crate::display::{Frame, Framebuffer};
use crate::error::{Fault, LoadError};
use crate::input::{Keypad, NUM_KEYS};
use crate::instruction::Instruction;
use crate::memory::{Chip8MemoryMap, MemoryMap, CHIP8_FONT_GLYPH_BYTES, CHIP8_PROGRAM_ADDR};
use crate::registers::RegisterFile;
use crate::stack::CallStack;
use crate::timers::Timers;
use log::{debug, error, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

/// every instruction is two bytes
pub const INSTRUCTION_SIZE: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Halted(Fault),
}

/// where the program counter goes after an instruction
enum Flow {
    Next,
    Skip,
    Jump(u16),
    /// re-run this instruction next cycle
    Wait,
}

fn skip_if(cond: bool) -> Flow {
    if cond {
        Flow::Skip
    } else {
        Flow::Next
    }
}

pub struct Chip8Interpreter {
    memory: Chip8MemoryMap,
    registers: RegisterFile,
    stack: CallStack,
    timers: Timers,
    framebuffer: Framebuffer,
    keys: Keypad,
    program_counter: u16,
    state: State,
    cycles: u64,
    rng: StdRng,
}

impl Chip8Interpreter {
    /// a freshly reset interpreter with an entropy-seeded random source
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// as `new`, but CXNN produces a repeatable sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8Interpreter {
            memory: Chip8MemoryMap::new(),
            registers: RegisterFile::new(),
            stack: CallStack::new(),
            timers: Timers::new(),
            framebuffer: Framebuffer::new(),
            keys: [false; NUM_KEYS],
            program_counter: CHIP8_PROGRAM_ADDR,
            state: State::Running,
            cycles: 0,
            rng,
        }
    }

    /// zero everything and start running again from the load address
    pub fn reset(&mut self) {
        self.memory.reset();
        self.registers.reset();
        self.stack.reset();
        self.timers = Timers::new();
        self.framebuffer.reset();
        self.keys = [false; NUM_KEYS];
        self.program_counter = self.memory.program_addr;
        self.state = State::Running;
        self.cycles = 0;
        debug!("interpreter reset");
    }

    /// load a chip8 program at the load address; only allowed before the
    /// first cycle
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if self.cycles > 0 || self.is_halted() {
            return Err(LoadError::AlreadyRunning);
        }
        self.memory.load_program(program)?;
        debug!(
            "loaded {} byte program at {:#06x}",
            program.len(),
            self.memory.program_addr
        );
        Ok(())
    }

    /// load a chip8 program from a file or whatever
    pub fn load_program_from(&mut self, reader: &mut impl io::Read) -> Result<(), LoadError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.load_program(&buf)
    }

    /// key state consulted by the key instructions from now on
    pub fn set_keys(&mut self, keys: Keypad) {
        self.keys = keys;
    }

    /// run one fetch/decode/execute/tick; does nothing once halted
    pub fn cycle(&mut self) {
        if self.is_halted() {
            return;
        }
        if let Err(fault) = self.step() {
            error!("halted at {:#06x}: {}", self.program_counter, fault);
            self.state = State::Halted(fault);
        }
    }

    fn step(&mut self) -> Result<(), Fault> {
        let pc = self.program_counter;
        let opcode = self
            .memory
            .get_word(pc)
            .ok_or(Fault::FetchOutOfBounds { pc })?;
        let instr = Instruction::decode(opcode).ok_or(Fault::UnknownOpcode { opcode })?;
        trace!("{:#06x}: {:04x}  {}", pc, opcode, instr);

        self.program_counter = match self.execute(instr, opcode)? {
            Flow::Next => pc + INSTRUCTION_SIZE,
            Flow::Skip => pc + 2 * INSTRUCTION_SIZE,
            Flow::Jump(addr) => addr,
            Flow::Wait => pc,
        };

        if self.timers.tick() {
            trace!("sound timer expired");
        }
        self.cycles += 1;
        Ok(())
    }

    /// Apply one instruction. Faults are raised before anything is mutated.
    fn execute(&mut self, instr: Instruction, opcode: u16) -> Result<Flow, Fault> {
        use Instruction::*;
        let pc = self.program_counter;
        let v = |r: u8| self.registers.get(r);

        let flow = match instr {
            ClearScreen => {
                self.framebuffer.clear();
                Flow::Next
            }
            Return => Flow::Jump(self.stack.pop().ok_or(Fault::StackUnderflow { opcode })?),
            Jump { nnn } => Flow::Jump(nnn),
            Call { nnn } => {
                self.stack
                    .push(pc + INSTRUCTION_SIZE)
                    .ok_or(Fault::StackOverflow { opcode })?;
                Flow::Jump(nnn)
            }
            SkipEqImm { x, nn } => skip_if(v(x) == nn),
            SkipNeImm { x, nn } => skip_if(v(x) != nn),
            SkipEqReg { x, y } => skip_if(v(x) == v(y)),
            SkipNeReg { x, y } => skip_if(v(x) != v(y)),
            LoadImm { x, nn } => {
                self.registers.set(x, nn);
                Flow::Next
            }
            AddImm { x, nn } => {
                let sum = v(x).wrapping_add(nn);
                self.registers.set(x, sum);
                Flow::Next
            }
            Alu { op, x, y } => {
                let (result, flag) = op.apply(v(x), v(y));
                self.registers.set(x, result);
                if let Some(flag) = flag {
                    self.registers.set_flag(flag);
                }
                Flow::Next
            }
            LoadIndex { nnn } => {
                self.registers.set_index(nnn);
                Flow::Next
            }
            JumpOffset { nnn } => Flow::Jump(nnn + v(0) as u16),
            Random { x, nn } => {
                let r: u8 = self.rng.gen();
                self.registers.set(x, r & nn);
                Flow::Next
            }
            Draw { x, y, n } => {
                let i = self.registers.index();
                let rows: Vec<u8> = (0..n as u16)
                    .map(|row| self.memory.read_byte(i.wrapping_add(row)))
                    .collect();
                let collision = self.framebuffer.draw_sprite(v(x), v(y), &rows);
                self.registers.set_flag(collision);
                Flow::Next
            }
            SkipKeyPressed { x } => skip_if(self.key_down(v(x))),
            SkipKeyNotPressed { x } => skip_if(!self.key_down(v(x))),
            ReadDelay { x } => {
                self.registers.set(x, self.timers.delay);
                Flow::Next
            }
            WaitKey { x } => match self.keys.iter().position(|k| *k) {
                Some(key) => {
                    self.registers.set(x, key as u8);
                    Flow::Next
                }
                None => Flow::Wait,
            },
            SetDelay { x } => {
                self.timers.delay = v(x);
                Flow::Next
            }
            SetSound { x } => {
                self.timers.sound = v(x);
                Flow::Next
            }
            AddIndex { x } => {
                let i = self.registers.index().wrapping_add(v(x) as u16);
                self.registers.set_index(i);
                Flow::Next
            }
            LoadFont { x } => {
                let glyph = (v(x) & 0xf) as u16;
                self.registers
                    .set_index(self.memory.font_addr + glyph * CHIP8_FONT_GLYPH_BYTES);
                Flow::Next
            }
            StoreBcd { x } => {
                let i = self.registers.index();
                let value = v(x);
                self.memory.write_byte(i, value / 100);
                self.memory.write_byte(i.wrapping_add(1), value / 10 % 10);
                self.memory.write_byte(i.wrapping_add(2), value % 10);
                Flow::Next
            }
            StoreRegisters { x } => {
                let i = self.registers.index();
                for r in 0..=x {
                    self.memory.write_byte(i.wrapping_add(r as u16), v(r));
                }
                Flow::Next
            }
            LoadRegisters { x } => {
                let i = self.registers.index();
                for r in 0..=x {
                    let value = self.memory.read_byte(i.wrapping_add(r as u16));
                    self.registers.set(r, value);
                }
                Flow::Next
            }
        };
        Ok(flow)
    }

    fn key_down(&self, key: u8) -> bool {
        self.keys[key as usize & 0xf]
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, State::Halted(_))
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn last_fault(&self) -> Option<Fault> {
        match self.state {
            State::Halted(fault) => Some(fault),
            State::Running => None,
        }
    }

    /// completed cycles since the last reset
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn index(&self) -> u16 {
        self.registers.index()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    /// true while a tone should be playing
    pub fn sound_timer_active(&self) -> bool {
        self.timers.sound_active()
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn is_dirty(&self) -> bool {
        self.framebuffer.is_dirty()
    }

    pub fn consume_frame(&mut self) -> Frame {
        self.framebuffer.consume_frame()
    }
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
