use std::io;

/// Conditions that halt the interpreter. Once one of these is raised the
/// interpreter stays halted until it is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    #[error("unknown opcode {opcode:#06x}")]
    UnknownOpcode { opcode: u16 },

    #[error("stack overflow while executing {opcode:#06x}")]
    StackOverflow { opcode: u16 },

    #[error("stack underflow while executing {opcode:#06x}")]
    StackUnderflow { opcode: u16 },

    #[error("instruction fetch out of bounds at {pc:#06x}")]
    FetchOutOfBounds { pc: u16 },
}

/// Reasons a program could not be loaded. Memory is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("program is {size} bytes, at most {max} bytes fit past the load address")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("cannot load a program once execution has started; reset first")]
    AlreadyRunning,

    #[error("failed to read program: {0}")]
    Io(#[from] io::Error),
}
