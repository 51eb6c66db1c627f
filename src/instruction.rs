//! Decoding of 16-bit instruction words.
//!
//! The top nibble picks the family; the 0, 8, E and F families then look at
//! the low nibble or low byte to pick the exact operation. Anything else is
//! `None`, which the interpreter treats as an unknown opcode.
use std::fmt;

/// register-to-register operations of the 8XYn family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Copy,
    Or,
    And,
    Xor,
    Add,
    Sub,
    Shr,
    SubReverse,
    Shl,
}

impl AluOp {
    fn from_nibble(n: u8) -> Option<Self> {
        Some(match n {
            0x0 => AluOp::Copy,
            0x1 => AluOp::Or,
            0x2 => AluOp::And,
            0x3 => AluOp::Xor,
            0x4 => AluOp::Add,
            0x5 => AluOp::Sub,
            0x6 => AluOp::Shr,
            0x7 => AluOp::SubReverse,
            0xe => AluOp::Shl,
            _ => return None,
        })
    }

    /// Result for VX and the value for VF, if this op sets it. Both are
    /// computed from the operands as they were before anything is written.
    pub fn apply(self, vx: u8, vy: u8) -> (u8, Option<bool>) {
        match self {
            AluOp::Copy => (vy, None),
            AluOp::Or => (vx | vy, None),
            AluOp::And => (vx & vy, None),
            AluOp::Xor => (vx ^ vy, None),
            AluOp::Add => {
                let (sum, carry) = vx.overflowing_add(vy);
                (sum, Some(carry))
            }
            // VF = NOT borrow
            AluOp::Sub => (vx.wrapping_sub(vy), Some(vx >= vy)),
            AluOp::SubReverse => (vy.wrapping_sub(vx), Some(vy >= vx)),
            AluOp::Shr => (vx >> 1, Some(vx & 0x01 == 1)),
            AluOp::Shl => (vx << 1, Some(vx & 0x80 != 0)),
        }
    }

    fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Copy => "LD",
            AluOp::Or => "OR",
            AluOp::And => "AND",
            AluOp::Xor => "XOR",
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::Shr => "SHR",
            AluOp::SubReverse => "SUBN",
            AluOp::Shl => "SHL",
        }
    }
}

/// One decoded CHIP-8 instruction. `x`/`y` are register indices, `nn` an
/// immediate byte, `nnn` a 12-bit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XNN
    SkipEqImm { x: u8, nn: u8 },
    /// 4XNN
    SkipNeImm { x: u8, nn: u8 },
    /// 5XY0
    SkipEqReg { x: u8, y: u8 },
    /// 6XNN
    LoadImm { x: u8, nn: u8 },
    /// 7XNN
    AddImm { x: u8, nn: u8 },
    /// 8XYn
    Alu { op: AluOp, x: u8, y: u8 },
    /// 9XY0
    SkipNeReg { x: u8, y: u8 },
    /// ANNN
    LoadIndex { nnn: u16 },
    /// BNNN
    JumpOffset { nnn: u16 },
    /// CXNN
    Random { x: u8, nn: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipKeyPressed { x: u8 },
    /// EXA1
    SkipKeyNotPressed { x: u8 },
    /// FX07
    ReadDelay { x: u8 },
    /// FX0A
    WaitKey { x: u8 },
    /// FX15
    SetDelay { x: u8 },
    /// FX18
    SetSound { x: u8 },
    /// FX1E
    AddIndex { x: u8 },
    /// FX29
    LoadFont { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    StoreRegisters { x: u8 },
    /// FX65
    LoadRegisters { x: u8 },
}

impl Instruction {
    pub fn decode(word: u16) -> Option<Self> {
        let x = ((word >> 8) & 0xf) as u8;
        let y = ((word >> 4) & 0xf) as u8;
        let n = (word & 0xf) as u8;
        let nn = (word & 0xff) as u8;
        let nnn = word & 0x0fff;

        use Instruction::*;
        let instr = match word >> 12 {
            0x0 => match word {
                0x00e0 => ClearScreen,
                0x00ee => Return,
                _ => return None,
            },
            0x1 => Jump { nnn },
            0x2 => Call { nnn },
            0x3 => SkipEqImm { x, nn },
            0x4 => SkipNeImm { x, nn },
            0x5 if n == 0 => SkipEqReg { x, y },
            0x6 => LoadImm { x, nn },
            0x7 => AddImm { x, nn },
            0x8 => Alu {
                op: AluOp::from_nibble(n)?,
                x,
                y,
            },
            0x9 if n == 0 => SkipNeReg { x, y },
            0xa => LoadIndex { nnn },
            0xb => JumpOffset { nnn },
            0xc => Random { x, nn },
            0xd => Draw { x, y, n },
            0xe => match nn {
                0x9e => SkipKeyPressed { x },
                0xa1 => SkipKeyNotPressed { x },
                _ => return None,
            },
            0xf => match nn {
                0x07 => ReadDelay { x },
                0x0a => WaitKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1e => AddIndex { x },
                0x29 => LoadFont { x },
                0x33 => StoreBcd { x },
                0x55 => StoreRegisters { x },
                0x65 => LoadRegisters { x },
                _ => return None,
            },
            _ => return None,
        };
        Some(instr)
    }
}

/// assembler-ish mnemonics, used when tracing
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump { nnn } => write!(f, "JP {:#05x}", nnn),
            Call { nnn } => write!(f, "CALL {:#05x}", nnn),
            SkipEqImm { x, nn } => write!(f, "SE V{:X}, {:#04x}", x, nn),
            SkipNeImm { x, nn } => write!(f, "SNE V{:X}, {:#04x}", x, nn),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm { x, nn } => write!(f, "LD V{:X}, {:#04x}", x, nn),
            AddImm { x, nn } => write!(f, "ADD V{:X}, {:#04x}", x, nn),
            Alu { op, x, y } => write!(f, "{} V{:X}, V{:X}", op.mnemonic(), x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex { nnn } => write!(f, "LD I, {:#05x}", nnn),
            JumpOffset { nnn } => write!(f, "JP V0, {:#05x}", nnn),
            Random { x, nn } => write!(f, "RND V{:X}, {:#04x}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipKeyNotPressed { x } => write!(f, "SKNP V{:X}", x),
            ReadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            LoadFont { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fields() {
        assert_eq!(
            Instruction::decode(0xd12f),
            Some(Instruction::Draw { x: 1, y: 2, n: 0xf })
        );
        assert_eq!(
            Instruction::decode(0x6a42),
            Some(Instruction::LoadImm { x: 0xa, nn: 0x42 })
        );
        assert_eq!(
            Instruction::decode(0x2abc),
            Some(Instruction::Call { nnn: 0xabc })
        );
    }

    #[test]
    fn test_decode_secondary_discriminants() {
        assert_eq!(Instruction::decode(0x00e0), Some(Instruction::ClearScreen));
        assert_eq!(Instruction::decode(0x00ee), Some(Instruction::Return));
        assert_eq!(
            Instruction::decode(0x834e),
            Some(Instruction::Alu { op: AluOp::Shl, x: 3, y: 4 })
        );
        assert_eq!(
            Instruction::decode(0xe5a1),
            Some(Instruction::SkipKeyNotPressed { x: 5 })
        );
        assert_eq!(Instruction::decode(0xf265), Some(Instruction::LoadRegisters { x: 2 }));
    }

    #[test]
    fn test_decode_unknown() {
        for word in [0x0000, 0x0123, 0x00e1, 0x5121, 0x8008, 0x800f, 0x9001, 0xe000, 0xf000, 0xf0ff] {
            assert_eq!(Instruction::decode(word), None, "{:#06x}", word);
        }
    }

    #[test]
    fn test_add_carry_from_operands() {
        assert_eq!(AluOp::Add.apply(200, 55), (255, Some(false)));
        assert_eq!(AluOp::Add.apply(200, 56), (0, Some(true)));
    }

    #[test]
    fn test_sub_not_borrow() {
        assert_eq!(AluOp::Sub.apply(5, 5), (0, Some(true)));
        assert_eq!(AluOp::Sub.apply(4, 5), (255, Some(false)));
        assert_eq!(AluOp::SubReverse.apply(4, 5), (1, Some(true)));
        assert_eq!(AluOp::SubReverse.apply(6, 5), (255, Some(false)));
    }

    #[test]
    fn test_shifts_report_lost_bit() {
        assert_eq!(AluOp::Shr.apply(0b0000_0011, 0), (0b0000_0001, Some(true)));
        assert_eq!(AluOp::Shr.apply(0b0000_0010, 0), (0b0000_0001, Some(false)));
        assert_eq!(AluOp::Shl.apply(0b1000_0001, 0), (0b0000_0010, Some(true)));
        assert_eq!(AluOp::Shl.apply(0b0100_0000, 0), (0b1000_0000, Some(false)));
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Instruction::ClearScreen.to_string(), "CLS");
        assert_eq!(Instruction::decode(0x8125).unwrap().to_string(), "SUB V1, V2");
        assert_eq!(Instruction::decode(0xa2f0).unwrap().to_string(), "LD I, 0x2f0");
    }
}
