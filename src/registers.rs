/// number of general purpose V registers
pub const NUM_REGISTERS: usize = 16;

/// VF doubles as the carry/borrow/collision flag
pub const FLAG_REGISTER: u8 = 0xf;

/// V0..VF plus the index register I.
///
/// Register indices come from 4-bit instruction fields, so they are always in
/// range; `I` is stored as written and never masked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterFile {
    v: [u8; NUM_REGISTERS],
    i: u16,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn get(&self, reg: u8) -> u8 {
        self.v[reg as usize & 0xf]
    }

    pub fn set(&mut self, reg: u8, value: u8) {
        self.v[reg as usize & 0xf] = value;
    }

    /// write VF; always done after the destination so the flag wins when
    /// the destination is VF itself
    pub fn set_flag(&mut self, flag: bool) {
        self.v[FLAG_REGISTER as usize] = flag as u8;
    }

    pub fn flag(&self) -> u8 {
        self.v[FLAG_REGISTER as usize]
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn set_index(&mut self, value: u16) {
        self.i = value;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed() {
        let r = RegisterFile::new();
        assert_eq!(r.as_slice(), &[0; 16]);
        assert_eq!(r.index(), 0);
    }

    #[test]
    fn test_flag_is_vf() {
        let mut r = RegisterFile::new();
        r.set_flag(true);
        assert_eq!(r.get(0xf), 1);
        r.set(0xf, 0x42);
        assert_eq!(r.flag(), 0x42);
    }

    #[test]
    fn test_index_not_masked() {
        let mut r = RegisterFile::new();
        r.set_index(0xffff);
        assert_eq!(r.index(), 0xffff);
        r.reset();
        assert_eq!(r.index(), 0);
    }
}
