/// how many nested calls fit
pub const STACK_DEPTH: usize = 16;

/// Return addresses for CALL/RET. Full and empty are reported to the caller
/// rather than wrapping, and a failed push or pop changes nothing.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: [u16; STACK_DEPTH],
    sp: usize,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `None` if the stack is already full
    pub fn push(&mut self, addr: u16) -> Option<()> {
        let slot = self.frames.get_mut(self.sp)?;
        *slot = addr;
        self.sp += 1;
        Some(())
    }

    /// `None` if the stack is empty
    pub fn pop(&mut self) -> Option<u16> {
        self.sp = self.sp.checked_sub(1)?;
        Some(self.frames[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }

    pub fn is_full(&self) -> bool {
        self.sp == STACK_DEPTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_lifo() {
        let mut s = CallStack::new();
        s.push(0x202).unwrap();
        s.push(0x304).unwrap();
        assert_eq!(s.pop(), Some(0x304));
        assert_eq!(s.pop(), Some(0x202));
        assert_eq!(s.pop(), None);
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn test_overflow_leaves_depth() {
        let mut s = CallStack::new();
        for n in 0..STACK_DEPTH {
            assert!(s.push(n as u16).is_some());
        }
        assert!(s.is_full());
        assert_eq!(s.push(0xfff), None);
        assert_eq!(s.depth(), STACK_DEPTH);
        assert_eq!(s.pop(), Some(15));
    }
}
