/// Delay and sound countdowns. The interpreter ticks them once per cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// decrement both towards zero; returns true when the sound timer hits
    /// zero on this tick, which is when the tone should stop
    pub fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        let tone_ends = self.sound == 1;
        self.sound = self.sound.saturating_sub(1);
        tone_ends
    }

    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_stops_at_zero() {
        let mut t = Timers { delay: 1, sound: 0 };
        t.tick();
        t.tick();
        assert_eq!(t, Timers::new());
    }

    #[test]
    fn test_sound_falling_edge() {
        let mut t = Timers { delay: 0, sound: 2 };
        assert!(!t.tick());
        assert!(t.sound_active());
        assert!(t.tick());
        assert!(!t.sound_active());
        assert!(!t.tick());
    }
}
