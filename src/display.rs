use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
/// one bit per pixel, rows packed MSB-first
pub const DISPLAY_SIZE_BYTES: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT / 8;

/// A snapshot of the pixels handed to the host.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; DISPLAY_SIZE_BYTES]);

impl Frame {
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let bit = y * DISPLAY_WIDTH + x;
        self.0[bit / 8] & (0x80 >> (bit % 8)) != 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..DISPLAY_HEIGHT {
            for x in 0..DISPLAY_WIDTH {
                f.write_str(if self.pixel(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The pixel surface the interpreter draws into, plus the flag telling the
/// host there's something new to show.
pub struct Framebuffer {
    pixels: Frame,
    dirty: bool,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: Frame([0; DISPLAY_SIZE_BYTES]),
            dirty: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// blank every pixel
    pub fn clear(&mut self) {
        self.pixels.0.fill(0);
        self.dirty = true;
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels.pixel(x % DISPLAY_WIDTH, y % DISPLAY_HEIGHT)
    }

    /// XOR a sprite onto the screen at (x, y), wrapping at the edges.
    /// Returns true if any lit pixel was switched off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        for (dy, row) in rows.iter().enumerate() {
            let py = (y as usize + dy) % DISPLAY_HEIGHT;
            for dx in 0..8 {
                if row & (0x80 >> dx) == 0 {
                    continue;
                }
                let px = (x as usize + dx) % DISPLAY_WIDTH;
                let bit = py * DISPLAY_WIDTH + px;
                let mask = 0x80 >> (bit % 8);
                let byte = &mut self.pixels.0[bit / 8];
                collision |= *byte & mask != 0;
                *byte ^= mask;
            }
        }
        self.dirty = true;
        collision
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// hand the current pixels to the host and clear the dirty flag
    pub fn consume_frame(&mut self) -> Frame {
        self.dirty = false;
        self.pixels
    }

    pub fn peek_frame(&self) -> &Frame {
        &self.pixels
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Display is used by the host to draw frames on the screen. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work.
pub trait Display {
    /// draw a frame produced by the interpreter
    fn draw(&mut self, frame: &Frame) -> Result<(), io::Error>;
}

// store useful metadata about the terminal
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel that is `lit`
    fn points_from_frame(&self, frame: &Frame, lit: bool) -> Vec<(f64, f64)> {
        (0..self.pixel_count())
            .map(|n| (n % self.0, n / self.0))
            .filter(|&(x, y)| frame.pixel(x, y) == lit)
            .map(|(x, y)| (x as f64, -1.0 * y as f64))
            .collect()
    }
}

/// monochrome display in a terminal, rendered using TUI and Crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(DISPLAY_WIDTH, DISPLAY_HEIGHT),
        })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &Frame) -> Result<(), io::Error> {
        let resolution = &self.resolution;
        let off = resolution.points_from_frame(frame, false);
        let on = resolution.points_from_frame(frame, true);

        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &off,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &on,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Resolution tests
    #[test]
    fn test_pixel_count() {
        let r = Resolution(64, 32);
        assert_eq!(r.pixel_count(), 2048)
    }

    #[test]
    fn test_x_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_points_split_by_colour() {
        let r = Resolution(64, 32);
        let mut fb = Framebuffer::new();
        fb.draw_sprite(1, 2, &[0x80]);
        let frame = fb.consume_frame();
        assert_eq!(r.points_from_frame(&frame, true), vec![(1.0, -2.0)]);
        assert_eq!(r.points_from_frame(&frame, false).len(), 2047);
    }

    // Framebuffer tests
    #[test]
    fn test_new_is_blank_and_clean() {
        let fb = Framebuffer::new();
        assert!(!fb.is_dirty());
        assert!(fb.peek_frame().is_blank());
    }

    #[test]
    fn test_draw_sets_pixels_and_dirty() {
        let mut fb = Framebuffer::new();
        assert!(!fb.draw_sprite(8, 0, &[0b1010_0000]));
        assert!(fb.is_dirty());
        assert!(fb.pixel(8, 0));
        assert!(!fb.pixel(9, 0));
        assert!(fb.pixel(10, 0));
    }

    #[test]
    fn test_draw_xors_and_reports_collision() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0b1100_0000]);
        assert!(fb.draw_sprite(1, 0, &[0b1100_0000]));
        assert!(fb.pixel(0, 0));
        assert!(!fb.pixel(1, 0));
        assert!(fb.pixel(2, 0));
    }

    #[test]
    fn test_draw_twice_erases() {
        let mut fb = Framebuffer::new();
        let sprite = [0xf0, 0x90, 0x90, 0x90, 0xf0];
        assert!(!fb.draw_sprite(20, 10, &sprite));
        assert!(fb.draw_sprite(20, 10, &sprite));
        assert!(fb.peek_frame().is_blank());
    }

    #[test]
    fn test_draw_wraps_at_edges() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(62, 31, &[0xe0, 0x80]);
        assert!(fb.pixel(62, 31));
        assert!(fb.pixel(63, 31));
        assert!(fb.pixel(0, 31));
        assert!(fb.pixel(62, 0));
    }

    #[test]
    fn test_consume_clears_dirty() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0xff]);
        let frame = fb.consume_frame();
        assert!(!fb.is_dirty());
        assert_eq!(frame.as_bytes()[0], 0xff);
        fb.clear();
        assert!(fb.is_dirty());
        assert!(fb.consume_frame().is_blank());
    }
}
