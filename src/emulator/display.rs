use super::basics::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub type Pixels = [[bool; SCREEN_HEIGHT as usize]; SCREEN_WIDTH as usize];

/// Monochrome framebuffer, indexed as `[x][y]`.
pub struct Display {
    pixels: Pixels,
}

impl Display {
    pub fn new() -> Display {
        Display {
            pixels: [[false; SCREEN_HEIGHT as usize]; SCREEN_WIDTH as usize],
        }
    }

    /// Clears the entire display to black.
    pub fn clear(&mut self) {
        for column in self.pixels.iter_mut() {
            for pixel in column.iter_mut() {
                *pixel = false;
            }
        }
    }

    /// XORs a sprite onto the display with its top left corner at `(x, y)`.
    /// Both the origin and pixels running off an edge wrap around.
    /// Returns whether any lit pixel was switched off.
    pub fn draw(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let x0 = x % SCREEN_WIDTH;
        let y0 = y % SCREEN_HEIGHT;
        let mut collided = false;
        for (y_off, row) in sprite.iter().enumerate() {
            let py = ((y0 as usize + y_off) % SCREEN_HEIGHT as usize) as u8;
            for x_off in 0..8u8 {
                if row & (0x80 >> x_off) == 0 {
                    continue;
                }
                let px = (x0 + x_off) % SCREEN_WIDTH;
                collided |= self.flip_pixel(px, py);
            }
        }
        collided
    }

    /// Toggles a pixel and reports whether it was lit before.
    fn flip_pixel(&mut self, x: u8, y: u8) -> bool {
        let pixel = &mut self.pixels[x as usize][y as usize];
        let was_set = *pixel;
        *pixel = !was_set;
        was_set
    }

    pub fn get(&self, x: u8, y: u8) -> bool {
        self.pixels[(x % SCREEN_WIDTH) as usize][(y % SCREEN_HEIGHT) as usize]
    }

    pub fn snapshot(&self) -> Pixels {
        self.pixels
    }

    pub fn lit_count(&self) -> usize {
        self.pixels
            .iter()
            .map(|column| column.iter().filter(|p| **p).count())
            .sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_draw_row() {
        let mut display = Display::new();
        assert!(!display.draw(2, 3, &[0b1010_0001]));
        assert!(display.get(2, 3));
        assert!(!display.get(3, 3));
        assert!(display.get(4, 3));
        assert!(display.get(9, 3));
        assert_eq!(display.lit_count(), 3);
    }

    #[test]
    fn test_collision_cancels() {
        let mut display = Display::new();
        let sprite = [0xFF, 0x81];
        assert!(!display.draw(10, 10, &sprite));
        assert!(display.draw(10, 10, &sprite));
        assert_eq!(display.lit_count(), 0);
    }

    #[test]
    fn test_no_collision_on_disjoint_sprites() {
        let mut display = Display::new();
        assert!(!display.draw(0, 0, &[0xF0]));
        assert!(!display.draw(0, 0, &[0x0F]));
        assert_eq!(display.lit_count(), 8);
    }

    #[test]
    fn test_wrapping() {
        let mut display = Display::new();
        // Origin (70, 33) wraps to (6, 1).
        display.draw(70, 33, &[0x80]);
        assert!(display.get(6, 1));
        // Pixels past the right and bottom edges wrap as well.
        display.draw(62, 31, &[0xF0, 0xF0]);
        assert!(display.get(62, 31));
        assert!(display.get(63, 31));
        assert!(display.get(0, 31));
        assert!(display.get(1, 31));
        assert!(display.get(62, 0));
        assert!(display.get(1, 0));
    }

    #[test]
    fn test_snapshot() {
        let mut display = Display::new();
        display.draw(10, 5, &[0b1100_0000, 0b0100_0000]);
        let pixels = display.snapshot();
        for x in 0..SCREEN_WIDTH {
            for y in 0..SCREEN_HEIGHT {
                assert_eq!(pixels[x as usize][y as usize], display.get(x, y));
            }
        }
        assert!(pixels[10][5] && pixels[11][5] && pixels[11][6]);
        assert!(!pixels[10][6]);

        // A snapshot is a copy.
        display.clear();
        assert!(pixels[10][5]);
        assert!(!display.get(10, 5));
    }

    #[test]
    fn test_clear() {
        let mut display = Display::new();
        display.draw(0, 0, &[0xFF; 15]);
        assert_eq!(display.lit_count(), 120);
        display.clear();
        assert_eq!(display.lit_count(), 0);
    }
}
