pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// Monochrome 64x32 framebuffer. A pixel is `true` when it is lit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pixels: [[bool; SCREEN_WIDTH]; SCREEN_HEIGHT],
}

impl Display {
    /// Create a blank display.
    pub fn new() -> Self {
        Display {
            pixels: [[false; SCREEN_WIDTH]; SCREEN_HEIGHT],
        }
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.pixels = [[false; SCREEN_WIDTH]; SCREEN_HEIGHT];
    }

    /// State of the pixel at `(x, y)`, wrapping both coordinates.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y % SCREEN_HEIGHT][x % SCREEN_WIDTH]
    }

    /// Pixel rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool; SCREEN_WIDTH]> {
        self.pixels.iter()
    }

    /// XOR `height` rows of `sprite` onto the screen with the top-left corner at `(x, y)`.
    ///
    /// Each pixel wraps to the opposite edge on its own, so a sprite hanging
    /// off the right side continues on the left. Returns `true` if any lit
    /// pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8], height: usize) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().take(height).enumerate() {
            let py = (y + row) % SCREEN_HEIGHT;
            for col in 0..8 {
                if byte & (0x80 >> col) == 0 {
                    continue;
                }
                let px = (x + col) % SCREEN_WIDTH;
                let pixel = &mut self.pixels[py][px];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }
        collision
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}
