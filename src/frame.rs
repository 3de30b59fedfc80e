use std::fmt;

pub const FRAME_WIDTH: usize = 64;
pub const FRAME_HEIGHT: usize = 32;

/// Monochrome 64x32 picture, one bool per pixel, row-major
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    cells: [[bool; FRAME_WIDTH]; FRAME_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            cells: [[false; FRAME_WIDTH]; FRAME_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.cells = [[false; FRAME_WIDTH]; FRAME_HEIGHT];
    }

    /// pixel at (x, y); coordinates wrap like sprite drawing does
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[y % FRAME_HEIGHT][x % FRAME_WIDTH]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool; FRAME_WIDTH]> {
        self.cells.iter()
    }

    /// coordinates of every pixel whose state matches `lit`
    pub fn pixels(&self, lit: bool) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(y, row)| {
            row.iter()
                .enumerate()
                .filter(move |(_, &cell)| cell == lit)
                .map(move |(x, _)| (x, y))
        })
    }

    /// XOR an 8-pixel-wide sprite into the frame with its top left corner at
    /// (x, y). each pixel wraps around the edges independently. returns true if
    /// any lit pixel was switched off
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, bits) in sprite.iter().enumerate() {
            let py = (y as usize + row) % FRAME_HEIGHT;
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let px = (x as usize + col) % FRAME_WIDTH;
                let cell = &mut self.cells[py][px];
                collision |= *cell;
                *cell = !*cell;
            }
        }
        collision
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// one line per row, '#' for lit and '.' for dark, so diffs stay readable
impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "FrameBuffer")?;
        for row in self.rows() {
            let line: String = row.iter().map(|&c| if c { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
