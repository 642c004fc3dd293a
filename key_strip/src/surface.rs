//! Drawing surfaces.
//!
//! [`Surface`] is the small set of 2-D primitives the renderer needs,
//! expressed in fractional pixel coordinates.  [`Framebuffer`] implements it
//! over a packed `0xAARRGGBB` buffer, the layout `minifb` presents directly.
//!
//! Rasterization rule: a rectangle covers the pixel columns between its
//! rounded left and right edges (and likewise for rows), clipped to the
//! surface.  Strokes are centred on the rectangle's outline.

/// Fully transparent black; the cleared state of every surface.
pub const TRANSPARENT: u32 = 0x0000_0000;

// ════════════════════════════════════════════════════════════════════════════
// Surface trait
// ════════════════════════════════════════════════════════════════════════════

/// A pixel target for the keyboard renderer.
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Reallocate to `width` × `height`; contents become transparent.
    fn resize(&mut self, width: usize, height: usize);

    /// Reset every pixel to [`TRANSPARENT`].
    fn clear(&mut self);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: u32);

    /// Outline a rectangle with a line of `line_width` centred on its edges.
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, line_width: f32, color: u32) {
        let half = line_width / 2.0;
        self.fill_rect(x - half,     y - half,     w + line_width, line_width,     color);
        self.fill_rect(x - half,     y + h - half, w + line_width, line_width,     color);
        self.fill_rect(x - half,     y - half,     line_width,     h + line_width, color);
        self.fill_rect(x + w - half, y - half,     line_width,     h + line_width, color);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Framebuffer
// ════════════════════════════════════════════════════════════════════════════

/// Row-major ARGB pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer { width, height, pixels: vec![TRANSPARENT; width * height] }
    }

    pub fn pixels(&self) -> &[u32] { &self.pixels }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Flood the whole buffer with one color.
    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Copy `src` with its top-left corner at `(x, y)`.
    /// Fully transparent source pixels leave the destination untouched.
    pub fn blit(&mut self, src: &Framebuffer, x: usize, y: usize) {
        for row in 0..src.height {
            let dy = y + row;
            if dy >= self.height { break; }
            for col in 0..src.width {
                let dx = x + col;
                if dx >= self.width { break; }
                let p = src.pixels[row * src.width + col];
                if p >> 24 != 0 {
                    self.pixels[dy * self.width + dx] = p;
                }
            }
        }
    }

    /// Filled diamond (used as the fingertip cursor).
    pub fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for dy in -(r as isize)..=r as isize {
            let span = r as isize - dy.abs();
            for dx in -span..=span {
                let (sx, sy) = (cx as isize + dx, cy as isize + dy);
                if sx >= 0 && sy >= 0 {
                    self.set_pixel(sx as usize, sy as usize, color);
                }
            }
        }
    }

    /// Render `text` with the built-in 3×5 font, scaled by `scale`.
    pub fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.set_pixel(cx + col * scale + sx, y + row * scale + sy, color);
                            }
                        }
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx >= self.width { break; }
        }
    }
}

/// Pixel width of `text` in the built-in font at `scale`.
pub fn label_width(text: &str, scale: usize) -> usize {
    let n = text.chars().count();
    if n == 0 { 0 } else { (n * 4 - 1) * scale.max(1) }
}

impl Surface for Framebuffer {
    fn width(&self)  -> usize { self.width }
    fn height(&self) -> usize { self.height }

    fn resize(&mut self, width: usize, height: usize) {
        self.width  = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, TRANSPARENT);
    }

    fn clear(&mut self) {
        self.pixels.fill(TRANSPARENT);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: u32) {
        if !(w > 0.0 && h > 0.0) { return; }
        let (x0, x1) = pixel_span(x, x + w, self.width);
        let (y0, y1) = pixel_span(y, y + h, self.height);
        for row in y0..y1 {
            self.pixels[row * self.width + x0..row * self.width + x1].fill(color);
        }
    }
}

/// Round `[a, b)` to whole pixels and clip to `0..limit`.
fn pixel_span(a: f32, b: f32, limit: usize) -> (usize, usize) {
    let clip = |v: f32| v.round().clamp(0.0, limit as f32) as usize;
    let (lo, hi) = (clip(a), clip(b));
    (lo, hi.max(lo))
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
