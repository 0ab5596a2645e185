use crate::render::DrawCommand;
use crate::vertex::Vertex;
use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::QueueableCommand;
use std::io::{self, Write};

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '\u{2580}';

/// Pixel buffer backed by terminal cells, two pixels per cell vertically
#[derive(Clone, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Option<Color>>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![None; width * height],
        }
    }

    /// Canvas covering a terminal of `cols` x `rows` cells
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Canvas::new(usize::from(cols), usize::from(rows) * 2)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(None);
    }

    /// Sets a pixel, ignoring coordinates outside the canvas
    pub fn set_pixel(&mut self, x: isize, y: isize, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = Some(color);
        }
    }

    /// Rasterizes one draw command
    pub fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::FillRect { min, max, color } => fill_rect(self, *min, *max, *color),
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => fill_circle(self, *center, *radius, *color),
            DrawCommand::StrokePath {
                vertices,
                width,
                color,
            } => stroke_path(self, vertices, *width, *color),
        }
    }

    /// Writes the canvas to the terminal, one row of cells at a time
    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for row in 0..self.height.div_ceil(2) {
            out.queue(MoveTo(0, row as u16))?;
            let mut current: Option<(Color, Color)> = None;
            for x in 0..self.width {
                let top = self.pixel(x, row * 2).unwrap_or(Color::Reset);
                let bottom = self.pixel(x, row * 2 + 1).unwrap_or(Color::Reset);
                if current != Some((top, bottom)) {
                    out.queue(SetForegroundColor(top))?;
                    out.queue(SetBackgroundColor(bottom))?;
                    current = Some((top, bottom));
                }
                out.queue(Print(HALF_BLOCK))?;
            }
        }
        out.queue(SetForegroundColor(Color::Reset))?;
        out.queue(SetBackgroundColor(Color::Reset))?;
        Ok(())
    }
}

/// Fills every pixel whose center lies inside `[min, max)`
pub fn fill_rect(canvas: &mut Canvas, min: [f64; 2], max: [f64; 2], color: Color) {
    let x0 = (min[0] - 0.5).ceil().max(0.0) as usize;
    let y0 = (min[1] - 0.5).ceil().max(0.0) as usize;
    let x1 = (max[0] - 0.5).ceil().min(canvas.width as f64).max(0.0) as usize;
    let y1 = (max[1] - 0.5).ceil().min(canvas.height as f64).max(0.0) as usize;
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.pixels[y * canvas.width + x] = Some(color);
        }
    }
}

/// Fills a disc; the pixel under the center is always set so tiny circles stay visible
pub fn fill_circle(canvas: &mut Canvas, center: [f64; 2], radius: f64, color: Color) {
    if !center[0].is_finite() || !center[1].is_finite() || canvas.width == 0 || canvas.height == 0
    {
        return;
    }
    let radius = radius.max(0.0);

    // Bounding box of the circle, clamped to the canvas
    let min_x = (center[0] - radius).floor().max(0.0) as usize;
    let max_x = (center[0] + radius).ceil().min(canvas.width as f64 - 1.0);
    let min_y = (center[1] - radius).floor().max(0.0) as usize;
    let max_y = (center[1] + radius).ceil().min(canvas.height as f64 - 1.0);
    if max_x >= 0.0 && max_y >= 0.0 {
        let (max_x, max_y) = (max_x as usize, max_y as usize);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f64 + 0.5 - center[0];
                let dy = y as f64 + 0.5 - center[1];
                if dx * dx + dy * dy <= radius * radius {
                    canvas.pixels[y * canvas.width + x] = Some(color);
                }
            }
        }
    }

    canvas.set_pixel(
        center[0].floor() as isize,
        center[1].floor() as isize,
        color,
    );
}

/// Strokes an open polyline through the screen positions of `vertices`
pub fn stroke_path(canvas: &mut Canvas, vertices: &[Vertex], width: f64, color: Color) {
    for pair in vertices.windows(2) {
        let [x0, y0] = pair[0].screen_position;
        let [x1, y1] = pair[1].screen_position;
        draw_line(canvas, x0, y0, x1, y1, width, color);
    }
}

/// Draws a line between two points using Bresenham's algorithm.
///
/// Strokes wider than two pixels go through [`fill_segment`] instead.
pub fn draw_line(
    canvas: &mut Canvas,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    width: f64,
    color: Color,
) {
    let half = width / 2.0;
    if half > 1.0 {
        fill_segment(canvas, [x0, y0], [x1, y1], half, color);
        return;
    }
    let Some((x0, y0, x1, y1)) = clip_segment(
        [x0, y0],
        [x1, y1],
        [-1.0, -1.0],
        [canvas.width as f64 + 1.0, canvas.height as f64 + 1.0],
    ) else {
        return;
    };

    let (mut x0, mut y0, x1, y1) = (
        x0.floor() as isize,
        y0.floor() as isize,
        x1.floor() as isize,
        y1.floor() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        canvas.set_pixel(x0, y0, color);

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Fills every pixel whose center lies within `radius` of the segment `a`-`b`.
///
/// Scans the segment's bounding box clamped to the canvas once, so the work is
/// bounded by the canvas area whatever the radius or the segment length.
pub fn fill_segment(canvas: &mut Canvas, a: [f64; 2], b: [f64; 2], radius: f64, color: Color) {
    if radius.is_nan() || canvas.width == 0 || canvas.height == 0 {
        return;
    }
    let radius = radius.max(0.0);
    // Parts of the segment farther than `radius` outside the canvas cannot reach it
    let Some((ax, ay, bx, by)) = clip_segment(
        a,
        b,
        [-radius, -radius],
        [canvas.width as f64 + radius, canvas.height as f64 + radius],
    ) else {
        return;
    };

    let min_x = (ax.min(bx) - radius).floor().max(0.0) as usize;
    let max_x = (ax.max(bx) + radius).ceil().min(canvas.width as f64 - 1.0);
    let min_y = (ay.min(by) - radius).floor().max(0.0) as usize;
    let max_y = (ay.max(by) + radius).ceil().min(canvas.height as f64 - 1.0);
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }
    let (max_x, max_y) = (max_x as usize, max_y as usize);

    let d = [bx - ax, by - ay];
    let length_sq = d[0] * d[0] + d[1] * d[1];
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f64 + 0.5;
            let py = y as f64 + 0.5;
            // Closest point on the segment
            let t = if length_sq > 0.0 {
                (((px - ax) * d[0] + (py - ay) * d[1]) / length_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dx = px - (ax + t * d[0]);
            let dy = py - (ay + t * d[1]);
            if dx * dx + dy * dy <= radius * radius {
                canvas.pixels[y * canvas.width + x] = Some(color);
            }
        }
    }
}

/// Liang-Barsky clipping of the segment `a`-`b` against the box `[min, max]`
fn clip_segment(
    a: [f64; 2],
    b: [f64; 2],
    min: [f64; 2],
    max: [f64; 2],
) -> Option<(f64, f64, f64, f64)> {
    if !(a[0].is_finite() && a[1].is_finite() && b[0].is_finite() && b[1].is_finite()) {
        return None;
    }
    let d = [b[0] - a[0], b[1] - a[1]];
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for axis in 0..2 {
        for (p, q) in [(-d[axis], a[axis] - min[axis]), (d[axis], max[axis] - a[axis])] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    Some((
        a[0] + t0 * d[0],
        a[1] + t0 * d[1],
        a[0] + t1 * d[0],
        a[1] + t1 * d[1],
    ))
}
