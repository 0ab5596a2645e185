/// Maps physics space (y up, origin at the spring anchor) onto surface pixels (y down)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Pixel position of the physics origin
    pub origin: [f64; 2],
    /// Pixels per physics unit
    pub scale: f64,
}

impl Transform {
    /// Flips the y axis about the surface center and moves the origin there
    pub fn flip_about_center(width: f64, height: f64, scale: f64) -> Self {
        Transform {
            origin: [width / 2.0, height / 2.0],
            scale,
        }
    }

    pub fn apply(&self, point: [f64; 2]) -> [f64; 2] {
        [
            self.origin[0] + point[0] * self.scale,
            self.origin[1] - point[1] * self.scale,
        ]
    }

    /// Converts a physics length (radius, stroke width) into pixels
    pub fn length(&self, length: f64) -> f64 {
        length * self.scale.abs()
    }
}

/// Points of the coil polyline in physics space.
///
/// Yields the anchor followed by `coil_count` points evenly spaced up to
/// `tip_height`, so the path always has `coil_count` segments. The first and
/// last coil points sit on the centerline; interior points alternate sides,
/// starting on the left.
pub fn coil_points(
    tip_height: f64,
    coil_radius: f64,
    coil_count: u32,
) -> impl Iterator<Item = [f64; 2]> {
    let last = coil_count.saturating_sub(1);
    std::iter::once([0.0, 0.0]).chain((0..coil_count).map(move |i| {
        let x = if i == 0 || i == last {
            0.0
        } else if i % 2 == 1 {
            -coil_radius
        } else {
            coil_radius
        };
        let y = if last == 0 {
            tip_height
        } else {
            tip_height * (f64::from(i) / f64::from(last))
        };
        [x, y]
    }))
}

/// Pixels per physics unit so that `extent` physics units fill `available` pixels
pub fn fit_scale(available: f64, extent: f64) -> f64 {
    if extent.is_finite() && extent > 0.0 && available > 0.0 {
        available / extent
    } else {
        1.0
    }
}
