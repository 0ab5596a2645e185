use crate::math::Transform;

/// Path vertex with physics-space and screen-space positions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f64; 2],
    pub screen_position: [f64; 2],
}

impl Vertex {
    pub fn project(position: [f64; 2], transform: &Transform) -> Self {
        Vertex {
            position,
            screen_position: transform.apply(position),
        }
    }
}
