use crate::math::{coil_points, Transform};
use crate::vertex::Vertex;
use crossterm::style::Color;
use std::iter;

/// Ground color, RGB(165, 42, 42)
pub const GROUND_COLOR: Color = Color::Rgb {
    r: 165,
    g: 42,
    b: 42,
};
/// Color of the tip and the coil
pub const SPRING_COLOR: Color = Color::Rgb { r: 0, g: 0, b: 255 };

/// Spring drawing parameters, in physics units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParams {
    pub coil_radius: f64,
    pub coil_count: u32,
    pub tip_radius: f64,
    pub stroke_width: f64,
    pub ground_color: Color,
    pub spring_color: Color,
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            coil_radius: 40.0,
            coil_count: 10,
            tip_radius: 30.0,
            stroke_width: 5.0,
            ground_color: GROUND_COLOR,
            spring_color: SPRING_COLOR,
        }
    }
}

/// Drawing target size in pixels, with pixels per physics unit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Surface {
    pub fn transform(&self) -> Transform {
        Transform::flip_about_center(self.width, self.height, self.scale)
    }
}

/// Primitive shape in surface pixels
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect {
        min: [f64; 2],
        max: [f64; 2],
        color: Color,
    },
    FillCircle {
        center: [f64; 2],
        radius: f64,
        color: Color,
    },
    StrokePath {
        vertices: Vec<Vertex>,
        width: f64,
        color: Color,
    },
}

/// Draw commands for one frame: ground, then the tip, then the coil.
///
/// `position` is the tip height above the anchor. Nothing is computed until
/// the iterator is driven.
pub fn render<'a>(
    surface: &'a Surface,
    params: &'a RenderParams,
    position: f64,
) -> impl Iterator<Item = DrawCommand> + 'a {
    let transform = surface.transform();

    // lower half of the surface
    let ground = iter::once_with(move || DrawCommand::FillRect {
        min: [0.0, surface.height / 2.0],
        max: [surface.width, surface.height],
        color: params.ground_color,
    });

    let tip = iter::once_with(move || DrawCommand::FillCircle {
        center: transform.apply([0.0, position]),
        radius: transform.length(params.tip_radius),
        color: params.spring_color,
    });

    let coil = iter::once_with(move || DrawCommand::StrokePath {
        vertices: coil_points(position, params.coil_radius, params.coil_count)
            .map(|p| Vertex::project(p, &transform))
            .collect(),
        width: transform.length(params.stroke_width),
        color: params.spring_color,
    });

    ground.chain(tip).chain(coil)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Surface {
        Surface {
            width: 200.0,
            height: 1000.0,
            scale: 1.0,
        }
    }

    #[test]
    fn emits_ground_tip_coil_in_order() {
        let surface = surface();
        let params = RenderParams::default();
        let commands: Vec<_> = render(&surface, &params, 375.0).collect();
        assert_eq!(commands.len(), 3);

        assert_eq!(
            commands[0],
            DrawCommand::FillRect {
                min: [0.0, 500.0],
                max: [200.0, 1000.0],
                color: GROUND_COLOR,
            }
        );
        assert_eq!(
            commands[1],
            DrawCommand::FillCircle {
                center: [100.0, 125.0],
                radius: 30.0,
                color: SPRING_COLOR,
            }
        );
        match &commands[2] {
            DrawCommand::StrokePath {
                vertices,
                width,
                color,
            } => {
                assert_eq!(vertices.len(), 11);
                assert_eq!(vertices[0].screen_position, [100.0, 500.0]);
                assert_eq!(vertices[10].screen_position, [100.0, 125.0]);
                assert_eq!(vertices[10].position, [0.0, 375.0]);
                assert_eq!(*width, 5.0);
                assert_eq!(*color, SPRING_COLOR);
            }
            other => panic!("expected coil path, got {other:?}"),
        }
    }

    #[test]
    fn coil_segment_count_ignores_position() {
        let surface = surface();
        let params = RenderParams {
            coil_count: 7,
            ..RenderParams::default()
        };
        for &position in &[-400.0, 0.0, 12.5, 300.0, 9000.0] {
            let coil = render(&surface, &params, position).last();
            match coil {
                Some(DrawCommand::StrokePath { vertices, .. }) => {
                    assert_eq!(vertices.len() - 1, 7);
                    assert_eq!(vertices[1].position[0], 0.0);
                    assert_eq!(vertices[7].position[0], 0.0);
                }
                other => panic!("expected coil path, got {other:?}"),
            }
        }
    }

    #[test]
    fn scale_shrinks_shapes() {
        let surface = Surface {
            width: 80.0,
            height: 200.0,
            scale: 0.25,
        };
        let params = RenderParams::default();
        let tip = render(&surface, &params, 300.0).nth(1);
        assert_eq!(
            tip,
            Some(DrawCommand::FillCircle {
                center: [40.0, 25.0],
                radius: 7.5,
                color: SPRING_COLOR,
            })
        );
    }
}
