use iced::{
    Color, Pixels, Point, Rectangle, Renderer, Theme, mouse,
    widget::canvas::{self, Frame, Geometry, LineDash, Path, Stroke, Text},
};

use super::{LEGAL_COLOR, NOGO_COLOR};
use crate::core::geo::{Projection, Ring, bounds as outline_bounds};

const PADDING: f64 = 24.0;

/// Boundary overlay: legal outline solid green, no-go outline dashed red.
/// The no-go zone is shaded while the selected period is in violation.
#[derive(Debug)]
pub struct BoundaryMap<'a> {
    legal: &'a [Ring],
    nogo: &'a [Ring],
    violation: bool,
}

impl<'a> BoundaryMap<'a> {
    pub fn new(legal: &'a [Ring], nogo: &'a [Ring], violation: bool) -> Self {
        Self {
            legal,
            nogo,
            violation,
        }
    }
}

fn ring_path(ring: &Ring, projection: &Projection) -> Path {
    Path::new(|builder| {
        for (i, position) in ring.coords().enumerate() {
            let (x, y) = projection.apply(*position);
            if i == 0 {
                builder.move_to(Point::new(x, y));
            } else {
                builder.line_to(Point::new(x, y));
            }
        }
        builder.close();
    })
}

impl<Message> canvas::Program<Message> for BoundaryMap<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        let Some(extent) = outline_bounds(self.legal.iter().chain(self.nogo.iter())) else {
            frame.fill_text(Text {
                content: "No boundary geometry to display".to_string(),
                position: Point::new(12.0, 12.0),
                color: theme.palette().text,
                size: Pixels(14.0),
                ..Text::default()
            });
            return vec![frame.into_geometry()];
        };
        let projection = Projection::fit(
            extent,
            bounds.width as f64,
            bounds.height as f64,
            PADDING,
        );

        for ring in self.nogo {
            let path = ring_path(ring, &projection);
            if self.violation {
                frame.fill(&path, Color { a: 0.25, ..NOGO_COLOR });
            }
            frame.stroke(
                &path,
                Stroke {
                    line_dash: LineDash {
                        segments: &[5.0, 5.0],
                        offset: 0,
                    },
                    ..Stroke::default().with_color(NOGO_COLOR).with_width(2.0)
                },
            );
        }

        for ring in self.legal {
            frame.stroke(
                &ring_path(ring, &projection),
                Stroke::default().with_color(LEGAL_COLOR).with_width(2.0),
            );
        }

        vec![frame.into_geometry()]
    }
}
