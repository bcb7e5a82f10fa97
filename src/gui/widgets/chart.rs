use iced::{
    Color, Pixels, Point, Rectangle, Renderer, Size, Theme, mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke, Text},
};

use super::{LEGAL_COLOR, NOGO_COLOR};
use crate::core::dashboard::ChartSeries;
use crate::models::Channel;

const MARGIN_LEFT: f32 = 64.0;
const MARGIN_BOTTOM: f32 = 28.0;
const MARGIN_TOP: f32 = 12.0;
const MARGIN_RIGHT: f32 = 12.0;

/// Line chart of area (km²) up to the selected period. Only the active
/// channel's line is drawn.
#[derive(Debug)]
pub struct AreaChart<'a> {
    series: &'a ChartSeries,
}

impl<'a> AreaChart<'a> {
    pub fn new(series: &'a ChartSeries) -> Self {
        Self { series }
    }

    fn values(&self) -> (&[f64], Color, &'static str) {
        match self.series.visible {
            Channel::Legal => (self.series.legal.as_slice(), LEGAL_COLOR, "Legal Area (km²)"),
            Channel::NoGo => (self.series.nogo.as_slice(), NOGO_COLOR, "No-Go Impact (km²)"),
        }
    }
}

impl<Message> canvas::Program<Message> for AreaChart<'_> {
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
        let text_color = theme.palette().text;
        let (values, color, label) = self.values();

        let plot = Rectangle::new(
            Point::new(MARGIN_LEFT, MARGIN_TOP),
            Size::new(
                (bounds.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
                (bounds.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
            ),
        );

        let axes = Path::new(|builder| {
            builder.move_to(Point::new(plot.x, plot.y));
            builder.line_to(Point::new(plot.x, plot.y + plot.height));
            builder.line_to(Point::new(plot.x + plot.width, plot.y + plot.height));
        });
        frame.stroke(&axes, Stroke::default().with_color(text_color).with_width(1.0));

        frame.fill_text(Text {
            content: label.to_string(),
            position: Point::new(plot.x + 8.0, plot.y),
            color,
            size: Pixels(12.0),
            ..Text::default()
        });

        if values.is_empty() {
            return vec![frame.into_geometry()];
        }

        let max = values.iter().copied().fold(0.0_f64, f64::max);
        let y_max = if max > 0.0 { max * 1.1 } else { 1.0 };
        let step_x = if values.len() > 1 {
            plot.width / (values.len() - 1) as f32
        } else {
            0.0
        };
        let to_point = |i: usize, value: f64| {
            Point::new(
                plot.x + step_x * i as f32,
                plot.y + plot.height - (value / y_max) as f32 * plot.height,
            )
        };

        let ticks = [("0".to_string(), 0.0), (format!("{:.4}", y_max), y_max)];
        for (label, value) in ticks {
            let position = to_point(0, value);
            frame.fill_text(Text {
                content: label,
                position: Point::new(4.0, position.y - 6.0),
                color: text_color,
                size: Pixels(11.0),
                ..Text::default()
            });
        }

        let line = Path::new(|builder| {
            for (i, value) in values.iter().enumerate() {
                let point = to_point(i, *value);
                if i == 0 {
                    builder.move_to(point);
                } else {
                    builder.line_to(point);
                }
            }
        });
        frame.stroke(&line, Stroke::default().with_color(color).with_width(2.0));

        for (i, value) in values.iter().enumerate() {
            frame.fill(&Path::circle(to_point(i, *value), 3.0), color);
        }

        // first and last date under the x axis
        let first = self.series.labels.first();
        let last = self.series.labels.last().filter(|_| self.series.labels.len() > 1);
        for (i, date) in [(0, first), (values.len() - 1, last)] {
            if let Some(date) = date {
                let x = to_point(i, 0.0).x;
                frame.fill_text(Text {
                    content: date.clone(),
                    position: Point::new((x - 24.0).max(0.0), plot.y + plot.height + 8.0),
                    color: text_color,
                    size: Pixels(11.0),
                    ..Text::default()
                });
            }
        }

        vec![frame.into_geometry()]
    }
}
