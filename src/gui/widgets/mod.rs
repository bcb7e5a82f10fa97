mod chart;
mod map;

pub use chart::AreaChart;
pub use map::BoundaryMap;

use iced::{
    Color, Element, Theme, border,
    widget::{column, container, container::Style, row, text},
};
use iced_widget::container::bordered_box;

use crate::core::dashboard::Tone;

pub const LEGAL_COLOR: Color = Color::from_rgb8(0x10, 0xb9, 0x81);
pub const NOGO_COLOR: Color = Color::from_rgb8(0xef, 0x44, 0x44);
pub const CAUTION_COLOR: Color = Color::from_rgb8(0xf5, 0x9e, 0x0b);

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Good => LEGAL_COLOR,
        Tone::Caution => CAUTION_COLOR,
        Tone::Alert => NOGO_COLOR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Upload,
    Analyse,
    Results,
}

impl Step {
    fn style(self, other: Self) -> impl Fn(&Theme) -> Style {
        move |theme: &Theme| {
            let style = bordered_box(theme).border(border::width(5));
            // if done, gray out background
            if self > other {
                let mut color_rgba = theme.palette().background.into_rgba8();
                color_rgba[0] /= 2;
                color_rgba[1] /= 2;
                color_rgba[2] /= 2;
                style.background(Color::from_rgb8(color_rgba[0], color_rgba[1], color_rgba[2]))
            } else {
                style.background(theme.palette().background)
            }
        }
    }
}

/// Step indicator on the left, screen content on the right.
pub fn layout<'a, Message>(
    sidebar: impl Into<Element<'a, Message>>,
    main_content: impl Into<Element<'a, Message>>,
    step: Step,
) -> Element<'a, Message>
where
    Message: 'a,
{
    container(row![
        container(column![
            container(column![
                container(text("1. Upload boundaries")).style(step.style(Step::Upload)).padding(10),
                container(text("2. Run analysis")).style(step.style(Step::Analyse)).padding(10),
                container(text("3. Review results")).style(step.style(Step::Results)).padding(10),
            ]),
            container(sidebar.into()).height(iced::Length::Fill),
        ])
        .width(iced::Length::FillPortion(1)),
        container(main_content.into())
            .padding(10)
            .width(iced::Length::FillPortion(4)),
    ])
    .center_x(iced::Length::Fill)
    .center_y(iced::Length::Fill)
    .into()
}

/// A titled value card for the KPI row.
pub fn kpi<'a, Message: 'a>(title: &'a str, value: String, color: Option<Color>) -> Element<'a, Message> {
    let value = match color {
        Some(color) => text(value).size(24).color(color),
        None => text(value).size(24),
    };
    container(column![text(title).size(14), value].spacing(6))
        .style(bordered_box)
        .padding(12)
        .width(iced::Length::Fill)
        .into()
}
