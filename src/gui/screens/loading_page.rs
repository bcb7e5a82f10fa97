use std::convert::Infallible;

use iced::{
    Alignment::Center,
    Element, Task,
    widget::{button, column, container, progress_bar, text},
};

use crate::gui::{
    AppState,
    screens::{Screen, ScreenMessage},
    widgets::{Step, layout},
};

#[derive(Debug, Clone, Default)]
pub struct LoadingScreen {
    progress: f32,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    Cancel,
}

impl LoadingScreen {
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = progress.clamp(0.0, 100.0) as f32;
    }
}

impl Screen for LoadingScreen {
    type Message = Infallible;
    type ParentMessage = ParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let content = column![
            text("Analysing satellite imagery…").size(24),
            progress_bar(0.0..=100.0, self.progress),
            text(format!("{:.0}%", self.progress)),
            button("Cancel").on_press(ScreenMessage::ParentMessage(ParentMessage::Cancel)),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Center);

        layout(
            text(""),
            container(content)
                .center_x(iced::Length::Fill)
                .center_y(iced::Length::Fill),
            Step::Analyse,
        )
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {}
    }
}
