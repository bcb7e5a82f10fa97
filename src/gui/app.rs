use iced::{Element, Task, Theme};

use super::{
    AppState, Message,
    screens::{Screen, ScreenData, ScreenMessage, upload_page::UploadScreen},
};

pub struct MinewatchApp {
    state: AppState,
    screen: ScreenData,
}

impl MinewatchApp {
    fn new(state: AppState) -> (Self, Task<Message>) {
        let screen = ScreenData::UploadPage(UploadScreen::from_state(&state));
        (Self { state, screen }, Task::none())
    }

    fn title(&self) -> String {
        "Minewatch - Mining Compliance Dashboard".to_string()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        self.screen
            .update(message, &mut self.state)
            .map(|message| match message {
                ScreenMessage::ScreenMessage(message) => message,
                ScreenMessage::ParentMessage(never) => match never {},
            })
    }

    fn view(&self) -> Element<'_, Message> {
        self.screen.view().map(|message| match message {
            ScreenMessage::ScreenMessage(message) => message,
            ScreenMessage::ParentMessage(never) => match never {},
        })
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Open the dashboard window and block until it is closed.
pub fn run(state: AppState) -> iced::Result {
    iced::application(
        move || MinewatchApp::new(state.clone()),
        MinewatchApp::update,
        MinewatchApp::view,
    )
    .title(MinewatchApp::title)
    .theme(MinewatchApp::theme)
    .run()
}
