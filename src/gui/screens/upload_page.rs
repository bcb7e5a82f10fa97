use iced::{
    Alignment::Center,
    Element, Task,
    widget::{button, column, container, row, text},
};
use rfd::AsyncFileDialog;

use crate::{
    core::Slot,
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets::{LEGAL_COLOR, NOGO_COLOR, Step, layout},
    },
};

#[derive(Debug, Clone, Default)]
pub struct UploadScreen {
    backend: String,
    legal_file: Option<String>,
    nogo_file: Option<String>,
    error: Option<String>,
    ready: bool,
    busy: bool,
}

#[derive(Debug, Clone)]
pub enum UploadMessage {
    Pick(Slot),
    FileLoaded(Slot, String, Vec<u8>),
    None,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    Run,
}

impl UploadScreen {
    pub fn from_state(state: &AppState) -> Self {
        let mut screen = Self::default();
        screen.sync(state);
        screen
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    fn sync(&mut self, state: &AppState) {
        self.backend = state.client.base_url().to_string();
        self.legal_file = state.uploads.get(Slot::Legal).map(|d| d.file_name.clone());
        self.nogo_file = state.uploads.get(Slot::NoGo).map(|d| d.file_name.clone());
        self.ready = state.uploads.is_ready();
        self.busy = state.is_job_in_flight();
    }

    fn slot_card(&self, slot: Slot) -> Element<'_, ScreenMessage<Self>> {
        let (file, color) = match slot {
            Slot::Legal => (&self.legal_file, LEGAL_COLOR),
            Slot::NoGo => (&self.nogo_file, NOGO_COLOR),
        };
        let status = match file {
            Some(name) => text(name.as_str()).color(color),
            None => text("No file selected"),
        };
        column![
            text(slot.label()).size(18),
            status,
            button("Choose GeoJSON…")
                .on_press(ScreenMessage::ScreenMessage(UploadMessage::Pick(slot))),
        ]
        .spacing(10)
        .align_x(Center)
        .into()
    }
}

async fn pick_document(title: &'static str) -> Option<(String, Vec<u8>)> {
    let handle = AsyncFileDialog::new()
        .set_title(title)
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file()
        .await?;
    let bytes = handle.read().await;
    Some((handle.file_name(), bytes))
}

impl Screen for UploadScreen {
    type Message = UploadMessage;
    type ParentMessage = ParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let run = button("Run Analysis").on_press_maybe(
            (self.ready && !self.busy).then_some(ScreenMessage::ParentMessage(ParentMessage::Run)),
        );

        let mut content = column![
            text("Minewatch").size(32),
            text("Upload the legal mine boundary and the no-go zone to start an analysis"),
            row![self.slot_card(Slot::Legal), self.slot_card(Slot::NoGo)].spacing(40),
            run,
        ]
        .spacing(20)
        .padding(20)
        .align_x(Center);

        if let Some(error) = &self.error {
            content = content.push(text(error.as_str()).color(NOGO_COLOR));
        }

        layout(
            text(format!("Backend: {}", self.backend)),
            container(content)
                .center_x(iced::Length::Fill)
                .center_y(iced::Length::Fill),
            Step::Upload,
        )
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            UploadMessage::Pick(slot) => Task::perform(pick_document(slot.label()), move |picked| {
                match picked {
                    Some((name, bytes)) => {
                        ScreenMessage::ScreenMessage(UploadMessage::FileLoaded(slot, name, bytes))
                    }
                    None => ScreenMessage::ScreenMessage(UploadMessage::None),
                }
            }),
            UploadMessage::FileLoaded(slot, name, bytes) => {
                self.error = match state.uploads.set_document(slot, name, &bytes) {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!("Rejected upload: {}", e);
                        Some(e.to_string())
                    }
                };
                self.sync(state);
                Task::none()
            }
            UploadMessage::None => Task::none(),
        }
    }
}
