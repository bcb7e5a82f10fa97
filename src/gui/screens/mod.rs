pub mod loading_page;
pub mod results_page;
pub mod upload_page;

use iced::{Element, Task};
use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};

use crate::{
    core::{api::RunRequest, assemble, job::PollDecision},
    gui::{AppState, Message},
};

#[derive(Debug, Clone)]
pub enum ScreenMessage<S: Screen> {
    ScreenMessage(S::Message),
    ParentMessage(S::ParentMessage),
}

pub trait Screen: Sized {
    type Message: std::fmt::Debug + Clone;
    type ParentMessage: std::fmt::Debug + Clone;
    fn view(&self) -> Element<'_, ScreenMessage<Self>>;
    fn update(&mut self, message: Self::Message, state: &mut AppState)
    -> Task<ScreenMessage<Self>>;
}

#[derive(Debug, Clone)]
pub enum ScreenData {
    UploadPage(upload_page::UploadScreen),
    LoadingPage(loading_page::LoadingScreen),
    ResultsPage(Box<results_page::ResultsScreen>),
}

fn lift(message: Message) -> ScreenMessage<ScreenData> {
    ScreenMessage::ScreenMessage(message)
}

/// Blocking error dialog; the screen underneath has already been reset.
fn alert(title: &str, description: &str) -> Task<ScreenMessage<ScreenData>> {
    let title = title.to_string();
    let description = description.to_string();
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(MessageLevel::Error)
                .set_title(&title)
                .set_description(&description)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await
        },
        |_| lift(Message::AlertClosed),
    )
}

fn schedule_poll(state: &AppState, generation: u64) -> Task<ScreenMessage<ScreenData>> {
    let client = state.client.clone();
    let interval = state.settings.poll_interval();
    Task::perform(
        async move {
            tokio::time::sleep(interval).await;
            client.progress().await.map_err(|e| e.to_string())
        },
        move |result| lift(Message::Polled(generation, result)),
    )
}

fn fetch_results(state: &AppState, generation: u64) -> Task<ScreenMessage<ScreenData>> {
    let client = state.client.clone();
    Task::perform(
        async move {
            let raw = client.results().await.map_err(|e| e.to_string())?;
            Ok::<_, String>(Box::new(assemble(raw, client.base_url())))
        },
        move |result| lift(Message::ResultsLoaded(generation, result)),
    )
}

/// End the job, go back to the upload screen and tell the user why.
fn fail(
    screen: &mut ScreenData,
    state: &mut AppState,
    generation: u64,
    title: &str,
    description: String,
) -> Task<ScreenMessage<ScreenData>> {
    tracing::error!("{}: {}", title, description);
    state.finish_job(generation);
    *screen = ScreenData::UploadPage(
        upload_page::UploadScreen::from_state(state).with_error(description.clone()),
    );
    alert(title, &description)
}

impl Screen for ScreenData {
    type Message = Message;
    type ParentMessage = std::convert::Infallible;
    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        match self {
            ScreenData::UploadPage(screen) => screen.view().map(Message::UploadPage),
            ScreenData::LoadingPage(screen) => screen.view().map(Message::LoadingPage),
            ScreenData::ResultsPage(screen) => screen.view().map(Message::ResultsPage),
        }
        .map(ScreenMessage::ScreenMessage)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match (self, message) {
            (_, Message::AlertClosed) => Task::none(),
            (x, Message::Submitted(generation, result)) => {
                if !state.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(()) => {
                        tracing::info!("Analysis job {} submitted", generation);
                        schedule_poll(state, generation)
                    }
                    Err(e) => fail(x, state, generation, "Failed to connect to backend", e),
                }
            }
            (x, Message::Polled(generation, result)) => {
                let report = match result {
                    Ok(report) => report,
                    Err(e) if state.is_current(generation) => {
                        return fail(x, state, generation, "Lost contact with backend", e);
                    }
                    Err(_) => return Task::none(),
                };
                let Some(job) = state.active_job_mut(generation) else {
                    return Task::none();
                };
                match job.poller.observe(&report) {
                    PollDecision::Continue(progress) => {
                        if let ScreenData::LoadingPage(page) = &mut *x {
                            page.set_progress(progress);
                        }
                        schedule_poll(state, generation)
                    }
                    PollDecision::Done => {
                        if let ScreenData::LoadingPage(page) = &mut *x {
                            page.set_progress(100.0);
                        }
                        fetch_results(state, generation)
                    }
                    PollDecision::Failed(message) => {
                        fail(x, state, generation, "Analysis failed", message)
                    }
                    PollDecision::TimedOut { attempts } => fail(
                        x,
                        state,
                        generation,
                        "Analysis timed out",
                        format!("No result after {} status checks", attempts),
                    ),
                }
            }
            (x, Message::ResultsLoaded(generation, result)) => {
                if !state.is_current(generation) {
                    return Task::none();
                }
                match result {
                    Ok(results) => {
                        state.finish_job(generation);
                        let screen = results_page::ResultsScreen::new(*results, &state.uploads);
                        *x = ScreenData::ResultsPage(Box::new(screen));
                        Task::none()
                    }
                    Err(e) => fail(x, state, generation, "Failed to load results", e),
                }
            }
            (
                x,
                Message::UploadPage(ScreenMessage::ParentMessage(upload_page::ParentMessage::Run)),
            ) => {
                let request = match state.uploads.documents() {
                    Some((legal, nogo)) => RunRequest::new(legal.clone(), nogo.clone()),
                    None => return Task::none(),
                };
                let Some(generation) = state.start_job() else {
                    tracing::warn!("Ignoring run request while a job is in flight");
                    return Task::none();
                };
                *x = ScreenData::LoadingPage(loading_page::LoadingScreen::default());
                let client = state.client.clone();
                Task::perform(
                    async move { client.submit(&request).await.map_err(|e| e.to_string()) },
                    move |result| lift(Message::Submitted(generation, result)),
                )
            }
            (ScreenData::UploadPage(page), Message::UploadPage(ScreenMessage::ScreenMessage(msg))) => page
                .update(msg, state)
                .map(Message::UploadPage)
                .map(ScreenMessage::ScreenMessage),
            (_, Message::LoadingPage(ScreenMessage::ScreenMessage(never))) => match never {},
            (
                x,
                Message::LoadingPage(ScreenMessage::ParentMessage(
                    loading_page::ParentMessage::Cancel,
                )),
            ) => {
                state.cancel_job();
                *x = ScreenData::UploadPage(upload_page::UploadScreen::from_state(state));
                Task::none()
            }
            (
                ScreenData::ResultsPage(page),
                Message::ResultsPage(ScreenMessage::ScreenMessage(msg)),
            ) => page
                .update(msg, state)
                .map(Message::ResultsPage)
                .map(ScreenMessage::ScreenMessage),
            (
                x,
                Message::ResultsPage(ScreenMessage::ParentMessage(
                    results_page::ParentMessage::NewAnalysis,
                )),
            ) => {
                *x = ScreenData::UploadPage(upload_page::UploadScreen::from_state(state));
                Task::none()
            }
            _ => Task::none(),
        }
    }
}
