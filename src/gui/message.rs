use crate::{
    core::api::ProgressReport,
    gui::screens::{
        ScreenMessage, loading_page::LoadingScreen, results_page::ResultsScreen,
        upload_page::UploadScreen,
    },
    models::AnalysisResults,
};

/// Job responses carry the generation they were issued for, so replies from a
/// cancelled job are dropped.
#[derive(Debug, Clone)]
pub enum Message {
    UploadPage(ScreenMessage<UploadScreen>),
    LoadingPage(ScreenMessage<LoadingScreen>),
    ResultsPage(ScreenMessage<ResultsScreen>),
    Submitted(u64, Result<(), String>),
    Polled(u64, Result<ProgressReport, String>),
    ResultsLoaded(u64, Result<Box<AnalysisResults>, String>),
    AlertClosed,
}
