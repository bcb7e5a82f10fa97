use std::collections::HashMap;

use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{
        button, canvas, column, container, image, pick_list, row, scrollable, slider, text,
    },
};
use iced_widget::container::bordered_box;

use crate::{
    core::{
        DashboardInput, DashboardView, Slot, UploadTracker, View,
        dashboard::{AuditEntry, format_area, format_growth, render},
        geo::{Ring, outlines},
    },
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets::{AreaChart, BoundaryMap, LEGAL_COLOR, NOGO_COLOR, Step, kpi, layout, tone_color},
    },
    models::{AnalysisResults, Channel, VIOLATION_THRESHOLD_KM2},
};

#[derive(Debug, Clone)]
enum ImageState {
    Loading,
    Ready(image::Handle),
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct ResultsScreen {
    results: AnalysisResults,
    active_tab: Channel,
    index: usize,
    view: View,
    dashboard: Option<DashboardView>,
    legal_outline: Vec<Ring>,
    nogo_outline: Vec<Ring>,
    zone_names: Vec<String>,
    images: HashMap<usize, ImageState>,
}

#[derive(Debug, Clone)]
pub enum ResultsMessage {
    SliderChanged(u32),
    TabSelected(Channel),
    ToggleView,
    ZoneSelected(String),
    ImageLoaded(usize, Result<Vec<u8>, String>),
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    NewAnalysis,
}

impl ResultsScreen {
    /// Opens on the most recent period with the legal tab active.
    pub fn new(results: AnalysisResults, uploads: &UploadTracker) -> Self {
        let outline = |slot| {
            uploads
                .get(slot)
                .map(|d| outlines(&d.document))
                .unwrap_or_default()
        };
        let mut screen = Self {
            index: results.last_index().unwrap_or(0),
            zone_names: results.zones.iter().map(|z| z.name.clone()).collect(),
            results,
            active_tab: Channel::Legal,
            view: View::Map,
            dashboard: None,
            legal_outline: outline(Slot::Legal),
            nogo_outline: outline(Slot::NoGo),
            images: HashMap::new(),
        };
        screen.refresh();
        screen
    }

    fn refresh(&mut self) {
        let input = DashboardInput::from_results(&self.results, self.active_tab);
        self.dashboard = render(&input, self.index);
    }

    fn request_image(&mut self, state: &AppState) -> Task<ScreenMessage<Self>> {
        if self.view != View::Quantified || self.images.contains_key(&self.index) {
            return Task::none();
        }
        let index = self.index;
        let Some(src) = self
            .results
            .quantified_maps
            .get(index)
            .and_then(|entry| entry.src.clone())
        else {
            self.images.insert(index, ImageState::Unavailable);
            return Task::none();
        };

        self.images.insert(index, ImageState::Loading);
        let client = state.client.clone();
        Task::perform(
            async move { client.fetch_image(&src).await.map_err(|e| e.to_string()) },
            move |result| ScreenMessage::ScreenMessage(ResultsMessage::ImageLoaded(index, result)),
        )
    }

    fn tabs(&self) -> Element<'_, ScreenMessage<Self>> {
        let tab = |channel: Channel| {
            let style = if channel == self.active_tab {
                button::primary
            } else {
                button::secondary
            };
            button(text(channel.label()))
                .style(style)
                .on_press(ScreenMessage::ScreenMessage(ResultsMessage::TabSelected(channel)))
        };

        let mut header = row![tab(Channel::Legal), tab(Channel::NoGo)]
            .spacing(10)
            .align_y(Center);

        if self.zone_names.len() > 1 {
            header = header.push(pick_list(
                self.zone_names.as_slice(),
                self.results.selected_zone_name().map(str::to_string),
                |name| ScreenMessage::ScreenMessage(ResultsMessage::ZoneSelected(name)),
            ));
        }

        header
            .push(
                button("New Analysis")
                    .style(button::secondary)
                    .on_press(ScreenMessage::ParentMessage(ParentMessage::NewAnalysis)),
            )
            .into()
    }

    fn visualization(&self, dashboard: &DashboardView) -> Element<'_, ScreenMessage<Self>> {
        let panel: Element<'_, ScreenMessage<Self>> = match self.view {
            View::Map => canvas(BoundaryMap::new(
                &self.legal_outline,
                &self.nogo_outline,
                dashboard.violation,
            ))
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
            View::Quantified => match self.images.get(&self.index) {
                Some(ImageState::Ready(handle)) => container(image(handle.clone()))
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .into(),
                Some(ImageState::Loading) => container(text("Loading image…"))
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .into(),
                Some(ImageState::Unavailable) | None => {
                    container(text(format!("No image available for {}", dashboard.date)))
                        .center_x(Length::Fill)
                        .center_y(Length::Fill)
                        .into()
                }
            },
        };

        let toggle_label = match self.view {
            View::Map => "Show Quantified Map",
            View::Quantified => "Show Boundary Map",
        };

        column![
            button(toggle_label).on_press(ScreenMessage::ScreenMessage(ResultsMessage::ToggleView)),
            container(panel)
                .style(bordered_box)
                .height(Length::FillPortion(3)),
        ]
        .spacing(8)
        .into()
    }

    fn audit_log(&self, dashboard: &DashboardView) -> Element<'_, ScreenMessage<Self>> {
        let mut entries = column![text("Audit Log").size(20)].spacing(10).padding(10);

        if let Some(date) = &dashboard.first_breach {
            entries = entries.push(text(format!("First Breach Recorded: {}", date)).color(NOGO_COLOR));
        }

        for entry in &dashboard.audit_log {
            entries = entries.push(audit_entry(entry));
        }

        scrollable(entries).height(Length::Fill).into()
    }
}

fn audit_entry<'a, Message: 'a>(entry: &AuditEntry) -> Element<'a, Message> {
    let (icon, color) = if entry.violated {
        ("⚠", NOGO_COLOR)
    } else {
        ("✔", LEGAL_COLOR)
    };
    container(
        column![
            row![
                text(format!("LOG_ID: {}", entry.log_id)).size(12),
                text(entry.date.clone()).size(12),
            ]
            .spacing(10),
            text(format!("{} {}", icon, entry.title())).color(color),
            text(format!("Illegal Excavation: {}", format_area(entry.excavation_km2))),
            text(format!("Threshold Limit: {} km²", VIOLATION_THRESHOLD_KM2)).size(12),
        ]
        .spacing(4),
    )
    .style(bordered_box)
    .padding(8)
    .width(Length::Fill)
    .into()
}

impl Screen for ResultsScreen {
    type Message = ResultsMessage;
    type ParentMessage = ParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let Some(dashboard) = &self.dashboard else {
            return layout(
                text(""),
                column![
                    text("The analysis returned no periods to display."),
                    self.tabs(),
                ]
                .spacing(20),
                Step::Results,
            );
        };
        let kpis = &dashboard.kpis;
        let status_color = if dashboard.violation { NOGO_COLOR } else { LEGAL_COLOR };

        let kpi_row = row![
            kpi(kpis.area_title, format_area(kpis.current_area), None),
            kpi(
                kpis.growth_title,
                format_growth(kpis.growth_pct),
                Some(tone_color(kpis.growth_tone)),
            ),
            kpi("Status", dashboard.status().to_string(), Some(status_color)),
            kpi("Predicted Next Period", format_area(kpis.prediction), None),
        ]
        .spacing(10);

        let timeline = row![
            text(dashboard.date.clone()).width(Length::Fixed(100.0)),
            slider(
                0..=dashboard.slider_max as u32,
                dashboard.index as u32,
                |value| ScreenMessage::ScreenMessage(ResultsMessage::SliderChanged(value)),
            ),
        ]
        .spacing(10)
        .align_y(Center);

        let chart = canvas(AreaChart::new(&dashboard.chart))
            .width(Length::Fill)
            .height(Length::FillPortion(2));

        let main = column![
            self.tabs(),
            kpi_row,
            timeline,
            chart,
            self.visualization(dashboard),
        ]
        .spacing(12);

        layout(self.audit_log(dashboard), main, Step::Results)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            ResultsMessage::SliderChanged(value) => {
                self.index = value as usize;
                self.refresh();
                self.request_image(state)
            }
            ResultsMessage::TabSelected(channel) => {
                self.active_tab = channel;
                self.refresh();
                Task::none()
            }
            ResultsMessage::ToggleView => {
                self.view = self.view.toggle();
                self.request_image(state)
            }
            ResultsMessage::ZoneSelected(name) => {
                if let Some(i) = self.zone_names.iter().position(|z| *z == name) {
                    self.results.select_zone(i);
                    self.refresh();
                }
                Task::none()
            }
            ResultsMessage::ImageLoaded(index, result) => {
                let loaded = match result {
                    Ok(bytes) => ImageState::Ready(image::Handle::from_bytes(bytes)),
                    Err(e) => {
                        tracing::warn!("Quantified map for period {} unavailable: {}", index, e);
                        ImageState::Unavailable
                    }
                };
                self.images.insert(index, loaded);
                Task::none()
            }
        }
    }
}
