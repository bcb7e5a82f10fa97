use crate::models::{
    AnalysisResults, Channel, PredictionSet, TimeseriesPoint, VIOLATION_THRESHOLD_KM2,
};

/// Everything the dashboard is derived from. Rendering never mutates it.
#[derive(Debug, Clone, Copy)]
pub struct DashboardInput<'a> {
    pub legal: &'a [TimeseriesPoint],
    pub nogo: &'a [TimeseriesPoint],
    pub predictions: PredictionSet,
    pub active_tab: Channel,
}

impl<'a> DashboardInput<'a> {
    pub fn from_results(results: &'a AnalysisResults, active_tab: Channel) -> Self {
        Self {
            legal: &results.legal,
            nogo: results.nogo(),
            predictions: results.predictions(),
            active_tab,
        }
    }

    fn nogo_area(&self, index: usize) -> f64 {
        self.nogo.get(index).map(|p| p.area_km2).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Caution,
    Alert,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub area_title: &'static str,
    pub growth_title: &'static str,
    pub current_area: f64,
    pub previous_area: f64,
    pub growth_pct: f64,
    pub growth_tone: Tone,
    pub prediction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub legal: Vec<f64>,
    pub nogo: Vec<f64>,
    pub visible: Channel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub index: usize,
    pub log_id: String,
    pub date: String,
    pub violated: bool,
    pub excavation_km2: f64,
}

impl AuditEntry {
    pub fn title(&self) -> &'static str {
        status_text(self.violated)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub index: usize,
    pub date: String,
    pub active_tab: Channel,
    pub kpis: Kpis,
    pub violation: bool,
    pub chart: ChartSeries,
    /// Newest first: entries run from `index` back to 0.
    pub audit_log: Vec<AuditEntry>,
    pub first_breach: Option<String>,
    pub slider_max: usize,
}

impl DashboardView {
    pub fn status(&self) -> &'static str {
        status_text(self.violation)
    }
}

/// Which panel shows the selected period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Map,
    Quantified,
}

impl View {
    pub fn toggle(self) -> Self {
        match self {
            View::Map => View::Quantified,
            View::Quantified => View::Map,
        }
    }
}

pub fn status_text(violated: bool) -> &'static str {
    if violated { "VIOLATION DETECTED" } else { "OK" }
}

pub fn is_violation(area_km2: f64) -> bool {
    area_km2 > VIOLATION_THRESHOLD_KM2
}

/// Period-over-period growth in percent.
///
/// Without a positive baseline the legal channel reports no growth, while the
/// no-go channel treats any new activity as 100%.
pub fn growth_percent(channel: Channel, current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        return (current - previous) / previous * 100.0;
    }
    match channel {
        Channel::Legal => 0.0,
        Channel::NoGo if current > 0.0 => 100.0,
        Channel::NoGo => 0.0,
    }
}

pub fn format_area(area_km2: f64) -> String {
    format!("{:.4} km²", area_km2)
}

pub fn format_growth(growth_pct: f64) -> String {
    let sign = if growth_pct > 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, growth_pct)
}

pub fn log_id(index: usize) -> String {
    format!("{:04}", index)
}

/// Derive the dashboard for period `index`. Returns `None` when there is
/// nothing to show at that index.
pub fn render(input: &DashboardInput<'_>, index: usize) -> Option<DashboardView> {
    let row = input.legal.get(index)?;
    let nogo_area = input.nogo_area(index);

    let (current_area, previous_area) = match input.active_tab {
        Channel::Legal => {
            let previous = if index > 0 {
                input.legal[index - 1].area_km2
            } else {
                row.area_km2
            };
            (row.area_km2, previous)
        }
        Channel::NoGo => {
            let previous = if index > 0 {
                input.nogo_area(index - 1)
            } else {
                nogo_area
            };
            (nogo_area, previous)
        }
    };
    let growth_pct = growth_percent(input.active_tab, current_area, previous_area);

    let (area_title, growth_title, growth_tone) = match input.active_tab {
        Channel::Legal => (
            "Current Legal Area",
            "Monthly Growth",
            if growth_pct >= 0.0 { Tone::Good } else { Tone::Caution },
        ),
        Channel::NoGo => (
            "Illegal Mining Area",
            "Illegal Growth",
            if growth_pct > 0.0 { Tone::Alert } else { Tone::Good },
        ),
    };

    let kpis = Kpis {
        area_title,
        growth_title,
        current_area,
        previous_area,
        growth_pct,
        growth_tone,
        prediction: input.predictions.for_channel(input.active_tab),
    };

    let visible = &input.legal[..=index];
    let chart = ChartSeries {
        labels: visible.iter().map(|p| p.date.clone()).collect(),
        legal: visible.iter().map(|p| p.area_km2).collect(),
        nogo: (0..=index).map(|i| input.nogo_area(i)).collect(),
        visible: input.active_tab,
    };

    let audit_log = (0..=index)
        .rev()
        .map(|i| {
            let excavation_km2 = input.nogo_area(i);
            AuditEntry {
                index: i,
                log_id: log_id(i),
                date: input.legal[i].date.clone(),
                violated: is_violation(excavation_km2),
                excavation_km2,
            }
        })
        .collect();

    let first_breach = input
        .nogo
        .iter()
        .take(index + 1)
        .find(|p| p.is_violation())
        .map(|p| p.date.clone());

    Some(DashboardView {
        index,
        date: row.date.clone(),
        active_tab: input.active_tab,
        kpis,
        violation: is_violation(nogo_area),
        chart,
        audit_log,
        first_breach,
        slider_max: input.legal.len() - 1,
    })
}
