//! Maps a [`LeadReport`] onto display-ready cards and chart specifications.
//! Nothing here computes KPIs; front-ends implement [`RenderSummary`].

use super::domain::LeadTable;
use super::loader::{LoadDiagnostic, LoadError};
use super::report::views::LeadInsights;
use super::report::LeadReport;
use serde::Serialize;

pub const DASHBOARD_TITLE: &str = "Commercial Leads Dashboard";

/// Slice colours, assigned in order.
pub const PALETTE: [&str; 8] = [
    "#72559a", "#9177d1", "#c5a2f2", "#d5c5e3", "#f6f2fa", "#e74c3c", "#3498db", "#2ecc71",
];

const LINE_COLOR: &str = "#72559a";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTone {
    Neutral,
    Alert,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCard {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub tone: CardTone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinePoint {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: &'static str,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub color: &'static str,
    pub points: Vec<LinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSlice {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutChart {
    pub title: &'static str,
    pub slices: Vec<DonutSlice>,
    pub center_label: &'static str,
    pub center_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardCharts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_evolution: Option<LineChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_performance: Option<DonutChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments_no_response: Option<DonutChart>,
}

impl DashboardCharts {
    pub fn is_empty(&self) -> bool {
        self.daily_evolution.is_none()
            && self.channel_performance.is_none()
            && self.segments_no_response.is_none()
    }
}

/// Everything a front-end needs to draw the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: &'static str,
    pub kpis: Vec<KpiCard>,
    pub charts: DashboardCharts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<LeadInsights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<LoadDiagnostic>,
    pub dropped_rows: usize,
}

impl DashboardView {
    /// An absent table renders nothing but a warning.
    pub fn build(table: Option<&LeadTable>) -> Self {
        match table {
            Some(table) => Self::from_table(table),
            None => Self::unavailable(LoadDiagnostic::no_data()),
        }
    }

    pub fn from_outcome(outcome: Result<&LeadTable, &LoadError>) -> Self {
        match outcome {
            Ok(table) => Self::from_table(table),
            Err(err) => Self::unavailable(err.diagnostic()),
        }
    }

    pub fn from_table(table: &LeadTable) -> Self {
        let mut view = Self::from_report(&LeadReport::build(table));
        view.dropped_rows = table.dropped_rows();
        view
    }

    pub fn from_report(report: &LeadReport) -> Self {
        Self {
            title: DASHBOARD_TITLE,
            kpis: kpi_cards(report),
            charts: DashboardCharts {
                daily_evolution: daily_evolution(report),
                channel_performance: channel_performance(report),
                segments_no_response: segments_no_response(report),
            },
            insights: Some(report.insights()),
            warning: None,
            dropped_rows: 0,
        }
    }

    pub fn unavailable(diagnostic: LoadDiagnostic) -> Self {
        Self {
            title: DASHBOARD_TITLE,
            kpis: Vec::new(),
            charts: DashboardCharts::default(),
            insights: None,
            warning: Some(diagnostic),
            dropped_rows: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.warning.is_none()
    }
}

/// Narrow seam between the aggregation core and any concrete front-end.
pub trait RenderSummary {
    type Error;

    fn render(&mut self, view: &DashboardView) -> Result<(), Self::Error>;
}

fn kpi_cards(report: &LeadReport) -> Vec<KpiCard> {
    vec![
        KpiCard {
            key: "leads_today",
            label: "Leads Approached Today",
            value: report.leads_today.to_string(),
            tone: CardTone::Neutral,
        },
        KpiCard {
            key: "total_no_response",
            label: "Leads Without Response",
            value: report.total_no_response.to_string(),
            tone: CardTone::Alert,
        },
        KpiCard {
            key: "percent_no_response",
            label: "% Without Response",
            value: format!("{:.1}%", report.percent_no_response),
            tone: CardTone::Alert,
        },
        KpiCard {
            key: "total_leads",
            label: "Total Leads",
            value: report.total_leads.to_string(),
            tone: CardTone::Success,
        },
    ]
}

fn daily_evolution(report: &LeadReport) -> Option<LineChart> {
    if report.leads_by_day.is_empty() {
        return None;
    }

    Some(LineChart {
        title: "Daily Lead Evolution",
        x_title: "Day",
        y_title: "Number of Leads",
        color: LINE_COLOR,
        points: report
            .leads_by_day
            .iter()
            .map(|entry| LinePoint {
                label: entry.label.clone(),
                value: entry.leads,
            })
            .collect(),
    })
}

fn channel_performance(report: &LeadReport) -> Option<DonutChart> {
    let mean = report.mean_return_rate()?;

    Some(DonutChart {
        title: "Leads That Responded",
        slices: report
            .channel_stats
            .iter()
            .zip(PALETTE.iter().copied().cycle())
            .map(|(stat, color)| DonutSlice {
                label: stat.channel.clone(),
                value: stat.return_rate,
                color,
                detail: Some(format!("{} leads", stat.total_leads)),
            })
            .collect(),
        center_label: "Average Rate",
        center_value: format!("{mean:.1}%"),
    })
}

fn segments_no_response(report: &LeadReport) -> Option<DonutChart> {
    if report.segment_no_response.is_empty() {
        return None;
    }

    Some(DonutChart {
        title: "Leads That Did Not Respond",
        slices: report
            .segment_no_response
            .iter()
            .zip(PALETTE.iter().copied().cycle())
            .map(|(stat, color)| DonutSlice {
                label: stat.segment.clone(),
                value: stat.no_response as f64,
                color,
                detail: None,
            })
            .collect(),
        center_label: "Total",
        center_value: report.segment_no_response_total().to_string(),
    })
}
