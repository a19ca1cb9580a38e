use clap::Args;
use lead_insights::config::AppConfig;
use lead_insights::error::AppError;
use lead_insights::telemetry;
use lead_insights::workflows::outreach::presenter::DonutChart;
use lead_insights::workflows::outreach::{DashboardView, LeadLoader, RenderSummary};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DashboardArgs {
    /// Spreadsheet to read instead of the configured source
    #[arg(long)]
    pub(crate) source: Option<PathBuf>,
    /// Worksheet name; defaults to the first sheet
    #[arg(long)]
    pub(crate) sheet: Option<String>,
    /// Print the dashboard view as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let DashboardArgs {
        source,
        sheet,
        json,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(source) = source {
        config.leads.source_path = source;
    }
    if sheet.is_some() {
        config.leads.sheet = sheet;
    }
    telemetry::init(&config.telemetry)?;

    let loader = LeadLoader::from_config(&config.leads);
    let outcome = loader.load(&config.leads.source_path);
    let view = DashboardView::from_outcome(outcome.as_ref());

    let stdout = io::stdout();
    if json {
        JsonRenderer::new(stdout.lock()).render(&view)?;
    } else {
        ConsoleRenderer::new(stdout.lock()).render(&view)?;
    }
    Ok(())
}

/// Plain-text dashboard for terminals.
pub(crate) struct ConsoleRenderer<W: Write> {
    out: W,
}

impl<W: Write> ConsoleRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    fn render_donut(&mut self, chart: &DonutChart, unit: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "\n{} ({}: {})",
            chart.title, chart.center_label, chart.center_value
        )?;
        for slice in &chart.slices {
            match &slice.detail {
                Some(detail) => writeln!(
                    self.out,
                    "- {}: {:.1}{unit} ({detail})",
                    slice.label, slice.value
                )?,
                None => writeln!(self.out, "- {}: {}{unit}", slice.label, slice.value)?,
            }
        }
        Ok(())
    }
}

impl<W: Write> RenderSummary for ConsoleRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, view: &DashboardView) -> Result<(), Self::Error> {
        writeln!(self.out, "{}", view.title)?;

        if let Some(warning) = &view.warning {
            writeln!(self.out, "\nWarning: {}", warning.headline)?;
            for check in &warning.checks {
                writeln!(self.out, "- {check}")?;
            }
            return self.out.flush();
        }

        writeln!(self.out)?;
        for card in &view.kpis {
            writeln!(self.out, "{}: {}", card.label, card.value)?;
        }
        if view.dropped_rows > 0 {
            writeln!(
                self.out,
                "({} rows skipped: approach date not readable)",
                view.dropped_rows
            )?;
        }

        if let Some(chart) = &view.charts.daily_evolution {
            writeln!(self.out, "\n{}", chart.title)?;
            for point in &chart.points {
                writeln!(self.out, "- {}: {}", point.label, point.value)?;
            }
        }
        if let Some(chart) = &view.charts.channel_performance {
            self.render_donut(chart, "%")?;
        }
        if let Some(chart) = &view.charts.segments_no_response {
            self.render_donut(chart, "")?;
        }

        if let Some(insights) = &view.insights {
            writeln!(self.out, "\nInsights")?;
            writeln!(self.out, "{}", insights.message())?;
        }

        self.out.flush()
    }
}

pub(crate) struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderSummary for JsonRenderer<W> {
    type Error = AppError;

    fn render(&mut self, view: &DashboardView) -> Result<(), Self::Error> {
        serde_json::to_writer_pretty(&mut self.out, view)?;
        writeln!(self.out)?;
        Ok(())
    }
}
