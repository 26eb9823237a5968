//! Port for turning a period report into chart artifacts.

use sentira_types::report::{ChartKind, PeriodReport, RenderedChart};

const ALL_KINDS: [ChartKind; 5] = [
    ChartKind::EmotionTrajectory,
    ChartKind::MemoryDistribution,
    ChartKind::WeekdayActivity,
    ChartKind::PersonaStrength,
    ChartKind::PadTrends,
];

/// Renders charts from an assembled report. Implementations must yield a
/// well-formed artifact for every kind even when the report carries no
/// data for it.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, kind: ChartKind, report: &PeriodReport) -> RenderedChart;

    fn render_all(&self, report: &PeriodReport) -> Vec<RenderedChart> {
        ALL_KINDS.iter().map(|&kind| self.render(kind, report)).collect()
    }
}
