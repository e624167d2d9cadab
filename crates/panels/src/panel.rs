use crate::format::{format_fixed2, format_inr, format_pct, format_plain};
use calculators::{
    AdvancedRoiReport, AverageReport, CagrReport, EmiReport, PercentageReport, PivotReport,
    RoiReport, SwpReport, TargetAverageReport, WealthReport,
};
use core_types::{LevelKind, Tone};
use serde::Serialize;

/// How a panel is laid out when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelLayout {
    /// Label/value rows.
    Rows,
    /// A support/resistance table.
    PivotTable,
}

/// One labelled value in a result panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelRow {
    pub label: String,
    pub value: String,
    pub tone: Tone,
    /// Summary rows are visually emphasised.
    pub total: bool,
    pub level: Option<LevelKind>,
}

impl PanelRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            tone: Tone::Neutral,
            total: false,
            level: None,
        }
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn total(mut self) -> Self {
        self.total = true;
        self
    }
}

/// The formatted content of a calculator's result box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPanel {
    pub layout: PanelLayout,
    pub rows: Vec<PanelRow>,
    /// A muted footnote, or the whole message when there are no rows.
    pub note: Option<String>,
}

impl ResultPanel {
    pub fn rows(rows: Vec<PanelRow>) -> Self {
        Self {
            layout: PanelLayout::Rows,
            rows,
            note: None,
        }
    }

    pub fn message(note: impl Into<String>) -> Self {
        Self {
            layout: PanelLayout::Rows,
            rows: Vec::new(),
            note: Some(note.into()),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Conversion from a calculator report into its display panel.
pub trait IntoPanel {
    fn to_panel(&self) -> ResultPanel;
}

impl IntoPanel for AverageReport {
    fn to_panel(&self) -> ResultPanel {
        ResultPanel::rows(vec![
            PanelRow::new("Total Units", format_plain(self.total_quantity)),
            PanelRow::new("Total Cost", format_inr(self.total_cost)),
            PanelRow::new("Average Price", format_inr(self.average_price)).total(),
        ])
    }
}

impl IntoPanel for TargetAverageReport {
    fn to_panel(&self) -> ResultPanel {
        match self {
            TargetAverageReport::Achievable { buy_quantity, investment } => ResultPanel::rows(vec![
                PanelRow::new("Buy Quantity", format!("{} Shares", format_plain(*buy_quantity)))
                    .tone(Tone::Primary),
                PanelRow::new("Investment Needed", format_inr(*investment)),
            ])
            .with_note("(Approximate to nearest share)"),
            TargetAverageReport::Unreachable { hint } => ResultPanel::message(hint.message()),
        }
    }
}

impl IntoPanel for RoiReport {
    fn to_panel(&self) -> ResultPanel {
        ResultPanel::rows(vec![
            PanelRow::new("Invested Amount", format_inr(self.invested)),
            PanelRow::new("Final Value", format_inr(self.current)),
            PanelRow::new("Profit / Loss", format_inr(self.profit)).tone(self.tone).total(),
            PanelRow::new("ROI", format_pct(self.roi_pct)).tone(self.tone).total(),
        ])
    }
}

impl IntoPanel for AdvancedRoiReport {
    fn to_panel(&self) -> ResultPanel {
        ResultPanel::rows(vec![
            PanelRow::new("Gross P/L", format_inr(self.gross_profit)),
            PanelRow::new("Est. Charges", format!("-{}", format_inr(self.charges))).tone(Tone::Loss),
            PanelRow::new("Net P/L", format_inr(self.net_profit)).tone(self.tone).total(),
            PanelRow::new("Net ROI", format_pct(self.net_roi_pct)).tone(self.tone).total(),
        ])
    }
}

impl IntoPanel for EmiReport {
    fn to_panel(&self) -> ResultPanel {
        ResultPanel::rows(vec![
            PanelRow::new("Principal Amount", format_inr(self.principal)),
            PanelRow::new("Total Interest", format_inr(self.total_interest)),
            PanelRow::new("Total Amount", format_inr(self.total_amount)),
            PanelRow::new("Monthly EMI", format_inr(self.monthly_emi)).total(),
        ])
    }
}

impl IntoPanel for PercentageReport {
    fn to_panel(&self) -> ResultPanel {
        let heading = format!("{}% of {} is", format_plain(self.percent), format_plain(self.base));
        ResultPanel::rows(vec![PanelRow::new(heading, format_fixed2(self.result)).total()])
            .with_note(format!("(Total value is {})", format_inr(self.total_value)))
    }
}

impl IntoPanel for WealthReport {
    fn to_panel(&self) -> ResultPanel {
        ResultPanel::rows(vec![
            PanelRow::new("Invested Amount", format_inr(self.invested)).tone(Tone::Primary),
            PanelRow::new("Est. Returns", format_inr(self.estimated_returns)).tone(Tone::Profit),
            PanelRow::new("Total Value", format_inr(self.total_value)).total(),
        ])
    }
}

impl IntoPanel for SwpReport {
    fn to_panel(&self) -> ResultPanel {
        let panel = ResultPanel::rows(vec![
            PanelRow::new("Total Investment", format_inr(self.initial_corpus)),
            PanelRow::new("Total Withdrawn", format_inr(self.total_withdrawn)).tone(Tone::Primary),
            PanelRow::new("Final Balance", format_inr(self.final_balance)).total(),
        ]);
        if self.exhausted {
            panel.with_note(format!("(Corpus exhausted after {} months)", self.months_elapsed))
        } else {
            panel
        }
    }
}

impl IntoPanel for CagrReport {
    fn to_panel(&self) -> ResultPanel {
        ResultPanel::rows(vec![
            PanelRow::new("Absolute Return", format_pct(self.absolute_return_pct)),
            PanelRow::new("CAGR", format_pct(self.cagr_pct)).tone(self.tone).total(),
        ])
        .with_note("(Avg Annual Growth Rate)")
    }
}

impl IntoPanel for PivotReport {
    fn to_panel(&self) -> ResultPanel {
        let rows = self
            .levels
            .iter()
            .map(|level| PanelRow {
                label: level.label(),
                value: format_inr(level.value),
                tone: match level.kind {
                    LevelKind::Resistance => Tone::Loss,
                    LevelKind::Pivot => Tone::Primary,
                    LevelKind::Support => Tone::Profit,
                },
                total: level.kind == LevelKind::Pivot,
                level: Some(level.kind),
            })
            .collect();
        ResultPanel {
            layout: PanelLayout::PivotTable,
            rows,
            note: None,
        }
    }
}
