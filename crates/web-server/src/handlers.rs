use crate::{error::AppError, AppState};
use axum::{
    extract::State,
    response::Html,
    Json,
};
use calculators::{AverageReport, CalcError, StockEntry};
use chrono::Utc;
use core_types::{parse_number, PivotMethod};
use news::NewsUpdate;
use panels::{format_grouped, render_html, IntoPanel, ResultPanel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A form field as sent by the page: text, a JSON number, or nothing.
/// Text is read leniently, like a browser's `parseFloat`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Text(String),
    Number(serde_json::Number),
    #[default]
    Missing,
}

impl RawField {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            RawField::Text(text) => parse_number(Some(text.as_str())),
            RawField::Number(number) => parse_number(Some(number.to_string().as_str())),
            RawField::Missing => None,
        }
    }

    /// The value, with anything missing or unreadable counted as zero.
    pub fn or_zero(&self) -> Decimal {
        self.value().unwrap_or_default()
    }
}

/// The body of every `/api/calc/*` response.
///
/// `visible: false` means the inputs are incomplete and the page should hide
/// its result box.
#[derive(Debug, Serialize)]
pub struct CalcResponse<R> {
    pub visible: bool,
    pub report: Option<R>,
    pub panel: Option<ResultPanel>,
    pub html: String,
}

impl<R> CalcResponse<R> {
    fn hidden() -> Self {
        Self {
            visible: false,
            report: None,
            panel: None,
            html: String::new(),
        }
    }
}

fn respond<R: IntoPanel>(result: Result<R, CalcError>) -> Result<CalcResponse<R>, AppError> {
    match result {
        Ok(report) => {
            let panel = report.to_panel();
            Ok(CalcResponse {
                visible: true,
                html: render_html(&panel),
                panel: Some(panel),
                report: Some(report),
            })
        }
        Err(e) if e.is_incomplete() => {
            tracing::debug!(reason = %e, "Hiding result panel.");
            Ok(CalcResponse::hidden())
        }
        Err(e) => Err(e.into()),
    }
}

// --- Stock average ---

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EntryFields {
    pub quantity: RawField,
    pub price: RawField,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StockAverageRequest {
    pub entries: Vec<EntryFields>,
}

#[derive(Debug, Serialize)]
pub struct StockAverageResponse {
    #[serde(flatten)]
    pub result: CalcResponse<AverageReport>,
    /// The "Invested:" figure under each row, in request order.
    pub row_invested: Vec<String>,
}

/// # POST /api/calc/stock-average
pub async fn stock_average(
    Json(req): Json<StockAverageRequest>,
) -> Result<Json<StockAverageResponse>, AppError> {
    let entries: Vec<StockEntry> = req
        .entries
        .iter()
        .map(|e| StockEntry::new(e.quantity.or_zero(), e.price.or_zero()))
        .collect();
    let row_invested = entries.iter().map(|e| format_grouped(e.invested())).collect();
    let result = respond(calculators::stock_average(&entries))?;
    Ok(Json(StockAverageResponse { result, row_invested }))
}

// --- Target average ---

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TargetAverageRequest {
    pub quantity: RawField,
    pub current_average: RawField,
    pub new_price: RawField,
    pub desired_average: RawField,
}

/// # POST /api/calc/target-average
pub async fn target_average(
    Json(req): Json<TargetAverageRequest>,
) -> Result<Json<CalcResponse<calculators::TargetAverageReport>>, AppError> {
    respond(calculators::target_average(
        req.quantity.or_zero(),
        req.current_average.or_zero(),
        req.new_price.or_zero(),
        req.desired_average.or_zero(),
    ))
    .map(Json)
}

// --- ROI ---

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoiRequest {
    pub invested: RawField,
    pub current: RawField,
}

/// # POST /api/calc/roi
pub async fn roi(
    Json(req): Json<RoiRequest>,
) -> Result<Json<CalcResponse<calculators::RoiReport>>, AppError> {
    respond(calculators::roi(req.invested.value(), req.current.value())).map(Json)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdvancedRoiRequest {
    pub invested: RawField,
    pub current: RawField,
    pub charge_pct: RawField,
    pub flat_charge: RawField,
}

/// # POST /api/calc/roi-advanced
pub async fn roi_advanced(
    Json(req): Json<AdvancedRoiRequest>,
) -> Result<Json<CalcResponse<calculators::AdvancedRoiReport>>, AppError> {
    respond(calculators::advanced_roi(
        req.invested.or_zero(),
        req.current.or_zero(),
        req.charge_pct.or_zero(),
        req.flat_charge.or_zero(),
    ))
    .map(Json)
}

// --- Loans and percentages ---

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmiRequest {
    pub principal: RawField,
    pub rate: RawField,
    pub months: RawField,
}

/// # POST /api/calc/emi
pub async fn emi(
    Json(req): Json<EmiRequest>,
) -> Result<Json<CalcResponse<calculators::EmiReport>>, AppError> {
    respond(calculators::emi(req.principal.or_zero(), req.rate.or_zero(), req.months.or_zero()))
        .map(Json)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PercentageRequest {
    pub percent: RawField,
    pub base: RawField,
}

/// # POST /api/calc/percentage
pub async fn percentage(
    Json(req): Json<PercentageRequest>,
) -> Result<Json<CalcResponse<calculators::PercentageReport>>, AppError> {
    respond(calculators::percentage(req.percent.value(), req.base.value())).map(Json)
}

// --- Wealth projections ---

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GrowthRequest {
    pub amount: RawField,
    pub rate: RawField,
    pub years: RawField,
}

/// # POST /api/calc/sip
/// `amount` is the monthly instalment.
pub async fn sip(
    Json(req): Json<GrowthRequest>,
) -> Result<Json<CalcResponse<calculators::WealthReport>>, AppError> {
    respond(calculators::sip(req.amount.or_zero(), req.rate.or_zero(), req.years.or_zero())).map(Json)
}

/// # POST /api/calc/lumpsum
pub async fn lumpsum(
    Json(req): Json<GrowthRequest>,
) -> Result<Json<CalcResponse<calculators::WealthReport>>, AppError> {
    respond(calculators::lumpsum(req.amount.or_zero(), req.rate.or_zero(), req.years.or_zero()))
        .map(Json)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SwpRequest {
    pub corpus: RawField,
    pub withdrawal: RawField,
    pub rate: RawField,
    pub years: RawField,
}

/// # POST /api/calc/swp
pub async fn swp(
    Json(req): Json<SwpRequest>,
) -> Result<Json<CalcResponse<calculators::SwpReport>>, AppError> {
    respond(calculators::swp(
        req.corpus.or_zero(),
        req.withdrawal.or_zero(),
        req.rate.or_zero(),
        req.years.or_zero(),
    ))
    .map(Json)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CagrRequest {
    pub initial: RawField,
    #[serde(rename = "final")]
    pub final_value: RawField,
    pub years: RawField,
}

/// # POST /api/calc/cagr
pub async fn cagr(
    Json(req): Json<CagrRequest>,
) -> Result<Json<CalcResponse<calculators::CagrReport>>, AppError> {
    respond(calculators::cagr(req.initial.or_zero(), req.final_value.or_zero(), req.years.or_zero()))
        .map(Json)
}

// --- Pivot points ---

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PivotRequest {
    pub high: RawField,
    pub low: RawField,
    pub close: RawField,
    pub open: RawField,
    pub method: Option<String>,
}

/// # POST /api/calc/pivot
/// An unknown or missing method is treated as classic.
pub async fn pivot(
    Json(req): Json<PivotRequest>,
) -> Result<Json<CalcResponse<calculators::PivotReport>>, AppError> {
    let method = req
        .method
        .as_deref()
        .and_then(|m| m.parse::<PivotMethod>().ok())
        .unwrap_or_default();
    respond(calculators::pivot_points(
        req.high.or_zero(),
        req.low.or_zero(),
        req.close.or_zero(),
        req.open.or_zero(),
        method,
    ))
    .map(Json)
}

// --- News ---

/// # GET /api/news
pub async fn get_news(State(state): State<Arc<AppState>>) -> Json<NewsUpdate> {
    Json(state.current_news().await)
}

/// # GET /api/news/ticker
/// The ticker fragment, or the "unavailable" item when there is nothing to show.
pub async fn get_news_ticker(State(state): State<Arc<AppState>>) -> Html<String> {
    let update = state.current_news().await;
    if update.items().is_empty() {
        Html(panels::unavailable_html())
    } else {
        Html(panels::render_ticker_html(update.items()))
    }
}

/// # GET /api/news/cards
pub async fn get_news_cards(State(state): State<Arc<AppState>>) -> Html<String> {
    let update = state.current_news().await;
    Html(panels::render_news_cards_html(update.items(), Utc::now()))
}
