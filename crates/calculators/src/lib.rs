//! # finkit Calculators
//!
//! The formulas behind every calculator screen: stock and target averaging,
//! ROI, EMI, percentages, SIP/lumpsum/SWP projections, CAGR and pivot points.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   terminals, HTML or the network. It depends only on `core-types`.
//! - **Stateless Calculation:** Every calculator is a free function that takes
//!   already-parsed `Decimal` inputs and returns a typed report.
//! - **Hidden, not failed:** A missing or zero required input yields
//!   `CalcError::Incomplete`, which the front-ends treat as "hide the result
//!   panel" rather than as an error to show.

// Declare the modules that constitute this crate.
pub mod average;
pub mod cagr;
pub mod emi;
pub mod error;
mod math;
pub mod percentage;
pub mod pivot;
pub mod roi;
pub mod wealth;

// Re-export the key components to create a clean, public-facing API.
pub use average::{stock_average, target_average, AverageReport, StockEntry, TargetAverageReport, TargetHint};
pub use cagr::{cagr, CagrReport};
pub use emi::{emi, EmiReport};
pub use error::CalcError;
pub use percentage::{percentage, PercentageReport};
pub use pivot::{pivot_points, PivotLevel, PivotReport};
pub use roi::{advanced_roi, roi, AdvancedRoiReport, RoiReport};
pub use wealth::{lumpsum, sip, swp, SwpReport, WealthReport, MAX_SWP_MONTHS};
