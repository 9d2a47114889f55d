//! Analytics module
//!
//! Provides the monthly views over the stored transactions: sale statistics,
//! a price-range histogram, a per-category breakdown, and all three combined.

mod category;
mod handlers;
mod price_range;
mod statistics;

pub use handlers::{
    get_bar_chart_endpoint, get_combined_data_endpoint, get_pie_chart_endpoint,
    get_statistics_endpoint,
};
