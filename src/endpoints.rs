//! The API endpoints URIs.

/// The route for replacing the database contents with the seed data.
pub const INITIALIZE_DB: &str = "/initialize-db";
/// The route for listing transactions a page at a time.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the monthly sales statistics.
pub const STATISTICS: &str = "/statistics";
/// The route for the number of transactions in each price range.
pub const BAR_CHART: &str = "/bar-chart";
/// The route for the number of transactions in each category.
pub const PIE_CHART: &str = "/pie-chart";
/// The route for the statistics, bar chart and pie chart in one response.
pub const COMBINED_DATA: &str = "/combined-data";
