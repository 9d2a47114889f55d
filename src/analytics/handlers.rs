//! Route handlers for the monthly analytics views.
//!
//! Each view is computed by a plain function that returns a value. The route
//! handlers validate the month, compute one or more views and send the only
//! response.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    month::{MonthPolicy, MonthQuery, resolve_month_filter},
    transaction::get_transactions_in_month,
};

use super::{
    category::{CategoryCount, get_category_counts},
    price_range::{PriceRangeCount, count_by_price_range},
    statistics::{Statistics, compute_statistics},
};

/// The state needed for the analytics endpoints.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Whether requests must name a month.
    pub month_policy: MonthPolicy,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            month_policy: state.month_policy,
        }
    }
}

/// The statistics, bar chart and pie chart for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    /// The sale totals.
    pub statistics: Statistics,
    /// The number of transactions in each price range.
    pub bar_chart: Vec<PriceRangeCount>,
    /// The number of transactions in each category.
    pub pie_chart: Vec<CategoryCount>,
}

/// Compute the sale statistics for `month`.
///
/// # Errors
/// Returns [Error::SqlError] if the transactions cannot be read.
pub(crate) fn get_statistics(
    month: Option<u8>,
    connection: &Connection,
) -> Result<Statistics, Error> {
    let transactions = get_transactions_in_month(month, connection)?;

    Ok(compute_statistics(&transactions))
}

/// Count the transactions in each price range for `month`.
///
/// # Errors
/// Returns [Error::SqlError] if the transactions cannot be read.
pub(crate) fn get_bar_chart(
    month: Option<u8>,
    connection: &Connection,
) -> Result<Vec<PriceRangeCount>, Error> {
    let transactions = get_transactions_in_month(month, connection)?;

    Ok(count_by_price_range(&transactions))
}

/// Count the transactions in each category for `month`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_pie_chart(
    month: Option<u8>,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    get_category_counts(month, connection)
}

/// Compute all three views for `month`.
///
/// The transactions for the month are read once and shared by the statistics
/// and the bar chart.
///
/// # Errors
/// Returns [Error::SqlError] if any of the queries fail.
pub(crate) fn get_combined_data(
    month: Option<u8>,
    connection: &Connection,
) -> Result<CombinedData, Error> {
    let transactions = get_transactions_in_month(month, connection)?;

    Ok(CombinedData {
        statistics: compute_statistics(&transactions),
        bar_chart: count_by_price_range(&transactions),
        pie_chart: get_category_counts(month, connection)?,
    })
}

/// Validate the month, lock the database and run `compute` against it.
///
/// The month is checked before the lock is taken, so an invalid month never
/// reaches the database.
fn with_month<T>(
    state: &AnalyticsState,
    query: &MonthQuery,
    compute: impl FnOnce(Option<u8>, &Connection) -> Result<T, Error>,
) -> Result<T, Error> {
    let month = resolve_month_filter(query.month.as_deref(), state.month_policy)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    compute(month, &*connection)
        .inspect_err(|error| tracing::error!("could not compute analytics: {error}"))
}

/// A route handler for the sale totals of a month.
pub async fn get_statistics_endpoint(
    State(state): State<AnalyticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, Error> {
    with_month(&state, &query, get_statistics).map(Json)
}

/// A route handler for the number of transactions in each price range of a month.
pub async fn get_bar_chart_endpoint(
    State(state): State<AnalyticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<PriceRangeCount>>, Error> {
    with_month(&state, &query, get_bar_chart).map(Json)
}

/// A route handler for the number of transactions in each category of a month.
pub async fn get_pie_chart_endpoint(
    State(state): State<AnalyticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, Error> {
    with_month(&state, &query, get_pie_chart).map(Json)
}

/// A route handler for the statistics, bar chart and pie chart of a month in one response.
pub async fn get_combined_data_endpoint(
    State(state): State<AnalyticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CombinedData>, Error> {
    with_month(&state, &query, get_combined_data).map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        db::initialize,
        endpoints,
        month::MonthPolicy,
        transaction::{NewTransaction, create_transactions},
    };

    use super::{
        AnalyticsState, get_bar_chart_endpoint, get_combined_data_endpoint,
        get_pie_chart_endpoint, get_statistics_endpoint,
    };

    fn get_test_state(month_policy: MonthPolicy) -> AnalyticsState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        create_transactions(
            &[
                NewTransaction::new(datetime!(2024-03-01 0:00 UTC))
                    .price(50.0)
                    .sold(true)
                    .category("electronics"),
                NewTransaction::new(datetime!(2024-03-15 0:00 UTC))
                    .price(250.0)
                    .sold(false)
                    .category("jewelery"),
                NewTransaction::new(datetime!(2023-07-15 0:00 UTC))
                    .price(950.0)
                    .sold(true)
                    .category("electronics"),
            ],
            &connection,
        )
        .expect("Could not create transactions");

        AnalyticsState {
            db_connection: Arc::new(Mutex::new(connection)),
            month_policy,
        }
    }

    fn get_test_server(state: AnalyticsState) -> TestServer {
        let app = Router::new()
            .route(endpoints::STATISTICS, get(get_statistics_endpoint))
            .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
            .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
            .route(endpoints::COMBINED_DATA, get(get_combined_data_endpoint))
            .with_state(state);

        TestServer::new(app)
    }

    fn expected_march_bar_chart() -> Value {
        json!([
            {"range": "0-100", "count": 1},
            {"range": "101-200", "count": 0},
            {"range": "201-300", "count": 1},
            {"range": "301-400", "count": 0},
            {"range": "401-500", "count": 0},
            {"range": "501-600", "count": 0},
            {"range": "601-700", "count": 0},
            {"range": "701-800", "count": 0},
            {"range": "801-900", "count": 0},
            {"range": "901-above", "count": 0}
        ])
    }

    #[tokio::test]
    async fn statistics_for_month() {
        let server = get_test_server(get_test_state(MonthPolicy::Required));

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "March")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "totalSaleAmount": 300.0,
            "totalSoldItems": 1,
            "totalNotSoldItems": 1
        }));
    }

    #[tokio::test]
    async fn bar_chart_for_month() {
        let server = get_test_server(get_test_state(MonthPolicy::Required));

        let response = server
            .get(endpoints::BAR_CHART)
            .add_query_param("month", "March")
            .await;

        response.assert_status_ok();
        response.assert_json(&expected_march_bar_chart());
    }

    #[tokio::test]
    async fn pie_chart_for_month() {
        let server = get_test_server(get_test_state(MonthPolicy::Required));

        let response = server
            .get(endpoints::PIE_CHART)
            .add_query_param("month", "March")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([
            {"_id": "electronics", "count": 1},
            {"_id": "jewelery", "count": 1}
        ]));
    }

    #[tokio::test]
    async fn combined_data_for_month() {
        let server = get_test_server(get_test_state(MonthPolicy::Required));

        let response = server
            .get(endpoints::COMBINED_DATA)
            .add_query_param("month", "March")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "statistics": {
                "totalSaleAmount": 300.0,
                "totalSoldItems": 1,
                "totalNotSoldItems": 1
            },
            "barChart": expected_march_bar_chart(),
            "pieChart": [
                {"_id": "electronics", "count": 1},
                {"_id": "jewelery", "count": 1}
            ]
        }));
    }

    #[tokio::test]
    async fn month_without_sales_gives_empty_views() {
        let server = get_test_server(get_test_state(MonthPolicy::Required));

        let body: Value = server
            .get(endpoints::COMBINED_DATA)
            .add_query_param("month", "February")
            .await
            .json();

        assert_eq!(body["statistics"]["totalSaleAmount"], 0.0);
        assert_eq!(body["barChart"].as_array().map(Vec::len), Some(10));
        assert_eq!(body["pieChart"], json!([]));
    }

    #[tokio::test]
    async fn optional_month_covers_every_month() {
        let server = get_test_server(get_test_state(MonthPolicy::Optional));

        let response = server.get(endpoints::STATISTICS).await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "totalSaleAmount": 1250.0,
            "totalSoldItems": 2,
            "totalNotSoldItems": 1
        }));
    }

    #[tokio::test]
    async fn every_endpoint_rejects_invalid_and_missing_month() {
        let server = get_test_server(get_test_state(MonthPolicy::Required));

        for endpoint in [
            endpoints::STATISTICS,
            endpoints::BAR_CHART,
            endpoints::PIE_CHART,
            endpoints::COMBINED_DATA,
        ] {
            let response = server
                .get(endpoint)
                .add_query_param("month", "Marchh")
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({"message": "Invalid month provided."}));

            server
                .get(endpoint)
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn invalid_month_never_queries_the_database() {
        // Without tables any query fails, so a 400 means no query was made.
        let state = AnalyticsState {
            db_connection: Arc::new(Mutex::new(Connection::open_in_memory().unwrap())),
            month_policy: MonthPolicy::Required,
        };
        let server = get_test_server(state);

        server
            .get(endpoints::COMBINED_DATA)
            .add_query_param("month", "Smarch")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get(endpoints::COMBINED_DATA)
            .add_query_param("month", "March")
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
