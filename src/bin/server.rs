use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    process::ExitCode,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use sales_report::{
    AppState, DEFAULT_SEED_URL, MonthPolicy, PaginationConfig, SeedSource, build_router, close_db,
    graceful_shutdown, logging_middleware, reseed,
};

/// The JSON API server for browsing and summarising sales transactions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The address to serve the API from.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The URL of the JSON array of transactions loaded by `/initialize-db`.
    #[arg(long, default_value = DEFAULT_SEED_URL)]
    seed_url: String,

    /// Load the seed data before the server starts accepting requests.
    #[arg(long)]
    seed_on_start: bool,

    /// Treat a missing month as "every month" instead of rejecting the request.
    #[arg(long)]
    optional_month: bool,

    /// The number of transactions per page when a request does not specify one.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    page_size: u64,

    /// Log the body of every request and response.
    #[arg(long)]
    log_bodies: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from((args.host, args.port));

    let conn = match Connection::open(&args.db_path) {
        Ok(conn) => conn,
        Err(error) => {
            tracing::error!("Could not open database at {}: {error}", args.db_path);
            return ExitCode::FAILURE;
        }
    };

    let month_policy = if args.optional_month {
        MonthPolicy::Optional
    } else {
        MonthPolicy::Required
    };
    let pagination_config = PaginationConfig {
        default_page_size: args.page_size,
        ..Default::default()
    };

    let state = match AppState::new(
        conn,
        SeedSource::new(&args.seed_url),
        pagination_config,
        month_policy,
    ) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize the database: {error}");
            return ExitCode::FAILURE;
        }
    };

    if args.seed_on_start {
        match reseed(&state.seed_source, &state.db_connection).await {
            Ok(count) => tracing::info!(
                "Loaded {count} transactions from {}",
                state.seed_source.url()
            ),
            Err(error) => {
                tracing::error!("Could not load seed data: {error}");
                return ExitCode::FAILURE;
            }
        }
    }

    let db_connection = state.db_connection.clone();

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state);
    let router = if args.log_bodies {
        router.layer(middleware::from_fn(logging_middleware))
    } else {
        router
    };
    let router = add_tracing_layer(router);

    tracing::info!("HTTP server listening on {}", addr);
    let served = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await;

    let mut exit_code = ExitCode::SUCCESS;

    if let Err(error) = served {
        tracing::error!("Server error: {error}");
        exit_code = ExitCode::FAILURE;
    }

    if let Err(error) = close_db(db_connection) {
        tracing::error!("Could not close the database: {error}");
        exit_code = ExitCode::FAILURE;
    }

    exit_code
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let debug_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .map(|log_file| {
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(Arc::new(log_file))
        });

    let debug_log = match debug_log {
        Ok(layer) => Some(layer.with_filter(filter::LevelFilter::DEBUG)),
        Err(error) => {
            eprintln!("Could not create log file, logging to stdout only: {error}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(filter::LevelFilter::INFO))
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
