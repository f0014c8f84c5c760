#![forbid(unsafe_code)]

use std::{
    env,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hatdraw_adapter::{
    app_ui_assets, service_error_body, service_error_status, AdapterRuntime, ErrorDto,
    SelectOkDto, ALREADY_SELECTED_MESSAGE, SELECT_SUCCESS_MESSAGE,
};
use hatdraw_service::SelectOutcome;

type SharedRuntime = Arc<Mutex<AdapterRuntime>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = parse_port_from_env();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let runtime = Arc::new(Mutex::new(AdapterRuntime::default_from_env()?));
    let app = Router::new()
        .route("/", get(app_index))
        .route("/app.css", get(app_css))
        .route("/app.js", get(app_js))
        .route("/api/names", get(get_names))
        .route("/api/stats", get(get_stats))
        .route("/api/select", post(post_select))
        .route("/api/reset", post(post_reset))
        .with_state(runtime);

    println!("hatdraw_adapter_http listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn parse_port_from_env() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|v| v.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(3000)
}

async fn app_index() -> Html<&'static str> {
    Html(app_ui_assets::INDEX_HTML)
}

async fn app_css() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        app_ui_assets::APP_CSS,
    )
}

async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        app_ui_assets::APP_JS,
    )
}

async fn get_names(State(runtime): State<SharedRuntime>) -> Response {
    let runtime = match runtime.lock() {
        Ok(runtime) => runtime,
        Err(_) => return lock_poisoned_response(),
    };
    match runtime.names_report() {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => {
            (service_error_status(&err), Json(service_error_body(&err))).into_response()
        }
    }
}

async fn get_stats(State(runtime): State<SharedRuntime>) -> Response {
    let runtime = match runtime.lock() {
        Ok(runtime) => runtime,
        Err(_) => return lock_poisoned_response(),
    };
    match runtime.stats_report() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => {
            (service_error_status(&err), Json(service_error_body(&err))).into_response()
        }
    }
}

async fn post_select(
    State(runtime): State<SharedRuntime>,
    body: Option<Json<serde_json::Value>>,
) -> Response {
    let name_id = body
        .as_ref()
        .and_then(|Json(value)| value.get("nameId"))
        .and_then(serde_json::Value::as_i64);

    let mut runtime = match runtime.lock() {
        Ok(runtime) => runtime,
        Err(_) => return lock_poisoned_response(),
    };
    match runtime.select_name(name_id) {
        Ok(SelectOutcome::Selected { .. }) => (
            StatusCode::OK,
            Json(SelectOkDto {
                success: true,
                message: SELECT_SUCCESS_MESSAGE.to_string(),
            }),
        )
            .into_response(),
        Ok(SelectOutcome::AlreadyClaimed { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorDto {
                error: ALREADY_SELECTED_MESSAGE.to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            (service_error_status(&err), Json(service_error_body(&err))).into_response()
        }
    }
}

async fn post_reset(State(runtime): State<SharedRuntime>) -> Response {
    let mut runtime = match runtime.lock() {
        Ok(runtime) => runtime,
        Err(_) => return lock_poisoned_response(),
    };
    match runtime.reset_claims() {
        Ok(reset) => (StatusCode::OK, Json(reset)).into_response(),
        Err(err) => {
            (service_error_status(&err), Json(service_error_body(&err))).into_response()
        }
    }
}

fn lock_poisoned_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorDto {
            error: "adapter runtime lock poisoned".to_string(),
        }),
    )
        .into_response()
}
