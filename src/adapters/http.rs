use crate::config::pages::PageStore;
use crate::config::{AppSettings, UpstreamSettings};
use crate::core::advisor::Advisor;
use crate::core::credentials::CredentialResolver;
use crate::core::highlight::{current_page_filename, PageDecorator, DEFAULT_INDEX_PAGE, PAGE_EXTENSION};
use crate::core::openai::OpenAiClient;
use crate::domain::model::Answers;
use crate::utils::error::Result;
use axum::{
    body::{self, Body},
    extract::{Path, State},
    http::{Method, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};

pub type DefaultAdvisor = Advisor<OpenAiClient<UpstreamSettings>>;

pub struct AppState {
    pub advisor: DefaultAdvisor,
    pub pages: PageStore,
    pub decorator: PageDecorator,
    pub body_limit_bytes: usize,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(settings: &AppSettings, resolver: CredentialResolver) -> Result<Self> {
        let client = OpenAiClient::new(settings.upstream.clone())?;
        Ok(Self {
            advisor: Advisor::new(resolver, client),
            pages: PageStore::new(settings.pages_dir.clone()),
            decorator: settings.highlighter.decorator()?,
            body_limit_bytes: settings.body_limit_bytes,
        })
    }
}

pub async fn serve(settings: AppSettings) -> anyhow::Result<()> {
    let bind: SocketAddr = settings.bind;
    let state = Arc::new(AppState::new(&settings, CredentialResolver::default())?);
    let router = build_router(state);

    tracing::info!(
        %bind,
        pages = %settings.pages_dir.display(),
        model = %settings.upstream.model,
        "🚀 Binding HTTP listener"
    );
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("HTTP server exited");
    Ok(())
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/recommend", any(recommend))
        .route("/healthz", get(health))
        .route("/", get(index_page))
        .route("/:page", get(page))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn health() -> impl IntoResponse {
    "ok"
}

/// 讀完整個 body 後解析一次；任何失敗都視為空物件
async fn read_json_body(body: Body, limit: usize) -> Value {
    let bytes = match body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to read request body: {}", e);
            return Value::Object(Map::new());
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) => Value::Object(Map::new()),
        Err(e) => {
            if !bytes.is_empty() {
                tracing::debug!("Request body is not valid JSON: {}", e);
            }
            Value::Object(Map::new())
        }
    }
}

async fn recommend(State(state): State<SharedState>, request: Request<Body>) -> Response {
    if request.method() != Method::POST {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }

    let body = read_json_body(request.into_body(), state.body_limit_bytes).await;
    let answers = Answers::from_body(&body);

    match state.advisor.advise(&answers).await {
        Ok(advice) => (StatusCode::OK, Json(advice.into_json())).into_response(),
        Err(e) => {
            tracing::error!("❌ Recommendation failed: {}", e);
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, e.user_friendly_message()).into_response()
        }
    }
}

async fn index_page(State(state): State<SharedState>) -> Response {
    render_page(&state, DEFAULT_INDEX_PAGE).await
}

async fn page(State(state): State<SharedState>, Path(name): Path<String>) -> Response {
    render_page(&state, &name).await
}

async fn render_page(state: &AppState, name: &str) -> Response {
    if !PageStore::is_page_name(name, PAGE_EXTENSION) {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let source = match state.pages.read_page(name).await {
        Ok(source) => source,
        Err(e) => {
            tracing::debug!("Page {} not served: {}", name, e);
            return (StatusCode::NOT_FOUND, "Not found").into_response();
        }
    };

    let current = current_page_filename(name, DEFAULT_INDEX_PAGE);
    Html(state.decorator.decorate_html(&source, &current)).into_response()
}
