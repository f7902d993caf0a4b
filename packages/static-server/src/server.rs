use axum::{
    body::Body,
    extract::{Path as AxumPath, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Index files tried, in order, when a directory is requested
const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Extensions tried, in order, for extensionless paths (`/about` -> `about.html`)
const FALLBACK_EXTENSIONS: [&str; 2] = ["html", "htm"];

/// Configuration for the static file worker
#[derive(Debug, Clone)]
pub struct StaticServerConfig {
    pub root_path: PathBuf,
    pub port: u16,
}

impl StaticServerConfig {
    pub fn new(root_path: PathBuf, port: u16) -> Self {
        Self { root_path, port }
    }
}

/// Static file server for one managed directory
pub struct StaticServer {
    config: StaticServerConfig,
}

impl StaticServer {
    pub fn new(config: StaticServerConfig) -> Self {
        Self { config }
    }

    /// Bind the wildcard interface and serve until the process is stopped
    pub async fn start(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.config.port));
        let root = self.config.root_path.clone();

        let listener = TcpListener::bind(addr).await?;
        info!("Static server running at http://localhost:{}", self.config.port);
        info!("Serving files from: {}", root.display());

        axum::serve(listener, router(self.config)).await?;
        Ok(())
    }
}

/// Router serving `config.root_path` with directory-index, extension and
/// single-page-app fallbacks
pub fn router(config: StaticServerConfig) -> Router {
    let state = Arc::new(config);

    Router::new()
        .route("/", get(serve_index))
        .route("/{*path}", get(serve_file))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn serve_index(
    State(config): State<Arc<StaticServerConfig>>,
) -> Result<Response, StaticServerError> {
    serve_request(&config, "").await
}

async fn serve_file(
    AxumPath(path): AxumPath<String>,
    State(config): State<Arc<StaticServerConfig>>,
) -> Result<Response, StaticServerError> {
    serve_request(&config, &path).await
}

async fn serve_request(
    config: &StaticServerConfig,
    request_path: &str,
) -> Result<Response, StaticServerError> {
    debug!("Request: /{}", request_path);

    if let Some(file) = resolve(&config.root_path, request_path) {
        return serve_file_from_path(&file).await;
    }

    // Anything unmatched goes to the top-level index so client-side routing works
    let index_path = config.root_path.join("index.html");
    if index_path.is_file() {
        debug!("Serving index.html as fallback for /{}", request_path);
        return serve_file_from_path(&index_path).await;
    }

    debug!("index.html not found for fallback");
    Err(StaticServerError::NotFound {
        path: format!("/{}", request_path),
        root: config.root_path.display().to_string(),
    })
}

/// Maps a request path onto a file under `root`.
///
/// Paths that do not exist or that canonicalize outside `root` resolve to
/// `None`.
fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let canonical_root = root.canonicalize().ok()?;
    let relative = request_path.trim_start_matches('/');
    let requested = canonical_root.join(relative);

    if let Some(found) = within_root(&canonical_root, &requested) {
        if found.is_file() {
            return Some(found);
        }
        if found.is_dir() {
            return INDEX_FILES
                .iter()
                .map(|index| found.join(index))
                .find(|candidate| candidate.is_file());
        }
    }

    if requested.extension().is_none() && !relative.is_empty() {
        for ext in FALLBACK_EXTENSIONS {
            let candidate = requested.with_extension(ext);
            if let Some(found) = within_root(&canonical_root, &candidate) {
                if found.is_file() {
                    return Some(found);
                }
            }
        }
    }

    None
}

fn within_root(canonical_root: &Path, candidate: &Path) -> Option<PathBuf> {
    let canonical = candidate.canonicalize().ok()?;
    if canonical.starts_with(canonical_root) {
        Some(canonical)
    } else {
        warn!("Rejected path outside served directory: {}", candidate.display());
        None
    }
}

/// Serve a file from a specific filesystem path
async fn serve_file_from_path(file_path: &Path) -> Result<Response, StaticServerError> {
    let contents = tokio::fs::read(file_path)
        .await
        .map_err(|e| StaticServerError::IoError(format!("Failed to read file: {}", e)))?;

    let mut headers = HeaderMap::new();
    if let Ok(ct) = determine_content_type(file_path).parse() {
        headers.insert(header::CONTENT_TYPE, ct);
    }

    Ok((headers, contents).into_response())
}

/// Determine the MIME content type based on file extension
fn determine_content_type(file_path: &Path) -> &'static str {
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
        Some("json") | Some("map") => "application/json; charset=utf-8",
        Some("webmanifest") => "application/manifest+json",
        Some("xml") => "application/xml; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("wasm") => "application/wasm",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Error types for static server operations
#[derive(Debug)]
pub enum StaticServerError {
    NotFound { path: String, root: String },
    IoError(String),
}

impl IntoResponse for StaticServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            StaticServerError::NotFound { path, root } => (
                StatusCode::NOT_FOUND,
                format!(
                    "<h1>404 - Not Found</h1><p>The path {} was not found</p><p>Directory being served: {}</p>",
                    path, root
                ),
            ),
            StaticServerError::IoError(msg) => {
                error!("Static server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("<h1>500 - Internal Server Error</h1><p>{}</p>", msg),
                )
            }
        };

        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(Body::from(body))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Failed to build error response"))
                    .unwrap_or_default()
            })
    }
}
