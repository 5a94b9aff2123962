//! HTTP surface.
//!
//! A small axum app holding the single review session. `GET /` renders the
//! current screen; every button POSTs one action, the handler applies it to
//! the session and answers `303 See Other` back to `/`.
//!
//! | Route | Effect |
//! |---|---|
//! | `GET /` | current screen |
//! | `POST /start`, `/skip`, `/order`, `/cancel` | one transition |
//! | `POST /confirm` | transition with form field `quantity` |
//! | `POST /restart` | reload the catalog, then transition |
//! | `GET /product/{index}/image` | normalized JPEG or 404 |
//! | `GET /order.pdf` | order document download |
//! | `GET /state` | JSON snapshot of the session |
//!
//! The session lives in a `Mutex` only because handlers share it across
//! tasks. Each request locks, applies one transition and releases. Image
//! decoding runs on the blocking pool.

use crate::catalog::{Catalog, load_catalog};
use crate::config::AppConfig;
use crate::export::{build_share_link, document_filename, render_document, share_message};
use crate::imaging::{NormalizeConfig, NormalizedImage, Normalizer, Quality, RustBackend, encode_jpeg};
use crate::session::{Action, SessionState};
use crate::view::{PageContext, render_page};
use axum::extract::{Form, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use maud::Markup;
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    session: Mutex<SessionState>,
    config: AppConfig,
    normalizer: Normalizer<RustBackend>,
}

impl AppState {
    /// Fresh session over `catalog`, with images and share settings from
    /// `config`.
    pub fn new(config: AppConfig, catalog: Catalog) -> Self {
        let normalizer = Normalizer::new(
            RustBackend::new(),
            config.images.dir.clone(),
            NormalizeConfig {
                size: config.images.size,
                ..NormalizeConfig::default()
            },
        );
        Self {
            session: Mutex::new(SessionState::new(catalog)),
            config,
            normalizer,
        }
    }

    fn session(&self) -> MutexGuard<'_, SessionState> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the session with the result of one transition.
    fn apply(&self, action: Action) {
        let mut session = self.session();
        let current = std::mem::take(&mut *session);
        *session = current.dispatch(action);
    }

    fn share_link(&self) -> String {
        let today = chrono::Local::now().date_naive();
        let message = share_message(&self.config.share.message, today);
        build_share_link(&message, self.config.share.recipient.as_deref())
    }
}

/// Build the router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/start", post(start))
        .route("/skip", post(skip))
        .route("/order", post(order))
        .route("/cancel", post(cancel))
        .route("/confirm", post(confirm))
        .route("/restart", post(restart))
        .route("/product/:index/image", get(product_image))
        .route("/order.pdf", get(order_pdf))
        .route("/state", get(session_snapshot))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load the catalog, bind and serve until Ctrl-C.
pub async fn serve(config: AppConfig) -> Result<(), ServerError> {
    let catalog = load_catalog(&config.catalog.path);
    let bind = config.server.bind.clone();
    let app = router(Arc::new(AppState::new(config, catalog)));

    let listener = TcpListener::bind(bind.as_str()).await?;
    tracing::info!(address = %listener.local_addr()?, "serving stock review");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn index(State(state): State<Arc<AppState>>) -> Markup {
    let session = state.session().clone();
    let has_image = match session.current_product() {
        Some(product) => image_is_usable(&state, product.image.clone()).await,
        None => false,
    };
    let ctx = PageContext {
        has_image,
        share_link: state.share_link(),
    };
    render_page(&session, &ctx)
}

/// Whether `reference` normalizes to an image. Decodes on the blocking pool,
/// so an unreadable file shows the placeholder instead of a broken image.
async fn image_is_usable(state: &Arc<AppState>, reference: String) -> bool {
    let worker = Arc::clone(state);
    match tokio::task::spawn_blocking(move || worker.normalizer.normalize(&reference).is_found())
        .await
    {
        Ok(found) => found,
        Err(e) => {
            tracing::error!(error = %e, "image check task failed");
            false
        }
    }
}

async fn start(State(state): State<Arc<AppState>>) -> Redirect {
    state.apply(Action::Start);
    Redirect::to("/")
}

async fn skip(State(state): State<Arc<AppState>>) -> Redirect {
    state.apply(Action::Skip);
    Redirect::to("/")
}

async fn order(State(state): State<Arc<AppState>>) -> Redirect {
    state.apply(Action::Order);
    Redirect::to("/")
}

async fn cancel(State(state): State<Arc<AppState>>) -> Redirect {
    state.apply(Action::Cancel);
    Redirect::to("/")
}

#[derive(Debug, Deserialize)]
struct ConfirmForm {
    quantity: i64,
}

async fn confirm(State(state): State<Arc<AppState>>, Form(form): Form<ConfirmForm>) -> Redirect {
    state.apply(Action::Confirm {
        quantity: form.quantity,
    });
    Redirect::to("/")
}

async fn restart(State(state): State<Arc<AppState>>) -> Redirect {
    let path = state.config.catalog.path.clone();
    match tokio::task::spawn_blocking(move || load_catalog(&path)).await {
        Ok(catalog) => state.apply(Action::Restart { catalog }),
        Err(e) => tracing::error!(error = %e, "catalog reload task failed"),
    }
    Redirect::to("/")
}

async fn product_image(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Response {
    let reference = match state.session().catalog.get(index) {
        Some(product) => product.image.clone(),
        None => return StatusCode::NOT_FOUND.into_response(),
    };

    let quality = Quality::new(state.config.images.quality);
    let worker = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || match worker.normalizer.normalize(&reference) {
        NormalizedImage::Found(img) => encode_jpeg(&img, quality).map(Some),
        NormalizedImage::Missing => Ok(None),
    })
    .await;

    match result {
        Ok(Ok(Some(bytes))) => ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response(),
        Ok(Ok(None)) => StatusCode::NOT_FOUND.into_response(),
        Ok(Err(e)) => {
            tracing::error!(index, error = %e, "could not encode image");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            tracing::error!(index, error = %e, "image task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn order_pdf(State(state): State<Arc<AppState>>) -> Response {
    let orders = state.session().orders.clone();
    let timestamp = chrono::Local::now().naive_local();

    match render_document(&orders, timestamp) {
        Ok(bytes) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                document_filename(timestamp)
            );
            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "could not render order document");
            (StatusCode::INTERNAL_SERVER_ERROR, "Could not generate the PDF").into_response()
        }
    }
}

async fn session_snapshot(State(state): State<Arc<AppState>>) -> Json<SessionState> {
    Json(state.session().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Screen;
    use crate::test_helpers::{catalog_of, create_test_jpeg, write_csv_catalog};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app_with(config: AppConfig, catalog: Catalog) -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::new(config, catalog));
        (router(Arc::clone(&state)), state)
    }

    fn scenario() -> (Router, Arc<AppState>) {
        app_with(
            AppConfig::default(),
            catalog_of(&[("Apples", "Fruit", "kg", ""), ("Milk", "Dairy", "l", "milk.jpg")]),
        )
    }

    async fn post(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::post(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_quantity(app: &Router, quantity: &str) -> Response {
        let request = Request::post("/confirm")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("quantity={quantity}")))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn actions_redirect_to_index() {
        let (app, _) = scenario();
        let response = post(&app, "/start").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn index_renders_current_screen() {
        let (app, _) = scenario();
        post(&app, "/start").await;

        let response = get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("<h2>Apples</h2>"));
    }

    #[tokio::test]
    async fn review_flow_over_http() {
        let (app, state) = scenario();
        post(&app, "/start").await;
        post(&app, "/skip").await;
        post(&app, "/order").await;
        post_quantity(&app, "2").await;

        let session = state.session().clone();
        assert_eq!(session.screen, Screen::Summary);
        assert_eq!(session.orders.len(), 1);
        assert_eq!(session.orders[0].name, "Milk");
        assert_eq!(session.orders[0].quantity, 2);
    }

    #[tokio::test]
    async fn confirm_rejects_non_numeric_quantity() {
        let (app, state) = scenario();
        post(&app, "/start").await;
        post(&app, "/order").await;

        let response = post_quantity(&app, "lots").await;
        assert!(response.status().is_client_error());
        assert_eq!(state.session().screen, Screen::Ordering);
    }

    #[tokio::test]
    async fn state_endpoint_returns_json() {
        let (app, _) = scenario();
        post(&app, "/start").await;

        let response = get(&app, "/state").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["screen"], "checking");
        assert_eq!(json["catalog"]["products"][1]["name"], "Milk");
    }

    #[tokio::test]
    async fn order_pdf_is_an_attachment() {
        let (app, _) = scenario();
        let response = get(&app, "/order.pdf").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");

        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"Order_"));
        assert!(disposition.ends_with(".pdf\""));
        assert!(body_bytes(response).await.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn product_image_is_square_jpeg() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("milk.jpg"), 90, 40);
        let mut config = AppConfig::default();
        config.images.dir = tmp.path().to_path_buf();
        config.images.size = 32;
        let (app, _) = app_with(config, catalog_of(&[("Milk", "Dairy", "l", "milk.jpg")]));

        let response = get(&app, "/product/0/image").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        let img = image::load_from_memory(&body_bytes(response).await).unwrap();
        assert_eq!((img.width(), img.height()), (32, 32));
    }

    #[tokio::test]
    async fn undecodable_image_shows_placeholder() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("milk.jpg"), b"not an image").unwrap();
        let mut config = AppConfig::default();
        config.images.dir = tmp.path().to_path_buf();
        let (app, _) = app_with(config, catalog_of(&[("Milk", "Dairy", "l", "milk.jpg")]));
        post(&app, "/start").await;

        let html = String::from_utf8(body_bytes(get(&app, "/").await).await).unwrap();
        assert!(html.contains(r#"<div class="image-placeholder">"#));
        assert!(!html.contains(r#"src="/product/0/image""#));
        assert_eq!(get(&app, "/product/0/image").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn decodable_image_is_linked_from_page() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("milk.jpg"), 40, 40);
        let mut config = AppConfig::default();
        config.images.dir = tmp.path().to_path_buf();
        config.images.size = 16;
        let (app, _) = app_with(config, catalog_of(&[("Milk", "Dairy", "l", "milk.jpg")]));
        post(&app, "/start").await;

        let html = String::from_utf8(body_bytes(get(&app, "/").await).await).unwrap();
        assert!(html.contains(r#"src="/product/0/image""#));
        assert!(!html.contains(r#"<div class="image-placeholder">"#));
    }

    #[tokio::test]
    async fn missing_product_image_is_not_found() {
        let (app, _) = scenario();
        assert_eq!(get(&app, "/product/0/image").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(get(&app, "/product/1/image").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(get(&app, "/product/9/image").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn restart_reloads_catalog_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv_catalog(tmp.path(), &[("Apples", "Fruit", "kg", "")]);
        let mut config = AppConfig::default();
        config.catalog.path = path.clone();
        let (app, state) = app_with(config, load_catalog(&path));

        post(&app, "/start").await;
        post(&app, "/skip").await;
        assert_eq!(state.session().screen, Screen::Summary);

        write_csv_catalog(tmp.path(), &[("Bread", "Bakery", "szt", ""), ("Eggs", "Dairy", "szt", "")]);
        post(&app, "/restart").await;

        let session = state.session().clone();
        assert_eq!(session.screen, Screen::Start);
        assert_eq!(session.catalog.len(), 2);
        assert_eq!(session.catalog.products[0].name, "Bread");
    }

    #[tokio::test]
    async fn summary_share_link_uses_configured_recipient() {
        let mut config = AppConfig::default();
        config.share.recipient = Some("48123456789".to_string());
        let (app, _) = app_with(config, catalog_of(&[("Milk", "Dairy", "l", "")]));
        post(&app, "/start").await;
        post(&app, "/order").await;
        post_quantity(&app, "1").await;

        let html = String::from_utf8(body_bytes(get(&app, "/").await).await).unwrap();
        assert!(html.contains("https://wa.me/48123456789?text="));
    }
}
