use actix_web::{http::header, web, App, HttpRequest, HttpResponse, HttpServer};
use serde::Deserialize;
use std::sync::Arc;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::location::{Location, SEARCH_KEY};
use crate::render::render_html;
use crate::view::SearchListView;

#[derive(Deserialize, Debug)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// The page. A URL whose query differs from the view's location counts as a
/// fresh page load, so bookmarked searches reproduce themselves.
async fn index(
    req: HttpRequest,
    view: web::Data<SearchListView>,
) -> Result<HttpResponse, AppError> {
    let requested = Location::parse(req.query_string());
    if requested != view.snapshot().location {
        log::debug!("Page load at ?{}", requested.query_string());
        view.navigate(requested).await;
    }

    let html = render_html(&view.snapshot())?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

async fn search(
    view: web::Data<SearchListView>,
    params: web::Query<SearchParams>,
) -> HttpResponse {
    log::debug!("Received search request: {:?}", params);
    // The view is shared, so another search may land before this one returns.
    let mut location = view.snapshot().location;
    location.set(SEARCH_KEY, &params.q);

    view.set_search_string(&params.q);
    view.search().await;
    back_to_page(&location)
}

async fn toggle(
    view: web::Data<SearchListView>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !view.toggle(id) {
        return Err(AppError::NotFound(format!("image {} is not displayed", id)));
    }
    Ok(back_to_page(&view.snapshot().location))
}

async fn state(view: web::Data<SearchListView>) -> HttpResponse {
    HttpResponse::Ok().json(view.snapshot())
}

fn back_to_page(location: &Location) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.href("/")))
        .finish()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/search").route(web::get().to(search)))
        .service(web::resource("/images/{id}/toggle").route(web::post().to(toggle)))
        .service(web::resource("/api/state").route(web::get().to(state)));
}

pub async fn start_web_server(
    config: Arc<AppConfig>,
    view: Arc<SearchListView>,
) -> std::io::Result<()> {
    let port = config.web_port;
    let view_data = web::Data::from(view);

    log::info!("Starting web server on port: {}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(view_data.clone())
            .configure(configure)
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
