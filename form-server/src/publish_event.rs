use crate::page::{Banner, render_form};
use crate::{AppState, PublishForm};
use log::{error, info, warn};
use ntex::http::{StatusCode, header};
use ntex::web;
use ntex::web::error::UrlencodedError;
use ntex::web::types::{Form, Query};
use publish_gateway::Publisher;
use std::sync::Arc;

fn html_page(status: StatusCode, banner: Option<&Banner>) -> web::HttpResponse {
    match render_form(banner) {
        Ok(html) => web::HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => {
            error!("Failed to render form: {e}");
            web::HttpResponse::InternalServerError().body("Template-Fehler")
        }
    }
}

fn redirect_to_form() -> web::HttpResponse {
    web::HttpResponse::SeeOther()
        .header(header::LOCATION, "/")
        .finish()
}

pub async fn index() -> Result<web::HttpResponse, web::Error> {
    Ok(html_page(StatusCode::OK, None))
}

pub async fn back_to_form() -> Result<web::HttpResponse, web::Error> {
    Ok(redirect_to_form())
}

/// Picks the submitted text. A body field wins over a query field; a request without a
/// urlencoded body only has the query string.
fn submitted_message(
    req: &web::HttpRequest,
    form: Result<Form<PublishForm>, UrlencodedError>,
) -> Result<Option<String>, UrlencodedError> {
    let from_body = match form {
        Ok(form) => form.into_inner().message,
        Err(UrlencodedError::ContentType) => None,
        Err(e) => return Err(e),
    };
    Ok(from_body.or_else(|| {
        Query::<PublishForm>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.into_inner().message)
    }))
}

pub async fn publish<P>(
    req: web::HttpRequest,
    data: web::types::State<Arc<AppState<P>>>,
    form: Result<Form<PublishForm>, UrlencodedError>,
) -> Result<web::HttpResponse, web::Error>
where
    P: Publisher + 'static,
{
    let text = match submitted_message(&req, form) {
        Ok(Some(text)) if !text.is_empty() => text,
        Ok(_) => return Ok(redirect_to_form()),
        Err(e) => {
            warn!("Rejected submission: {e}");
            let status = match e {
                UrlencodedError::Overflow { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            return Ok(html_page(status, Some(&Banner::error())));
        }
    };

    info!(
        "Publishing message to topic={:?} ({} bytes)",
        data.topic,
        text.len()
    );
    match data.publisher.publish(&data.topic, text.as_bytes()).await {
        Ok(id) => {
            info!("Message {id} published");
            Ok(html_page(StatusCode::OK, Some(&Banner::success())))
        }
        Err(e) => {
            error!("Failed to deliver message: {e:#}");
            Ok(html_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&Banner::error()),
            ))
        }
    }
}
