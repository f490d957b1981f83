pub mod page;
pub mod publish_event;

use ntex::web;
use publish_gateway::Publisher;
use serde::Deserialize;

pub const DEFAULT_TOPIC: &str = "example-topic";

/// Largest accepted form body, in bytes.
pub const MAX_FORM_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState<P> {
    pub publisher: P,
    pub topic: String,
}

/// Fields of `POST /publish`, read from the body or the query string.
/// A missing field is treated like an empty one.
#[derive(Debug, Deserialize)]
pub struct PublishForm {
    #[serde(default)]
    pub message: Option<String>,
}

/// Registers the form routes. Application state is added by the caller.
/// Paths without a route of their own serve the form.
pub fn routes<P>(cfg: &mut web::ServiceConfig)
where
    P: Publisher + Send + Sync + 'static,
{
    cfg.route("/", web::route().to(publish_event::index))
        .route("/health", web::get().to(async || "OK"))
        .service(
            web::resource("/publish")
                .state(web::types::FormConfig::default().limit(MAX_FORM_BYTES))
                .route(web::post().to(publish_event::publish::<P>))
                .route(web::route().to(publish_event::back_to_form)),
        )
        .service(web::resource("/{tail}*").route(web::route().to(publish_event::index)));
}
