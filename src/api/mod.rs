mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;
mod wallet;

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::web::{self, ServiceConfig};
use actix_web::{HttpRequest, HttpResponse};

pub use models::AppState;
use models::MessageResponse;

/// Routes are unscoped: peers fetch each other's `/chain` directly.
pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(health::health_check)
        .service(chain::get_chain)
        .service(chain::mine)
        .service(tx::post_transaction)
        .service(tx::get_pending)
        .service(wallet::create_wallet)
        .service(wallet::sign_transaction)
        .service(nodes::register_nodes)
        .service(nodes::get_nodes)
        .service(nodes::resolve);
}

/// Malformed or incomplete JSON bodies become a 400 with a message body.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(MessageResponse::new(format!("Missing values: {err}")));
    InternalError::from_response(err, response).into()
}
