use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::models::{AppState, MessageResponse, NewTxRequest, PendingResponse};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// Submit a signed transaction into the pending pool.
#[post("/transactions/new")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let body = body.into_inner();
    debug!(
        "POST /transactions/new - {} -> {} value={}",
        body.sender_address, body.recipient_address, body.value
    );

    let tx = Transaction::new(
        body.sender_address,
        body.recipient_address,
        body.value,
        body.signature,
    );
    let result = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.submit_transaction(tx)
    };

    match result {
        Ok(block_number) => {
            info!("POST /transactions/new - accepted for block {block_number}");
            HttpResponse::Created().json(MessageResponse::new(format!(
                "Transaction will be added to Block {block_number}"
            )))
        }
        Err(e @ LedgerError::InvalidTransaction(_)) => {
            warn!("POST /transactions/new - rejected: {e}");
            HttpResponse::BadRequest().json(MessageResponse::new(e.to_string()))
        }
        Err(e) => {
            warn!("POST /transactions/new - rejected: {e}");
            HttpResponse::NotAcceptable().json(MessageResponse::new(format!(
                "Invalid Transaction! {e}"
            )))
        }
    }
}

/// List the pending (unmined) transactions.
#[get("/transactions/get")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PendingResponse {
        transactions: ledger.pending(),
    })
}
