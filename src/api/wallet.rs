use actix_web::{HttpResponse, Responder, get, post, web};
use log::warn;

use super::models::{MessageResponse, NewWalletResponse, SignTxRequest, SignTxResponse};
use crate::transaction::Transaction;
use crate::wallet::{address_from_secret_hex, generate_keypair_hex, sign_transaction_hex};

#[get("/wallet/new")]
pub async fn create_wallet() -> impl Responder {
    let (private_key, public_key) = generate_keypair_hex();
    HttpResponse::Ok().json(NewWalletResponse {
        private_key,
        public_key,
    })
}

/// DEV helper: sign a transaction with a caller-supplied private key.
/// Nothing is stored and nothing is submitted.
#[post("/transactions/sign")]
pub async fn sign_transaction(body: web::Json<SignTxRequest>) -> impl Responder {
    let body = body.into_inner();

    match address_from_secret_hex(&body.sender_private_key) {
        Ok(address) if address == body.sender_address => {}
        Ok(_) => {
            return HttpResponse::BadRequest().json(MessageResponse::new(
                "sender_private_key does not match sender_address",
            ));
        }
        Err(msg) => return HttpResponse::BadRequest().json(MessageResponse::new(msg)),
    }

    let mut tx = Transaction::new(body.sender_address, body.recipient_address, body.value, "");
    match sign_transaction_hex(&body.sender_private_key, &tx) {
        Ok(signature) => {
            tx.signature = Some(signature.clone());
            HttpResponse::Ok().json(SignTxResponse {
                transaction: tx,
                signature,
            })
        }
        Err(msg) => {
            warn!("POST /transactions/sign - {msg}");
            HttpResponse::BadRequest().json(MessageResponse::new(msg))
        }
    }
}
