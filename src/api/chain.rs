use actix_web::{HttpResponse, Responder, get, web};
use log::{debug, error, info, warn};

use super::models::{AppState, ChainResponse, MessageResponse, MineResponse};
use crate::error::LedgerError;

/// Get the full chain.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ChainResponse {
        chain: ledger.chain(),
        length: ledger.len(),
    })
}

/// Mine one block over the current pending pool:
/// - Snapshot pool + tip under the lock
/// - Search for a nonce on the blocking pool, lock released
/// - Re-lock, check the snapshot is still current, append reward, seal
#[get("/mine")]
pub async fn mine(state: web::Data<AppState>) -> impl Responder {
    let job = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.mining_job()
    };
    debug!(
        "MINER - searching over {} pending txs (difficulty={})",
        job.transactions.len(),
        job.difficulty
    );

    let (job, nonce) = match web::block(move || {
        let nonce = job.run();
        (job, nonce)
    })
    .await
    {
        Ok((job, Ok(nonce))) => (job, nonce),
        Ok((_, Err(e))) => {
            warn!("MINER - search abandoned: {e}");
            return discarded(e);
        }
        Err(e) => {
            error!("MINER - blocking pool failure: {e}");
            return HttpResponse::InternalServerError()
                .json(MessageResponse::new("Mining failed"));
        }
    };

    let sealed = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.seal_mined(&job, nonce)
    };
    match sealed {
        Ok(block) => {
            info!(
                "MINER - forged block #{} (nonce={})",
                block.block_number, block.nonce
            );
            HttpResponse::Ok().json(MineResponse {
                message: "New Block Forged",
                block_number: block.block_number,
                transactions: block.transactions,
                nonce: block.nonce,
                previous_hash: block.previous_hash,
            })
        }
        Err(e) => {
            warn!("MINER - discarded result: {e}");
            discarded(e)
        }
    }
}

/// A stale or cancelled search is the caller's cue to retry.
fn discarded(e: LedgerError) -> HttpResponse {
    HttpResponse::Conflict().json(MessageResponse::new(format!("{e}, retry")))
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    use super::*;
    use crate::blockchain::Ledger;

    #[actix_web::test]
    async fn cancelled_search_is_a_conflict() {
        let mut ledger = Ledger::new("n", 2, 1);
        let job = ledger.mining_job();
        ledger.mine().unwrap();
        let e = job.run().unwrap_err();
        assert_eq!(e, LedgerError::MiningCancelled);

        let resp = discarded(e);
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let body: MessageResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.message, format!("{}, retry", LedgerError::MiningCancelled));
    }
}
