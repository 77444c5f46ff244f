use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{
    AppState, MessageResponse, NodesResponse, RegisterNodesRequest, RegisterNodesResponse,
    ResolveResponse,
};
use crate::consensus::{Resolution, resolve_conflicts};

/// Register peers, given as URLs or `host[:port]`.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    let Some(nodes) = body.into_inner().nodes else {
        return HttpResponse::BadRequest().json(MessageResponse::new(
            "Error: Please supply a valid list of nodes",
        ));
    };

    let mut peers = state.peers.lock().expect("mutex poisoned");
    match peers.register_all(nodes.as_slice()) {
        Ok(added) => {
            info!("POST /nodes/register - registered {added:?}");
            HttpResponse::Created().json(RegisterNodesResponse {
                message: "New nodes have been added",
                total_nodes: peers.list(),
            })
        }
        Err(e) => {
            warn!("POST /nodes/register - rejected: {e}");
            HttpResponse::BadRequest().json(MessageResponse::new(e.to_string()))
        }
    }
}

#[get("/nodes/get")]
pub async fn get_nodes(state: web::Data<AppState>) -> impl Responder {
    let peers = state.peers.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(NodesResponse {
        nodes: peers.list(),
    })
}

/// Run the longest-valid-chain rule against every registered peer.
#[get("/nodes/resolve")]
pub async fn resolve(state: web::Data<AppState>) -> impl Responder {
    let peers = {
        let peers = state.peers.lock().expect("mutex poisoned");
        peers.list()
    };

    let resolution = resolve_conflicts(&state.ledger, &peers, &state.fetcher).await;
    let chain = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.chain().to_vec()
    };

    HttpResponse::Ok().json(match resolution {
        Resolution::Replaced => ResolveResponse::Replaced {
            message: "Our chain was replaced",
            new_chain: chain,
        },
        Resolution::Authoritative => ResolveResponse::Authoritative {
            message: "Our chain is authoritative",
            chain,
        },
    })
}
