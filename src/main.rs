mod api;
mod blockchain;
mod config;
mod consensus;
mod error;
mod transaction;
mod wallet;

use std::io;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use api::AppState;
use blockchain::Ledger;
use config::Config;
use consensus::{HttpChainFetcher, PeerSet};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::load().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let fetcher = HttpChainFetcher::new(config.peer_timeout).map_err(io::Error::other)?;

    let mut peers = PeerSet::new();
    peers
        .register_all(config.peers.as_slice())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let ledger = Ledger::new(config.node_id, config.difficulty, config.reward);
    info!(
        "node {} (difficulty={}, reward={}, peers={:?})",
        ledger.node_id(),
        config.difficulty,
        config.reward,
        peers.list()
    );
    println!(
        "⛓️ Starting ledger node at http://{}:{}",
        config.host, config.port
    );

    let state = web::Data::new(AppState::new(ledger, peers, fetcher));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
