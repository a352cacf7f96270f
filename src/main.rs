use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::router::{handle, AppCtx};
use astra::Server;

mod api;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod responses;
mod router;
mod spreadsheets;
mod templates;
mod workflow;

#[cfg(test)]
mod tests;

fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Startup failed: {err}");
            std::process::exit(1);
        }
    };

    let db = Database::new(config.db_path.clone());

    if let Err(err) = init_db(&db, "sql/schema.sql") {
        eprintln!("Database initialization failed: {err}");
        std::process::exit(1);
    }

    let addr: std::net::SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(err) => {
            eprintln!("Bad BIND_ADDR '{}': {err}", config.bind_addr);
            std::process::exit(1);
        }
    };
    println!("Starting server at http://{addr} (API: {})", config.api_base);

    let ctx = AppCtx { db, config };

    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &ctx) {
        Ok(resp) => resp,
        Err(err) => crate::responses::html_error_response(err),
    });

    if let Err(err) = result {
        eprintln!("Server ended with error: {err}");
    }

    println!("Server shut down cleanly.");
}
