use std::net::TcpListener;

use todolist_api::config::Config;
use todolist_api::server;
use todolist_api::state::AppState;

fn other_error(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("error loading config: {}", e);
        other_error(e)
    })?;

    let state = AppState::from_config(&config).await.map_err(|e| {
        log::error!("error initializing storage: {}", e);
        other_error(e)
    })?;

    let listener = TcpListener::bind(config.bind_address())?;
    log::info!("todolist-api listening on {}", config.server_url());

    server::run(listener, state)?.await?;

    log::info!("todolist-api shut down");
    Ok(())
}
