use postergen::{logger, Config, PosterHandler};
use std::io;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init()?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    let config = Config::from_env()?;
    logger::log_config_info(&config);

    let handler = PosterHandler::from_config(&config).await?;

    match std::env::args().nth(1).as_deref() {
        Some("serve") => serve(handler, config.port.unwrap_or(8080)).await,
        Some(other) => Err(format!("unknown command '{}', expected 'serve' or none", other).into()),
        None => invoke_once(&handler).await,
    }
}

/// Reads one event from stdin and writes the response mapping to stdout.
async fn invoke_once(handler: &PosterHandler) -> Result<(), Box<dyn std::error::Error>> {
    let response = handler.respond_io(io::stdin().lock(), io::stdout().lock()).await?;

    if response.is_success() {
        Ok(())
    } else {
        Err(response.body.into())
    }
}

#[cfg(feature = "server")]
async fn serve(handler: PosterHandler, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    postergen::server::serve(handler, port).await?;
    Ok(())
}

#[cfg(not(feature = "server"))]
async fn serve(_handler: PosterHandler, _port: u16) -> Result<(), Box<dyn std::error::Error>> {
    Err("this build has no HTTP server, rebuild with --features server".into())
}
