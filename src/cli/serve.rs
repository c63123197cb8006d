use crate::{config::Config, error, server};

pub async fn serve() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Cannot start Monthlify. Err: {}", e),
    };

    if let Err(e) = server::start_api_server(config).await {
        error!("{}", e);
    }
}
