use std::net::TcpListener;

use env_logger::Env;
use probe::{
    configuration::{get_configuration, read_url_list},
    startup::run,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let default_urls = read_url_list(&configuration.application.url_list_file)
        .expect("Failed to load the default listing url file.");
    log::info!("Loaded {} default listing urls", default_urls.urls.len());

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;
    log::info!("🚀 Server started at http://{}", listener.local_addr()?);

    run(listener, configuration, default_urls)?.await
}
