use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::{dev::Server, http::header, middleware::Logger, web, App, HttpServer};

use crate::{
    configuration::{DefaultUrls, Settings},
    routes::{default_route, scrape_route},
};

pub fn run(
    listener: TcpListener,
    settings: Settings,
    default_urls: DefaultUrls,
) -> Result<Server, std::io::Error> {
    let allowed_origin = settings.application.allowed_origin.clone();
    let settings = web::Data::new(settings);
    let default_urls = web::Data::new(default_urls);

    let server = HttpServer::new(move || {
        // Only the configured frontend may call us, to read and to submit.
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::CONTENT_TYPE]);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .service(default_route::default)
            .service(scrape_route::scrape)
            .app_data(settings.clone())
            .app_data(default_urls.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
