use std::sync::Arc;

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use crate::{
    configuration::{DefaultUrls, Settings},
    services::{Droid, QuoteScraper},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeBody {
    arrival_date: String,
    departure_date: String,
    #[serde(default)]
    urls: Vec<String>,
}

#[post("/scrape")]
pub async fn scrape(
    body: web::Json<ScrapeBody>,
    settings: web::Data<Settings>,
    default_urls: web::Data<DefaultUrls>,
) -> HttpResponse {
    let urls = match body.urls.is_empty() {
        true => default_urls.urls.clone(),
        false => body.urls.clone(),
    };
    log::info!(
        "Scraping {} listings for {} to {}",
        urls.len(),
        body.arrival_date,
        body.departure_date
    );

    // One shared browser session for the whole batch.
    let droid = match Droid::launch(&settings.browser).await {
        Ok(droid) => droid,
        Err(e) => {
            log::error!("Failed to launch a browser session. Error: {:?}", e);
            return HttpResponse::InternalServerError().body("Browser session unavailable");
        }
    };
    let session = Arc::new(droid);

    let scraper = QuoteScraper::new(&settings.scraper);
    let quotes = scraper
        .dispatch(
            Arc::clone(&session),
            urls,
            &body.arrival_date,
            &body.departure_date,
        )
        .await;

    // Every task has been joined, so this is the last reference.
    match Arc::try_unwrap(session) {
        Ok(droid) => {
            if let Err(e) = droid.quit().await {
                log::warn!("Browser session did not shut down cleanly. Error: {:?}", e);
            }
        }
        Err(_) => log::error!("Browser session still referenced after the batch joined"),
    }

    HttpResponse::Ok().json(quotes)
}
