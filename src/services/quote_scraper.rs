use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    configuration::ScraperSettings,
    domain::quote::{listing_url, PriceQuote, NO_PRICE},
};

use super::extractor::extract_price;

/// What the orchestrator needs from a browser session: a way to open one
/// listing page per task. The session is shared by the whole batch; every
/// page handle is owned by exactly one task.
#[async_trait]
pub trait PageSession: Send + Sync {
    type Page: ListingPage + 'static;

    async fn open_page(&self, url: &str) -> anyhow::Result<Self::Page>;
}

/// One open listing page, owned by a single scrape task.
#[async_trait]
pub trait ListingPage: Send + Sync {
    /// Resolves once the page reports its load-complete signal.
    async fn wait_loaded(&self) -> anyhow::Result<()>;

    /// Text of every element in the quote total widget, in document order.
    async fn quote_texts(&self) -> anyhow::Result<Vec<String>>;

    async fn close(self) -> anyhow::Result<()>;
}

pub struct QuoteScraper {
    max_concurrent_pages: usize,
    settle: Duration,
    page_deadline: Duration,
}

impl QuoteScraper {
    pub fn new(settings: &ScraperSettings) -> Self {
        QuoteScraper {
            max_concurrent_pages: settings.max_concurrent_pages,
            settle: Duration::from_secs(settings.settle_secs),
            page_deadline: Duration::from_secs(settings.page_deadline_secs),
        }
    }

    /// Scrapes every listing in the batch through the shared session and
    /// returns one quote per url, in completion order. A listing that cannot
    /// be opened, loaded or read resolves to the no-price sentinel; it never
    /// fails the batch or its siblings.
    pub async fn dispatch<S>(
        &self,
        session: Arc<S>,
        urls: Vec<String>,
        arrival_date: &str,
        departure_date: &str,
    ) -> Vec<PriceQuote>
    where
        S: PageSession + 'static,
    {
        let budget = Arc::new(Semaphore::new(self.max_concurrent_pages));
        let mut tasks: JoinSet<PriceQuote> = JoinSet::new();

        for base_url in urls {
            let url = listing_url(&base_url, arrival_date, departure_date);
            let session = Arc::clone(&session);
            let budget = Arc::clone(&budget);
            let settle = self.settle;
            let deadline = self.page_deadline;

            tasks.spawn(async move {
                // Admission blocks until a slot frees up; the permit rides
                // along for the browser work and releases on every exit path.
                let _permit = budget
                    .acquire_owned()
                    .await
                    .expect("admission gate closed mid-batch");

                let price = scrape_listing(session.as_ref(), &url, settle, deadline).await;
                PriceQuote { url, price }
            });
        }

        let mut quotes = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(quote) => quotes.push(quote),
                Err(e) => log::error!("A scrape task died before reporting: {:?}", e),
            }
        }

        quotes
    }
}

/// One task's whole page visit, bounded by the configured deadline so that a
/// listing that never loads gives its admission slot back instead of holding
/// it for the rest of the batch.
async fn scrape_listing<S: PageSession>(
    session: &S,
    url: &str,
    settle: Duration,
    deadline: Duration,
) -> String {
    match tokio::time::timeout(deadline, visit_listing(session, url, settle)).await {
        Ok(price) => price,
        Err(_) => {
            log::error!("Gave up on {} after {:?}", url, deadline);
            NO_PRICE.to_string()
        }
    }
}

async fn visit_listing<S: PageSession>(session: &S, url: &str, settle: Duration) -> String {
    let page = match session.open_page(url).await {
        Ok(page) => page,
        Err(e) => {
            log::error!("Failed to open a page for {}. Error: {:?}", url, e);
            return NO_PRICE.to_string();
        }
    };

    let price = extract_price(&page, settle).await;

    if let Err(e) = page.close().await {
        log::warn!("Failed to close the page for {}. Error: {:?}", url, e);
    }

    price
}
