use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::configuration::BrowserSettings;

use super::{
    extractor::QUOTE_TOTAL_SELECTOR,
    quote_scraper::{ListingPage, PageSession},
};

/// One headless chrome session. A batch shares a single droid; every scrape
/// task opens its own page from it.
pub struct Droid {
    browser: Browser,
    event_loop: JoinHandle<()>,
}

impl Droid {
    pub async fn launch(settings: &BrowserSettings) -> anyhow::Result<Self> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(Duration::from_secs(settings.request_timeout_secs))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("Failed to assemble the browser config: {}", e))?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // The CDP connection is serviced here for the session's lifetime.
        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Droid {
            browser,
            event_loop,
        })
    }

    /// Tears the session down: closes chrome, reaps the process and stops
    /// the event loop. Closing the browser also closes any page a task
    /// abandoned on its deadline.
    pub async fn quit(mut self) -> anyhow::Result<()> {
        self.browser.close().await?;
        self.browser.wait().await?;
        self.event_loop.abort();
        Ok(())
    }
}

#[async_trait]
impl PageSession for Droid {
    type Page = QuotePage;

    async fn open_page(&self, url: &str) -> anyhow::Result<QuotePage> {
        let page = self.browser.new_page(url).await?;
        Ok(QuotePage { page })
    }
}

pub struct QuotePage {
    page: Page,
}

#[async_trait]
impl ListingPage for QuotePage {
    async fn wait_loaded(&self) -> anyhow::Result<()> {
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    async fn quote_texts(&self) -> anyhow::Result<Vec<String>> {
        let elements = self.page.find_elements(QUOTE_TOTAL_SELECTOR).await?;

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(text) = element.inner_text().await? {
                texts.push(text);
            }
        }

        Ok(texts)
    }

    async fn close(self) -> anyhow::Result<()> {
        self.page.close().await?;
        Ok(())
    }
}
