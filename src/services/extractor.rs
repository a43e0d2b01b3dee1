use std::time::Duration;

use crate::domain::quote::NO_PRICE;

use super::quote_scraper::ListingPage;

/// Elements inside a listing's quote total widget; the displayed price is
/// one of these spans.
pub const QUOTE_TOTAL_SELECTOR: &str = ".pdp-quote-total span";

/// Reads the displayed price off an already-open listing page.
///
/// Waits for the load signal plus the settle delay, then scans the quote
/// widget: of all trimmed texts that start with "$", the last one in
/// document order wins. Any page-level failure degrades to the no-price
/// sentinel instead of surfacing an error.
pub async fn extract_price<P: ListingPage>(page: &P, settle: Duration) -> String {
    if let Err(e) = page.wait_loaded().await {
        log::error!("Page never reported loaded. Error: {:?}", e);
        return NO_PRICE.to_string();
    }

    // The quote widget fills in client side after the load event fires.
    tokio::time::sleep(settle).await;

    let texts = match page.quote_texts().await {
        Ok(texts) => texts,
        Err(e) => {
            log::error!("Failed to read the quote widget. Error: {:?}", e);
            return NO_PRICE.to_string();
        }
    };

    let mut best_price = None;
    for text in texts.iter() {
        let text = text.trim();
        if text.starts_with('$') {
            best_price = Some(text.to_string());
        }
    }

    best_price.unwrap_or_else(|| NO_PRICE.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::{domain::quote::NO_PRICE, services::quote_scraper::ListingPage};

    use super::extract_price;

    const NO_SETTLE: Duration = Duration::ZERO;

    #[derive(Default)]
    struct StubPage {
        texts: Vec<String>,
        broken_load: bool,
        broken_widget: bool,
    }

    fn page_with(texts: &[&str]) -> StubPage {
        StubPage {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            ..StubPage::default()
        }
    }

    #[async_trait]
    impl ListingPage for StubPage {
        async fn wait_loaded(&self) -> anyhow::Result<()> {
            match self.broken_load {
                true => anyhow::bail!("tab crashed"),
                false => Ok(()),
            }
        }

        async fn quote_texts(&self) -> anyhow::Result<Vec<String>> {
            match self.broken_widget {
                true => anyhow::bail!("node detached"),
                false => Ok(self.texts.clone()),
            }
        }

        async fn close(self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn the_last_dollar_text_wins() {
        let page = page_with(&["$10", "$ignored-text", "$25"]);

        assert_eq!(extract_price(&page, NO_SETTLE).await, "$25");
    }

    #[tokio::test]
    async fn non_dollar_texts_are_skipped() {
        let page = page_with(&["Total", "$830", "incl. taxes and fees"]);

        assert_eq!(extract_price(&page, NO_SETTLE).await, "$830");
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_trimmed() {
        let page = page_with(&["  $1,249.00 \n"]);

        assert_eq!(extract_price(&page, NO_SETTLE).await, "$1,249.00");
    }

    #[tokio::test]
    async fn no_candidates_means_no_price() {
        let empty = page_with(&[]);
        let no_dollar = page_with(&["Total", "3 nights", "fees"]);

        assert_eq!(extract_price(&empty, NO_SETTLE).await, NO_PRICE);
        assert_eq!(extract_price(&no_dollar, NO_SETTLE).await, NO_PRICE);
    }

    #[tokio::test]
    async fn broken_page_degrades_to_no_price() {
        let broken_load = StubPage {
            texts: vec!["$500".to_string()],
            broken_load: true,
            ..StubPage::default()
        };
        let broken_widget = StubPage {
            broken_widget: true,
            ..StubPage::default()
        };

        assert_eq!(extract_price(&broken_load, NO_SETTLE).await, NO_PRICE);
        assert_eq!(extract_price(&broken_widget, NO_SETTLE).await, NO_PRICE);
    }
}
