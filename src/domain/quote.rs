use serde::Serialize;

/// Sentinel returned for every listing where no displayed price was found.
pub const NO_PRICE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub url: String,
    pub price: String,
}

/// Builds the effective target for one scrape task. The date values are
/// interpolated verbatim; existing callers rely on the exact `checkin` and
/// `checkout` parameter names and unescaped date strings.
pub fn listing_url(base_url: &str, arrival_date: &str, departure_date: &str) -> String {
    format!(
        "{}?checkin={}&checkout={}",
        base_url, arrival_date, departure_date
    )
}
