use serde_aux::field_attributes::deserialize_number_from_string;
use url::Url;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub browser: BrowserSettings,
    pub scraper: ScraperSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub allowed_origin: String,
    pub url_list_file: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct BrowserSettings {
    pub no_sandbox: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_secs: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct ScraperSettings {
    /// Capacity of the admission gate: how many listing pages may be
    /// in flight at once within a single batch.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_concurrent_pages: usize,
    /// Fixed wait after the page load signal, so client-side rendering can
    /// finish before the quote widget is read.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub settle_secs: u64,
    /// Upper bound on one task's whole page visit. A listing that is still
    /// loading when this expires resolves to the no-price sentinel instead
    /// of holding its admission slot forever.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_deadline_secs: u64,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    let settings = config::Config::builder()
        .add_source(config::File::from(base_path.join("configuration.yaml")))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// The fallback listing urls, loaded once at startup and handed to the app
/// as an immutable value.
pub struct DefaultUrls {
    pub urls: Vec<String>,
}

pub fn read_url_list(path: &str) -> std::io::Result<DefaultUrls> {
    let contents = std::fs::read_to_string(path)?;
    let urls = parse_url_list(&contents);

    for url in urls.iter() {
        if Url::parse(url).is_err() {
            log::warn!("Listing url from {} does not parse as a url: {}", path, url);
        }
    }

    Ok(DefaultUrls { urls })
}

fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_url_list;

    #[test]
    fn parse_url_list_trims_and_skips_blank_lines() {
        let contents = "\
https://www.example-stays.com/listing/1024

  https://www.example-stays.com/listing/2048  \n\t
https://www.example-stays.com/listing/4096";

        let urls = parse_url_list(contents);

        assert_eq!(
            urls,
            vec![
                "https://www.example-stays.com/listing/1024",
                "https://www.example-stays.com/listing/2048",
                "https://www.example-stays.com/listing/4096",
            ]
        );
    }

    #[test]
    fn parse_url_list_of_empty_file_is_empty() {
        assert!(parse_url_list("").is_empty());
        assert!(parse_url_list("\n  \n\t\n").is_empty());
    }
}
