pub mod droid;
pub mod extractor;
pub mod quote_scraper;

pub use droid::*;
pub use extractor::*;
pub use quote_scraper::*;
