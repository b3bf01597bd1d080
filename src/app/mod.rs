pub mod ports;
pub mod scrape_use_case;
