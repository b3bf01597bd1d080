use reqwest::Url;
use tracing::{info, instrument};

use crate::app::ports::HttpClientPort;
use crate::constants::{gallery_url, TRANSPARENCY_HOST};
use crate::error::{Result, ScraperError};
use crate::input::AdvertiserDescriptor;
use crate::parser::{ApiPayloadParser, GalleryHtmlParser, Parser, RawAd};

/// Pulls the advertiser id out of a gallery URL such as
/// `https://adstransparency.google.com/advertiser/AR123?region=US`.
pub fn advertiser_id_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !parsed.host_str()?.contains(TRANSPARENCY_HOST) {
        return None;
    }
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
    segments.find(|s| *s == "advertiser")?;
    segments.next().map(str::to_string)
}

/// Scrapes one advertiser into raw ad dictionaries.
///
/// Sources are tried in order: an embedded API payload, an embedded HTML
/// snapshot, then the live gallery page.
#[instrument(skip_all, fields(advertiser = ?descriptor.advertiser_id))]
pub async fn scrape_advertiser(
    descriptor: &AdvertiserDescriptor,
    max_ads: Option<usize>,
    http: &dyn HttpClientPort,
) -> Result<Vec<RawAd>> {
    let start_url = descriptor.start_url.clone();
    let advertiser_id = descriptor
        .advertiser_id
        .clone()
        .filter(|id| !id.is_empty())
        .or_else(|| start_url.as_deref().and_then(advertiser_id_from_url))
        .ok_or_else(|| {
            ScraperError::MissingField(
                "advertiser descriptor must include 'advertiserId' or a gallery 'startUrl'".into(),
            )
        })?;

    info!(
        "Scraping advertiser {} (startUrl={})",
        advertiser_id,
        start_url.as_deref().unwrap_or("N/A")
    );

    let (parser, body): (Box<dyn Parser>, Vec<u8>) = if let Some(payload) = &descriptor.api_payload {
        info!("Using provided API payload for advertiser {}.", advertiser_id);
        (
            Box::new(ApiPayloadParser::new(advertiser_id, start_url)) as Box<dyn Parser>,
            serde_json::to_vec(payload)?,
        )
    } else if let Some(html) = descriptor.html_snapshot.as_deref().filter(|h| !h.is_empty()) {
        info!("Using provided HTML snapshot for advertiser {}.", advertiser_id);
        (
            Box::new(GalleryHtmlParser::new(advertiser_id, start_url)) as Box<dyn Parser>,
            html.as_bytes().to_vec(),
        )
    } else {
        let url = start_url.unwrap_or_else(|| gallery_url(&advertiser_id));
        info!("Fetching gallery HTML from {}", url);
        let html = http.get_text(&url).await?;
        (
            Box::new(GalleryHtmlParser::new(advertiser_id, Some(url))) as Box<dyn Parser>,
            html.into_bytes(),
        )
    };

    let mut records = parser.parse(&body)?;
    if let Some(max) = max_ads {
        records.truncate(max);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeHttp {
        body: String,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpClientPort for FakeHttp {
        async fn get_text(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(self.body.clone())
        }
    }

    const TWO_CREATIVES: &str =
        r#"<div data-creative-id="C1"></div><div data-creative-id="C2"></div>"#;

    #[test]
    fn extracts_advertiser_id_from_gallery_url() {
        assert_eq!(
            advertiser_id_from_url("https://adstransparency.google.com/advertiser/AR123?region=US"),
            Some("AR123".to_string())
        );
        assert_eq!(advertiser_id_from_url("https://example.com/advertiser/AR123"), None);
        assert_eq!(advertiser_id_from_url("https://adstransparency.google.com/advertiser"), None);
        assert_eq!(advertiser_id_from_url("not a url"), None);
    }

    #[tokio::test]
    async fn missing_identity_is_an_error() {
        let http = FakeHttp::default();
        let err = scrape_advertiser(&AdvertiserDescriptor::default(), None, &http)
            .await
            .unwrap_err();
        assert!(matches!(err, ScraperError::MissingField(_)));
    }

    #[tokio::test]
    async fn snapshot_is_used_without_fetching() {
        let http = FakeHttp::default();
        let descriptor = AdvertiserDescriptor {
            advertiser_id: Some("AR1".into()),
            html_snapshot: Some(TWO_CREATIVES.into()),
            ..Default::default()
        };
        let ads = scrape_advertiser(&descriptor, Some(1), &http).await.unwrap();
        assert_eq!(ads.len(), 1);
        assert_eq!(ads[0]["creativeId"], "C1");
        assert!(http.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn api_payload_takes_priority() {
        let http = FakeHttp::default();
        let descriptor = AdvertiserDescriptor {
            advertiser_id: Some("AR1".into()),
            html_snapshot: Some(TWO_CREATIVES.into()),
            api_payload: Some(json!({"creatives": [{"creativeId": "API1"}]})),
            ..Default::default()
        };
        let ads = scrape_advertiser(&descriptor, None, &http).await.unwrap();
        assert_eq!(ads.len(), 1);
        assert_eq!(ads[0]["creativeId"], "API1");
    }

    #[tokio::test]
    async fn api_payload_impressions_are_read_as_text() {
        let http = FakeHttp::default();
        let descriptor = AdvertiserDescriptor {
            advertiser_id: Some("AR1".into()),
            api_payload: Some(json!({"creatives": [{
                "creativeId": "API1",
                "regionStats": [{"regionCode": "US",
                                 "impressions": {"lowerBound": 12.7, "upperBound": "1,200"}}]
            }]})),
            ..Default::default()
        };
        let ads = scrape_advertiser(&descriptor, None, &http).await.unwrap();
        assert_eq!(
            ads[0]["regionStats"][0]["impressions"],
            json!({"lowerBound": 0, "upperBound": 1200})
        );
    }

    #[tokio::test]
    async fn fetches_gallery_when_no_offline_data() {
        let http = FakeHttp {
            body: TWO_CREATIVES.into(),
            ..Default::default()
        };
        let descriptor = AdvertiserDescriptor {
            start_url: Some("https://adstransparency.google.com/advertiser/AR77".into()),
            ..Default::default()
        };
        let ads = scrape_advertiser(&descriptor, None, &http).await.unwrap();
        assert_eq!(ads.len(), 2);
        assert_eq!(ads[0]["advertiserId"], "AR77");
        assert_eq!(
            http.requested.lock().unwrap().as_slice(),
            ["https://adstransparency.google.com/advertiser/AR77"]
        );
    }

    #[tokio::test]
    async fn guesses_gallery_url_from_id() {
        let http = FakeHttp::default();
        let descriptor = AdvertiserDescriptor {
            advertiser_id: Some("AR5".into()),
            ..Default::default()
        };
        scrape_advertiser(&descriptor, None, &http).await.unwrap();
        assert_eq!(
            http.requested.lock().unwrap().as_slice(),
            ["https://adstransparency.google.com/advertiser/AR5"]
        );
    }
}
