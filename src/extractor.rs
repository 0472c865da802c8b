use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use log::debug;
use crate::delay_manager;
use crate::error::FetchError;
use crate::fetcher::PageFetcher;
use crate::normalizer::{visible_text, Normalizer};

pub const MAX_BODY_CHARS: usize = 2000;

/// Only the first this-many class-matched elements feed the body.
const MAX_BODY_ELEMENTS: usize = 10;

/// The persisted result of one successful page extraction. Field order is
/// the key order of the output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub body: String,
}

pub struct PageExtractor<F: PageFetcher> {
    fetcher: F,
    normalizer: Normalizer,
    delay: Duration,
    title_selector: Selector,
    description_selector: Selector,
    body_selector: Selector,
    body_class_regex: Regex,
}

impl<F: PageFetcher> PageExtractor<F> {
    pub fn new(fetcher: F, delay: Duration) -> Self {
        PageExtractor {
            fetcher,
            normalizer: Normalizer::new(),
            delay,
            title_selector: Selector::parse("title").expect("static title selector"),
            description_selector: Selector::parse(r#"meta[name="description"]"#).expect("static meta selector"),
            body_selector: Selector::parse("p, article, div").expect("static body selector"),
            // Case-sensitive, matched anywhere in the class attribute
            body_class_regex: Regex::new(r"content|body|main|article").expect("static class pattern"),
        }
    }

    /// Waits out the courtesy delay, fetches `url` once and builds a record.
    pub fn extract(&self, url: &str) -> Result<ScrapeRecord, FetchError> {
        delay_manager::courtesy_delay(self.delay);

        // The controller reports failures along with the running count
        let html = self.fetcher.fetch(url).map_err(|e| {
            if e.is_timeout() {
                debug!("Timed out fetching {}", url);
            } else {
                debug!("Failed to fetch {}: {}", url, e);
            }
            e
        })?;

        Ok(self.parse_page(url, &html))
    }

    pub fn parse_page(&self, url: &str, html: &str) -> ScrapeRecord {
        let document = Html::parse_document(html);

        let title = document
            .select(&self.title_selector)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_else(|| "No title".to_string());

        let description = document
            .select(&self.description_selector)
            .next()
            .and_then(|m| m.value().attr("content"))
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or("No description")
            .to_string();

        let body_text = document
            .select(&self.body_selector)
            .filter(|el| {
                el.value()
                    .attr("class")
                    .map_or(false, |class| self.body_class_regex.is_match(class))
            })
            .take(MAX_BODY_ELEMENTS)
            .map(|el| visible_text(el, ""))
            .collect::<Vec<_>>()
            .join(" ");

        let cleaned = self.normalizer.normalize(&body_text);
        let body = self.normalizer.ensure_body_has_words(&document, cleaned);

        ScrapeRecord {
            url: url.to_string(),
            title,
            description,
            body: body.chars().take(MAX_BODY_CHARS).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::NO_BODY_TEXT;
    use std::collections::HashMap;
    use std::time::Instant;

    struct StaticPages(HashMap<&'static str, Result<String, u16>>);

    impl PageFetcher for StaticPages {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            match self.0.get(url) {
                Some(Ok(html)) => Ok(html.clone()),
                Some(Err(code)) => Err(FetchError::Status(*code)),
                None => Err(FetchError::Status(404)),
            }
        }
    }

    fn extractor() -> PageExtractor<StaticPages> {
        PageExtractor::new(StaticPages(HashMap::new()), Duration::ZERO)
    }

    #[test]
    fn test_extracts_title_description_and_body() {
        let html = r#"
            <html><head>
              <title>  Reliability Growth Models </title>
              <meta name="description" content=" Overview of SRGMs ">
            </head><body>
              <header>Header text that is long enough to be kept</header>
              <div class="post-content">
                Software reliability growth models describe failure behaviour. Short one.
                <script>trackPageView('a long analytics identifier');</script>
              </div>
            </body></html>
        "#;

        let record = extractor().parse_page("https://a.test", html);
        assert_eq!(record.url, "https://a.test");
        assert_eq!(record.title, "Reliability Growth Models");
        assert_eq!(record.description, "Overview of SRGMs");
        assert_eq!(record.body, "Software reliability growth models describe failure behaviour.");
    }

    #[test]
    fn test_missing_title_and_description_use_placeholders() {
        let html = r#"<html><head><meta name="description" content="   "></head>
            <body><p>Some paragraph that is long enough to keep</p></body></html>"#;

        let record = extractor().parse_page("https://a.test", html);
        assert_eq!(record.title, "No title");
        assert_eq!(record.description, "No description");
    }

    #[test]
    fn test_class_match_is_case_sensitive_substring() {
        let html = r#"<html><body>
            <div class="Content">Uppercase class text that is long enough</div>
            <div class="main-column">Main column text that is long enough here</div>
            </body></html>"#;

        let record = extractor().parse_page("https://a.test", html);
        assert_eq!(record.body, "Main column text that is long enough here.");
    }

    #[test]
    fn test_only_first_ten_candidates_are_used() {
        let paragraphs: String = (1..=12)
            .map(|i| format!("<p class=\"content\">Paragraph number {:02} is long enough to keep.</p>", i))
            .collect();
        let html = format!("<html><body>{}</body></html>", paragraphs);

        let record = extractor().parse_page("https://a.test", &html);
        assert!(record.body.contains("Paragraph number 10"));
        assert!(!record.body.contains("Paragraph number 11"));
    }

    #[test]
    fn test_unmatched_classes_fall_back_to_paragraphs() {
        let html = r#"<html><body>
            <div class="sidebar">Sidebar text that is definitely long</div>
            <p>Plain paragraph text that is long enough</p>
            </body></html>"#;

        let record = extractor().parse_page("https://a.test", html);
        assert_eq!(record.body, "Plain paragraph text that is long enough.");
    }

    #[test]
    fn test_nav_and_script_only_page_yields_sentinel() {
        let html = r#"<html><head><title>Menu</title>
            <script>var config = { message: "a long script message that should never leak" };</script>
            </head><body>
            <nav class="main-nav">Home About Products Contact and many other long labels</nav>
            <script>console.log("another script body with plenty of words")</script>
            </body></html>"#;

        let record = extractor().parse_page("https://a.test", html);
        assert_eq!(record.body, NO_BODY_TEXT);
    }

    #[test]
    fn test_long_body_is_cut_to_two_thousand_chars() {
        let sentence = format!("{}abcd", "abcd ".repeat(499));
        let clean = format!("{}.", sentence);
        assert_eq!(clean.chars().count(), 2500);

        let html = format!("<html><body><div class=\"content\">{}</div></body></html>", sentence);
        let record = extractor().parse_page("https://a.test", &html);

        assert_eq!(record.body.chars().count(), MAX_BODY_CHARS);
        assert_eq!(record.body, clean[..MAX_BODY_CHARS]);
    }

    #[test]
    fn test_delay_precedes_every_attempt_including_failures() {
        let mut pages = HashMap::new();
        pages.insert("https://ok.test", Ok("<p>Paragraph content that is long enough</p>".to_string()));
        let extractor = PageExtractor::new(StaticPages(pages), Duration::from_millis(50));

        let started = Instant::now();
        assert!(extractor.extract("https://missing.test").is_err());
        assert!(extractor.extract("https://ok.test").is_ok());

        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_extract_fetches_and_reports_failures() {
        let mut pages = HashMap::new();
        pages.insert("https://ok.test", Ok("<p>Paragraph content that is long enough</p>".to_string()));
        pages.insert("https://down.test", Err(503));
        let extractor = PageExtractor::new(StaticPages(pages), Duration::ZERO);

        let record = extractor.extract("https://ok.test").unwrap();
        assert_eq!(record.body, "Paragraph content that is long enough.");

        match extractor.extract("https://down.test") {
            Err(FetchError::Status(503)) => {}
            other => panic!("expected status failure, got {:?}", other),
        }
    }
}
