use reqwest::blocking::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use log::{info, warn, debug};
use url::Url;
use crate::error::DiscoveryError;

const DDG_HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// One entry of a search result page.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub href: String,
    pub title: String,
}

/// Anything that can turn a query into an ordered list of result links.
pub trait SearchProvider {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, DiscoveryError>;
}

impl<T: SearchProvider + ?Sized> SearchProvider for &T {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, DiscoveryError> {
        (**self).search(query, max_results)
    }
}

/// Queries every keyword in order and merges the results into a list of
/// unique URLs, first occurrence wins, capped at `max_results`.
///
/// A provider failure for one keyword is logged and counted as zero results.
pub fn discover<P: SearchProvider + ?Sized>(provider: &P, keywords: &[String], max_results: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    if max_results == 0 {
        return urls;
    }

    for keyword in keywords {
        match provider.search(keyword, max_results) {
            Ok(hits) => {
                debug!("'{}' returned {} results", keyword, hits.len());
                for hit in hits {
                    if seen.insert(hit.href.clone()) {
                        urls.push(hit.href);
                    }
                }
            }
            Err(e) => {
                warn!("Error searching for '{}': {}", keyword, e);
            }
        }
    }

    urls.truncate(max_results);
    info!("Found {} unique URLs.", urls.len());
    urls
}

/// Search provider backed by DuckDuckGo's JavaScript-free results page.
pub struct DuckDuckGo {
    client: Client,
}

impl DuckDuckGo {
    pub fn new(user_agent: &str) -> Result<Self, DiscoveryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;

        Ok(DuckDuckGo { client })
    }

    fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchHit>, DiscoveryError> {
        let document = Html::parse_document(html);
        // DDG HTML marks each organic result title link with .result__a
        let selector = Selector::parse("a.result__a")
            .map_err(|e| DiscoveryError::Parse(format!("{:?}", e)))?;

        let mut hits = Vec::new();
        for element in document.select(&selector) {
            if hits.len() >= max_results {
                break;
            }
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if let Some(target) = resolve_result_href(href) {
                let title = element.text().collect::<String>().trim().to_string();
                hits.push(SearchHit { href: target, title });
            }
        }
        Ok(hits)
    }
}

impl SearchProvider for DuckDuckGo {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, DiscoveryError> {
        let search_url = format!("{}?q={}", DDG_HTML_ENDPOINT, urlencoding::encode(query));
        info!("Searching for: '{}'", query);

        let resp = self.client.get(&search_url).send()?;
        if !resp.status().is_success() {
            return Err(DiscoveryError::Status(resp.status().as_u16()));
        }
        let text = resp.text()?;

        Self::parse_results(&text, max_results)
    }
}

/// Turns a result link into the page it points at. DDG wraps targets in
/// `//duckduckgo.com/l/?uddg=<target>` redirects; ads and other DDG-internal
/// links yield `None`.
fn resolve_result_href(href: &str) -> Option<String> {
    let base = Url::parse(DDG_HTML_ENDPOINT).ok()?;
    let link = base.join(href).ok()?;

    let on_ddg = link.domain().map_or(false, |d| d == "duckduckgo.com" || d.ends_with(".duckduckgo.com"));
    let target = if on_ddg {
        if link.path() != "/l/" {
            return None;
        }
        let (_, value) = link.query_pairs().find(|(k, _)| k == "uddg")?;
        value.into_owned()
    } else {
        href.to_string()
    };

    match Url::parse(&target) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Some(target),
        _ => None,
    }
}
