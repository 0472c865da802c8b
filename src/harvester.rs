use std::collections::{HashSet, VecDeque};
use log::{info, warn};
use crate::config::HarvestConfig;
use crate::extractor::{PageExtractor, ScrapeRecord};
use crate::fetcher::PageFetcher;
use crate::search_engine::{self, SearchProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestState {
    Discovering,
    Dispatching,
    Backfilling,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestOutcome {
    TargetMet,
    /// Candidates ran out before the target was reached.
    Exhausted { shortfall: usize },
}

#[derive(Debug)]
pub struct HarvestReport {
    /// Successful records in the order they were extracted.
    pub records: Vec<ScrapeRecord>,
    /// Every URL handed to the extractor, whatever the result.
    pub attempted: HashSet<String>,
    pub outcome: HarvestOutcome,
    pub backfill_calls: usize,
}

/// Pulls candidate URLs from the search provider and extracts them one at a
/// time until `target_count` records exist or no new candidates turn up.
///
/// A URL is handed to the extractor at most once per run. Failed URLs are
/// never retried; the controller moves on to the next candidate and asks
/// the provider for more once the queue runs dry.
pub struct HarvestController<'c, P: SearchProvider, F: PageFetcher> {
    config: &'c HarvestConfig,
    provider: P,
    extractor: PageExtractor<F>,
    state: HarvestState,
    queue: VecDeque<String>,
    attempted: HashSet<String>,
    corpus: Vec<ScrapeRecord>,
    backfill_calls: usize,
}

impl<'c, P: SearchProvider, F: PageFetcher> HarvestController<'c, P, F> {
    pub fn new(config: &'c HarvestConfig, provider: P, fetcher: F) -> Self {
        HarvestController {
            config,
            provider,
            extractor: PageExtractor::new(fetcher, config.fetch_delay()),
            state: HarvestState::Discovering,
            queue: VecDeque::new(),
            attempted: HashSet::new(),
            corpus: Vec::new(),
            backfill_calls: 0,
        }
    }

    pub fn state(&self) -> HarvestState {
        self.state
    }

    /// Drives the state machine to `Done`.
    pub fn run(mut self) -> HarvestReport {
        info!(
            "Starting harvest for {} keywords, target {} records.",
            self.config.keywords.len(),
            self.config.target_count
        );

        while self.state != HarvestState::Done {
            self.step();
        }

        let target = self.config.target_count;
        let outcome = if self.corpus.len() >= target {
            HarvestOutcome::TargetMet
        } else {
            HarvestOutcome::Exhausted { shortfall: target - self.corpus.len() }
        };

        HarvestReport {
            records: self.corpus,
            attempted: self.attempted,
            outcome,
            backfill_calls: self.backfill_calls,
        }
    }

    /// Performs the work of the current state and moves to the next one.
    pub fn step(&mut self) -> HarvestState {
        self.state = match self.state {
            HarvestState::Discovering => self.discover_initial(),
            HarvestState::Dispatching => self.dispatch_next(),
            HarvestState::Backfilling => self.backfill(),
            HarvestState::Done => HarvestState::Done,
        };
        self.state
    }

    fn remaining(&self) -> usize {
        self.config.target_count.saturating_sub(self.corpus.len())
    }

    fn discover_initial(&mut self) -> HarvestState {
        let target = self.config.target_count;
        if target == 0 {
            return HarvestState::Done;
        }

        let urls = search_engine::discover(&self.provider, &self.config.keywords, target);
        self.enqueue_new(urls);
        info!("Initial discovery queued {} candidates.", self.queue.len());
        HarvestState::Dispatching
    }

    fn dispatch_next(&mut self) -> HarvestState {
        if self.remaining() == 0 {
            info!("Target of {} records reached.", self.config.target_count);
            return HarvestState::Done;
        }

        let Some(url) = self.queue.pop_front() else {
            return HarvestState::Backfilling;
        };

        // Backfill batches can overlap with URLs queued before them
        if !self.attempted.insert(url.clone()) {
            return HarvestState::Dispatching;
        }

        info!("Scraping {}: {}", self.attempted.len(), url);
        match self.extractor.extract(&url) {
            Ok(record) => {
                self.corpus.push(record);
                info!("Collected {}/{} records.", self.corpus.len(), self.config.target_count);
            }
            Err(e) => {
                warn!(
                    "Skipping {} ({}). Still at {}/{} records.",
                    url,
                    e,
                    self.corpus.len(),
                    self.config.target_count
                );
            }
        }
        HarvestState::Dispatching
    }

    fn backfill(&mut self) -> HarvestState {
        if let Some(limit) = self.config.max_backfill_rounds {
            if self.backfill_calls >= limit {
                return self.finish_exhausted("backfill limit reached");
            }
        }
        self.backfill_calls += 1;

        let request = self.remaining() * self.config.backfill_multiplier;
        info!(
            "Candidate queue exhausted at {}/{} records. Backfilling with up to {} URLs.",
            self.corpus.len(),
            self.config.target_count,
            request
        );

        let urls = search_engine::discover(&self.provider, &self.config.keywords, request);
        let added = self.enqueue_new(urls);
        if added == 0 {
            return self.finish_exhausted("backfill found no new URLs");
        }

        info!("Backfill queued {} new candidates.", added);
        HarvestState::Dispatching
    }

    /// Appends URLs that are neither attempted nor already queued. Returns
    /// how many were added.
    fn enqueue_new(&mut self, urls: Vec<String>) -> usize {
        let mut added = 0;
        for url in urls {
            if self.attempted.contains(&url) || self.queue.contains(&url) {
                continue;
            }
            self.queue.push_back(url);
            added += 1;
        }
        added
    }

    fn finish_exhausted(&self, reason: &str) -> HarvestState {
        warn!(
            "Stopping with {}/{} records after {} attempts: {}.",
            self.corpus.len(),
            self.config.target_count,
            self.attempted.len(),
            reason
        );
        HarvestState::Done
    }
}
