use harvester_lib::{config, corpus_writer, logger};
use harvester_lib::{DuckDuckGo, HarvestConfig, HarvestController, HarvestOutcome, HttpFetcher};

use std::error::Error;
use log::{info, error};

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    let config = HarvestConfig::load(config::DEFAULT_CONFIG_FILE);
    logger::set_level(&config.log_level);

    if let Err(e) = config.validate() {
        error!("{}", e);
        return Err(e.into());
    }

    info!("Starting scraper for keywords: {}", config.keywords.join(", "));

    let search_engine = DuckDuckGo::new(&config.user_agent)?;
    let fetcher = HttpFetcher::new(&config.user_agent, config.request_timeout())?;

    let report = HarvestController::new(&config, search_engine, fetcher).run();

    // A shortfall has already been reported by the controller
    if report.outcome == HarvestOutcome::TargetMet {
        info!("Collected all {} requested records from {} attempts.", report.records.len(), report.attempted.len());
    }

    if let Err(e) = corpus_writer::persist(&report.records, &config.output_path) {
        error!("Could not save results: {}", e);
        return Err(e.into());
    }

    info!("Scraping complete! Data saved to {}", config.output_path.display());
    info!("Total entries: {}", report.records.len());
    Ok(())
}
