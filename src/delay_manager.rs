use std::time::Duration;
use std::thread;
use log::debug;

/// Unconditional pause before a page fetch. Not adaptive: the same delay is
/// applied to every attempt, successful or not.
pub fn courtesy_delay(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    debug!("Waiting for {:?} (Fetch Delay)...", delay);
    thread::sleep(delay);
}
