//! Browser clock for the upload progress animation.

use gloo_timers::future::TimeoutFuture;
use textassist::Ticker;

use crate::config::PROGRESS_TICK_MS;

/// [`Ticker`] that sleeps on `setTimeout`.
#[derive(Clone, Copy, Debug)]
pub struct TimeoutTicker {
    millis: u32,
}

impl TimeoutTicker {
    pub fn new(millis: u32) -> Self {
        Self { millis }
    }
}

impl Default for TimeoutTicker {
    fn default() -> Self {
        Self::new(PROGRESS_TICK_MS)
    }
}

impl Ticker for TimeoutTicker {
    async fn tick(&self) {
        TimeoutFuture::new(self.millis).await;
    }
}
