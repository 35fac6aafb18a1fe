use js_sys::Array;
use wasm_bindgen::prelude::*;

use weave_core::commentary::{CommentaryFeed, FeedPhase};

/// The commentary-feed state machine for a JS driver that owns the actual
/// network call. The expected loop, on an interval timer independent of the
/// render loop:
///
/// ```text
/// if (feed.begin_request()) {
///   try {
///     feed.record_success(await service(sim.summary()));
///   } catch (e) {
///     isQuota(e) ? feed.record_quota_exhausted() : feed.record_failure();
///   }
/// }
/// ```
#[wasm_bindgen]
pub struct WasmCommentaryFeed {
    feed: CommentaryFeed,
}

#[wasm_bindgen]
impl WasmCommentaryFeed {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCommentaryFeed {
        WasmCommentaryFeed {
            feed: CommentaryFeed::new(),
        }
    }

    pub fn should_request(&self) -> bool {
        self.feed.should_request()
    }

    /// False means the request was rejected (one already outstanding, or
    /// the feed is cooling down or paused).
    pub fn begin_request(&mut self) -> bool {
        self.feed.begin_request()
    }

    pub fn record_success(&mut self, message: &str) {
        self.feed.record_success(message);
    }

    pub fn record_failure(&mut self) {
        self.feed.record_failure();
    }

    pub fn record_quota_exhausted(&mut self) {
        self.feed.record_quota_exhausted();
    }

    pub fn clear_cooldown(&mut self) {
        self.feed.clear_cooldown();
    }

    pub fn pause(&mut self) {
        self.feed.pause();
    }

    pub fn resume(&mut self) {
        self.feed.resume();
    }

    pub fn phase(&self) -> String {
        match self.feed.phase() {
            FeedPhase::Active => "active".to_string(),
            FeedPhase::CoolingDown => "cooling-down".to_string(),
            FeedPhase::Paused => "paused".to_string(),
        }
    }

    /// Log entries, newest first.
    pub fn entries(&self) -> Array {
        self.feed.entries().map(JsValue::from_str).collect()
    }
}

impl Default for WasmCommentaryFeed {
    fn default() -> Self {
        Self::new()
    }
}
