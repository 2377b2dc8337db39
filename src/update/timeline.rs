//! Time-paced splitting of a single edit into word-sized sub-edits.
//!
//! The timeline is a lazy, finite, non-restartable sequence: iterating
//! yields one chunk per timer tick, and the concatenation of all chunks
//! (plus whatever [`EditTimeline::drain_rest`] returns after an early stop)
//! always equals the original text. The emission rate derives from
//! `text length / duration`; chunks are at least one character, so short
//! or empty texts never divide by zero.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::util::text::split_word_chunks;

/// Cooperative cancellation flag, checked between timer ticks.
///
/// Cancellation is not an error: the caller applies the remaining text as
/// one final synchronous edit, so the end state is always complete.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Options for progressive application. When absent, edits apply
/// immediately and atomically.
#[derive(Debug, Clone)]
pub struct PacingOptions {
    /// Total time budget for the batch
    pub duration: Duration,
    /// Cancellation handle checked between ticks
    pub token: CancellationToken,
}

impl PacingOptions {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            token: CancellationToken::new(),
        }
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }
}

/// The repeating timer the host drives pacing with, bound to its
/// animation/idle clock.
///
/// `wait` blocks until the next tick and returns false when the host is
/// shutting down, which callers treat like cancellation.
pub trait FrameClock {
    fn wait(&mut self, interval: Duration) -> bool;
}

/// Wall-clock pacing for interactive hosts.
#[derive(Debug, Default)]
pub struct SystemClock;

impl FrameClock for SystemClock {
    fn wait(&mut self, interval: Duration) -> bool {
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
        true
    }
}

/// Zero-delay clock for headless hosts and tests: every tick is
/// immediately due.
#[derive(Debug, Default)]
pub struct ImmediateClock {
    /// Number of ticks waited on, for assertions
    pub ticks: usize,
}

impl FrameClock for ImmediateClock {
    fn wait(&mut self, _interval: Duration) -> bool {
        self.ticks += 1;
        true
    }
}

/// Lazy sequence of sub-edit chunks for one edit's inserted text.
#[derive(Debug)]
pub struct EditTimeline {
    chunks: std::vec::IntoIter<String>,
    interval: Duration,
}

impl EditTimeline {
    /// Split `text` into word chunks paced evenly across `duration`.
    pub fn new(text: &str, duration: Duration) -> Self {
        let chunks = split_word_chunks(text);
        let interval = if chunks.is_empty() {
            Duration::ZERO
        } else {
            duration / chunks.len() as u32
        };
        Self {
            chunks: chunks.into_iter(),
            interval,
        }
    }

    /// Time between chunk emissions
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of chunks not yet emitted
    pub fn remaining(&self) -> usize {
        self.chunks.len()
    }

    /// Concatenate and consume everything not yet emitted. Used on
    /// cancellation so the caller can finish with one synchronous edit.
    pub fn drain_rest(&mut self) -> String {
        let mut rest = String::new();
        for chunk in self.chunks.by_ref() {
            rest.push_str(&chunk);
        }
        rest
    }
}

impl Iterator for EditTimeline {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.chunks.next()
    }
}
