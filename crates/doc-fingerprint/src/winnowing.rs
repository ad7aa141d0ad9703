//! Selecting representative hashes from a shingle hash stream.
//!
//! Two strategies with different guarantees share the [`HashSink`] interface:
//!
//! - [`WindowedWinnow`] buffers the whole stream and picks the rightmost
//!   minimum of every window of `w` consecutive hashes. Every such window
//!   contains at least one selected hash.
//! - [`StreamingWinnow`] decides per hash in O(1) and forgets its minimum on
//!   every emission. It is cheaper and weaker: windows can go unrepresented.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{FingerprintError, Result};
use crate::sink::HashSink;
use crate::types::HashPosition;

/// Which winnowing strategy a pipeline uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinnowMode {
    /// Sliding-window minimum with the every-window guarantee.
    #[default]
    Robust,
    /// Greedy-reset approximation without that guarantee.
    Streaming,
}

/// Rightmost minimum of every window of `window` consecutive hashes.
///
/// A selection is emitted only when it differs from the previous window's.
/// Sequences shorter than the window contain no full window and select
/// nothing. A window of 0 is treated as 1.
pub fn select_robust(hashes: &[HashPosition], window: usize) -> Vec<HashPosition> {
    let window = window.max(1);
    let n = hashes.len();
    if n < window {
        return Vec::new();
    }

    let mut selected = Vec::new();
    // Indices with strictly increasing hashes; the front is the window minimum.
    let mut candidates: VecDeque<usize> = VecDeque::with_capacity(window);
    let mut last: Option<usize> = None;

    for i in 0..n {
        while let Some(&back) = candidates.back() {
            if hashes[i].hash <= hashes[back].hash {
                candidates.pop_back();
            } else {
                break;
            }
        }
        candidates.push_back(i);

        if i + 1 < window {
            continue;
        }
        let start = i + 1 - window;
        while let Some(&front) = candidates.front() {
            if front < start {
                candidates.pop_front();
            } else {
                break;
            }
        }
        if let Some(&min) = candidates.front() {
            if last != Some(min) {
                selected.push(hashes[min]);
                last = Some(min);
            }
        }
    }
    selected
}

fn check_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(FingerprintError::config(
            "window",
            "winnowing window must be at least 1",
        ));
    }
    Ok(())
}

/// Robust winnowing stage. Buffers until [`HashSink::finish`].
pub struct WindowedWinnow<S> {
    window: usize,
    pending: Vec<HashPosition>,
    next: S,
}

impl<S: HashSink> WindowedWinnow<S> {
    pub fn new(window: usize, next: S) -> Result<Self> {
        check_window(window)?;
        Ok(Self {
            window,
            pending: Vec::new(),
            next,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn inner(&self) -> &S {
        &self.next
    }

    pub fn into_inner(self) -> S {
        self.next
    }
}

impl<S: HashSink> HashSink for WindowedWinnow<S> {
    fn accept(&mut self, hash: i32, position: usize) -> Result<()> {
        self.pending.push(HashPosition::new(hash, position));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let selected = select_robust(&self.pending, self.window);
        tracing::debug!(
            "robust winnowing kept {} of {} hashes (window {})",
            selected.len(),
            self.pending.len(),
            self.window
        );
        self.pending.clear();
        for hp in selected {
            self.next.accept(hp.hash, hp.position)?;
        }
        self.next.finish()
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.next.reset();
    }
}

/// Approximate online winnowing stage.
pub struct StreamingWinnow<S> {
    window: usize,
    current_min: Option<i32>,
    since_emit: usize,
    next: S,
}

impl<S: HashSink> StreamingWinnow<S> {
    pub fn new(window: usize, next: S) -> Result<Self> {
        check_window(window)?;
        Ok(Self {
            window,
            current_min: None,
            since_emit: 0,
            next,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn inner(&self) -> &S {
        &self.next
    }

    pub fn into_inner(self) -> S {
        self.next
    }
}

impl<S: HashSink> HashSink for StreamingWinnow<S> {
    fn accept(&mut self, hash: i32, position: usize) -> Result<()> {
        if self.current_min.is_none_or(|min| hash < min) {
            self.next.accept(hash, position)?;
            self.current_min = Some(hash);
            self.since_emit += 1;
        } else if self.since_emit >= self.window {
            self.next.accept(hash, position)?;
            self.current_min = None;
            self.since_emit = 0;
        } else {
            self.since_emit += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.next.finish()
    }

    fn reset(&mut self) {
        self.current_min = None;
        self.since_emit = 0;
        self.next.reset();
    }
}

/// Either strategy behind one type, chosen at runtime.
pub enum Winnower<S> {
    Windowed(WindowedWinnow<S>),
    Streaming(StreamingWinnow<S>),
}

impl<S: HashSink> Winnower<S> {
    pub fn new(mode: WinnowMode, window: usize, next: S) -> Result<Self> {
        Ok(match mode {
            WinnowMode::Robust => Self::Windowed(WindowedWinnow::new(window, next)?),
            WinnowMode::Streaming => Self::Streaming(StreamingWinnow::new(window, next)?),
        })
    }

    pub fn mode(&self) -> WinnowMode {
        match self {
            Self::Windowed(_) => WinnowMode::Robust,
            Self::Streaming(_) => WinnowMode::Streaming,
        }
    }

    pub fn into_inner(self) -> S {
        match self {
            Self::Windowed(w) => w.into_inner(),
            Self::Streaming(w) => w.into_inner(),
        }
    }
}

impl<S: HashSink> HashSink for Winnower<S> {
    fn accept(&mut self, hash: i32, position: usize) -> Result<()> {
        match self {
            Self::Windowed(w) => w.accept(hash, position),
            Self::Streaming(w) => w.accept(hash, position),
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self {
            Self::Windowed(w) => w.finish(),
            Self::Streaming(w) => w.finish(),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Windowed(w) => w.reset(),
            Self::Streaming(w) => w.reset(),
        }
    }
}
