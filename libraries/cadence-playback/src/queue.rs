//! Bounded per-room queue
//!
//! Structure:
//! ```text
//! Previous:  Track Z   (last track that was current)
//! Current:   Track A   (playing or about to play)
//! ─────────────────────────────
//! Pending (FIFO, at most max_size):
//!   1. Track B
//!   2. Track C
//! ```
//!
//! Positions shown to users are 1-based over the pending portion; every
//! method here takes 0-based indices.

use crate::error::{PlaybackError, Result};
use crate::types::LoopMode;
use cadence_core::Track;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Result of a bulk enqueue
///
/// Tracks are accepted in order until the queue is full; the rest are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueOutcome {
    pub accepted: usize,
    pub dropped: usize,
}

/// Owned copy of a queue for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub current: Option<Track>,
    pub previous: Option<Track>,
    pub pending: Vec<Track>,
    pub loop_mode: LoopMode,
}

/// Bounded FIFO of pending tracks plus current/previous slots
#[derive(Debug, Clone)]
pub struct Queue {
    /// Tracks waiting to play
    pending: VecDeque<Track>,

    /// Track handed to the engine most recently
    current: Option<Track>,

    /// Track that was current before the last advance
    previous: Option<Track>,

    loop_mode: LoopMode,

    /// Maximum pending length
    max_size: usize,
}

impl Queue {
    /// Create an empty queue holding at most `max_size` pending tracks
    pub fn new(max_size: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            current: None,
            previous: None,
            loop_mode: LoopMode::None,
            max_size,
        }
    }

    /// Append a track to the tail
    ///
    /// Returns the 1-based position of the new track.
    pub fn enqueue(&mut self, track: Track) -> Result<usize> {
        if self.is_full() {
            return Err(PlaybackError::QueueFull { max: self.max_size });
        }
        self.pending.push_back(track);
        Ok(self.pending.len())
    }

    /// Append tracks in order until the queue is full
    pub fn enqueue_many(&mut self, tracks: impl IntoIterator<Item = Track>) -> EnqueueOutcome {
        let mut outcome = EnqueueOutcome {
            accepted: 0,
            dropped: 0,
        };

        for track in tracks {
            if self.is_full() {
                outcome.dropped += 1;
            } else {
                self.pending.push_back(track);
                outcome.accepted += 1;
            }
        }

        outcome
    }

    /// Put a track at the head so it plays next
    pub fn push_front(&mut self, track: Track) -> Result<()> {
        if self.is_full() {
            return Err(PlaybackError::QueueFull { max: self.max_size });
        }
        self.pending.push_front(track);
        Ok(())
    }

    /// Remove the pending track at `index` (0-based)
    pub fn remove_at(&mut self, index: usize) -> Result<Track> {
        let len = self.pending.len();
        self.pending
            .remove(index)
            .ok_or(PlaybackError::IndexOutOfRange { index, len })
    }

    /// Randomly permute the pending tracks
    ///
    /// Current and previous are untouched.
    pub fn shuffle(&mut self) -> Result<()> {
        self.shuffle_with(&mut rand::thread_rng())
    }

    /// Shuffle with a caller-supplied RNG (Fisher-Yates)
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if self.pending.len() < 2 {
            return Err(PlaybackError::InsufficientTracks {
                len: self.pending.len(),
            });
        }
        self.pending.make_contiguous().shuffle(rng);
        Ok(())
    }

    /// Drop every pending track
    ///
    /// Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.pending.len();
        self.pending.clear();
        removed
    }

    /// Drop everything, including current and previous
    pub fn reset(&mut self) {
        self.pending.clear();
        self.current = None;
        self.previous = None;
    }

    /// Move to the next track
    ///
    /// With [`LoopMode::Queue`] the outgoing current track is re-appended to
    /// the tail first. `previous` only changes when there was a current track.
    pub fn advance(&mut self) -> Option<&Track> {
        if let Some(outgoing) = self.current.take() {
            if self.loop_mode == LoopMode::Queue {
                self.pending.push_back(outgoing.clone());
            }
            self.previous = Some(outgoing);
        }

        self.current = self.pending.pop_front();
        self.current.as_ref()
    }

    /// Set loop mode
    pub fn set_loop(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    /// Flip loop mode, returning the new one
    pub fn toggle_loop(&mut self) -> LoopMode {
        self.loop_mode = self.loop_mode.toggled();
        self.loop_mode
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&Track> {
        self.previous.as_ref()
    }

    /// Pending track at `index` (0-based)
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.pending.get(index)
    }

    /// Pending tracks in play order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.pending.iter()
    }

    /// Number of pending tracks
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.max_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Copy out the state for rendering
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            current: self.current.clone(),
            previous: self.previous.clone(),
            pending: self.pending.iter().cloned().collect(),
            loop_mode: self.loop_mode,
        }
    }
}
