use crate::algorithms::SearchResult;
use crate::grid::Position;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Shortest delay between frames.
pub const MIN_DELAY: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Visit(Position),
    Path(Position),
}

impl Frame {
    pub fn position(&self) -> Position {
        match self {
            Frame::Visit(p) | Frame::Path(p) => *p,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Completed,
    Cancelled,
}

/// Shared flag used to abort a replay from another thread or callback.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Cancels the token from a background thread as soon as `input` yields a
    /// line. End of input or a read error leaves the token alone.
    pub fn cancel_on_line<R>(&self, mut input: R) -> thread::JoinHandle<()>
    where
        R: BufRead + Send + 'static,
    {
        let token = self.clone();
        thread::spawn(move || {
            let mut line = String::new();
            if matches!(input.read_line(&mut line), Ok(n) if n > 0) {
                token.cancel();
            }
        })
    }
}

/// Frames of a search result in replay order: every visited cell, then every
/// path cell. Path frames use half the visit delay.
pub struct Playback<'a> {
    result: &'a SearchResult,
    cursor: usize,
    delay: Duration,
}

impl<'a> Playback<'a> {
    pub fn new(result: &'a SearchResult, delay: Duration) -> Self {
        Playback {
            result,
            cursor: 0,
            delay: delay.max(MIN_DELAY),
        }
    }

    pub fn len(&self) -> usize {
        self.result.visit_order.len() + self.result.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for Playback<'_> {
    type Item = (Frame, Duration);

    fn next(&mut self) -> Option<Self::Item> {
        let visits = self.result.visit_order.len();
        let frame = if self.cursor < visits {
            (Frame::Visit(self.result.visit_order[self.cursor]), self.delay)
        } else {
            let p = *self.result.path.get(self.cursor - visits)?;
            (Frame::Path(p), self.delay / 2)
        };
        self.cursor += 1;
        Some(frame)
    }
}

/// Replays `result`, calling `on_frame` for each frame and sleeping for the
/// frame's delay. Cancellation is checked before every frame.
pub fn play<F>(
    result: &SearchResult,
    delay: Duration,
    token: &CancelToken,
    mut on_frame: F,
) -> PlaybackOutcome
where
    F: FnMut(Frame),
{
    for (frame, wait) in Playback::new(result, delay) {
        if token.is_cancelled() {
            return PlaybackOutcome::Cancelled;
        }
        on_frame(frame);
        thread::sleep(wait);
    }
    PlaybackOutcome::Completed
}

/// Status line shown once a replay finishes.
pub fn status(result: &SearchResult) -> &'static str {
    if result.is_reachable() {
        "done"
    } else {
        "no path"
    }
}
