//! Lyric-word background animation.
//!
//! Every displayed word is a bouncing particle driven by its own
//! [`TaskHandle`]. The controller owns the word set and the handles of the
//! running tasks; it never looks a task up individually, it only cancels all
//! of them at once.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, trace};

use crate::{
    config::RemoteConfig,
    events::{EventBus, RemoteEvent},
    motion::{random_position, Body, Bounds, Extent, SpeedRange, Vec2},
    playback::PlaybackFlag,
    scheduler::{FrameScheduler, TaskHandle},
};

/// Snapshot of one displayed word.
#[derive(Debug, Clone, PartialEq)]
pub struct WordState {
    pub text: String,
    pub position: Vec2,
    pub velocity: Vec2,
}

struct Word {
    index: usize,
    text: String,
    extent: Extent,
    body: Mutex<Body>,
}

impl Word {
    fn state(&self) -> WordState {
        let body = *self.body.lock();
        WordState {
            text: self.text.clone(),
            position: body.position,
            velocity: body.velocity,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    bounds: Bounds,
    speed: SpeedRange,
    glyph_width: f32,
    line_height: f32,
}

struct AnimationState {
    words: Vec<Arc<Word>>,
    active: Vec<TaskHandle>,
    rng: StdRng,
    generation: u64,
}

impl AnimationState {
    fn cancel_all(&mut self) {
        for handle in self.active.drain(..) {
            handle.cancel();
        }
    }
}

pub struct AnimationController {
    flag: PlaybackFlag,
    events: EventBus,
    frames: FrameScheduler,
    layout: Layout,
    state: Mutex<AnimationState>,
}

impl AnimationController {
    pub fn new(config: &RemoteConfig, flag: PlaybackFlag, events: EventBus) -> Self {
        Self::with_rng(config, flag, events, StdRng::from_entropy())
    }

    pub fn with_rng(
        config: &RemoteConfig,
        flag: PlaybackFlag,
        events: EventBus,
        rng: StdRng,
    ) -> Self {
        Self {
            flag,
            events,
            frames: FrameScheduler::frames(config.frame_period),
            layout: Layout {
                bounds: config.display,
                speed: config.speed,
                glyph_width: config.glyph_width,
                line_height: config.line_height,
            },
            state: Mutex::new(AnimationState {
                words: Vec::new(),
                active: Vec::new(),
                rng,
                generation: 0,
            }),
        }
    }

    /// Cancels every task, discards the current words and lays out `texts`
    /// at random positions. Motion starts only if audio is playing.
    pub fn replace_words(&self, texts: Vec<String>) {
        let mut state = self.state.lock();
        state.cancel_all();

        let layout = self.layout;
        let rng = &mut state.rng;
        let words: Vec<Arc<Word>> = texts
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let extent = Extent::of_text(text, layout.glyph_width, layout.line_height);
                let position = random_position(&mut *rng, extent, layout.bounds);
                let velocity = layout.speed.random_velocity(&mut *rng);
                Arc::new(Word {
                    index,
                    text: text.clone(),
                    extent,
                    body: Mutex::new(Body { position, velocity }),
                })
            })
            .collect();
        state.words = words;
        state.generation += 1;
        debug!(
            words = state.words.len(),
            generation = state.generation,
            "replaced lyric words"
        );
        self.events.emit(RemoteEvent::WordsReplaced(texts));

        if self.flag.is_playing() {
            self.spawn_all(&mut state);
        }
    }

    /// Cancels every running word task. Calling it again is a no-op.
    pub fn stop_all(&self) {
        let mut state = self.state.lock();
        let cancelled = state.active.len();
        state.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "stopped word animation");
        }
    }

    /// Restarts motion for every current word with a freshly drawn velocity.
    /// Tasks still registered from an earlier start are cancelled first, so
    /// exactly one task per word is left running.
    pub fn resume_all(&self) {
        let mut state = self.state.lock();
        state.cancel_all();
        let speed = self.layout.speed;
        let AnimationState { words, rng, .. } = &mut *state;
        for word in words.iter() {
            word.body.lock().velocity = speed.random_velocity(&mut *rng);
        }
        self.spawn_all(&mut state);
        debug!(words = state.words.len(), "resumed word animation");
    }

    fn spawn_all(&self, state: &mut AnimationState) {
        let handles: Vec<TaskHandle> = state
            .words
            .iter()
            .map(|word| self.spawn_word_motion(Arc::clone(word)))
            .collect();
        state.active.extend(handles);
    }

    fn spawn_word_motion(&self, word: Arc<Word>) -> TaskHandle {
        let flag = self.flag.clone();
        let events = self.events.clone();
        let frames = self.frames;
        let bounds = self.layout.bounds;
        TaskHandle::spawn(async move {
            let mut ticker = frames.ticker();
            loop {
                ticker.tick().await;
                if !flag.is_playing() {
                    trace!(index = word.index, "word motion halted: playback stopped");
                    return;
                }
                let position = {
                    let mut body = word.body.lock();
                    body.step(word.extent, bounds);
                    body.position
                };
                events.emit(RemoteEvent::WordMoved {
                    index: word.index,
                    position,
                });
            }
        })
    }

    /// Handles registered since the last stop, including tasks that already
    /// halted on their own.
    pub fn active_tasks(&self) -> usize {
        self.state.lock().active.len()
    }

    /// Number of word sets installed so far.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn words(&self) -> Vec<WordState> {
        self.state.lock().words.iter().map(|word| word.state()).collect()
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
