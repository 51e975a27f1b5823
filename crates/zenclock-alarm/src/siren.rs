//! Alarm siren: a single tone resource swept between two pitches.
//!
//! `Siren` is a cheap clonable handle; all clones share one output and at
//! most one active tone. The output is created lazily, on the first user
//! interaction (`unlock`) or when an alarm first rings.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use zenclock_core::{Component, ComponentContext, SirenConfig};

/// Interval between pitch updates sent to the output.
const STEP: Duration = Duration::from_millis(250);

/// Something that can play (or stop playing) a tone.
pub trait ToneSink: Send + Sync {
    fn tone(&self, frequency_hz: f32);
    fn silence(&self);
}

/// Creates the tone output on first use.
pub type SinkFactory = Arc<dyn Fn() -> Arc<dyn ToneSink> + Send + Sync>;

/// One-second sweep base -> peak -> base, repeated until `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SirenPattern {
    pub base_hz: f32,
    pub peak_hz: f32,
    pub duration: Duration,
}

impl Default for SirenPattern {
    fn default() -> Self {
        Self::from(&SirenConfig::default())
    }
}

impl From<&SirenConfig> for SirenPattern {
    fn from(config: &SirenConfig) -> Self {
        Self {
            base_hz: config.base_hz,
            peak_hz: config.peak_hz,
            duration: Duration::from_secs(config.duration_secs),
        }
    }
}

impl SirenPattern {
    /// Pitch at `elapsed` since the siren started, `None` once it is over.
    pub fn frequency_at(&self, elapsed: Duration) -> Option<f32> {
        if elapsed >= self.duration {
            return None;
        }
        let phase = elapsed.as_secs_f32().fract();
        let span = self.peak_hz - self.base_hz;
        let f = if phase < 0.5 {
            self.base_hz + span * (phase / 0.5)
        } else {
            self.peak_hz - span * ((phase - 0.5) / 0.5)
        };
        Some(f)
    }
}

#[derive(Default)]
struct SirenState {
    sink: Option<Arc<dyn ToneSink>>,
    active: Option<(u64, CancellationToken)>,
    generation: u64,
}

#[derive(Clone)]
pub struct Siren {
    state: Arc<Mutex<SirenState>>,
    pattern: SirenPattern,
    factory: SinkFactory,
}

impl std::fmt::Debug for Siren {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Siren")
            .field("pattern", &self.pattern)
            .field("ringing", &self.is_ringing())
            .finish()
    }
}

impl Siren {
    pub fn new(pattern: SirenPattern, factory: SinkFactory) -> Self {
        Self {
            state: Arc::new(Mutex::new(SirenState::default())),
            pattern,
            factory,
        }
    }

    /// Siren that rings the terminal bell.
    pub fn terminal(pattern: SirenPattern) -> Self {
        let peak = pattern.peak_hz;
        Self::new(
            pattern,
            Arc::new(move || Arc::new(TerminalBell::new(peak)) as Arc<dyn ToneSink>),
        )
    }

    /// Create the output if it does not exist yet.
    pub fn unlock(&self) {
        let mut state = self.state.lock();
        if state.sink.is_none() {
            tracing::debug!("Creating siren output");
            state.sink = Some((self.factory)());
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.state.lock().sink.is_some()
    }

    pub fn is_ringing(&self) -> bool {
        self.state.lock().active.is_some()
    }

    /// Start the siren, replacing any tone already playing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(h) => h,
            Err(e) => {
                tracing::error!("Cannot start siren outside a runtime: {}", e);
                return;
            }
        };

        self.stop();
        self.unlock();

        let (sink, generation, token) = {
            let mut state = self.state.lock();
            let Some(sink) = state.sink.clone() else {
                return;
            };
            state.generation += 1;
            let token = CancellationToken::new();
            state.active = Some((state.generation, token.clone()));
            (sink, state.generation, token)
        };

        tracing::info!("Siren started");
        let pattern = self.pattern;
        let state = self.state.clone();

        handle.spawn(async move {
            let mut ticker = tokio::time::interval(STEP);
            let mut step: u32 = 0;

            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = ticker.tick() => {
                        match pattern.frequency_at(STEP * step) {
                            Some(f) => sink.tone(f),
                            None => break,
                        }
                        step += 1;
                    }
                }
            }

            sink.silence();
            let mut state = state.lock();
            if matches!(state.active, Some((g, _)) if g == generation) {
                state.active = None;
                tracing::info!("Siren finished");
            }
        });
    }

    /// Stop and silence the active tone, if any.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if let Some((_, token)) = state.active.take() {
            token.cancel();
            if let Some(sink) = &state.sink {
                sink.silence();
            }
            tracing::info!("Siren stopped");
        }
    }
}

impl Component for Siren {
    fn id(&self) -> &str {
        "siren"
    }

    fn name(&self) -> &str {
        "Alarm siren"
    }

    fn initialize(&mut self, _ctx: &ComponentContext) -> Result<()> {
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.stop();
        self.state.lock().sink = None;
        Ok(())
    }
}

/// Tone output for a text terminal: rings the bell once per sweep, at the peak.
#[derive(Debug, Clone, Copy)]
pub struct TerminalBell {
    peak_hz: f32,
}

impl TerminalBell {
    pub fn new(peak_hz: f32) -> Self {
        Self { peak_hz }
    }
}

impl ToneSink for TerminalBell {
    fn tone(&self, frequency_hz: f32) {
        if (frequency_hz - self.peak_hz).abs() < 1.0 {
            let mut out = std::io::stdout().lock();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }
    }

    fn silence(&self) {}
}
