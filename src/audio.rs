//! Sound cues and music, behind the [`AudioSink`] port.
//!
//! `SoundBoard` owns the mute flags and the "audio unlocked" flag (browsers
//! refuse playback until a user gesture has created an audio context). All
//! sink errors stop here.

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Click,
    Correct,
    Wrong,
}

/// Playback backend (HTML audio elements in the browser).
pub trait AudioSink {
    /// Performs whatever the platform needs before sound may play.
    fn unlock(&mut self) -> Result<()>;
    fn play_cue(&mut self, cue: Cue) -> Result<()>;
    /// Starts the background track from the beginning.
    fn play_music(&mut self) -> Result<()>;
    /// Continues the background track where it was paused.
    fn resume_music(&mut self) -> Result<()>;
    fn pause_music(&mut self) -> Result<()>;
}

/// Sink that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn unlock(&mut self) -> Result<()> {
        Ok(())
    }
    fn play_cue(&mut self, _cue: Cue) -> Result<()> {
        Ok(())
    }
    fn play_music(&mut self) -> Result<()> {
        Ok(())
    }
    fn resume_music(&mut self) -> Result<()> {
        Ok(())
    }
    fn pause_music(&mut self) -> Result<()> {
        Ok(())
    }
}

pub struct SoundBoard {
    sink: Box<dyn AudioSink>,
    unlocked: bool,
    sfx_muted: bool,
    bgm_muted: bool,
}

impl SoundBoard {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            unlocked: false,
            sfx_muted: false,
            bgm_muted: false,
        }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(SilentSink))
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn sfx_muted(&self) -> bool {
        self.sfx_muted
    }

    pub fn bgm_muted(&self) -> bool {
        self.bgm_muted
    }

    /// Unlocks playback once; later calls do nothing.
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        match self.sink.unlock() {
            Ok(()) => {
                self.unlocked = true;
                log::info!("audio initialized");
            }
            Err(e) => log::error!("audio initialization failed: {e}"),
        }
    }

    pub fn play(&mut self, cue: Cue) {
        if self.sfx_muted || !self.unlocked {
            return;
        }
        if let Err(e) = self.sink.play_cue(cue) {
            log::warn!("{cue:?} cue failed: {e}");
        }
    }

    /// Restarts the background track unless music is muted.
    pub fn start_music(&mut self) {
        if !self.unlocked || self.bgm_muted {
            return;
        }
        if let Err(e) = self.sink.play_music() {
            log::warn!("music control failed: {e}");
        }
    }

    /// Flips BGM mute and returns the new muted state.
    pub fn toggle_bgm(&mut self) -> bool {
        self.bgm_muted = !self.bgm_muted;
        let result = if self.bgm_muted {
            self.sink.pause_music()
        } else if self.unlocked {
            self.sink.resume_music()
        } else {
            Ok(())
        };
        if let Err(e) = result {
            log::warn!("BGM toggle failed: {e}");
        }
        self.bgm_muted
    }

    /// Flips SFX mute and returns the new muted state.
    pub fn toggle_sfx(&mut self) -> bool {
        self.sfx_muted = !self.sfx_muted;
        self.sfx_muted
    }
}

/// Button caption for a mute toggle, e.g. `BGM: On`.
pub fn toggle_label(name: &str, muted: bool) -> String {
    format!("{name}: {}", if muted { "Off" } else { "On" })
}
