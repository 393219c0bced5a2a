// HTML <audio> elements behind the AudioSink port.
//
// play() and AudioContext.resume() fail asynchronously: autoplay refusals and
// missing sources reject the returned promise instead of throwing. Every such
// promise gets a rejection handler that logs and counts the failure.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use web_sys::js_sys::Promise;
use web_sys::{AudioContext, Document, HtmlAudioElement};

use super::dom::by_id;
use crate::audio::{AudioSink, Cue};
use crate::error::{GameError, Result};

fn playback(e: JsValue) -> GameError {
    GameError::Playback(format!("{e:?}"))
}

/// Logs rejections for one audio source. The closure is reused for every
/// promise of that source, so it must outlive them; the sink is kept for the
/// life of the page.
struct OnRejected {
    closure: Closure<dyn FnMut(JsValue)>,
}

impl OnRejected {
    fn new(source: &'static str, rejected: Rc<Cell<u32>>) -> Self {
        let closure = Closure::wrap(Box::new(move |reason: JsValue| {
            rejected.set(rejected.get() + 1);
            log::warn!("{source} playback rejected: {reason:?}");
        }) as Box<dyn FnMut(JsValue)>);
        Self { closure }
    }

    fn watch(&self, promise: Promise) {
        // The chained promise resolves once the handler ran; nothing waits on it.
        let _ = promise.catch(&self.closure);
    }
}

struct Track {
    el: HtmlAudioElement,
    on_rejected: OnRejected,
}

impl Track {
    fn new(el: HtmlAudioElement, source: &'static str, rejected: &Rc<Cell<u32>>) -> Self {
        Self {
            el,
            on_rejected: OnRejected::new(source, Rc::clone(rejected)),
        }
    }

    fn play(&self) -> Result<()> {
        let promise = self.el.play().map_err(playback)?;
        self.on_rejected.watch(promise);
        Ok(())
    }

    fn restart(&self) -> Result<()> {
        self.el.set_current_time(0.0);
        self.play()
    }
}

pub struct HtmlAudioSink {
    click: Track,
    correct: Track,
    wrong: Track,
    music: Track,
    // Kept alive so the unlocked context is not collected.
    context: Option<AudioContext>,
    on_resume_rejected: OnRejected,
    rejected: Rc<Cell<u32>>,
}

impl HtmlAudioSink {
    pub fn attach(doc: &Document) -> std::result::Result<Self, JsValue> {
        Ok(Self::from_elements(
            by_id(doc, "click-sound")?,
            by_id(doc, "correct-sound")?,
            by_id(doc, "wrong-sound")?,
            by_id(doc, "background-music")?,
        ))
    }

    pub fn from_elements(
        click: HtmlAudioElement,
        correct: HtmlAudioElement,
        wrong: HtmlAudioElement,
        music: HtmlAudioElement,
    ) -> Self {
        let rejected = Rc::new(Cell::new(0));
        Self {
            click: Track::new(click, "click sound", &rejected),
            correct: Track::new(correct, "correct sound", &rejected),
            wrong: Track::new(wrong, "wrong sound", &rejected),
            music: Track::new(music, "background music", &rejected),
            context: None,
            on_resume_rejected: OnRejected::new("audio context", Rc::clone(&rejected)),
            rejected,
        }
    }

    /// Playback requests the browser has rejected so far.
    pub fn rejected_plays(&self) -> u32 {
        self.rejected.get()
    }

    fn track(&self, cue: Cue) -> &Track {
        match cue {
            Cue::Click => &self.click,
            Cue::Correct => &self.correct,
            Cue::Wrong => &self.wrong,
        }
    }
}

impl AudioSink for HtmlAudioSink {
    fn unlock(&mut self) -> Result<()> {
        let context = AudioContext::new().map_err(playback)?;
        self.on_resume_rejected
            .watch(context.resume().map_err(playback)?);
        self.context = Some(context);
        Ok(())
    }

    fn play_cue(&mut self, cue: Cue) -> Result<()> {
        self.track(cue).restart()
    }

    fn play_music(&mut self) -> Result<()> {
        self.music.restart()
    }

    fn resume_music(&mut self) -> Result<()> {
        self.music.play()
    }

    fn pause_music(&mut self) -> Result<()> {
        self.music.el.pause().map_err(playback)
    }
}
