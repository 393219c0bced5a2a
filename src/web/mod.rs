//! Browser front-end.
//!
//! Binds the page (menus, selects, swatches, `<audio>` elements,
//! `localStorage`, `setInterval`) to a single [`GameSession`] kept in a
//! thread-local. Every DOM event handler and interval callback borrows the app
//! for the duration of one session call; nothing here decides game rules.

mod console;
mod dom;
mod interval;
mod media;
mod storage;

pub use dom::DomScreen;
pub use interval::IntervalScheduler;
pub use media::HtmlAudioSink;
pub use storage::LocalStorageBackend;

use std::cell::RefCell;

use log::LevelFilter;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlSelectElement, window};

use crate::audio::{Cue, SoundBoard, toggle_label};
use crate::config::GameConfig;
use crate::error::Result;
use crate::palette::Rgb;
use crate::score::{ScoreKey, ScoreStore};
use crate::session::{GameSession, Ports};
use crate::timer::TickToken;
use dom::{by_id, set_display};

/// Menu inputs read when a session starts or the best-score preview changes.
struct MenuControls {
    mode: HtmlSelectElement,
    color_mode: HtmlSelectElement,
    color_count: HtmlSelectElement,
    bgm_toggle: Element,
    sfx_toggle: Element,
}

impl MenuControls {
    fn attach(doc: &Document) -> std::result::Result<Self, JsValue> {
        Ok(Self {
            mode: by_id(doc, "mode")?,
            color_mode: by_id(doc, "color-mode")?,
            color_count: by_id(doc, "color-count")?,
            bgm_toggle: by_id(doc, "bgm-toggle")?,
            sfx_toggle: by_id(doc, "sfx-toggle")?,
        })
    }

    fn config(&self) -> Result<GameConfig> {
        GameConfig::from_menu(
            &self.mode.value(),
            &self.color_mode.value(),
            &self.color_count.value(),
        )
    }

    fn key(&self) -> Result<ScoreKey> {
        Ok(ScoreKey::new(
            self.mode.value().parse()?,
            self.color_mode.value().parse()?,
        ))
    }
}

struct App {
    session: GameSession,
    menu: MenuControls,
}

impl App {
    fn start(&mut self) {
        let started = self.menu.config().and_then(|cfg| self.session.start(cfg));
        report("start", started);
    }

    fn refresh_best(&mut self) {
        match self.menu.key() {
            Ok(key) => self.session.preview_best(key),
            Err(e) => log::warn!("menu selection: {e}"),
        }
    }

    fn select(&mut self, color: Rgb) {
        if let Err(e) = self.session.select(color) {
            log::error!("select: {e}");
        }
    }

    fn toggle_bgm(&mut self) {
        self.session.sound_mut().toggle_bgm();
        self.refresh_toggles();
    }

    fn toggle_sfx(&mut self) {
        self.session.sound_mut().toggle_sfx();
        self.refresh_toggles();
    }

    fn refresh_toggles(&mut self) {
        let sound = self.session.sound_mut();
        let (bgm, sfx) = (sound.bgm_muted(), sound.sfx_muted());
        self.menu
            .bgm_toggle
            .set_text_content(Some(&toggle_label("BGM", bgm)));
        self.menu
            .sfx_toggle
            .set_text_content(Some(&toggle_label("SFX", sfx)));
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => {
            if let Some(app) = slot.as_mut() {
                f(app);
            }
        }
        Err(_) => log::error!("game state busy; event dropped"),
    });
}

fn report(op: &str, result: Result<()>) {
    if let Err(e) = result {
        log::error!("{op}: {e}");
    }
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> std::result::Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn on_click(
    doc: &Document,
    id: &str,
    mut action: impl FnMut(&mut App) + 'static,
) -> std::result::Result<(), JsValue> {
    let el: Element = by_id(doc, id)?;
    listen(&el, "click", move |_| with_app(|app| action(app)))
}

fn toggle_modal(doc: &Document, button_id: &str, modal_id: &str) -> std::result::Result<(), JsValue> {
    let button: Element = by_id(doc, button_id)?;
    let modal: Element = by_id(doc, modal_id)?;
    listen(&button, "click", move |_| {
        if let Err(e) = modal.class_list().toggle("active") {
            log::warn!("modal toggle failed: {e:?}");
        }
    })
}

/// Closest ancestor-or-self of the event target matching `selector`.
fn closest(evt: &Event, selector: &str) -> Option<Element> {
    evt.target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

fn bind_listeners(doc: &Document) -> std::result::Result<(), JsValue> {
    on_click(doc, "start-button", App::start)?;
    on_click(doc, "retry-button", |app| report("retry", app.session.retry()))?;
    on_click(doc, "menu-button", |app| {
        report("exit", app.session.exit());
        app.refresh_best();
    })?;
    on_click(doc, "bgm-toggle", App::toggle_bgm)?;
    on_click(doc, "sfx-toggle", App::toggle_sfx)?;

    toggle_modal(doc, "how-to-play-button", "guide-modal")?;
    toggle_modal(doc, "close-guide-button", "guide-modal")?;
    toggle_modal(doc, "settings-button", "settings-modal")?;
    toggle_modal(doc, "close-settings-button", "settings-modal")?;

    for id in ["mode", "color-mode"] {
        let select: Element = by_id(doc, id)?;
        listen(&select, "change", |_| with_app(App::refresh_best))?;
    }

    // Swatches are rebuilt every round; one delegated listener serves them all.
    let options: Element = by_id(doc, "color-options")?;
    listen(&options, "click", |evt| {
        let color = closest(&evt, "[data-color]")
            .and_then(|el| el.get_attribute("data-color"))
            .and_then(|hex| Rgb::from_hex(&hex));
        if let Some(color) = color {
            with_app(|app| app.select(color));
        }
    })?;

    // Every button clicks; bubbles up after the button's own handler.
    listen(doc, "click", |evt| {
        if closest(&evt, "button").is_some() {
            with_app(|app| app.session.sound_mut().play(Cue::Click));
        }
    })?;
    Ok(())
}

fn on_countdown_tick() {
    with_app(|app| report("countdown", app.session.countdown_tick()));
}

fn on_round_tick(token: TickToken) {
    with_app(|app| {
        app.session.timer_tick(token);
    });
}

/// Wires the page and shows the main menu.
#[wasm_bindgen]
pub fn start_game() -> std::result::Result<(), JsValue> {
    console::init(LevelFilter::Info);
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let ports = Ports {
        screen: Box::new(DomScreen::attach(&doc)?),
        scheduler: Box::new(IntervalScheduler::new(
            win.clone(),
            on_countdown_tick,
            on_round_tick,
        )),
        sound: SoundBoard::new(Box::new(HtmlAudioSink::attach(&doc)?)),
        scores: ScoreStore::load(Box::new(LocalStorageBackend::open())),
    };
    let mut app = App {
        session: GameSession::new(ports),
        menu: MenuControls::attach(&doc)?,
    };
    app.refresh_best();
    app.refresh_toggles();
    APP.with(|cell| cell.replace(Some(app)));
    bind_listeners(&doc)?;

    if let Some(loading) = doc.get_element_by_id("loading-screen") {
        if let Ok(loading) = loading.dyn_into::<HtmlElement>() {
            set_display(&loading, "none");
        }
    }
    log::info!("color snap ready");
    Ok(())
}
