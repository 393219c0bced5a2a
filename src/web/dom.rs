//! DOM lookups and the page-backed [`Screen`].

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use crate::round::{Round, Swatch};
use crate::session::Screen;

/// Element by id, cast to `T`.
pub(crate) fn by_id<T: JsCast>(doc: &Document, id: &str) -> Result<T, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has an unexpected element type")))
}

/// First element matching `selector`, cast to `T`.
pub(crate) fn by_selector<T: JsCast>(doc: &Document, selector: &str) -> Result<T, JsValue> {
    doc.query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("missing {selector}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("{selector} has an unexpected element type")))
}

pub(crate) fn set_display(el: &HtmlElement, value: &str) {
    if let Err(e) = el.style().set_property("display", value) {
        log::warn!("could not set display={value}: {e:?}");
    }
}

fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

fn label_text(swatch: &Swatch) -> String {
    swatch.label.map(|n| n.to_string()).unwrap_or_default()
}

pub struct DomScreen {
    doc: Document,
    main_menu: HtmlElement,
    game_container: HtmlElement,
    game_over_menu: HtmlElement,
    countdown: HtmlElement,
    countdown_number: Element,
    color_target: HtmlElement,
    color_options: Element,
    live_score: Element,
    best_score: Element,
    current_best_score: Element,
    timer: Element,
    final_score: Element,
}

impl DomScreen {
    pub fn attach(doc: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            doc: doc.clone(),
            main_menu: by_selector(doc, ".main-menu")?,
            game_container: by_selector(doc, ".game-container")?,
            game_over_menu: by_selector(doc, ".game-over-menu")?,
            countdown: by_id(doc, "countdown")?,
            countdown_number: by_id(doc, "countdown-number")?,
            color_target: by_id(doc, "color-target")?,
            color_options: by_id(doc, "color-options")?,
            live_score: by_id(doc, "live-score")?,
            best_score: by_id(doc, "best-score")?,
            current_best_score: by_id(doc, "current-best-score")?,
            timer: by_id(doc, "timer")?,
            final_score: by_id(doc, "final-score")?,
        })
    }

    fn render_round(&self, round: &Round) -> Result<(), JsValue> {
        self.color_target
            .style()
            .set_property("background-color", &round.target.color.to_hex())?;
        set_text(&self.color_target, &label_text(&round.target));

        self.color_options.set_inner_html("");
        self.color_options
            .set_attribute("data-color-count", &round.options.len().to_string())?;
        for swatch in &round.options {
            let option: HtmlElement = self.doc.create_element("div")?.dyn_into()?;
            let hex = swatch.color.to_hex();
            option.style().set_property("background-color", &hex)?;
            // Read back by the click handler on the options container.
            option.set_attribute("data-color", &hex)?;
            set_text(&option, &label_text(swatch));
            self.color_options.append_child(&option)?;
        }
        Ok(())
    }
}

impl Screen for DomScreen {
    fn show_game(&mut self) {
        set_display(&self.main_menu, "none");
        set_display(&self.game_container, "flex");
    }

    fn show_menu(&mut self) {
        set_display(&self.game_over_menu, "none");
        set_display(&self.game_container, "none");
        set_display(&self.main_menu, "block");
    }

    fn show_countdown(&mut self, step: Option<u8>) {
        match step {
            Some(n) => {
                set_display(&self.countdown, "block");
                set_text(&self.countdown_number, &n.to_string());
            }
            None => set_display(&self.countdown, "none"),
        }
    }

    fn show_round(&mut self, round: &Round) {
        if let Err(e) = self.render_round(round) {
            log::error!("could not render round: {e:?}");
        }
    }

    fn clear_round(&mut self) {
        if let Err(e) = self.color_target.style().set_property("background-color", "") {
            log::warn!("could not clear target: {e:?}");
        }
        set_text(&self.color_target, "");
        self.color_options.set_inner_html("");
    }

    fn show_live_score(&mut self, score: u32) {
        set_text(&self.live_score, &score.to_string());
    }

    fn show_best_score(&mut self, best: u32) {
        let text = best.to_string();
        set_text(&self.best_score, &text);
        set_text(&self.current_best_score, &text);
    }

    fn show_time(&mut self, remaining: &str) {
        set_text(&self.timer, remaining);
    }

    fn show_game_over(&mut self, final_score: u32) {
        set_text(&self.final_score, &final_score.to_string());
        set_display(&self.game_over_menu, "flex");
    }

    fn hide_game_over(&mut self) {
        set_display(&self.game_over_menu, "none");
    }
}
