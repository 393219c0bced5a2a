// setInterval-backed Scheduler. One interval is live at a time; the round
// clock interval passes its TickToken as the callback argument so a tick that
// was already queued when the interval got cleared is still rejected by the
// timer.

use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::session::Scheduler;
use crate::timer::TickToken;

fn millis(period: Duration) -> i32 {
    i32::try_from(period.as_millis()).unwrap_or(i32::MAX)
}

pub struct IntervalScheduler {
    window: Window,
    countdown_cb: Closure<dyn FnMut()>,
    round_cb: Closure<dyn FnMut(JsValue)>,
    handle: Option<i32>,
}

impl IntervalScheduler {
    pub fn new(
        window: Window,
        on_countdown: impl FnMut() + 'static,
        mut on_round_tick: impl FnMut(TickToken) + 'static,
    ) -> Self {
        let countdown_cb = Closure::wrap(Box::new(on_countdown) as Box<dyn FnMut()>);
        let round_cb = Closure::wrap(Box::new(move |raw: JsValue| {
            if let Some(raw) = raw.as_f64() {
                on_round_tick(TickToken::from_raw(raw as u64));
            }
        }) as Box<dyn FnMut(JsValue)>);
        Self {
            window,
            countdown_cb,
            round_cb,
            handle: None,
        }
    }
}

impl Scheduler for IntervalScheduler {
    fn start_countdown(&mut self, period: Duration) {
        self.cancel();
        let callback: &JsValue = self.countdown_cb.as_ref();
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis(period),
            ) {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => log::error!("could not schedule countdown: {e:?}"),
        }
    }

    fn start_round_clock(&mut self, token: TickToken, period: Duration) {
        self.cancel();
        let callback: &JsValue = self.round_cb.as_ref();
        let arg = JsValue::from_f64(token.as_raw() as f64);
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_1(
                callback.unchecked_ref(),
                millis(period),
                &arg,
            ) {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => log::error!("could not schedule round clock: {e:?}"),
        }
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.window.clear_interval_with_handle(handle);
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
