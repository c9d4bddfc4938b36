//! Bindings for calling the finder from JavaScript.
//!
//! ```js
//! const moment = getAppropriateMoment(schedule, 90, { from: "10:00+5", to: "18:00+5" });
//! if (moment.exists()) {
//!     console.log(moment.format("%DD %HH:%MM"));
//!     moment.tryLater();
//! }
//! ```
//!
//! `isStar` is exported as a function returning `true`, since wasm-bindgen
//! cannot export plain values: callers read it as `isStar()`.

use crate::moment::{self, Moment};
use crate::schedule::{Crew, WorkingHours};
use wasm_bindgen::prelude::*;

/// `tryLater` is implemented. Called as `isStar()` from JavaScript.
#[wasm_bindgen(js_name = isStar)]
pub fn is_star() -> bool {
    true
}

#[wasm_bindgen]
pub struct AppropriateMoment {
    inner: Moment,
}

#[wasm_bindgen]
impl AppropriateMoment {
    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    pub fn format(&self, template: &str) -> String {
        self.inner.format(template)
    }

    #[wasm_bindgen(js_name = tryLater)]
    pub fn try_later(&mut self) -> bool {
        self.inner.try_later()
    }
}

/// `schedule` maps each crew member's name to a list of `{ from, to }` busy
/// times; `working_hours` is a single `{ from, to }`.
#[wasm_bindgen(js_name = getAppropriateMoment)]
pub fn get_appropriate_moment(
    schedule: JsValue,
    duration: u32,
    working_hours: JsValue,
) -> Result<AppropriateMoment, JsValue> {
    let crew: Crew = serde_wasm_bindgen::from_value(schedule)?;
    let working_hours: WorkingHours = serde_wasm_bindgen::from_value(working_hours)?;

    moment::get_appropriate_moment(&crew, duration, &working_hours)
        .map(|inner| AppropriateMoment { inner })
        .map_err(|e| JsError::new(&e.to_string()).into())
}
