use std::fmt;

use js_sys::Promise;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlImageElement};

use super::poll::{self, PollSchedule};

/// Interval between layout checks while an image decode is pending.
pub const POLL_INTERVAL_MS: i32 = 1;

/// How long the fixture page waits for the image to get layout before
/// reporting a timeout.
pub const LAYOUT_BUDGET_MS: i32 = 10_000;

/// Rendered width/height pair of an image element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// First `<img>` in document order.
pub fn first_image(document: &Document) -> Result<HtmlImageElement, JsValue> {
    document
        .get_elements_by_tag_name("img")
        .item(0)
        .ok_or("no img element in document")?
        .dyn_into::<HtmlImageElement>()
        .map_err(|_| "first img is not an image element".into())
}

/// An image has layout once it reports a non-zero rendered width. Before the
/// decode lands both dimensions read zero.
pub fn has_layout(img: &HtmlImageElement) -> bool {
    img.width() != 0
}

pub fn rendered(img: &HtmlImageElement) -> Dimensions {
    Dimensions {
        width: img.width(),
        height: img.height(),
    }
}

/// Resolves once `img` reports a non-zero width; rejects if the schedule's
/// check budget runs out first.
pub fn wait_for_layout(img: &HtmlImageElement, schedule: PollSchedule) -> Promise {
    let img = img.clone();
    poll::until(schedule, move || has_layout(&img))
}

/// Expected dimensions declared on the element through `data-expect-width`
/// and `data-expect-height`.
pub fn expected(img: &HtmlImageElement) -> Result<Dimensions, JsValue> {
    let elem: &Element = img.as_ref();
    Ok(Dimensions {
        width: parse_expect(elem, "data-expect-width")?,
        height: parse_expect(elem, "data-expect-height")?,
    })
}

fn parse_expect(elem: &Element, attr: &str) -> Result<u32, JsValue> {
    let raw = elem
        .get_attribute(attr)
        .ok_or_else(|| JsValue::from_str(&format!("missing {attr}")))?;
    raw.parse()
        .map_err(|_| JsValue::from_str(&format!("bad {attr}: {raw}")))
}
