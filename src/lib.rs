// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    pub mod img;
    pub mod poll;

    /// Page entry: wait for the fixture image to get layout, then write a
    /// single verdict line into `#status`.
    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        // The module also gets instantiated on pages without the fixture
        // markup (the browser test harness generates its own page); those
        // are left alone.
        let Some(status) = document.get_element_by_id("status") else {
            return Ok(());
        };
        let photo = img::first_image(&document)?;

        let expect = img::expected(&photo)?;
        let schedule = poll::PollSchedule::with_budget(img::POLL_INTERVAL_MS, img::LAYOUT_BUDGET_MS);

        let probe = photo.clone();
        let verdict_status = status.clone();
        poll::poll_until(
            schedule,
            move || img::has_layout(&probe),
            move || {
                let got = img::rendered(&photo);
                let verdict = if got == expect {
                    format!("pass {got}")
                } else {
                    format!("fail: expected {expect}, got {got}")
                };
                web_sys::console::log_1(&JsValue::from_str(&verdict));
                verdict_status.set_text_content(Some(&verdict));
            },
            move |checks| {
                let verdict = format!("timed out: no layout after {checks} checks");
                web_sys::console::error_1(&JsValue::from_str(&verdict));
                status.set_text_content(Some(&verdict));
            },
        )?;

        Ok(())
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
