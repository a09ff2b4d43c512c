#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use imgload_wasm::wasm::img::{self, Dimensions};
use imgload_wasm::wasm::poll::{self, PollSchedule};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const PHOTO_WIDTH: u32 = 500;
const PHOTO_HEIGHT: u32 = 378;

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn svg_data_uri(width: u32, height: u32) -> String {
    format!(
        "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' \
         width='{width}' height='{height}'%3E%3C/svg%3E"
    )
}

fn append_image(src: Option<&str>) -> web_sys::HtmlImageElement {
    let document = document();
    let image = document
        .create_element("img")
        .unwrap()
        .dyn_into::<web_sys::HtmlImageElement>()
        .unwrap();
    if let Some(src) = src {
        image.set_src(src);
    }
    document.body().unwrap().append_child(&image).unwrap();
    image
}

// Tests share one page, so drop leftover images before touching the DOM.
fn clear_images() {
    let images = document().get_elements_by_tag_name("img");
    while let Some(image) = images.item(0) {
        image.remove();
    }
}

#[wasm_bindgen_test]
async fn reports_rendered_dimensions_after_decode() {
    clear_images();
    let image = append_image(Some(&svg_data_uri(PHOTO_WIDTH, PHOTO_HEIGHT)));
    let schedule = PollSchedule::with_budget(img::POLL_INTERVAL_MS, 5_000);

    JsFuture::from(img::wait_for_layout(&image, schedule))
        .await
        .expect("image never got layout");

    assert_eq!(
        img::rendered(&image),
        Dimensions {
            width: PHOTO_WIDTH,
            height: PHOTO_HEIGHT,
        }
    );
}

#[wasm_bindgen_test]
async fn continuation_waits_for_predicate_and_fires_once() {
    let checks = Rc::new(Cell::new(0u32));
    let fires = Rc::new(Cell::new(0u32));

    {
        let checks = checks.clone();
        let fires = fires.clone();
        poll::poll_until(
            PollSchedule::every_ms(1),
            move || {
                checks.set(checks.get() + 1);
                checks.get() > 5
            },
            move || fires.set(fires.get() + 1),
            |_| unreachable!("unbounded schedule cannot give up"),
        )
        .unwrap();
    }

    // Nothing fires synchronously; the first check is deferred.
    assert_eq!(fires.get(), 0);
    assert_eq!(checks.get(), 0);

    JsFuture::from(poll::until(PollSchedule::bounded(1, 1_000), {
        let fires = fires.clone();
        move || fires.get() > 0
    }))
    .await
    .expect("poller never fired");

    assert_eq!(fires.get(), 1);
    assert_eq!(
        checks.get(),
        6,
        "continuation must fire on the first passing check"
    );

    // Let more timer ticks elapse; a settled poller must not check or fire again.
    JsFuture::from(poll::until(PollSchedule::bounded(1, 20), || false))
        .await
        .expect_err("settle poller runs out its budget");

    assert_eq!(fires.get(), 1);
    assert_eq!(checks.get(), 6);
}

#[wasm_bindgen_test]
async fn rejects_once_check_budget_is_spent() {
    let err = JsFuture::from(poll::until(PollSchedule::bounded(1, 3), || false))
        .await
        .expect_err("predicate never passes");

    let message = err.as_string().unwrap_or_default();
    assert!(
        message.contains("3 checks"),
        "unexpected rejection: {message}"
    );
}

#[wasm_bindgen_test]
async fn srcless_image_never_reports_layout() {
    clear_images();
    let image = append_image(None);

    JsFuture::from(img::wait_for_layout(&image, PollSchedule::bounded(1, 25)))
        .await
        .expect_err("an image without a source cannot get layout");

    assert_eq!(
        img::rendered(&image),
        Dimensions {
            width: 0,
            height: 0,
        }
    );
}

#[wasm_bindgen_test]
fn first_image_follows_document_order() {
    clear_images();
    assert!(img::first_image(&document()).is_err());

    let earlier = append_image(None);
    earlier.set_id("earlier");
    append_image(None).set_id("later");

    assert_eq!(img::first_image(&document()).unwrap().id(), "earlier");
}

#[wasm_bindgen_test]
fn expected_dimensions_come_from_data_attributes() {
    clear_images();
    let image = append_image(None);

    assert!(img::expected(&image).is_err());

    image.set_attribute("data-expect-width", "500").unwrap();
    image.set_attribute("data-expect-height", "378").unwrap();
    assert_eq!(
        img::expected(&image).unwrap(),
        Dimensions {
            width: 500,
            height: 378,
        }
    );

    image.set_attribute("data-expect-height", "tall").unwrap();
    assert!(img::expected(&image).is_err());
}
