use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::window;

/// Scheduling parameters for a deferred readiness wait: how often to
/// re-check, and for bounded schedules, how many checks to spend before
/// giving up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSchedule {
    interval_ms: i32,
    max_checks: Option<u32>,
}

impl PollSchedule {
    /// Re-check every `interval_ms` until the predicate passes, with no
    /// upper bound. Non-positive intervals clamp to 1 ms.
    pub fn every_ms(interval_ms: i32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            max_checks: None,
        }
    }

    /// Re-check every `interval_ms`, giving up once `max_checks` checks have
    /// run without the predicate passing. At least one check always runs.
    pub fn bounded(interval_ms: i32, max_checks: u32) -> Self {
        Self {
            max_checks: Some(max_checks.max(1)),
            ..Self::every_ms(interval_ms)
        }
    }

    /// Bounded schedule sized from a wall-clock budget instead of a check
    /// count.
    pub fn with_budget(interval_ms: i32, budget_ms: i32) -> Self {
        let interval = interval_ms.max(1);
        Self::bounded(interval, checks_for_budget(interval, budget_ms))
    }

    pub fn interval_ms(&self) -> i32 {
        self.interval_ms
    }

    pub fn max_checks(&self) -> Option<u32> {
        self.max_checks
    }
}

/// Number of checks a wall-clock budget allows. Rounds up so a partial
/// trailing interval still gets its check, and never returns zero.
pub fn checks_for_budget(interval_ms: i32, budget_ms: i32) -> u32 {
    let interval = i64::from(interval_ms.max(1));
    let budget = i64::from(budget_ms.max(0));
    ((budget + interval - 1) / interval).max(1) as u32
}

/// Re-check `ready` on the browser event loop until it first returns true,
/// then invoke `done` exactly once. Bounded schedules instead invoke
/// `gave_up` with the number of checks spent once the budget runs out.
///
/// Every check, including the first, goes through `setTimeout`; callbacks
/// are never invoked synchronously from this call.
pub fn poll_until<P, F, G>(
    schedule: PollSchedule,
    mut ready: P,
    done: F,
    gave_up: G,
) -> Result<(), JsValue>
where
    P: FnMut() -> bool + 'static,
    F: FnOnce() + 'static,
    G: FnOnce(u32) + 'static,
{
    // `f` holds the re-check closure so that it can reschedule itself with
    // `set_timeout`. The Rc cycle keeps the closure alive while a timer is
    // pending; once the wait settles nothing reschedules and the cycle is
    // reclaimed with the page.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let mut done = Some(done);
    let mut gave_up = Some(gave_up);
    let mut checks: u32 = 0;
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        checks += 1;
        if ready() {
            if let Some(done) = done.take() {
                done();
            }
            return;
        }
        if schedule.max_checks.is_some_and(|limit| checks >= limit) {
            if let Some(gave_up) = gave_up.take() {
                gave_up(checks);
            }
            return;
        }

        // schedule next
        window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                f.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
                schedule.interval_ms,
            )
            .unwrap();
    }) as Box<dyn FnMut()>));

    let win = window().ok_or("no window")?;
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        g.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
        schedule.interval_ms,
    )?;

    Ok(())
}

/// Promise adapter over [`poll_until`]: resolves once `ready` first passes,
/// rejects with a descriptive message when a bounded schedule's check budget
/// is spent.
pub fn until<P>(schedule: PollSchedule, ready: P) -> Promise
where
    P: FnMut() -> bool + 'static,
{
    let mut ready = Some(ready);
    Promise::new(&mut move |resolve, reject| {
        // The executor runs exactly once; the Option lets the predicate move
        // out of this FnMut.
        let Some(ready) = ready.take() else {
            return;
        };
        let budget_reject = reject.clone();
        let started = poll_until(
            schedule,
            ready,
            move || {
                resolve.call0(&JsValue::NULL).unwrap();
            },
            move |checks| {
                let message = format!("check budget spent after {checks} checks");
                budget_reject
                    .call1(&JsValue::NULL, &JsValue::from_str(&message))
                    .unwrap();
            },
        );
        if let Err(err) = started {
            reject.call1(&JsValue::NULL, &err).unwrap();
        }
    })
}
