//! One-shot browser geolocation.

use easypark::browse::Locator;
use easypark::{ClientError, ClientResult};
use easypark_shared::Coordinates;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{GeolocationPosition, GeolocationPositionError, PositionOptions};

const LOCATE_TIMEOUT_MS: u32 = 10_000;

type Reply = Rc<RefCell<Option<oneshot::Sender<ClientResult<Coordinates>>>>>;

fn answer(reply: &Reply, outcome: ClientResult<Coordinates>) {
    if let Some(tx) = reply.borrow_mut().take() {
        let _ = tx.send(outcome);
    }
}

/// Success and error callbacks for `getCurrentPosition`.
///
/// The browser may fire one of them after the awaiting future is gone (an
/// aborted view), so each callback is owned by the JS side and frees itself
/// when called. The one that never fires is leaked.
fn callbacks(reply: &Reply) -> (JsValue, JsValue) {
    let on_position = Closure::once_into_js({
        let reply = reply.clone();
        move |position: GeolocationPosition| {
            let coords = position.coords();
            answer(&reply, Ok(Coordinates::new(coords.latitude(), coords.longitude())));
        }
    });
    let on_error = Closure::once_into_js({
        let reply = reply.clone();
        move |error: GeolocationPositionError| {
            answer(&reply, Err(ClientError::geolocation(error.message())));
        }
    });
    (on_position, on_error)
}

/// `navigator.geolocation.getCurrentPosition`, resolved once with either the
/// position or `GeolocationUnavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLocator;

#[async_trait::async_trait(?Send)]
impl Locator for BrowserLocator {
    async fn locate(&self) -> ClientResult<Coordinates> {
        let geolocation = web_sys::window()
            .ok_or_else(|| ClientError::geolocation("no window"))?
            .navigator()
            .geolocation()
            .map_err(|_| ClientError::geolocation("geolocation not supported"))?;

        let (tx, rx) = oneshot::channel();
        let reply: Reply = Rc::new(RefCell::new(Some(tx)));
        let (on_position, on_error) = callbacks(&reply);

        let options = PositionOptions::new();
        options.set_timeout(LOCATE_TIMEOUT_MS);

        geolocation
            .get_current_position_with_error_callback_and_options(
                on_position.unchecked_ref(),
                Some(on_error.unchecked_ref()),
                &options,
            )
            .map_err(|e| ClientError::geolocation(format!("{e:?}")))?;

        rx.await
            .unwrap_or_else(|_| Err(ClientError::geolocation("position request dropped")))
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use js_sys::{Function, Object, Reflect};
    use wasm_bindgen_test::*;

    fn object(entries: &[(&str, JsValue)]) -> JsValue {
        let obj = Object::new();
        for (key, value) in entries {
            Reflect::set(&obj, &JsValue::from_str(key), value).unwrap();
        }
        obj.into()
    }

    #[wasm_bindgen_test]
    fn position_callback_answers_the_waiting_request() {
        let (tx, mut rx) = oneshot::channel();
        let reply: Reply = Rc::new(RefCell::new(Some(tx)));
        let (on_position, _on_error) = callbacks(&reply);

        let position = object(&[(
            "coords",
            object(&[("latitude", (-12.0464).into()), ("longitude", (-77.0428).into())]),
        )]);
        on_position
            .unchecked_ref::<Function>()
            .call1(&JsValue::NULL, &position)
            .unwrap();

        let coords = rx.try_recv().unwrap().unwrap().unwrap();
        assert_eq!(coords, Coordinates::new(-12.0464, -77.0428));
    }

    #[wasm_bindgen_test]
    fn late_callback_after_abandoned_request_is_harmless() {
        let (tx, rx) = oneshot::channel();
        let reply: Reply = Rc::new(RefCell::new(Some(tx)));
        let (_on_position, on_error) = callbacks(&reply);

        // the view that awaited the position is gone
        drop(rx);
        drop(reply);

        let error = object(&[("code", 3.into()), ("message", "Timeout expired".into())]);
        assert!(
            on_error
                .unchecked_ref::<Function>()
                .call1(&JsValue::NULL, &error)
                .is_ok()
        );
    }
}
