use wasm_bindgen::prelude::{Closure, JsValue};

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Fire-and-forget service worker registration. Outcome is only logged.
pub(crate) fn register_service_worker(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let navigator = window.navigator();
    if !js_sys::Reflect::has(&navigator, &"serviceWorker".into()).unwrap_or(false) {
        log::debug!("service workers unsupported");
        return;
    }

    let promise = navigator.service_worker().register(url);
    let ok = Closure::<dyn FnMut(JsValue)>::new(|reg: JsValue| {
        log::info!("service worker registered: {reg:?}");
    });
    let err = Closure::<dyn FnMut(JsValue)>::new(|e: JsValue| {
        log::warn!("service worker registration failed: {e:?}");
    });
    let _ = promise.then2(&ok, &err);
    // Promise callbacks outlive this frame.
    ok.forget();
    err.forget();
}
