use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, WebSocket};

use hustings_shared::PushEvent;

/// Push-channel health, shown in the header. Reconnect policy lives with the
/// transport; here it is only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Live,
    Reconnecting,
}

struct WsConnection {
    ws: WebSocket,
    on_open: Closure<dyn Fn()>,
    on_error: Closure<dyn Fn()>,
    on_close: Closure<dyn Fn()>,
    on_message: Closure<dyn Fn(MessageEvent)>,
}

impl WsConnection {
    fn close(self) {
        let _ = self.on_open.as_ref();
        let _ = self.on_error.as_ref();
        let _ = self.on_close.as_ref();
        let _ = self.on_message.as_ref();
        self.ws.set_onopen(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        self.ws.set_onmessage(None);
        self.ws.close().ok();
    }
}

thread_local! {
    static WS_CONNECTION: RefCell<Option<WsConnection>> = const { RefCell::new(None) };
}

pub fn disconnect() {
    WS_CONNECTION.with(|slot| {
        if let Some(connection) = slot.borrow_mut().take() {
            connection.close();
        }
    });
}

fn push_endpoint() -> Option<String> {
    let window = web_sys::window()?;
    let location = window.location();
    let protocol = location.protocol().ok()?;
    let host = location.host().ok()?;
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    Some(format!("{scheme}://{host}/api/admin/events"))
}

/// Open the push channel. Frames that are not recognized [`PushEvent`]s are
/// ignored; recognized ones are handed to `on_event` and only ever cause a
/// refetch on the caller's side.
pub fn connect(status: RwSignal<ConnectionStatus>, on_event: impl Fn(PushEvent) + 'static) {
    status.set(ConnectionStatus::Connecting);

    let Some(url) = push_endpoint() else {
        status.set(ConnectionStatus::Reconnecting);
        return;
    };
    let ws = match WebSocket::new(&url) {
        Ok(ws) => ws,
        Err(_) => {
            status.set(ConnectionStatus::Reconnecting);
            return;
        }
    };

    let conn = status;
    let on_open = Closure::<dyn Fn()>::new(move || {
        conn.set(ConnectionStatus::Live);
    });
    ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

    let on_message = Closure::<dyn Fn(MessageEvent)>::new(move |e: MessageEvent| {
        let Some(data) = e.data().as_string() else {
            return;
        };
        let Ok(event) = serde_json::from_str::<PushEvent>(&data) else {
            return;
        };
        on_event(event);
    });
    ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

    let conn = status;
    let on_error = Closure::<dyn Fn()>::new(move || {
        conn.set(ConnectionStatus::Reconnecting);
    });
    ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    let conn = status;
    let on_close = Closure::<dyn Fn()>::new(move || {
        conn.set(ConnectionStatus::Reconnecting);
    });
    ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    // Replace any existing connection, ensuring handlers are unregistered
    // cleanly.
    WS_CONNECTION.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(old) = slot.take() {
            old.close();
        }
        *slot = Some(WsConnection {
            ws,
            on_open,
            on_error,
            on_close,
            on_message,
        });
    });
}
