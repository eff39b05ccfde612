use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use hustings_shared::PasswordChange;

use crate::api::{self, ApiError};
use crate::app::{AuthUser, ToastKind, ToastSignal, show_message};

/// Admin account panel: password change and logout. All password rules are
/// checked here first; invalid input never reaches the server.
#[component]
pub fn AccountTab() -> impl IntoView {
    let AuthUser(username) = expect_context();
    let ToastSignal(toast) = expect_context();

    let current: RwSignal<String> = RwSignal::new(String::new());
    let fresh: RwSignal<String> = RwSignal::new(String::new());
    let confirm: RwSignal<String> = RwSignal::new(String::new());

    let on_change_password = move |_| {
        let current_value = current.get_untracked();
        let fresh_value = fresh.get_untracked();
        let confirm_value = confirm.get_untracked();

        if current_value.is_empty() || fresh_value.is_empty() || confirm_value.is_empty() {
            show_message(toast, "all fields are required", ToastKind::Error);
            return;
        }
        if fresh_value != confirm_value {
            show_message(toast, "new passwords do not match", ToastKind::Error);
            return;
        }
        if fresh_value.len() < 6 {
            show_message(
                toast,
                "new password must be at least 6 characters",
                ToastKind::Error,
            );
            return;
        }

        let change = PasswordChange {
            current_password: current_value,
            new_password: fresh_value,
            confirm_password: confirm_value,
        };
        spawn_local(async move {
            match api::change_password(&change).await {
                Ok(()) => {
                    show_message(toast, "password changed", ToastKind::Success);
                    current.set(String::new());
                    fresh.set(String::new());
                    confirm.set(String::new());
                }
                Err(ApiError::Unauthenticated) => api::redirect_to_login(),
                Err(err) => {
                    show_message(toast, format!("password change failed: {err}"), ToastKind::Error);
                }
            }
        });
    };

    let on_logout = move |_| {
        let Some(win) = web_sys::window() else {
            return;
        };
        if !win.confirm_with_message("Log out?").unwrap_or(false) {
            return;
        }
        spawn_local(async move {
            // Land on the login page whether or not the server acknowledged.
            api::logout().await.ok();
            api::redirect_to_login();
        });
    };

    let password_field = move |label: &'static str, value: RwSignal<String>| {
        view! {
            <label class="field">
                <span>{label}</span>
                <input
                    type="password"
                    prop:value=move || value.get()
                    on:input=move |e: leptos::ev::Event| {
                        if let Some(target) = e.target()
                            && let Ok(input) = target.dyn_into::<web_sys::HtmlInputElement>()
                        {
                            value.set(input.value());
                        }
                    }
                />
            </label>
        }
    };

    view! {
        <section class="account">
            <div class="panel">
                <div class="panel-header">
                    <h2>"Account"</h2>
                    <span class="current-user">
                        {move || username.get().unwrap_or_else(|| "admin".to_string())}
                    </span>
                </div>
                {password_field("Current password", current)}
                {password_field("New password", fresh)}
                {password_field("Confirm new password", confirm)}
                <div class="panel-actions">
                    <button class="btn primary" on:click=on_change_password>
                        "Change password"
                    </button>
                    <button class="btn" on:click=on_logout>
                        "Log out"
                    </button>
                </div>
            </div>
        </section>
    }
}
