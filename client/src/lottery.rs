use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use hustings_shared::{LotteryRecord, LotterySettings};

use crate::api::{self, ApiError};
use crate::app::{LotteryAvailable, LotteryHistory, ToastKind, ToastSignal, show_message};
use crate::render::{CommitWindow, stage_refresh};

pub(crate) fn load_history(history: RwSignal<Vec<LotteryRecord>>) {
    spawn_local(async move {
        match api::fetch_lottery_history().await {
            Ok(records) => history.set(records),
            Err(ApiError::Unauthenticated) => api::redirect_to_login(),
            Err(err) => {
                web_sys::console::warn_1(&format!("lottery history fetch failed: {err}").into());
            }
        }
    });
}

pub(crate) fn load_available(available: RwSignal<Option<u32>>) {
    spawn_local(async move {
        if let Ok(slots) = api::fetch_lottery_available().await {
            available.set(Some(slots.count));
        }
    });
}

fn record_drawn_at(record: &LotteryRecord) -> String {
    record
        .drawn_at_utc()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Draw administration: settings saved to the server (the draw itself runs
/// there), past results, and how many candidates are still in the pool.
#[component]
pub fn LotteryTab() -> impl IntoView {
    let ToastSignal(toast) = expect_context();
    let LotteryHistory(history) = expect_context();
    let LotteryAvailable(available) = expect_context();

    let prize_name: RwSignal<String> = RwSignal::new(String::new());
    let rounds: RwSignal<String> = RwSignal::new("1".to_string());
    let exclude_winners: RwSignal<bool> = RwSignal::new(true);

    let displayed: RwSignal<Vec<LotteryRecord>> = RwSignal::new(Vec::new());
    let visible: RwSignal<bool> = RwSignal::new(true);
    let window = Rc::new(RefCell::new(CommitWindow::new()));

    Effect::new(move || {
        stage_refresh(&window, displayed, visible, history.get());
    });

    Effect::new(move || {
        load_history(history);
        load_available(available);
    });

    let on_save_settings = move |_| {
        let prize = prize_name.get_untracked().trim().to_string();
        if prize.is_empty() {
            show_message(toast, "enter a prize name", ToastKind::Error);
            return;
        }
        let round_count = match rounds.get_untracked().trim().parse::<u32>() {
            Ok(value) if value >= 1 => value,
            _ => {
                show_message(toast, "rounds must be at least 1", ToastKind::Error);
                return;
            }
        };
        let settings = LotterySettings {
            // One winner per round; multi-winner draws are expressed as
            // extra rounds.
            count: 1,
            prize_name: prize.clone(),
            exclude_winners: exclude_winners.get_untracked(),
            rounds: round_count,
        };
        spawn_local(async move {
            match api::save_lottery_settings(&settings).await {
                Ok(()) => {
                    show_message(
                        toast,
                        format!("draw settings saved: {prize} ({round_count} rounds)"),
                        ToastKind::Success,
                    );
                }
                Err(ApiError::Unauthenticated) => api::redirect_to_login(),
                Err(err) => {
                    show_message(toast, format!("failed to save draw settings: {err}"), ToastKind::Error);
                }
            }
        });
    };

    let on_reset = move |_| {
        let Some(win) = web_sys::window() else {
            return;
        };
        if !win
            .confirm_with_message("Reset all lottery data? This cannot be undone!")
            .unwrap_or(false)
        {
            return;
        }
        spawn_local(async move {
            match api::reset_lottery().await {
                Ok(()) => {
                    show_message(toast, "lottery data reset", ToastKind::Success);
                    load_history(history);
                    load_available(available);
                }
                Err(ApiError::Unauthenticated) => api::redirect_to_login(),
                Err(err) => {
                    show_message(toast, format!("failed to reset lottery: {err}"), ToastKind::Error);
                }
            }
        });
    };

    view! {
        <section class="lottery">
            <div class="panel">
                <div class="panel-header">
                    <h2>"Draw settings"</h2>
                    <span class="available-count">
                        {move || match available.get() {
                            Some(count) => format!("{count} in the pool"),
                            None => "-".to_string(),
                        }}
                    </span>
                </div>
                <label class="field">
                    <span>"Prize name"</span>
                    <input
                        type="text"
                        prop:value=move || prize_name.get()
                        on:input=move |e: leptos::ev::Event| {
                            if let Some(target) = e.target()
                                && let Ok(input) = target.dyn_into::<web_sys::HtmlInputElement>()
                            {
                                prize_name.set(input.value());
                            }
                        }
                    />
                </label>
                <label class="field">
                    <span>"Rounds"</span>
                    <input
                        type="number"
                        min="1"
                        prop:value=move || rounds.get()
                        on:input=move |e: leptos::ev::Event| {
                            if let Some(target) = e.target()
                                && let Ok(input) = target.dyn_into::<web_sys::HtmlInputElement>()
                            {
                                rounds.set(input.value());
                            }
                        }
                    />
                </label>
                <div class="panel-actions">
                    <button
                        class="btn"
                        class:active=move || exclude_winners.get()
                        on:click=move |_| exclude_winners.update(|v| *v = !*v)
                    >
                        {move || if exclude_winners.get() {
                            "Excluding past winners"
                        } else {
                            "Past winners may win again"
                        }}
                    </button>
                    <button class="btn primary" on:click=on_save_settings>
                        "Save draw settings"
                    </button>
                    <button class="btn danger" on:click=on_reset>
                        "Reset lottery"
                    </button>
                </div>
            </div>
            <div class="panel">
                <div class="panel-header">
                    <h2>"Draw history"</h2>
                </div>
                {move || {
                    displayed.get().is_empty().then(|| view! {
                        <p class="empty-note">"No draws yet"</p>
                    })
                }}
                <table
                    class="data-table"
                    style="transition: opacity 0.3s ease;"
                    style:opacity=move || if visible.get() { "1" } else { "0" }
                >
                    <thead>
                        <tr>
                            <th>"Round"</th>
                            <th>"Prize"</th>
                            <th>"Winner"</th>
                            <th>"Drawn at"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            displayed
                                .get()
                                .into_iter()
                                .map(|record| {
                                    let drawn_at = record_drawn_at(&record);
                                    view! {
                                        <tr>
                                            <td>{record.round}</td>
                                            <td>{record.prize_name.clone().unwrap_or_else(|| "-".to_string())}</td>
                                            <td>{record.candidate_name.clone().unwrap_or_else(|| "unknown".to_string())}</td>
                                            <td>{drawn_at}</td>
                                        </tr>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </tbody>
                </table>
            </div>
        </section>
    }
}
