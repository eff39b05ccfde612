use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use hustings_shared::{VoteConfig, VoteStatistics};

use crate::api::{self, ApiError};
use crate::app::{Candidates, ToastKind, ToastSignal, refresh_candidates, show_message};

/// Vote rules form plus the aggregate statistics panel.
#[component]
pub fn VoteConfigTab() -> impl IntoView {
    let Candidates(store) = expect_context();
    let ToastSignal(toast) = expect_context();

    let vote_name: RwSignal<String> = RwSignal::new(String::new());
    let max_votes: RwSignal<String> = RwSignal::new("1".to_string());
    let stats: RwSignal<Option<VoteStatistics>> = RwSignal::new(None);

    let load_stats = move || {
        spawn_local(async move {
            match api::fetch_vote_statistics().await {
                Ok(fresh) => stats.set(Some(fresh)),
                Err(ApiError::Unauthenticated) => api::redirect_to_login(),
                Err(err) => {
                    web_sys::console::warn_1(&format!("statistics fetch failed: {err}").into());
                }
            }
        });
    };

    Effect::new(move || {
        spawn_local(async move {
            match api::fetch_vote_config().await {
                Ok(config) => {
                    vote_name.set(config.vote_name);
                    max_votes.set(config.max_votes_per_user.to_string());
                }
                Err(ApiError::Unauthenticated) => api::redirect_to_login(),
                Err(err) => {
                    web_sys::console::warn_1(&format!("vote config fetch failed: {err}").into());
                }
            }
        });
        load_stats();
    });

    let on_save = move |_| {
        let name = vote_name.get_untracked().trim().to_string();
        if name.is_empty() {
            show_message(toast, "vote name must not be empty", ToastKind::Error);
            return;
        }
        let parsed = max_votes.get_untracked().trim().parse::<u32>();
        let max = match parsed {
            Ok(value) if value >= 1 => value,
            _ => {
                show_message(
                    toast,
                    "max votes per user must be a positive integer",
                    ToastKind::Error,
                );
                return;
            }
        };
        let config = VoteConfig {
            vote_name: name,
            max_votes_per_user: max,
        };
        spawn_local(async move {
            match api::update_vote_config(&config).await {
                Ok(saved) => {
                    show_message(toast, "vote settings saved", ToastKind::Success);
                    vote_name.set(saved.vote_name);
                    max_votes.set(saved.max_votes_per_user.to_string());
                    load_stats();
                }
                Err(ApiError::Unauthenticated) => api::redirect_to_login(),
                Err(err) => {
                    show_message(toast, format!("failed to save settings: {err}"), ToastKind::Error);
                }
            }
        });
    };

    let on_reset_votes = move |_| {
        let Some(win) = web_sys::window() else {
            return;
        };
        if !win
            .confirm_with_message("Reset all vote data? This cannot be undone!")
            .unwrap_or(false)
        {
            return;
        }
        spawn_local(async move {
            match api::reset_votes().await {
                Ok(()) => {
                    show_message(toast, "vote data reset", ToastKind::Success);
                    refresh_candidates(store, toast);
                    load_stats();
                }
                Err(ApiError::Unauthenticated) => api::redirect_to_login(),
                Err(err) => {
                    show_message(toast, format!("failed to reset votes: {err}"), ToastKind::Error);
                }
            }
        });
    };

    view! {
        <section class="vote-config">
            <div class="panel">
                <div class="panel-header">
                    <h2>"Vote settings"</h2>
                </div>
                <label class="field">
                    <span>"Vote name"</span>
                    <input
                        type="text"
                        prop:value=move || vote_name.get()
                        on:input=move |e: leptos::ev::Event| {
                            if let Some(target) = e.target()
                                && let Ok(input) = target.dyn_into::<web_sys::HtmlInputElement>()
                            {
                                vote_name.set(input.value());
                            }
                        }
                    />
                </label>
                <label class="field">
                    <span>"Max votes per user"</span>
                    <input
                        type="number"
                        min="1"
                        prop:value=move || max_votes.get()
                        on:input=move |e: leptos::ev::Event| {
                            if let Some(target) = e.target()
                                && let Ok(input) = target.dyn_into::<web_sys::HtmlInputElement>()
                            {
                                max_votes.set(input.value());
                            }
                        }
                    />
                </label>
                <div class="panel-actions">
                    <button class="btn primary" on:click=on_save>
                        "Save settings"
                    </button>
                    <button class="btn danger" on:click=on_reset_votes>
                        "Reset votes"
                    </button>
                </div>
            </div>
            <div class="panel">
                <div class="panel-header">
                    <h2>"Statistics"</h2>
                </div>
                {move || {
                    let Some(current) = stats.get() else {
                        return view! { <p class="empty-note">"Loading statistics..."</p> }.into_any();
                    };
                    view! {
                        <div class="stats-grid">
                            <div class="stat-row">
                                <span>"Total votes"</span>
                                <span>{current.total_votes}</span>
                            </div>
                            <div class="stat-row">
                                <span>"Candidates"</span>
                                <span>{current.total_candidates}</span>
                            </div>
                            <div class="stat-row">
                                <span>"Unique voters"</span>
                                <span>{current.unique_voters}</span>
                            </div>
                            <div class="stat-row">
                                <span>"Max votes per user"</span>
                                <span>{current.max_votes_per_user}</span>
                            </div>
                            <div class="stat-row">
                                <span>"Avg votes per candidate"</span>
                                <span>{format!("{:.1}", current.avg_votes_per_candidate)}</span>
                            </div>
                            <div class="stat-row">
                                <span>"Completion rate"</span>
                                <span>{format!("{:.1}%", current.vote_completion_rate)}</span>
                            </div>
                        </div>
                    }
                    .into_any()
                }}
            </div>
        </section>
    }
}
