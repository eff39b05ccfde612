use gloo_storage::Storage;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use hustings_shared::{LotteryRecord, PushEvent};

use crate::account::AccountTab;
use crate::api::{self, ApiError};
use crate::candidates::CandidatesTab;
use crate::dashboard::DashboardTab;
use crate::lottery::{self, LotteryTab};
use crate::store::CandidateStore;
use crate::vote_config::VoteConfigTab;
use crate::ws::{self, ConnectionStatus};

/// Refetch delay after a successful save: the modal close transition gets to
/// finish before the table is replaced underneath it.
pub(crate) const SAVE_REFETCH_DELAY_MS: u32 = 500;
/// Shorter settle after a delete, which closes no modal.
pub(crate) const DELETE_REFETCH_DELAY_MS: u32 = 200;
/// Debounce for push-triggered refetches, coalescing vote bursts.
const PUSH_REFETCH_DELAY_MS: u32 = 200;
const TOAST_MS: u32 = 3_000;

/// Newtype wrappers so same-shaped signals stay distinct in Leptos context.
#[derive(Clone, Copy)]
pub(crate) struct Candidates(pub RwSignal<CandidateStore>);
#[derive(Clone, Copy)]
pub(crate) struct ToastSignal(pub RwSignal<Option<Toast>>);
#[derive(Clone, Copy)]
pub(crate) struct AuthUser(pub RwSignal<Option<String>>);
#[derive(Clone, Copy)]
pub(crate) struct RefreshPending(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct LotteryHistory(pub RwSignal<Vec<LotteryRecord>>);
#[derive(Clone, Copy)]
pub(crate) struct LotteryAvailable(pub RwSignal<Option<u32>>);

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, PartialEq)]
pub(crate) struct Toast {
    pub text: String,
    pub kind: ToastKind,
    seq: u64,
}

/// Transient status strip. Every failure surfaces here; none crash the
/// session.
pub(crate) fn show_message(
    toast: RwSignal<Option<Toast>>,
    text: impl Into<String>,
    kind: ToastKind,
) {
    let seq = toast
        .get_untracked()
        .map(|current| current.seq.wrapping_add(1))
        .unwrap_or(0);
    toast.set(Some(Toast {
        text: text.into(),
        kind,
        seq,
    }));
    Timeout::new(TOAST_MS, move || {
        toast.update(|current| {
            // Only clear if no newer message replaced this one.
            if current.as_ref().is_some_and(|t| t.seq == seq) {
                *current = None;
            }
        });
    })
    .forget();
}

/// Refetch the candidate list and replace the store wholesale. Of two
/// overlapping refreshes, only the newest one's response is applied.
pub(crate) fn refresh_candidates(store: RwSignal<CandidateStore>, toast: RwSignal<Option<Toast>>) {
    let mut token = 0;
    store.update(|s| token = s.begin_refresh());

    spawn_local(async move {
        match api::fetch_candidates().await {
            Ok(list) => {
                store.update(|s| {
                    s.apply(token, list);
                });
            }
            Err(ApiError::Unauthenticated) => api::redirect_to_login(),
            Err(err) => {
                web_sys::console::warn_1(&format!("candidate fetch failed: {err}").into());
                show_message(toast, "failed to load candidates", ToastKind::Error);
            }
        }
    });
}

/// Debounced refetch: while one is pending, further requests fold into it.
pub(crate) fn schedule_candidate_refresh(
    store: RwSignal<CandidateStore>,
    toast: RwSignal<Option<Toast>>,
    pending: RwSignal<bool>,
    delay_ms: u32,
) {
    if pending.get_untracked() {
        return;
    }
    pending.set(true);
    Timeout::new(delay_ms, move || {
        pending.set(false);
        refresh_candidates(store, toast);
    })
    .forget();
}

#[derive(Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub(crate) enum Tab {
    Dashboard,
    VoteConfig,
    Candidates,
    Lottery,
    Account,
}

impl Tab {
    const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::VoteConfig,
        Tab::Candidates,
        Tab::Lottery,
        Tab::Account,
    ];

    fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::VoteConfig => "Vote Setup",
            Tab::Candidates => "Candidates",
            Tab::Lottery => "Lottery",
            Tab::Account => "Account",
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Settings {
    active_tab: Tab,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_tab: Tab::Dashboard,
        }
    }
}

/// Root application component. Provides global reactive signals via context.
#[component]
pub fn App() -> impl IntoView {
    let store: RwSignal<CandidateStore> = RwSignal::new(CandidateStore::new());
    let toast: RwSignal<Option<Toast>> = RwSignal::new(None);
    let username: RwSignal<Option<String>> = RwSignal::new(None);
    let connection: RwSignal<ConnectionStatus> = RwSignal::new(ConnectionStatus::Connecting);
    let refresh_pending: RwSignal<bool> = RwSignal::new(false);
    let lottery_history: RwSignal<Vec<LotteryRecord>> = RwSignal::new(Vec::new());
    let lottery_available: RwSignal<Option<u32>> = RwSignal::new(None);
    let saved: Settings = gloo_storage::LocalStorage::get("hustings_admin_settings").unwrap_or_default();
    let active_tab: RwSignal<Tab> = RwSignal::new(saved.active_tab);

    provide_context(Candidates(store));
    provide_context(ToastSignal(toast));
    provide_context(AuthUser(username));
    provide_context(RefreshPending(refresh_pending));
    provide_context(LotteryHistory(lottery_history));
    provide_context(LotteryAvailable(lottery_available));

    // Persist UI settings to localStorage on any change
    Effect::new(move || {
        let settings = Settings {
            active_tab: active_tab.get(),
        };
        let _ = gloo_storage::LocalStorage::set("hustings_admin_settings", &settings);
    });

    // Login gate: a 401 (or an explicit logged-out answer) hands the browser
    // to the login page. Other failures keep the page usable — the next
    // authenticated call will redirect if the session really is gone.
    Effect::new(move || {
        spawn_local(async move {
            match api::check_auth().await {
                Ok(status) if status.logged_in => username.set(status.username),
                Ok(_) | Err(ApiError::Unauthenticated) => api::redirect_to_login(),
                Err(err) => {
                    web_sys::console::warn_1(&format!("auth check failed: {err}").into());
                }
            }
        });
    });

    // Initial data
    Effect::new(move || {
        refresh_candidates(store, toast);
        lottery::load_history(lottery_history);
        lottery::load_available(lottery_available);
    });

    // Push channel: events only ever trigger refetches.
    Effect::new(move || {
        ws::connect(connection, move |event| match event {
            PushEvent::VoteUpdate => {
                schedule_candidate_refresh(store, toast, refresh_pending, PUSH_REFETCH_DELAY_MS);
            }
            PushEvent::LotteryResult => {
                lottery::load_history(lottery_history);
                lottery::load_available(lottery_available);
            }
        });
        on_cleanup(|| {
            ws::disconnect();
        });
    });

    view! {
        <div class="admin-shell">
            <header class="admin-header">
                <h1>"Voting Event Admin"</h1>
                <div class="header-status">
                    <span
                        class="connection-badge"
                        class:live=move || connection.get() == ConnectionStatus::Live
                    >
                        {move || match connection.get() {
                            ConnectionStatus::Connecting => "connecting",
                            ConnectionStatus::Live => "live",
                            ConnectionStatus::Reconnecting => "offline",
                        }}
                    </span>
                    <span class="current-user">
                        {move || username.get().unwrap_or_else(|| "admin".to_string())}
                    </span>
                </div>
            </header>
            <nav class="tab-bar">
                {Tab::ALL
                    .iter()
                    .copied()
                    .map(|tab| {
                        view! {
                            <button
                                class="tab"
                                class:active=move || active_tab.get() == tab
                                on:click=move |_| active_tab.set(tab)
                            >
                                {tab.label()}
                            </button>
                        }
                    })
                    .collect::<Vec<_>>()}
            </nav>
            <main class="tab-content">
                {move || match active_tab.get() {
                    Tab::Dashboard => view! { <DashboardTab /> }.into_any(),
                    Tab::VoteConfig => view! { <VoteConfigTab /> }.into_any(),
                    Tab::Candidates => view! { <CandidatesTab /> }.into_any(),
                    Tab::Lottery => view! { <LotteryTab /> }.into_any(),
                    Tab::Account => view! { <AccountTab /> }.into_any(),
                }}
            </main>
            <MessageToast />
        </div>
    }
}

#[component]
fn MessageToast() -> impl IntoView {
    let ToastSignal(toast) = expect_context();

    view! {
        {move || {
            let Some(current) = toast.get() else {
                return view! { <div style="display:none;" /> }.into_any();
            };
            let background = match current.kind {
                ToastKind::Success => "#2e7d32",
                ToastKind::Error => "#c62828",
            };
            view! {
                <div
                    class="message-toast"
                    style=format!(
                        "position: fixed; top: 18px; left: 50%; transform: translateX(-50%); z-index: 200; padding: 10px 22px; border-radius: 6px; color: #fff; box-shadow: 0 4px 16px rgba(0,0,0,0.25); background: {background};"
                    )
                >
                    {current.text}
                </div>
            }
            .into_any()
        }}
    }
}
