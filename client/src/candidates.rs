use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use hustings_shared::{Candidate, CandidateDraft};

use crate::api::{self, AdminApi, ApiError};
use crate::app::{
    Candidates, DELETE_REFETCH_DELAY_MS, RefreshPending, SAVE_REFETCH_DELAY_MS, ToastKind,
    ToastSignal, schedule_candidate_refresh, show_message,
};
use crate::photo::resolve_photo_path;
use crate::render::{CommitWindow, stage_refresh};
use crate::saga::SaveSaga;

/// Modal close transition length; the editor stays mounted until it ends.
const MODAL_CLOSE_MS: u32 = 300;

#[derive(Clone, Copy, PartialEq, Eq)]
enum EditorMode {
    Add,
    Edit(u32),
}

fn close_modal(mounted: RwSignal<Option<EditorMode>>, shown: RwSignal<bool>) {
    shown.set(false);
    Timeout::new(MODAL_CLOSE_MS, move || {
        mounted.set(None);
    })
    .forget();
}

/// Swap the photo preview to a freshly selected file, revoking any previous
/// object URL.
fn preview_file(preview: RwSignal<Option<String>>, selected: &web_sys::File) {
    if let Some(old) = preview.get_untracked()
        && old.starts_with("blob:")
    {
        web_sys::Url::revoke_object_url(&old).ok();
    }
    preview.set(web_sys::Url::create_object_url_with_blob(selected).ok());
}

fn file_from_change_event(e: &leptos::ev::Event) -> Option<web_sys::File> {
    let input = e
        .target()?
        .dyn_into::<web_sys::HtmlInputElement>()
        .ok()?;
    input.files()?.get(0)
}

/// Candidate management: table, add/edit modal, and the photo-first
/// quick-add modal.
#[component]
pub fn CandidatesTab() -> impl IntoView {
    let Candidates(store) = expect_context();
    let ToastSignal(toast) = expect_context();
    let RefreshPending(refresh_pending) = expect_context();

    let displayed: RwSignal<Vec<Candidate>> = RwSignal::new(Vec::new());
    let visible: RwSignal<bool> = RwSignal::new(true);
    let window = Rc::new(RefCell::new(CommitWindow::new()));

    Effect::new(move || {
        let rows = store.with(|s| s.candidates().to_vec());
        stage_refresh(&window, displayed, visible, rows);
    });

    let mounted: RwSignal<Option<EditorMode>> = RwSignal::new(None);
    let shown: RwSignal<bool> = RwSignal::new(false);
    let quick_open: RwSignal<bool> = RwSignal::new(false);

    let on_delete = move |id: u32| {
        let Some(win) = web_sys::window() else {
            return;
        };
        if !win
            .confirm_with_message("Delete this candidate?")
            .unwrap_or(false)
        {
            return;
        }
        spawn_local(async move {
            match api::delete_candidate(id).await {
                Ok(()) => {
                    show_message(toast, "candidate deleted", ToastKind::Success);
                    schedule_candidate_refresh(store, toast, refresh_pending, DELETE_REFETCH_DELAY_MS);
                }
                Err(ApiError::Unauthenticated) => api::redirect_to_login(),
                Err(err) => {
                    show_message(toast, format!("failed to delete: {err}"), ToastKind::Error);
                }
            }
        });
    };

    view! {
        <section class="candidates">
            <div class="panel">
                <div class="panel-header">
                    <h2>"Candidates"</h2>
                    <div class="panel-actions">
                        <button
                            class="btn primary"
                            on:click=move |_| {
                                mounted.set(Some(EditorMode::Add));
                                shown.set(true);
                            }
                        >
                            "Add candidate"
                        </button>
                        <button class="btn" on:click=move |_| quick_open.set(true)>
                            "Quick add"
                        </button>
                    </div>
                </div>
                {move || {
                    displayed.get().is_empty().then(|| view! {
                        <p class="empty-note">"No candidates yet"</p>
                    })
                }}
                <table
                    class="data-table"
                    style="transition: opacity 0.3s ease;"
                    style:opacity=move || if visible.get() { "1" } else { "0" }
                >
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Photo"</th>
                            <th>"Name"</th>
                            <th>"Description"</th>
                            <th>"Votes"</th>
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            displayed
                                .get()
                                .into_iter()
                                .map(|candidate| {
                                    let id = candidate.id;
                                    let photo = resolve_photo_path(&candidate.photo_path);
                                    let description = if candidate.description.is_empty() {
                                        "-".to_string()
                                    } else {
                                        candidate.description.clone()
                                    };
                                    view! {
                                        <tr>
                                            <td>{id}</td>
                                            <td>
                                                <img
                                                    class="candidate-photo-small"
                                                    src=photo
                                                    alt=candidate.name.clone()
                                                />
                                            </td>
                                            <td>{candidate.name.clone()}</td>
                                            <td>{description}</td>
                                            <td>{candidate.votes}</td>
                                            <td>
                                                <div class="action-buttons">
                                                    <button
                                                        class="btn small"
                                                        on:click=move |_| {
                                                            mounted.set(Some(EditorMode::Edit(id)));
                                                            shown.set(true);
                                                        }
                                                    >
                                                        "Edit"
                                                    </button>
                                                    <button
                                                        class="btn small danger"
                                                        on:click=move |_| on_delete(id)
                                                    >
                                                        "Delete"
                                                    </button>
                                                </div>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </tbody>
                </table>
            </div>
            <CandidateEditor mounted=mounted shown=shown />
            <QuickAddModal open=quick_open />
        </section>
    }
}

/// Add/edit modal. With a photo selected, saving runs the matching
/// multi-step saga; without one it degrades to a single create or update.
#[component]
fn CandidateEditor(
    mounted: RwSignal<Option<EditorMode>>,
    shown: RwSignal<bool>,
) -> impl IntoView {
    let Candidates(store) = expect_context();
    let ToastSignal(toast) = expect_context();
    let RefreshPending(refresh_pending) = expect_context();

    let name: RwSignal<String> = RwSignal::new(String::new());
    let description: RwSignal<String> = RwSignal::new(String::new());
    // Photo path already on the record; kept verbatim when no new file is
    // chosen.
    let recorded_photo: RwSignal<String> = RwSignal::new(String::new());
    let preview: RwSignal<Option<String>> = RwSignal::new(None);
    let file: Arc<Mutex<Option<web_sys::File>>> = Arc::new(Mutex::new(None));

    // (Re)populate the form whenever the editor opens.
    let file_for_populate = file.clone();
    Effect::new(move || {
        let Some(mode) = mounted.get() else {
            return;
        };
        *file_for_populate.lock().unwrap() = None;
        match mode {
            EditorMode::Add => {
                name.set(String::new());
                description.set(String::new());
                recorded_photo.set(String::new());
                preview.set(None);
            }
            EditorMode::Edit(id) => {
                let Some(candidate) = store.with_untracked(|s| s.find(id).cloned()) else {
                    return;
                };
                name.set(candidate.name);
                description.set(candidate.description);
                preview.set(
                    (!candidate.photo_path.is_empty())
                        .then(|| resolve_photo_path(&candidate.photo_path)),
                );
                recorded_photo.set(candidate.photo_path);
            }
        }
    });

    let file_for_change = file.clone();
    let on_file_change = move |e: leptos::ev::Event| {
        let Some(selected) = file_from_change_event(&e) else {
            return;
        };
        preview_file(preview, &selected);
        *file_for_change.lock().unwrap() = Some(selected);
    };

    let file_for_save = file.clone();
    let on_save = move |_| {
        let Some(mode) = mounted.get_untracked() else {
            return;
        };
        let draft = CandidateDraft {
            name: name.get_untracked(),
            description: description.get_untracked(),
            photo_path: recorded_photo.get_untracked(),
        };
        if draft.name.trim().is_empty() {
            show_message(toast, "name must not be empty", ToastKind::Error);
            return;
        }
        let selected = file_for_save.lock().unwrap().clone();

        spawn_local(async move {
            let mut saga = SaveSaga::new(&AdminApi);
            let result = match (mode, selected) {
                (EditorMode::Add, Some(photo)) => saga.create_with_photo(draft, &photo).await,
                (EditorMode::Edit(id), Some(photo)) => {
                    saga.update_with_photo(id, draft, &photo).await
                }
                (EditorMode::Add, None) => saga.save(None, draft).await,
                (EditorMode::Edit(id), None) => saga.save(Some(id), draft).await,
            };
            match result {
                Ok(_) => {
                    let done = match mode {
                        EditorMode::Add => "candidate added",
                        EditorMode::Edit(_) => "candidate updated",
                    };
                    show_message(toast, done, ToastKind::Success);
                    // Close first; the refetch waits out the close animation.
                    close_modal(mounted, shown);
                    schedule_candidate_refresh(
                        store,
                        toast,
                        refresh_pending,
                        SAVE_REFETCH_DELAY_MS,
                    );
                }
                Err(failure) => {
                    if failure.error == ApiError::Unauthenticated {
                        api::redirect_to_login();
                        return;
                    }
                    show_message(toast, failure.message(), ToastKind::Error);
                }
            }
        });
    };

    view! {
        {move || {
            mounted.get().map(|mode| {
                let on_file_change = on_file_change.clone();
                let on_save = on_save.clone();
                let title = match mode {
                    EditorMode::Add => "Add candidate",
                    EditorMode::Edit(_) => "Edit candidate",
                };
                view! {
                    <div
                        class="modal"
                        class:show=move || shown.get()
                        on:click=move |e| {
                            if e.target() == e.current_target() {
                                close_modal(mounted, shown);
                            }
                        }
                    >
                        <div class="modal-body">
                            <h3>{title}</h3>
                            <label class="field">
                                <span>"Name"</span>
                                <input
                                    type="text"
                                    prop:value=move || name.get()
                                    on:input=move |e: leptos::ev::Event| {
                                        if let Some(target) = e.target()
                                            && let Ok(input) = target.dyn_into::<web_sys::HtmlInputElement>()
                                        {
                                            name.set(input.value());
                                        }
                                    }
                                />
                            </label>
                            <label class="field">
                                <span>"Description"</span>
                                <textarea
                                    prop:value=move || description.get()
                                    on:input=move |e: leptos::ev::Event| {
                                        if let Some(target) = e.target()
                                            && let Ok(input) = target.dyn_into::<web_sys::HtmlTextAreaElement>()
                                        {
                                            description.set(input.value());
                                        }
                                    }
                                />
                            </label>
                            <label class="field">
                                <span>"Photo"</span>
                                <input type="file" accept="image/*" on:change=on_file_change />
                            </label>
                            {move || {
                                preview.get().map(|url| view! {
                                    <img class="photo-preview" src=url />
                                })
                            }}
                            <div class="modal-actions">
                                <button class="btn" on:click=move |_| close_modal(mounted, shown)>
                                    "Cancel"
                                </button>
                                <button class="btn primary" on:click=on_save>
                                    "Save"
                                </button>
                            </div>
                        </div>
                    </div>
                }
            })
        }}
    }
}

/// Photo-first flow: pick and preview the photo locally, collect the name,
/// then upload and create in one short saga with no photo-less record ever
/// existing.
#[component]
fn QuickAddModal(open: RwSignal<bool>) -> impl IntoView {
    let Candidates(store) = expect_context();
    let ToastSignal(toast) = expect_context();
    let RefreshPending(refresh_pending) = expect_context();

    let name: RwSignal<String> = RwSignal::new(String::new());
    let description: RwSignal<String> = RwSignal::new(String::new());
    let preview: RwSignal<Option<String>> = RwSignal::new(None);
    let file: Arc<Mutex<Option<web_sys::File>>> = Arc::new(Mutex::new(None));

    let file_for_reset = file.clone();
    Effect::new(move || {
        if open.get() {
            name.set(String::new());
            description.set(String::new());
            preview.set(None);
            *file_for_reset.lock().unwrap() = None;
        }
    });

    let file_for_change = file.clone();
    let on_file_change = move |e: leptos::ev::Event| {
        let Some(selected) = file_from_change_event(&e) else {
            return;
        };
        preview_file(preview, &selected);
        *file_for_change.lock().unwrap() = Some(selected);
        show_message(
            toast,
            "photo selected; enter a name and submit",
            ToastKind::Success,
        );
    };

    let file_for_submit = file.clone();
    let on_submit = move |_| {
        let Some(photo) = file_for_submit.lock().unwrap().clone() else {
            show_message(toast, "choose a photo first", ToastKind::Error);
            return;
        };
        let draft = CandidateDraft::new(name.get_untracked(), description.get_untracked());
        if draft.name.trim().is_empty() {
            show_message(toast, "name must not be empty", ToastKind::Error);
            return;
        }

        spawn_local(async move {
            let mut saga = SaveSaga::new(&AdminApi);
            match saga.quick_add(draft, &photo).await {
                Ok(_) => {
                    show_message(toast, "candidate added", ToastKind::Success);
                    open.set(false);
                    schedule_candidate_refresh(
                        store,
                        toast,
                        refresh_pending,
                        SAVE_REFETCH_DELAY_MS,
                    );
                }
                Err(failure) => {
                    if failure.error == ApiError::Unauthenticated {
                        api::redirect_to_login();
                        return;
                    }
                    show_message(toast, failure.message(), ToastKind::Error);
                }
            }
        });
    };

    view! {
        {move || {
            open.get().then(|| {
                let on_file_change = on_file_change.clone();
                let on_submit = on_submit.clone();
                view! {
                    <div
                        class="modal show"
                        on:click=move |e| {
                            if e.target() == e.current_target() {
                                open.set(false);
                            }
                        }
                    >
                        <div class="modal-body">
                            <h3>"Quick add"</h3>
                            <label class="drop-zone">
                                {move || {
                                    match preview.get() {
                                        Some(url) => view! {
                                            <img class="photo-preview large" src=url />
                                        }
                                        .into_any(),
                                        None => view! {
                                            <p class="drop-hint">"Tap to choose a photo"</p>
                                        }
                                        .into_any(),
                                    }
                                }}
                                <input
                                    type="file"
                                    accept="image/*"
                                    capture="environment"
                                    style="display: none;"
                                    on:change=on_file_change
                                />
                            </label>
                            <label class="field">
                                <span>"Name"</span>
                                <input
                                    type="text"
                                    prop:value=move || name.get()
                                    on:input=move |e: leptos::ev::Event| {
                                        if let Some(target) = e.target()
                                            && let Ok(input) = target.dyn_into::<web_sys::HtmlInputElement>()
                                        {
                                            name.set(input.value());
                                        }
                                    }
                                />
                            </label>
                            <label class="field">
                                <span>"Description"</span>
                                <input
                                    type="text"
                                    prop:value=move || description.get()
                                    on:input=move |e: leptos::ev::Event| {
                                        if let Some(target) = e.target()
                                            && let Ok(input) = target.dyn_into::<web_sys::HtmlInputElement>()
                                        {
                                            description.set(input.value());
                                        }
                                    }
                                />
                            </label>
                            <div class="modal-actions">
                                <button class="btn" on:click=move |_| open.set(false)>
                                    "Cancel"
                                </button>
                                <button class="btn primary" on:click=on_submit>
                                    "Add"
                                </button>
                            </div>
                        </div>
                    </div>
                }
            })
        }}
    }
}
