use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use crate::app::{Candidates, ToastSignal, refresh_candidates};
use crate::photo::resolve_photo_path;
use crate::ranking::{RankingEntry, rank, summarize};
use crate::render::{CommitWindow, stage_refresh};

/// Live results: headline tiles plus the ranking table, refreshed behind the
/// fade window so push-driven bursts never paint a half-built table.
#[component]
pub fn DashboardTab() -> impl IntoView {
    let Candidates(store) = expect_context();
    let ToastSignal(toast) = expect_context();

    let summary = Memo::new(move |_| store.with(|s| summarize(s.candidates())));

    let displayed: RwSignal<Vec<RankingEntry>> = RwSignal::new(Vec::new());
    let visible: RwSignal<bool> = RwSignal::new(true);
    let window = Rc::new(RefCell::new(CommitWindow::new()));

    Effect::new(move || {
        let rows = store.with(|s| rank(s.candidates()));
        stage_refresh(&window, displayed, visible, rows);
    });

    view! {
        <section class="dashboard">
            <div class="stat-tiles">
                <div class="stat-tile">
                    <span class="stat-value">{move || summary.get().total_votes}</span>
                    <span class="stat-label">"Total votes"</span>
                </div>
                <div class="stat-tile">
                    <span class="stat-value">{move || summary.get().total_candidates}</span>
                    <span class="stat-label">"Candidates"</span>
                </div>
                <div class="stat-tile">
                    <span class="stat-value">{move || summary.get().top_votes}</span>
                    <span class="stat-label">"Top votes"</span>
                </div>
            </div>
            <div class="panel">
                <div class="panel-header">
                    <h2>"Live ranking"</h2>
                    <button class="btn" on:click=move |_| refresh_candidates(store, toast)>
                        "Refresh"
                    </button>
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
                            <th>"#"</th>
                            <th>"Photo"</th>
                            <th>"Name"</th>
                            <th>"Votes"</th>
                            <th>"Share"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            displayed
                                .get()
                                .into_iter()
                                .map(|entry| {
                                    let photo = resolve_photo_path(&entry.candidate.photo_path);
                                    view! {
                                        <tr>
                                            <td>{entry.position}</td>
                                            <td>
                                                <img
                                                    class="candidate-photo-small"
                                                    src=photo
                                                    alt=entry.candidate.name.clone()
                                                />
                                            </td>
                                            <td>{entry.candidate.name.clone()}</td>
                                            <td>{entry.candidate.votes}</td>
                                            <td>{format!("{:.1}%", entry.percentage)}</td>
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
