use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::facilities::FacilityCard;
use crate::components::icons::RefreshCw;
use crate::components::status::{Loaded, use_view_scope};
use crate::web::router::Link;
use easypark::AppRoute;
use easypark::browse::{Page, ViewMode, list_all_facilities};
use easypark::load::LoadState;
use easypark_shared::Facility;
use easypark_shared::pricing::format_money;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Admin overview of every facility, paginated in memory.
#[component]
pub fn AllFacilitiesPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let scope = use_view_scope();
    let page_size = api.config.page_size;

    let (state, set_state) = signal(LoadState::<Vec<Facility>>::Loading);
    let (requested_page, set_requested_page) = signal(1usize);
    let (mode, set_mode) = signal(ViewMode::default());

    let load = move || {
        let api = api.clone();
        let scope = scope.clone();
        set_state.set(LoadState::Loading);
        spawn_local(async move {
            if let Some(result) = scope.run(list_all_facilities(&api.api)).await {
                set_state.set(result.map_err(|e| auth.check(e)).into());
            }
        });
    };
    load();

    let page = Memo::new(move |_| {
        let total = state.with(|s| s.ready().map_or(0, Vec::len));
        Page::new(total, page_size, requested_page.get())
    });

    let listing = move |facilities: Vec<Facility>| {
        let page = page.get_untracked();
        let visible = page.slice(&facilities).to_vec();
        if visible.is_empty() {
            return view! {
                <div class="text-center py-8 text-base-content/50">"No parkings registered yet."</div>
            }
            .into_any();
        }
        match mode.get_untracked() {
            ViewMode::Cards => view! {
                <div class="grid md:grid-cols-2 xl:grid-cols-3 gap-4">
                    {visible.into_iter().map(|f| view! { <FacilityCard facility=f /> }).collect_view()}
                </div>
            }
            .into_any(),
            ViewMode::Table => view! { <FacilityTable facilities=visible /> }.into_any(),
        }
    };

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-2">
                <div>
                    <h1 class="text-3xl font-bold">"All parkings"</h1>
                    <p class="text-base-content/70">
                        {move || format!("{} in total", page.get().total_items)}
                    </p>
                </div>
                <div class="flex gap-2">
                    <button class="btn btn-outline btn-sm" on:click=move |_| set_mode.update(|m| *m = m.toggled())>
                        {move || format!("Show as {}", mode.get().toggled().label().to_lowercase())}
                    </button>
                    <button class="btn btn-ghost btn-sm btn-circle" on:click=move |_| load() disabled=move || state.with(LoadState::is_loading)>
                        <RefreshCw attr:class="h-4 w-4" />
                    </button>
                    <Link to=AppRoute::RegisterFacility.to_path() class="btn btn-primary btn-sm">"Register parking"</Link>
                </div>
            </div>

            // re-render the listing when the page or the layout changes
            {move || {
                page.track();
                mode.track();
                view! { <Loaded state=state ready=listing /> }
            }}

            <Show when=move || page.get().is_paginated()>
                <div class="join flex justify-center">
                    <button
                        class="join-item btn"
                        disabled=move || !page.get().has_previous()
                        on:click=move |_| set_requested_page.set(page.get_untracked().number - 1)
                    >"«"</button>
                    <span class="join-item btn btn-disabled">{move || page.get().label()}</span>
                    <button
                        class="join-item btn"
                        disabled=move || !page.get().has_next()
                        on:click=move |_| set_requested_page.set(page.get_untracked().number + 1)
                    >"»"</button>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn FacilityTable(facilities: Vec<Facility>) -> impl IntoView {
    view! {
        <div class="overflow-x-auto card bg-base-100 shadow">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Address"</th>
                        <th class="hidden md:table-cell">"City"</th>
                        <th>"Free"</th>
                        <th>"Hourly"</th>
                        <th class="hidden md:table-cell">"Daily"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {facilities
                        .into_iter()
                        .map(|f| {
                            let reserve = AppRoute::Reserve(f.id.clone()).to_path();
                            view! {
                                <tr>
                                    <td class="font-semibold">{f.name}</td>
                                    <td>{f.address}</td>
                                    <td class="hidden md:table-cell">{f.city}</td>
                                    <td>{format!("{} / {}", f.available_spaces, f.total_spaces)}</td>
                                    <td>{format_money(f.hourly_rate)}</td>
                                    <td class="hidden md:table-cell">{format_money(f.daily_rate)}</td>
                                    <td><Link to=reserve class="btn btn-ghost btn-xs">"Reserve"</Link></td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
}
