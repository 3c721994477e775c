//! Loading and error placeholders shared by the views.

use easypark::load::LoadState;
use easypark::scope::ViewScope;
use leptos::prelude::*;

#[component]
pub fn Spinner(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center gap-2 py-12 text-base-content/60">
            <span class="loading loading-spinner loading-lg text-primary"></span>
            {label}
        </div>
    }
}

#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<String>) -> impl IntoView {
    view! {
        <div role="alert" class="alert alert-error text-sm py-2">
            <svg xmlns="http://www.w3.org/2000/svg" class="stroke-current shrink-0 h-6 w-6" fill="none" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M10 14l2-2m0 0l2-2m-2 2l-2-2m2 2l2 2m7-2a9 9 0 11-18 0 9 9 0 0118 0z" /></svg>
            <span>{move || message.get()}</span>
        </div>
    }
}

/// Spinner while loading, the inline error on failure, `ready` otherwise.
#[component]
pub fn Loaded<T, F, V>(state: ReadSignal<LoadState<T>>, ready: F) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
    F: Fn(T) -> V + Send + Sync + 'static,
    V: IntoView + 'static,
{
    move || match state.get() {
        LoadState::Loading => view! { <Spinner /> }.into_any(),
        LoadState::Failed(message) => view! { <ErrorAlert message=message /> }.into_any(),
        LoadState::Ready(value) => ready(value).into_any(),
    }
}

/// Scope tied to the calling view: cancelled when the view is disposed.
pub fn use_view_scope() -> ViewScope {
    let scope = ViewScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.cancel()
    });
    scope
}
