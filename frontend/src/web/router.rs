//! Router service.
//!
//! Wraps the History API; every `window.history` call lives here. The route
//! table and access requirements come from `easypark::route`. Guarded views
//! render their own prompt, so the router itself only redirects signed-in
//! users away from the sign-in and sign-up forms.

use easypark::AppRoute;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// Route resolution for `target`: where a user with the given auth state
/// actually lands.
fn resolve(target: AppRoute, is_authenticated: bool) -> AppRoute {
    if is_authenticated && target.should_redirect_when_authenticated() {
        log::info!("[Router] already signed in, leaving {target}");
        AppRoute::auth_success_redirect()
    } else {
        target
    }
}

#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let initial = resolve(
            AppRoute::from_path(&current_path()),
            is_authenticated.get_untracked(),
        );
        replace_history_state(&initial.to_path());
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// Navigates to `path`, adding a history entry.
    pub fn navigate(&self, path: &str) {
        self.navigate_to(AppRoute::from_path(path), true);
    }

    /// Navigates to `route`, replacing the current history entry.
    pub fn redirect(&self, route: AppRoute) {
        self.navigate_to(route, false);
    }

    fn navigate_to(&self, target: AppRoute, use_push: bool) {
        let route = resolve(target, self.is_authenticated.get_untracked());
        let path = route.to_path();
        if use_push {
            push_history_state(&path);
        } else {
            replace_history_state(&path);
        }
        log::debug!("[Router] -> {path}");
        self.set_route.set(route);
    }

    /// Back/forward buttons.
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            let route = resolve(target.clone(), is_authenticated.get_untracked());
            if route != target {
                replace_history_state(&route.to_path());
            }
            set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // lives as long as the page
        closure.forget();
    }

    /// Leaves the sign-in forms as soon as a session appears.
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let route = router.current_route.get_untracked();
            if is_auth && route.should_redirect_when_authenticated() {
                router.redirect(AppRoute::auth_success_redirect());
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| router.navigate(to)
}

// ============================================================================
// Components
// ============================================================================

#[component]
pub fn Router(is_authenticated: Signal<bool>, children: Children) -> impl IntoView {
    provide_router(is_authenticated);
    children()
}

/// Renders whatever `matcher` returns for the current route.
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// In-app link: updates history without reloading the page.
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        // let the browser handle modified clicks (new tab etc.)
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() {
            return;
        }
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
