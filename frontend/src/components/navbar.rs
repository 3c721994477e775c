use crate::auth::{logout, use_auth};
use crate::components::icons::{Car, LogOut};
use crate::web::router::{Link, use_navigate};
use easypark::AppRoute;
use leptos::prelude::*;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();
    let is_authenticated = auth.is_authenticated_signal();
    let is_admin = auth.is_admin_signal();
    let navigate = use_navigate();

    let on_logout = move |_| {
        logout(&auth);
        navigate(&AppRoute::Facilities.to_path());
    };

    view! {
        <div class="navbar bg-base-100 shadow-md px-4">
            <div class="flex-1 gap-2">
                <Car attr:class="h-6 w-6 text-primary" />
                <Link to=AppRoute::Facilities.to_path() class="btn btn-ghost text-xl">"EasyPark"</Link>
            </div>
            <div class="flex-none">
                <ul class="menu menu-horizontal px-1 gap-1">
                    <li><Link to=AppRoute::Facilities.to_path()>"Parkings"</Link></li>
                    <Show when=move || is_authenticated.get()>
                        <li><Link to=AppRoute::RegisterFacility.to_path()>"Register parking"</Link></li>
                        <li><Link to=AppRoute::MyReservations.to_path()>"My reservations"</Link></li>
                    </Show>
                    <Show when=move || is_admin.get()>
                        <li><Link to=AppRoute::AllFacilities.to_path()>"All parkings"</Link></li>
                        <li><Link to=AppRoute::Reservations.to_path()>"Reservations"</Link></li>
                    </Show>
                </ul>
                <Show
                    when=move || is_authenticated.get()
                    fallback=|| view! {
                        <div class="flex gap-2">
                            <Link to=AppRoute::Login.to_path() class="btn btn-ghost btn-sm">"Sign in"</Link>
                            <Link to=AppRoute::Register.to_path() class="btn btn-primary btn-sm">"Register"</Link>
                        </div>
                    }
                >
                    <span class="hidden md:inline text-sm opacity-70 mx-2">
                        {move || session.with(|s| s.display_name()).unwrap_or_default()}
                    </span>
                    <button on:click=on_logout.clone() class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "Sign out"
                    </button>
                </Show>
            </div>
        </div>
    }
}
