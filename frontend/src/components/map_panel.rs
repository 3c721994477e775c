use crate::web::router::Link;
use easypark::map::MapView;
use leptos::prelude::*;

/// OpenStreetMap embed plus the marker list the embed cannot show.
#[component]
pub fn MapPanel(#[prop(into)] map: Signal<MapView>) -> impl IntoView {
    let src = move || map.with(MapView::embed_url);

    view! {
        <div class="card bg-base-100 shadow-xl overflow-hidden">
            <iframe
                title="Map"
                class="w-full h-80 border-0"
                src=src
                loading="lazy"
            ></iframe>
            <ul class="menu menu-sm bg-base-100 max-h-48 overflow-y-auto">
                <For
                    each=move || map.with(|v| v.markers.clone())
                    key=|marker| (marker.label.clone(), marker.link.clone())
                    children=move |marker| {
                        let zoom = map.with_untracked(|v| v.zoom);
                        let external = marker.external_url(zoom);
                        view! {
                            <li>
                                <div class="flex flex-col items-start gap-0">
                                    <a href=external target="_blank" rel="noopener" class="font-semibold">
                                        {marker.label.clone()}
                                    </a>
                                    <span class="text-xs opacity-60">{marker.detail.clone()}</span>
                                    {marker.link.clone().map(|to| view! {
                                        <Link to=to class="link link-primary text-xs">"Reserve"</Link>
                                    })}
                                </div>
                            </li>
                        }
                    }
                />
            </ul>
        </div>
    }
}
