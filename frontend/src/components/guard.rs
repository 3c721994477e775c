use crate::auth::use_auth;
use crate::components::icons::Lock;
use crate::web::router::Link;
use easypark::guard::evaluate;
use easypark::{GuardOutcome, Prompt, RouteRequirement};
use leptos::prelude::*;

/// Renders `children` only when the session meets `requirement`; otherwise
/// a prompt explains what is missing. Re-evaluated whenever the session
/// changes, so signing in or out flips the view in place.
#[component]
pub fn Protected(requirement: RouteRequirement, children: ChildrenFn) -> impl IntoView {
    let session = use_auth().session();
    let outcome = Memo::new(move |_| session.with(|s| evaluate(s, requirement)));

    move || match outcome.get() {
        GuardOutcome::Render => children().into_any(),
        GuardOutcome::AuthRequired(prompt) | GuardOutcome::AccessDenied(prompt) => {
            view! { <GuardPrompt prompt=prompt /> }.into_any()
        }
    }
}

#[component]
fn GuardPrompt(prompt: Prompt) -> impl IntoView {
    let Prompt {
        title,
        message,
        action_text,
        action_link,
        secondary_link,
    } = prompt;

    view! {
        <div class="hero min-h-[60vh]">
            <div class="hero-content text-center">
                <div class="card bg-base-100 shadow-xl max-w-md">
                    <div class="card-body items-center">
                        <div class="p-3 bg-warning/10 rounded-2xl text-warning">
                            <Lock attr:class="h-8 w-8" />
                        </div>
                        <h2 class="card-title">{title}</h2>
                        <p class="text-base-content/70">{message}</p>
                        <div class="card-actions flex-col items-center mt-4">
                            <Link to=action_link class="btn btn-primary">{action_text}</Link>
                            {secondary_link.map(|(text, to)| view! {
                                <Link to=to class="link link-hover text-sm">{text}</Link>
                            })}
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
