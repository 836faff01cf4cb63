use leptos::prelude::*;
use leptos_router::components::A;

/// Fallback for unknown routes and unknown widget slugs.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<main class="not-found">
			<h1>"Not found"</h1>
			<p>"There is no MicroSim here."</p>
			<A href="/">"Back to the index"</A>
		</main>
	}
}
