use leptos::prelude::*;
use leptos_router::components::A;

use crate::sims::SimKind;

/// Index of every MicroSim.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<main class="index">
			<h1>"Organizational Network Analysis MicroSims"</h1>
			<p class="subtitle">
				"Small interactive models of how people connect at work. Drag people around, hover for details."
			</p>
			<ul class="sim-list">
				{SimKind::ALL
					.into_iter()
					.map(|kind| {
						view! {
							<li>
								<A href=format!("/sims/{}", kind.slug())>{kind.title()}</A>
								<span class="summary">{kind.summary()}</span>
							</li>
						}
					})
					.collect_view()}
			</ul>
		</main>
	}
}
