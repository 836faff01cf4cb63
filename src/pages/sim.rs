use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;
use log::warn;

use crate::components::SimCanvas;
use crate::data::{ORG_CHART_URL, OrgUnit, fetch_org_chart};
use crate::pages::not_found::NotFound;
use crate::sims::{DEFAULT_SIZE, OrgChartSim, SimKind};

/// `/sims/:slug`: one widget, or the not-found page for an unknown slug.
#[component]
pub fn SimPage() -> impl IntoView {
	let params = use_params_map();
	let kind = Memo::new(move |_| {
		params
			.read()
			.get("slug")
			.and_then(|slug| SimKind::from_slug(&slug))
	});

	move || match kind.get() {
		Some(kind) => view! { <SimFrame kind=kind /> }.into_any(),
		None => view! { <NotFound /> }.into_any(),
	}
}

#[component]
fn SimFrame(kind: SimKind) -> impl IntoView {
	let body = match kind {
		SimKind::OrgChart => view! { <OrgChartLoader /> }.into_any(),
		_ => match kind.build() {
			Ok(sim) => view! { <SimCanvas sim=sim /> }.into_any(),
			Err(err) => {
				warn!("{}: {err}", kind.slug());
				view! { <p class="sim-error">{err.to_string()}</p> }.into_any()
			}
		},
	};

	view! {
		<main class="sim-page">
			<nav>
				<A href="/">"← All MicroSims"</A>
			</nav>
			<h1>{kind.title()}</h1>
			<p class="subtitle">{kind.summary()}</p>
			<div class="sim-frame">{body}</div>
			<p class="hint">
				"Click the canvas to give it keyboard focus. Space pauses, r resets."
			</p>
		</main>
	}
}

/// Shows a placeholder chart until the hierarchy arrives, then the real one
/// or the fetch error.
#[component]
fn OrgChartLoader() -> impl IntoView {
	let chart = RwSignal::new(None::<Result<OrgUnit, String>>);
	spawn_local(async move {
		let result = fetch_org_chart(ORG_CHART_URL).await;
		if let Err(err) = &result {
			warn!("{err}");
		}
		chart.set(Some(result.map_err(|e| e.to_string())));
	});

	let (w, h) = DEFAULT_SIZE;
	move || match chart.get() {
		None => view! { <SimCanvas sim=Box::new(OrgChartSim::placeholder(w, h)) /> }.into_any(),
		Some(Ok(root)) => view! { <SimCanvas sim=Box::new(OrgChartSim::new(root, w, h)) /> }.into_any(),
		Some(Err(message)) => view! { <p class="sim-error">{message}</p> }.into_any(),
	}
}
