use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{RequestTracker, run_simulation};
use crate::components::network_editor::{NetworkEditorPanel, NetworkPayload};
use crate::components::results::{Results, SimulationResponse};
use crate::components::sim_form::{SimForm, SimParams, SimulationRequest};
use crate::config::AppConfig;

/// Parameter form, topology editor and results on one page.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let params = RwSignal::new(SimParams::default());
	let network = RwSignal::new(NetworkPayload::default());
	let response = RwSignal::new(None::<SimulationResponse>);
	let requests = RwSignal::new(RequestTracker::default());
	let busy = Signal::derive(move || requests.with(RequestTracker::busy));
	let protocol = Signal::derive(move || params.with(|p| p.protocol));

	// Every click sends; an earlier request still in flight is not cancelled,
	// its reply is dropped instead.
	let submit = move |_: ()| {
		let request = SimulationRequest::new(params.get_untracked(), network.get_untracked());
		let url = config.api_url.clone();
		let Some(ticket) = requests.try_update(RequestTracker::begin) else {
			return;
		};
		response.set(None);
		spawn_local(async move {
			let result = run_simulation(&url, request).await;
			if requests.try_update(|r| r.finish(ticket)).unwrap_or(false) {
				response.set(Some(result));
			}
		});
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div style="padding: 32px;">
				<h1>"QKD Simulator"</h1>
				<SimForm params=params busy=busy on_submit=submit />
				<NetworkEditorPanel protocol=protocol on_change=move |payload: NetworkPayload| network.set(payload) />
				{move || {
					response
						.get()
						.map(|r| view! { <Results response=Signal::derive(move || r.clone()) /> })
				}}
			</div>
		</ErrorBoundary>
	}
}
