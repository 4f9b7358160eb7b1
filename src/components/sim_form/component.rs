use leptos::prelude::*;

use crate::components::network_editor::Protocol;

use super::types::{SimField, SimParams};

/// Scalar parameter form with the "Run Simulation" button.
#[component]
pub fn SimForm(
	params: RwSignal<SimParams>,
	#[prop(into)] busy: Signal<bool>,
	#[prop(into)] on_submit: Callback<()>,
) -> impl IntoView {
	let last_error = RwSignal::new(None::<String>);

	let fields = move || {
		let current = params.get();
		SimField::visible(current.protocol)
			.into_iter()
			.map(|field| {
				view! {
					<label>
						{field.label()}": "
						<input
							name=field.key()
							type="number"
							step=field.step()
							prop:value=field.value(&current)
							on:change=move |ev| {
								let raw = event_target_value(&ev);
								let result = params.try_update(|p| p.set(field, &raw));
								last_error.set(result.and_then(|r| r.err()).map(|e| e.to_string()));
							}
						/>
					</label>
				}
			})
			.collect_view()
	};

	view! {
		<form
			style="margin-bottom: 32px; display: flex; gap: 24px; align-items: center; flex-wrap: wrap;"
			on:submit=move |ev| {
				ev.prevent_default();
				on_submit.run(());
			}
		>
			<label>
				"Protocol: "
				<select
					name="protocol"
					on:change=move |ev| {
						let raw = event_target_value(&ev);
						let result = params.try_update(|p| p.set_protocol(&raw));
						last_error.set(result.and_then(|r| r.err()).map(|e| e.to_string()));
					}
				>
					{Protocol::ALL
						.into_iter()
						.map(|p| {
							view! {
								<option
									value=p.as_str()
									selected=move || params.with(|current| current.protocol == p)
								>
									{p.label()}
								</option>
							}
						})
						.collect_view()}
				</select>
			</label>
			{fields}
			<button type="submit">
				{move || if busy.get() { "Running..." } else { "Run Simulation" }}
			</button>
			{move || {
				last_error.get().map(|msg| view! { <span style="color: #d32f2f;">{msg}</span> })
			}}
		</form>
	}
}
