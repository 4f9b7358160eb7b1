use leptos::prelude::*;

use super::types::{
	ChannelResult, ResultsTab, SimulationResponse, format_key, format_optional, format_percent,
	format_rate, format_scientific, protocol_details,
};

const CELL: &str = "padding: 8px; text-align: left;";

/// Tabbed viewer for whatever the simulation endpoint returned.
#[component]
pub fn Results(#[prop(into)] response: Signal<SimulationResponse>) -> impl IntoView {
	let (tab, set_tab) = signal(ResultsTab::Summary);
	let (selected_channel, set_selected_channel) = signal(None::<u32>);

	Effect::new(move |_| {
		let first = response.with(|r| r.channels().first().map(|c| c.channel_id));
		set_selected_channel.set(first);
	});

	move || {
		let current = response.get();
		if let Some(error) = current.error() {
			return view! { <div style="color: red;">{error.to_string()}</div> }.into_any();
		}
		let channels: Vec<ChannelResult> = current.channels().into_iter().cloned().collect();
		if channels.is_empty() {
			return view! { <div style="color: red;">"No results to display."</div> }.into_any();
		}

		let picker_options = channels.clone();
		let selected = channels
			.iter()
			.find(|c| Some(c.channel_id) == selected_channel.get())
			.cloned();

		view! {
			<div style="border: 1px solid #ccc; padding: 16px; border-radius: 8px; background-color: #fff;">
				<h2>"Simulation Results"</h2>
				<div style="margin-bottom: 16px; border-bottom: 1px solid #eee; padding-bottom: 8px;">
					{ResultsTab::ALL
						.into_iter()
						.map(|t| {
							view! {
								<button
									style="margin-right: 8px;"
									disabled=move || tab.get() == t
									on:click=move |_| set_tab.set(t)
								>
									{t.label()}
								</button>
							}
						})
						.collect_view()}
				</div>
				{move || {
					tab.get()
						.has_channel_picker()
						.then(|| channel_picker(picker_options.clone(), selected_channel, set_selected_channel))
				}}
				{match tab.get() {
					ResultsTab::Summary => summary_table(channels),
					ResultsTab::Keys => selected.map(key_comparison).unwrap_or_else(|| ().into_any()),
					ResultsTab::Theory => selected.map(theory_details).unwrap_or_else(|| ().into_any()),
				}}
			</div>
		}
		.into_any()
	}
}

fn channel_picker(
	channels: Vec<ChannelResult>,
	selected: ReadSignal<Option<u32>>,
	set_selected: WriteSignal<Option<u32>>,
) -> impl IntoView {
	view! {
		<div style="margin-bottom: 16px;">
			<label>
				"Select Channel: "
				<select on:change=move |ev| {
					set_selected.set(event_target_value(&ev).parse().ok());
				}>
					{channels
						.into_iter()
						.map(|c| {
							let id = c.channel_id;
							view! {
								<option value=id.to_string() selected=move || selected.get() == Some(id)>
									{format!("Channel {} (Node {} to Node {})", c.channel_id, c.from, c.to)}
								</option>
							}
						})
						.collect_view()}
				</select>
			</label>
		</div>
	}
}

fn summary_table(channels: Vec<ChannelResult>) -> AnyView {
	view! {
		<table style="width: 100%; border-collapse: collapse;">
			<thead>
				<tr style="border-bottom: 2px solid #000;">
					<th style=CELL>"Channel"</th>
					<th style=CELL>"Protocol"</th>
					<th style=CELL>"QBER"</th>
					<th style=CELL>"Final Key Len"</th>
					<th style=CELL>"SKR (bps)"</th>
					<th style=CELL>"Compliance"</th>
				</tr>
			</thead>
			<tbody>
				{channels
					.into_iter()
					.map(|r| {
						let color = if r.theory_compliance { "green" } else { "red" };
						view! {
							<tr style="border-bottom: 1px solid #ccc;">
								<td style=CELL>{format!("Node {} -> Node {}", r.from, r.to)}</td>
								<td style=CELL>{r.protocol.to_uppercase()}</td>
								<td style=CELL>{format_percent(r.qber)}</td>
								<td style=CELL>{r.final_key_length}</td>
								<td style=CELL>{format_rate(r.secure_key_rate_bps)}</td>
								<td style=format!("{CELL} color: {color};")>{r.theory_message}</td>
							</tr>
						}
					})
					.collect_view()}
			</tbody>
		</table>
	}
	.into_any()
}

fn key_comparison(r: ChannelResult) -> AnyView {
	view! {
		<div>
			<h3>{format!("Key Comparison for Channel {} (First 100 bits)", r.channel_id)}</h3>
			<div style="display: grid; grid-template-columns: 1fr 1fr; gap: 16px;">
				<div>
					<b>"Alice's Key:"</b>
					<div style="word-break: break-all; font-family: monospace;">
						{format_key(r.alice_key.as_ref())}
					</div>
				</div>
				<div>
					<b>"Bob's Key:"</b>
					<div style="word-break: break-all; font-family: monospace;">
						{format_key(r.bob_key.as_ref())}
					</div>
				</div>
			</div>
		</div>
	}
	.into_any()
}

fn theory_details(r: ChannelResult) -> AnyView {
	let (encoding, detection) = protocol_details(&r.protocol);
	let p = r.parameters;
	view! {
		<div>
			<h3>{format!("Theory Details for Channel {}", r.channel_id)}</h3>
			<div style="display: grid; grid-template-columns: repeat(2, 1fr); gap: 16px;">
				<div>
					<h4>"Protocol Details"</h4>
					<div><b>"Encoding: "</b>{encoding}</div>
					<div><b>"Detection: "</b>{detection}</div>
				</div>
				<div>
					<h4>"Channel Parameters"</h4>
					<div>
						<b>"Fiber Length: "</b>
						{format!("{} km", format_optional(p.channel.fiber_length_km))}
					</div>
					<div>
						<b>"Attenuation: "</b>
						{format!("{} dB/km", format_optional(p.channel.fiber_attenuation_db_per_km))}
					</div>
				</div>
				<div>
					<h4>{format!("Node {} (Alice) Parameters", r.from)}</h4>
					<div><b>"Avg. Photon Number (μ): "</b>{format_optional(p.node_a.mu)}</div>
				</div>
				<div>
					<h4>{format!("Node {} (Bob) Parameters", r.to)}</h4>
					<div>
						<b>"Detector Efficiency: "</b>
						{p.node_b.detector_efficiency.map_or_else(|| "N/A".to_string(), format_percent)}
					</div>
					<div><b>"Dark Count Rate: "</b>{format_scientific(p.node_b.dark_count_rate)}</div>
				</div>
			</div>
		</div>
	}
	.into_any()
}
