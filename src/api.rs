//! Transport to the external simulation service.

use log::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::components::results::SimulationResponse;
use crate::components::sim_form::SimulationRequest;
use crate::error::{Error, Result};

fn js_error(err: JsValue) -> Error {
	Error::Transport(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// POSTs `request` as JSON to `url` and decodes the reply.
pub async fn post_simulation(url: &str, request: &SimulationRequest) -> Result<SimulationResponse> {
	let body = serde_json::to_string(request)?;

	let headers = Headers::new().map_err(js_error)?;
	headers.set("Content-Type", "application/json").map_err(js_error)?;
	let init = RequestInit::new();
	init.set_method("POST");
	init.set_headers(&headers);
	init.set_body(&JsValue::from_str(&body));
	let req = Request::new_with_str_and_init(url, &init).map_err(js_error)?;

	let window = web_sys::window().ok_or_else(|| Error::Transport("no window".into()))?;
	let resp: Response = JsFuture::from(window.fetch_with_request(&req))
		.await
		.map_err(js_error)?
		.dyn_into()
		.map_err(js_error)?;
	if !resp.ok() {
		return Err(Error::Http {
			status: resp.status(),
		});
	}

	let text = JsFuture::from(resp.text().map_err(js_error)?)
		.await
		.map_err(js_error)?
		.as_string()
		.unwrap_or_default();
	Ok(serde_json::from_str(&text)?)
}

/// Runs one simulation. Failures come back as an error record for the viewer.
pub async fn run_simulation(url: &str, request: SimulationRequest) -> SimulationResponse {
	info!(
		"simulating {} node(s), {} channel(s) with {}",
		request.network.nodes.len(),
		request.network.channels.len(),
		request.params.protocol
	);
	match post_simulation(url, &request).await {
		Ok(response) => response,
		Err(e) => {
			warn!("simulation request failed: {e}");
			failure_record(&e)
		}
	}
}

/// Sequence numbers for simulation requests, which are never cancelled.
/// Only the reply to the newest request is shown, and the page stays busy
/// until that reply lands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestTracker {
	issued: u64,
	settled: u64,
}

impl RequestTracker {
	/// Starts a request and returns its ticket.
	pub fn begin(&mut self) -> u64 {
		self.issued += 1;
		self.issued
	}

	/// Records the reply to `ticket`. Returns false for a superseded request.
	pub fn finish(&mut self, ticket: u64) -> bool {
		if ticket != self.issued {
			debug!("dropping reply to superseded request {ticket}");
			return false;
		}
		self.settled = ticket;
		true
	}

	/// Whether the newest request is still waiting for its reply.
	pub fn busy(&self) -> bool {
		self.settled != self.issued
	}
}

pub fn failure_record(err: &Error) -> SimulationResponse {
	SimulationResponse::Error {
		error: format!("Simulation failed: {err}"),
	}
}
