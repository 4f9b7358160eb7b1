use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bits shown in the key comparison tab.
pub const KEY_PREVIEW_BITS: usize = 100;

/// Body returned by the simulation endpoint, or the synthetic error record
/// produced when the request itself failed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SimulationResponse {
	Results { results: Vec<ResultEntry> },
	Error { error: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultEntry {
	Channel(Box<ChannelResult>),
	Error { error: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyMaterial {
	Bits(Vec<u8>),
	Text(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelEcho {
	#[serde(default)]
	pub fiber_length_km: Option<f64>,
	#[serde(default)]
	pub fiber_attenuation_db_per_km: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeEcho {
	#[serde(default)]
	pub mu: Option<f64>,
	#[serde(default)]
	pub detector_efficiency: Option<f64>,
	#[serde(default)]
	pub dark_count_rate: Option<f64>,
}

/// Parameters the backend echoes back for one channel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultParameters {
	#[serde(default)]
	pub channel: ChannelEcho,
	#[serde(default)]
	pub node_a: NodeEcho,
	#[serde(default)]
	pub node_b: NodeEcho,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelResult {
	pub channel_id: u32,
	pub from: u32,
	pub to: u32,
	pub protocol: String,
	pub qber: f64,
	#[serde(default)]
	pub final_key_length: u64,
	#[serde(default)]
	pub secure_key_rate_bps: Option<f64>,
	#[serde(default)]
	pub theory_compliance: bool,
	#[serde(default)]
	pub theory_message: String,
	#[serde(default)]
	pub alice_key: Option<KeyMaterial>,
	#[serde(default)]
	pub bob_key: Option<KeyMaterial>,
	#[serde(default)]
	pub parameters: ResultParameters,
	/// Anything else the backend sends along.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl SimulationResponse {
	/// Error to show instead of results, if any.
	pub fn error(&self) -> Option<&str> {
		match self {
			SimulationResponse::Error { error } => Some(error),
			SimulationResponse::Results { results } => match results.first() {
				Some(ResultEntry::Error { error }) => Some(error),
				_ => None,
			},
		}
	}

	pub fn channels(&self) -> Vec<&ChannelResult> {
		match self {
			SimulationResponse::Error { .. } => Vec::new(),
			SimulationResponse::Results { results } => results
				.iter()
				.filter_map(|entry| match entry {
					ResultEntry::Channel(result) => Some(result.as_ref()),
					ResultEntry::Error { .. } => None,
				})
				.collect(),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResultsTab {
	#[default]
	Summary,
	Keys,
	Theory,
}

impl ResultsTab {
	pub const ALL: [ResultsTab; 3] = [ResultsTab::Summary, ResultsTab::Keys, ResultsTab::Theory];

	pub fn label(self) -> &'static str {
		match self {
			ResultsTab::Summary => "Summary",
			ResultsTab::Keys => "Key Comparison",
			ResultsTab::Theory => "Theory Details",
		}
	}

	/// Tabs that show one channel at a time.
	pub fn has_channel_picker(self) -> bool {
		self != ResultsTab::Summary
	}
}

/// Encoding and detection summary per protocol, for the theory tab.
pub fn protocol_details(protocol: &str) -> (&'static str, &'static str) {
	match protocol {
		"cow" => (
			"Time-bin position of a non-empty pulse within a pulse pair",
			"Time-of-arrival data line with an interferometric monitor line",
		),
		"bb84" => (
			"Polarization states in two conjugate bases",
			"Random basis choice followed by polarization analysis",
		),
		_ => (
			"Phase difference between consecutive pulses (0, π)",
			"Mach-Zehnder interferometer",
		),
	}
}

pub fn format_key(key: Option<&KeyMaterial>) -> String {
	match key {
		None => "N/A".to_string(),
		Some(KeyMaterial::Text(text)) => text.clone(),
		Some(KeyMaterial::Bits(bits)) => {
			let mut out: String = bits
				.iter()
				.take(KEY_PREVIEW_BITS)
				.map(|b| b.to_string())
				.collect();
			if bits.len() > KEY_PREVIEW_BITS {
				out.push_str("...");
			}
			out
		}
	}
}

pub fn format_percent(value: f64) -> String {
	format!("{:.2}%", value * 100.0)
}

pub fn format_scientific(value: Option<f64>) -> String {
	value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2e}"))
}

/// Secure key rate with two decimals; a missing or zero rate reads as N/A.
pub fn format_rate(value: Option<f64>) -> String {
	match value {
		Some(v) if v != 0.0 => format!("{v:.2}"),
		_ => "N/A".to_string(),
	}
}

pub fn format_optional(value: Option<f64>) -> String {
	value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}
