use serde::{Deserialize, Serialize};

use crate::components::network_editor::{NetworkPayload, Protocol};
use crate::error::{Error, Result};
use crate::numeric::{Domain, parse_count, parse_in};

/// Scalar protocol parameters entered in the form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
	pub protocol: Protocol,
	pub num_pulses: u64,
	pub pulse_repetition_rate: f64,
	pub phase_flip_prob: f64,
	pub cow_monitor_pulse_ratio: f64,
	pub cow_detection_threshold_photons: u64,
	pub cow_extinction_ratio_db: f64,
}

impl Default for SimParams {
	fn default() -> Self {
		Self {
			protocol: Protocol::Dps,
			num_pulses: 10_000,
			pulse_repetition_rate: 1.0,
			phase_flip_prob: 0.05,
			cow_monitor_pulse_ratio: 0.1,
			cow_detection_threshold_photons: 0,
			cow_extinction_ratio_db: 20.0,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimField {
	NumPulses,
	PulseRepetitionRate,
	PhaseFlipProb,
	CowMonitorPulseRatio,
	CowDetectionThresholdPhotons,
	CowExtinctionRatioDb,
}

impl SimField {
	/// Inputs shown for `protocol`, in form order.
	pub fn visible(protocol: Protocol) -> Vec<SimField> {
		let mut fields = vec![
			SimField::NumPulses,
			SimField::PulseRepetitionRate,
			SimField::PhaseFlipProb,
		];
		if protocol == Protocol::Cow {
			fields.extend([
				SimField::CowMonitorPulseRatio,
				SimField::CowDetectionThresholdPhotons,
				SimField::CowExtinctionRatioDb,
			]);
		}
		fields
	}

	pub fn key(self) -> &'static str {
		match self {
			SimField::NumPulses => "num_pulses",
			SimField::PulseRepetitionRate => "pulse_repetition_rate",
			SimField::PhaseFlipProb => "phase_flip_prob",
			SimField::CowMonitorPulseRatio => "cow_monitor_pulse_ratio",
			SimField::CowDetectionThresholdPhotons => "cow_detection_threshold_photons",
			SimField::CowExtinctionRatioDb => "cow_extinction_ratio_db",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			SimField::NumPulses => "Pulses",
			SimField::PulseRepetitionRate => "Pulse Repetition Rate (ns)",
			SimField::PhaseFlipProb => "Phase Flip Probability (0-1)",
			SimField::CowMonitorPulseRatio => "COW Monitor Pulse Ratio",
			SimField::CowDetectionThresholdPhotons => "COW Detection Threshold (Photons)",
			SimField::CowExtinctionRatioDb => "COW Extinction Ratio (dB)",
		}
	}

	pub fn step(self) -> &'static str {
		match self {
			SimField::NumPulses | SimField::CowDetectionThresholdPhotons => "1",
			SimField::PhaseFlipProb => "0.001",
			SimField::CowMonitorPulseRatio => "0.01",
			SimField::PulseRepetitionRate | SimField::CowExtinctionRatioDb => "any",
		}
	}

	pub fn value(self, params: &SimParams) -> String {
		match self {
			SimField::NumPulses => params.num_pulses.to_string(),
			SimField::PulseRepetitionRate => params.pulse_repetition_rate.to_string(),
			SimField::PhaseFlipProb => params.phase_flip_prob.to_string(),
			SimField::CowMonitorPulseRatio => params.cow_monitor_pulse_ratio.to_string(),
			SimField::CowDetectionThresholdPhotons => params.cow_detection_threshold_photons.to_string(),
			SimField::CowExtinctionRatioDb => params.cow_extinction_ratio_db.to_string(),
		}
	}
}

impl SimParams {
	/// Sets one field from form input. Invalid input leaves `self` unchanged.
	pub fn set(&mut self, field: SimField, raw: &str) -> Result<()> {
		let key = field.key();
		match field {
			SimField::NumPulses => self.num_pulses = parse_count(key, raw, 1)?,
			SimField::PulseRepetitionRate => {
				self.pulse_repetition_rate = parse_in(key, raw, Domain::Positive)?
			}
			SimField::PhaseFlipProb => self.phase_flip_prob = parse_in(key, raw, Domain::Probability)?,
			SimField::CowMonitorPulseRatio => {
				self.cow_monitor_pulse_ratio = parse_in(key, raw, Domain::Probability)?
			}
			SimField::CowDetectionThresholdPhotons => {
				self.cow_detection_threshold_photons = parse_count(key, raw, 0)?
			}
			SimField::CowExtinctionRatioDb => {
				self.cow_extinction_ratio_db = parse_in(key, raw, Domain::NonNegative)?
			}
		}
		Ok(())
	}

	pub fn set_protocol(&mut self, raw: &str) -> Result<()> {
		self.protocol = raw.parse().map_err(|_| Error::InvalidChoice {
			field: "protocol",
			input: raw.to_string(),
		})?;
		Ok(())
	}
}

/// Body POSTed to the simulation endpoint: the scalar parameters merged with
/// the projected network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
	#[serde(flatten)]
	pub params: SimParams,
	#[serde(flatten)]
	pub network: NetworkPayload,
}

impl SimulationRequest {
	pub fn new(params: SimParams, network: NetworkPayload) -> Self {
		Self { params, network }
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::components::network_editor::NetworkEditor;

	#[test]
	fn request_merges_scalars_and_network() {
		let mut editor = NetworkEditor::new(Protocol::Cow);
		let (a, b) = (editor.store().nodes()[0].handle, editor.store().nodes()[1].handle);
		editor.connect(a, b);
		let params = SimParams {
			protocol: Protocol::Cow,
			..SimParams::default()
		};

		let value = serde_json::to_value(SimulationRequest::new(params, editor.payload())).unwrap();
		assert_eq!(value["protocol"], json!("cow"));
		assert_eq!(value["num_pulses"], json!(10000));
		assert_eq!(value["cow_extinction_ratio_db"], json!(20.0));
		assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
		assert_eq!(value["channels"][0]["from"], json!(1));
		assert_eq!(value["channels"][0]["bit_flip_error_prob"], json!(0.05));
	}

	#[test]
	fn invalid_input_keeps_previous_value() {
		let mut params = SimParams::default();
		assert!(params.set(SimField::PhaseFlipProb, "0.2").is_ok());
		assert!(params.set(SimField::PhaseFlipProb, "").is_err());
		assert!(params.set(SimField::NumPulses, "0").is_err());
		assert!(params.set_protocol("e91").is_err());
		assert_eq!(params.phase_flip_prob, 0.2);
		assert_eq!(params.num_pulses, 10_000);
		assert_eq!(params.protocol, Protocol::Dps);

		assert!(params.set(SimField::CowDetectionThresholdPhotons, "0").is_ok());
		assert!(params.set_protocol("bb84").is_ok());
		assert_eq!(params.protocol, Protocol::Bb84);
	}

	#[test]
	fn cow_inputs_only_shown_for_cow() {
		assert_eq!(SimField::visible(Protocol::Dps).len(), 3);
		assert!(SimField::visible(Protocol::Cow).contains(&SimField::CowExtinctionRatioDb));
	}
}
