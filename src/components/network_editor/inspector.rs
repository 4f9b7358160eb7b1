//! Field model behind the sidebar inspector.
//!
//! Each editable field knows its wire name, label and input step, how to read
//! its current value for display, and how to turn raw input text into a new,
//! fully typed parameter object. Input that cannot be used is rejected with an
//! [`Error`] so the caller keeps the previous value; the cow-only bit-flip
//! field instead falls back to its default when the input is empty or not a
//! number.

use crate::error::{Error, Result};
use crate::numeric::{Domain, parse_count, parse_finite, parse_in};

use super::types::{
	ChannelParams, DEFAULT_BIT_FLIP_ERROR_PROB, FiberType, NodeParams, Protocol,
};

/// Editable parameter of a party.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeField {
	/// Probability in `[0, 1]`.
	DetectorEfficiency,
	/// Non-negative rate.
	DarkCountRate,
	/// Mean photon number, non-negative.
	Mu,
	/// Positive whole number.
	NumPulses,
	/// Positive, in nanoseconds.
	PulseRepetitionRate,
}

impl NodeField {
	/// Every field, in sidebar order.
	pub const ALL: [NodeField; 5] = [
		NodeField::DetectorEfficiency,
		NodeField::DarkCountRate,
		NodeField::Mu,
		NodeField::NumPulses,
		NodeField::PulseRepetitionRate,
	];

	/// Wire name of the field.
	pub fn key(self) -> &'static str {
		match self {
			NodeField::DetectorEfficiency => "detector_efficiency",
			NodeField::DarkCountRate => "dark_count_rate",
			NodeField::Mu => "mu",
			NodeField::NumPulses => "num_pulses",
			NodeField::PulseRepetitionRate => "pulse_repetition_rate",
		}
	}

	/// Sidebar label.
	pub fn label(self) -> &'static str {
		match self {
			NodeField::DetectorEfficiency => "Detector Efficiency",
			NodeField::DarkCountRate => "Dark Count Rate",
			NodeField::Mu => "Mu",
			NodeField::NumPulses => "Pulses",
			NodeField::PulseRepetitionRate => "Pulse Repetition Rate (ns)",
		}
	}

	/// `step` attribute of the number input.
	pub fn step(self) -> &'static str {
		match self {
			NodeField::DetectorEfficiency | NodeField::Mu => "0.01",
			NodeField::NumPulses => "1",
			NodeField::DarkCountRate | NodeField::PulseRepetitionRate => "any",
		}
	}

	/// Current value as shown in the input.
	pub fn value(self, params: &NodeParams) -> String {
		match self {
			NodeField::DetectorEfficiency => params.detector_efficiency.to_string(),
			NodeField::DarkCountRate => params.dark_count_rate.to_string(),
			NodeField::Mu => params.mu.to_string(),
			NodeField::NumPulses => params.num_pulses.to_string(),
			NodeField::PulseRepetitionRate => params.pulse_repetition_rate.to_string(),
		}
	}

	/// Returns `params` with this field replaced by the parsed `raw` input.
	pub fn apply(self, params: &NodeParams, raw: &str) -> Result<NodeParams> {
		let field = self.key();
		let mut next = params.clone();
		match self {
			NodeField::DetectorEfficiency => {
				next.detector_efficiency = parse_in(field, raw, Domain::Probability)?
			}
			NodeField::DarkCountRate => next.dark_count_rate = parse_in(field, raw, Domain::NonNegative)?,
			NodeField::Mu => next.mu = parse_in(field, raw, Domain::NonNegative)?,
			NodeField::NumPulses => next.num_pulses = parse_count(field, raw, 1)?,
			NodeField::PulseRepetitionRate => {
				next.pulse_repetition_rate = parse_in(field, raw, Domain::Positive)?
			}
		}
		Ok(next)
	}
}

/// Editable parameter of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelField {
	/// Non-negative length in km.
	FiberLengthKm,
	/// Non-negative attenuation in dB/km.
	FiberAttenuationDbPerKm,
	/// Positive wavelength in nm.
	WavelengthNm,
	/// One of the [`FiberType`] wire names.
	FiberType,
	/// Probability in `[0, 1]`.
	PhaseFlipProb,
	/// Probability in `[0, 1]`; cow only.
	BitFlipErrorProb,
}

impl ChannelField {
	const COMMON: [ChannelField; 5] = [
		ChannelField::FiberLengthKm,
		ChannelField::FiberAttenuationDbPerKm,
		ChannelField::WavelengthNm,
		ChannelField::FiberType,
		ChannelField::PhaseFlipProb,
	];

	/// Fields the inspector shows for a channel under `protocol`.
	pub fn visible(protocol: Protocol) -> Vec<ChannelField> {
		let mut fields = Self::COMMON.to_vec();
		if protocol == Protocol::Cow {
			fields.push(ChannelField::BitFlipErrorProb);
		}
		fields
	}

	/// Wire name of the field.
	pub fn key(self) -> &'static str {
		match self {
			ChannelField::FiberLengthKm => "fiber_length_km",
			ChannelField::FiberAttenuationDbPerKm => "fiber_attenuation_db_per_km",
			ChannelField::WavelengthNm => "wavelength_nm",
			ChannelField::FiberType => "fiber_type",
			ChannelField::PhaseFlipProb => "phase_flip_prob",
			ChannelField::BitFlipErrorProb => "bit_flip_error_prob",
		}
	}

	/// Sidebar label.
	pub fn label(self) -> &'static str {
		match self {
			ChannelField::FiberLengthKm => "Fiber Length (km)",
			ChannelField::FiberAttenuationDbPerKm => "Attenuation (dB/km)",
			ChannelField::WavelengthNm => "Wavelength (nm)",
			ChannelField::FiberType => "Fiber Type",
			ChannelField::PhaseFlipProb => "Phase Flip Probability (0-1)",
			ChannelField::BitFlipErrorProb => "Bit Flip Error Probability (0-1)",
		}
	}

	/// `step` attribute of the number input; empty for the fiber type choice.
	pub fn step(self) -> &'static str {
		match self {
			ChannelField::FiberLengthKm => "0.1",
			ChannelField::FiberAttenuationDbPerKm | ChannelField::BitFlipErrorProb => "0.01",
			ChannelField::WavelengthNm => "1",
			ChannelField::PhaseFlipProb => "0.001",
			ChannelField::FiberType => "",
		}
	}

	/// The fiber type is a choice; everything else is a number input.
	pub fn is_numeric(self) -> bool {
		self != ChannelField::FiberType
	}

	/// Current value as shown in the input. Empty for a field `protocol` hides.
	pub fn value(self, params: &ChannelParams, protocol: Protocol) -> String {
		let fiber = params.fiber();
		match self {
			ChannelField::FiberLengthKm => fiber.fiber_length_km.to_string(),
			ChannelField::FiberAttenuationDbPerKm => fiber.fiber_attenuation_db_per_km.to_string(),
			ChannelField::WavelengthNm => fiber.wavelength_nm.to_string(),
			ChannelField::FiberType => fiber.fiber_type.as_str().to_string(),
			ChannelField::PhaseFlipProb => fiber.phase_flip_prob.to_string(),
			ChannelField::BitFlipErrorProb => params
				.bit_flip_error_prob_for(protocol)
				.map(|v| v.to_string())
				.unwrap_or_default(),
		}
	}

	/// Returns `params` with this field replaced by the parsed `raw` input.
	pub fn apply(self, params: &ChannelParams, raw: &str, protocol: Protocol) -> Result<ChannelParams> {
		let field = self.key();
		let mut next = params.clone();
		let fiber = next.fiber_mut();
		match self {
			ChannelField::FiberLengthKm => fiber.fiber_length_km = parse_in(field, raw, Domain::NonNegative)?,
			ChannelField::FiberAttenuationDbPerKm => {
				fiber.fiber_attenuation_db_per_km = parse_in(field, raw, Domain::NonNegative)?
			}
			ChannelField::WavelengthNm => fiber.wavelength_nm = parse_in(field, raw, Domain::Positive)?,
			ChannelField::FiberType => {
				fiber.fiber_type = raw.parse::<FiberType>().map_err(|_| Error::InvalidChoice {
					field,
					input: raw.to_string(),
				})?
			}
			ChannelField::PhaseFlipProb => fiber.phase_flip_prob = parse_in(field, raw, Domain::Probability)?,
			ChannelField::BitFlipErrorProb => {
				if protocol != Protocol::Cow {
					return Err(Error::FieldUnavailable { field, protocol });
				}
				let value = match parse_finite(raw) {
					Some(value) if Domain::Probability.admits(value) => value,
					Some(value) => return Err(Error::OutOfRange { field, value }),
					None => DEFAULT_BIT_FLIP_ERROR_PROB,
				};
				return Ok(next.with_bit_flip_error_prob(value));
			}
		}
		Ok(next)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_edit_replaces_one_field() {
		let params = NodeParams::default();
		let next = NodeField::Mu.apply(&params, "0.35").unwrap();
		assert_eq!(next.mu, 0.35);
		assert_eq!(next.detector_efficiency, params.detector_efficiency);
		assert_eq!(NodeField::DarkCountRate.apply(&params, " 1e-6 ").unwrap().dark_count_rate, 1e-6);
	}

	#[test]
	fn invalid_node_input_is_rejected() {
		let params = NodeParams::default();
		assert!(matches!(
			NodeField::Mu.apply(&params, ""),
			Err(Error::InvalidNumber { field: "mu", .. })
		));
		assert!(matches!(
			NodeField::DetectorEfficiency.apply(&params, "1.5"),
			Err(Error::OutOfRange { .. })
		));
		assert!(NodeField::PulseRepetitionRate.apply(&params, "0").is_err());
		assert!(NodeField::Mu.apply(&params, "NaN").is_err());
		assert!(NodeField::DarkCountRate.apply(&params, "inf").is_err());
	}

	#[test]
	fn pulses_must_be_a_positive_integer() {
		let params = NodeParams::default();
		assert_eq!(NodeField::NumPulses.apply(&params, "2500").unwrap().num_pulses, 2500);
		assert_eq!(NodeField::NumPulses.apply(&params, "1e4").unwrap().num_pulses, 10_000);
		assert!(NodeField::NumPulses.apply(&params, "12.5").is_err());
		assert!(NodeField::NumPulses.apply(&params, "0").is_err());
		assert!(NodeField::NumPulses.apply(&params, "-3").is_err());
	}

	#[test]
	fn bit_flip_field_only_under_cow() {
		assert!(!ChannelField::visible(Protocol::Dps).contains(&ChannelField::BitFlipErrorProb));
		assert!(!ChannelField::visible(Protocol::Bb84).contains(&ChannelField::BitFlipErrorProb));
		assert_eq!(ChannelField::visible(Protocol::Cow).last(), Some(&ChannelField::BitFlipErrorProb));

		let params = ChannelParams::defaults_for(Protocol::Dps);
		assert!(matches!(
			ChannelField::BitFlipErrorProb.apply(&params, "0.1", Protocol::Dps),
			Err(Error::FieldUnavailable { .. })
		));
	}

	#[test]
	fn empty_bit_flip_input_falls_back_to_default() {
		let params = ChannelParams::defaults_for(Protocol::Cow).with_bit_flip_error_prob(0.3);
		let next = ChannelField::BitFlipErrorProb.apply(&params, "", Protocol::Cow).unwrap();
		assert_eq!(next.stored_bit_flip_error_prob(), Some(0.05));
		let next = ChannelField::BitFlipErrorProb.apply(&params, "abc", Protocol::Cow).unwrap();
		assert_eq!(next.stored_bit_flip_error_prob(), Some(0.05));
		assert!(ChannelField::BitFlipErrorProb.apply(&params, "1.2", Protocol::Cow).is_err());
	}

	#[test]
	fn editing_bit_flip_upgrades_a_standard_channel() {
		let params = ChannelParams::defaults_for(Protocol::Dps);
		assert_eq!(ChannelField::BitFlipErrorProb.value(&params, Protocol::Cow), "0.05");
		let next = ChannelField::BitFlipErrorProb.apply(&params, "0.2", Protocol::Cow).unwrap();
		assert_eq!(next.stored_bit_flip_error_prob(), Some(0.2));
		assert_eq!(next.fiber(), params.fiber());
	}

	#[test]
	fn fiber_edits_keep_the_variant() {
		let params = ChannelParams::defaults_for(Protocol::Cow).with_bit_flip_error_prob(0.2);
		let next = ChannelField::FiberType.apply(&params, "dispersion_shifted", Protocol::Dps).unwrap();
		assert_eq!(next.fiber().fiber_type, FiberType::DispersionShifted);
		assert_eq!(next.stored_bit_flip_error_prob(), Some(0.2));
		assert!(matches!(
			ChannelField::FiberType.apply(&params, "copper", Protocol::Dps),
			Err(Error::InvalidChoice { .. })
		));
		assert!(ChannelField::WavelengthNm.apply(&params, "0", Protocol::Dps).is_err());
		assert_eq!(
			ChannelField::FiberLengthKm.apply(&params, "0", Protocol::Dps).unwrap().fiber().fiber_length_km,
			0.0
		);
	}
}
