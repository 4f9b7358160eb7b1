use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default for the cow-only channel field, used when it was never set.
pub const DEFAULT_BIT_FLIP_ERROR_PROB: f64 = 0.05;

macro_rules! handle {
	($name:ident) => {
		/// Opaque, stable identity of a graph entity. Never shown to the simulation API.
		#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
		pub struct $name(Uuid);

		impl $name {
			/// Fresh random handle.
			pub fn new() -> Self {
				Self(Uuid::new_v4())
			}
		}

		impl Default for $name {
			fn default() -> Self {
				Self::new()
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				let simple = self.0.simple().to_string();
				f.write_str(&simple[..8])
			}
		}
	};
}

handle!(NodeHandle);
handle!(EdgeHandle);

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Protocol chosen in the parameter form. Read-only from the editor's side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
	/// Differential phase shift.
	#[default]
	Dps,
	/// Coherent one-way. The only protocol with a bit-flip channel field.
	Cow,
	/// BB84.
	Bb84,
}

impl Protocol {
	/// Every protocol, in form order.
	pub const ALL: [Protocol; 3] = [Protocol::Dps, Protocol::Cow, Protocol::Bb84];

	/// Wire name.
	pub fn as_str(self) -> &'static str {
		match self {
			Protocol::Dps => "dps",
			Protocol::Cow => "cow",
			Protocol::Bb84 => "bb84",
		}
	}

	/// Display name.
	pub fn label(self) -> &'static str {
		match self {
			Protocol::Dps => "DPS-QKD",
			Protocol::Cow => "COW-QKD",
			Protocol::Bb84 => "BB84-QKD",
		}
	}
}

impl fmt::Display for Protocol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Protocol {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"dps" => Ok(Protocol::Dps),
			"cow" => Ok(Protocol::Cow),
			"bb84" => Ok(Protocol::Bb84),
			other => Err(format!("unknown protocol: {other}")),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiberType {
	#[default]
	StandardSingleMode,
	DispersionShifted,
	NonZeroDispersionShifted,
	PhotonicCrystal,
}

impl FiberType {
	pub const ALL: [FiberType; 4] = [
		FiberType::StandardSingleMode,
		FiberType::DispersionShifted,
		FiberType::NonZeroDispersionShifted,
		FiberType::PhotonicCrystal,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			FiberType::StandardSingleMode => "standard_single_mode",
			FiberType::DispersionShifted => "dispersion_shifted",
			FiberType::NonZeroDispersionShifted => "non_zero_dispersion_shifted",
			FiberType::PhotonicCrystal => "photonic_crystal",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			FiberType::StandardSingleMode => "SMF-28",
			FiberType::DispersionShifted => "Dispersion Shifted",
			FiberType::NonZeroDispersionShifted => "Non-Zero Dispersion Shifted",
			FiberType::PhotonicCrystal => "Photonic Crystal Fiber",
		}
	}
}

impl FromStr for FiberType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		FiberType::ALL
			.into_iter()
			.find(|t| t.as_str() == s)
			.ok_or_else(|| format!("unknown fiber type: {s}"))
	}
}

/// Detector and source parameters of a party.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeParams {
	pub detector_efficiency: f64,
	pub dark_count_rate: f64,
	pub mu: f64,
	pub num_pulses: u64,
	pub pulse_repetition_rate: f64,
}

impl Default for NodeParams {
	fn default() -> Self {
		Self {
			detector_efficiency: 0.9,
			dark_count_rate: 1e-8,
			mu: 0.2,
			num_pulses: 10_000,
			pulse_repetition_rate: 1.0,
		}
	}
}

/// Transmission parameters shared by every protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiberParams {
	pub fiber_length_km: f64,
	pub fiber_attenuation_db_per_km: f64,
	pub wavelength_nm: f64,
	pub fiber_type: FiberType,
	pub phase_flip_prob: f64,
}

impl Default for FiberParams {
	fn default() -> Self {
		Self {
			fiber_length_km: 10.0,
			fiber_attenuation_db_per_km: 0.2,
			wavelength_nm: 1550.0,
			fiber_type: FiberType::StandardSingleMode,
			phase_flip_prob: 0.05,
		}
	}
}

/// Channel parameters. The `Cow` variant carries the field that only exists
/// for the coherent-one-way protocol; switching protocol does not convert it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChannelParams {
	Standard(FiberParams),
	Cow {
		fiber: FiberParams,
		bit_flip_error_prob: f64,
	},
}

impl ChannelParams {
	/// Field set a freshly connected channel gets under `protocol`.
	pub fn defaults_for(protocol: Protocol) -> Self {
		match protocol {
			Protocol::Cow => ChannelParams::Cow {
				fiber: FiberParams::default(),
				bit_flip_error_prob: DEFAULT_BIT_FLIP_ERROR_PROB,
			},
			Protocol::Dps | Protocol::Bb84 => ChannelParams::Standard(FiberParams::default()),
		}
	}

	pub fn fiber(&self) -> &FiberParams {
		match self {
			ChannelParams::Standard(fiber) | ChannelParams::Cow { fiber, .. } => fiber,
		}
	}

	pub fn fiber_mut(&mut self) -> &mut FiberParams {
		match self {
			ChannelParams::Standard(fiber) | ChannelParams::Cow { fiber, .. } => fiber,
		}
	}

	/// The stored bit-flip probability, if this channel ever had one.
	pub fn stored_bit_flip_error_prob(&self) -> Option<f64> {
		match self {
			ChannelParams::Standard(_) => None,
			ChannelParams::Cow {
				bit_flip_error_prob,
				..
			} => Some(*bit_flip_error_prob),
		}
	}

	/// Value of the cow-only field as `protocol` sees it; `None` outside cow.
	pub fn bit_flip_error_prob_for(&self, protocol: Protocol) -> Option<f64> {
		match (protocol, self) {
			(Protocol::Cow, ChannelParams::Cow {
				bit_flip_error_prob,
				..
			}) => Some(*bit_flip_error_prob),
			(Protocol::Cow, ChannelParams::Standard(_)) => Some(DEFAULT_BIT_FLIP_ERROR_PROB),
			(Protocol::Dps | Protocol::Bb84, _) => None,
		}
	}

	/// Returns these parameters with the cow-only field set, keeping the fiber fields.
	pub fn with_bit_flip_error_prob(self, value: f64) -> Self {
		let fiber = match self {
			ChannelParams::Standard(fiber) | ChannelParams::Cow { fiber, .. } => fiber,
		};
		ChannelParams::Cow {
			fiber,
			bit_flip_error_prob: value,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub handle: NodeHandle,
	pub position: Position,
	pub params: NodeParams,
}

/// Directed fiber link between two live nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub handle: EdgeHandle,
	pub source: NodeHandle,
	pub target: NodeHandle,
	pub params: ChannelParams,
}

impl Edge {
	pub fn touches(&self, node: NodeHandle) -> bool {
		self.source == node || self.target == node
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cow_defaults_carry_bit_flip() {
		let params = ChannelParams::defaults_for(Protocol::Cow);
		assert_eq!(params.stored_bit_flip_error_prob(), Some(0.05));
		assert_eq!(
			ChannelParams::defaults_for(Protocol::Bb84).stored_bit_flip_error_prob(),
			None
		);
	}

	#[test]
	fn bit_flip_visibility_follows_protocol() {
		let standard = ChannelParams::defaults_for(Protocol::Dps);
		assert_eq!(standard.bit_flip_error_prob_for(Protocol::Cow), Some(0.05));
		assert_eq!(standard.bit_flip_error_prob_for(Protocol::Dps), None);

		let cow = standard.with_bit_flip_error_prob(0.2);
		assert_eq!(cow.bit_flip_error_prob_for(Protocol::Cow), Some(0.2));
		assert_eq!(cow.bit_flip_error_prob_for(Protocol::Bb84), None);
		assert_eq!(cow.stored_bit_flip_error_prob(), Some(0.2));
	}

	#[test]
	fn enum_wire_names() {
		assert_eq!(
			serde_json::to_value(FiberType::NonZeroDispersionShifted).unwrap(),
			serde_json::json!("non_zero_dispersion_shifted")
		);
		assert_eq!(serde_json::to_value(Protocol::Bb84).unwrap(), serde_json::json!("bb84"));
		assert_eq!("cow".parse::<Protocol>(), Ok(Protocol::Cow));
		assert!("qkd".parse::<Protocol>().is_err());
		assert_eq!("photonic_crystal".parse::<FiberType>(), Ok(FiberType::PhotonicCrystal));
	}

	#[test]
	fn handles_are_unique_and_short_when_displayed() {
		let (a, b) = (NodeHandle::new(), NodeHandle::new());
		assert_ne!(a, b);
		assert_eq!(a.to_string().len(), 8);
	}
}
