use thiserror::Error;

use crate::components::network_editor::Protocol;

/// Result type used throughout the app.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by input handling and by the simulation request.
#[derive(Error, Debug)]
pub enum Error {
	/// Input text is empty, not a number, or not finite.
	#[error("{field}: {input:?} is not a valid number")]
	InvalidNumber {
		/// Wire name of the field being edited.
		field: &'static str,
		/// The rejected text.
		input: String,
	},

	/// Input text is not one of the field's choices.
	#[error("{field}: {input:?} is not one of the allowed values")]
	InvalidChoice {
		/// Wire name of the field being edited.
		field: &'static str,
		/// The rejected text.
		input: String,
	},

	/// A number outside the field's domain.
	#[error("{field}: {value} is out of range")]
	OutOfRange {
		/// Wire name of the field being edited.
		field: &'static str,
		/// The rejected value.
		value: f64,
	},

	/// The field does not exist under the current protocol.
	#[error("{field} is not available for protocol {protocol}")]
	FieldUnavailable {
		/// Wire name of the field being edited.
		field: &'static str,
		/// Protocol in effect.
		protocol: Protocol,
	},

	/// Request encoding or response decoding failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// The request could not be sent or its body not read.
	#[error("Request failed: {0}")]
	Transport(String),

	/// The API answered with a non-success status.
	#[error("Simulation API returned HTTP {status}")]
	Http {
		/// HTTP status code.
		status: u16,
	},
}
