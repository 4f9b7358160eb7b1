/// Endpoint used when `QKD_API_URL` is not set at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/simulate";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	pub api_url: String,
}

impl AppConfig {
	/// Build-time configuration; a browser bundle has no runtime environment.
	pub fn from_build_env() -> Self {
		Self::from_override(option_env!("QKD_API_URL"))
	}

	fn from_override(api_url: Option<&str>) -> Self {
		let api_url = api_url
			.map(str::trim)
			.filter(|url| !url.is_empty())
			.unwrap_or(DEFAULT_API_URL);
		Self {
			api_url: api_url.to_string(),
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self::from_build_env()
	}
}
