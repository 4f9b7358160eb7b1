use leptos::prelude::*;
use qkd_network_canvas::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
