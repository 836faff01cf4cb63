#![allow(unused_crate_dependencies)]

use ona_microsims::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
