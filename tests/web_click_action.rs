#![cfg(target_arch = "wasm32")]

use uf_dom::{ClickActionHelper, Registry};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlDialogElement};

mod web_fixture_;
use web_fixture_::{by_id, click, init_log, is_hidden, mount};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn visibility_and_removal() {
	init_log();
	let root = mount(
		r##"<div class="ca-panel" id="ca-panel">Panel</div>
		<button id="ca-hide" data-uf-click-action="hide" data-uf-click-target=".ca-panel">Hide</button>
		<button id="ca-show" data-uf-click-action="show" data-uf-click-target=".ca-panel">Show</button>
		<button id="ca-toggle" data-uf-click-action="toggle" data-uf-click-target="#ca-panel">Toggle</button>
		<button id="ca-remove" data-uf-click-action="remove">Remove me</button>
		<button id="ca-unknown" data-uf-click-action="explode">?</button>
		<button id="ca-missing" data-uf-click-action="hide" data-uf-click-target="#ca-nowhere">Nothing</button>"##,
	);
	let helper = ClickActionHelper::new(Registry::new(), root.clone());
	helper.scan();
	assert_eq!(helper.action_count(), 5);

	let panel = by_id("ca-panel");
	click(&by_id("ca-hide"));
	assert!(is_hidden(&panel));
	click(&by_id("ca-show"));
	assert!(!is_hidden(&panel));
	click(&by_id("ca-toggle"));
	assert!(is_hidden(&panel));
	click(&by_id("ca-toggle"));
	assert!(!is_hidden(&panel));

	// Logged, no effect.
	click(&by_id("ca-missing"));

	click(&by_id("ca-remove"));
	assert!(window().unwrap().document().unwrap().get_element_by_id("ca-remove").is_none());

	helper.destroy();
	root.remove();
}

#[wasm_bindgen_test]
fn dialogs() {
	init_log();
	let root = mount(
		r##"<button id="ca-open" data-uf-click-action="open-dialog" data-uf-click-target="#ca-dialog">Open</button>
		<dialog id="ca-dialog">
			<button id="ca-close" data-uf-click-action="close-dialog">Close</button>
		</dialog>"##,
	);
	let helper = ClickActionHelper::new(Registry::new(), root.clone());
	helper.scan();

	let dialog: HtmlDialogElement = by_id("ca-dialog").dyn_into().unwrap();
	assert!(!dialog.open());
	click(&by_id("ca-open"));
	assert!(dialog.open());
	click(&by_id("ca-close"));
	assert!(!dialog.open());

	helper.destroy();
	root.remove();
}
