#![cfg(target_arch = "wasm32")]

use uf_dom::{sort::persist::SortInfo, Error, GridSortHelper, Registry};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Storage};

mod web_fixture_;
use web_fixture_::{by_id, click, init_log, mount};

wasm_bindgen_test_configure!(run_in_browser);

const STORAGE_KEY: &str = "uf-dom-test-grid";

const GRID: &str = r#"<div id="gs-grid" data-uf-grid-sort="uf-dom-test-grid">
	<button id="gs-by-name" data-uf-sort-control="name">Name</button>
	<span id="gs-by-price" data-uf-sort-control="price" data-uf-sort-type="number"><button id="gs-by-price-button" data-uf-sort-button>Price</button></span>
	<ul id="gs-list">
		<li id="teapot" data-uf-sort-item><span data-uf-sort-key="name">Teapot</span> <span data-uf-sort-key="price">12</span></li>
		<li id="cup" data-uf-sort-item data-uf-sort-group="cups"><span data-uf-sort-key="name">Cup</span></li>
		<li id="cup-price" data-uf-sort-item data-uf-sort-group="cups"><span data-uf-sort-key="price">4</span></li>
		<li id="bowl" data-uf-sort-item data-uf-sort-key="name" data-uf-sort-value="Bowl">A bowl</li>
		<li id="more" data-uf-sort-anchor>More…</li>
	</ul>
</div>"#;

fn order() -> Vec<String> {
	let items = by_id("gs-list").children();
	(0..items.length()).filter_map(|i| items.item(i)).map(|item| item.id()).collect()
}

fn storage() -> Storage {
	window().unwrap().local_storage().unwrap().unwrap()
}

#[wasm_bindgen_test]
fn groups_move_together() {
	init_log();
	storage().remove_item(STORAGE_KEY).unwrap();
	let root = mount(GRID);
	let helper = GridSortHelper::new(Registry::new(), root.clone());
	helper.scan();

	let grid = by_id("gs-grid");
	assert_eq!(
		helper.active(&grid),
		Some(SortInfo {
			key: "name".to_owned(),
			descending: false
		})
	);
	assert_eq!(order(), ["bowl", "cup", "cup-price", "teapot", "more"]);

	// The nested button receives the clicks.
	click(&by_id("gs-by-price"));
	assert_eq!(helper.active(&grid).map(|info| info.key), Some("name".to_owned()));
	click(&by_id("gs-by-price-button"));
	assert_eq!(order(), ["cup", "cup-price", "teapot", "bowl", "more"]);
	assert_eq!(by_id("gs-by-price").get_attribute("data-uf-sort-state").as_deref(), Some("ascending"));
	assert_eq!(by_id("gs-by-name").get_attribute("data-uf-sort-state"), None);

	click(&by_id("gs-by-price-button"));
	assert_eq!(order(), ["teapot", "cup", "cup-price", "bowl", "more"]);

	helper.destroy();
	root.remove();
}

#[wasm_bindgen_test]
fn stored_preference_is_restored() {
	init_log();
	storage().set_item(STORAGE_KEY, r#"{"key":"price","descending":true}"#).unwrap();
	let root = mount(GRID);
	let helper = GridSortHelper::new(Registry::new(), root.clone());
	helper.scan();

	assert_eq!(order(), ["teapot", "cup", "cup-price", "bowl", "more"]);

	helper.destroy();
	root.remove();
	storage().remove_item(STORAGE_KEY).unwrap();
}

#[wasm_bindgen_test]
fn stale_or_malformed_preference_falls_back() {
	init_log();
	for stored in [r#"{"key":"weight","descending":true}"#, "not json"] {
		storage().set_item(STORAGE_KEY, stored).unwrap();
		let root = mount(GRID);
		let helper = GridSortHelper::new(Registry::new(), root.clone());
		helper.scan();

		assert_eq!(order(), ["bowl", "cup", "cup-price", "teapot", "more"]);

		helper.destroy();
		root.remove();
	}
	storage().remove_item(STORAGE_KEY).unwrap();
}

#[wasm_bindgen_test]
fn programmatic_sort() {
	init_log();
	storage().remove_item(STORAGE_KEY).unwrap();
	let root = mount(GRID);
	let helper = GridSortHelper::new(Registry::new(), root.clone());
	helper.scan();
	let grid = by_id("gs-grid");

	helper.sort(&grid, "name", true).unwrap();
	assert_eq!(order(), ["teapot", "cup", "cup-price", "bowl", "more"]);
	assert!(matches!(helper.sort(&grid, "weight", false), Err(Error::UnknownSortKey { key }) if key == "weight"));
	assert!(matches!(helper.sort(&root, "name", false), Err(Error::NotScanned)));
	assert!(storage().get_item(STORAGE_KEY).unwrap().is_none());

	helper.destroy();
	root.remove();
}

const SPLIT_GRID: &str = r#"<div id="gp-grid" data-uf-grid-sort>
	<button id="gp-by-name" data-uf-sort-control="name">Name</button>
	<ul id="gp-left">
		<li id="l-c" data-uf-sort-item data-uf-sort-key="name">c</li>
		<li id="l-pair" data-uf-sort-item data-uf-sort-group="pair">(no name)</li>
		<li id="l-static">Not an item</li>
		<li id="l-a" data-uf-sort-item data-uf-sort-key="name">a</li>
		<li id="l-anchor" data-uf-sort-anchor>Anchor</li>
		<li id="l-tail">Tail</li>
	</ul>
	<ul id="gp-right">
		<li id="r-b" data-uf-sort-item data-uf-sort-group="pair" data-uf-sort-key="name">b</li>
		<li id="r-d" data-uf-sort-item data-uf-sort-key="name">d</li>
	</ul>
</div>"#;

fn ids(list: &str) -> Vec<String> {
	let items = by_id(list).children();
	(0..items.length()).filter_map(|i| items.item(i)).map(|item| item.id()).collect()
}

#[wasm_bindgen_test]
fn items_are_reinserted_per_parent() {
	init_log();
	let root = mount(SPLIT_GRID);
	let helper = GridSortHelper::new(Registry::new(), root.clone());
	helper.scan();

	// Ascending: a, pair (named by its member on the right), c, d.
	// Items move before the left anchor. The right list has no anchor, so its items are appended.
	let ascending_left = ["l-static", "l-a", "l-pair", "l-c", "l-anchor", "l-tail"];
	let ascending_right = ["r-b", "r-d"];
	assert_eq!(ids("gp-left"), ascending_left);
	assert_eq!(ids("gp-right"), ascending_right);

	click(&by_id("gp-by-name"));
	assert_eq!(ids("gp-left"), ["l-static", "l-c", "l-pair", "l-a", "l-anchor", "l-tail"]);
	assert_eq!(ids("gp-right"), ["r-d", "r-b"]);

	click(&by_id("gp-by-name"));
	assert_eq!(ids("gp-left"), ascending_left);
	assert_eq!(ids("gp-right"), ascending_right);

	helper.destroy();
	root.remove();
}
