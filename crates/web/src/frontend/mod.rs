//! Leptos frontend, compiled only for `wasm32`.

pub mod app;
pub mod storage;

use wasm_bindgen::prelude::*;

/// WASM entry point, called when the module loads.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    leptos::mount_to_body(app::App);
}
