#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod app;
mod assets;
mod input;
mod render;
mod storage;
mod ui;
mod victory;

fn main() {
    app::run();
}
