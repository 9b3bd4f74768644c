use wasm_bindgen::prelude::*;

mod game;
use game::BounceDemo;

easel_web::export_game!(BounceDemo, "bounce-demo");
