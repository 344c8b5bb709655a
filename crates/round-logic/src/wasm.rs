//! WASM bindings for a JS front end

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::{encode_choice as encode, generate_codename as codename};
use crate::{Choice, Game, GameError, Notification, Outcome, SeededRng, ViewState};

fn parse_choice(name: &str) -> Result<Choice, JsError> {
    name.parse()
        .map_err(|e: GameError| JsError::new(&e.to_string()))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// A game session plus the view state it drives.
///
/// Every mutating method returns the notifications it produced as a JS array;
/// `view()` returns the folded screen state.
#[wasm_bindgen]
pub struct WasmGame {
    game: Game,
    view: ViewState,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new(codename: &str) -> WasmGame {
        WasmGame {
            game: Game::new(),
            view: ViewState::new(codename),
        }
    }

    pub fn begin_pairing(&mut self) -> Result<JsValue, JsError> {
        let result = self.game.begin_pairing();
        self.apply(result)
    }

    pub fn on_connected(&mut self, opponent: &str) -> Result<JsValue, JsError> {
        let result = self.game.on_connected(opponent);
        self.apply(result)
    }

    pub fn on_disconnected(&mut self) -> Result<JsValue, JsError> {
        let notifications = self.game.on_disconnected();
        self.apply(Ok(notifications))
    }

    /// `choice` is `"ROCK"`, `"PAPER"` or `"SCISSORS"`
    pub fn submit_local_choice(&mut self, choice: &str) -> Result<JsValue, JsError> {
        let choice = parse_choice(choice)?;
        let result = self.game.submit_local_choice(choice);
        self.apply(result)
    }

    pub fn on_choice_bytes_received(&mut self, payload: &[u8]) -> Result<JsValue, JsError> {
        let result = self.game.on_choice_bytes_received(payload);
        self.apply(result)
    }

    pub fn view(&self) -> Result<JsValue, JsError> {
        to_js(&self.view)
    }

    pub fn score(&self) -> String {
        self.game.session().score_text()
    }
}

impl WasmGame {
    fn apply(
        &mut self,
        result: Result<Vec<Notification>, GameError>,
    ) -> Result<JsValue, JsError> {
        let notifications = result.map_err(|e| JsError::new(&e.to_string()))?;
        self.view.apply_all(&notifications);
        to_js(&notifications)
    }
}

/// Generate a codename from a 32-byte seed
#[wasm_bindgen]
pub fn generate_codename(seed: &[u8]) -> Result<String, JsError> {
    let seed_arr: [u8; 32] = seed
        .try_into()
        .map_err(|_| JsError::new("Seed must be exactly 32 bytes"))?;
    Ok(codename(&mut SeededRng::new(&seed_arr)))
}

/// Status line for a round, e.g. `"ROCK beats SCISSORS"`
#[wasm_bindgen]
pub fn describe_round(local: &str, remote: &str) -> Result<String, JsError> {
    let local = parse_choice(local)?;
    let remote = parse_choice(remote)?;
    Ok(Outcome::of(local, remote).describe(local, remote))
}

/// Payload bytes for a choice name
#[wasm_bindgen]
pub fn encode_choice(choice: &str) -> Result<js_sys::Uint8Array, JsError> {
    let bytes = encode(parse_choice(choice)?);
    Ok(js_sys::Uint8Array::from(bytes.as_slice()))
}
