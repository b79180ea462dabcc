//! Browser score submission
//!
//! Each kill, death and mint is recorded in the transaction log as pending,
//! posted to the leaderboard service in the background, and resolved with
//! the returned link (or marked failed). The simulation never waits on it.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::persistence::LocalStorage;
use crate::platform::player_id;
use crate::services::ScoreSink;
use crate::transactions::{SubmitError, TransactionKind, TransactionLog};

pub const DEFAULT_API_BASE: &str = "https://gameapi.monadassistant.xyz";

/// Stored id, or an unsaved one when LocalStorage is unavailable
fn browser_player_id() -> String {
    match LocalStorage::open() {
        Some(mut storage) => player_id(&mut storage),
        None => Uuid::new_v4().to_string(),
    }
}

fn js_error(e: JsValue) -> SubmitError {
    SubmitError::Network(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// POST a JSON body and return the `url` field of the JSON response
async fn post_json(url: &str, body: &serde_json::Value) -> Result<String, SubmitError> {
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body.to_string()));

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    let window = web_sys::window().ok_or_else(|| SubmitError::Network("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;

    if !response.ok() {
        return Err(SubmitError::Http {
            status: response.status(),
            status_text: response.status_text(),
        });
    }

    let data = JsFuture::from(response.json().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    js_sys::Reflect::get(&data, &JsValue::from_str("url"))
        .ok()
        .and_then(|v| v.as_string())
        .ok_or(SubmitError::MissingLink)
}

fn persist(log: &TransactionLog) {
    if let Some(mut storage) = LocalStorage::open() {
        log.save(&mut storage);
    }
}

/// Score sink backed by the leaderboard service
pub struct RemoteScores {
    log: Rc<RefCell<TransactionLog>>,
    api_base: String,
    player_id: String,
}

impl RemoteScores {
    pub fn new(log: Rc<RefCell<TransactionLog>>, api_base: impl Into<String>) -> Self {
        Self {
            log,
            api_base: api_base.into(),
            player_id: browser_player_id(),
        }
    }

    fn submit(&self, kind: TransactionKind, endpoint: &str, body: serde_json::Value) {
        let id = {
            let mut log = self.log.borrow_mut();
            let id = log.record(kind, js_sys::Date::now());
            persist(&log);
            id
        };

        let url = format!("{}/{}", self.api_base, endpoint);
        let log = self.log.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = post_json(&url, &body).await;
            if let Err(e) = &result {
                log::warn!("{} submission failed: {}", kind, e);
            }
            let mut log = log.borrow_mut();
            log.resolve(id, result, js_sys::Date::now());
            persist(&log);
        });
    }
}

impl ScoreSink for RemoteScores {
    fn record_kill_or_death(&mut self, total_score: u64, is_death: bool) {
        let kind = if is_death {
            TransactionKind::Death(total_score)
        } else {
            TransactionKind::Kill(total_score)
        };
        let body = json!({
            "id": self.player_id,
            "score": total_score.to_string(),
            "isDead": is_death,
        });
        self.submit(kind, "set_score", body);
    }

    fn record_mint(&mut self, kill_count: u32) {
        let body = json!({ "id": self.player_id });
        self.submit(TransactionKind::Mint(kill_count), "mint", body);
    }
}
