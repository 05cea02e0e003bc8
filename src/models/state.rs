use serde::{Deserialize, Serialize};

use crate::models::principal::Principal;

/// Lifecycle snapshot of the remote bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotState {
    pub running: bool,
    pub initializing: bool,
    pub initialized: bool,
    pub timer_interval_secs: u64,
    pub quote_token: Option<Principal>,
}

impl BotState {
    pub fn init_label(&self) -> &'static str {
        if self.initializing {
            "in progress"
        } else if self.initialized {
            "true"
        } else {
            "false"
        }
    }
}

/// Quote asset metadata; `decimals` drives balance entry and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteInfo {
    pub symbol: String,
    pub principal: Principal,
    pub decimals: u8,
}
