//! Request/response bodies of the bot gateway API.

use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::principal::Principal;

#[derive(Debug, Clone, Serialize)]
pub struct AddPairRequest {
    pub principal: Principal,
    pub symbol: String,
    pub decimals: u8,
    pub spread_value: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartRequest {
    pub timer_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateSettingsRequest {
    pub spread_value: Decimal,
    pub spread_bias: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateBalanceRequest {
    #[serde(with = "crate::models::bigint_str")]
    pub balance: BigInt,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrincipalRequest {
    pub principal: Principal,
}

/// Command acknowledgement. The gateway reports rejections either through a
/// non-2xx status or a 2xx body with `success: false`; the reason lands in
/// `error` or `message` depending on the path that produced it.
#[derive(Debug, Default, Deserialize)]
pub struct Ack {
    pub success: Option<bool>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl Ack {
    pub fn rejection(&self) -> Option<String> {
        if self.success == Some(false) || self.error.is_some() {
            Some(
                self.error
                    .clone()
                    .or_else(|| self.message.clone())
                    .unwrap_or_else(|| "command rejected".to_string()),
            )
        } else {
            None
        }
    }
}
