use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One side of a quoting round: raw volume in the token's smallest unit
/// plus the limit price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlacement {
    #[serde(with = "crate::models::bigint_str")]
    pub amount: BigInt,
    pub price: Decimal,
}

/// Outcome of one market-making round for one pair, as reported by the bot.
///
/// A round either placed both quotes (`message == "OK"`) or aborted with a
/// reason; aborted rounds carry no orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    pub base_symbol: String,
    pub quote_symbol: String,
    pub spread_value: Decimal,
    pub message: String,
    pub bid: Option<OrderPlacement>,
    pub ask: Option<OrderPlacement>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryItem {
    pub fn is_ok(&self) -> bool {
        self.message == "OK"
    }
}
