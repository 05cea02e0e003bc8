use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};
use crate::models::principal::Principal;

/// One leg of a trading pair as the bot reports it. `credits` is the raw
/// amount in the token's smallest unit; render it through
/// [`crate::display::display_with_decimals`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub principal: Principal,
    pub decimals: u8,
    #[serde(with = "crate::models::bigint_str")]
    pub credits: BigInt,
}

/// Spread configuration for a pair: half-width plus a directional bias,
/// both as fractions of the exchange rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadSettings {
    pub value: Decimal,
    pub bias: Decimal,
}

impl SpreadSettings {
    pub fn new(value: Decimal, bias: Decimal) -> Result<Self> {
        let settings = Self { value, bias };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.value <= Decimal::ZERO || self.value > Decimal::ONE {
            return Err(ConsoleError::InvalidArgument(format!(
                "spread value must be in (0, 1], got {}",
                self.value
            )));
        }
        if self.bias < Decimal::NEGATIVE_ONE || self.bias > Decimal::ONE {
            return Err(ConsoleError::InvalidArgument(format!(
                "spread bias must be in [-1, 1], got {}",
                self.bias
            )));
        }
        Ok(())
    }

    /// Rate multipliers the bot will quote with these settings:
    /// `(ask, bid)` = `(1 + bias + value, 1 + bias - value)`. Shown to the
    /// operator before a settings change is committed.
    pub fn price_preview(&self) -> (Decimal, Decimal) {
        let ask = Decimal::ONE + self.bias + self.value;
        let bid = Decimal::ONE + self.bias - self.value;
        (ask, bid)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketPair {
    pub base: TokenInfo,
    pub quote: TokenInfo,
    pub spread: SpreadSettings,
}
