//! Operator command grammar: one command per input line.

use rust_decimal::Decimal;

use crate::console::cache::QueryKey;
use crate::error::{ConsoleError, Result};
use crate::models::pair::SpreadSettings;
use crate::models::principal::Principal;

pub const HELP: &str = "\
Views:
  pairs                                     list trading pairs
  history [n]                               recent market-making rounds
  state                                     bot lifecycle state
  quote                                     quote asset info
  admins                                    list bot admins
  stats                                     call latency and cache freshness
Commands:
  start [secs]                              start the bot timer
  stop                                      stop the bot timer
  run                                       trigger one round now
  add-pair <principal> <symbol> <dec> <spread>
  rm-pair <index>
  set-spread <symbol> <value> [bias]
  set-balance <symbol> <amount>             amount in whole quote tokens
  set-quote <principal>                     set the quote asset
  add-admin <principal>
  rm-admin <principal>
  refresh                                   refetch every view
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ShowPairs,
    ShowHistory { limit: Option<usize> },
    ShowState,
    ShowQuote,
    ShowAdmins,
    Start { interval_secs: Option<u64> },
    Stop,
    RunOnce,
    AddPair {
        principal: Principal,
        symbol: String,
        decimals: u8,
        spread_value: Decimal,
    },
    RemovePair { index: usize },
    SetSpread {
        symbol: String,
        settings: SpreadSettings,
    },
    SetBalance { symbol: String, amount: String },
    SetQuoteAsset { principal: Principal },
    AddAdmin { principal: Principal },
    RemoveAdmin { principal: Principal },
    Refresh,
    Stats,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            return Err(ConsoleError::InvalidArgument("empty command".to_string()));
        };

        let cmd = match (name, args) {
            ("pairs", []) => Command::ShowPairs,
            ("history", []) => Command::ShowHistory { limit: None },
            ("history", [n]) => Command::ShowHistory {
                limit: Some(parse_number(n, "history row count")?),
            },
            ("state", []) => Command::ShowState,
            ("quote", []) => Command::ShowQuote,
            ("admins", []) => Command::ShowAdmins,
            ("start", []) => Command::Start {
                interval_secs: None,
            },
            ("start", [secs]) => Command::Start {
                interval_secs: Some(parse_number(secs, "timer interval")?),
            },
            ("stop", []) => Command::Stop,
            ("run", []) => Command::RunOnce,
            ("add-pair", [principal, symbol, decimals, spread]) => {
                let spread_value = parse_decimal(spread, "spread value")?;
                // Range-check up front; bias starts at zero for a new pair.
                SpreadSettings::new(spread_value, Decimal::ZERO)?;
                Command::AddPair {
                    principal: Principal::from_text(principal)?,
                    symbol: (*symbol).to_string(),
                    decimals: parse_number(decimals, "decimals")?,
                    spread_value,
                }
            }
            ("rm-pair", [index]) => Command::RemovePair {
                index: parse_number(index, "pair index")?,
            },
            ("set-spread", [symbol, value]) => Command::SetSpread {
                symbol: (*symbol).to_string(),
                settings: SpreadSettings::new(
                    parse_decimal(value, "spread value")?,
                    Decimal::ZERO,
                )?,
            },
            ("set-spread", [symbol, value, bias]) => Command::SetSpread {
                symbol: (*symbol).to_string(),
                settings: SpreadSettings::new(
                    parse_decimal(value, "spread value")?,
                    parse_decimal(bias, "spread bias")?,
                )?,
            },
            ("set-balance", [symbol, amount]) => Command::SetBalance {
                symbol: (*symbol).to_string(),
                amount: (*amount).to_string(),
            },
            ("set-quote", [principal]) => Command::SetQuoteAsset {
                principal: Principal::from_text(principal)?,
            },
            ("add-admin", [principal]) => Command::AddAdmin {
                principal: Principal::from_text(principal)?,
            },
            ("rm-admin", [principal]) => Command::RemoveAdmin {
                principal: Principal::from_text(principal)?,
            },
            ("refresh", []) => Command::Refresh,
            ("stats", []) => Command::Stats,
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => {
                return Err(ConsoleError::InvalidArgument(format!(
                    "unknown command or wrong arguments: {line:?} (try 'help')"
                )))
            }
        };
        Ok(cmd)
    }

    /// Cached views a successful run of this command makes stale. Mirrors
    /// what each mutation changes on the bot side.
    pub fn invalidates(&self) -> &'static [QueryKey] {
        match self {
            Command::Start { .. } | Command::Stop => &[QueryKey::BotState],
            Command::RunOnce => &[QueryKey::History],
            Command::AddPair { .. } | Command::RemovePair { .. } | Command::SetSpread { .. } => {
                &[QueryKey::Pairs]
            }
            Command::SetBalance { .. } => &[QueryKey::Pairs, QueryKey::QuoteInfo],
            Command::SetQuoteAsset { .. } => {
                &[QueryKey::BotState, QueryKey::QuoteInfo, QueryKey::Pairs]
            }
            Command::AddAdmin { .. } | Command::RemoveAdmin { .. } => &[QueryKey::Admins],
            _ => &[],
        }
    }
}

fn parse_decimal(text: &str, what: &str) -> Result<Decimal> {
    text.parse::<Decimal>()
        .map_err(|_| ConsoleError::InvalidArgument(format!("bad {what}: {text:?}")))
}

fn parse_number<N: std::str::FromStr>(text: &str, what: &str) -> Result<N> {
    text.parse::<N>()
        .map_err(|_| ConsoleError::InvalidArgument(format!("bad {what}: {text:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_views() {
        assert_eq!(Command::parse("pairs").unwrap(), Command::ShowPairs);
        assert_eq!(
            Command::parse("history 20").unwrap(),
            Command::ShowHistory { limit: Some(20) }
        );
        assert_eq!(Command::parse(" state ").unwrap(), Command::ShowState);
    }

    #[test]
    fn parses_lifecycle_commands() {
        assert_eq!(
            Command::parse("start 60").unwrap(),
            Command::Start {
                interval_secs: Some(60)
            }
        );
        assert_eq!(
            Command::parse("start").unwrap(),
            Command::Start {
                interval_secs: None
            }
        );
        assert_eq!(Command::parse("stop").unwrap(), Command::Stop);
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn parses_add_pair() {
        let cmd = Command::parse("add-pair ryjl3-tyaaa-aaaaa-aaaba-cai GLD 8 0.05").unwrap();
        match cmd {
            Command::AddPair {
                principal,
                symbol,
                decimals,
                spread_value,
            } => {
                assert_eq!(principal.as_str(), "ryjl3-tyaaa-aaaaa-aaaba-cai");
                assert_eq!(symbol, "GLD");
                assert_eq!(decimals, 8);
                assert_eq!(spread_value, dec!(0.05));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn parses_set_spread_with_default_bias() {
        let cmd = Command::parse("set-spread GLD 0.05").unwrap();
        assert_eq!(
            cmd,
            Command::SetSpread {
                symbol: "GLD".into(),
                settings: SpreadSettings::new(dec!(0.05), dec!(0)).unwrap(),
            }
        );
    }

    #[test]
    fn rejects_out_of_range_spread() {
        assert!(Command::parse("set-spread GLD 0").is_err());
        assert!(Command::parse("set-spread GLD 1.5").is_err());
        assert!(Command::parse("set-spread GLD 0.05 2").is_err());
        assert!(Command::parse("add-pair aaaaa-aa GLD 8 0").is_err());
    }

    #[test]
    fn rejects_bad_principals_and_arity() {
        assert!(Command::parse("add-admin not_a_principal").is_err());
        assert!(Command::parse("").is_err());
        assert!(Command::parse("pairs now").is_err());
        assert!(Command::parse("frobnicate").is_err());
        assert!(Command::parse("rm-pair minus-one").is_err());
    }

    #[test]
    fn invalidation_mapping() {
        assert_eq!(
            Command::Stop.invalidates(),
            &[QueryKey::BotState]
        );
        assert_eq!(Command::RunOnce.invalidates(), &[QueryKey::History]);
        assert_eq!(
            Command::parse("set-balance GLD 1.5").unwrap().invalidates(),
            &[QueryKey::Pairs, QueryKey::QuoteInfo]
        );
        assert_eq!(
            Command::parse("set-quote aaaaa-aa").unwrap().invalidates(),
            &[QueryKey::BotState, QueryKey::QuoteInfo, QueryKey::Pairs]
        );
        assert!(Command::ShowPairs.invalidates().is_empty());
    }
}
