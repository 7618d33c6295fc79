//! Static column schemas for archived CSV payloads.
//!
//! Fixed mapping from (symbol type, data type) to the header row of the
//! corresponding CSV files, since the archives themselves ship headerless.
//! Kept in one place so consumers of the mirrored data agree on names.

use crate::config::SymbolType;

pub const SPOT_AGG_TRADES_COLUMNS: &[&str] = &[
    "aggregate_trade_id",
    "price",
    "quantity",
    "first_trade_id",
    "last_trade_id",
    "timestamp",
    "was_the_buyer_the_maker",
    "was_the_trade_the_best_price_match",
];

pub const SPOT_KLINES_COLUMNS: &[&str] = &[
    "open_time",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "close_time",
    "quote_asset_volume",
    "number_of_trades",
    "taker_buy_base_asset_volume",
    "taker_buy_quote_asset_volume",
    "ignore",
];

pub const SPOT_TRADES_COLUMNS: &[&str] = &[
    "trade_id",
    "price",
    "qty",
    "quote_qty",
    "timestamp",
    "is_buyer_maker",
    "is_best_match",
];

/// Unit of the timestamp column for a data type, where one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampUnit {
    Milliseconds,
}

/// Header row for the CSV files of a (symbol type, data type) pair,
/// or None for data types without a fixed schema here.
pub fn columns(symbol_type: SymbolType, data_type: &str) -> Option<&'static [&'static str]> {
    match (symbol_type, data_type) {
        (SymbolType::Spot, "aggTrades") => Some(SPOT_AGG_TRADES_COLUMNS),
        (SymbolType::Spot, "klines") => Some(SPOT_KLINES_COLUMNS),
        (SymbolType::Spot, "trades") => Some(SPOT_TRADES_COLUMNS),
        _ => None,
    }
}

/// Timestamp unit for a (symbol type, data type) pair.
pub fn timestamp_unit(symbol_type: SymbolType, data_type: &str) -> Option<TimestampUnit> {
    match (symbol_type, data_type) {
        (SymbolType::Spot, "aggTrades") | (SymbolType::Spot, "trades") => {
            Some(TimestampUnit::Milliseconds)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_schemas_are_mapped() {
        assert_eq!(
            columns(SymbolType::Spot, "aggTrades").unwrap().len(),
            8
        );
        assert_eq!(columns(SymbolType::Spot, "klines").unwrap().len(), 12);
        assert_eq!(columns(SymbolType::Spot, "trades").unwrap().len(), 7);
    }

    #[test]
    fn unknown_pairs_have_no_schema() {
        assert!(columns(SymbolType::Spot, "BVOLIndex").is_none());
        assert!(columns(SymbolType::FuturesUm, "aggTrades").is_none());
        assert!(timestamp_unit(SymbolType::Spot, "klines").is_none());
    }

    #[test]
    fn trade_timestamps_are_milliseconds() {
        assert_eq!(
            timestamp_unit(SymbolType::Spot, "trades"),
            Some(TimestampUnit::Milliseconds)
        );
    }
}
