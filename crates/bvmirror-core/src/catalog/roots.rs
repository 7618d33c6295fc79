//! Static mapping from (symbol type, period) to catalog root prefixes.

use anyhow::{bail, Result};

use crate::config::{AggPeriod, SymbolType};

/// Root prefix of the archive tree for a market/period combination.
/// The option tree only publishes daily archives.
pub fn catalog_root(symbol_type: SymbolType, period: AggPeriod) -> Result<&'static str> {
    Ok(match (symbol_type, period) {
        (SymbolType::Spot, AggPeriod::Daily) => "data/spot/daily/",
        (SymbolType::Spot, AggPeriod::Monthly) => "data/spot/monthly/",
        (SymbolType::FuturesUm, AggPeriod::Daily) => "data/futures/um/daily/",
        (SymbolType::FuturesUm, AggPeriod::Monthly) => "data/futures/um/monthly/",
        (SymbolType::FuturesCm, AggPeriod::Daily) => "data/futures/cm/daily/",
        (SymbolType::FuturesCm, AggPeriod::Monthly) => "data/futures/cm/monthly/",
        (SymbolType::Option, AggPeriod::Daily) => "data/option/daily/",
        (SymbolType::Option, AggPeriod::Monthly) => {
            bail!("option data is only published at daily aggregation")
        }
    })
}

/// Expand configured data types into listing prefixes under the root.
pub fn data_type_prefixes(root: &str, data_types: &[String]) -> Vec<String> {
    data_types.iter().map(|dt| format!("{root}{dt}/")).collect()
}

/// Kline-style data types carry one extra frequency path segment
/// between the symbol directory and its files.
pub fn is_kline_like(data_type: &str) -> bool {
    data_type.to_ascii_lowercase().contains("klines")
}

/// Listing prefix for the files of one symbol directory.
pub fn file_prefix(symbol_dir: &str, data_type: &str, frequency: &str) -> String {
    if is_kline_like(data_type) {
        format!("{symbol_dir}{frequency}/")
    } else {
        symbol_dir.to_string()
    }
}

/// Last path segment of a directory-style prefix (the data type or symbol name).
pub fn dir_name(prefix: &str) -> &str {
    prefix.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}
