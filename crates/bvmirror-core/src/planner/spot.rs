//! Spot-purity classification: exclude leveraged tokens and stablecoin pairs.

/// Quote asset the heuristics are anchored to.
const QUOTE_ASSET: &str = "USDT";

/// Leveraged-token suffixes (concatenated with the quote asset).
const LEVERAGED_SUFFIXES: &[&str] = &["UP", "DOWN", "BULL", "BEAR"];

/// Stablecoin base assets whose quote pairs are excluded.
const STABLE_ASSETS: &[&str] = &[
    "BKRW", "USDC", "USDP", "TUSD", "BUSD", "FDUSD", "DAI", "EUR", "GBP",
];

/// Symbols that superficially match an exclusion suffix but are real spot
/// pairs (e.g. JUP + USDT looks like a leveraged "UP" token).
const EXCEPTION_SYMBOLS: &[&str] = &["JUPUSDT"];

/// Whether a symbol belongs to the pure spot universe.
pub fn is_pure_spot(symbol: &str) -> bool {
    if EXCEPTION_SYMBOLS.contains(&symbol) {
        return true;
    }
    if LEVERAGED_SUFFIXES
        .iter()
        .any(|lev| symbol.ends_with(&format!("{lev}{QUOTE_ASSET}")))
    {
        return false;
    }
    if STABLE_ASSETS
        .iter()
        .any(|stable| symbol == format!("{stable}{QUOTE_ASSET}"))
    {
        return false;
    }
    true
}

/// Split symbols into (pure, excluded), preserving input order.
pub fn classify_spot_symbols<'a, I>(symbols: I) -> (Vec<&'a str>, Vec<&'a str>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut pure = Vec::new();
    let mut excluded = Vec::new();
    for symbol in symbols {
        if is_pure_spot(symbol) {
            pure.push(symbol);
        } else {
            excluded.push(symbol);
        }
    }
    (pure, excluded)
}
