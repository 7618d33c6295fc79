//! Sync planner: filters the catalog and diffs against local state.
//!
//! `plan` is deterministic and order-stable: identical inputs produce the
//! identical target sequence, and re-planning with unchanged catalog/local
//! state yields an empty plan.

pub mod dates;
pub mod local;
pub mod spot;

use anyhow::Result;
use std::collections::HashSet;

pub use local::{local_file_set, normalize_key};

/// Filter set applied, in order, before the local diff.
#[derive(Debug, Clone, Default)]
pub struct PlanFilters {
    /// Exact trading-pair allow-list; None = all pairs.
    pub trading_pairs: Option<Vec<String>>,
    /// Pairs excluded even when otherwise matched.
    pub skip_pairs: Vec<String>,
    /// Keep only symbols ending with one of these suffixes.
    pub key_words: Option<Vec<String>>,
    /// Inclusive date bounds; None = open.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Apply the spot-purity classifier.
    pub spot_filter: bool,
    /// Drop `.CHECKSUM` companion files.
    pub skip_checksum: bool,
}

/// Frequency path segments ("1m", "12h", "1mo") that kline-style trees
/// insert between the symbol directory and its files.
fn is_frequency_segment(seg: &str) -> bool {
    let digits = seg
        .strip_suffix("mo")
        .or_else(|| seg.strip_suffix(&['s', 'm', 'h', 'd', 'w'][..]));
    digits.is_some_and(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
}

/// Symbol segment of a key: the directory containing the file, or the last
/// segment of a directory-style prefix. Kline-style keys carry a frequency
/// directory below the symbol; that segment is skipped.
pub fn symbol_segment(key: &str) -> Option<&str> {
    let mut parts: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
    if !key.ends_with('/') {
        parts.pop()?;
    }
    let last = parts.pop()?;
    if is_frequency_segment(last) {
        return parts.pop();
    }
    Some(last)
}

fn retain_by_symbol<F: Fn(&str) -> bool>(keys: &mut Vec<String>, keep: F) {
    // Keys without a symbol segment carry no symbol to filter on; keep them.
    keys.retain(|k| symbol_segment(k).map(&keep).unwrap_or(true));
}

/// Compute the target fetch set: `filtered(catalog_keys) − local_keys`.
///
/// `local_keys` must be normalized relative paths (see [`local_file_set`]).
pub fn plan(
    catalog_keys: &[String],
    local_keys: &HashSet<String>,
    filters: &PlanFilters,
) -> Result<Vec<String>> {
    let mut keys: Vec<String> = catalog_keys.to_vec();

    if let Some(pairs) = &filters.trading_pairs {
        retain_by_symbol(&mut keys, |sym| pairs.iter().any(|p| p == sym));
    }
    if !filters.skip_pairs.is_empty() {
        retain_by_symbol(&mut keys, |sym| {
            !filters.skip_pairs.iter().any(|p| p == sym)
        });
    }
    if let Some(key_words) = &filters.key_words {
        retain_by_symbol(&mut keys, |sym| {
            key_words.iter().any(|kw| sym.ends_with(kw.as_str()))
        });
    }

    keys = dates::time_filter(
        keys,
        filters.start_date.as_deref(),
        filters.end_date.as_deref(),
    )?;

    if filters.spot_filter {
        let symbols = keys.iter().filter_map(|k| symbol_segment(k));
        let (_, excluded) = spot::classify_spot_symbols(symbols);
        if !excluded.is_empty() {
            tracing::info!("ignoring non-pure spot symbols: {excluded:?}");
        }
        retain_by_symbol(&mut keys, spot::is_pure_spot);
    }

    if filters.skip_checksum {
        keys.retain(|k| {
            k.rsplit('.')
                .next()
                .map(|ext| !ext.contains("CHECKSUM"))
                .unwrap_or(true)
        });
    }

    keys.retain(|k| !local_keys.contains(&normalize_key(k)));
    Ok(keys)
}
