//! Asset code and unit-name derivation
//!
//! Codes look like `KAM-007`: a prefix derived from the category and a
//! per-prefix sequence. Units registered under a name that already exists
//! are numbered `Name #2`, `Name #3`, ...

use regex::Regex;
use std::sync::OnceLock;
use crate::model::MasterAsset;

/// Prefix used when a category has no usable characters
pub const FALLBACK_PREFIX: &str = "UMM";

static CODE_PATTERN: OnceLock<Regex> = OnceLock::new();
static UNIT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn code_pattern() -> &'static Regex {
    CODE_PATTERN.get_or_init(|| Regex::new(r"^([A-Z0-9]+)-(\d+)$").expect("Invalid regex pattern"))
}

fn unit_pattern() -> &'static Regex {
    UNIT_PATTERN.get_or_init(|| Regex::new(r"^(.+?) #(\d+)$").expect("Invalid regex pattern"))
}

/// First three ASCII alphanumerics of the category, upper-cased
pub fn category_prefix(category: &str) -> String {
    let prefix: String = category
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_ascii_uppercase();

    if prefix.is_empty() {
        FALLBACK_PREFIX.to_string()
    } else {
        prefix
    }
}

/// Next free code for `category`, one past the highest sequence in use.
///
/// Sequences with no successor in `u32` are ignored.
pub fn next_asset_code(assets: &[MasterAsset], category: &str) -> String {
    let prefix = category_prefix(category);
    let next = assets
        .iter()
        .filter_map(|asset| {
            let caps = code_pattern().captures(&asset.asset_code)?;
            if &caps[1] != prefix.as_str() {
                return None;
            }
            caps[2].parse::<u32>().ok()?.checked_add(1)
        })
        .max()
        .unwrap_or(1);

    format!("{}-{:03}", prefix, next)
}

/// Split `Name #3` into (`Name`, Some(3)); plain names have no unit
pub fn split_unit(name: &str) -> (&str, Option<u32>) {
    match unit_pattern().captures(name) {
        Some(caps) => {
            let base = caps.get(1).map(|m| m.as_str()).unwrap_or(name);
            (base, caps[2].parse().ok())
        }
        None => (name, None),
    }
}

/// Names for `quantity` new units of `base`.
///
/// A single unit of a name nobody uses keeps the plain name. Otherwise every
/// new unit gets a `#k` suffix continuing after the highest unit in use; an
/// existing unsuffixed asset counts as unit 1.
pub fn unit_names(assets: &[MasterAsset], base: &str, quantity: usize) -> Vec<String> {
    let base = base.trim();
    let highest = assets
        .iter()
        .filter_map(|asset| match split_unit(&asset.name) {
            (name, Some(unit)) if name == base => Some(unit as usize),
            (name, None) if name == base => Some(1),
            _ => None,
        })
        .max();

    match highest {
        None if quantity == 1 => vec![base.to_string()],
        _ => {
            let start = highest.unwrap_or(0);
            (1..=quantity).map(|i| format!("{} #{}", base, start + i)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssetDraft;

    fn asset(name: &str, code: &str) -> MasterAsset {
        let mut asset = MasterAsset::from_draft(&AssetDraft::new("loc", name, "Kamera"));
        asset.asset_code = code.to_string();
        asset
    }

    #[test]
    fn test_category_prefix() {
        assert_eq!(category_prefix("Kamera"), "KAM");
        assert_eq!(category_prefix("TV"), "TV");
        assert_eq!(category_prefix("  a/v rig"), "AVR");
        assert_eq!(category_prefix("--"), FALLBACK_PREFIX);
    }

    #[test]
    fn test_next_code_continues_highest_sequence() {
        let assets = vec![
            asset("Sony A7", "KAM-001"),
            asset("Canon R6", "KAM-004"),
            asset("Rode", "MIK-009"),
            asset("Legacy", "cam-99"),
        ];
        assert_eq!(next_asset_code(&assets, "Kamera"), "KAM-005");
        assert_eq!(next_asset_code(&assets, "Mikrofon"), "MIK-010");
        assert_eq!(next_asset_code(&assets, "Lighting"), "LIG-001");
    }

    #[test]
    fn test_next_code_skips_exhausted_sequences() {
        let assets = vec![
            asset("Sony A7", "KAM-002"),
            asset("Imported", "KAM-4294967295"),
            asset("Imported too", "KAM-99999999999"),
        ];
        assert_eq!(next_asset_code(&assets, "Kamera"), "KAM-003");

        let only_exhausted = vec![asset("Imported", "KAM-4294967295")];
        assert_eq!(next_asset_code(&only_exhausted, "Kamera"), "KAM-001");
    }

    #[test]
    fn test_split_unit() {
        assert_eq!(split_unit("Sony A7 #3"), ("Sony A7", Some(3)));
        assert_eq!(split_unit("Sony A7"), ("Sony A7", None));
        assert_eq!(split_unit("#1 Fan"), ("#1 Fan", None));
    }

    #[test]
    fn test_unit_names_single_fresh_name() {
        assert_eq!(unit_names(&[], "Sony A7", 1), vec!["Sony A7".to_string()]);
    }

    #[test]
    fn test_unit_names_batch_fresh_name() {
        assert_eq!(
            unit_names(&[], "Softbox", 2),
            vec!["Softbox #1".to_string(), "Softbox #2".to_string()]
        );
    }

    #[test]
    fn test_unit_names_continue_after_existing() {
        let assets = vec![asset("Softbox", ""), asset("Softbox #4", ""), asset("Softbox Mini", "")];
        assert_eq!(
            unit_names(&assets, "Softbox", 2),
            vec!["Softbox #5".to_string(), "Softbox #6".to_string()]
        );
        assert_eq!(unit_names(&[asset("Softbox", "")], "Softbox", 1), vec!["Softbox #2".to_string()]);
    }

    #[test]
    fn test_unit_names_zero_quantity() {
        assert!(unit_names(&[], "Softbox", 0).is_empty());
    }
}
