//! # Add-ons
//!
//! Per-item extras (gift wrap, engraving, branded packaging). Standard
//! add-ons are always offered; bulk add-ons unlock once the order reaches
//! their minimum quantity.
//!
//! ```text
//! qty = 30
//! ┌──────────────┬──────────┬─────────┬──────────────────────────────┐
//! │ add-on       │ kind     │ MOQ     │ state                        │
//! ├──────────────┼──────────┼─────────┼──────────────────────────────┤
//! │ Gift wrap    │ standard │ -       │ selectable                   │
//! │ Logo print   │ bulk     │ 25      │ selectable (unlocked)        │
//! │ Engraving    │ bulk     │ 50      │ "Add 20 more items to unlock"│
//! └──────────────┴──────────┴─────────┴──────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{AddOn, AddOnKind};

/// Cost of the selected add-ons at a given quantity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AddOnSelection {
    /// Selected and available add-ons, in catalog order.
    pub selected: Vec<AddOn>,
    /// `Σ price × quantity` over `selected`.
    pub total: Money,
    /// `Σ price` over `selected`.
    pub per_item: Money,
    /// Bulk add-ons available at this quantity, selected or not.
    pub unlocked_bulk: Vec<AddOn>,
    /// Bulk add-ons still locked, with the unlock hint.
    pub locked: Vec<LockedAddOn>,
}

impl AddOnSelection {
    /// Any selected add-on needs a preview or customer artwork.
    pub fn has_customization(&self) -> bool {
        self.selected
            .iter()
            .any(|addon| addon.requires_preview || addon.requires_proof)
    }
}

/// A bulk add-on not yet available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LockedAddOn {
    pub id: String,
    pub units_needed: u32,
    pub hint: String,
}

/// Prices the selected add-ons for `quantity` items.
///
/// Unknown ids are ignored. A selected bulk add-on that is still locked is
/// not charged; it shows up in `locked` instead.
///
/// ```rust
/// use wyshkit_core::addons::calculate_add_ons;
/// use wyshkit_core::{AddOn, AddOnKind, Money};
///
/// let wrap = AddOn {
///     id: "wrap".into(),
///     name: "Gift wrap".into(),
///     description: None,
///     price: Money::from_paise(4900),
///     kind: AddOnKind::Standard,
///     minimum_order: None,
///     requires_preview: false,
///     requires_proof: false,
/// };
///
/// let selection = calculate_add_ons(&["wrap"], &[wrap], 10);
/// assert_eq!(selection.total.paise(), 49000);
/// assert_eq!(selection.per_item.paise(), 4900);
/// ```
pub fn calculate_add_ons<S: AsRef<str>>(selected_ids: &[S], add_ons: &[AddOn], quantity: u32) -> AddOnSelection {
    let is_selected = |addon: &AddOn| selected_ids.iter().any(|id| id.as_ref() == addon.id);

    let selected: Vec<AddOn> = add_ons
        .iter()
        .filter(|addon| is_selected(*addon) && addon.is_unlocked(quantity))
        .cloned()
        .collect();

    let per_item: Money = selected.iter().map(|addon| addon.price).sum();
    let total = per_item.multiply_quantity(quantity);

    let bulk = add_ons.iter().filter(|addon| addon.kind == AddOnKind::Bulk);
    let unlocked_bulk = bulk
        .clone()
        .filter(|addon| addon.is_unlocked(quantity))
        .cloned()
        .collect();
    let locked = bulk
        .filter_map(|addon| {
            addon.units_to_unlock(quantity).map(|needed| LockedAddOn {
                id: addon.id.clone(),
                units_needed: needed,
                hint: unlock_hint(needed),
            })
        })
        .collect();

    AddOnSelection {
        selected,
        total,
        per_item,
        unlocked_bulk,
        locked,
    }
}

fn unlock_hint(needed: u32) -> String {
    let plural = if needed > 1 { "s" } else { "" };
    format!("Add {} more item{} to unlock this option", needed, plural)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn addon(id: &str, price: i64, kind: AddOnKind, moq: Option<u32>) -> AddOn {
        AddOn {
            id: id.to_string(),
            name: id.to_string(),
            description: None,
            price: Money::from_paise(price),
            kind,
            minimum_order: moq,
            requires_preview: false,
            requires_proof: false,
        }
    }

    fn catalog() -> Vec<AddOn> {
        vec![
            addon("wrap", 4900, AddOnKind::Standard, None),
            addon("print", 2000, AddOnKind::Bulk, Some(25)),
            AddOn {
                requires_preview: true,
                requires_proof: true,
                ..addon("engrave", 7500, AddOnKind::Bulk, Some(50))
            },
        ]
    }

    #[test]
    fn test_standard_and_unlocked_bulk_charged() {
        let selection = calculate_add_ons(&["wrap", "print"], &catalog(), 30);
        assert_eq!(selection.selected.len(), 2);
        assert_eq!(selection.per_item, Money::from_paise(6900));
        assert_eq!(selection.total, Money::from_paise(207000));
        assert!(!selection.has_customization());
    }

    #[test]
    fn test_locked_bulk_not_charged() {
        let selection = calculate_add_ons(&["engrave"], &catalog(), 30);
        assert!(selection.selected.is_empty());
        assert_eq!(selection.total, Money::zero());
        assert_eq!(selection.unlocked_bulk.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), vec!["print"]);
        assert_eq!(
            selection.locked,
            vec![LockedAddOn {
                id: "engrave".into(),
                units_needed: 20,
                hint: "Add 20 more items to unlock this option".into(),
            }]
        );
    }

    #[test]
    fn test_customization_flag() {
        let selection = calculate_add_ons(&["engrave".to_string()], &catalog(), 50);
        assert!(selection.has_customization());
        assert!(selection.locked.is_empty());
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let selection = calculate_add_ons(&["nope"], &catalog(), 10);
        assert_eq!(selection.total, Money::zero());
        assert_eq!(selection.locked.len(), 2);
        assert_eq!(selection.locked[0].hint, "Add 15 more items to unlock this option");
    }

    #[test]
    fn test_singular_hint() {
        assert_eq!(unlock_hint(1), "Add 1 more item to unlock this option");
    }
}
