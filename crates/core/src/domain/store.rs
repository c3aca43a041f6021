use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shop product surfaced next to chat recommendations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub price: Decimal,
    pub recommended: bool,
}

impl StoreItem {
    /// Generic stubs substituted when the store item lookup fails. The chat
    /// envelope always carries something purchasable.
    pub fn fallback_stubs() -> Vec<StoreItem> {
        vec![
            StoreItem {
                id: "stub-starter-kit".to_owned(),
                name: "Garden Starter Kit".to_owned(),
                description: "Pots, soil, and seeds to get a first garden going.".to_owned(),
                category: "kits".to_owned(),
                image_url: "/images/store/starter-kit.jpg".to_owned(),
                price: Decimal::new(2499, 2),
                recommended: true,
            },
            StoreItem {
                id: "stub-hand-tools".to_owned(),
                name: "Essential Hand Tools".to_owned(),
                description: "Trowel, pruner, and gloves for everyday care.".to_owned(),
                category: "tools".to_owned(),
                image_url: "/images/store/hand-tools.jpg".to_owned(),
                price: Decimal::new(1899, 2),
                recommended: true,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::StoreItem;

    #[test]
    fn fallback_stubs_are_two_recommended_items() {
        let stubs = StoreItem::fallback_stubs();
        assert_eq!(stubs.len(), 2);
        assert!(stubs.iter().all(|item| item.recommended));
    }
}
