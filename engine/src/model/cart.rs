//! Shopping cart lines.

use crate::entity::{CollectionOrder, Entity, Timestamps};
use crate::{error::Result, validate, EntityId};
use serde::{Deserialize, Serialize};

fn one() -> u32 {
    1
}

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: EntityId,
    pub product_id: String,
    pub title: String,
    /// Unit price
    pub price: f64,
    pub quantity: u32,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl CartItem {
    /// Price times quantity.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDraft {
    pub product_id: String,
    pub title: String,
    pub price: f64,
    #[serde(default = "one")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl Entity for CartItem {
    type Draft = CartItemDraft;
    type Patch = CartItemPatch;

    const KIND: &'static str = "cart";
    const ORDER: CollectionOrder = CollectionOrder::InsertionOrder;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }

    fn validate_draft(draft: &CartItemDraft) -> Result<()> {
        validate::required_text("productId", &draft.product_id)?;
        validate::required_text("title", &draft.title)?;
        validate::amount("price", draft.price)?;
        validate::positive("quantity", draft.quantity)
    }

    fn validate(&self) -> Result<()> {
        validate::required_text("productId", &self.product_id)?;
        validate::required_text("title", &self.title)?;
        validate::amount("price", self.price)?;
        validate::positive("quantity", self.quantity)
    }

    fn validate_patch(patch: &CartItemPatch) -> Result<()> {
        validate::patched_text("title", patch.title.as_deref())?;
        if let Some(price) = patch.price {
            validate::amount("price", price)?;
        }
        if let Some(quantity) = patch.quantity {
            validate::positive("quantity", quantity)?;
        }
        Ok(())
    }

    fn from_draft(id: EntityId, draft: CartItemDraft, timestamps: Timestamps) -> Self {
        Self {
            id,
            product_id: draft.product_id.trim().to_string(),
            title: draft.title.trim().to_string(),
            price: draft.price,
            quantity: draft.quantity,
            timestamps,
        }
    }

    fn merge(&mut self, patch: CartItemPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, SystemClock};
    use crate::Error;
    use serde_json::json;

    fn draft() -> CartItemDraft {
        CartItemDraft {
            product_id: "sku-1".into(),
            title: "Coffee beans".into(),
            price: 12.5,
            quantity: 2,
        }
    }

    #[test]
    fn quantity_defaults_to_one() {
        let draft: CartItemDraft = serde_json::from_value(json!({
            "productId": "sku-1",
            "title": "Coffee beans",
            "price": 12.5
        }))
        .unwrap();
        assert_eq!(draft.quantity, 1);
    }

    #[test]
    fn stored_item_validation() {
        let item = CartItem::from_draft(
            "c1".into(),
            draft(),
            Timestamps::created(SystemClock.now()),
        );
        assert!(item.validate().is_ok());

        let bad = CartItem {
            title: "   ".into(),
            ..item.clone()
        };
        assert!(matches!(bad.validate(), Err(Error::Validation { field, .. }) if field == "title"));

        let bad = CartItem {
            price: -5.0,
            ..item.clone()
        };
        assert!(bad.validate().is_err());

        let bad = CartItem { quantity: 0, ..item };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn draft_validation() {
        assert!(CartItem::validate_draft(&draft()).is_ok());

        let mut bad = draft();
        bad.product_id = "  ".into();
        assert!(CartItem::validate_draft(&bad).is_err());

        let mut bad = draft();
        bad.price = -1.0;
        assert!(CartItem::validate_draft(&bad).is_err());

        let mut bad = draft();
        bad.quantity = 0;
        assert!(CartItem::validate_draft(&bad).is_err());
    }

    #[test]
    fn line_total() {
        let item = CartItem::from_draft(
            "c1".into(),
            draft(),
            Timestamps::created(SystemClock.now()),
        );
        assert_eq!(item.line_total(), 25.0);
    }

    #[test]
    fn patch_quantity() {
        let mut item = CartItem::from_draft(
            "c1".into(),
            draft(),
            Timestamps::created(SystemClock.now()),
        );
        let patch = CartItemPatch {
            quantity: Some(5),
            ..CartItemPatch::default()
        };
        assert!(CartItem::validate_patch(&patch).is_ok());
        item.merge(patch);
        assert_eq!(item.quantity, 5);
        assert_eq!(item.price, 12.5);

        let zero = CartItemPatch {
            quantity: Some(0),
            ..CartItemPatch::default()
        };
        assert!(CartItem::validate_patch(&zero).is_err());
    }
}
