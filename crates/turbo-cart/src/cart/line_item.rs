//! Line items and add-to-cart candidates.

use serde::{Deserialize, Serialize};

use crate::cart::resolver::{identity, Customization};
use crate::ids::{ItemIdentity, ProductId};
use crate::money::Money;

/// One entry in the cart: a product at a given customization and quantity.
///
/// The identity is never stored; it is recomputed from `product_id` and
/// `customization` so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub display_name: String,
    /// Product image, if the surface supplied one.
    pub image_ref: Option<String>,
    /// Unit price, never negative.
    pub unit_price: Money,
    /// Quantity, at least 1.
    pub quantity: i64,
    /// Shopper-chosen options.
    pub customization: Customization,
    /// Per-unit surcharge for the customization.
    pub customization_cost: Option<Money>,
}

impl CartLineItem {
    /// The identity this line is stored under.
    pub fn identity(&self) -> ItemIdentity {
        identity(&self.product_id, Some(&self.customization))
    }

    /// Unit price plus customization surcharge.
    pub fn effective_unit_price(&self) -> Money {
        match &self.customization_cost {
            Some(cost) => self.unit_price.saturating_add(cost),
            None => self.unit_price,
        }
    }

    /// Effective unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.effective_unit_price().saturating_mul(self.quantity)
    }
}

/// What a product surface hands to `add_item`.
///
/// Values are taken as given; the store coerces them when it builds the
/// line (`quantity` below 1 becomes 1, negative prices become 0).
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemCandidate {
    pub product_id: ProductId,
    pub display_name: String,
    pub image_ref: Option<String>,
    pub unit_price: Money,
    pub quantity: i64,
    pub customization: Option<Customization>,
    pub customization_cost: Option<Money>,
}

impl LineItemCandidate {
    /// A candidate for one unit of `product_id`.
    pub fn new(
        product_id: impl Into<ProductId>,
        display_name: impl Into<String>,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            display_name: display_name.into(),
            image_ref: None,
            unit_price,
            quantity: 1,
            customization: None,
            customization_cost: None,
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_customization(mut self, customization: Customization) -> Self {
        self.customization = Some(customization);
        self
    }

    pub fn with_customization_cost(mut self, cost: Money) -> Self {
        self.customization_cost = Some(cost);
        self
    }

    /// Identity the candidate will be stored under.
    pub fn identity(&self) -> ItemIdentity {
        identity(&self.product_id, self.customization.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_candidate_defaults_to_one_unit() {
        let c = LineItemCandidate::new("p1", "Mug", Money::new(250, Currency::USD));
        assert_eq!(c.quantity, 1);
        assert!(c.customization.is_none());
        assert_eq!(c.identity().as_str(), "p1");
    }

    #[test]
    fn test_line_total_includes_surcharge() {
        let item = CartLineItem {
            product_id: ProductId::new("tee"),
            display_name: "Tee".into(),
            image_ref: None,
            unit_price: Money::new(1000, Currency::USD),
            quantity: 3,
            customization: Customization::new().with("text", "hello"),
            customization_cost: Some(Money::new(200, Currency::USD)),
        };
        assert_eq!(item.effective_unit_price().amount_cents, 1200);
        assert_eq!(item.line_total().amount_cents, 3600);
        assert_eq!(item.identity().as_str(), r#"tee#{"text":"hello"}"#);
    }
}
