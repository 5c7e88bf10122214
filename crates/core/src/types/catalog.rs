//! Catalog wire models.
//!
//! Departments, categories, products, and product options are owned by the
//! commerce backend and form a three-level tree (department -> category ->
//! product). This layer only reads them on the storefront side; the admin
//! panel writes them back through the backend's admin surface.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, DepartmentId, OptionId, ProductId};

/// Top level of the catalog tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Second level of the catalog tree, parented to a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub department_id: DepartmentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// The kind of add-on a product option represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Color,
    Material,
    Extra,
}

impl OptionKind {
    /// Stable lowercase name, matching the wire format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Material => "material",
            Self::Extra => "extra",
        }
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an option's price modifier is applied to the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceModifierKind {
    #[default]
    Absolute,
    Percent,
}

/// A product add-on with its own price and lead-time modifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: OptionId,
    pub product_id: ProductId,
    pub option_type: OptionKind,
    pub option_name: String,
    #[serde(default)]
    pub price_modifier_type: PriceModifierKind,
    pub price_modifier_value: Decimal,
    #[serde(default)]
    pub production_time_modifier_days: i32,
}

impl ProductOption {
    /// Price delta this option adds on top of the given base price.
    #[must_use]
    pub fn price_delta(&self, base_price: Decimal) -> Decimal {
        match self.price_modifier_type {
            PriceModifierKind::Absolute => self.price_modifier_value,
            PriceModifierKind::Percent => {
                base_price * self.price_modifier_value / Decimal::from(100)
            }
        }
    }
}

/// A sellable product, leaf of the catalog tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    pub base_price: Decimal,
    pub base_production_time_days: i32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub base_material: String,
    #[serde(default)]
    pub default_width: i32,
    #[serde(default)]
    pub default_height: i32,
    #[serde(default)]
    pub default_depth: i32,
    #[serde(default)]
    pub is_made_to_order: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
}

impl Product {
    /// Options of the given kind, in catalog order.
    pub fn options_of_kind(&self, kind: OptionKind) -> impl Iterator<Item = &ProductOption> {
        self.options.iter().filter(move |o| o.option_type == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(kind: PriceModifierKind, value: &str) -> ProductOption {
        ProductOption {
            id: OptionId::new(1),
            product_id: ProductId::new(1),
            option_type: OptionKind::Color,
            option_name: "walnut".to_string(),
            price_modifier_type: kind,
            price_modifier_value: value.parse().expect("decimal"),
            production_time_modifier_days: 2,
        }
    }

    #[test]
    fn test_absolute_price_delta() {
        let opt = option(PriceModifierKind::Absolute, "15.50");
        assert_eq!(
            opt.price_delta("100".parse().expect("decimal")),
            "15.50".parse().expect("decimal")
        );
    }

    #[test]
    fn test_percent_price_delta() {
        let opt = option(PriceModifierKind::Percent, "10");
        assert_eq!(
            opt.price_delta("250".parse().expect("decimal")),
            "25".parse::<Decimal>().expect("decimal")
        );
    }

    #[test]
    fn test_option_kind_wire_format() {
        let kind: OptionKind = serde_json::from_str("\"material\"").expect("parse kind");
        assert_eq!(kind, OptionKind::Material);
        assert_eq!(kind.to_string(), "material");
    }
}
