//! Product and variant snapshots
//!
//! A snapshot is a copy of catalog fields taken when the shopper adds a line to
//! the cart. Nothing refreshes it afterwards: if the catalog price or image
//! changes, the cart line and the order built from it keep the captured values.

use serde::{Deserialize, Serialize};
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage { pub url: String }

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: i64,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// `id` is optional: line items without one never become order items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSnapshot {
    #[serde(default)]
    pub id: Option<i64>,
    pub color: String,
    pub size: String,
    pub cost: Money,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductSnapshot {
    pub fn primary_image(&self) -> Option<&str> { self.images.first().map(|i| i.url.as_str()) }
}

impl VariantSnapshot {
    /// Variant image, falling back to the product's first image.
    pub fn display_image<'a>(&'a self, product: &'a ProductSnapshot) -> Option<&'a str> {
        self.image.as_deref().or_else(|| product.primary_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_snapshot_reads_storefront_json() {
        let p: ProductSnapshot = serde_json::from_str(r#"{"id":3,"name":"Linen Shirt","price":"49.90","images":[{"url":"/a.jpg"}]}"#).unwrap();
        let v: VariantSnapshot = serde_json::from_str(r#"{"id":null,"color":"Sand","size":"M","cost":"20"}"#).unwrap();
        assert_eq!(p.price.to_string(), "49.90");
        assert_eq!(v.id, None);
        assert_eq!(v.display_image(&p), Some("/a.jpg"));
    }
}
