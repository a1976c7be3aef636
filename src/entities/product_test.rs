use serde_json::json;

use super::*;

fn product(status: &str) -> Product {
    Product {
        id: 1,
        name: "Runner".into(),
        description: "Trail shoe".into(),
        price: 60.0,
        sale_price: 45.0,
        image: String::new(),
        category: Some(2),
        status: status.into(),
    }
}

#[test]
fn sold_products_are_inactive_and_rank_last() {
    assert!(product("AVAILABLE").is_active());
    assert!(!product("SOLD").is_active());
    assert!(product("SOLD").display_rank() > product("AVAILABLE").display_rank());
}

#[test]
fn product_soft_delete_marks_sold() {
    assert_eq!(Product::soft_delete_patch(), Some(json!({"status": "SOLD"})));
}

#[test]
fn product_status_parses_case_insensitively() {
    assert_eq!("sold".parse::<ProductStatus>().unwrap(), ProductStatus::Sold);
    assert!("gone".parse::<ProductStatus>().is_err());
}

#[test]
fn variant_decodes_camel_case() {
    let variant: ProductVariant =
        serde_json::from_value(json!({"id": 4, "size": "41", "stockQuantity": 7, "productId": 9})).unwrap();
    assert_eq!(variant.stock_quantity, 7);
    assert_eq!(ProductVariant::resource().scope_key, Some("productId"));
}

#[test]
fn new_image_serializes_product_id_camel_case() {
    let payload = serde_json::to_value(NewProductImage { alt: "front".into(), url: "u".into(), product_id: 3 }).unwrap();
    assert_eq!(payload, json!({"alt": "front", "url": "u", "productId": 3}));
}
