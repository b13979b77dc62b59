//! Menu products.

use std::collections::BTreeMap;

use orderdesk_firestore::{Document, Value};

use crate::record::{optional_str, put_opt_str, require_i64, require_str, DecodeError, Record};

/// Menu category a product is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Foods,
    Drinks,
    Fruits,
    Snacks,
    Other,
}

impl Category {
    /// Stored key, as written into product documents.
    pub fn as_key(self) -> &'static str {
        match self {
            Category::Foods => "foods",
            Category::Drinks => "drinks",
            Category::Fruits => "fruits",
            Category::Snacks => "snacks",
            Category::Other => "other",
        }
    }

    /// Parse a stored key; anything unrecognized files under `Other`.
    pub fn from_key(key: &str) -> Category {
        match key {
            "foods" => Category::Foods,
            "drinks" => Category::Drinks,
            "fruits" => Category::Fruits,
            "snacks" => Category::Snacks,
            _ => Category::Other,
        }
    }

    /// Display label shown in the admin screens.
    pub fn label(self) -> &'static str {
        match self {
            Category::Foods => "Đồ ăn",
            Category::Drinks => "Đồ uống",
            Category::Fruits => "Hoa quả",
            Category::Snacks => "Đồ ăn nhanh",
            Category::Other => "Khác",
        }
    }
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Category,
    /// Free-form availability marker, e.g. `available`.
    pub status: String,
    pub description: String,
    /// Price in đồng; always a whole number.
    pub price: i64,
    pub image: Option<String>,
}

impl Record for Product {
    const COLLECTION: &'static str = "products";

    fn from_document(doc: &Document) -> Result<Self, DecodeError> {
        Ok(Product {
            id: doc.id.clone(),
            name: require_str(doc, Self::COLLECTION, "name")?,
            category: Category::from_key(
                optional_str(doc, "category").as_deref().unwrap_or("other"),
            ),
            status: optional_str(doc, "status").unwrap_or_default(),
            description: optional_str(doc, "description").unwrap_or_default(),
            price: require_i64(doc, Self::COLLECTION, "price")?,
            image: optional_str(doc, "image"),
        })
    }

    fn to_fields(&self) -> BTreeMap<String, Value> {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), Value::from(self.name.clone()));
        fields.insert("category".to_string(), Value::from(self.category.as_key()));
        fields.insert("status".to_string(), Value::from(self.status.clone()));
        fields.insert(
            "description".to_string(),
            Value::from(self.description.clone()),
        );
        fields.insert("price".to_string(), Value::Integer(self.price));
        put_opt_str(&mut fields, "image", self.image.as_ref());
        fields
    }
}
