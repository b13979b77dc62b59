//! Registered customers.

use std::collections::BTreeMap;

use orderdesk_firestore::{Document, Value};

use crate::record::{
    optional_str, put_opt_str, require_str, timestamp_now, DecodeError, Record,
};

/// A customer account. Lives in the `users` collection; the document id is
/// the identity provider's user id.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub birth_date: String,
    pub phone: String,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Customer {
    /// New customer profile stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        gender: impl Into<String>,
        birth_date: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        let now = timestamp_now();
        Self {
            id: String::new(),
            name: name.into(),
            email: email.into(),
            gender: gender.into(),
            birth_date: birth_date.into(),
            phone: phone.into(),
            image: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Refresh the update stamp; call before writing an edited profile.
    pub fn touch(&mut self) {
        self.updated_at = timestamp_now();
    }
}

impl Record for Customer {
    const COLLECTION: &'static str = "users";

    fn from_document(doc: &Document) -> Result<Self, DecodeError> {
        Ok(Customer {
            id: doc.id.clone(),
            name: require_str(doc, Self::COLLECTION, "name")?,
            email: require_str(doc, Self::COLLECTION, "email")?,
            gender: optional_str(doc, "gender").unwrap_or_default(),
            birth_date: optional_str(doc, "birthDate").unwrap_or_default(),
            phone: optional_str(doc, "phone").unwrap_or_default(),
            image: optional_str(doc, "image"),
            created_at: optional_str(doc, "createdAt").unwrap_or_default(),
            updated_at: optional_str(doc, "updatedAt").unwrap_or_default(),
        })
    }

    fn to_fields(&self) -> BTreeMap<String, Value> {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), Value::from(self.name.clone()));
        fields.insert("email".to_string(), Value::from(self.email.clone()));
        fields.insert("gender".to_string(), Value::from(self.gender.clone()));
        fields.insert("birthDate".to_string(), Value::from(self.birth_date.clone()));
        fields.insert("phone".to_string(), Value::from(self.phone.clone()));
        put_opt_str(&mut fields, "image", self.image.as_ref());
        fields.insert("createdAt".to_string(), Value::from(self.created_at.clone()));
        fields.insert("updatedAt".to_string(), Value::from(self.updated_at.clone()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_round_trip() {
        let customer = Customer {
            id: "u1".to_string(),
            name: "Trần Thị Bình".to_string(),
            email: "binh@example.com".to_string(),
            gender: "female".to_string(),
            birth_date: "1998-11-02".to_string(),
            phone: "0912345678".to_string(),
            image: Some("https://cdn.example.com/u1.jpg".to_string()),
            created_at: "2025-01-05T09:00:00Z".to_string(),
            updated_at: "2025-03-10T14:30:00Z".to_string(),
        };
        let doc = Document {
            id: customer.id.clone(),
            fields: customer.to_fields(),
        };
        assert_eq!(Customer::from_document(&doc).unwrap(), customer);
    }

    #[test]
    fn new_profile_is_stamped() {
        let customer = Customer::new("An", "an@example.com", "male", "2000-01-01", "09");
        assert_eq!(customer.created_at, customer.updated_at);
        assert!(!customer.created_at.is_empty());
    }

    #[test]
    fn touch_moves_only_the_update_stamp() {
        let mut customer = Customer::new("An", "an@example.com", "male", "2000-01-01", "09");
        let created = customer.created_at.clone();
        customer.touch();
        assert_eq!(customer.created_at, created);
    }
}
