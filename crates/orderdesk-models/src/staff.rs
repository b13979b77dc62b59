//! Shop staff.

use std::collections::BTreeMap;

use orderdesk_firestore::{Document, Value};

use crate::record::{
    optional_str, put_opt_str, require_i64, require_str, timestamp_now, DecodeError, Record,
};

/// A staff member. Stored field names keep the historical spellings
/// (`createAt`/`updateAt`) the existing documents already carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub birth_date: String,
    pub address: String,
    pub phone: String,
    /// Monthly salary in đồng.
    pub salary: i64,
    pub role: String,
    pub image: Option<String>,
    pub create_at: String,
    pub update_at: String,
}

impl Staff {
    /// New staff record stamped with the current time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        gender: impl Into<String>,
        birth_date: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        salary: i64,
        role: impl Into<String>,
    ) -> Self {
        let now = timestamp_now();
        Self {
            id: String::new(),
            name: name.into(),
            email: email.into(),
            gender: gender.into(),
            birth_date: birth_date.into(),
            address: address.into(),
            phone: phone.into(),
            salary,
            role: role.into(),
            image: None,
            create_at: now.clone(),
            update_at: now,
        }
    }
}

impl Record for Staff {
    const COLLECTION: &'static str = "staffs";

    fn from_document(doc: &Document) -> Result<Self, DecodeError> {
        Ok(Staff {
            id: doc.id.clone(),
            name: require_str(doc, Self::COLLECTION, "name")?,
            email: require_str(doc, Self::COLLECTION, "email")?,
            gender: optional_str(doc, "gender").unwrap_or_default(),
            birth_date: optional_str(doc, "birthDate").unwrap_or_default(),
            address: optional_str(doc, "address").unwrap_or_default(),
            phone: optional_str(doc, "phone").unwrap_or_default(),
            salary: require_i64(doc, Self::COLLECTION, "salary")?,
            role: require_str(doc, Self::COLLECTION, "role")?,
            image: optional_str(doc, "image"),
            create_at: optional_str(doc, "createAt").unwrap_or_default(),
            update_at: optional_str(doc, "updateAt").unwrap_or_default(),
        })
    }

    fn to_fields(&self) -> BTreeMap<String, Value> {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), Value::from(self.name.clone()));
        fields.insert("email".to_string(), Value::from(self.email.clone()));
        fields.insert("gender".to_string(), Value::from(self.gender.clone()));
        fields.insert("birthDate".to_string(), Value::from(self.birth_date.clone()));
        fields.insert("address".to_string(), Value::from(self.address.clone()));
        fields.insert("phone".to_string(), Value::from(self.phone.clone()));
        fields.insert("salary".to_string(), Value::Integer(self.salary));
        fields.insert("role".to_string(), Value::from(self.role.clone()));
        put_opt_str(&mut fields, "image", self.image.as_ref());
        fields.insert("createAt".to_string(), Value::from(self.create_at.clone()));
        fields.insert("updateAt".to_string(), Value::from(self.update_at.clone()));
        fields
    }
}
