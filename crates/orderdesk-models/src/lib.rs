//! Typed records and status workflows for the storefront collections.
//!
//! Every collection the admin tool touches gets a concrete record type
//! with document conversions, plus the order fulfillment workflow the
//! screens enforce. The wire format is `orderdesk-firestore`'s problem;
//! this crate only ever sees [`Document`](orderdesk_firestore::Document)s
//! and plain values.

pub mod collection;
pub mod customer;
pub mod order;
pub mod product;
pub mod record;
pub mod staff;

pub use collection::{Collection, CollectionError, RecordPage};
pub use customer::Customer;
pub use order::{Order, OrderItem, OrderStatus, PaymentMethod};
pub use product::{Category, Product};
pub use record::{DecodeError, Record};
pub use staff::Staff;
