//! Address Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Address UUID
pub type AddressUuid = TypedUuid<Address>;

/// Address Model
#[derive(Debug, Clone)]
pub struct Address {
    pub uuid: AddressUuid,
    pub recipient: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Address Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub recipient: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}
