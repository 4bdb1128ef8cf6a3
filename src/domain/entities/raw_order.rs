//! Raw Order Record
//!
//! The order as returned by the `/v2/order_details/` endpoint. These types
//! carry no behavior; they exist to be decoded from a page of the API or
//! from the local cache file and to be written back unchanged to the cache.
//!
//! Every field defaults when missing and unknown fields are ignored, so a
//! partially populated record still decodes.

use serde::{Deserialize, Deserializer, Serialize};

/// Timestamps arrive wrapped as `{ "$date": <epoch millis> }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochMillis {
    #[serde(rename = "$date", default, deserialize_with = "null_as_default")]
    pub date: i64,
}

impl EpochMillis {
    pub fn new(date: i64) -> Self {
        Self { date }
    }
}

/// GeoJSON point, `[longitude, latitude]` as sent by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoPoint {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryLocation {
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alias: String,
    #[serde(deserialize_with = "null_as_default")]
    pub apartment: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub coordinates: GeoPoint,
    #[serde(deserialize_with = "null_as_default")]
    pub street: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItem {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub price: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub end_amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentMethod {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
}

/// Full order record as decoded from the API.
///
/// Monetary amounts are in minor currency units. Optional members decode
/// `null` as `None`; every other member decodes `null` as its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOrder {
    #[serde(deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub order_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub client_pre_estimate: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subscribed: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,

    // Pricing
    #[serde(deserialize_with = "null_as_default")]
    pub items_price: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub service_fee: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub subtotal: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_price: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_base_price: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_size_surcharge: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_distance_surcharge: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_price: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_amount: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub tip: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub credits: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub tokens: i64,

    // Timestamps
    pub payment_time: Option<EpochMillis>,
    pub delivery_time: Option<EpochMillis>,
    pub delivery_eta: Option<EpochMillis>,
    pub preorder_time: Option<EpochMillis>,

    // Delivery
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_method: String,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_distance: i64,
    pub delivery_location: Option<DeliveryLocation>,
    #[serde(deserialize_with = "null_as_default")]
    pub driver_type: String,

    // Venue
    #[serde(deserialize_with = "null_as_default")]
    pub venue_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue_product_line: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue_coordinates: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub venue_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue_country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue_timezone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue_phone: String,

    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
    pub payment_method: Option<PaymentMethod>,
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
