//! Normalized order and venue projections.
//!
//! Flat, storage-shaped views of a [`RawOrder`]. Both conversions are pure.

use chrono::{DateTime, Utc};

use super::raw_order::{EpochMillis, RawOrder};

/// Delivery method used by pickup orders.
pub const TAKEAWAY: &str = "takeaway";

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: String,
    pub venue_id: String,
    pub client_pre_estimate: String,
    pub delivery_street: String,
    pub delivery_coordinate_x: Option<f64>,
    pub delivery_coordinate_y: Option<f64>,
    pub delivery_distance: i64,
    pub delivery_eta: Option<DateTime<Utc>>,
    pub delivery_method: String,
    pub delivery_price: i64,
    pub delivery_size_surcharge: i64,
    pub delivery_distance_surcharge: i64,
    pub delivery_time: Option<DateTime<Utc>>,
    pub driver_type: String,
    pub items_price: i64,
    pub payment_amount: i64,
    pub payment_time: Option<DateTime<Utc>>,
    pub status: String,
    pub service_fee: i64,
    pub subscribed: bool,
    pub total_price: i64,
    pub preorder_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub venue_id: String,
    pub venue_name: String,
    pub venue_product_line: String,
    pub venue_coordinate_x: f64,
    pub venue_coordinate_y: f64,
    pub venue_url: String,
}

/// Convert an epoch-millisecond value to an instant.
///
/// `0` means "not set" and maps to `None`, so an event at exactly the Unix
/// epoch cannot be represented.
pub fn normalize_timestamp(millis: i64) -> Option<DateTime<Utc>> {
    if millis == 0 {
        return None;
    }
    DateTime::from_timestamp_millis(millis)
}

fn normalize_epoch(value: Option<EpochMillis>) -> Option<DateTime<Utc>> {
    value.and_then(|v| normalize_timestamp(v.date))
}

impl Order {
    pub fn from_raw(raw: &RawOrder) -> Self {
        let (delivery_coordinate_x, delivery_coordinate_y) = if raw.delivery_method == TAKEAWAY {
            (Some(0.0), Some(0.0))
        } else {
            let coordinates = raw
                .delivery_location
                .as_ref()
                .map(|l| l.coordinates.coordinates.as_slice())
                .unwrap_or_default();
            (coordinates.first().copied(), coordinates.get(1).copied())
        };

        let delivery_street = raw
            .delivery_location
            .as_ref()
            .map(|l| l.street.clone())
            .unwrap_or_default();

        Order {
            order_id: raw.order_id.clone(),
            venue_id: raw.venue_id.clone(),
            client_pre_estimate: raw.client_pre_estimate.clone(),
            delivery_street,
            delivery_coordinate_x,
            delivery_coordinate_y,
            delivery_distance: raw.delivery_distance,
            delivery_eta: normalize_epoch(raw.delivery_eta),
            delivery_method: raw.delivery_method.clone(),
            delivery_price: raw.delivery_price,
            delivery_size_surcharge: raw.delivery_size_surcharge,
            delivery_distance_surcharge: raw.delivery_distance_surcharge,
            delivery_time: normalize_epoch(raw.delivery_time),
            driver_type: raw.driver_type.clone(),
            items_price: raw.items_price,
            payment_amount: raw.payment_amount,
            payment_time: normalize_epoch(raw.payment_time),
            status: raw.status.clone(),
            service_fee: raw.service_fee,
            subscribed: raw.subscribed,
            total_price: raw.total_price,
            preorder_time: normalize_epoch(raw.preorder_time),
        }
    }
}

impl Venue {
    pub fn from_raw(raw: &RawOrder) -> Self {
        Venue {
            venue_id: raw.venue_id.clone(),
            venue_name: raw.venue_name.clone(),
            venue_product_line: raw.venue_product_line.clone(),
            venue_coordinate_x: raw.venue_coordinates.first().copied().unwrap_or_default(),
            venue_coordinate_y: raw.venue_coordinates.get(1).copied().unwrap_or_default(),
            venue_url: raw.venue_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::raw_order::{DeliveryLocation, GeoPoint};
    use chrono::TimeZone;

    fn raw_with_location(method: &str, coordinates: Vec<f64>) -> RawOrder {
        RawOrder {
            order_id: "o1".to_string(),
            venue_id: "v1".to_string(),
            delivery_method: method.to_string(),
            delivery_location: Some(DeliveryLocation {
                street: "Main Street 4".to_string(),
                coordinates: GeoPoint {
                    kind: "Point".to_string(),
                    coordinates,
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_timestamp_is_none() {
        assert_eq!(normalize_timestamp(0), None);
    }

    #[test]
    fn test_nonzero_timestamp_is_instant() {
        let expected = Utc.with_ymd_and_hms(2020, 10, 19, 14, 0, 0).unwrap();
        assert_eq!(normalize_timestamp(1603116000000), Some(expected));

        // Sub-second precision survives
        let ts = normalize_timestamp(1603116000123).unwrap();
        assert_eq!(ts.timestamp_millis(), 1603116000123);

        // Negative values are real instants before the epoch
        let before_epoch = normalize_timestamp(-1000).unwrap();
        assert_eq!(before_epoch.timestamp(), -1);
    }

    #[test]
    fn test_takeaway_coordinates_forced_to_zero() {
        let raw = raw_with_location("takeaway", vec![12.5, 55.6]);
        let order = Order::from_raw(&raw);

        assert_eq!(order.delivery_coordinate_x, Some(0.0));
        assert_eq!(order.delivery_coordinate_y, Some(0.0));
        assert_eq!(order.delivery_method, TAKEAWAY);
    }

    #[test]
    fn test_takeaway_without_location() {
        let raw = RawOrder {
            order_id: "o2".to_string(),
            delivery_method: "takeaway".to_string(),
            ..Default::default()
        };
        let order = Order::from_raw(&raw);

        assert_eq!(order.delivery_coordinate_x, Some(0.0));
        assert_eq!(order.delivery_coordinate_y, Some(0.0));
        assert_eq!(order.delivery_street, "");
    }

    #[test]
    fn test_delivery_coordinates_copied_verbatim() {
        let raw = raw_with_location("homedelivery", vec![12.5683, 55.6761]);
        let order = Order::from_raw(&raw);

        assert_eq!(order.delivery_coordinate_x, Some(12.5683));
        assert_eq!(order.delivery_coordinate_y, Some(55.6761));
        assert_eq!(order.delivery_street, "Main Street 4");
    }

    #[test]
    fn test_delivery_without_coordinates_is_null() {
        let raw = raw_with_location("homedelivery", vec![]);
        let order = Order::from_raw(&raw);

        assert_eq!(order.delivery_coordinate_x, None);
        assert_eq!(order.delivery_coordinate_y, None);
    }

    #[test]
    fn test_order_copies_money_and_timestamps() {
        let raw = RawOrder {
            order_id: "o3".to_string(),
            venue_id: "v9".to_string(),
            status: "delivered".to_string(),
            subscribed: true,
            items_price: 1800,
            service_fee: 50,
            delivery_price: 290,
            delivery_size_surcharge: 10,
            delivery_distance_surcharge: 20,
            total_price: 2170,
            payment_amount: 2170,
            payment_time: Some(EpochMillis::new(1603116000000)),
            delivery_time: Some(EpochMillis::new(0)),
            delivery_eta: None,
            preorder_time: Some(EpochMillis::new(1603120000000)),
            ..Default::default()
        };
        let order = Order::from_raw(&raw);

        assert_eq!(order.order_id, "o3");
        assert_eq!(order.venue_id, "v9");
        assert_eq!(order.status, "delivered");
        assert!(order.subscribed);
        assert_eq!(order.items_price, 1800);
        assert_eq!(order.service_fee, 50);
        assert_eq!(order.delivery_price, 290);
        assert_eq!(order.delivery_size_surcharge, 10);
        assert_eq!(order.delivery_distance_surcharge, 20);
        assert_eq!(order.total_price, 2170);
        assert_eq!(order.payment_amount, 2170);
        assert!(order.payment_time.is_some());
        assert_eq!(order.delivery_time, None);
        assert_eq!(order.delivery_eta, None);
        assert_eq!(
            order.preorder_time.map(|t| t.timestamp_millis()),
            Some(1603120000000)
        );
    }

    #[test]
    fn test_venue_projection() {
        let raw = RawOrder {
            venue_id: "v1".to_string(),
            venue_name: "Sushi Bar".to_string(),
            venue_product_line: "restaurant".to_string(),
            venue_coordinates: vec![12.1, 55.2],
            venue_url: "https://wolt.com/v1".to_string(),
            ..Default::default()
        };
        let venue = Venue::from_raw(&raw);

        assert_eq!(venue.venue_id, "v1");
        assert_eq!(venue.venue_name, "Sushi Bar");
        assert_eq!(venue.venue_product_line, "restaurant");
        assert_eq!(venue.venue_coordinate_x, 12.1);
        assert_eq!(venue.venue_coordinate_y, 55.2);
        assert_eq!(venue.venue_url, "https://wolt.com/v1");
    }
}
