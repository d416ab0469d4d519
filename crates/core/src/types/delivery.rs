//! Delivery pricing types.
//!
//! The fee rule itself (free above a threshold, flat fee below it, disabled
//! switch) is owned and evaluated by the backend API. These types exist so
//! the edge and its tests can speak the wire format precisely; the edge
//! never computes a fee from them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The single active delivery configuration for the tenant.
///
/// Read is public; mutation requires an authenticated PATCH.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySettings {
    /// Flat fee charged when the order subtotal is below the threshold.
    pub delivery_fee: Decimal,
    /// Subtotal at or above which delivery is free.
    pub free_delivery_threshold: Decimal,
    /// Whether delivery is currently offered at all.
    pub is_delivery_enabled: bool,
    /// When the configuration was last changed, if the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A delivery fee quote for a given order subtotal.
///
/// Derived, never persisted: recomputed on demand and again at
/// order-creation time so a client-supplied fee is never trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryQuote {
    /// The fee to charge for this order.
    pub delivery_fee: Decimal,
    /// Whether the order qualified for free delivery.
    pub is_free: bool,
    /// Human-readable explanation of the decision.
    pub reason: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_wire_format() {
        let settings: DeliverySettings = serde_json::from_str(
            r#"{"deliveryFee":150,"freeDeliveryThreshold":3000,"isDeliveryEnabled":true}"#,
        )
        .unwrap();
        assert_eq!(settings.delivery_fee, Decimal::from(150));
        assert_eq!(settings.free_delivery_threshold, Decimal::from(3000));
        assert!(settings.is_delivery_enabled);
        assert!(settings.updated_at.is_none());
    }

    #[test]
    fn test_quote_round_trip() {
        let quote = DeliveryQuote {
            delivery_fee: Decimal::ZERO,
            is_free: true,
            reason: "above threshold".to_string(),
        };
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["isFree"], serde_json::json!(true));
        let back: DeliveryQuote = serde_json::from_value(json).unwrap();
        assert_eq!(back, quote);
    }
}
