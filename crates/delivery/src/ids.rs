//! Strongly-typed identifiers and value objects of the delivery domain.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use parceltrack_core::{DomainError, DomainResult, ValueObject};

/// Identifier of a delivery (aggregate identity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeliveryId(String);

/// Identifier of the route a delivery is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteId(String);

/// Identifier of the person carrying out a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeliveryPersonId(String);

/// Number of the customer order a delivery belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a validated identifier.
            ///
            /// The input is trimmed; blank input is rejected. Deserialization
            /// goes through the same validation (`try_from = "String"`), so a
            /// value of this type always holds a non-empty string.
            pub fn new(value: impl Into<String>) -> DomainResult<Self> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!(
                        $name,
                        " must not be blank"
                    )));
                }
                Ok(Self(trimmed.to_owned()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl ValueObject for $t {}
    };
}

impl_string_newtype!(DeliveryId, "DeliveryId");
impl_string_newtype!(RouteId, "RouteId");
impl_string_newtype!(DeliveryPersonId, "DeliveryPersonId");
impl_string_newtype!(OrderNumber, "OrderNumber");

/// Postal address a delivery is bound for.
///
/// Pure value: the type carries no validation of its own, presence of every
/// field is guaranteed by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
        }
    }
}

impl ValueObject for Address {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_trim_surrounding_whitespace() {
        let id = DeliveryId::new("  D-100  ").unwrap();
        assert_eq!(id.as_str(), "D-100");
        assert_eq!(id.to_string(), "D-100");
    }

    #[test]
    fn blank_identifiers_are_rejected() {
        assert!(matches!(
            DeliveryId::new(""),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            RouteId::new("   "),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            DeliveryPersonId::new("\t\n"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            OrderNumber::new(""),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn identifiers_compare_by_value() {
        let a = RouteId::new("R-1").unwrap();
        let b = RouteId::new(" R-1 ").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn from_str_round_trips() {
        let id: OrderNumber = "ORD-2024-001".parse().unwrap();
        assert_eq!(id.as_str(), "ORD-2024-001");
        assert!("".parse::<OrderNumber>().is_err());
    }
}
