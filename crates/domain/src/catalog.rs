use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Static details of a bookable `Service`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDetails {
    pub name: &'static str,
    /// Price in whole rupees
    pub price: i64,
    pub duration_minutes: i64,
}

impl ServiceDetails {
    /// Price as shown to customers, e.g. `₹500`
    pub fn display_price(&self) -> String {
        format!("₹{}", self.price)
    }
}

/// The services offered by the salon.
///
/// The serialized form is the service id used by the API and the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    Haircut,
    Haircolor,
    Highlights,
    Facial,
    Manicure,
    Pedicure,
    ManicurePedicure,
    HairTreatment,
    Bridal,
}

impl Service {
    pub const ALL: [Service; 9] = [
        Service::Haircut,
        Service::Haircolor,
        Service::Highlights,
        Service::Facial,
        Service::Manicure,
        Service::Pedicure,
        Service::ManicurePedicure,
        Service::HairTreatment,
        Service::Bridal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Haircut => "haircut",
            Self::Haircolor => "haircolor",
            Self::Highlights => "highlights",
            Self::Facial => "facial",
            Self::Manicure => "manicure",
            Self::Pedicure => "pedicure",
            Self::ManicurePedicure => "manicure-pedicure",
            Self::HairTreatment => "hair-treatment",
            Self::Bridal => "bridal",
        }
    }

    pub fn details(&self) -> ServiceDetails {
        let (name, price, duration_minutes) = match self {
            Self::Haircut => ("Hair Cut & Styling", 500, 60),
            Self::Haircolor => ("Hair Coloring", 1500, 120),
            Self::Highlights => ("Highlights & Lowlights", 2000, 150),
            Self::Facial => ("Facial & Skin Care", 800, 90),
            Self::Manicure => ("Manicure", 600, 45),
            Self::Pedicure => ("Pedicure", 700, 60),
            Self::ManicurePedicure => ("Manicure & Pedicure", 1200, 90),
            Self::HairTreatment => ("Hair Treatment", 1000, 90),
            Self::Bridal => ("Bridal Package", 5000, 240),
        };
        ServiceDetails {
            name,
            price,
            duration_minutes,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Invalid service: {0}")]
    InvalidService(String),
    #[error("Invalid stylist: {0}")]
    InvalidStylist(String),
}

impl FromStr for Service {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|service| service.as_str() == s)
            .copied()
            .ok_or_else(|| CatalogError::InvalidService(s.to_string()))
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stylist preference. `Any` means the customer has no preference
/// and the booking occupies the slot for every stylist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stylist {
    Priya,
    Meera,
    Anjali,
    Kavita,
    Any,
}

impl Default for Stylist {
    fn default() -> Self {
        Self::Any
    }
}

impl Stylist {
    pub const ALL: [Stylist; 5] = [
        Stylist::Priya,
        Stylist::Meera,
        Stylist::Anjali,
        Stylist::Kavita,
        Stylist::Any,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Priya => "priya",
            Self::Meera => "meera",
            Self::Anjali => "anjali",
            Self::Kavita => "kavita",
            Self::Any => "any",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Priya => "Priya Sharma",
            Self::Meera => "Meera Patel",
            Self::Anjali => "Anjali Singh",
            Self::Kavita => "Kavita Verma",
            Self::Any => "Any Available Stylist",
        }
    }

    /// Two bookings at the same date and time clash when they name the
    /// same stylist or when either of them is for `Any` stylist.
    pub fn conflicts_with(&self, other: &Stylist) -> bool {
        *self == Stylist::Any || *other == Stylist::Any || self == other
    }
}

impl FromStr for Stylist {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|stylist| stylist.as_str() == s)
            .copied()
            .ok_or_else(|| CatalogError::InvalidStylist(s.to_string()))
    }
}

impl Display for Stylist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_ids_round_trip_through_from_str_and_serde() {
        for service in Service::ALL.iter() {
            assert_eq!(service.as_str().parse::<Service>().unwrap(), *service);
            let json = serde_json::to_string(service).unwrap();
            assert_eq!(json, format!("\"{}\"", service.as_str()));
        }
        assert_eq!(
            "massage".parse::<Service>(),
            Err(CatalogError::InvalidService("massage".into()))
        );
    }

    #[test]
    fn resolves_service_details() {
        let details = Service::ManicurePedicure.details();
        assert_eq!(details.name, "Manicure & Pedicure");
        assert_eq!(details.price, 1200);
        assert_eq!(details.duration_minutes, 90);
        assert_eq!(Service::Haircut.details().display_price(), "₹500");
        assert_eq!(Service::Bridal.details().duration_minutes, 240);
    }

    #[test]
    fn stylist_conflicts() {
        assert!(Stylist::Priya.conflicts_with(&Stylist::Priya));
        assert!(Stylist::Priya.conflicts_with(&Stylist::Any));
        assert!(Stylist::Any.conflicts_with(&Stylist::Meera));
        assert!(Stylist::Any.conflicts_with(&Stylist::Any));
        assert!(!Stylist::Priya.conflicts_with(&Stylist::Meera));
    }

    #[test]
    fn stylist_ids() {
        assert_eq!("kavita".parse::<Stylist>().unwrap(), Stylist::Kavita);
        assert_eq!(Stylist::default(), Stylist::Any);
        assert_eq!(Stylist::Any.display_name(), "Any Available Stylist");
        assert!("Priya".parse::<Stylist>().is_err());
    }
}
