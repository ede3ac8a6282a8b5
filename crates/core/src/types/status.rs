//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Order review status, set by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Declined,
}

impl OrderStatus {
    /// All statuses, in the order they are offered to administrators.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Declined];
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Declined => write!(f, "DECLINED"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "DECLINED" => Ok(Self::Declined),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Product category offered by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Laptop,
    Cellular,
    #[serde(rename = "TV")]
    Tv,
    Headphone,
}

impl Category {
    /// All categories, in menu order.
    pub const ALL: [Self; 4] = [Self::Laptop, Self::Cellular, Self::Tv, Self::Headphone];

    /// Name as used by the remote API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Laptop => "Laptop",
            Self::Cellular => "Cellular",
            Self::Tv => "TV",
            Self::Headphone => "Headphone",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}
