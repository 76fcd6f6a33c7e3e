//! Aggregation rows produced by analytics queries.

use chrono::NaiveDate;

/// Number of clicks on a single UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DailyClicks {
    pub date: NaiveDate,
    pub clicks: i64,
}

/// Number of clicks sharing one value of a grouping dimension.
///
/// Missing and empty values share the label [`GroupedCount::UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct GroupedCount {
    pub label: String,
    pub count: i64,
}

impl GroupedCount {
    pub const UNKNOWN: &'static str = "unknown";
}

/// Click attribute used to group counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupDimension {
    Device,
    Country,
}

impl GroupDimension {
    /// Column in the `clicks` table holding this attribute.
    pub fn column(self) -> &'static str {
        match self {
            Self::Device => "device_type",
            Self::Country => "country",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_columns() {
        assert_eq!(GroupDimension::Device.column(), "device_type");
        assert_eq!(GroupDimension::Country.column(), "country");
    }
}
