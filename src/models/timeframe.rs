use crate::constants::{
    DAILY_LOOKBACK_DAYS, MINUTE_LOOKBACK_DAYS, MONTHLY_LOOKBACK_DAYS, WEEKLY_LOOKBACK_DAYS,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart granularity selectable per company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartTimeframe {
    /// Month-end bars resampled from 5 years of daily data
    Monthly,
    /// Friday-ending weekly bars resampled from 2 years of daily data
    Weekly,
    /// 1 year of daily bars, unresampled
    Daily,
    /// 7 days of 1-minute bars from the intraday source
    Minute,
}

impl ChartTimeframe {
    /// Calendar days of history fetched before aggregation
    pub fn lookback_days(&self) -> i64 {
        match self {
            ChartTimeframe::Monthly => MONTHLY_LOOKBACK_DAYS,
            ChartTimeframe::Weekly => WEEKLY_LOOKBACK_DAYS,
            ChartTimeframe::Daily => DAILY_LOOKBACK_DAYS,
            ChartTimeframe::Minute => MINUTE_LOOKBACK_DAYS,
        }
    }

    /// Whether this granularity comes from the intraday source
    pub fn is_intraday(&self) -> bool {
        matches!(self, ChartTimeframe::Minute)
    }
}

impl Default for ChartTimeframe {
    /// The dashboard opens on the monthly chart
    fn default() -> Self {
        ChartTimeframe::Monthly
    }
}

impl fmt::Display for ChartTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChartTimeframe::Monthly => "monthly",
            ChartTimeframe::Weekly => "weekly",
            ChartTimeframe::Daily => "daily",
            ChartTimeframe::Minute => "minute",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_value_roundtrip() {
        let tf: ChartTimeframe = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(tf, ChartTimeframe::Weekly);
        assert_eq!(tf.to_string(), "weekly");
        assert!(serde_json::from_str::<ChartTimeframe>("\"hourly\"").is_err());
    }

    #[test]
    fn test_lookback_windows() {
        assert_eq!(ChartTimeframe::Monthly.lookback_days(), 1825);
        assert_eq!(ChartTimeframe::Weekly.lookback_days(), 730);
        assert_eq!(ChartTimeframe::Daily.lookback_days(), 365);
        assert_eq!(ChartTimeframe::Minute.lookback_days(), 7);
    }

    #[test]
    fn test_default_is_monthly() {
        assert_eq!(ChartTimeframe::default(), ChartTimeframe::Monthly);
        assert!(!ChartTimeframe::default().is_intraday());
        assert!(ChartTimeframe::Minute.is_intraday());
    }
}
