use crate::utils::error::{GariError, Result};
use std::fmt;
use std::str::FromStr;

/// 等時線只開放以時間計算（秒），不開放距離型
pub const ISOLINE_TYPE: &str = "time";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Drive,
    LightTruck,
    MediumTruck,
    Truck,
    HeavyTruck,
    TruckDangerousGoods,
    LongTruck,
    Bus,
    Scooter,
    Motorcycle,
    Bicycle,
    MountainBike,
    RoadBike,
    Walk,
    Hike,
    Transit,
    ApproximatedTransit,
}

impl TravelMode {
    pub const ALL: [TravelMode; 17] = [
        TravelMode::Drive,
        TravelMode::LightTruck,
        TravelMode::MediumTruck,
        TravelMode::Truck,
        TravelMode::HeavyTruck,
        TravelMode::TruckDangerousGoods,
        TravelMode::LongTruck,
        TravelMode::Bus,
        TravelMode::Scooter,
        TravelMode::Motorcycle,
        TravelMode::Bicycle,
        TravelMode::MountainBike,
        TravelMode::RoadBike,
        TravelMode::Walk,
        TravelMode::Hike,
        TravelMode::Transit,
        TravelMode::ApproximatedTransit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Drive => "drive",
            TravelMode::LightTruck => "light_truck",
            TravelMode::MediumTruck => "medium_truck",
            TravelMode::Truck => "truck",
            TravelMode::HeavyTruck => "heavy_truck",
            TravelMode::TruckDangerousGoods => "truck_dangerous_goods",
            TravelMode::LongTruck => "long_truck",
            TravelMode::Bus => "bus",
            TravelMode::Scooter => "scooter",
            TravelMode::Motorcycle => "motorcycle",
            TravelMode::Bicycle => "bicycle",
            TravelMode::MountainBike => "mountain_bike",
            TravelMode::RoadBike => "road_bike",
            TravelMode::Walk => "walk",
            TravelMode::Hike => "hike",
            TravelMode::Transit => "transit",
            TravelMode::ApproximatedTransit => "approximated_transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = GariError;

    fn from_str(s: &str) -> Result<Self> {
        TravelMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| GariError::InvalidParameterError {
                field: "mode".to_string(),
                reason: format!(
                    "unsupported travel mode '{}', expected one of: {}",
                    s,
                    TravelMode::ALL.map(|m| m.as_str()).join(", ")
                ),
            })
    }
}

/// `range` 參數：單一值原樣轉送，多個門檻（秒）則以逗號串接
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeParam {
    Sequence(Vec<String>),
    Scalar(String),
}

impl RangeParam {
    pub fn is_empty(&self) -> bool {
        match self {
            RangeParam::Sequence(values) => values.iter().all(|v| v.trim().is_empty()),
            RangeParam::Scalar(value) => value.trim().is_empty(),
        }
    }

    pub fn normalize(&self) -> Result<String> {
        match self {
            RangeParam::Scalar(value) => Ok(value.clone()),
            RangeParam::Sequence(values) => {
                let seconds = values
                    .iter()
                    .map(|v| {
                        v.trim()
                            .parse::<u32>()
                            .map_err(|_| GariError::InvalidParameterError {
                                field: "range".to_string(),
                                reason: format!("'{}' is not a whole number of seconds", v),
                            })
                    })
                    .collect::<Result<Vec<u32>>>()?;

                Ok(seconds
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(","))
            }
        }
    }
}

impl From<Vec<u32>> for RangeParam {
    fn from(seconds: Vec<u32>) -> Self {
        RangeParam::Sequence(seconds.iter().map(|s| s.to_string()).collect())
    }
}

impl From<u32> for RangeParam {
    fn from(seconds: u32) -> Self {
        RangeParam::Scalar(seconds.to_string())
    }
}

impl From<&str> for RangeParam {
    fn from(value: &str) -> Self {
        RangeParam::Scalar(value.to_string())
    }
}

/// 呼叫端傳入、尚未驗證的等時線參數
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsolineQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub mode: Option<String>,
    pub range: Option<RangeParam>,
}

/// 驗證後、可直接送往供應商的請求
#[derive(Debug, Clone, PartialEq)]
pub struct IsolineRequest {
    pub lat: f64,
    pub lon: f64,
    pub mode: TravelMode,
    pub range: String,
}

impl IsolineQuery {
    pub fn new(lat: f64, lon: f64, mode: TravelMode, range: impl Into<RangeParam>) -> Self {
        Self {
            lat: Some(lat.to_string()),
            lon: Some(lon.to_string()),
            mode: Some(mode.as_str().to_string()),
            range: Some(range.into()),
        }
    }

    /// 由 URL 查詢字串組成；`range` 重複出現時視為多個門檻
    pub fn from_query_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = IsolineQuery::default();
        let mut ranges = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "lat" => query.lat = Some(value),
                "lon" => query.lon = Some(value),
                "mode" => query.mode = Some(value),
                "range" | "range[]" => ranges.push(value),
                _ => {}
            }
        }

        query.range = match ranges.len() {
            0 => None,
            1 => ranges.pop().map(RangeParam::Scalar),
            _ => Some(RangeParam::Sequence(ranges)),
        };
        query
    }

    pub fn validate(&self) -> Result<IsolineRequest> {
        // 依序檢查必要欄位，錯誤訊息指出第一個缺少的欄位
        let lat = required("lat", self.lat.as_deref())?;
        let lon = required("lon", self.lon.as_deref())?;
        let mode = required("mode", self.mode.as_deref())?;
        let range = self
            .range
            .as_ref()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| GariError::MissingParameterError {
                field: "range".to_string(),
            })?;

        Ok(IsolineRequest {
            lat: parse_coordinate("lat", lat, 90.0)?,
            lon: parse_coordinate("lon", lon, 180.0)?,
            mode: mode.parse()?,
            range: range.normalize()?,
        })
    }
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| GariError::MissingParameterError {
            field: field.to_string(),
        })
}

fn parse_coordinate(field: &str, value: &str, limit: f64) -> Result<f64> {
    let parsed: f64 = value.parse().map_err(|_| GariError::InvalidParameterError {
        field: field.to_string(),
        reason: format!("'{}' is not a number", value),
    })?;

    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(GariError::InvalidParameterError {
            field: field.to_string(),
            reason: format!("{} is outside [-{}, {}]", parsed, limit, limit),
        });
    }
    Ok(parsed)
}
