use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

pub const TRADENAME_PROPERTY: &str = "tradename";
pub const UNKNOWN_TRADENAME: &str = "Unknown";

/// 依資料庫列順序組成 FeatureCollection，不去重、不分頁
pub fn feature_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// 確保 `properties.tradename` 一定存在，缺少或為 null 時填入 "Unknown"
pub fn ensure_tradename(feature: &mut Feature) {
    let properties = feature.properties.get_or_insert_with(JsonObject::new);
    let missing = matches!(
        properties.get(TRADENAME_PROPERTY),
        None | Some(JsonValue::Null)
    );
    if missing {
        properties.insert(
            TRADENAME_PROPERTY.to_string(),
            JsonValue::String(UNKNOWN_TRADENAME.to_string()),
        );
    }
}

pub fn tradename_or_default(tradename: Option<String>) -> String {
    tradename.unwrap_or_else(|| UNKNOWN_TRADENAME.to_string())
}

fn position_in_bounds(position: &[f64]) -> bool {
    match position {
        [lon, lat, ..] => (-180.0..=180.0).contains(lon) && (-90.0..=90.0).contains(lat),
        _ => false,
    }
}

fn ring_in_bounds(ring: &[Vec<f64>]) -> bool {
    ring.iter().all(|p| position_in_bounds(p))
}

/// 檢查幾何是否為 EPSG:4326 經緯度（lon ∈ [-180,180]、lat ∈ [-90,90]）
pub fn geometry_within_wgs84_bounds(geometry: &Geometry) -> bool {
    match &geometry.value {
        Value::Point(p) => position_in_bounds(p),
        Value::MultiPoint(points) | Value::LineString(points) => ring_in_bounds(points),
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            lines.iter().all(|l| ring_in_bounds(l))
        }
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .all(|polygon| polygon.iter().all(|r| ring_in_bounds(r))),
        Value::GeometryCollection(geometries) => {
            geometries.iter().all(geometry_within_wgs84_bounds)
        }
    }
}

pub fn feature_within_wgs84_bounds(feature: &Feature) -> bool {
    feature
        .geometry
        .as_ref()
        .map(geometry_within_wgs84_bounds)
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature_with_properties(properties: serde_json::Value) -> Feature {
        serde_json::from_value(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [23.32, 42.69] },
            "properties": properties
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_tradename_defaults_to_unknown() {
        let mut feature = feature_with_properties(json!({ "id": 4 }));
        ensure_tradename(&mut feature);
        assert_eq!(
            feature.property(TRADENAME_PROPERTY),
            Some(&json!(UNKNOWN_TRADENAME))
        );
    }

    #[test]
    fn test_null_tradename_and_null_properties_default_to_unknown() {
        let mut null_name = feature_with_properties(json!({ "tradename": null }));
        ensure_tradename(&mut null_name);
        assert_eq!(null_name.property(TRADENAME_PROPERTY), Some(&json!("Unknown")));

        let mut no_properties = feature_with_properties(serde_json::Value::Null);
        ensure_tradename(&mut no_properties);
        assert_eq!(no_properties.property(TRADENAME_PROPERTY), Some(&json!("Unknown")));
    }

    #[test]
    fn test_existing_tradename_is_kept() {
        let mut feature = feature_with_properties(json!({ "tradename": "Sofia Central" }));
        ensure_tradename(&mut feature);
        assert_eq!(feature.property(TRADENAME_PROPERTY), Some(&json!("Sofia Central")));
    }

    #[test]
    fn test_wgs84_bounds_accepts_lon_lat_polygons() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "MultiPolygon",
            "coordinates": [[[[23.31, 42.69], [23.33, 42.69], [23.33, 42.70], [23.31, 42.69]]]]
        }))
        .unwrap();
        assert!(geometry_within_wgs84_bounds(&geometry));
    }

    #[test]
    fn test_wgs84_bounds_rejects_projected_coordinates() {
        // EPSG:3857 meters, i.e. a geometry that was never reprojected
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "Point",
            "coordinates": [2595000.0, 5262000.0]
        }))
        .unwrap();
        assert!(!geometry_within_wgs84_bounds(&geometry));

        let swapped: Geometry = serde_json::from_value(json!({
            "type": "Point",
            "coordinates": [42.69, 123.32]
        }))
        .unwrap();
        assert!(!geometry_within_wgs84_bounds(&swapped));
    }

    #[test]
    fn test_empty_collection_serializes_with_empty_features() {
        let collection = feature_collection(Vec::new());
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value, json!({ "type": "FeatureCollection", "features": [] }));
    }
}
