use courier_planner::RouteGeometry;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value::LineString};

pub fn route_geojson(geometry: Option<&RouteGeometry>) -> GeoJson {
    let Some(geometry) = geometry else {
        return GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        });
    };

    let points: Vec<Vec<f64>> = geometry
        .points()
        .iter()
        .map(|point| vec![point.longitude(), point.latitude()])
        .collect();

    GeoJson::Feature(Feature {
        bbox: None,
        properties: None,
        foreign_members: None,
        id: None,
        geometry: Some(Geometry::new(LineString(points))),
    })
}
