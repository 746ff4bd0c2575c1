//! Proximity evaluation: which single obra is the user currently "at".

use crate::coords;
use crate::distance::haversine_distance_meters;
use obramap_core::models::{Coordinate, Obra};
use serde::Serialize;

/// One obra as seen by the proximity engine: its anchor point (first
/// point of the first ring of the stored geometry) and activation radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObraSite {
    pub id_unico: String,
    pub nome: Option<String>,
    pub anchor: Coordinate,
    pub radius_m: f64,
}

/// A qualifying obra together with the distance that qualified it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProximityHit<'a> {
    pub site: &'a ObraSite,
    pub distance_m: f64,
}

/// Pre-parsed anchor set, built once per load of the obra collection.
///
/// Iteration order is the input order, so evaluation is deterministic
/// across calls for the same loaded set.
#[derive(Debug, Clone, Default)]
pub struct SiteIndex {
    sites: Vec<ObraSite>,
}

impl SiteIndex {
    /// Build the index from stored obras.
    ///
    /// Obras with absent or unparseable geometry are skipped with a
    /// warning; they can never qualify until a later ingestion repairs
    /// their geometry.
    pub fn from_obras(obras: &[Obra], default_radius_m: f64) -> Self {
        let mut sites = Vec::with_capacity(obras.len());

        for obra in obras {
            let Some(text) = obra.geometria.as_deref() else {
                continue;
            };

            let anchor = match coords::parse_text(text) {
                Ok(rings) => rings.into_iter().next().and_then(|ring| ring.into_iter().next()),
                Err(e) => {
                    tracing::warn!(
                        id_unico = %obra.id_unico,
                        error = %e,
                        "Skipping obra with unparseable geometry text"
                    );
                    None
                }
            };

            let Some(anchor) = anchor else {
                continue;
            };

            sites.push(ObraSite {
                id_unico: obra.id_unico.clone(),
                nome: obra.nome.clone(),
                anchor,
                radius_m: obra.raio_m.unwrap_or(default_radius_m),
            });
        }

        Self { sites }
    }

    pub fn sites(&self) -> &[ObraSite] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// Evaluate the current position against a site set.
///
/// A site qualifies when its haversine distance to the position is at
/// most its activation radius (inclusive). Among multiple qualifiers the
/// nearest wins; equal distances keep the earlier site in set order.
/// Pure function of its inputs, recomputed wholesale per position sample.
pub fn evaluate<'a>(position: &Coordinate, sites: &'a [ObraSite]) -> Option<ProximityHit<'a>> {
    let mut best: Option<ProximityHit<'a>> = None;

    for site in sites {
        let distance_m = haversine_distance_meters(position, &site.anchor);
        if distance_m > site.radius_m {
            continue;
        }
        // Strict < keeps the earlier site on equal distances.
        let is_better = best.as_ref().map_or(true, |hit| distance_m < hit.distance_m);
        if is_better {
            best = Some(ProximityHit { site, distance_m });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use obramap_core::models::Obra;

    fn obra_at(id: &str, text: &str) -> Obra {
        let mut obra = Obra::with_id(id);
        obra.geometria = Some(text.to_string());
        obra
    }

    fn site(id: &str, lat: f64, lon: f64, radius_m: f64) -> ObraSite {
        ObraSite {
            id_unico: id.to_string(),
            nome: None,
            anchor: Coordinate::new(lat, lon),
            radius_m,
        }
    }

    #[test]
    fn test_user_at_anchor_qualifies() {
        let sites = [site("A", -8.0476, -34.877, 50.0)];
        let user = Coordinate::new(-8.0476, -34.877);
        let hit = evaluate(&user, &sites).unwrap();
        assert_eq!(hit.site.id_unico, "A");
        assert!(hit.distance_m < 0.001);
    }

    #[test]
    fn test_distant_anchor_does_not_qualify() {
        // ~425 m away, well outside a 50 m radius
        let sites = [site("A", -8.05, -34.88, 50.0)];
        let user = Coordinate::new(-8.0476, -34.877);
        assert!(evaluate(&user, &sites).is_none());
    }

    #[test]
    fn test_boundary_distance_is_inclusive() {
        let anchor = Coordinate::new(-8.05, -34.88);
        let user = Coordinate::new(-8.0476, -34.877);
        let exact = haversine_distance_meters(&user, &anchor);

        let sites = [site("A", anchor.latitude, anchor.longitude, exact)];
        let hit = evaluate(&user, &sites).expect("distance == radius must qualify");
        assert_eq!(hit.site.id_unico, "A");

        let sites = [site("A", anchor.latitude, anchor.longitude, exact - 0.01)];
        assert!(evaluate(&user, &sites).is_none());
    }

    #[test]
    fn test_nearest_qualifier_wins() {
        let user = Coordinate::new(-8.0476, -34.877);
        // Both qualify under a generous radius; B is closer.
        let sites = [
            site("far-first", -8.05, -34.88, 10_000.0),
            site("near-second", -8.0477, -34.8771, 10_000.0),
        ];
        let hit = evaluate(&user, &sites).unwrap();
        assert_eq!(hit.site.id_unico, "near-second");
    }

    #[test]
    fn test_equal_distance_keeps_set_order() {
        let user = Coordinate::new(-8.0476, -34.877);
        let sites = [
            site("first", -8.0476, -34.877, 100.0),
            site("second", -8.0476, -34.877, 100.0),
        ];
        let hit = evaluate(&user, &sites).unwrap();
        assert_eq!(hit.site.id_unico, "first");
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let user = Coordinate::new(-8.0476, -34.877);
        let sites = [site("A", -8.0477, -34.8771, 150.0), site("B", -8.0478, -34.8772, 150.0)];
        let first = evaluate(&user, &sites).map(|h| (h.site.id_unico.clone(), h.distance_m));
        for _ in 0..10 {
            let again = evaluate(&user, &sites).map(|h| (h.site.id_unico.clone(), h.distance_m));
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_per_site_radius_override() {
        // An effectively unbounded radius always qualifies, however far.
        let sites = [site("demo", 52.52, 13.405, f64::MAX)];
        let user = Coordinate::new(-8.0476, -34.877);
        assert!(evaluate(&user, &sites).is_some());
    }

    #[test]
    fn test_index_skips_null_and_broken_geometry() {
        let obras = vec![
            Obra::with_id("no-geometry"),
            obra_at("broken", "-8.05,abc"),
            obra_at("good", "-8.05,-34.95/-8.04,-34.94"),
        ];
        let index = SiteIndex::from_obras(&obras, 150.0);
        assert_eq!(index.len(), 1);
        assert_eq!(index.sites()[0].id_unico, "good");
        // Anchor is the first point of the first ring
        assert_eq!(index.sites()[0].anchor, Coordinate::new(-8.05, -34.95));
        assert_eq!(index.sites()[0].radius_m, 150.0);
    }

    #[test]
    fn test_index_applies_radius_override() {
        let mut obra = obra_at("demo", "-8.05,-34.95");
        obra.raio_m = Some(500.0);
        let index = SiteIndex::from_obras(&[obra], 150.0);
        assert_eq!(index.sites()[0].radius_m, 500.0);
    }
}
