//! Address-to-region resolver: orchestrates the matching chain.
//!
//! Hint flow:  division hint → district hint (narrowed) → upazila hint (narrowed)
//! Geo flow:   nearest upazila with coordinates, then ancestor backfill
//!
//! Hints that match nothing are ignored, never fatal. A triple with
//! nulls left over is a valid outcome.

use super::store::RegionStore;
use super::types::{AddressHints, RegionError, Resolution};
use std::sync::Arc;

/// Stateless resolver over a shared store snapshot.
pub struct RegionResolver {
    store: Arc<RegionStore>,
}

impl RegionResolver {
    pub fn new(store: Arc<RegionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    /// Map a coordinate pair plus optional address hints onto the
    /// hierarchy. Coordinates are validated before any lookup; the
    /// hints are tried top-down, then geography fills what is left.
    pub fn resolve(
        &self,
        lat: f64,
        lon: f64,
        hints: &AddressHints,
    ) -> Result<Resolution, RegionError> {
        check_coords(lat, lon)?;

        let mut out = Resolution::default();

        // 1. Name hints, top-down. Each match narrows the next level;
        //    a child match backfills parents that are still null.
        if let Some(hint) = hints.state.as_deref() {
            if let Some(division) = self.store.find_division(hint) {
                out.division_id = Some(division.id);
            }
        }
        if let Some(hint) = hints.district.as_deref() {
            if let Some(district) = self.store.find_district(hint, out.division_id) {
                out.district_id = Some(district.id);
                if out.division_id.is_none() {
                    out.division_id = Some(district.division_id);
                }
            }
        }
        if let Some(hint) = hints.upazila.as_deref() {
            if let Some(upazila) = self.store.find_upazila(hint, out.district_id) {
                out.upazila_id = Some(upazila.id);
                if out.district_id.is_none() {
                    out.district_id = Some(upazila.district_id);
                    if out.division_id.is_none() {
                        if let Some(district) = self.store.district(upazila.district_id) {
                            out.division_id = Some(district.division_id);
                        }
                    }
                }
            }
        }

        if out.is_complete() {
            return Ok(out);
        }

        // 2. Nearest upazila over the whole dataset. The scan ignores
        //    partial hint results on purpose; only null fields are
        //    filled from the winner.
        if let Some(winner) = self.store.nearest_upazila(lat, lon) {
            if out.upazila_id.is_none() {
                out.upazila_id = Some(winner.id);
            }
            // 3. Ancestor backfill from the winner.
            if out.district_id.is_none() {
                out.district_id = Some(winner.district_id);
            }
            if out.division_id.is_none() {
                if let Some(district) = self.store.district(winner.district_id) {
                    out.division_id = Some(district.division_id);
                }
            }
        }

        Ok(out)
    }
}

/// NaN and infinities fail the range checks along with out-of-range
/// values; both bounds are inclusive.
fn check_coords(lat: f64, lon: f64) -> Result<(), RegionError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(RegionError::InvalidLatitude(lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(RegionError::InvalidLongitude(lon));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::types::{District, Division, Upazila};

    fn fixture() -> RegionResolver {
        let divisions = vec![
            Division { id: 1, name: "Dhaka".into() },
            Division { id: 2, name: "Chattogram".into() },
        ];
        let districts = vec![
            District { id: 10, name: "Dhaka".into(), division_id: 1 },
            District { id: 11, name: "Gazipur".into(), division_id: 1 },
            District { id: 20, name: "Cumilla".into(), division_id: 2 },
        ];
        let upazilas = vec![
            Upazila {
                id: 100,
                name: "Savar".into(),
                district_id: 10,
                lat: Some(23.8583),
                lon: Some(90.2667),
            },
            Upazila {
                id: 101,
                name: "Keraniganj".into(),
                district_id: 10,
                lat: Some(23.7014),
                lon: Some(90.3625),
            },
            Upazila {
                id: 110,
                name: "Kaliakair".into(),
                district_id: 11,
                lat: Some(24.0684),
                lon: Some(90.2168),
            },
            Upazila {
                id: 120,
                name: "Laksam".into(),
                district_id: 20,
                lat: Some(23.2401),
                lon: Some(91.1212),
            },
            Upazila { id: 121, name: "Barura".into(), district_id: 20, lat: None, lon: None },
        ];
        let store = RegionStore::new(divisions, districts, upazilas).unwrap();
        RegionResolver::new(Arc::new(store))
    }

    fn triple(division: u32, district: u32, upazila: u32) -> Resolution {
        Resolution {
            division_id: Some(division),
            district_id: Some(district),
            upazila_id: Some(upazila),
        }
    }

    #[test]
    fn test_no_hints_nearest_chain() {
        let r = fixture();
        let hints = AddressHints::default();
        assert!(hints.is_empty());
        let out = r.resolve(23.70, 90.36, &hints).unwrap();
        assert_eq!(out, triple(1, 10, 101));
    }

    #[test]
    fn test_upazila_hint_sets_whole_chain() {
        let r = fixture();
        let hints = AddressHints { upazila: Some("savar".into()), ..Default::default() };
        // Coordinates point elsewhere; the name hint must win.
        let out = r.resolve(23.24, 91.12, &hints).unwrap();
        assert_eq!(out, triple(1, 10, 100));
    }

    #[test]
    fn test_division_hint_does_not_constrain_nearest() {
        let r = fixture();
        let hints = AddressHints { state: Some("Chattogram".into()), ..Default::default() };
        let out = r.resolve(23.86, 90.26, &hints).unwrap();
        // Division comes from the hint, the rest from geography. The
        // resulting triple is allowed to disagree across levels.
        assert_eq!(out, triple(2, 10, 100));
    }

    #[test]
    fn test_district_hint_backfills_division() {
        let r = fixture();
        let hints = AddressHints { district: Some("cumilla".into()), ..Default::default() };
        let out = r.resolve(23.86, 90.26, &hints).unwrap();
        assert_eq!(out, triple(2, 20, 100));
    }

    #[test]
    fn test_district_hint_narrowed_out_falls_through() {
        let r = fixture();
        let hints = AddressHints {
            state: Some("Dhaka".into()),
            district: Some("Cumilla".into()),
            ..Default::default()
        };
        // "Cumilla" exists, but not inside Dhaka division, so the
        // district hint is dropped and geography supplies the rest.
        let out = r.resolve(23.24, 91.12, &hints).unwrap();
        assert_eq!(out, triple(1, 20, 120));
    }

    #[test]
    fn test_upazila_hint_narrowed_out_falls_through() {
        let r = fixture();
        let hints = AddressHints {
            district: Some("Gazipur".into()),
            upazila: Some("Savar".into()),
            ..Default::default()
        };
        let out = r.resolve(23.86, 90.26, &hints).unwrap();
        // Savar is not in Gazipur; the nearest scan still finds it,
        // but the hinted district is kept.
        assert_eq!(out, triple(1, 11, 100));
    }

    #[test]
    fn test_level_words_stripped_from_hints() {
        let r = fixture();
        let hints = AddressHints { state: Some("dhaka division".into()), ..Default::default() };
        let out = r.resolve(23.24, 91.12, &hints).unwrap();
        assert_eq!(out.division_id, Some(1));
    }

    #[test]
    fn test_unmatched_hints_are_ignored() {
        let r = fixture();
        let hints = AddressHints {
            state: Some("Narnia".into()),
            district: Some("Hogsmeade".into()),
            upazila: Some("  ".into()),
            ..Default::default()
        };
        let out = r.resolve(23.86, 90.26, &hints).unwrap();
        assert_eq!(out, triple(1, 10, 100));
    }

    #[test]
    fn test_boundary_coordinates_accepted() {
        let r = fixture();
        assert!(r.resolve(90.0, 180.0, &AddressHints::default()).is_ok());
        assert!(r.resolve(-90.0, -180.0, &AddressHints::default()).is_ok());
        let out = r.resolve(90.0, 180.0, &AddressHints::default()).unwrap();
        assert!(out.is_complete());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let r = fixture();
        let hints = AddressHints::default();
        assert!(matches!(
            r.resolve(90.0001, 90.0, &hints),
            Err(RegionError::InvalidLatitude(_))
        ));
        assert!(matches!(
            r.resolve(-91.0, 90.0, &hints),
            Err(RegionError::InvalidLatitude(_))
        ));
        assert!(matches!(
            r.resolve(23.0, 180.001, &hints),
            Err(RegionError::InvalidLongitude(_))
        ));
        assert!(matches!(
            r.resolve(f64::NAN, 90.0, &hints),
            Err(RegionError::InvalidLatitude(_))
        ));
        assert!(matches!(
            r.resolve(23.0, f64::NEG_INFINITY, &hints),
            Err(RegionError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let r = fixture();
        let hints = AddressHints { district: Some("dhaka".into()), ..Default::default() };
        let a = r.resolve(23.5, 90.5, &hints).unwrap();
        let b = r.resolve(23.5, 90.5, &hints).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_null_without_hints_or_coordinates_in_store() {
        let divisions = vec![Division { id: 1, name: "Lone".into() }];
        let districts = vec![District { id: 10, name: "Only".into(), division_id: 1 }];
        let upazilas =
            vec![Upazila { id: 100, name: "Uncharted".into(), district_id: 10, lat: None, lon: None }];
        let store = RegionStore::new(divisions, districts, upazilas).unwrap();
        let r = RegionResolver::new(Arc::new(store));

        let out = r.resolve(23.0, 90.0, &AddressHints::default()).unwrap();
        assert_eq!(out, Resolution::default());
    }
}
