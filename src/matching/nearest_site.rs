// src/matching/nearest_site.rs
// "Which site is closest to me?" using great-circle distance.

use log::debug;

use crate::corpus::CorpusIndex;
use crate::models::{LocationRecord, NearbySite, NearestSiteReport};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two lat/lon points.
pub fn calculate_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let (delta_phi, delta_lambda) = ((lat2 - lat1).to_radians(), (lon2 - lon1).to_radians());
    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

fn nearby_site(site: &LocationRecord, distance_km: f64) -> NearbySite {
    NearbySite {
        site_name: site.site_name.clone(),
        rsrp_range_1: site.rsrp_above_105.clone(),
        rsrp_range_2: site.rsrp_105_to_110.clone(),
        rsrp_range_3: site.rsrp_110_to_115.clone(),
        rsrp_below_115: site.rsrp_below_115.clone(),
        distance_km,
    }
}

/// The single nearest site plus every site within `radius_km`. When nothing is
/// inside the radius the list holds just the nearest site. `None` when no site
/// has usable coordinates or the query point is not finite.
///
/// This metric is independent of the degree-unit proximity test used for
/// location context.
pub fn find_nearest_site(
    corpus: &CorpusIndex,
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> Option<NearestSiteReport> {
    if !lat.is_finite() || !lon.is_finite() {
        debug!("Ignoring non-finite query point ({}, {})", lat, lon);
        return None;
    }

    let mut nearest: Option<NearbySite> = None;
    let mut nearby_sites = Vec::new();

    for site in corpus.locations() {
        let (Some(site_lat), Some(site_lon)) = (site.latitude, site.longitude) else {
            debug!("Skipping site {} without usable coordinates", site.site_name);
            continue;
        };
        let distance = calculate_distance_km(lat, lon, site_lat, site_lon);
        let info = nearby_site(site, distance);

        if nearest.as_ref().map_or(true, |best| distance < best.distance_km) {
            nearest = Some(info.clone());
        }
        if distance <= radius_km {
            nearby_sites.push(info);
        }
    }

    let nearest_site = nearest?;
    if nearby_sites.is_empty() {
        nearby_sites.push(nearest_site.clone());
    }

    Some(NearestSiteReport {
        nearest_site,
        nearby_sites,
    })
}
