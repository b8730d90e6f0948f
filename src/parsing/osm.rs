//! OSM element to building polygon conversion
//!
//! Handles ways (closed outlines) and `type=multipolygon` relations (outer
//! members only), plus entrance nodes.

use super::elements::RawElement;
use super::{Conversion, ConversionStats};
use crate::geometry::{is_closed_ring, BuildingFeature, BuildingGeometry, EntrancePoint, LonLat, Ring};
use std::collections::HashMap;

/// Convert raw OSM elements into church buildings and entrance points.
///
/// Malformed geometry skips the affected feature only; the skip counts end
/// up in [`ConversionStats`].
pub fn convert(elements: &[RawElement]) -> Conversion {
    let mut stats = ConversionStats::default();

    // 1. Node index and entrances
    let mut node_index: HashMap<i64, LonLat> = HashMap::new();
    let mut entrances = Vec::new();
    for element in elements {
        if let RawElement::Node { id, lon, lat, tags } = element {
            node_index.insert(*id, [*lon, *lat]);
            if let Some(kind) = tags.entrance_kind() {
                entrances.push(EntrancePoint { id: Some(*id), lon: *lon, lat: *lat, kind });
            }
        }
    }

    // 2. Resolve every way into a ring; relation members may point at untagged ways
    let mut way_rings: HashMap<i64, Ring> = HashMap::new();
    let mut buildings = Vec::new();
    for element in elements {
        let RawElement::Way { id, nodes, tags } = element else {
            continue;
        };
        stats.ways += 1;

        let ring: Ring = nodes
            .iter()
            .filter_map(|node_id| {
                let position = node_index.get(node_id).copied();
                if position.is_none() {
                    stats.unresolved_node_refs += 1;
                }
                position
            })
            .collect();

        if tags.is_church() {
            if is_closed_ring(&ring) {
                buildings.push(BuildingFeature {
                    id: Some(format!("way/{}", id)),
                    name: tags.display_name(),
                    tags: tags.clone(),
                    geometry: BuildingGeometry::Polygon(vec![ring.clone()]),
                });
            } else {
                log::debug!("Skipping church way {}: ring with {} points is not closed", id, ring.len());
                stats.skipped_unclosed += 1;
            }
        }
        way_rings.insert(*id, ring);
    }

    // 3. Multipolygon relations; inner members are ignored
    for element in elements {
        let RawElement::Relation { id, members, tags } = element else {
            continue;
        };
        stats.relations += 1;
        if !tags.is_multipolygon() || !tags.is_church() {
            continue;
        }

        let outers: Vec<Vec<Ring>> = members
            .iter()
            .filter(|member| member.is_outer_way())
            .filter_map(|member| way_rings.get(&member.reference))
            .filter(|ring| is_closed_ring(ring))
            .map(|ring| vec![ring.clone()])
            .collect();

        if outers.is_empty() {
            log::debug!("Skipping church relation {}: no closed outer ring", id);
            stats.skipped_no_outer += 1;
            continue;
        }

        buildings.push(BuildingFeature {
            id: Some(format!("relation/{}", id)),
            name: tags.display_name(),
            tags: tags.clone(),
            geometry: BuildingGeometry::MultiPolygon(outers),
        });
    }

    stats.buildings = buildings.len();
    stats.entrances = entrances.len();

    Conversion { buildings, entrances, stats }
}
