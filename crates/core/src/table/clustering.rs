//! Tolerance-based clustering for table extraction.
//!
//! Two flavours live here. `cluster_objects` sorts its input by key and
//! splits it wherever consecutive keys are further apart than the
//! tolerance. `deduplicate_intersections` is a greedy first-match clustering
//! that keeps the input order: each point joins the first cluster holding a
//! member within tolerance, so ambiguous inputs cluster differently when
//! reordered. Callers must feed points in a reproducible order.

use std::collections::BTreeSet;

use tracing::trace;

use crate::utils::{cmp_f64, round_to_eighth};

use super::geometry::Point;
use super::types::IntersectionPoint;

/// Cluster objects by a key, returning groups in ascending key order.
pub fn cluster_objects<T: Clone, F: Fn(&T) -> f64>(
    xs: &[T],
    key_fn: F,
    tolerance: f64,
) -> Vec<Vec<T>> {
    let mut keyed: Vec<(f64, &T)> = xs.iter().map(|x| (key_fn(x), x)).collect();
    keyed.sort_by(|a, b| cmp_f64(a.0, b.0));

    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut last: Option<f64> = None;
    for (key, item) in keyed {
        match (last, groups.last_mut()) {
            (Some(prev), Some(group)) if key <= prev + tolerance => group.push(item.clone()),
            _ => groups.push(vec![item.clone()]),
        }
        last = Some(key);
    }
    groups
}

/// Average of points with each axis rounded to the nearest 1/8 unit.
pub(crate) fn rounded_mean(points: impl Iterator<Item = Point>) -> Point {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut n = 0usize;
    for p in points {
        sum_x += p.x;
        sum_y += p.y;
        n += 1;
    }
    if n == 0 {
        return Point::default();
    }
    Point::new(
        round_to_eighth(sum_x / n as f64),
        round_to_eighth(sum_y / n as f64),
    )
}

/// Collapse near-duplicate intersection points.
///
/// Each point joins the first existing cluster that has any member within
/// `tolerance` of it (first match, not nearest), otherwise it starts a new
/// cluster. Every cluster becomes one point at the rounded mean of its
/// members, owning the union of their lines. Output order follows the order
/// in which clusters were started.
pub fn deduplicate_intersections(
    points: &[IntersectionPoint],
    tolerance: f64,
) -> Vec<IntersectionPoint> {
    let mut clusters: Vec<Vec<&IntersectionPoint>> = Vec::new();
    for point in points {
        let existing = clusters.iter_mut().find(|cluster| {
            cluster
                .iter()
                .any(|member| member.midpoint.distance(&point.midpoint) <= tolerance)
        });
        match existing {
            Some(cluster) => cluster.push(point),
            None => clusters.push(vec![point]),
        }
    }

    trace!(
        points = points.len(),
        clusters = clusters.len(),
        "deduplicated intersections"
    );

    clusters
        .into_iter()
        .map(|cluster| {
            let midpoint = rounded_mean(cluster.iter().map(|p| p.midpoint));
            let lines: BTreeSet<_> = cluster
                .iter()
                .flat_map(|p| p.lines.iter().copied())
                .collect();
            IntersectionPoint { midpoint, lines }
        })
        .collect()
}
