// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Constructive geometry on filled regions
//!
//! Curved outlines are flattened to polygons (via `kurbo`) and combined with
//! boolean operations and offsetting (via `geo`). A [`Region`] is a set of
//! polygons with holes; coordinates are in model space (y up).

use geo::{Area, BooleanOps, BoundingRect, Buffer, Coord, LineString, MultiPolygon, Polygon};
use kurbo::{BezPath, PathEl, Point, Rect};
use std::f64::consts::TAU;

/// A filled region
pub type Region = MultiPolygon<f64>;

/// The empty region
pub fn empty() -> Region {
    MultiPolygon::new(vec![])
}

fn coord(p: Point) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

fn finish_contour(contours: &mut Vec<LineString<f64>>, current: &mut Vec<Coord<f64>>) {
    if current.len() >= 3 {
        contours.push(LineString::new(std::mem::take(current)));
    } else {
        current.clear();
    }
}

/// Flatten a path into closed polylines
///
/// Every subpath is treated as closed. Subpaths with fewer than three
/// vertices are dropped.
pub fn flatten_contours(path: &BezPath, tolerance: f64) -> Vec<LineString<f64>> {
    let mut contours = Vec::new();
    let mut current = Vec::new();
    kurbo::flatten(path.iter(), tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            finish_contour(&mut contours, &mut current);
            current.push(coord(p));
        }
        PathEl::LineTo(p) => current.push(coord(p)),
        PathEl::ClosePath => finish_contour(&mut contours, &mut current),
        // flatten yields only lines
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    finish_contour(&mut contours, &mut current);
    contours
}

/// Resolve the filled region of a set of contours
///
/// Font outlines mark holes by winding direction: the largest contour is an
/// outer boundary and fixes the "fill" direction. Contours are applied from
/// largest to smallest, each added to the region if wound like the outer
/// boundary or cut from it otherwise. This handles holes, islands within
/// holes and overlapping outer contours.
pub fn fill_region(contours: Vec<LineString<f64>>) -> Region {
    let mut polygons: Vec<(f64, Polygon<f64>)> = contours
        .into_iter()
        .map(|ring| {
            let polygon = Polygon::new(ring, vec![]);
            (polygon.signed_area(), polygon)
        })
        .filter(|(area, _)| *area != 0.0 && area.is_finite())
        .collect();
    polygons.sort_by(|a, b| b.0.abs().total_cmp(&a.0.abs()));

    let Some(fill_sign) = polygons.first().map(|(area, _)| area.signum()) else {
        return empty();
    };

    let mut region = empty();
    for (area, polygon) in polygons {
        let polygon = MultiPolygon::new(vec![polygon]);
        if area.signum() == fill_sign {
            region = if region.0.is_empty() {
                polygon
            } else {
                region.union(&polygon)
            };
        } else if !region.0.is_empty() {
            region = region.difference(&polygon);
        }
    }
    region
}

/// Union of all regions
pub fn union_all(regions: impl IntoIterator<Item = Region>) -> Region {
    regions.into_iter().fold(empty(), |acc, region| {
        if acc.0.is_empty() {
            region
        } else if region.0.is_empty() {
            acc
        } else {
            acc.union(&region)
        }
    })
}

/// Offset a region outwards by `distance`
///
/// Corners are rounded. The empty region stays empty.
pub fn offset(region: &Region, distance: f64) -> Region {
    if region.0.is_empty() {
        return empty();
    }
    region.buffer(distance)
}

/// A disc, approximated by a regular polygon with `segments` sides
pub fn disc(centre: Point, radius: f64, segments: u32) -> Polygon<f64> {
    let n = segments.max(3);
    let ring: Vec<Coord<f64>> = (0..n)
        .map(|i| {
            let theta = TAU * f64::from(i) / f64::from(n);
            Coord {
                x: centre.x + radius * theta.cos(),
                y: centre.y + radius * theta.sin(),
            }
        })
        .collect();
    Polygon::new(LineString::new(ring), vec![])
}

/// Bounding box of a region
pub fn bounds(region: &Region) -> Option<Rect> {
    region
        .bounding_rect()
        .map(|r| Rect::new(r.min().x, r.min().y, r.max().x, r.max().y))
}

/// True if every vertex of the region is finite
pub fn is_finite(region: &Region) -> bool {
    region.0.iter().all(|polygon| {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .flat_map(|ring| ring.coords())
            .all(|c| c.x.is_finite() && c.y.is_finite())
    })
}

/// Convert a region to a path of closed polygons
pub fn to_path(region: &Region) -> BezPath {
    let mut path = BezPath::new();
    for polygon in &region.0 {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            let mut coords = ring.coords();
            let Some(first) = coords.next() else {
                continue;
            };
            path.move_to((first.x, first.y));
            // rings are stored closed; the closing vertex is implied
            let rest: Vec<_> = coords.collect();
            let n = if rest.last() == Some(&first) {
                rest.len() - 1
            } else {
                rest.len()
            };
            for c in &rest[..n] {
                path.line_to((c.x, c.y));
            }
            path.close_path();
        }
    }
    path
}

#[cfg(test)]
mod test {
    use super::*;
    use geo::Area;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64, ccw: bool) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((x0, y0));
        if ccw {
            path.line_to((x1, y0));
            path.line_to((x1, y1));
            path.line_to((x0, y1));
        } else {
            path.line_to((x0, y1));
            path.line_to((x1, y1));
            path.line_to((x1, y0));
        }
        path.close_path();
        path
    }

    #[test]
    fn hole_by_winding() {
        let mut path = square(0.0, 0.0, 10.0, 10.0, false);
        path.extend(square(2.0, 2.0, 8.0, 8.0, true).iter());
        let region = fill_region(flatten_contours(&path, 0.1));
        assert!((region.unsigned_area() - 64.0).abs() < 1e-9);
        assert_eq!(region.0.len(), 1);
        assert_eq!(region.0[0].interiors().len(), 1);
    }

    #[test]
    fn island_in_hole() {
        let mut path = square(0.0, 0.0, 10.0, 10.0, true);
        path.extend(square(2.0, 2.0, 8.0, 8.0, false).iter());
        path.extend(square(4.0, 4.0, 6.0, 6.0, true).iter());
        let region = fill_region(flatten_contours(&path, 0.1));
        assert!((region.unsigned_area() - (100.0 - 36.0 + 4.0)).abs() < 1e-9);
    }

    #[test]
    fn overlapping_outers() {
        let mut path = square(0.0, 0.0, 4.0, 4.0, true);
        path.extend(square(2.0, 0.0, 6.0, 4.0, true).iter());
        let region = fill_region(flatten_contours(&path, 0.1));
        assert!((region.unsigned_area() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_contours() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 1.0));
        path.close_path();
        assert!(flatten_contours(&path, 0.1).is_empty());
        assert!(fill_region(vec![]).0.is_empty());
    }

    #[test]
    fn disc_area() {
        let d = MultiPolygon::new(vec![disc(Point::new(-40.0, 50.0), 25.0, 256)]);
        let exact = std::f64::consts::PI * 625.0;
        assert!((d.unsigned_area() - exact).abs() / exact < 1e-3);
        let b = bounds(&d).unwrap();
        assert!((b.x0 + 65.0).abs() < 1e-9 && (b.x1 + 15.0).abs() < 1e-9);
    }

    #[test]
    fn offset_grows() {
        let region = fill_region(flatten_contours(&square(0.0, 0.0, 10.0, 10.0, true), 0.1));
        let grown = offset(&region, 2.0);
        let b = bounds(&grown).unwrap();
        assert!(b.x0 < -1.9 && b.y0 < -1.9 && b.x1 > 11.9 && b.y1 > 11.9);
        assert!(grown.unsigned_area() > region.unsigned_area());
        assert!(offset(&empty(), 5.0).0.is_empty());
    }

    #[test]
    fn union_and_path() {
        let a = fill_region(flatten_contours(&square(0.0, 0.0, 2.0, 2.0, true), 0.1));
        let b = fill_region(flatten_contours(&square(5.0, 0.0, 7.0, 2.0, true), 0.1));
        let u = union_all([a, b, empty()]);
        assert_eq!(u.0.len(), 2);
        assert!(is_finite(&u));

        let path = to_path(&u);
        let closes = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::ClosePath))
            .count();
        assert_eq!(closes, 2);
    }
}
