//! Face extraction from a noded line network.
//!
//! Model
//! - Nodes are keyed by exact coordinates; the input must already be noded
//!   (e.g. the output of `noding::union_lines`).
//! - Dangles (degree-1 chains) and cut edges (both sides on the same ring) bound
//!   no area and are removed until none remain.
//! - Rings are traced with the face on the left: at each node the walk leaves
//!   along the edge immediately clockwise of the one it arrived on.
//! - Counter-clockwise rings are shells. Clockwise rings outline connected
//!   components and become holes of the smallest shell of another component
//!   that contains them; uncontained outlines are discarded.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::types::{coord_key, point_in_ring, ring_signed_area, Coord, Envelope, Geometry, Polygon};

type Edge = (usize, usize);

/// Polygonal faces enclosed by `lines`, as a (possibly empty) `MultiPolygon`.
pub fn polygonize(lines: &Geometry) -> Geometry {
    let mut nodes: Vec<Coord> = Vec::new();
    let mut index: HashMap<(u64, u64), usize> = HashMap::new();
    let mut node_id = |c: Coord| -> usize {
        *index.entry(coord_key(c)).or_insert_with(|| {
            nodes.push(c);
            nodes.len() - 1
        })
    };
    let mut edges: BTreeSet<Edge> = BTreeSet::new();
    for (p, q) in lines.segments() {
        let (a, b) = (node_id(p), node_id(q));
        if a != b {
            edges.insert((a.min(b), a.max(b)));
        }
    }

    let rings = loop {
        prune_dangles(&mut edges, nodes.len());
        let adj = sorted_adjacency(&edges, &nodes);
        let rings = trace_rings(&edges, &adj);
        let cuts = cut_edges(&rings);
        if cuts.is_empty() {
            break rings;
        }
        for e in cuts {
            edges.remove(&e);
        }
    };

    let component = components(&edges, nodes.len());
    let mut shells: Vec<(Polygon, f64, Envelope, usize)> = Vec::new();
    let mut holes: Vec<(Vec<Coord>, usize)> = Vec::new();
    for ring in &rings {
        let Some(&(first, _)) = ring.first() else {
            continue;
        };
        let mut coords: Vec<Coord> = ring.iter().map(|&(u, _)| nodes[u]).collect();
        coords.push(nodes[first]);
        let area = ring_signed_area(&coords);
        let comp = component[first];
        if area > 0.0 {
            let Some(env) = Envelope::of_coords(coords.iter().copied()) else {
                continue;
            };
            shells.push((Polygon::new(coords, Vec::new()), area, env, comp));
        } else if area < 0.0 {
            holes.push((coords, comp));
        }
    }

    let mut n_holes = 0usize;
    for (hole, comp) in holes {
        let Some(env) = Envelope::of_coords(hole.iter().copied()) else {
            continue;
        };
        let probe = hole[0];
        let owner = shells
            .iter()
            .enumerate()
            .filter(|(_, (shell, _, shell_env, shell_comp))| {
                *shell_comp != comp
                    && shell_env.covers_envelope(&env)
                    && point_in_ring(probe, &shell.exterior)
            })
            .min_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
            .map(|(k, _)| k);
        if let Some(k) = owner {
            shells[k].0.interiors.push(hole);
            n_holes += 1;
        }
    }

    tracing::debug!(shells = shells.len(), holes = n_holes, "polygonize");
    Geometry::MultiPolygon(shells.into_iter().map(|(p, _, _, _)| p).collect())
}

fn prune_dangles(edges: &mut BTreeSet<Edge>, n_nodes: usize) {
    loop {
        let mut degree = vec![0usize; n_nodes];
        for &(a, b) in edges.iter() {
            degree[a] += 1;
            degree[b] += 1;
        }
        let before = edges.len();
        edges.retain(|&(a, b)| degree[a] > 1 && degree[b] > 1);
        if edges.len() == before {
            return;
        }
    }
}

/// Neighbours of every node, sorted counter-clockwise by direction angle.
fn sorted_adjacency(edges: &BTreeSet<Edge>, nodes: &[Coord]) -> Vec<Vec<usize>> {
    let mut adj = vec![Vec::new(); nodes.len()];
    for &(a, b) in edges {
        adj[a].push(b);
        adj[b].push(a);
    }
    for (v, out) in adj.iter_mut().enumerate() {
        let o = nodes[v];
        let angle = |w: usize| {
            let d = nodes[w] - o;
            d.y.atan2(d.x)
        };
        out.sort_by(|&p, &q| angle(p).total_cmp(&angle(q)));
    }
    adj
}

/// Every directed edge belongs to exactly one traced ring.
fn trace_rings(edges: &BTreeSet<Edge>, adj: &[Vec<usize>]) -> Vec<Vec<Edge>> {
    let mut visited: HashSet<Edge> = HashSet::new();
    let mut rings = Vec::new();
    for &(a, b) in edges {
        for start in [(a, b), (b, a)] {
            if visited.contains(&start) {
                continue;
            }
            let mut ring = Vec::new();
            let (mut u, mut v) = start;
            loop {
                visited.insert((u, v));
                ring.push((u, v));
                let out = &adj[v];
                let Some(idx) = out.iter().position(|&w| w == u) else {
                    break;
                };
                let w = out[(idx + out.len() - 1) % out.len()];
                (u, v) = (v, w);
                if (u, v) == start {
                    break;
                }
            }
            rings.push(ring);
        }
    }
    rings
}

/// Edges traversed in both directions by the same ring.
fn cut_edges(rings: &[Vec<Edge>]) -> Vec<Edge> {
    let mut cuts = Vec::new();
    for ring in rings {
        let members: HashSet<Edge> = ring.iter().copied().collect();
        for &(u, v) in ring {
            if u < v && members.contains(&(v, u)) {
                cuts.push((u, v));
            }
        }
    }
    cuts
}

/// Connected-component label per node (union-find).
fn components(edges: &BTreeSet<Edge>, n_nodes: usize) -> Vec<usize> {
    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }
    let mut parent: Vec<usize> = (0..n_nodes).collect();
    for &(a, b) in edges {
        let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
        if ra != rb {
            parent[ra.max(rb)] = ra.min(rb);
        }
    }
    (0..n_nodes).map(|x| find(&mut parent, x)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(pairs: &[((f64, f64), (f64, f64))]) -> Geometry {
        Geometry::MultiLineString(
            pairs
                .iter()
                .map(|&((x0, y0), (x1, y1))| vec![Coord::new(x0, y0), Coord::new(x1, y1)])
                .collect(),
        )
    }

    fn square(x: f64, y: f64, s: f64) -> Vec<((f64, f64), (f64, f64))> {
        vec![
            ((x, y), (x + s, y)),
            ((x + s, y), (x + s, y + s)),
            ((x + s, y + s), (x, y + s)),
            ((x, y + s), (x, y)),
        ]
    }

    #[test]
    fn square_with_diagonal_gives_two_triangles() {
        let mut pairs = square(0.0, 0.0, 1.0);
        pairs.push(((0.0, 0.0), (1.0, 1.0)));
        let g = polygonize(&segs(&pairs));
        let polys = g.polygons();
        assert_eq!(polys.len(), 2);
        for p in polys {
            assert!((p.area() - 0.5).abs() < 1e-12);
            assert_eq!(p.exterior.len(), 4);
        }
    }

    #[test]
    fn dangles_and_cut_edges_are_ignored() {
        let mut pairs = square(0.0, 0.0, 1.0);
        pairs.extend(square(3.0, 0.0, 1.0));
        // bridge between the squares (cut edge) and a dangling spur
        pairs.push(((1.0, 0.5), (3.0, 0.5)));
        pairs.push(((0.0, 1.0), (-1.0, 2.0)));
        // split the square sides at the bridge ends
        pairs.retain(|s| *s != ((1.0, 0.0), (1.0, 1.0)) && *s != ((3.0, 1.0), (3.0, 0.0)));
        pairs.push(((1.0, 0.0), (1.0, 0.5)));
        pairs.push(((1.0, 0.5), (1.0, 1.0)));
        pairs.push(((3.0, 1.0), (3.0, 0.5)));
        pairs.push(((3.0, 0.5), (3.0, 0.0)));
        let g = polygonize(&segs(&pairs));
        assert_eq!(g.polygons().len(), 2);
        assert!((g.area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn disconnected_inner_ring_becomes_hole() {
        let mut pairs = square(0.0, 0.0, 4.0);
        pairs.extend(square(1.0, 1.0, 1.0));
        let g = polygonize(&segs(&pairs));
        let polys = g.polygons();
        assert_eq!(polys.len(), 2);
        let outer = polys
            .iter()
            .find(|p| !p.interiors.is_empty())
            .expect("outer face with hole");
        assert!((outer.area() - 15.0).abs() < 1e-12);
        assert!((g.area() - 16.0).abs() < 1e-12);
    }

    #[test]
    fn open_lines_give_nothing() {
        let g = polygonize(&segs(&[((0.0, 0.0), (1.0, 0.0)), ((1.0, 0.0), (1.0, 1.0))]));
        assert!(g.polygons().is_empty());
    }
}
