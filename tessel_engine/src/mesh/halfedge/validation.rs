// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::prelude::*;

use anyhow::ensure;

/// Checks every structural invariant of the mesh: mate involution, ring and
/// loop closure with unique membership, and the three global circular lists.
/// Intended for tests and debug builds; cost is linear in the mesh but far
/// too high for release hot paths.
///
/// A left face cleared by a partial face zap is accepted; every other
/// deviation is an error.
pub fn check_mesh(mesh: &MeshConnectivity) -> Result<()> {
    let live_halfedges: HashSet<HalfEdgeId> = mesh
        .halfedges
        .keys()
        .filter(|&e| e != mesh.e_head && e != mesh.e_head_sym)
        .collect();

    // Mate involution
    for &e in &live_halfedges {
        let sym = mesh[e].sym;
        ensure!(sym != e, "half-edge {e:?} is its own mate");
        ensure!(
            mesh[sym].sym == e,
            "mate involution broken at {e:?}: sym.sym leads elsewhere"
        );
        ensure!(
            mesh[e].org.is_some(),
            "live half-edge {e:?} has no origin vertex"
        );
    }

    // Global vertex list
    let list_verts = walk_list(
        "vertex",
        mesh.v_head,
        |v| mesh[v].next,
        |v| mesh[v].prev,
    )?;
    ensure!(
        list_verts.len() == mesh.num_vertices(),
        "global vertex list holds {} vertices, the arena {}",
        list_verts.len(),
        mesh.num_vertices()
    );

    // Global face list
    let list_faces = walk_list("face", mesh.f_head, |f| mesh[f].next, |f| mesh[f].prev)?;
    ensure!(
        list_faces.len() == mesh.num_faces(),
        "global face list holds {} faces, the arena {}",
        list_faces.len(),
        mesh.num_faces()
    );

    // Global edge list. The forward link is `next`; the reverse link of a
    // pair is stored in `sym.next`.
    let list_edges = walk_list(
        "edge",
        mesh.e_head,
        |e| mesh[e].next,
        |e| {
            let sym = mesh[e].sym;
            let prev_sym = mesh[sym].next;
            mesh[prev_sym].sym
        },
    )?;
    ensure!(
        list_edges.len() * 2 == mesh.num_halfedges(),
        "global edge list holds {} pairs, the arena {}",
        list_edges.len(),
        mesh.num_edges()
    );
    for &e in &list_edges {
        ensure!(
            !list_edges.contains(&mesh[e].sym),
            "both halves of the pair at {e:?} sit in the primary edge list"
        );
    }

    // Rotational rings: every live half-edge belongs to exactly one ring,
    // the one anchored at its origin
    let mut ring_of = HashMap::new();
    for &v in &list_verts {
        let h0 = mesh[v]
            .halfedge
            .with_context(|| format!("vertex {v:?} has no incident half-edge"))?;
        for e in bounded_walk(h0, |e| mesh[e].onext)
            .with_context(|| format!("rotational ring of {v:?} does not close"))?
        {
            ensure!(
                mesh[e].org == Some(v),
                "half-edge {e:?} sits in the ring of {v:?} but has a different origin"
            );
            ensure!(
                ring_of.insert(e, v).is_none(),
                "half-edge {e:?} appears in two rotational rings"
            );
        }
    }
    ensure!(
        ring_of.len() == live_halfedges.len(),
        "{} of {} half-edges are reachable from their origin's ring",
        ring_of.len(),
        live_halfedges.len()
    );

    // Face loops: every half-edge with an uncleared left face belongs to
    // exactly one loop, the one anchored at that face
    let mut loop_of = HashMap::new();
    for &f in &list_faces {
        let h0 = mesh[f]
            .halfedge
            .with_context(|| format!("face {f:?} has no incident half-edge"))?;
        for e in bounded_walk(h0, |e| mesh[e].lnext)
            .with_context(|| format!("boundary loop of {f:?} does not close"))?
        {
            ensure!(
                mesh[e].lface == Some(f),
                "half-edge {e:?} sits in the loop of {f:?} but has a different left face"
            );
            ensure!(
                loop_of.insert(e, f).is_none(),
                "half-edge {e:?} appears in two face loops"
            );
        }
    }
    let with_lface = live_halfedges
        .iter()
        .filter(|&&e| mesh[e].lface.is_some())
        .count();
    ensure!(
        loop_of.len() == with_lface,
        "{} of {} half-edges are reachable from their left face's loop",
        loop_of.len(),
        with_lface
    );

    Ok(())
}

/// Walks a circular list from its head, checking closure and the agreement
/// of the forward and reverse links. Returns the visited entries, head
/// excluded.
fn walk_list<Id: Copy + Eq + std::hash::Hash + std::fmt::Debug>(
    what: &str,
    head: Id,
    next: impl Fn(Id) -> Id,
    prev: impl Fn(Id) -> Id,
) -> Result<HashSet<Id>> {
    let mut seen = HashSet::new();
    let mut cur = head;
    loop {
        let n = next(cur);
        ensure!(
            prev(n) == cur,
            "global {what} list reverse link broken between {cur:?} and {n:?}"
        );
        if n == head {
            break;
        }
        ensure!(
            seen.insert(n),
            "global {what} list revisits {n:?} before closing"
        );
        ensure!(
            seen.len() <= MAX_LOOP_ITERATIONS,
            "global {what} list does not close"
        );
        cur = n;
    }
    Ok(seen)
}

/// Follows `step` from `start` until it returns to `start`, or fails after
/// too many hops.
fn bounded_walk(
    start: HalfEdgeId,
    step: impl Fn(HalfEdgeId) -> HalfEdgeId,
) -> Result<Vec<HalfEdgeId>> {
    let mut out = vec![start];
    let mut e = step(start);
    while e != start {
        ensure!(out.len() <= MAX_LOOP_ITERATIONS, "walk from {start:?} does not close");
        out.push(e);
        e = step(e);
    }
    Ok(out)
}
