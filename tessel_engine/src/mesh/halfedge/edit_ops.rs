// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::prelude::*;

/// Creates one edge, two vertices, and a loop (face). The loop consists of
/// the two new half-edges.
pub fn make_edge(mesh: &mut MeshConnectivity) -> HalfEdgeId {
    let e_head = mesh.e_head;
    let e = mesh.make_edge_pair(e_head);
    let e_sym = mesh[e].sym;

    let v_head = mesh.v_head;
    let f_head = mesh.f_head;
    mesh.make_vertex(e, v_head);
    mesh.make_vertex(e_sym, v_head);
    mesh.make_face(e, f_head);

    e
}

/// The basic operation for changing mesh connectivity. Exchanges
/// `e_org.onext` and `e_dst.onext` and keeps the vertex and face records
/// consistent with the rings that produces:
///
/// - if the two origins differ, their rings merge and `e_dst`'s vertex is
///   destroyed; if they are the same, the ring splits and `e_dst`'s side
///   gets a fresh vertex.
/// - independently and symmetrically for the left faces, keyed on whether
///   `e_org.lface == e_dst.lface`.
///
/// In both cases `e_dst`'s side is the one whose record changes; `e_org`'s
/// vertex and face survive. Calling with `e_org == e_dst` has no effect.
///
/// Some special cases:
/// If `e_dst == e_org.lnext`, the new face will have a single edge.
/// If `e_dst == lprev(e_org)`, the old face will have a single edge.
/// If `e_dst == e_org.onext`, the new vertex will have a single edge.
/// If `e_dst == oprev(e_org)`, the old vertex will have a single edge.
pub fn splice(mesh: &mut MeshConnectivity, e_org: HalfEdgeId, e_dst: HalfEdgeId) {
    if e_org == e_dst {
        return;
    }

    let mut joining_vertices = false;
    let mut joining_loops = false;

    let e_org_org = mesh[e_org].org.expect("Live half-edge should have an origin");
    let e_dst_org = mesh[e_dst].org.expect("Live half-edge should have an origin");
    let e_org_lface = mesh[e_org]
        .lface
        .expect("Live half-edge should have a left face");
    let e_dst_lface = mesh[e_dst]
        .lface
        .expect("Live half-edge should have a left face");

    if e_dst_org != e_org_org {
        // Merging two disjoint vertices -- destroy e_dst's
        joining_vertices = true;
        mesh.kill_vertex(e_dst_org, Some(e_org_org));
    }
    if e_dst_lface != e_org_lface {
        // Connecting two disjoint loops -- destroy e_dst's
        joining_loops = true;
        mesh.kill_face(e_dst_lface, Some(e_org_lface));
    }

    mesh.splice_raw(e_dst, e_org);

    if !joining_vertices {
        // One vertex was split in two; the new vertex is e_dst's. Make sure
        // the old vertex points to a valid half-edge afterwards.
        mesh.make_vertex(e_dst, e_org_org);
        mesh[e_org_org].halfedge = Some(e_org);
    }
    if !joining_loops {
        // One loop was split in two; the new loop is e_dst's. Make sure the
        // old face points to a valid half-edge afterwards.
        mesh.make_face(e_dst, e_org_lface);
        mesh[e_org_lface].halfedge = Some(e_org);
    }
}

/// Removes the edge `e_del` (both halves). If its two sides bound distinct
/// faces, the faces are joined and `e_del`'s left face is destroyed;
/// otherwise the loop is split in two, and the new loop is on `e_del`'s
/// destination side. Endpoint vertices left isolated by the removal are
/// destroyed as well.
///
/// This could be written as two calls to [`splice`] plus the final release,
/// but that would acquire and release vertices and faces needlessly.
pub fn delete_edge(mesh: &mut MeshConnectivity, e_del: HalfEdgeId) {
    let e_del_sym = mesh[e_del].sym;
    let mut joining_loops = false;

    // First step: disconnect the origin vertex. All changes below keep the
    // mesh consistent in this intermediate state before the destination
    // side is touched.
    let e_del_lface = mesh[e_del]
        .lface
        .expect("Live half-edge should have a left face");
    let e_del_rface = mesh
        .rface(e_del)
        .expect("Live half-edge should have a right face");
    if e_del_lface != e_del_rface {
        // Joining two loops into one -- remove the left face
        joining_loops = true;
        mesh.kill_face(e_del_lface, Some(e_del_rface));
    }

    if mesh[e_del].onext == e_del {
        let org = mesh[e_del].org.expect("Live half-edge should have an origin");
        mesh.kill_vertex(org, None);
    } else {
        // Make sure e_del's origin and right face point to valid half-edges
        let e_del_oprev = mesh.oprev(e_del);
        let rface = mesh
            .rface(e_del)
            .expect("Live half-edge should have a right face");
        mesh[rface].halfedge = Some(e_del_oprev);
        let org = mesh[e_del].org.expect("Live half-edge should have an origin");
        let e_del_onext = mesh[e_del].onext;
        mesh[org].halfedge = Some(e_del_onext);

        mesh.splice_raw(e_del, e_del_oprev);

        if !joining_loops {
            // Splitting one loop into two -- give e_del its own loop
            let lface = mesh[e_del]
                .lface
                .expect("Live half-edge should have a left face");
            mesh.make_face(e_del, lface);
        }
    }

    // The mesh is now consistent, except that e_del's origin may be gone.
    // Second step: disconnect the destination vertex.
    if mesh[e_del_sym].onext == e_del_sym {
        let org = mesh[e_del_sym]
            .org
            .expect("Live half-edge should have an origin");
        mesh.kill_vertex(org, None);
        let lface = mesh[e_del_sym]
            .lface
            .expect("Live half-edge should have a left face");
        mesh.kill_face(lface, None);
    } else {
        // Make sure e_del's destination and left face point to valid
        // half-edges
        let lface = mesh[e_del]
            .lface
            .expect("Live half-edge should have a left face");
        let e_del_sym_oprev = mesh.oprev(e_del_sym);
        mesh[lface].halfedge = Some(e_del_sym_oprev);
        let org = mesh[e_del_sym]
            .org
            .expect("Live half-edge should have an origin");
        let e_del_sym_onext = mesh[e_del_sym].onext;
        mesh[org].halfedge = Some(e_del_sym_onext);
        mesh.splice_raw(e_del_sym, e_del_sym_oprev);
    }

    // Any isolated vertices or faces have already been released
    mesh.kill_edge(e_del);
}

/// Creates a new edge `e_new` such that `e_new == e_org.lnext` and the
/// destination of `e_new` is a newly created vertex. `e_org` and `e_new`
/// share a left face.
pub fn add_edge_vertex(mesh: &mut MeshConnectivity, e_org: HalfEdgeId) -> HalfEdgeId {
    let e_new = mesh.make_edge_pair(e_org);
    let e_new_sym = mesh[e_new].sym;

    // Connect the new edge appropriately
    let e_org_lnext = mesh[e_org].lnext;
    mesh.splice_raw(e_new, e_org_lnext);

    // Set the vertex and face information
    let e_org_dst = mesh
        .dst(e_org)
        .expect("Live half-edge should have a destination");
    mesh[e_new].org = Some(e_org_dst);

    mesh.make_vertex(e_new_sym, e_org_dst);

    let lface = mesh[e_org]
        .lface
        .expect("Live half-edge should have a left face");
    mesh[e_new].lface = Some(lface);
    mesh[e_new_sym].lface = Some(lface);

    e_new
}

/// Splits `e_org` into two edges `e_org` and `e_new` joined by a newly
/// created vertex, such that `e_new == e_org.lnext`. Both resulting edges
/// keep the winding of the original (the value is copied onto both pieces,
/// not divided), and the right face assignment is preserved.
pub fn split_edge(mesh: &mut MeshConnectivity, e_org: HalfEdgeId) -> HalfEdgeId {
    let temp_half_edge = add_edge_vertex(mesh, e_org);
    let e_new = mesh[temp_half_edge].sym;

    // Disconnect e_org from its destination and connect it to e_new's origin
    let e_org_sym = mesh[e_org].sym;
    let e_org_sym_oprev = mesh.oprev(e_org_sym);
    mesh.splice_raw(e_org_sym, e_org_sym_oprev);
    mesh.splice_raw(e_org_sym, e_new);

    // Set the vertex and face information
    let e_new_org = mesh[e_new].org.expect("Live half-edge should have an origin");
    mesh[e_org_sym].org = Some(e_new_org);
    let e_new_dst = mesh
        .dst(e_new)
        .expect("Live half-edge should have a destination");
    let e_new_sym = mesh[e_new].sym;
    // The destination may have pointed to e_org's mate
    mesh[e_new_dst].halfedge = Some(e_new_sym);
    let e_org_rface = mesh
        .rface(e_org)
        .expect("Live half-edge should have a right face");
    mesh[e_new_sym].lface = Some(e_org_rface);

    // Copy the old winding information onto both pieces
    mesh[e_new].winding = mesh[e_org].winding;
    mesh[e_new_sym].winding = mesh[e_org_sym].winding;

    e_new
}

/// Creates a new edge from `e_org`'s destination to `e_dst`'s origin and
/// returns it. If the two arguments share a left face, that loop is split in
/// two and the newly created loop is the returned edge's left face;
/// otherwise the two loops are joined into one and `e_dst`'s face is
/// destroyed.
///
/// If `e_org == e_dst`, the new face will have only two edges.
/// If `e_dst == e_org.lnext`, the old face is reduced to a single edge.
/// If `e_dst == e_org.lnext.lnext`, the old face is reduced to two edges.
pub fn connect(mesh: &mut MeshConnectivity, e_org: HalfEdgeId, e_dst: HalfEdgeId) -> HalfEdgeId {
    let mut joining_loops = false;
    let e_new = mesh.make_edge_pair(e_org);
    let e_new_sym = mesh[e_new].sym;

    let e_dst_lface = mesh[e_dst]
        .lface
        .expect("Live half-edge should have a left face");
    let e_org_lface = mesh[e_org]
        .lface
        .expect("Live half-edge should have a left face");
    if e_dst_lface != e_org_lface {
        // Connecting two disjoint loops -- destroy e_dst's face
        joining_loops = true;
        mesh.kill_face(e_dst_lface, Some(e_org_lface));
    }

    // Connect the new edge appropriately
    let e_org_lnext = mesh[e_org].lnext;
    mesh.splice_raw(e_new, e_org_lnext);
    mesh.splice_raw(e_new_sym, e_dst);

    // Set the vertex and face information
    let e_org_dst = mesh
        .dst(e_org)
        .expect("Live half-edge should have a destination");
    mesh[e_new].org = Some(e_org_dst);
    let e_dst_org = mesh[e_dst].org.expect("Live half-edge should have an origin");
    mesh[e_new_sym].org = Some(e_dst_org);
    mesh[e_new].lface = Some(e_org_lface);
    mesh[e_new_sym].lface = Some(e_org_lface);

    // Make sure the old face points to a valid half-edge
    mesh[e_org_lface].halfedge = Some(e_new_sym);

    if !joining_loops {
        // We split one loop into two -- the new loop is e_new's
        mesh.make_face(e_new, e_org_lface);
    }

    e_new
}

/// Destroys a face and removes it from the global face list. All edges of
/// `f_zap` get a cleared left face; any edge whose right face is also
/// already cleared is deleted entirely, along with any isolated vertices
/// this produces. An entire mesh can be deleted by zapping its faces, one at
/// a time, in any order. Zapped faces cannot be used in further operations.
#[profiling::function]
pub fn zap_face(mesh: &mut MeshConnectivity, f_zap: FaceId) {
    let e_start = mesh[f_zap]
        .halfedge
        .expect("Live face should have an incident half-edge");

    // Walk around the face, deleting edges whose right face is also cleared
    let mut e_next = mesh[e_start].lnext;
    loop {
        let e = e_next;
        e_next = mesh[e].lnext;

        mesh[e].lface = None;
        if mesh.rface(e).is_none() {
            // Delete the edge -- see delete_edge above
            if mesh[e].onext == e {
                let org = mesh[e].org.expect("Live half-edge should have an origin");
                mesh.kill_vertex(org, None);
            } else {
                // Make sure e's origin points to a valid half-edge
                let org = mesh[e].org.expect("Live half-edge should have an origin");
                let e_onext = mesh[e].onext;
                mesh[org].halfedge = Some(e_onext);
                let e_oprev = mesh.oprev(e);
                mesh.splice_raw(e, e_oprev);
            }

            let e_sym = mesh[e].sym;
            if mesh[e_sym].onext == e_sym {
                let org = mesh[e_sym].org.expect("Live half-edge should have an origin");
                mesh.kill_vertex(org, None);
            } else {
                // Make sure the mate's origin points to a valid half-edge
                let org = mesh[e_sym].org.expect("Live half-edge should have an origin");
                let e_sym_onext = mesh[e_sym].onext;
                mesh[org].halfedge = Some(e_sym_onext);
                let e_sym_oprev = mesh.oprev(e_sym);
                mesh.splice_raw(e_sym, e_sym_oprev);
            }
            mesh.kill_edge(e);
        }

        if e == e_start {
            break;
        }
    }

    // Unlink from the global face list and release the record
    let f_prev = mesh[f_zap].prev;
    let f_next = mesh[f_zap].next;
    mesh[f_next].prev = f_prev;
    mesh[f_prev].next = f_next;
    mesh.faces.remove(f_zap);
}

/// Tears down every entity of the mesh by zapping its faces one at a time,
/// then releases the list head records. The mesh must not be used again
/// afterwards.
#[profiling::function]
pub fn delete_mesh(mesh: &mut MeshConnectivity) {
    let f_head = mesh.f_head;
    loop {
        let f = mesh[f_head].next;
        if f == f_head {
            break;
        }
        zap_face(mesh, f);
    }

    mesh.halfedges.remove(mesh.e_head);
    mesh.halfedges.remove(mesh.e_head_sym);
    mesh.vertices.remove(mesh.v_head);
    mesh.faces.remove(mesh.f_head);
}

/// Releases every face, vertex and edge pair by direct list traversal, then
/// the list head records. End state is identical to [`delete_mesh`]; this
/// variant skips the per-edge unlink work the zap-based walk performs. The
/// mesh must not be used again afterwards.
#[profiling::function]
pub fn teardown_mesh(mesh: &mut MeshConnectivity) {
    let f_head = mesh.f_head;
    let mut f = mesh[f_head].next;
    while f != f_head {
        let f_next = mesh[f].next;
        mesh.faces.remove(f);
        f = f_next;
    }

    let v_head = mesh.v_head;
    let mut v = mesh[v_head].next;
    while v != v_head {
        let v_next = mesh[v].next;
        mesh.vertices.remove(v);
        v = v_next;
    }

    let e_head = mesh.e_head;
    let mut e = mesh[e_head].next;
    while e != e_head {
        let e_next = mesh[e].next;
        let e_sym = mesh[e].sym;
        mesh.halfedges.remove(e_sym);
        mesh.halfedges.remove(e);
        e = e_next;
    }

    mesh.halfedges.remove(mesh.e_head);
    mesh.halfedges.remove(mesh.e_head_sym);
    mesh.vertices.remove(mesh.v_head);
    mesh.faces.remove(mesh.f_head);
}

/// Forms the union of both meshes: every entity of `other` is re-acquired in
/// `mesh`'s arenas (with fresh ids) and the three global lists are spliced
/// together, preserving each mesh's internal list order. `other` is consumed
/// entirely, its list heads included.
#[profiling::function]
pub fn union_meshes(mesh: &mut MeshConnectivity, other: MeshConnectivity) {
    let MeshConnectivity {
        vertices,
        faces,
        halfedges,
        v_head,
        f_head,
        e_head,
        e_head_sym,
    } = other;

    // Acquire a fresh record for every live entity of the absorbed mesh. The
    // copied records still hold ids from the absorbed arenas; they are
    // rewritten below.
    let mut v_map = HashMap::new();
    for (id, v) in vertices.iter() {
        if id != v_head {
            v_map.insert(id, mesh.vertices.insert(v.clone()));
        }
    }
    let mut f_map = HashMap::new();
    for (id, f) in faces.iter() {
        if id != f_head {
            f_map.insert(id, mesh.faces.insert(f.clone()));
        }
    }
    let mut e_map = HashMap::new();
    for (id, h) in halfedges.iter() {
        if id != e_head && id != e_head_sym {
            e_map.insert(id, mesh.halfedges.insert(h.clone()));
        }
    }

    // Rewrite the copied links into the surviving id domain. Links into the
    // absorbed list heads resolve to the surviving heads; the list splices
    // below fix up the boundary links.
    let mesh_v_head = mesh.v_head;
    let mesh_f_head = mesh.f_head;
    let mesh_e_head = mesh.e_head;
    let mesh_e_head_sym = mesh.e_head_sym;
    let map_v = |id: VertexId| if id == v_head { mesh_v_head } else { v_map[&id] };
    let map_f = |id: FaceId| if id == f_head { mesh_f_head } else { f_map[&id] };
    let map_e = |id: HalfEdgeId| {
        if id == e_head {
            mesh_e_head
        } else if id == e_head_sym {
            mesh_e_head_sym
        } else {
            e_map[&id]
        }
    };

    for &nv in v_map.values() {
        let (next, prev, halfedge) = {
            let r = &mesh[nv];
            (r.next, r.prev, r.halfedge)
        };
        mesh[nv].next = map_v(next);
        mesh[nv].prev = map_v(prev);
        mesh[nv].halfedge = halfedge.map(map_e);
    }
    for &nf in f_map.values() {
        let (next, prev, halfedge) = {
            let r = &mesh[nf];
            (r.next, r.prev, r.halfedge)
        };
        mesh[nf].next = map_f(next);
        mesh[nf].prev = map_f(prev);
        mesh[nf].halfedge = halfedge.map(map_e);
    }
    for &ne in e_map.values() {
        let (sym, onext, lnext, next, org, lface) = {
            let r = &mesh[ne];
            (r.sym, r.onext, r.lnext, r.next, r.org, r.lface)
        };
        mesh[ne].sym = map_e(sym);
        mesh[ne].onext = map_e(onext);
        mesh[ne].lnext = map_e(lnext);
        mesh[ne].next = map_e(next);
        mesh[ne].org = org.map(map_v);
        mesh[ne].lface = lface.map(map_f);
    }

    // Splice the absorbed vertex list onto the surviving one
    let other_first_v = vertices[v_head].next;
    if other_first_v != v_head {
        let first = v_map[&other_first_v];
        let last = v_map[&vertices[v_head].prev];
        let mesh_last = mesh[mesh_v_head].prev;
        mesh[mesh_last].next = first;
        mesh[first].prev = mesh_last;
        mesh[last].next = mesh_v_head;
        mesh[mesh_v_head].prev = last;
    }

    // Same for the face list
    let other_first_f = faces[f_head].next;
    if other_first_f != f_head {
        let first = f_map[&other_first_f];
        let last = f_map[&faces[f_head].prev];
        let mesh_last = mesh[mesh_f_head].prev;
        mesh[mesh_last].next = first;
        mesh[first].prev = mesh_last;
        mesh[last].next = mesh_f_head;
        mesh[mesh_f_head].prev = last;
    }

    // Same for the edge list, whose reverse links are stored in sym.next
    let other_first_e = halfedges[e_head].next;
    if other_first_e != e_head {
        let first = e_map[&other_first_e];
        let last_sym = e_map[&halfedges[e_head_sym].next];
        let mesh_last_sym = mesh[mesh_e_head_sym].next;
        let mesh_last = mesh[mesh_last_sym].sym;
        mesh[mesh_last].next = first;
        let first_sym = mesh[first].sym;
        mesh[first_sym].next = mesh_last_sym;
        let last = mesh[last_sym].sym;
        mesh[last].next = mesh_e_head;
        mesh[mesh_e_head_sym].next = last_sym;
    }
}
