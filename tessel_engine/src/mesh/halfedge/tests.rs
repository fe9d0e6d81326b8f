// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::edit_ops::*;
use super::validation::check_mesh;
use crate::prelude::*;

/// A single isolated edge: two vertices joined by one edge pair, bounding a
/// single two-sided loop.
fn single_edge() -> (MeshConnectivity, HalfEdgeId) {
    let mut mesh = MeshConnectivity::new();
    let e = make_edge(&mut mesh);
    (mesh, e)
}

/// A triangle: e1, e2 and e3 chained by `lnext` around the interior face,
/// their mates bounding the exterior one.
fn triangle() -> (MeshConnectivity, [HalfEdgeId; 3]) {
    let mut mesh = MeshConnectivity::new();
    let e1 = make_edge(&mut mesh);
    let e2 = add_edge_vertex(&mut mesh, e1);
    let e3 = connect(&mut mesh, e2, e1);
    (mesh, [e1, e2, e3])
}

#[test]
fn make_edge_creates_isolated_loop() {
    let (mesh, e) = single_edge();
    let s = mesh.sym(e);

    assert_eq!(mesh.num_vertices(), 2);
    assert_eq!(mesh.num_faces(), 1);
    assert_eq!(mesh.num_edges(), 1);

    // A fresh pair is its own two-sided loop and both rings are singletons
    assert_eq!(mesh.sym(s), e);
    assert_eq!(mesh.lnext(e), s);
    assert_eq!(mesh.lnext(s), e);
    assert_eq!(mesh.onext(e), e);
    assert_eq!(mesh.onext(s), s);
    assert_ne!(mesh.org(e), mesh.org(s));
    assert_eq!(mesh.lface(e), mesh.lface(s));

    check_mesh(&mesh).unwrap();
}

#[test]
fn splice_is_its_own_inverse() {
    let mut mesh = MeshConnectivity::new();
    let e1 = make_edge(&mut mesh);
    let e2 = make_edge(&mut mesh);
    assert_eq!(mesh.num_vertices(), 4);
    assert_eq!(mesh.num_faces(), 2);

    // Distinct origins and faces: both merge
    splice(&mut mesh, e1, e2);
    assert_eq!(mesh.num_vertices(), 3);
    assert_eq!(mesh.num_faces(), 1);
    assert_eq!(mesh.org(e1), mesh.org(e2));
    assert_eq!(mesh.onext_ring(e1).len(), 2);
    check_mesh(&mesh).unwrap();

    // Shared origin and face: the same call splits both back apart
    splice(&mut mesh, e1, e2);
    assert_eq!(mesh.num_vertices(), 4);
    assert_eq!(mesh.num_faces(), 2);
    assert_ne!(mesh.org(e1), mesh.org(e2));
    assert_eq!(mesh.onext_ring(e1).len(), 1);
    assert_eq!(mesh.onext_ring(e2).len(), 1);
    check_mesh(&mesh).unwrap();
}

#[test]
fn splice_on_same_edge_is_a_no_op() {
    let (mut mesh, e) = single_edge();
    splice(&mut mesh, e, e);
    assert_eq!(mesh.num_vertices(), 2);
    assert_eq!(mesh.num_faces(), 1);
    assert_eq!(mesh.onext(e), e);
    check_mesh(&mesh).unwrap();
}

#[test]
fn make_then_delete_edge_restores_counts() {
    let (mut mesh, e) = single_edge();
    delete_edge(&mut mesh, e);

    assert_eq!(mesh.num_vertices(), 0);
    assert_eq!(mesh.num_faces(), 0);
    assert_eq!(mesh.num_edges(), 0);
    check_mesh(&mesh).unwrap();
}

#[test]
fn delete_edge_joins_faces() {
    let (mut mesh, [e1, _e2, e3]) = triangle();
    assert_eq!(mesh.num_faces(), 2);

    // e3 separates the interior loop from the exterior one; removing it
    // joins them
    delete_edge(&mut mesh, e3);
    assert_eq!(mesh.num_vertices(), 3);
    assert_eq!(mesh.num_faces(), 1);
    assert_eq!(mesh.num_edges(), 2);
    assert_eq!(mesh.lnext_loop(e1).len(), 4);
    check_mesh(&mesh).unwrap();
}

#[test]
fn delete_dangling_edge_keeps_face_count() {
    let (mut mesh, e1) = single_edge();
    let e2 = add_edge_vertex(&mut mesh, e1);
    assert_eq!(mesh.num_vertices(), 3);
    assert_eq!(mesh.num_edges(), 2);
    check_mesh(&mesh).unwrap();

    // A dangling edge has the same face on both sides; deleting it prunes
    // its isolated endpoint and leaves one face
    delete_edge(&mut mesh, e2);
    assert_eq!(mesh.num_vertices(), 2);
    assert_eq!(mesh.num_faces(), 1);
    assert_eq!(mesh.num_edges(), 1);
    check_mesh(&mesh).unwrap();
}

#[test]
fn connect_edge_to_itself_makes_two_sided_face() {
    let (mut mesh, e) = single_edge();
    let e_new = connect(&mut mesh, e, e);

    assert_eq!(mesh.num_vertices(), 2);
    assert_eq!(mesh.num_faces(), 2);
    assert_eq!(mesh.num_edges(), 2);

    let new_loop = mesh.lnext_loop(e_new);
    assert_eq!(new_loop.len(), 2);
    assert!(new_loop.contains(&e));
    assert_ne!(mesh.lface(e_new), mesh.rface(e_new));
    check_mesh(&mesh).unwrap();
}

#[test]
fn add_edge_vertex_shares_face_with_its_anchor() {
    let (mut mesh, e1) = single_edge();
    let e2 = add_edge_vertex(&mut mesh, e1);

    assert_eq!(mesh.num_vertices(), 3);
    assert_eq!(mesh.num_faces(), 1);
    assert_eq!(mesh.num_edges(), 2);

    assert_eq!(mesh.lnext(e1), e2);
    assert_eq!(mesh.org(e2), mesh.dst(e1));
    assert_eq!(mesh.lface(e2), mesh.lface(e1));
    assert_eq!(mesh.rface(e2), mesh.lface(e1));
    // The fresh endpoint has a singleton ring
    let tip = mesh.sym(e2);
    assert_eq!(mesh.onext_ring(tip).len(), 1);
    check_mesh(&mesh).unwrap();
}

#[test]
fn split_edge_copies_winding_to_both_pieces() {
    let (mut mesh, [e1, _e2, _e3]) = triangle();
    let s1 = mesh.sym(e1);
    mesh.set_winding(e1, 3);
    mesh.set_winding(s1, -3);

    let old_org = mesh.org(e1);
    let old_dst = mesh.dst(e1);
    let old_lface = mesh.lface(e1);
    let old_rface = mesh.rface(e1);

    let e_new = split_edge(&mut mesh, e1);

    assert_eq!(mesh.num_vertices(), 4);
    assert_eq!(mesh.num_edges(), 4);
    assert_eq!(mesh.num_faces(), 2);

    // The two pieces chain through the new midpoint
    assert_eq!(mesh.lnext(e1), e_new);
    assert_eq!(mesh.org(e1), old_org);
    assert_eq!(mesh.dst(e1), mesh.org(e_new));
    assert_eq!(mesh.dst(e_new), old_dst);
    assert_ne!(mesh.dst(e1), old_dst);

    // Same value on both pieces, not a numeric split
    assert_eq!(mesh.winding(e1), 3);
    assert_eq!(mesh.winding(e_new), 3);
    assert_eq!(mesh.winding(mesh.sym(e_new)), -3);

    assert_eq!(mesh.lface(e_new), old_lface);
    assert_eq!(mesh.rface(e_new), old_rface);
    assert_eq!(mesh.lnext_loop(e_new).len(), 4);
    check_mesh(&mesh).unwrap();
}

#[test]
fn triangle_scenario() {
    let mut mesh = MeshConnectivity::new();
    let e1 = make_edge(&mut mesh);
    let e2 = add_edge_vertex(&mut mesh, e1);

    // Mark the only loop as interior before closing it; the face created by
    // the split inherits the flag
    let f = mesh.lface(e1).unwrap();
    mesh.set_inside(f, true);

    let e3 = connect(&mut mesh, e2, e1);

    assert_eq!(mesh.num_vertices(), 3);
    assert_eq!(mesh.num_faces(), 2);
    assert_eq!(mesh.num_edges(), 3);
    for f in mesh.iter_faces().collect_vec() {
        assert!(mesh.is_inside(f));
    }

    // Both loops close after three steps, every ring holds two edges
    assert_eq!(mesh.lnext(e1), e2);
    assert_eq!(mesh.lnext(e2), e3);
    assert_eq!(mesh.lnext(e3), e1);
    assert_eq!(mesh.lnext_loop(mesh.sym(e1)).len(), 3);
    for e in [e1, e2, e3] {
        assert_eq!(mesh.onext_ring(e).len(), 2);
    }
    assert_ne!(mesh.lface(e1), mesh.rface(e1));
    check_mesh(&mesh).unwrap();

    // Distinct corner positions survive the round-trip through the mesh
    let verts = mesh.iter_vertices().collect_vec();
    assert_eq!(verts.len(), 3);
    for (i, &v) in verts.iter().enumerate() {
        mesh.set_position(v, Vec3::new(i as f32, 0.0, 0.0));
        mesh.set_sweep_coords(v, Vec2::new(i as f32, 0.0));
    }
    let distinct: HashSet<Vec3Ord> = verts.iter().map(|&v| mesh.position(v).to_ord()).collect();
    assert_eq!(distinct.len(), 3);
    let distinct_st: HashSet<Vec2Ord> = verts
        .iter()
        .map(|&v| mesh.sweep_coords(v).to_ord())
        .collect();
    assert_eq!(distinct_st.len(), 3);

    delete_mesh(&mut mesh);
    assert_eq!(mesh.num_vertices(), 0);
    assert_eq!(mesh.num_faces(), 0);
    assert_eq!(mesh.num_edges(), 0);
}

#[test]
fn zapping_every_face_empties_the_mesh() {
    let (mut mesh, [e1, _e2, _e3]) = triangle();

    // Zap the interior loop first: its edges survive, cleared on one side
    let inner = mesh.lface(e1).unwrap();
    zap_face(&mut mesh, inner);
    assert_eq!(mesh.num_faces(), 1);
    assert_eq!(mesh.num_edges(), 3);
    assert_eq!(mesh.lface(e1), None);

    // Zapping the other side deletes every edge and prunes the corners
    let outer = mesh.rface(e1).unwrap();
    zap_face(&mut mesh, outer);
    assert_eq!(mesh.num_vertices(), 0);
    assert_eq!(mesh.num_faces(), 0);
    assert_eq!(mesh.num_edges(), 0);
}

#[test]
fn zapping_faces_in_the_opposite_order_also_empties_the_mesh() {
    let (mut mesh, [e1, _e2, _e3]) = triangle();
    let s1 = mesh.sym(e1);

    let outer = mesh.lface(s1).unwrap();
    zap_face(&mut mesh, outer);
    assert_eq!(mesh.num_faces(), 1);
    assert_eq!(mesh.num_edges(), 3);

    // Cleared left faces are visible to traversals as such, not as errors
    assert!(matches!(
        mesh.at_halfedge(s1).lface().try_end(),
        Err(TraversalError::HalfEdgeHasNoLeftFace(_))
    ));
    assert_eq!(mesh.at_halfedge(s1).lface_or_cleared().unwrap(), None);

    let inner = mesh.lface(e1).unwrap();
    zap_face(&mut mesh, inner);
    assert_eq!(mesh.num_vertices(), 0);
    assert_eq!(mesh.num_faces(), 0);
    assert_eq!(mesh.num_edges(), 0);
}

#[test]
fn teardown_mesh_releases_every_record() {
    let (mut mesh, [e1, _e2, _e3]) = triangle();
    teardown_mesh(&mut mesh);

    assert!(mesh.vertices.is_empty());
    assert!(mesh.faces.is_empty());
    assert!(mesh.halfedges.is_empty());
    assert_eq!(mesh.num_vertices(), 0);
    assert_eq!(mesh.num_faces(), 0);
    assert_eq!(mesh.num_edges(), 0);

    // Released ids stay dead
    assert!(mesh.try_halfedge(e1).is_none());
}

#[test]
fn union_of_disjoint_meshes_sums_counts() {
    let (mut mesh, e_a) = single_edge();
    let (other, _e_b) = single_edge();

    union_meshes(&mut mesh, other);

    assert_eq!(mesh.num_vertices(), 4);
    assert_eq!(mesh.num_faces(), 2);
    assert_eq!(mesh.num_edges(), 2);
    check_mesh(&mesh).unwrap();

    // Both substructures stay independently traversable
    let edges = mesh.iter_edges().collect_vec();
    assert_eq!(edges.len(), 2);
    assert!(edges.contains(&e_a) || edges.contains(&mesh.sym(e_a)));
    for e in edges {
        assert_eq!(mesh.lnext_loop(e).len(), 2);
        assert_eq!(mesh.onext_ring(e).len(), 1);
    }
}

#[test]
fn union_with_an_empty_mesh_changes_nothing() {
    let (mut mesh, _e) = triangle();
    union_meshes(&mut mesh, MeshConnectivity::new());

    assert_eq!(mesh.num_vertices(), 3);
    assert_eq!(mesh.num_faces(), 2);
    assert_eq!(mesh.num_edges(), 3);
    check_mesh(&mesh).unwrap();
}

#[test]
fn union_into_an_empty_mesh_absorbs_everything() {
    let mut mesh = MeshConnectivity::new();
    let (other, _edges) = triangle();
    union_meshes(&mut mesh, other);

    assert_eq!(mesh.num_vertices(), 3);
    assert_eq!(mesh.num_faces(), 2);
    assert_eq!(mesh.num_edges(), 3);
    check_mesh(&mesh).unwrap();

    for e in mesh.iter_edges().collect_vec() {
        assert_eq!(mesh.lnext_loop(e).len(), 3);
    }
}

#[test]
fn traversals_navigate_the_triangle() {
    let (mesh, [e1, e2, e3]) = triangle();

    assert_eq!(mesh.at_halfedge(e1).lnext().lnext().lnext().end(), e1);
    assert_eq!(mesh.at_halfedge(e1).sym().sym().end(), e1);
    assert_eq!(mesh.at_halfedge(e2).lprev().end(), e1);
    assert_eq!(mesh.at_halfedge(e1).dst().end(), mesh.org(e2).unwrap());
    assert_eq!(
        mesh.at_halfedge(e1).oprev().end(),
        mesh.oprev(e1),
    );

    let f = mesh.at_halfedge(e3).lface().end();
    assert_eq!(mesh.at_face(f).halfedges().unwrap().len(), 3);
    assert_eq!(mesh.at_face(f).vertices().unwrap().len(), 3);

    let v = mesh.at_halfedge(e1).org().end();
    assert_eq!(mesh.at_vertex(v).outgoing_halfedges().unwrap().len(), 2);

    let (src, dst) = mesh.at_halfedge(e1).src_dst_pair().unwrap();
    assert_ne!(src, dst);
}

#[test]
fn winding_accumulates_through_the_accessors() {
    let (mut mesh, e) = single_edge();
    mesh.set_winding(e, 1);
    mesh.add_winding(e, 2);
    assert_eq!(mesh.winding(e), 3);
    assert_eq!(mesh.winding(mesh.sym(e)), 0);
}

#[test]
fn list_iteration_matches_entity_counts() {
    let (mesh, _edges) = triangle();
    assert_eq!(mesh.iter_vertices().count(), mesh.num_vertices());
    assert_eq!(mesh.iter_faces().count(), mesh.num_faces());
    assert_eq!(mesh.iter_edges().count(), mesh.num_edges());
}
