// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::prelude::*;

use glam::{Vec2, Vec3};
use slotmap::SlotMap;

/// Implements indexing traits so the mesh data structure can be used to access
/// vertex, face or halfedge information using ids as indices.
pub mod mesh_index_impls;

/// Type-safe wrappers over the internal allocator indices used as pointers
pub mod id_types;
pub use id_types::*;

/// An API to represent type-safe and error-handled graph traversals over a mesh
pub mod traversals;
pub use traversals::*;

/// The topological edit operations: splice, edge insertion and removal, face
/// removal and full teardown.
pub mod edit_ops;

/// Structural invariant checks, used by tests and debug builds.
pub mod validation;

#[cfg(test)]
mod tests;

/// HalfEdge meshes are a type of linked list. This means it is sometimes
/// impossible to ensure some algorithms will terminate when the mesh is
/// malformed. To ensure the code never goes into an infinite loop, this max
/// number of iterations will be performed before giving an error. This error
/// should be large enough, as faces with a very large number of vertices may
/// trigger it.
pub const MAX_LOOP_ITERATIONS: usize = 8196;

/// One direction of an undirected edge. Half-edges always exist in mated
/// pairs: `sym` points to the other direction and is an involution.
#[derive(Debug, Clone)]
pub struct HalfEdge {
    /// The mated half-edge going the opposite direction.
    sym: HalfEdgeId,
    /// Next half-edge with the same origin, in rotational order.
    onext: HalfEdgeId,
    /// Next half-edge around the left face, same direction.
    lnext: HalfEdgeId,
    /// Origin vertex. Cleared while an endpoint is being torn down.
    org: Option<VertexId>,
    /// Left face. Cleared when the face is zapped.
    lface: Option<FaceId>,
    /// Signed contour-crossing count accumulated on this half-edge. Written
    /// by the caller's fill-rule evaluation.
    winding: i32,
    /// Link in the global edge list. The reverse link of the pair is stored
    /// in `sym.next`, so the pair occupies one slot in each of the two
    /// interleaved circular lists.
    next: HalfEdgeId,
}

#[derive(Debug, Clone)]
pub struct Vertex {
    /// Some half-edge whose origin is this vertex. `None` only on the
    /// list-head record.
    halfedge: Option<HalfEdgeId>,
    /// Global circular vertex list membership.
    next: VertexId,
    prev: VertexId,
    /// Input-space position. Owned by the caller; never interpreted here.
    position: Vec3,
    /// Sweep-plane projection of `position`. Owned by the caller.
    st: Vec2,
}

#[derive(Debug, Clone)]
pub struct Face {
    /// Some half-edge whose left face is this face. `None` only on the
    /// list-head record.
    halfedge: Option<HalfEdgeId>,
    /// Global circular face list membership.
    next: FaceId,
    prev: FaceId,
    /// Whether this region is part of the polygon interior under the active
    /// fill rule. Written by the caller; inherited when a face is split.
    inside: bool,
}

/// The half-edge planar subdivision. Entities live in one arena per kind and
/// reference each other exclusively through their ids. Three circular
/// doubly-linked lists, anchored at permanent head records, thread through
/// all live vertices, faces and edge pairs; an entity is alive exactly while
/// it is reachable from one of the heads.
///
/// All connectivity mutation goes through the operations in [`edit_ops`].
/// Entity fields are deliberately not public.
#[derive(Debug, Clone)]
pub struct MeshConnectivity {
    vertices: SlotMap<VertexId, Vertex>,
    faces: SlotMap<FaceId, Face>,
    halfedges: SlotMap<HalfEdgeId, HalfEdge>,

    /// Anchor of the global vertex list.
    v_head: VertexId,
    /// Anchor of the global face list.
    f_head: FaceId,
    /// Anchor pair of the global edge list.
    e_head: HalfEdgeId,
    e_head_sym: HalfEdgeId,
}

impl MeshConnectivity {
    pub fn new() -> Self {
        let mut vertices = SlotMap::with_key();
        let v_head = vertices.insert_with_key(|v| Vertex {
            halfedge: None,
            next: v,
            prev: v,
            position: Vec3::ZERO,
            st: Vec2::ZERO,
        });

        let mut faces = SlotMap::with_key();
        let f_head = faces.insert_with_key(|f| Face {
            halfedge: None,
            next: f,
            prev: f,
            inside: false,
        });

        let mut halfedges = SlotMap::with_key();
        let e_head = halfedges.insert_with_key(|e| HalfEdge {
            sym: e,
            onext: e,
            lnext: e,
            org: None,
            lface: None,
            winding: 0,
            next: e,
        });
        let e_head_sym = halfedges.insert_with_key(|e| HalfEdge {
            sym: e_head,
            onext: e,
            lnext: e,
            org: None,
            lface: None,
            winding: 0,
            next: e,
        });
        halfedges[e_head].sym = e_head_sym;

        Self {
            vertices,
            faces,
            halfedges,
            v_head,
            f_head,
            e_head,
            e_head_sym,
        }
    }

    /* ====================== */
    /* Navigation             */
    /* ====================== */

    /// The mated half-edge. `sym(sym(e)) == e`.
    #[inline]
    pub fn sym(&self, e: HalfEdgeId) -> HalfEdgeId {
        self[e].sym
    }

    /// Next half-edge with the same origin, rotational order.
    #[inline]
    pub fn onext(&self, e: HalfEdgeId) -> HalfEdgeId {
        self[e].onext
    }

    /// Next half-edge around the left face.
    #[inline]
    pub fn lnext(&self, e: HalfEdgeId) -> HalfEdgeId {
        self[e].lnext
    }

    /// Previous half-edge with the same origin: `sym.lnext`.
    #[inline]
    pub fn oprev(&self, e: HalfEdgeId) -> HalfEdgeId {
        let sym = self[e].sym;
        self[sym].lnext
    }

    /// Previous half-edge around the left face: `onext.sym`.
    #[inline]
    pub fn lprev(&self, e: HalfEdgeId) -> HalfEdgeId {
        let onext = self[e].onext;
        self[onext].sym
    }

    /// Next half-edge with the same destination: `sym.onext.sym`.
    #[inline]
    pub fn dnext(&self, e: HalfEdgeId) -> HalfEdgeId {
        let rprev = self.rprev(e);
        self[rprev].sym
    }

    /// Previous half-edge with the same destination: `lnext.sym`.
    #[inline]
    pub fn dprev(&self, e: HalfEdgeId) -> HalfEdgeId {
        let lnext = self[e].lnext;
        self[lnext].sym
    }

    /// Previous half-edge around the right face: `sym.onext`.
    #[inline]
    pub fn rprev(&self, e: HalfEdgeId) -> HalfEdgeId {
        let sym = self[e].sym;
        self[sym].onext
    }

    /// Next half-edge around the right face: `oprev.sym`.
    #[inline]
    pub fn rnext(&self, e: HalfEdgeId) -> HalfEdgeId {
        let oprev = self.oprev(e);
        self[oprev].sym
    }

    /// Origin vertex of `e`.
    #[inline]
    pub fn org(&self, e: HalfEdgeId) -> Option<VertexId> {
        self[e].org
    }

    /// Destination vertex of `e`: the origin of its mate.
    #[inline]
    pub fn dst(&self, e: HalfEdgeId) -> Option<VertexId> {
        let sym = self[e].sym;
        self[sym].org
    }

    /// Left face of `e`.
    #[inline]
    pub fn lface(&self, e: HalfEdgeId) -> Option<FaceId> {
        self[e].lface
    }

    /// Right face of `e`: the left face of its mate.
    #[inline]
    pub fn rface(&self, e: HalfEdgeId) -> Option<FaceId> {
        let sym = self[e].sym;
        self[sym].lface
    }

    /* ====================== */
    /* Caller-owned fields    */
    /* ====================== */

    pub fn winding(&self, e: HalfEdgeId) -> i32 {
        self[e].winding
    }

    pub fn set_winding(&mut self, e: HalfEdgeId, winding: i32) {
        self[e].winding = winding;
    }

    pub fn add_winding(&mut self, e: HalfEdgeId, delta: i32) {
        self[e].winding += delta;
    }

    pub fn is_inside(&self, f: FaceId) -> bool {
        self[f].inside
    }

    pub fn set_inside(&mut self, f: FaceId, inside: bool) {
        self[f].inside = inside;
    }

    pub fn position(&self, v: VertexId) -> Vec3 {
        self[v].position
    }

    pub fn set_position(&mut self, v: VertexId, position: Vec3) {
        self[v].position = position;
    }

    /// The sweep-plane coordinates of `v`, as written by the caller.
    pub fn sweep_coords(&self, v: VertexId) -> Vec2 {
        self[v].st
    }

    pub fn set_sweep_coords(&mut self, v: VertexId, st: Vec2) {
        self[v].st = st;
    }

    /* ====================== */
    /* Rings and loops        */
    /* ====================== */

    /// Collects the rotational ring around the origin of `h0`: every
    /// half-edge sharing that origin, starting at `h0`.
    pub fn onext_ring(&self, h0: HalfEdgeId) -> SVec<HalfEdgeId> {
        let mut ret = smallvec::smallvec![h0];
        let mut h = h0;

        let mut count = 0;

        loop {
            if count > MAX_LOOP_ITERATIONS {
                panic!("Max number of iterations reached. Is the mesh malformed?");
            }
            count += 1;

            h = self[h].onext;
            if h == h0 {
                break;
            } else {
                ret.push(h);
            }
        }
        ret
    }

    /// Collects the face loop starting at `h0`: every half-edge bounding the
    /// left face of `h0`, in loop order.
    pub fn lnext_loop(&self, h0: HalfEdgeId) -> SVec<HalfEdgeId> {
        let mut ret = smallvec::smallvec![h0];
        let mut h = h0;

        let mut count = 0;

        loop {
            if count > MAX_LOOP_ITERATIONS {
                panic!("Max number of iterations reached. Is the mesh malformed?");
            }
            count += 1;

            h = self[h].lnext;
            if h == h0 {
                break;
            } else {
                ret.push(h);
            }
        }
        ret
    }

    /* ====================== */
    /* List iteration         */
    /* ====================== */

    /// Walks the global vertex list in list order. New vertices are inserted
    /// behind the walk, so an iteration started before an edit does not see
    /// entities created by it.
    pub fn iter_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        let head = self.v_head;
        std::iter::successors(
            Some(self[head].next).filter(move |&v| v != head),
            move |&v| Some(self[v].next).filter(move |&n| n != head),
        )
    }

    /// Walks the global face list in list order.
    pub fn iter_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        let head = self.f_head;
        std::iter::successors(
            Some(self[head].next).filter(move |&f| f != head),
            move |&f| Some(self[f].next).filter(move |&n| n != head),
        )
    }

    /// Walks the global edge list in list order, yielding one half-edge per
    /// undirected edge (the mate is reachable through `sym`).
    pub fn iter_edges(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        let head = self.e_head;
        std::iter::successors(
            Some(self[head].next).filter(move |&e| e != head),
            move |&e| Some(self[e].next).filter(move |&n| n != head),
        )
    }

    /// Number of live vertices, excluding the list head.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Number of live faces, excluding the list head.
    pub fn num_faces(&self) -> usize {
        self.faces.len().saturating_sub(1)
    }

    /// Number of live half-edges, excluding the list head pair.
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len().saturating_sub(2)
    }

    /// Number of live undirected edges.
    pub fn num_edges(&self) -> usize {
        self.num_halfedges() / 2
    }

    /* ====================== */
    /* Allocation internals   */
    /* ====================== */

    /// Acquires a mated pair of half-edges forming a self-contained 2-edge
    /// loop, linked into the global edge list immediately before `e_next`.
    /// No vertex or face records are attached; the caller must assign them
    /// before the current operation completes.
    fn make_edge_pair(&mut self, e_next: HalfEdgeId) -> HalfEdgeId {
        let e = self.halfedges.insert_with_key(|k| HalfEdge {
            sym: k,
            onext: k,
            lnext: k,
            org: None,
            lface: None,
            winding: 0,
            next: k,
        });
        let e_sym = self.halfedges.insert_with_key(|k| HalfEdge {
            sym: e,
            onext: k,
            lnext: e,
            org: None,
            lface: None,
            winding: 0,
            next: k,
        });
        self[e].sym = e_sym;
        self[e].lnext = e_sym;

        // Insert in the circular list before e_next. The reverse link of the
        // pair is stored in sym.next.
        let e_next_sym = self[e_next].sym;
        let e_prev = self[e_next_sym].next;
        self[e_sym].next = e_prev;
        let e_prev_sym = self[e_prev].sym;
        self[e_prev_sym].next = e;
        self[e].next = e_next;
        self[e_next_sym].next = e_sym;

        e
    }

    /// Acquires a vertex, makes it the origin of every half-edge in the
    /// rotational ring of `e_orig`, and inserts it in the global vertex list
    /// before `v_next`, so that list walks in progress do not see it.
    fn make_vertex(&mut self, e_orig: HalfEdgeId, v_next: VertexId) -> VertexId {
        let v_prev = self[v_next].prev;
        let v_new = self.vertices.insert(Vertex {
            halfedge: Some(e_orig),
            next: v_next,
            prev: v_prev,
            position: Vec3::ZERO,
            st: Vec2::ZERO,
        });
        self[v_prev].next = v_new;
        self[v_next].prev = v_new;

        // Fix other edges on this vertex ring
        let mut e = e_orig;
        loop {
            self[e].org = Some(v_new);
            e = self[e].onext;
            if e == e_orig {
                break;
            }
        }

        v_new
    }

    /// Acquires a face, makes it the left face of every half-edge in the
    /// loop of `e_orig`, and inserts it in the global face list before
    /// `f_next`. The new face inherits `inside` from `f_next`, which is the
    /// old face whenever a face is being split in two.
    fn make_face(&mut self, e_orig: HalfEdgeId, f_next: FaceId) -> FaceId {
        let f_prev = self[f_next].prev;
        let inside = self[f_next].inside;
        let f_new = self.faces.insert(Face {
            halfedge: Some(e_orig),
            next: f_next,
            prev: f_prev,
            inside,
        });
        self[f_prev].next = f_new;
        self[f_next].prev = f_new;

        // Fix other edges on this face loop
        let mut e = e_orig;
        loop {
            self[e].lface = Some(f_new);
            e = self[e].lnext;
            if e == e_orig {
                break;
            }
        }

        f_new
    }

    /// Releases a vertex, retargeting its whole rotational ring to
    /// `new_org` first.
    fn kill_vertex(&mut self, v_del: VertexId, new_org: Option<VertexId>) {
        let e_start = self[v_del]
            .halfedge
            .expect("live vertex must have an incident half-edge");

        let mut e = e_start;
        loop {
            self[e].org = new_org;
            e = self[e].onext;
            if e == e_start {
                break;
            }
        }

        let v_prev = self[v_del].prev;
        let v_next = self[v_del].next;
        self[v_next].prev = v_prev;
        self[v_prev].next = v_next;

        self.vertices.remove(v_del);
    }

    /// Releases a face, retargeting its whole boundary loop to `new_lface`
    /// first.
    fn kill_face(&mut self, f_del: FaceId, new_lface: Option<FaceId>) {
        let e_start = self[f_del]
            .halfedge
            .expect("live face must have an incident half-edge");

        let mut e = e_start;
        loop {
            self[e].lface = new_lface;
            e = self[e].lnext;
            if e == e_start {
                break;
            }
        }

        let f_prev = self[f_del].prev;
        let f_next = self[f_del].next;
        self[f_next].prev = f_prev;
        self[f_prev].next = f_next;

        self.faces.remove(f_del);
    }

    /// Unlinks a mated pair from the global edge list and releases both
    /// halves. The vertex and face bookkeeping must already be done.
    fn kill_edge(&mut self, e_del: HalfEdgeId) {
        let e_del_sym = self[e_del].sym;

        let e_next = self[e_del].next;
        let e_prev = self[e_del_sym].next;
        let e_next_sym = self[e_next].sym;
        self[e_next_sym].next = e_prev;
        let e_prev_sym = self[e_prev].sym;
        self[e_prev_sym].next = e_next;

        self.halfedges.remove(e_del_sym);
        self.halfedges.remove(e_del);
    }

    /// The atomic connectivity edit: exchanges `a.onext` and `b.onext` and
    /// repairs the two face-loop links this breaks. Everything else in
    /// [`edit_ops`] is built from this plus the allocation internals. Vertex
    /// and face records are not touched; the caller owns that bookkeeping.
    fn splice_raw(&mut self, a: HalfEdgeId, b: HalfEdgeId) {
        let a_onext = self[a].onext;
        let b_onext = self[b].onext;

        let a_onext_sym = self[a_onext].sym;
        self[a_onext_sym].lnext = b;
        let b_onext_sym = self[b_onext].sym;
        self[b_onext_sym].lnext = a;
        self[a].onext = b_onext;
        self[b].onext = a_onext;
    }
}

impl Default for MeshConnectivity {
    fn default() -> Self {
        Self::new()
    }
}
