// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

pub trait Location {}

impl Location for VertexId {}
impl Location for FaceId {}
impl Location for HalfEdgeId {}

#[derive(Copy, Clone, Debug)]
pub enum TraversalError {
    VertexHasNoHalfedge(VertexId),
    FaceHasNoHalfedge(FaceId),
    HalfEdgeHasNoOrg(HalfEdgeId),
    HalfEdgeHasNoLeftFace(HalfEdgeId),
    HalfedgeBadLoop(HalfEdgeId),
}
impl std::fmt::Display for TraversalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{self:?}"))
    }
}
impl std::error::Error for TraversalError {}

#[derive(Clone, Copy)]
pub struct ValidTraversal<'a, L>
where
    L: Location,
{
    inner: &'a MeshConnectivity,
    location: L,
}

pub type Traversal<'a, L> = Result<ValidTraversal<'a, L>, TraversalError>;

/* ===================== */
/* Traversal on vertices */
/* ===================== */

pub trait VertexTraversal<'a> {
    fn halfedge(&'a self) -> Traversal<'a, HalfEdgeId>;
}

impl<'a> VertexTraversal<'a> for Traversal<'a, VertexId> {
    fn halfedge(&'a self) -> Traversal<'a, HalfEdgeId> {
        self.and_then(|valid| {
            Ok(ValidTraversal {
                inner: valid.inner,
                location: valid.inner[valid.location]
                    .halfedge
                    .ok_or(TraversalError::VertexHasNoHalfedge(valid.location))?,
            })
        })
    }
}

/* ================== */
/* Traversal on faces */
/* ================== */

pub trait FaceTraversal<'a> {
    fn halfedge(&'a self) -> Traversal<'a, HalfEdgeId>;
}
impl<'a> FaceTraversal<'a> for Traversal<'a, FaceId> {
    fn halfedge(&'a self) -> Traversal<'a, HalfEdgeId> {
        self.and_then(|valid| {
            Ok(ValidTraversal {
                inner: valid.inner,
                location: valid.inner[valid.location]
                    .halfedge
                    .ok_or(TraversalError::FaceHasNoHalfedge(valid.location))?,
            })
        })
    }
}

/* ====================== */
/* Traversal on halfedges */
/* ====================== */

pub trait HalfEdgeTraversal<'a> {
    fn sym(&'a self) -> Traversal<'a, HalfEdgeId>;
    fn onext(&'a self) -> Traversal<'a, HalfEdgeId>;
    fn lnext(&'a self) -> Traversal<'a, HalfEdgeId>;
    fn org(&'a self) -> Traversal<'a, VertexId>;
    fn lface(&'a self) -> Traversal<'a, FaceId>;
    fn lface_or_cleared(&'a self) -> Result<Option<FaceId>, TraversalError>;
}

impl<'a> HalfEdgeTraversal<'a> for Traversal<'a, HalfEdgeId> {
    fn sym(&'a self) -> Traversal<'a, HalfEdgeId> {
        self.map(|valid| ValidTraversal {
            inner: valid.inner,
            location: valid.inner[valid.location].sym,
        })
    }

    fn onext(&'a self) -> Traversal<'a, HalfEdgeId> {
        self.map(|valid| ValidTraversal {
            inner: valid.inner,
            location: valid.inner[valid.location].onext,
        })
    }

    fn lnext(&'a self) -> Traversal<'a, HalfEdgeId> {
        self.map(|valid| ValidTraversal {
            inner: valid.inner,
            location: valid.inner[valid.location].lnext,
        })
    }

    fn org(&'a self) -> Traversal<'a, VertexId> {
        self.and_then(|valid| {
            Ok(ValidTraversal {
                inner: valid.inner,
                location: valid.inner[valid.location]
                    .org
                    .ok_or(TraversalError::HalfEdgeHasNoOrg(valid.location))?,
            })
        })
    }

    fn lface(&'a self) -> Traversal<'a, FaceId> {
        self.and_then(|valid| {
            Ok(ValidTraversal {
                inner: valid.inner,
                location: valid.inner[valid.location]
                    .lface
                    .ok_or(TraversalError::HalfEdgeHasNoLeftFace(valid.location))?,
            })
        })
    }

    /// Unlike `lface`, a cleared left face is not an error here. Edges keep a
    /// cleared left face between the zap of one side and the zap of the
    /// other.
    fn lface_or_cleared(&'a self) -> Result<Option<FaceId>, TraversalError> {
        self.map(|valid| valid.inner[valid.location].lface)
    }
}

/* =================== */
/*  Generic traversal  */
/* =================== */

pub trait AnyTraversal<'a, L> {
    fn end(&'a self) -> L;
    fn try_end(&'a self) -> Result<L, TraversalError>;
}
impl<'a, L> AnyTraversal<'a, L> for Traversal<'a, L>
where
    L: Location + Copy,
{
    fn end(&'a self) -> L {
        self.map(|valid| valid.location)
            .unwrap_or_else(|err| panic!("Error during traversal: {err:?}"))
    }

    fn try_end(&'a self) -> Result<L, TraversalError> {
        self.map(|valid| valid.location)
    }
}

/* ============ */
/*  Initiators  */
/* ============ */

impl MeshConnectivity {
    pub fn at_halfedge(&self, halfedge_id: HalfEdgeId) -> Traversal<'_, HalfEdgeId> {
        Ok(ValidTraversal {
            inner: self,
            location: halfedge_id,
        })
    }

    pub fn at_face(&self, face_id: FaceId) -> Traversal<'_, FaceId> {
        Ok(ValidTraversal {
            inner: self,
            location: face_id,
        })
    }

    pub fn at_vertex(&self, vertex_id: VertexId) -> Traversal<'_, VertexId> {
        Ok(ValidTraversal {
            inner: self,
            location: vertex_id,
        })
    }
}

/* ================ */
/*  Vertex Helpers  */
/* ================ */

pub trait VertexTraversalHelpers<'a> {
    fn outgoing_halfedges(&'a self) -> Result<SVec<HalfEdgeId>, TraversalError>;
}

impl<'a> VertexTraversalHelpers<'a> for Traversal<'a, VertexId> {
    /// The rotational ring around this vertex. A disconnected vertex yields
    /// an empty list.
    fn outgoing_halfedges(&'a self) -> Result<SVec<HalfEdgeId>, TraversalError> {
        self.and_then(|valid| {
            let mut halfedges = SVec::new();
            if let Some(h0) = valid.inner[valid.location].halfedge {
                let mut h = h0;
                let mut count = 0;
                loop {
                    if count > MAX_LOOP_ITERATIONS {
                        return Err(TraversalError::HalfedgeBadLoop(h0));
                    }
                    count += 1;

                    halfedges.push(h);
                    h = valid.inner.at_halfedge(h).onext().try_end()?;
                    if h == h0 {
                        break;
                    }
                }
            }
            Ok(halfedges)
        })
    }
}

/* ============== */
/*  Face Helpers  */
/* ============== */

pub trait FaceTraversalHelpers<'a> {
    fn halfedges(&'a self) -> Result<SVec<HalfEdgeId>, TraversalError>;
    fn vertices(&'a self) -> Result<SVec<VertexId>, TraversalError>;
}

impl<'a> FaceTraversalHelpers<'a> for Traversal<'a, FaceId> {
    /// The boundary loop of this face, in loop order.
    fn halfedges(&'a self) -> Result<SVec<HalfEdgeId>, TraversalError> {
        self.and_then(|valid| {
            let mut halfedges = SVec::new();
            let h0 = self.halfedge().try_end()?;
            let mut h = h0;
            let mut count = 0;
            loop {
                if count > MAX_LOOP_ITERATIONS {
                    return Err(TraversalError::HalfedgeBadLoop(h0));
                }
                count += 1;

                halfedges.push(h);
                h = valid.inner.at_halfedge(h).lnext().try_end()?;
                if h == h0 {
                    break;
                }
            }
            Ok(halfedges)
        })
    }

    fn vertices(&'a self) -> Result<SVec<VertexId>, TraversalError> {
        self.and_then(|valid| {
            self.halfedges()?
                .iter()
                .map(|h| valid.inner.at_halfedge(*h).org().try_end())
                .collect::<Result<SVec<_>, TraversalError>>()
        })
    }
}

/* ================== */
/*  Halfedge Helpers  */
/* ================== */

pub trait HalfedgeTraversalHelpers<'a> {
    fn oprev(&'a self) -> Traversal<'a, HalfEdgeId>;
    fn lprev(&'a self) -> Traversal<'a, HalfEdgeId>;
    fn dst(&'a self) -> Traversal<'a, VertexId>;
    fn rface(&'a self) -> Traversal<'a, FaceId>;
    fn src_dst_pair(&'a self) -> Result<(VertexId, VertexId), TraversalError>;
}
impl<'a> HalfedgeTraversalHelpers<'a> for Traversal<'a, HalfEdgeId> {
    /// Previous half-edge at the same origin: `sym.lnext`.
    fn oprev(&'a self) -> Traversal<'a, HalfEdgeId> {
        self.and_then(|valid| {
            Ok(ValidTraversal {
                inner: valid.inner,
                location: self.sym().lnext().try_end()?,
            })
        })
    }

    /// Previous half-edge around the left face: `onext.sym`.
    fn lprev(&'a self) -> Traversal<'a, HalfEdgeId> {
        self.and_then(|valid| {
            Ok(ValidTraversal {
                inner: valid.inner,
                location: self.onext().sym().try_end()?,
            })
        })
    }

    /// Destination vertex: the origin of the mate.
    fn dst(&'a self) -> Traversal<'a, VertexId> {
        self.and_then(|valid| {
            Ok(ValidTraversal {
                inner: valid.inner,
                location: self.sym().org().try_end()?,
            })
        })
    }

    /// Right face: the left face of the mate.
    fn rface(&'a self) -> Traversal<'a, FaceId> {
        self.and_then(|valid| {
            Ok(ValidTraversal {
                inner: valid.inner,
                location: self.sym().lface().try_end()?,
            })
        })
    }

    fn src_dst_pair(&'a self) -> Result<(VertexId, VertexId), TraversalError> {
        Ok((self.org().try_end()?, self.dst().try_end()?))
    }
}
