// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::prelude::*;

use slotmap::SlotMap;

slotmap::new_key_type! { pub struct ActiveRegionId; }

/// Arena the sweep algorithm acquires its status records from. A record is
/// acquired when a new upper edge enters the sweep order and released when
/// the region is retired; both transitions are driven by the sweep
/// algorithm, never by the record itself.
pub type ActiveRegionArena<N> = SlotMap<ActiveRegionId, ActiveRegion<N>>;

/// Interface to the externally owned ordered dictionary that keeps the
/// active regions sorted left to right along the sweep line. Only node-level
/// navigation is consumed here; ordering and comparison live entirely with
/// the implementor.
pub trait RegionOrder {
    /// Handle to one node of the ordered structure.
    type Node: Copy;

    fn successor(&self, node: Self::Node) -> Self::Node;
    fn predecessor(&self, node: Self::Node) -> Self::Node;

    /// The region stored at `node`.
    fn region(&self, node: Self::Node) -> ActiveRegionId;
}

/// For each pair of adjacent edges crossing the sweep line, there is an
/// ActiveRegion to represent the region between them. The active regions are
/// kept in sorted order in a dynamic dictionary (see [`RegionOrder`]). As
/// the sweep line crosses each vertex, we update the affected regions.
#[derive(Debug, Clone)]
pub struct ActiveRegion<N> {
    /// The upper edge of the region, directed right to left.
    pub e_up: HalfEdgeId,

    /// Dictionary node corresponding to the `e_up` edge, once the region has
    /// been linked into the sweep order.
    pub node_up: Option<N>,

    /// Used to determine which regions are inside the polygon.
    pub winding_number: i32,

    /// Whether this region is inside the polygon.
    pub inside: bool,

    /// Marks fake regions bounding the sweep range at either extreme.
    pub sentinel: bool,

    /// Marks regions where the upper or lower edge has changed, but we
    /// haven't checked whether they intersect yet.
    pub dirty: bool,

    /// Marks temporary edges introduced when we process a vertex without any
    /// edges leaving to the right. Such an edge must be replaced once a real
    /// right-going edge shows up.
    pub fix_upper_edge: bool,
}

impl<N: Copy> ActiveRegion<N> {
    /// A fresh record bounded above by `e_up`, not yet linked into the sweep
    /// order.
    pub fn new(e_up: HalfEdgeId) -> Self {
        Self {
            e_up,
            node_up: None,
            winding_number: 0,
            inside: false,
            sentinel: false,
            dirty: false,
            fix_upper_edge: false,
        }
    }

    /// Returns the ActiveRegion above this one, or `None` while this record
    /// is not linked into the sweep order.
    pub fn region_above<D>(&self, order: &D) -> Option<ActiveRegionId>
    where
        D: RegionOrder<Node = N>,
    {
        self.node_up.map(|node| order.region(order.successor(node)))
    }

    /// Returns the ActiveRegion below this one, or `None` while this record
    /// is not linked into the sweep order.
    pub fn region_below<D>(&self, order: &D) -> Option<ActiveRegionId>
    where
        D: RegionOrder<Node = N>,
    {
        self.node_up
            .map(|node| order.region(order.predecessor(node)))
    }
}
