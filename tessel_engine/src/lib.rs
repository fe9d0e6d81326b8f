// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Some useful re-exports
pub mod prelude;

/// The halfedge planar-subdivision data structure and its edit operations
pub mod mesh;

/// The per-region status record consumed by the sweep-line algorithm
pub mod sweep;
