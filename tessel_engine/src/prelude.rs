pub use anyhow::{anyhow, bail, Context, Result};

pub use glam::{Vec2, Vec3};

pub use itertools::Itertools;
pub use std::collections::{HashMap, HashSet};

pub use crate::mesh::halfedge;
pub use crate::mesh::halfedge::*;

pub use tessel_commons::math::*;
pub use tessel_commons::utils::*;
