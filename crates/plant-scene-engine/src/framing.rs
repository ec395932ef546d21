// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Camera targets that frame a bounding box.

use core::fmt;

use glam::Vec3;
use plant_geom::Aabb;
use plant_scene_port::CameraState;

use crate::config::FramingConfig;

/// Which angle a framing request uses. Repeated requests cycle through all three.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Raised three-quarter view from +Z.
    #[default]
    Default,
    /// Looking straight down.
    TopDown,
    /// Diagonal view from +X +Y +Z.
    Isometric,
}

impl ViewKind {
    /// Views in cycle order.
    pub const ALL: [Self; 3] = [Self::Default, Self::TopDown, Self::Isometric];

    /// Position in the cycle.
    pub const fn index(self) -> usize {
        match self {
            Self::Default => 0,
            Self::TopDown => 1,
            Self::Isometric => 2,
        }
    }

    /// View at `index`, wrapping.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Next view in the cycle.
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::TopDown => "top-down",
            Self::Isometric => "isometric",
        })
    }
}

/// Distance that fits `max_dim` into a vertical field of view `fov_y` (radians).
pub fn fit_distance(max_dim: f32, fov_y: f32, cfg: &FramingConfig) -> f32 {
    let fitted = max_dim / (2.0 * (fov_y * 0.5).tan());
    fitted.max(cfg.min_distance) * cfg.fill
}

/// Camera pose framing `bounds` from `view`. `None` for an empty box.
pub fn frame_bounds(
    bounds: &Aabb,
    view: ViewKind,
    fov_y: f32,
    cfg: &FramingConfig,
) -> Option<CameraState> {
    if bounds.is_degenerate() || !bounds.size().is_finite() {
        return None;
    }
    let center = bounds.center();
    let size = bounds.size();
    let max_dim = bounds.max_dimension();
    let distance = fit_distance(max_dim, fov_y, cfg);
    let position = match view {
        ViewKind::Default => {
            let mut p = Vec3::new(
                center.x,
                center.y + (size.y * 0.5).max(max_dim * 0.3) + 2.0,
                center.z + distance,
            );
            if size.y < max_dim * 0.2 {
                p.y = (center.y + distance * 0.5).max(center.y + 2.0);
            }
            p
        }
        ViewKind::TopDown => {
            let height = (max_dim * 1.2).max(distance * 0.8);
            Vec3::new(center.x, center.y + height, center.z + 0.1)
        }
        ViewKind::Isometric => center + Vec3::ONE * (distance * 0.707),
    };
    Some(CameraState::new(position, center))
}
