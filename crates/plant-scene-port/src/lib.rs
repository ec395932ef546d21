// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene port contract for the plant scene engine.
//!
//! This crate defines the domain contract between the hosting application and
//! the engine. It contains NO scene-graph or rendering logic.
//!
//! # Design Principles
//!
//! - **Data is declarative**: The host hands over whole equipment and layer
//!   lists; the engine diffs them against what it has built.
//! - **Collaborators are ports**: Geometry construction, color computation,
//!   the undo stack and the persistence store are traits implemented outside
//!   the engine.
//! - **No time ownership**: All timestamps come from the host's scheduler.

use thiserror::Error;

/// Error type for validating domain records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The record has no usable tag.
    #[error("equipment record has an empty tag")]
    EmptyTag,
    /// A numeric attribute is NaN or infinite.
    #[error("equipment {tag}: non-finite {field}")]
    NonFinite {
        /// Offending equipment tag.
        tag: String,
        /// Field name (`position`, `rotation`, ...).
        field: &'static str,
    },
    /// The same tag appears more than once in one list.
    #[error("duplicate equipment tag {0}")]
    DuplicateTag(String),
    /// A color string could not be parsed.
    #[error("invalid color {0:?}")]
    InvalidColor(String),
    /// No layer with this id exists.
    #[error("unknown layer {0}")]
    UnknownLayer(String),
}

mod annotation;
mod camera;
mod color;
mod command;
mod equipment;
mod highlight;
mod layer;
mod port;
mod selection;
mod shape;

pub use annotation::Annotation;
pub use camera::CameraState;
pub use color::Color;
pub use command::SceneCommand;
pub use equipment::{
    Anchoring, ColorMode, Dimensions, EquipmentItem, EquipmentPatch, EquipmentType, Orientation,
};
pub use highlight::{OutlineParams, OutlineStyle, HIDDEN_EDGE_COLOR, VISIBLE_EDGE_COLOR};
pub use layer::{
    annotations_visible, default_layers, is_kind_visible, terrain_visible, LayerState, LayerTarget,
};
pub use port::{AnnotationStore, ColorResolver, CommandSink, EquipmentStore, GeometryFactory};
pub use selection::SelectionState;
pub use shape::{Primitive, Shape, ShapePart};
