//! Geometry for a rotary menu: a center item surrounded by a ring of items
//! that morphs between a contracted and an expanded arrangement.

mod macros;

pub mod geometry;
pub mod interpolate;
pub mod layout;
pub mod params;
pub mod rotation;

pub use geometry::{Point, Rect, Size, point_on_circle, point_on_circle_rotated};
pub use interpolate::{Lerp, lerp};
pub use layout::{ComponentId, MenuItems, Placement, PlacementSink, RotaryLayout};
pub use params::{LayoutParameters, ParameterError};
pub use rotation::{AbsoluteRotation, RelativeRotation, RotationError, positive_representation};
