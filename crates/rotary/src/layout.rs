use crate::geometry::{Point, Rect, Size, point_on_circle_rotated};
use crate::interpolate::{Lerp, lerp};
use crate::params::LayoutParameters;
use crate::rotation::{AbsoluteRotation, RelativeRotation};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Distinguishes the single center item from the items on the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentId<T> {
    Center,
    RingItem(T),
}

/// Where one item goes for one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement<T> {
    pub id: ComponentId<T>,
    /// The item's anchor point. Items are always anchored at their center.
    pub center: Point,
    pub size: Size,
}

/// Receives placements as the engine computes them.
pub trait PlacementSink<T> {
    fn place(&mut self, placement: Placement<T>);
}

impl<T> PlacementSink<T> for Vec<Placement<T>> {
    fn place(&mut self, placement: Placement<T>) {
        self.push(placement);
    }
}

/// An item set split into its center and its ring, ring order preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItems<T> {
    pub ring: Vec<T>,
}

impl<T> MenuItems<T> {
    pub fn new(ring: Vec<T>) -> Self {
        Self { ring }
    }

    /// Returns `None` when the set has no center. Repeated center entries
    /// collapse into one.
    pub fn from_components(components: impl IntoIterator<Item = ComponentId<T>>) -> Option<Self> {
        let mut has_center = false;
        let mut ring = Vec::new();
        for component in components {
            match component {
                ComponentId::Center => has_center = true,
                ComponentId::RingItem(id) => ring.push(id),
            }
        }
        has_center.then_some(Self { ring })
    }

    pub fn components(&self) -> impl Iterator<Item = ComponentId<T>> + '_
    where
        T: Clone,
    {
        std::iter::once(ComponentId::Center)
            .chain(self.ring.iter().cloned().map(ComponentId::RingItem))
    }
}

/// A snapshot of everything that shapes one frame of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotaryLayout {
    pub winding_count: f64,
    pub expansion_level: f64,
    pub parameters: LayoutParameters,
}

impl RotaryLayout {
    pub fn new(winding_count: f64, parameters: LayoutParameters, expansion_level: f64) -> Self {
        Self {
            winding_count,
            expansion_level,
            parameters,
        }
    }

    fn expansion_interpolation<T: Lerp>(&self, contracted: T, expanded: T) -> T {
        lerp(contracted, expanded, self.expansion_level)
    }

    pub fn neutral_rotation(&self) -> AbsoluteRotation {
        self.parameters
            .neutral_rotation_from_zero
            .equivalent_absolute_rotation()
    }

    pub fn center_item_radius(&self) -> f64 {
        self.expansion_interpolation(
            self.parameters.center_item_radius_when_contracted,
            self.parameters.center_item_radius_when_expanded,
        )
    }

    pub fn inner_ring_radius(&self) -> f64 {
        self.expansion_interpolation(
            self.parameters.item_ring_radius_when_contracted,
            self.parameters.item_ring_radius_when_expanded,
        )
    }

    pub fn ring_item_radius(&self) -> f64 {
        self.expansion_interpolation(
            self.parameters.item_radius_when_contracted,
            self.parameters.item_radius_when_expanded,
        )
    }

    pub fn outer_ring_radius(&self) -> f64 {
        self.inner_ring_radius() + 2.0 * self.ring_item_radius()
    }

    /// Radius of the circle the ring item centers sit on.
    pub fn item_placement_radius(&self) -> f64 {
        self.inner_ring_radius() + self.ring_item_radius()
    }

    /// Zero when contracted, `winding_count` full turns when expanded.
    pub fn winding_rotation_contribution(&self) -> RelativeRotation {
        self.expansion_interpolation(
            RelativeRotation::ZERO,
            RelativeRotation::complete_rotation(self.winding_count),
        )
    }

    pub fn offset_rotation_contribution(&self) -> RelativeRotation {
        self.expansion_interpolation(
            self.parameters.rotary_offset_when_contracted,
            self.parameters.rotary_offset_when_expanded,
        )
    }

    pub fn common_ring_item_rotation(&self) -> RelativeRotation {
        self.winding_rotation_contribution() + self.offset_rotation_contribution()
    }

    /// A square footprint that holds the menu at any expansion level, so the
    /// surrounding layout never changes size while the menu animates.
    pub fn size_that_fits(&self) -> Size {
        let p = &self.parameters;
        let effective_radius = p
            .center_item_radius_when_expanded
            .max(p.center_item_radius_when_contracted)
            .max(p.item_radius_when_expanded + p.item_ring_radius_when_expanded);
        Size::square(3.0 * effective_radius)
    }

    /// Angle of the ring item at `index` among `count` evenly spaced items.
    pub fn ring_item_rotation(&self, index: usize, count: NonZeroUsize) -> AbsoluteRotation {
        let step = RelativeRotation::step_between(count);
        self.neutral_rotation()
            .rotated(self.common_ring_item_rotation() + step * index)
    }

    /// Places the center item and then each ring item, in ring order, into
    /// `sink`. Returns how many placements were made.
    ///
    /// An item set without a center places nothing.
    pub fn place_subviews<T, S>(
        &self,
        bounds: Rect,
        components: impl IntoIterator<Item = ComponentId<T>>,
        sink: &mut S,
    ) -> usize
    where
        S: PlacementSink<T> + ?Sized,
    {
        let Some(items) = MenuItems::from_components(components) else {
            log::trace!("no center item, skipping layout pass");
            return 0;
        };

        let center_point = bounds.center();
        sink.place(Placement {
            id: ComponentId::Center,
            center: center_point,
            size: Size::square(2.0 * self.center_item_radius()),
        });

        let Some(count) = NonZeroUsize::new(items.ring.len()) else {
            return 1;
        };

        let step = RelativeRotation::step_between(count);
        let common_rotation = self.common_ring_item_rotation();
        let neutral_rotation = self.neutral_rotation();
        let ring_item_radius = self.ring_item_radius();
        let placement_radius = self.item_placement_radius();

        for (index, id) in items.ring.into_iter().enumerate() {
            sink.place(Placement {
                id: ComponentId::RingItem(id),
                center: point_on_circle_rotated(
                    center_point,
                    placement_radius,
                    neutral_rotation,
                    common_rotation + step * index,
                ),
                size: Size::square(2.0 * ring_item_radius),
            });
        }

        log::trace!(
            "placed {} ring items at level {:.3}",
            count,
            self.expansion_level
        );
        count.get() + 1
    }

    pub fn layout<T>(
        &self,
        bounds: Rect,
        components: impl IntoIterator<Item = ComponentId<T>>,
    ) -> Vec<Placement<T>> {
        let mut placements = Vec::new();
        self.place_subviews(bounds, components, &mut placements);
        placements
    }
}
