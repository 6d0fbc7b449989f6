//! Layout boxes, one tree per topology.

use topofac_core::{
    direction::Direction,
    geometry::Bounds,
    identifier::ComponentId,
};

/// Positioned boxes for a whole topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    direction: Direction,
    environments: Vec<EnvironmentBox>,
}

impl Layout {
    pub(crate) fn new(direction: Direction, environments: Vec<EnvironmentBox>) -> Self {
        Self {
            direction,
            environments,
        }
    }

    /// Returns the direction the environments were sequenced in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn environments(&self) -> &[EnvironmentBox] {
        &self.environments
    }

    /// Returns `true` if the layout holds no boxes at all.
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    /// Returns the absolute bounds enclosing every environment, or `None`
    /// for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        self.environments
            .iter()
            .map(EnvironmentBox::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Returns the number of component boxes in the layout.
    pub fn component_count(&self) -> usize {
        self.environments
            .iter()
            .flat_map(|env| &env.datacenters)
            .flat_map(|dc| &dc.areas)
            .map(|area| area.components.len())
            .sum()
    }
}

/// An environment box in absolute coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentBox {
    name: String,
    bounds: Bounds,
    datacenters: Vec<DatacenterBox>,
}

impl EnvironmentBox {
    pub(crate) fn new(name: impl Into<String>, bounds: Bounds, datacenters: Vec<DatacenterBox>) -> Self {
        Self {
            name: name.into(),
            bounds,
            datacenters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the absolute bounds of this environment.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn datacenters(&self) -> &[DatacenterBox] {
        &self.datacenters
    }

    /// Resolves a child box position to absolute coordinates.
    ///
    /// `relative` is a chain of parent-relative bounds leading from a
    /// datacenter of this environment down to the box of interest; the
    /// last entry is the box itself.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topofac::DiagramBuilder;
    /// let builder = DiagramBuilder::default();
    /// let topology = builder
    ///     .parse("【生产网】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】")
    ///     .unwrap();
    /// let layout = builder.layout(&topology);
    ///
    /// let env = &layout.environments()[0];
    /// let dc = &env.datacenters()[0];
    /// let dc_abs = env.absolute(&[dc.bounds()]);
    /// assert_eq!(dc_abs.min_x(), env.bounds().min_x() + dc.bounds().min_x());
    /// ```
    pub fn absolute(&self, relative: &[Bounds]) -> Bounds {
        relative
            .iter()
            .fold(self.bounds, |parent, child| offset(parent, *child))
    }
}

/// A datacenter box, relative to its environment.
#[derive(Debug, Clone, PartialEq)]
pub struct DatacenterBox {
    name: String,
    bounds: Bounds,
    areas: Vec<AreaBox>,
}

impl DatacenterBox {
    pub(crate) fn new(name: impl Into<String>, bounds: Bounds, areas: Vec<AreaBox>) -> Self {
        Self {
            name: name.into(),
            bounds,
            areas,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn areas(&self) -> &[AreaBox] {
        &self.areas
    }
}

/// An area box, relative to its datacenter.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaBox {
    name: String,
    bounds: Bounds,
    components: Vec<ComponentBox>,
}

impl AreaBox {
    pub(crate) fn new(name: impl Into<String>, bounds: Bounds, components: Vec<ComponentBox>) -> Self {
        Self {
            name: name.into(),
            bounds,
            components,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn components(&self) -> &[ComponentBox] {
        &self.components
    }
}

/// A component box, relative to its area.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentBox {
    id: ComponentId,
    bounds: Bounds,
}

impl ComponentBox {
    pub(crate) fn new(id: ComponentId, bounds: Bounds) -> Self {
        Self { id, bounds }
    }

    /// Returns the identity of the component this box belongs to.
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Moves `child` from `parent`-relative into `parent`'s coordinate space.
pub(crate) fn offset(parent: Bounds, child: Bounds) -> Bounds {
    child.translate(parent.min_point())
}
