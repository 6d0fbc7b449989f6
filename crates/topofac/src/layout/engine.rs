//! The box-layout engine.
//!
//! Sizing runs bottom-up (area, datacenter, environment) and placement
//! top-down. Every container reserves `header_height` at its top for its
//! title, so children start below it.

use log::{debug, info, trace};

use topofac_core::{
    direction::Direction,
    geometry::{Bounds, Point, Size},
    topology::{Area, Datacenter, Environment, Topology},
};

use super::boxes::{AreaBox, ComponentBox, DatacenterBox, EnvironmentBox, Layout};
use crate::config::LayoutConfig;

/// Computes a [`Layout`] from a [`Topology`].
///
/// # Examples
///
/// ```
/// # use topofac::{config::LayoutConfig, layout::Engine};
/// let engine = Engine::new(&LayoutConfig::default());
///
/// let one = engine.area_size(1);
/// let three = engine.area_size(3);
/// assert!(three.height() > one.height());
/// assert_eq!(three.width(), one.width());
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: LayoutConfig,
}

impl Engine {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Lays out every environment of `topology`.
    ///
    /// Environments are placed at absolute coordinates starting at the
    /// configured origin and advance along the principal direction by their
    /// own extent plus the environment gap. An empty topology yields an
    /// empty layout.
    pub fn calculate(&self, topology: &Topology) -> Layout {
        let direction = self.config.direction();
        info!(
            environments = topology.environments().len(),
            direction = direction.as_flowchart_str();
            "Calculating layout"
        );

        let mut cursor = Point::new(self.config.origin_x(), self.config.origin_y());
        let mut environments = Vec::with_capacity(topology.environments().len());

        for environment in topology.environments() {
            let env_box = self.layout_environment(environment, cursor);
            let size = env_box.bounds().to_size();
            trace!(
                environment = env_box.name(),
                x = cursor.x(),
                y = cursor.y(),
                width = size.width(),
                height = size.height();
                "Placed environment"
            );

            let gap = self.config.environment_gap();
            cursor = match direction {
                Direction::LeftToRight => Point::new(cursor.x() + size.width() + gap, cursor.y()),
                Direction::TopToBottom => Point::new(cursor.x(), cursor.y() + size.height() + gap),
            };
            environments.push(env_box);
        }

        let layout = Layout::new(direction, environments);
        debug!(components = layout.component_count(); "Layout calculated");
        layout
    }

    /// Returns the size of an area holding `component_count` components.
    ///
    /// An empty area is as tall as an area with one component.
    pub fn area_size(&self, component_count: usize) -> Size {
        let c = &self.config;
        let rows = component_count.max(1) as f32;
        let gaps = component_count.saturating_sub(1) as f32;

        let height = c.header_height()
            + 2.0 * c.area_padding()
            + rows * c.component_height()
            + gaps * c.component_spacing();
        Size::new(c.area_width(), height)
    }

    fn datacenter_height(&self, datacenter: &Datacenter) -> f32 {
        let tallest = datacenter
            .areas()
            .iter()
            .map(|area| self.area_size(area.components().len()).height())
            .fold(0.0, f32::max);

        self.config.header_height() + 2.0 * self.config.datacenter_padding() + tallest
    }

    fn environment_size(&self, environment: &Environment) -> Size {
        let c = &self.config;
        let columns = environment
            .datacenters()
            .iter()
            .map(|dc| dc.areas().len())
            .max()
            .unwrap_or(0);
        let width = 2.0 * c.environment_padding()
            + 2.0 * c.datacenter_padding()
            + columns as f32 * c.area_width()
            + columns.saturating_sub(1) as f32 * c.area_spacing();

        let stacked: f32 = environment
            .datacenters()
            .iter()
            .map(|dc| self.datacenter_height(dc))
            .sum();
        let gaps = environment.datacenters().len().saturating_sub(1) as f32;
        let height = c.header_height()
            + 2.0 * c.environment_padding()
            + stacked
            + gaps * c.datacenter_spacing();

        Size::new(width, height)
    }

    fn layout_environment(&self, environment: &Environment, top_left: Point) -> EnvironmentBox {
        let c = &self.config;
        let size = self.environment_size(environment);
        let dc_width = size.width() - 2.0 * c.environment_padding();

        let mut y = c.header_height() + c.environment_padding();
        let mut datacenters = Vec::with_capacity(environment.datacenters().len());
        for datacenter in environment.datacenters() {
            let height = self.datacenter_height(datacenter);
            let bounds = Bounds::new_from_top_left(
                Point::new(c.environment_padding(), y),
                Size::new(dc_width, height),
            );
            datacenters.push(self.layout_datacenter(datacenter, bounds));
            y += height + c.datacenter_spacing();
        }

        EnvironmentBox::new(
            environment.name(),
            Bounds::new_from_top_left(top_left, size),
            datacenters,
        )
    }

    fn layout_datacenter(&self, datacenter: &Datacenter, bounds: Bounds) -> DatacenterBox {
        let c = &self.config;
        let y = c.header_height() + c.datacenter_padding();

        let areas = datacenter
            .areas()
            .iter()
            .enumerate()
            .map(|(column, area)| {
                let x = c.datacenter_padding() + column as f32 * (c.area_width() + c.area_spacing());
                let bounds = Bounds::new_from_top_left(
                    Point::new(x, y),
                    self.area_size(area.components().len()),
                );
                AreaBox::new(area.name(), bounds, self.layout_components(area))
            })
            .collect();

        DatacenterBox::new(datacenter.name(), bounds, areas)
    }

    fn layout_components(&self, area: &Area) -> Vec<ComponentBox> {
        let c = &self.config;
        // Centered horizontally in the area.
        let x = ((c.area_width() - c.component_width()) / 2.0).max(0.0);
        let size = Size::new(c.component_width(), c.component_height());

        area.components()
            .iter()
            .enumerate()
            .map(|(row, id)| {
                let y = c.header_height()
                    + c.area_padding()
                    + row as f32 * (c.component_height() + c.component_spacing());
                ComponentBox::new(id.clone(), Bounds::new_from_top_left(Point::new(x, y), size))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use topofac_parser::{ParseConfig, parse};

    use super::*;

    const TWO_ENVIRONMENTS: &str = "\
【生产网】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】
【生产网】【亦庄】的【接入区】【服务器1】连接【生产网】【亦庄】的【核心区】【交换机1】
【生产网】【酒仙桥】的【核心区】【路由器2】连接【生产网】【亦庄】的【核心区】【路由器1】
【测试网】【亦庄】的【核心区】【防火墙1】连接【生产网】【亦庄】的【核心区】【路由器1】
";

    fn topology(source: &str) -> Topology {
        parse(source, &ParseConfig::default()).unwrap()
    }

    fn engine(direction: Direction) -> Engine {
        Engine::new(&LayoutConfig::default().with_direction(direction))
    }

    fn assert_bounds(bounds: Bounds, x: f32, y: f32, width: f32, height: f32) {
        assert!(approx_eq!(f32, bounds.min_x(), x), "x: {bounds:?}");
        assert!(approx_eq!(f32, bounds.min_y(), y), "y: {bounds:?}");
        assert!(approx_eq!(f32, bounds.width(), width), "width: {bounds:?}");
        assert!(approx_eq!(f32, bounds.height(), height), "height: {bounds:?}");
    }

    fn contains(parent: Bounds, child: Bounds) -> bool {
        child.min_x() >= 0.0
            && child.min_y() >= 0.0
            && child.max_x() <= parent.width()
            && child.max_y() <= parent.height()
    }

    #[test]
    fn test_single_area_dimensions() {
        let topology = topology(
            "【生产网】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】",
        );
        let layout = engine(Direction::LeftToRight).calculate(&topology);

        let env = &layout.environments()[0];
        assert_eq!(env.name(), "生产网");
        assert_bounds(env.bounds(), 50.0, 50.0, 300.0, 370.0);

        let dc = &env.datacenters()[0];
        assert_bounds(dc.bounds(), 20.0, 60.0, 260.0, 290.0);

        let area = &dc.areas()[0];
        assert_bounds(area.bounds(), 20.0, 60.0, 220.0, 210.0);

        let components = area.components();
        assert_eq!(components.len(), 2);
        assert_bounds(components[0].bounds(), 40.0, 60.0, 140.0, 40.0);
        assert_bounds(components[1].bounds(), 40.0, 150.0, 140.0, 40.0);
    }

    #[test]
    fn test_children_fit_inside_parents() {
        let layout = engine(Direction::LeftToRight).calculate(&topology(TWO_ENVIRONMENTS));

        for env in layout.environments() {
            for dc in env.datacenters() {
                assert!(contains(env.bounds(), dc.bounds()), "{}", dc.name());
                for area in dc.areas() {
                    assert!(contains(dc.bounds(), area.bounds()), "{}", area.name());
                    for component in area.components() {
                        assert!(contains(area.bounds(), component.bounds()));
                    }
                }
            }
        }
    }

    #[test]
    fn test_siblings_do_not_overlap() {
        let layout = engine(Direction::LeftToRight).calculate(&topology(TWO_ENVIRONMENTS));
        let env = &layout.environments()[0];

        let dcs = env.datacenters();
        assert_eq!(dcs.len(), 2);
        assert!(dcs[0].bounds().max_y() < dcs[1].bounds().min_y());

        let areas = dcs[0].areas();
        assert_eq!(areas.len(), 2);
        assert!(areas[0].bounds().max_x() < areas[1].bounds().min_x());

        let components = areas[0].components();
        assert!(components[0].bounds().max_y() < components[1].bounds().min_y());
    }

    #[test]
    fn test_environment_width_follows_widest_datacenter() {
        let layout = engine(Direction::LeftToRight).calculate(&topology(TWO_ENVIRONMENTS));
        let env = &layout.environments()[0];

        // Two areas side by side in 亦庄.
        let expected = 2.0 * 20.0 + 2.0 * 20.0 + 2.0 * 220.0 + 30.0;
        assert!(approx_eq!(f32, env.bounds().width(), expected));
        for dc in env.datacenters() {
            assert!(approx_eq!(f32, dc.bounds().width(), expected - 40.0));
        }
    }

    #[test]
    fn test_direction_changes_only_the_advancing_axis() {
        let topology = topology(TWO_ENVIRONMENTS);
        let row = engine(Direction::LeftToRight).calculate(&topology);
        let column = engine(Direction::TopToBottom).calculate(&topology);

        assert_eq!(row.environments().len(), 2);
        assert_eq!(column.environments().len(), 2);

        let (first, second) = (&row.environments()[0], &row.environments()[1]);
        assert!(approx_eq!(f32, second.bounds().min_x(), first.bounds().max_x() + 50.0));
        assert!(approx_eq!(f32, second.bounds().min_y(), first.bounds().min_y()));

        let (first, second) = (&column.environments()[0], &column.environments()[1]);
        assert!(approx_eq!(f32, second.bounds().min_y(), first.bounds().max_y() + 50.0));
        assert!(approx_eq!(f32, second.bounds().min_x(), first.bounds().min_x()));

        for (a, b) in row.environments().iter().zip(column.environments()) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.bounds().to_size(), b.bounds().to_size());
            assert_eq!(a.datacenters(), b.datacenters());
        }
    }

    #[test]
    fn test_empty_topology_yields_empty_layout() {
        let layout = engine(Direction::LeftToRight).calculate(&Topology::empty("空"));
        assert!(layout.is_empty());
    }

    #[test]
    fn test_empty_area_is_as_tall_as_one_component() {
        let engine = engine(Direction::LeftToRight);
        assert_eq!(engine.area_size(0), engine.area_size(1));
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn area_height_is_bounded_below_and_monotonic(count in 1usize..200) {
                let config = LayoutConfig::default();
                let engine = Engine::new(&config);

                let lower = config.header_height()
                    + 2.0 * config.area_padding()
                    + config.component_height();
                let height = engine.area_size(count).height();
                prop_assert!(height >= lower);
                prop_assert!(engine.area_size(count + 1).height() > height);
            }
        }
    }
}
