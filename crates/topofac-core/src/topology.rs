//! The four-level topology model.
//!
//! A [`Topology`] is a tree `Environment -> Datacenter -> Area -> Component`
//! plus a flat list of [`Connection`]s between components. The tree refers to
//! components by [`ComponentId`]; the component records themselves live in a
//! single flat list in first-appearance order.
//!
//! Everything here is immutable once built. Connections are stored as given:
//! self-loops and references to unknown identities are not filtered here,
//! that is the job of validation and of the renderers.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{
    classify::{AreaType, DeviceType},
    identifier::ComponentId,
};

/// Topology name used when none is configured.
pub const DEFAULT_TOPOLOGY_NAME: &str = "解析的网络拓扑";

/// A device or application instance, the leaf of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    id: ComponentId,
    name: String,
    device_type: DeviceType,
    environment: String,
    datacenter: String,
    area: String,
    area_type: AreaType,
    full_path: String,
}

impl Component {
    /// Creates a component declared under the given ancestors.
    ///
    /// The identity is derived from the four names, see
    /// [`ComponentId::from_path`].
    pub fn new(
        environment: &str,
        datacenter: &str,
        area: &str,
        name: &str,
        device_type: DeviceType,
        area_type: AreaType,
    ) -> Self {
        Self {
            id: ComponentId::from_path(environment, datacenter, area, name),
            name: name.to_string(),
            device_type,
            environment: environment.to_string(),
            datacenter: datacenter.to_string(),
            area: area.to_string(),
            area_type,
            full_path: format!("{environment}/{datacenter}/{area}/{name}"),
        }
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    /// Returns the display name of the device.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn datacenter(&self) -> &str {
        &self.datacenter
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    /// Returns the classification of the area this component was declared in.
    pub fn area_type(&self) -> AreaType {
        self.area_type
    }

    /// Returns the `env/dc/area/device` path.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }
}

/// A network zone inside a datacenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    name: String,
    area_type: AreaType,
    components: Vec<ComponentId>,
}

impl Area {
    pub fn new(name: impl Into<String>, area_type: AreaType, components: Vec<ComponentId>) -> Self {
        Self {
            name: name.into(),
            area_type,
            components,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn area_type(&self) -> AreaType {
        self.area_type
    }

    /// Returns the component identities in first-appearance order.
    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Datacenter {
    name: String,
    areas: Vec<Area>,
}

impl Datacenter {
    pub fn new(name: impl Into<String>, areas: Vec<Area>) -> Self {
        Self {
            name: name.into(),
            areas,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }
}

/// Top-level grouping of a topology, such as a production network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    name: String,
    datacenters: Vec<Datacenter>,
}

impl Environment {
    pub fn new(name: impl Into<String>, datacenters: Vec<Datacenter>) -> Self {
        Self {
            name: name.into(),
            datacenters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn datacenters(&self) -> &[Datacenter] {
        &self.datacenters
    }
}

/// Kind of a connection between two components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    #[default]
    Network,
}

/// A directed edge between two components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    id: String,
    source: ComponentId,
    target: ComponentId,
    source_name: String,
    target_name: String,
    kind: ConnectionKind,
    description: String,
}

impl Connection {
    /// Creates the `sequence`-th connection (1-based) from `source` to `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topofac_core::classify::{AreaType, DeviceType};
    /// # use topofac_core::topology::{Component, Connection};
    /// let a = Component::new("生产网", "亦庄", "核心区", "路由器1", DeviceType::Router, AreaType::Core);
    /// let b = Component::new("生产网", "亦庄", "核心区", "交换机1", DeviceType::Switch, AreaType::Core);
    ///
    /// let conn = Connection::new(1, &a, &b);
    /// assert_eq!(conn.id(), "conn_1");
    /// assert_eq!(conn.description(), "路由器1 连接 交换机1");
    /// ```
    pub fn new(sequence: usize, source: &Component, target: &Component) -> Self {
        Self {
            id: format!("conn_{sequence}"),
            source: source.id().clone(),
            target: target.id().clone(),
            source_name: source.name().to_string(),
            target_name: target.name().to_string(),
            kind: ConnectionKind::Network,
            description: format!("{} 连接 {}", source.name(), target.name()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &ComponentId {
        &self.source
    }

    pub fn target(&self) -> &ComponentId {
        &self.target
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` if the connection starts and ends at the same component.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Summary counts of a topology.
///
/// Environment, datacenter and area counts are counts of distinct *names*,
/// so two datacenters with the same name under different environments count
/// once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub environments: usize,
    pub datacenters: usize,
    pub areas: usize,
    pub components: usize,
    pub connections: usize,
}

/// A parsed network topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    name: String,
    environments: Vec<Environment>,
    components: Vec<Component>,
    connections: Vec<Connection>,
    statistics: Statistics,
    #[serde(skip)]
    index: HashMap<ComponentId, usize>,
}

impl Topology {
    /// Assembles a topology and computes its statistics.
    pub fn new(
        name: impl Into<String>,
        environments: Vec<Environment>,
        components: Vec<Component>,
        connections: Vec<Connection>,
    ) -> Self {
        let statistics = Self::compute_statistics(&environments, &components, &connections);
        let index = components
            .iter()
            .enumerate()
            .map(|(idx, component)| (component.id().clone(), idx))
            .collect();
        Self {
            name: name.into(),
            environments,
            components,
            connections,
            statistics,
            index,
        }
    }

    /// Creates a topology with no nodes and no connections.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new(), Vec::new(), Vec::new())
    }

    fn compute_statistics(
        environments: &[Environment],
        components: &[Component],
        connections: &[Connection],
    ) -> Statistics {
        let datacenters = environments.iter().flat_map(Environment::datacenters);
        let areas = datacenters.clone().flat_map(Datacenter::areas);

        Statistics {
            environments: environments
                .iter()
                .map(Environment::name)
                .collect::<HashSet<_>>()
                .len(),
            datacenters: datacenters.map(Datacenter::name).collect::<HashSet<_>>().len(),
            areas: areas.map(Area::name).collect::<HashSet<_>>().len(),
            components: components.len(),
            connections: connections.len(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    /// Returns all components in first-appearance order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Returns all connections in input order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    /// Looks up a component by identity.
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.index.get(id).map(|&idx| &self.components[idx])
    }

    /// Returns `true` if both endpoints of `connection` are known components.
    pub fn resolves(&self, connection: &Connection) -> bool {
        self.index.contains_key(connection.source()) && self.index.contains_key(connection.target())
    }

    /// Returns `true` if the topology has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
