//! Folding extracted statements into a [`Topology`].
//!
//! Statements are folded into an [`Accumulator`] of insertion-ordered maps:
//! components by identity, and the nested `environment -> datacenter -> area`
//! path maps holding component identities. The tree is materialized once the
//! fold is complete, so every level keeps first-appearance order.

use indexmap::{IndexMap, map::Entry};
use log::{debug, trace};

use topofac_core::{
    identifier::ComponentId,
    topology::{Area, Component, Connection, Datacenter, Environment, Topology},
};

use crate::{ParseConfig, extract::Extraction, grammar::Endpoint, grammar::Statement};

type AreaMap<'src> = IndexMap<&'src str, Vec<ComponentId>>;
type DatacenterMap<'src> = IndexMap<&'src str, AreaMap<'src>>;
type EnvironmentMap<'src> = IndexMap<&'src str, DatacenterMap<'src>>;

#[derive(Debug, Default)]
struct Accumulator<'src> {
    components: IndexMap<ComponentId, Component>,
    tree: EnvironmentMap<'src>,
    links: Vec<(ComponentId, ComponentId)>,
}

impl<'src> Accumulator<'src> {
    fn with_statement(mut self, statement: &Statement<'src>, config: &ParseConfig) -> Self {
        let source = self.register(statement.source(), config);
        let target = self.register(statement.target(), config);
        self.links.push((source, target));
        self
    }

    /// Register an endpoint, returning its identity.
    ///
    /// Identities are injective over the four names, so a repeated path
    /// only refers to the component registered first.
    fn register(&mut self, endpoint: &Endpoint<'src>, config: &ParseConfig) -> ComponentId {
        let component = Component::new(
            endpoint.environment(),
            endpoint.datacenter(),
            endpoint.area(),
            endpoint.device(),
            config.devices.classify(endpoint.device()),
            config.areas.classify(endpoint.area()),
        );
        let id = component.id().clone();

        if let Entry::Vacant(entry) = self.components.entry(id.clone()) {
            trace!(id = id.as_str(), device_type = component.device_type().as_str(); "New component");
            entry.insert(component);
            self.tree
                .entry(endpoint.environment())
                .or_default()
                .entry(endpoint.datacenter())
                .or_default()
                .entry(endpoint.area())
                .or_default()
                .push(id.clone());
        }
        id
    }

    fn materialize(self, config: &ParseConfig) -> Topology {
        let Accumulator {
            components,
            tree,
            links,
        } = self;

        let environments = tree
            .into_iter()
            .map(|(env, datacenters)| {
                let datacenters = datacenters
                    .into_iter()
                    .map(|(dc, areas)| {
                        let areas = areas
                            .into_iter()
                            .map(|(area, ids)| Area::new(area, config.areas.classify(area), ids))
                            .collect();
                        Datacenter::new(dc, areas)
                    })
                    .collect();
                Environment::new(env, datacenters)
            })
            .collect();

        // Both endpoints of every link were registered above.
        let connections = links
            .iter()
            .enumerate()
            .filter_map(|(idx, (source, target))| {
                let source = components.get(source)?;
                let target = components.get(target)?;
                Some(Connection::new(idx + 1, source, target))
            })
            .collect();

        Topology::new(
            config.topology_name.clone(),
            environments,
            components.into_values().collect(),
            connections,
        )
    }
}

/// Build the topology for an extraction.
pub(crate) fn build_topology(extraction: &Extraction<'_>, config: &ParseConfig) -> Topology {
    let topology = extraction
        .statements()
        .iter()
        .fold(Accumulator::default(), |acc, statement| {
            acc.with_statement(statement, config)
        })
        .materialize(config);

    let stats = topology.statistics();
    debug!(
        environments = stats.environments,
        datacenters = stats.datacenters,
        areas = stats.areas,
        components = stats.components,
        connections = stats.connections;
        "Topology built"
    );
    topology
}
