//! Shared topologies for renderer tests.

use topofac_core::{
    classify::{AreaType, DeviceType},
    topology::{Area, Component, Connection, Datacenter, Environment, Topology},
};
use topofac_parser::{ParseConfig, parse};

use crate::{
    config::LayoutConfig,
    layout::{Engine, Layout},
};

pub const ROUND_TRIP: &str =
    "【生产网】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】";

pub const MIXED: &str = "\
【生产网】【亦庄】的【核心区】【核心路由器1】连接【生产网】【亦庄】的【DMZ区】【防火墙1】
【生产网】【亦庄】的【DMZ区】【防火墙1】连接【生产网】【酒仙桥】的【接入区】【负载均衡器1】
【生产网】【酒仙桥】的【接入区】【负载均衡器1】连接【生产网】【酒仙桥】的【接入区】【Web服务器\"A\"】
【测试网】【亦庄】的【管理区】【打印机<1>】连接【生产网】【亦庄】的【核心区】【核心路由器1】
";

pub fn laid_out(source: &str) -> (Topology, Layout) {
    let topology = parse(source, &ParseConfig::default()).unwrap();
    let layout = Engine::new(&LayoutConfig::default()).calculate(&topology);
    (topology, layout)
}

/// A topology with one connection whose target is not one of its components.
pub fn dangling() -> (Topology, Layout) {
    let router = Component::new("生产网", "亦庄", "核心区", "路由器1", DeviceType::Router, AreaType::Core);
    let switch = Component::new("生产网", "亦庄", "核心区", "交换机1", DeviceType::Switch, AreaType::Core);
    let ghost = Component::new("生产网", "亦庄", "核心区", "幽灵", DeviceType::Unknown, AreaType::Core);

    let area = Area::new("核心区", AreaType::Core, vec![router.id().clone(), switch.id().clone()]);
    let environments = vec![Environment::new(
        "生产网",
        vec![Datacenter::new("亦庄", vec![area])],
    )];
    let connections = vec![
        Connection::new(1, &router, &switch),
        Connection::new(2, &router, &ghost),
    ];

    let topology = Topology::new("悬空", environments, vec![router, switch], connections);
    let layout = Engine::new(&LayoutConfig::default()).calculate(&topology);
    (topology, layout)
}

pub fn empty() -> (Topology, Layout) {
    let topology = Topology::empty("空");
    let layout = Engine::new(&LayoutConfig::default()).calculate(&topology);
    (topology, layout)
}
