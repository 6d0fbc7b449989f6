//! Keyword classification of devices and areas.
//!
//! Device and area names are free text. They are classified by an ordered
//! list of [`KeywordRule`]s: the first rule whose keyword occurs as a
//! substring of the name wins, and names that match nothing fall back to the
//! `Unknown` variant. The classification is deliberately lossy; it only
//! drives styling.
//!
//! The built-in tables are plain data ([`KeywordTable::default`]) and can be
//! extended from configuration with [`KeywordTable::with_rules_first`].

use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

/// Device type of a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Router,
    Switch,
    Firewall,
    Server,
    LoadBalancer,
    #[default]
    Unknown,
}

impl DeviceType {
    /// Returns the canonical lowercase name of this device type.
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceType::Router => "router",
            DeviceType::Switch => "switch",
            DeviceType::Firewall => "firewall",
            DeviceType::Server => "server",
            DeviceType::LoadBalancer => "load_balancer",
            DeviceType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network-zone type of an area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaType {
    Core,
    Aggregation,
    Access,
    Dmz,
    Management,
    #[default]
    Unknown,
}

impl AreaType {
    /// Returns the canonical lowercase name of this area type.
    pub fn as_str(self) -> &'static str {
        match self {
            AreaType::Core => "core",
            AreaType::Aggregation => "aggregation",
            AreaType::Access => "access",
            AreaType::Dmz => "dmz",
            AreaType::Management => "management",
            AreaType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `keyword -> classification` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule<T> {
    keyword: String,
    kind: T,
}

impl<T: Copy> KeywordRule<T> {
    /// Creates a rule that classifies names containing `keyword` as `kind`.
    pub fn new(keyword: impl Into<String>, kind: T) -> Self {
        Self {
            keyword: keyword.into(),
            kind,
        }
    }

    /// Returns the keyword this rule looks for.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Returns the classification this rule assigns.
    pub fn kind(&self) -> T {
        self.kind
    }

    /// Returns `true` if `name` contains this rule's keyword.
    pub fn matches(&self, name: &str) -> bool {
        !self.keyword.is_empty() && name.contains(&self.keyword)
    }
}

/// An ordered, first-match-wins classification table.
///
/// # Examples
///
/// ```
/// # use topofac_core::classify::{DeviceTable, DeviceType};
/// let table = DeviceTable::default();
/// assert_eq!(table.classify("核心路由器-A"), DeviceType::Router);
/// assert_eq!(table.classify("汇聚交换机"), DeviceType::Switch);
/// assert_eq!(table.classify("打印机"), DeviceType::Unknown);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable<T> {
    rules: Vec<KeywordRule<T>>,
}

/// Classification table for device names.
pub type DeviceTable = KeywordTable<DeviceType>;

/// Classification table for area names.
pub type AreaTable = KeywordTable<AreaType>;

impl<T: Copy + Default + fmt::Debug> KeywordTable<T> {
    /// Creates a table from rules, evaluated in the given order.
    pub fn new(rules: Vec<KeywordRule<T>>) -> Self {
        Self { rules }
    }

    /// Returns the rules in evaluation order.
    pub fn rules(&self) -> &[KeywordRule<T>] {
        &self.rules
    }

    /// Classify `name` using the first matching rule, or `T::default()`.
    pub fn classify(&self, name: &str) -> T {
        let kind = self
            .rules
            .iter()
            .find(|rule| rule.matches(name))
            .map(KeywordRule::kind)
            .unwrap_or_default();
        trace!(name, kind:?; "Classified name");
        kind
    }

    /// Returns a table where `rules` are evaluated before the existing ones.
    pub fn with_rules_first(self, rules: impl IntoIterator<Item = KeywordRule<T>>) -> Self {
        let mut merged: Vec<_> = rules.into_iter().collect();
        merged.extend(self.rules);
        Self { rules: merged }
    }
}

impl Default for KeywordTable<DeviceType> {
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new("防火墙", DeviceType::Firewall),
            KeywordRule::new("负载均衡器", DeviceType::LoadBalancer),
            KeywordRule::new("服务器", DeviceType::Server),
            KeywordRule::new("核心路由器", DeviceType::Router),
            KeywordRule::new("汇聚交换机", DeviceType::Switch),
            KeywordRule::new("接入交换机", DeviceType::Switch),
            KeywordRule::new("核心交换机", DeviceType::Switch),
            KeywordRule::new("路由器", DeviceType::Router),
            KeywordRule::new("交换机", DeviceType::Switch),
        ])
    }
}

impl Default for KeywordTable<AreaType> {
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new("核心网络区", AreaType::Core),
            KeywordRule::new("核心区", AreaType::Core),
            KeywordRule::new("汇聚网络区", AreaType::Aggregation),
            KeywordRule::new("汇聚区", AreaType::Aggregation),
            KeywordRule::new("接入网络区", AreaType::Access),
            KeywordRule::new("接入区", AreaType::Access),
            KeywordRule::new("DMZ区", AreaType::Dmz),
            KeywordRule::new("管理区", AreaType::Management),
        ])
    }
}
