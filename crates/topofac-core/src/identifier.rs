//! Stable identities for topology components.
//!
//! A component's identity is a pure function of the four names it was
//! declared under (environment, datacenter, area, device). The result is a
//! token that is safe to embed in XML attributes, flow-chart node
//! identifiers, and JSON keys.
//!
//! The encoding is injective: distinct paths never share an identity.
//! ASCII alphanumerics and CJK ideographs are kept as they are, any other
//! character `c` is written as `_<hex of c>_`, and segments are joined
//! with [`SEGMENT_SEPARATOR`]. An `_` inside a segment is therefore always
//! followed by a lowercase hex digit, which keeps it apart from the
//! separator.

use std::{borrow::Borrow, fmt};

use serde::Serialize;

/// Joins the encoded segments of an identity.
pub const SEGMENT_SEPARATOR: &str = "__";

/// Identity of a [`Component`](crate::topology::Component).
///
/// # Examples
///
/// ```
/// # use topofac_core::identifier::ComponentId;
/// let id = ComponentId::from_path("生产网", "亦庄", "核心区", "路由器-1");
/// assert_eq!(id.as_str(), "生产网__亦庄__核心区__路由器_2d_1");
///
/// // Identical paths always produce identical identities.
/// assert_eq!(id, ComponentId::from_path("生产网", "亦庄", "核心区", "路由器-1"));
///
/// // Moving a character across a segment boundary changes the identity.
/// assert_ne!(
///     ComponentId::from_path("生产-网", "亦庄", "核心区", "路由器1"),
///     ComponentId::from_path("生产", "网-亦庄", "核心区", "路由器1"),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    /// Derive the identity for a device declared under the given ancestors.
    pub fn from_path(environment: &str, datacenter: &str, area: &str, device: &str) -> Self {
        let id = [environment, datacenter, area, device]
            .into_iter()
            .map(encode_segment)
            .collect::<Vec<_>>()
            .join(SEGMENT_SEPARATOR);
        Self(id)
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Encode one path segment as a safe token.
///
/// ASCII alphanumerics and the CJK unified ideograph block
/// `U+4E00..=U+9FA5` are kept; every other character becomes `_<hex>_`.
///
/// # Examples
///
/// ```
/// # use topofac_core::identifier::encode_segment;
/// assert_eq!(encode_segment("核心区A1"), "核心区A1");
/// assert_eq!(encode_segment("DMZ区 (A)"), "DMZ区_20__28_A_29_");
/// assert_ne!(encode_segment("路由器-1"), encode_segment("路由器_1"));
/// ```
pub fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for c in segment.chars() {
        if is_safe_char(c) {
            encoded.push(c);
        } else {
            encoded.push_str(&format!("_{:x}_", u32::from(c)));
        }
    }
    encoded
}

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_from_path_joins_segments() {
        let id = ComponentId::from_path("prod", "dc1", "core", "r1");
        assert_eq!(id.as_str(), "prod__dc1__core__r1");
    }

    #[test]
    fn test_from_path_encodes_each_segment() {
        let id = ComponentId::from_path("prod net", "dc.1", "core/a", "r#1");
        assert_eq!(id.as_str(), "prod_20_net__dc_2e_1__core_2f_a__r_23_1");
    }

    #[test]
    fn test_same_device_different_ancestors() {
        let a = ComponentId::from_path("生产网", "亦庄", "核心区", "交换机1");
        let b = ComponentId::from_path("生产网", "酒仙桥", "核心区", "交换机1");
        assert_ne!(a, b);
    }

    #[test]
    fn test_separator_inside_segment() {
        let a = ComponentId::from_path("生产-网", "亦庄", "核心区", "路由器1");
        let b = ComponentId::from_path("生产", "网-亦庄", "核心区", "路由器1");
        assert_ne!(a, b);

        let c = ComponentId::from_path("a_", "b", "c", "d");
        let d = ComponentId::from_path("a", "_b", "c", "d");
        assert_ne!(c, d);
    }

    #[test]
    fn test_encode_segment_keeps_cjk_and_ascii() {
        assert_eq!(encode_segment("核心交换机A1"), "核心交换机A1");
        assert_eq!(encode_segment("【x】"), "_3010_x_3011_");
        assert_eq!(encode_segment("_"), "_5f_");
        assert_eq!(encode_segment(""), "");
    }

    #[test]
    fn test_serialize_transparent() {
        let id = ComponentId::from_path("a", "b", "c", "d");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"a__b__c__d\"");
    }

    fn segment() -> impl Strategy<Value = String> {
        // Small alphabet so that collisions would be likely under a lossy encoding.
        "[a1_\\- 网]{0,4}"
    }

    proptest! {
        #[test]
        fn distinct_paths_have_distinct_ids(
            a in prop::array::uniform4(segment()),
            b in prop::array::uniform4(segment()),
        ) {
            let id_a = ComponentId::from_path(&a[0], &a[1], &a[2], &a[3]);
            let id_b = ComponentId::from_path(&b[0], &b[1], &b[2], &b[3]);
            prop_assert_eq!(a == b, id_a == id_b);
        }
    }
}
