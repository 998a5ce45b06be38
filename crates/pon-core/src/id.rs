//! Strongly-typed identifiers for nodes, links, and output ports.

use std::borrow::Borrow;
use std::fmt;

/// Identifies a network element within a topology.
///
/// Node ids are free-form strings chosen by the editor (e.g. `"olt"`,
/// `"dndnode_4"`). They are unique within a topology.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a string as a node id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for NodeId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifies a link (fiber span) within a topology.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(String);

impl LinkId {
    /// Wrap a string as a link id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LinkId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for LinkId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl Borrow<str> for LinkId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A logical output port on a node.
///
/// Port names carry meaning independent of their position: balanced
/// splitter branches are `out-1 … out-N`, while asymmetric tap ports
/// encode their split percentage (`out-5`, `out-95`).
///
/// # Examples
///
/// ```
/// use pon_core::PortName;
///
/// assert_eq!(PortName::out().as_str(), "out");
/// assert_eq!(PortName::branch(3).as_str(), "out-3");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortName(String);

impl PortName {
    /// Wrap a string as a port name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The single output port of sources and attenuators.
    pub fn out() -> Self {
        Self(crate::DEFAULT_PORT.to_string())
    }

    /// The `n`-th branch of a balanced splitter (1-based).
    pub fn branch(n: u32) -> Self {
        Self(format!("{}-{n}", crate::DEFAULT_PORT))
    }

    /// The port name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortName {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for PortName {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl Borrow<str> for PortName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn ids_display_verbatim() {
        assert_eq!(NodeId::new("olt-1").to_string(), "olt-1");
        assert_eq!(LinkId::from("e1").to_string(), "e1");
        assert_eq!(PortName::from("out-95").to_string(), "out-95");
    }

    #[test]
    fn port_map_lookup_by_str() {
        let mut ports: IndexMap<PortName, f64> = IndexMap::new();
        ports.insert(PortName::branch(1), -0.5);
        assert_eq!(ports.get("out-1"), Some(&-0.5));
        assert_eq!(ports.get("out"), None);
    }

    #[test]
    fn branch_names_are_one_based() {
        let names: Vec<PortName> = (1..=3).map(PortName::branch).collect();
        assert_eq!(names, vec!["out-1".into(), "out-2".into(), "out-3".into()]);
    }
}
