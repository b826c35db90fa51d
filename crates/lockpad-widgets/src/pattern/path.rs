#![forbid(unsafe_code)]

use std::fmt;

/// Identity of a grid node, always in `1..=9`.
///
/// Ids are assigned row-major: `1 2 3` on the top row, `7 8 9` on the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct NodeId(u8);

impl NodeId {
    /// Smallest valid id.
    pub const MIN: u8 = 1;
    /// Largest valid id.
    pub const MAX: u8 = 9;

    /// Create an id, or `None` if outside `1..=9`.
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if id >= Self::MIN && id <= Self::MAX {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Id for the node at `(row, col)` of the 3x3 grid.
    pub(crate) const fn at(row: u8, col: u8) -> Self {
        Self(row * 3 + col + 1)
    }

    /// The raw id.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index into the grid's node array.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl TryFrom<u8> for NodeId {
    type Error = PathError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id).ok_or(PathError::InvalidNode(id))
    }
}

impl From<NodeId> for u8 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a sequence of ids is not a valid path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// An id outside `1..=9`.
    InvalidNode(u8),
    /// The same node appears more than once.
    Duplicate(u8),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNode(id) => write!(f, "node id {id} is outside 1..=9"),
            Self::Duplicate(id) => write!(f, "node {id} appears more than once"),
        }
    }
}

impl std::error::Error for PathError {}

/// An ordered, duplicate-free sequence of nodes traced by one gesture.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<NodeId>", into = "Vec<NodeId>"))]
pub struct Path {
    nodes: Vec<NodeId>,
}

impl Path {
    /// The empty path.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Build a path from raw ids, rejecting invalid or repeated ids.
    pub fn from_ids<I: IntoIterator<Item = u8>>(ids: I) -> Result<Self, PathError> {
        let mut path = Self::new();
        for raw in ids {
            let id = NodeId::try_from(raw)?;
            if !path.push(id) {
                return Err(PathError::Duplicate(raw));
            }
        }
        Ok(path)
    }

    /// Append `id` unless already present. Returns whether it was appended.
    pub(crate) fn push(&mut self, id: NodeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.nodes.push(id);
        true
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Whether `id` is part of the path.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Number of nodes in the path.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node was selected.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The most recently entered node.
    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Nodes in entry order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Iterate nodes in entry order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Raw ids in entry order.
    #[must_use]
    pub fn to_ids(&self) -> Vec<u8> {
        self.nodes.iter().map(|id| id.get()).collect()
    }
}

impl TryFrom<Vec<NodeId>> for Path {
    type Error = PathError;

    fn try_from(nodes: Vec<NodeId>) -> Result<Self, Self::Error> {
        Self::from_ids(nodes.into_iter().map(NodeId::get))
    }
}

impl From<Path> for Vec<NodeId> {
    fn from(path: Path) -> Self {
        path.nodes
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

/// Formats as `5-9-6`; the empty path formats as an empty string.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> NodeId {
        NodeId::new(n).unwrap()
    }

    #[test]
    fn node_id_range() {
        assert!(NodeId::new(0).is_none());
        assert!(NodeId::new(10).is_none());
        for n in 1..=9 {
            assert_eq!(NodeId::new(n).map(NodeId::get), Some(n));
        }
    }

    #[test]
    fn node_id_from_row_col() {
        assert_eq!(NodeId::at(0, 0), id(1));
        assert_eq!(NodeId::at(1, 1), id(5));
        assert_eq!(NodeId::at(2, 2), id(9));
        assert_eq!(id(7).index(), 6);
    }

    #[test]
    fn push_dedupes() {
        let mut path = Path::new();
        assert!(path.push(id(5)));
        assert!(path.push(id(9)));
        assert!(!path.push(id(5)));
        assert_eq!(path.to_ids(), vec![5, 9]);
        assert_eq!(path.last(), Some(id(9)));
    }

    #[test]
    fn from_ids_validates() {
        assert_eq!(Path::from_ids([1, 2, 3]).map(|p| p.len()), Ok(3));
        assert_eq!(Path::from_ids([1, 0]), Err(PathError::InvalidNode(0)));
        assert_eq!(Path::from_ids([4, 4]), Err(PathError::Duplicate(4)));
        assert!(Path::from_ids(Vec::<u8>::new()).unwrap().is_empty());
    }

    #[test]
    fn display_joins_with_dashes() {
        assert_eq!(Path::from_ids([5, 9, 6]).unwrap().to_string(), "5-9-6");
        assert_eq!(Path::new().to_string(), "");
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            PathError::InvalidNode(12).to_string(),
            "node id 12 is outside 1..=9"
        );
        assert_eq!(
            PathError::Duplicate(3).to_string(),
            "node 3 appears more than once"
        );
    }

    #[test]
    fn clear_empties() {
        let mut path = Path::from_ids([1, 2]).unwrap();
        path.clear();
        assert!(path.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_plain_arrays() {
        let path = Path::from_ids([1, 5, 9]).unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), "[1,5,9]");
        let back: Path = serde_json::from_str("[1,5,9]").unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<Path>("[1,1]").is_err());
        assert!(serde_json::from_str::<Path>("[0]").is_err());
    }
}
