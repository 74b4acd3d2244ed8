use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Number of bars generated for the sorting algorithms.
pub const ARRAY_SIZE: usize = 15;
pub const MIN_VALUE: u32 = 1;
pub const MAX_VALUE: u32 = 100;
/// Number of nodes in the fixed search tree.
pub const TREE_SIZE: usize = 7;

/// Animation role of a single bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementState {
    #[default]
    Default,
    Comparing,
    Swapping,
    Pivot,
    Sorted,
}

/// One bar of a sorting run. `index` is the position the element was
/// generated at and identifies it after it has been moved around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub value: u32,
    pub index: usize,
    pub state: ElementState,
}

impl Element {
    pub fn new(value: u32, index: usize) -> Self {
        Self {
            value,
            index,
            state: ElementState::Default,
        }
    }
}

/// Animation role of a tree node during a traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    #[default]
    Default,
    Current,
    Processing,
    Visited,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: usize,
    pub value: u32,
    pub children: Vec<Node>,
    pub state: NodeState,
}

impl Node {
    pub fn leaf(id: usize) -> Self {
        Self {
            id,
            value: id as u32,
            children: Vec::new(),
            state: NodeState::Default,
        }
    }

    pub fn with_children(id: usize, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::leaf(id)
        }
    }

    pub fn find(&self, id: usize) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: usize) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Ids and states of the direct children, left to right.
    pub fn child_states(&self) -> Vec<(usize, NodeState)> {
        self.children
            .iter()
            .map(|child| (child.id, child.state))
            .collect()
    }

    /// Nodes in pre-order, left to right.
    pub fn preorder(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Nodes in level order, paired with their depth below this node.
    pub fn levels(&self) -> Vec<(&Node, usize)> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([(self, 0)]);
        while let Some((node, depth)) = queue.pop_front() {
            out.push((node, depth));
            queue.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        out
    }

    pub fn depth_of(&self, id: usize) -> Option<usize> {
        self.levels()
            .into_iter()
            .find(|(node, _)| node.id == id)
            .map(|(_, depth)| depth)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Puts every node of the subtree back into [`NodeState::Default`].
    pub fn reset(&mut self) {
        self.state = NodeState::Default;
        for child in &mut self.children {
            child.reset();
        }
    }
}

/// The data a single controller animates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Dataset {
    Array(Vec<Element>),
    Tree(Node),
}

impl Dataset {
    pub fn reset_states(&mut self) {
        match self {
            Dataset::Array(elements) => {
                for element in elements {
                    element.state = ElementState::Default;
                }
            }
            Dataset::Tree(root) => root.reset(),
        }
    }

    /// Element values in their current order. Empty for trees.
    pub fn values(&self) -> Vec<u32> {
        match self {
            Dataset::Array(elements) => elements.iter().map(|element| element.value).collect(),
            Dataset::Tree(_) => Vec::new(),
        }
    }

    pub fn as_array(&self) -> Option<&[Element]> {
        match self {
            Dataset::Array(elements) => Some(elements),
            Dataset::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Node> {
        match self {
            Dataset::Tree(root) => Some(root),
            Dataset::Array(_) => None,
        }
    }
}

/// Supplies bar values to [`generate_array`]. Swapping the source is how tests
/// and reproducible demos pin the dataset.
pub trait ValueSource: Send {
    /// Returns the next value; callers expect it within `MIN_VALUE..=MAX_VALUE`.
    fn next_value(&mut self) -> u32;
}

/// Independent uniform draws in `MIN_VALUE..=MAX_VALUE`.
#[derive(Debug, Clone)]
pub struct RandomValues {
    rng: StdRng,
}

impl RandomValues {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomValues {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ValueSource for RandomValues {
    fn next_value(&mut self) -> u32 {
        self.rng.gen_range(MIN_VALUE..=MAX_VALUE)
    }
}

/// Replays a fixed list of values, wrapping around when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedValues {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedValues {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl ValueSource for ScriptedValues {
    fn next_value(&mut self) -> u32 {
        if self.values.is_empty() {
            return MIN_VALUE;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(MIN_VALUE, MAX_VALUE)
    }
}

pub fn generate_array(size: usize, source: &mut dyn ValueSource) -> Vec<Element> {
    (0..size)
        .map(|index| Element::new(source.next_value(), index))
        .collect()
}

/// Root 0 with children 1 and 2; node 1 owns 3 and 4, node 2 owns 5 and 6.
pub fn build_fixed_tree() -> Node {
    Node::with_children(
        0,
        vec![
            Node::with_children(1, vec![Node::leaf(3), Node::leaf(4)]),
            Node::with_children(2, vec![Node::leaf(5), Node::leaf(6)]),
        ],
    )
}
