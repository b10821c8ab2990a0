//! Contact network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format.  Given an
//! `AgentId a`, its incident edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[a] .. node_out_start[a+1] ]
//! ```
//!
//! The network is undirected; every contact is stored in both directions so
//! neighbor iteration is a contiguous memory scan from either endpoint.
//! `edge_contact` is indexed by the same `EdgeId` positions.
//!
//! # Validation
//!
//! Malformed input is rejected at build time, not at step time: self-loops
//! and duplicate pairs are errors, and every endpoint must be a previously
//! added node.  A network with no nodes cannot host a simulation and is also
//! rejected.

use rustc_hash::FxHashSet;

use seirx_core::{AgentId, AgentType};

use crate::contact::ContactType;
use crate::error::{NetworkError, NetworkResult};

// ── NodeAttributes ────────────────────────────────────────────────────────────

/// Static attributes attached to one network node.
///
/// `age` feeds the age-dependent transmission and symptom discounts when
/// present; `mask` overrides the group-level mask policy for this one agent.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeAttributes {
    pub agent_type: AgentType,
    pub age: Option<f32>,
    pub mask: Option<bool>,
}

impl NodeAttributes {
    /// Node with only an agent type — no age, group mask policy.
    pub fn of_type(agent_type: AgentType) -> Self {
        NodeAttributes { agent_type, age: None, mask: None }
    }
}

// ── ContactNetwork ────────────────────────────────────────────────────────────

/// Undirected agent contact graph in CSR format.
///
/// Do not construct directly; use [`ContactNetworkBuilder`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactNetwork {
    /// Node attributes, indexed by `AgentId`.
    attrs: Vec<NodeAttributes>,

    /// CSR row pointer.  Edges incident to agent `a` are at `EdgeId`s
    /// `node_out_start[a] .. node_out_start[a+1]`.  Length = node count + 1.
    node_out_start: Vec<u32>,

    /// Neighbor endpoint of each directed half-edge.
    edge_to: Vec<AgentId>,

    /// Contact label of each directed half-edge (identical for the two
    /// halves of one undirected contact).
    edge_contact: Vec<ContactType>,
}

impl ContactNetwork {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.attrs.len()
    }

    /// Number of undirected contacts (half the stored edge count).
    pub fn contact_count(&self) -> usize {
        self.edge_to.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    // ── Node access ───────────────────────────────────────────────────────

    pub fn attributes(&self, agent: AgentId) -> &NodeAttributes {
        &self.attrs[agent.index()]
    }

    /// Iterator over node attributes in `AgentId` order — the input to
    /// `AgentStoreBuilder`.
    pub fn nodes(&self) -> impl Iterator<Item = (AgentId, &NodeAttributes)> + '_ {
        self.attrs
            .iter()
            .enumerate()
            .map(|(i, attrs)| (AgentId(i as u32), attrs))
    }

    /// All agents of the given type, ascending.
    pub fn agents_of_type(&self, agent_type: AgentType) -> Vec<AgentId> {
        self.nodes()
            .filter(|(_, attrs)| attrs.agent_type == agent_type)
            .map(|(id, _)| id)
            .collect()
    }

    /// Agent types that actually occur in this network, deduplicated,
    /// in `AgentType` order.
    pub fn present_types(&self) -> Vec<AgentType> {
        AgentType::ALL
            .into_iter()
            .filter(|&t| self.attrs.iter().any(|a| a.agent_type == t))
            .collect()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over `(neighbor, contact_type)` for all contacts of `agent`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn neighbors(&self, agent: AgentId) -> impl Iterator<Item = (AgentId, ContactType)> + '_ {
        let start = self.node_out_start[agent.index()] as usize;
        let end = self.node_out_start[agent.index() + 1] as usize;
        (start..end).map(|i| (self.edge_to[i], self.edge_contact[i]))
    }

    /// Number of contacts of `agent`.
    #[inline]
    pub fn degree(&self, agent: AgentId) -> usize {
        let start = self.node_out_start[agent.index()] as usize;
        let end = self.node_out_start[agent.index() + 1] as usize;
        end - start
    }

    /// The contact label between two agents, if they share an edge.
    pub fn contact_type(&self, a: AgentId, b: AgentId) -> Option<ContactType> {
        self.neighbors(a)
            .find(|&(other, _)| other == b)
            .map(|(_, contact)| contact)
    }
}

// ── ContactNetworkBuilder ─────────────────────────────────────────────────────

/// Construct a [`ContactNetwork`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and undirected contacts in any order; `build()`
/// sorts the half-edges by source and constructs the CSR arrays.
///
/// # Example
///
/// ```
/// use seirx_core::AgentType;
/// use seirx_network::{ContactNetworkBuilder, ContactType, NodeAttributes};
///
/// let mut b = ContactNetworkBuilder::new();
/// let a = b.add_agent(NodeAttributes::of_type(AgentType::Resident));
/// let c = b.add_agent(NodeAttributes::of_type(AgentType::Resident));
/// b.add_contact(a, c, ContactType::Close).unwrap();
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.contact_count(), 1);
/// ```
pub struct ContactNetworkBuilder {
    nodes: Vec<NodeAttributes>,
    raw_edges: Vec<RawContact>,
    seen_pairs: FxHashSet<(AgentId, AgentId)>,
}

struct RawContact {
    a: AgentId,
    b: AgentId,
    contact: ContactType,
}

impl ContactNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            raw_edges: Vec::new(),
            seen_pairs: FxHashSet::default(),
        }
    }

    /// Pre-allocate for the expected number of nodes and contacts.
    pub fn with_capacity(nodes: usize, contacts: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(contacts),
            seen_pairs: FxHashSet::default(),
        }
    }

    /// Add an agent node and return its `AgentId` (sequential from 0).
    pub fn add_agent(&mut self, attrs: NodeAttributes) -> AgentId {
        let id = AgentId(self.nodes.len() as u32);
        self.nodes.push(attrs);
        id
    }

    /// Add an undirected contact between `a` and `b`.
    ///
    /// Rejects self-loops, unknown endpoints, and duplicate pairs (each pair
    /// of agents carries at most one contact label).
    pub fn add_contact(
        &mut self,
        a: AgentId,
        b: AgentId,
        contact: ContactType,
    ) -> NetworkResult<()> {
        if a == b {
            return Err(NetworkError::SelfLoop(a));
        }
        let node_count = self.nodes.len();
        for id in [a, b] {
            if id.index() >= node_count {
                return Err(NetworkError::UnknownNode { agent: id, node_count });
            }
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if !self.seen_pairs.insert(key) {
            return Err(NetworkError::DuplicateContact(key.0, key.1));
        }

        self.raw_edges.push(RawContact { a, b, contact });
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contact_count(&self) -> usize {
        self.raw_edges.len()
    }

    /// Consume the builder and produce a [`ContactNetwork`].
    ///
    /// Time complexity: O(E log E) for the half-edge sort.
    pub fn build(self) -> NetworkResult<ContactNetwork> {
        if self.nodes.is_empty() {
            return Err(NetworkError::Empty);
        }

        let node_count = self.nodes.len();

        // Expand undirected contacts into directed half-edges, then sort by
        // source for CSR construction.
        let mut half: Vec<(AgentId, AgentId, ContactType)> =
            Vec::with_capacity(self.raw_edges.len() * 2);
        for e in &self.raw_edges {
            half.push((e.a, e.b, e.contact));
            half.push((e.b, e.a, e.contact));
        }
        half.sort_unstable_by_key(|&(from, to, _)| (from.0, to.0));

        let edge_to: Vec<AgentId> = half.iter().map(|&(_, to, _)| to).collect();
        let edge_contact: Vec<ContactType> = half.iter().map(|&(_, _, c)| c).collect();

        // Build CSR row pointer.
        let mut node_out_start = vec![0u32; node_count + 1];
        for &(from, _, _) in &half {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_to.len());

        Ok(ContactNetwork {
            attrs: self.nodes,
            node_out_start,
            edge_to,
            edge_contact,
        })
    }
}

impl Default for ContactNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
