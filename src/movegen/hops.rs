//! Single-origin reachability search.
//!
//! Finds every cell a piece can reach in one turn: hop chains first, by
//! exhaustive depth-first search, then vacant direct neighbours. Each
//! reached cell is a node in an arena tree whose parent links give the
//! chain back to the origin. A landing cell is claimed by the first chain
//! that reaches it and is never entered again during the same search.

use crate::board::GameState;

#[derive(Debug, Clone, Copy)]
struct ChainNode {
    cell: usize,
    parent: Option<usize>,
}

/// Scratch space for one origin's destinations.
#[derive(Debug, Clone, Default)]
pub(crate) struct DestinationSearch {
    origin: Option<usize>,
    nodes: Vec<ChainNode>,
    /// Cell index to arena node, for cells reached by the current search.
    slot: Vec<Option<usize>>,
    /// Arena nodes of destinations in discovery order.
    found: Vec<usize>,
}

impl DestinationSearch {
    pub(crate) fn origin(&self) -> Option<usize> {
        self.origin
    }

    /// Computes destinations for the piece at cell `origin`, replacing any
    /// previous results.
    pub(crate) fn run(&mut self, state: &GameState, origin: usize) {
        self.clear();
        let layout = state.layout();
        if self.slot.len() != layout.len() {
            self.slot = vec![None; layout.len()];
        }

        self.origin = Some(origin);
        self.nodes.push(ChainNode { cell: origin, parent: None });
        self.slot[origin] = Some(0);
        self.hop(state, 0);

        for dir in 0..layout.directions().len() {
            if let Some(next) = layout.step(origin, dir, 1) {
                if state.occupant_at(next).is_empty() && self.slot[next].is_none() {
                    self.push(next, 0);
                }
            }
        }
    }

    fn hop(&mut self, state: &GameState, node: usize) {
        let layout = state.layout();
        let from = self.nodes[node].cell;
        for dir in 0..layout.directions().len() {
            let (Some(over), Some(land)) = (layout.step(from, dir, 1), layout.step(from, dir, 2)) else {
                continue;
            };
            if state.occupant_at(over).is_empty()
                || !state.occupant_at(land).is_empty()
                || self.slot[land].is_some()
            {
                continue;
            }
            let child = self.push(land, node);
            self.hop(state, child);
        }
    }

    fn push(&mut self, cell: usize, parent: usize) -> usize {
        let id = self.nodes.len();
        self.nodes.push(ChainNode { cell, parent: Some(parent) });
        self.slot[cell] = Some(id);
        self.found.push(id);
        id
    }

    /// Destination cells in discovery order.
    pub(crate) fn destinations(&self) -> impl Iterator<Item = usize> + '_ {
        self.found.iter().map(|&id| self.nodes[id].cell)
    }

    pub(crate) fn is_destination(&self, cell: usize) -> bool {
        self.origin != Some(cell) && self.slot.get(cell).copied().flatten().is_some()
    }

    /// Cells from the origin to `cell`, both inclusive, or `None` if `cell`
    /// was not reached.
    pub(crate) fn chain(&self, cell: usize) -> Option<Vec<usize>> {
        if !self.is_destination(cell) {
            return None;
        }
        let mut path = Vec::new();
        let mut cursor = self.slot[cell];
        while let Some(id) = cursor {
            let node = self.nodes[id];
            path.push(node.cell);
            cursor = node.parent;
        }
        path.reverse();
        Some(path)
    }

    pub(crate) fn clear(&mut self) {
        for node in &self.nodes {
            self.slot[node.cell] = None;
        }
        self.nodes.clear();
        self.found.clear();
        self.origin = None;
    }
}
