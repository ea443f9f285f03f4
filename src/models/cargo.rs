//! Running cargo-hold state.

use super::{Action, PlanNode, Request};

/// Tracks the cargo hold while replaying a plan node by node.
///
/// The only way the state changes is by applying plan nodes in order:
/// a pickup adds its request's size, a delivery removes it. A feasible
/// plan keeps the load within `0..=capacity` at every prefix.
#[derive(Debug, Clone, Default)]
pub struct CargoState {
    load: u32,
    held: Vec<usize>,
}

impl CargoState {
    /// Empty hold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `size` more SCU fits within `capacity`.
    pub fn can_add(&self, size: u32, capacity: u32) -> bool {
        self.load + size <= capacity
    }

    /// Current load in SCU.
    pub fn load(&self) -> u32 {
        self.load
    }

    /// Requests currently on board, by planning index.
    pub fn held(&self) -> &[usize] {
        &self.held
    }

    /// Returns `true` if the given request's cargo is on board.
    pub fn is_holding(&self, request: usize) -> bool {
        self.held.contains(&request)
    }

    /// Applies a plan node to the hold.
    ///
    /// Returns `false` if the node cannot be applied: a pickup that would
    /// exceed `capacity`, or a delivery of cargo that is not on board.
    pub fn apply(&mut self, node: PlanNode, requests: &[Request], capacity: u32) -> bool {
        let size = requests[node.request].size();
        match node.action {
            Action::Pickup => {
                if !self.can_add(size, capacity) {
                    return false;
                }
                self.load += size;
                self.held.push(node.request);
                true
            }
            Action::Delivery => {
                let Some(pos) = self.held.iter().position(|&r| r == node.request) else {
                    return false;
                };
                self.held.swap_remove(pos);
                self.load -= size;
                true
            }
        }
    }
}
