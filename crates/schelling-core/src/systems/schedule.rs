//! Activation Schedule
//!
//! Each step visits every agent exactly once, in a fresh random order.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::agent::AgentId;

/// A new random permutation of `0..agent_count`
pub fn activation_order<R: Rng + ?Sized>(agent_count: usize, rng: &mut R) -> Vec<AgentId> {
    let mut order: Vec<AgentId> = (0..agent_count as u32).map(AgentId).collect();
    order.shuffle(rng);
    order
}
