//! Economy Components
//!
//! The balance oracle as an ECS resource. All funds, in both simulation
//! modes, live here; agent entities never carry a balance of their own.

use bevy_ecs::prelude::*;
use settlement::{BalanceOracle, MemoryBalances};

/// Resource: account balances for the whole population
#[derive(Resource, Debug, Default)]
pub struct Balances(pub MemoryBalances);

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance for an agent.
    pub fn balance(&self, identity: &str) -> f64 {
        self.0.balance(identity)
    }

    /// Seed an agent's account.
    pub fn fund(&mut self, identity: &str, amount: f64) {
        self.0.fund(identity, amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fund_and_query() {
        let mut balances = Balances::new();
        balances.fund("Alice", 10.0);
        assert_eq!(balances.balance("Alice"), 10.0);
        assert_eq!(balances.balance("Bob"), 0.0);
    }
}
