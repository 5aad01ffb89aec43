use std::collections::HashSet;

use dashkit_transactions::{Input, Outpoint, Output};

/// Outpoints of the wallet's own outputs, for detecting outgoing spends.
#[derive(Debug, Default)]
pub struct OutputsCache {
    outpoints: HashSet<Outpoint>,
}

impl OutputsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the wallet-owned entries of `outputs`.
    pub fn add(&mut self, outputs: &[Output]) {
        self.outpoints.extend(
            outputs
                .iter()
                .filter(|o| o.is_mine())
                .map(|o| Outpoint::new(o.transaction_hash, o.index)),
        );
    }

    /// Whether any of `inputs` spends a wallet output.
    pub fn has_outputs_for(&self, inputs: &[Input]) -> bool {
        inputs
            .iter()
            .any(|i| self.outpoints.contains(&i.previous_output))
    }

    pub fn len(&self) -> usize {
        self.outpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outpoints.is_empty()
    }
}
