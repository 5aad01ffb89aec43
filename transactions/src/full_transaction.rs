//! A transaction header together with its inputs and outputs.

use dashkit_types::TxHash;
use serde::{Deserialize, Serialize};

use crate::{serialize, Input, Output, Transaction};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullTransaction {
    pub header: Transaction,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

impl FullTransaction {
    /// Assembles a transaction and stamps its hash onto every part.
    pub fn new(header: Transaction, inputs: Vec<Input>, outputs: Vec<Output>) -> Self {
        let mut tx = Self {
            header,
            inputs,
            outputs,
        };
        tx.set_hash(serialize::hash(&tx));
        tx
    }

    pub fn hash(&self) -> TxHash {
        self.header.data_hash
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_output.is_null()
    }

    fn set_hash(&mut self, hash: TxHash) {
        self.header.data_hash = hash;
        for input in &mut self.inputs {
            input.transaction_hash = hash;
        }
        for output in &mut self.outputs {
            output.transaction_hash = hash;
        }
    }
}
