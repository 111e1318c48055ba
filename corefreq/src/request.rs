/*
 * Copyright 2024 Fluence Labs Limited
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use corefreq_shared::types::KiloHertz;

/// Tie-break direction when the target frequency falls between two table
/// entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Relation {
    /// Smallest tabulated frequency at or above the target.
    AtLeast,
    /// Largest tabulated frequency at or below the target.
    AtMost,
}

/// What the request does to the access gate, on top of changing frequency.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GateAction {
    None,
    /// Close the gate one level; further plain requests are denied until a
    /// matching Enable.
    Disable,
    /// Open the gate one level. Processed before the request itself is
    /// admitted, so the request carrying it is honored.
    Enable,
}

/// One frequency-change request as the coordinator consumes it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RateRequest {
    pub target: KiloHertz,
    pub relation: Relation,
    pub gate: GateAction,
    /// Private requests come from PM transitions, not the governor, and
    /// bypass the battery cap.
    pub private: bool,
}

impl RateRequest {
    pub fn new(target: KiloHertz, relation: Relation) -> Self {
        Self {
            target,
            relation,
            gate: GateAction::None,
            private: false,
        }
    }

    pub fn with_gate(mut self, gate: GateAction) -> Self {
        self.gate = gate;
        self
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }
}
