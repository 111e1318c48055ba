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

/// Reentrant counter gating whether frequency-change requests are honored.
///
/// Suspend, reboot and other private transitions each close the gate once;
/// every close needs a matching open before governor traffic flows again.
/// Mutated only under the coordinator lock.
#[derive(Debug, Default)]
pub struct AccessGate {
    closed: u32,
}

impl AccessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable(&mut self) {
        self.closed += 1;
    }

    pub fn enable(&mut self) {
        if self.closed > 0 {
            self.closed -= 1;
        }
    }

    pub fn is_open(&self) -> bool {
        self.closed == 0
    }
}
