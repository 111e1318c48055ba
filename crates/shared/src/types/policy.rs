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

use super::frequency::KiloHertz;

/// Governor policy attached to a frequency request: who asks and within
/// which bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    pub governor: Governor,
    pub min: KiloHertz,
    pub max: KiloHertz,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Governor {
    pub name: String,
    pub kind: GovernorKind,
}

/// Whether the governor samples load and re-targets on its own (ondemand,
/// interactive and friends) or pins a frequency manually (performance,
/// powersave). A capability tag, not a name match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GovernorKind {
    Dynamic,
    Manual,
}

impl Policy {
    pub fn new(governor: Governor, min: KiloHertz, max: KiloHertz) -> Self {
        Self {
            governor,
            min,
            max,
        }
    }
}

impl Governor {
    pub fn dynamic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: GovernorKind::Dynamic,
        }
    }

    pub fn manual(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: GovernorKind::Manual,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == GovernorKind::Dynamic
    }
}
