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

use serde::Deserialize;
use serde::Serialize;

use super::frequency::KiloHertz;
use super::voltage::Microvolts;

/// One row of the hardware-validated frequency/voltage table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreqTableEntry {
    pub khz: KiloHertz,
    pub volt: Microvolts,
}

impl FreqTableEntry {
    pub const fn new(khz: KiloHertz, volt: Microvolts) -> Self {
        Self { khz, volt }
    }
}
