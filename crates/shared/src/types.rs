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

mod core;
mod frequency;
mod policy;
mod table;
mod voltage;

pub use self::core::CoreId;
pub use self::core::CoreIdInner;
pub use frequency::FreqInner;
pub use frequency::Hertz;
pub use frequency::KiloHertz;
pub use policy::Governor;
pub use policy::GovernorKind;
pub use policy::Policy;
pub use table::FreqTableEntry;
pub use voltage::Microvolts;
