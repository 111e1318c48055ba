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

use newtype_derive::newtype_fmt;
use serde::Deserialize;
use serde::Serialize;

pub type FreqInner = u32;

/// CPU frequency in kilohertz, the unit the governor and the tables speak.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct KiloHertz(FreqInner);

/// Raw clock rate in hertz, the unit the clock subsystem speaks.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Hertz(u64);

newtype_derive::NewtypeFrom! { () pub struct KiloHertz(FreqInner); }
newtype_derive::NewtypeDisplay! { () pub struct KiloHertz(FreqInner); }

newtype_derive::NewtypeFrom! { () pub struct Hertz(u64); }
newtype_derive::NewtypeDisplay! { () pub struct Hertz(u64); }

impl KiloHertz {
    pub const fn new(khz: FreqInner) -> Self {
        Self(khz)
    }

    pub const fn to_hertz(self) -> Hertz {
        Hertz::new(self.0 as u64 * 1000)
    }
}

impl Hertz {
    pub const MAX: Hertz = Hertz(u64::MAX);

    pub const fn new(hz: u64) -> Self {
        Self(hz)
    }

    pub const fn to_khz(self) -> KiloHertz {
        KiloHertz::new((self.0 / 1000) as FreqInner)
    }
}
