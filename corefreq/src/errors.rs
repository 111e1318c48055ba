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

use thiserror::Error as ThisError;

use corefreq_shared::hardware::ClockError;
use corefreq_shared::types::Hertz;
use corefreq_shared::types::KiloHertz;

use crate::request::Relation;

pub type FreqResult<T> = Result<T, FreqError>;

#[derive(ThisError, Debug)]
pub enum FreqError {
    /// No usable frequency table was supplied at init; scaling stays
    /// disabled for the lifetime of the subsystem.
    #[error("no usable frequency table, scaling is disabled")]
    NoFreqTable,

    #[error("frequency change denied: transitions are temporarily disabled")]
    AccessDenied,

    #[error("no table entry satisfies {relation:?} for target {target} kHz")]
    NoMatchingFrequency {
        target: KiloHertz,
        relation: Relation,
    },

    #[error("clock subsystem rejected rate {requested} Hz")]
    RateRejected {
        requested: Hertz,
        #[source]
        source: ClockError,
    },

    #[error(
        "policy bounds [{min}, {max}] kHz fall outside the table range [{table_min}, {table_max}] kHz"
    )]
    BoundsOutOfTable {
        min: KiloHertz,
        max: KiloHertz,
        table_min: KiloHertz,
        table_max: KiloHertz,
    },
}

#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("frequency table is empty")]
    Empty,

    #[error("frequency table is not strictly ascending at index {index}")]
    NotAscending { index: usize },
}
