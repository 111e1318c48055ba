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

#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![deny(
    dead_code,
    nonstandard_style,
    unused_imports,
    unused_mut,
    unused_variables,
    unused_unsafe,
    unreachable_patterns
)]

mod battery;
mod coordinator;
mod driver;
mod errors;
mod gate;
mod policy;
mod request;
mod snapshot;
mod table;
mod transitions;

pub use battery::BatteryLimiter;
pub use coordinator::FreqCoordinator;
pub use coordinator::FreqTransition;
pub use coordinator::TransitionObserver;
pub use driver::CpuFreqDriver;
pub use errors::FreqError;
pub use errors::FreqResult;
pub use errors::TableError;
pub use gate::AccessGate;
pub use policy::PolicyNotifier;
pub use request::GateAction;
pub use request::RateRequest;
pub use request::Relation;
pub use snapshot::ClockRegisterSnapshot;
pub use snapshot::PllLock;
pub use table::FreqTable;
pub use transitions::PmDecision;
pub use transitions::PmEvent;
pub use transitions::PowerTransitionController;
