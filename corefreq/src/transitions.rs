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

use std::sync::Arc;

use corefreq_shared::hardware::CpuClock;
use corefreq_shared::hardware::PlatformPm;
use corefreq_shared::types::Policy;

use crate::coordinator::FreqCoordinator;
use crate::request::GateAction;
use crate::request::RateRequest;
use crate::request::Relation;

/// System power-management event delivered to [`PowerTransitionController`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PmEvent {
    /// The system is about to suspend.
    SuspendPrepare,
    /// Suspend finished (or was aborted) and the system is running again.
    PostSuspend,
    /// Hibernation image restore finished.
    PostRestore,
    /// The system has begun rebooting.
    RebootBegin,
}

/// The controller's verdict on a PM event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PmDecision {
    Ok,
    /// The transition must not proceed.
    Veto,
}

/// Moves the cluster to its suspend operating point around system sleep
/// and pins it there permanently on reboot.
pub struct PowerTransitionController {
    coordinator: Arc<FreqCoordinator>,
    clock: Arc<dyn CpuClock>,
    platform: Arc<dyn PlatformPm>,
}

impl PowerTransitionController {
    pub fn new(
        coordinator: Arc<FreqCoordinator>,
        clock: Arc<dyn CpuClock>,
        platform: Arc<dyn PlatformPm>,
    ) -> Self {
        Self {
            coordinator,
            clock,
            platform,
        }
    }

    /// Suspend and resume only steer dynamic governors; a manual governor
    /// has pinned its frequency on purpose and is left alone. Reboot pins
    /// the cluster unconditionally.
    pub fn on_pm_event(&self, policy: &Policy, event: PmEvent) -> PmDecision {
        match event {
            PmEvent::SuspendPrepare => {
                if !policy.governor.is_dynamic() {
                    return PmDecision::Ok;
                }
                self.enter_suspend_point(policy)
            }
            PmEvent::PostSuspend | PmEvent::PostRestore => {
                if !policy.governor.is_dynamic() {
                    return PmDecision::Ok;
                }
                self.leave_suspend_point(policy);
                PmDecision::Ok
            }
            PmEvent::RebootBegin => {
                self.pin_for_reboot();
                PmDecision::Ok
            }
        }
    }

    /// Raises the cluster to the suspend point and closes the gate so
    /// governor traffic cannot lower it mid-sleep.
    fn enter_suspend_point(&self, policy: &Policy) -> PmDecision {
        let request = RateRequest::new(self.coordinator.suspend_freq(), Relation::AtLeast)
            .with_gate(GateAction::Disable)
            .private();
        match self.coordinator.request(policy, request) {
            Ok(_) => PmDecision::Ok,
            Err(error) => {
                tracing::warn!("cannot reach the suspend operating point: {error}");
                PmDecision::Veto
            }
        }
    }

    /// Reopens the gate; the rate itself is already at the suspend point,
    /// so the request is an idempotent carrier for the Enable.
    fn leave_suspend_point(&self, policy: &Policy) {
        let request = RateRequest::new(self.coordinator.suspend_freq(), Relation::AtLeast)
            .with_gate(GateAction::Enable)
            .private();
        if let Err(error) = self.coordinator.request(policy, request) {
            tracing::warn!("post-suspend restore request failed: {error}");
        }
    }

    /// Floor == ceiling: the standing limit alone drags the cluster to
    /// the suspend point and holds it there, gate or no gate.
    fn pin_for_reboot(&self) {
        self.platform.note_reboot();
        self.platform.disable_thermal_limit();

        let pin = self.coordinator.suspend_freq().to_hertz();
        if let Err(error) = self.clock.set_rate_limit(pin, pin) {
            tracing::warn!("cannot pin the rate limit for reboot: {error}");
        }

        match self.clock.core_voltage() {
            Some(volt) => tracing::info!(
                "rebooting at {} kHz, core at {} uV",
                self.clock.rate().to_khz(),
                volt
            ),
            None => tracing::info!(
                "rebooting at {} kHz, core regulator unavailable",
                self.clock.rate().to_khz()
            ),
        }
    }
}
