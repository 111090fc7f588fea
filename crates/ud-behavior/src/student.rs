//! Student behavior: follow the class schedule, fill gaps with leisure.

use std::collections::BTreeMap;

use tracing::{trace, warn};
use ud_core::FacilityId;
use ud_schedule::Schedule;

use crate::member::MemberCore;
use crate::{
    ActionContext, AgentAction, BehaviorError, BehaviorResult, FacilityKind, MovePurpose,
    ScheduledActionKind,
};

/// Shortest gap (hours) before the next class that is worth a leisure trip.
pub const MIN_TIME_TO_FUN: f64 = 0.5;

/// How often (hours) a student changes leisure place.
pub const FUN_CHANGE_FREQUENCY: f64 = 3.0;

const LEISURE_KINDS: [FacilityKind; 2] = [FacilityKind::SharedArea, FacilityKind::EatingPlace];

// ── LeisureConfig ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LeisureConfig {
    pub min_time_to_fun:        f64,
    pub fun_change_frequency:   f64,
    /// Also hop when the next obligation is exactly `fun_change_frequency`
    /// away (`>=` instead of `>`).
    pub reschedule_at_boundary: bool,
}

impl Default for LeisureConfig {
    fn default() -> Self {
        Self {
            min_time_to_fun:        MIN_TIME_TO_FUN,
            fun_change_frequency:   FUN_CHANGE_FREQUENCY,
            reschedule_at_boundary: false,
        }
    }
}

impl LeisureConfig {
    /// Whether an obligation `delta` hours away leaves room for another hop.
    #[inline]
    pub fn allows_reschedule(&self, delta: f64) -> bool {
        if self.reschedule_at_boundary {
            delta >= self.fun_change_frequency
        } else {
            delta > self.fun_change_frequency
        }
    }

    pub fn validate(&self) -> BehaviorResult<()> {
        if !(self.fun_change_frequency.is_finite() && self.fun_change_frequency > 0.0) {
            return Err(BehaviorError::Config(format!(
                "leisure.fun_change_frequency must be > 0, got {}",
                self.fun_change_frequency
            )));
        }
        if !(self.min_time_to_fun.is_finite() && self.min_time_to_fun >= 0.0) {
            return Err(BehaviorError::Config(format!(
                "leisure.min_time_to_fun must be >= 0, got {}",
                self.min_time_to_fun
            )));
        }
        Ok(())
    }
}

// ── Student ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Student {
    schedule:             Schedule,
    /// Departure hour per campus day, as planned by `schedule_departures`.
    scheduled_departures: BTreeMap<u8, f64>,
}

impl Student {
    pub fn new(schedule: Schedule) -> Self {
        Self { schedule, scheduled_departures: BTreeMap::new() }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn scheduled_departures(&self) -> &BTreeMap<u8, f64> {
        &self.scheduled_departures
    }

    pub(crate) fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
        self.scheduled_departures.clear();
    }

    pub(crate) fn handle(
        &self,
        core:   &mut MemberCore,
        action: &AgentAction,
        ctx:    &mut ActionContext<'_>,
    ) -> BehaviorResult<()> {
        match action {
            AgentAction::AttendActivity { facility } => self.attend_activity(core, facility, ctx),
            AgentAction::LeaveActivity => self.leave_activity(core, ctx),
            AgentAction::HaveFun => self.have_fun(core, ctx),
            other => {
                warn!(agent = %core.id, action = %other, "student ignores action");
                Ok(())
            }
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────

    /// Seats were checked at enrollment, so no capacity check here.
    fn attend_activity(&self, core: &mut MemberCore, facility: &FacilityId, ctx: &mut ActionContext<'_>) -> BehaviorResult<()> {
        let facilities = ctx.facilities;
        let target = facilities.get(FacilityKind::Teaching, facility)?;
        core.move_to_polygon(target, MovePurpose::Activity, ctx);
        Ok(())
    }

    /// Go straight to the next class when it starts within
    /// `min_time_to_fun`; otherwise (including when there is no next class)
    /// have fun.
    fn leave_activity(&self, core: &mut MemberCore, ctx: &mut ActionContext<'_>) -> BehaviorResult<()> {
        let now = ctx.day_time();
        match self.schedule.next_academic_activity(now.day, now.hour) {
            Some(next) if next.hours_until(now.hour) < ctx.leisure.min_time_to_fun => {
                self.attend_activity(core, next.activity.teaching_facility_id(), ctx)
            }
            _ => self.have_fun(core, ctx),
        }
    }

    /// Move to a random shared area or eating place, then book another hop
    /// `fun_change_frequency` from now if today's next obligation (a class,
    /// else the planned departure) is further away than that.
    fn have_fun(&self, core: &mut MemberCore, ctx: &mut ActionContext<'_>) -> BehaviorResult<()> {
        let facilities = ctx.facilities;
        let place = facilities.choose(&LEISURE_KINDS, ctx.selection, ctx.rng)?;
        core.move_to_polygon(place, MovePurpose::Leisure, ctx);

        let now = ctx.day_time();
        let obligation = match self.schedule.next_academic_activity(now.day, now.hour) {
            Some(next) if next.is_today() => Some(next.activity.start_time()),
            _ => self.scheduled_departures.get(&now.day).copied(),
        };
        let Some(at) = obligation else { return Ok(()) };
        let delta = at - now.hour;
        if delta > 0.0 && ctx.leisure.allows_reschedule(delta) {
            let hop = ctx.schedule_in_hours(core.id, ctx.leisure.fun_change_frequency, AgentAction::HaveFun);
            core.registry.prune(ScheduledActionKind::ChangeLeisure, ctx.scheduler);
            core.registry.push(ScheduledActionKind::ChangeLeisure, hop);
            trace!(agent = %core.id, delta, "leisure hop booked");
        }
        Ok(())
    }

    // ── Weekly planning ───────────────────────────────────────────────────

    /// Per class: walk there `arrival_shift` before it starts, leave when it
    /// ends.  Both weekly.
    pub(crate) fn schedule_activities(&self, core: &mut MemberCore, ctx: &mut ActionContext<'_>) {
        let mut handles = Vec::new();
        for activity in self.schedule.activities() {
            let shift = ctx.timing.arrival_shift(ctx.rng);
            let attend = AgentAction::AttendActivity {
                facility: activity.teaching_facility_id().clone(),
            };
            handles.push(ctx.schedule_weekly(core.id, activity.day(), activity.start_time() - shift, attend));
            handles.push(ctx.schedule_weekly(core.id, activity.day(), activity.end_time(), AgentAction::LeaveActivity));
        }
        core.registry.replace(ScheduledActionKind::AttendActivity, handles, ctx.scheduler);
    }

    /// Per campus day: reach campus no later than `arrival_margin` before the
    /// first class.
    pub(crate) fn schedule_arrivals(&self, core: &mut MemberCore, ctx: &mut ActionContext<'_>) {
        let mut handles = Vec::new();
        for day in self.schedule.campus_days() {
            let Some(first) = self.schedule.first_academic_activity_in_day(day) else { continue };
            let arrival = ctx.timing.student_arrival(ctx.rng);
            let hour = (first.start_time() - ctx.timing.arrival_margin()).min(arrival);
            handles.push(ctx.schedule_weekly(core.id, day, hour, AgentAction::HaveFun));
        }
        core.registry.replace(ScheduledActionKind::ArriveCampus, handles, ctx.scheduler);
    }

    /// Per campus day: never leave before the last class ends.
    pub(crate) fn schedule_departures(&mut self, core: &mut MemberCore, ctx: &mut ActionContext<'_>) {
        self.scheduled_departures.clear();
        let mut handles = Vec::new();
        for day in self.schedule.campus_days() {
            let Some(last) = self.schedule.last_academic_activity_in_day(day) else { continue };
            let departure = ctx.timing.student_departure(ctx.rng);
            let hour = last.end_time().max(departure);
            handles.push(ctx.schedule_weekly(core.id, day, hour, AgentAction::ReturnHome));
            self.scheduled_departures.insert(day, hour);
        }
        core.registry.replace(ScheduledActionKind::ReturnHome, handles, ctx.scheduler);
    }

    /// Per campus day with room for it: lunch, then leisure once it is over.
    pub(crate) fn schedule_lunch(&self, core: &mut MemberCore, ctx: &mut ActionContext<'_>) {
        let mut handles = Vec::new();
        for day in self.schedule.campus_days() {
            let Some(lunch) = ctx.timing.student_lunch(&self.schedule, day, ctx.rng) else { continue };
            handles.push(ctx.schedule_weekly(core.id, day, lunch.start, AgentAction::HaveLunch));
            handles.push(ctx.schedule_weekly(core.id, day, lunch.end(), AgentAction::HaveFun));
        }
        core.registry.replace(ScheduledActionKind::HaveLunch, handles, ctx.scheduler);
    }
}
