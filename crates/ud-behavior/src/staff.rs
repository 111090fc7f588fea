//! Support-staff behavior: a fixed six-day working pattern.

use std::ops::RangeInclusive;

use tracing::warn;
use ud_core::FacilityId;

use crate::member::MemberCore;
use crate::{ActionContext, AgentAction, BehaviorResult, FacilityKind, MovePurpose, ScheduledActionKind};

/// Monday through Saturday.
pub const WORKING_DAYS: RangeInclusive<u8> = 1..=6;

#[derive(Clone, Debug)]
pub struct SupportStaff {
    workplace: FacilityId,
}

impl SupportStaff {
    pub fn new(workplace: FacilityId) -> Self {
        Self { workplace }
    }

    pub fn workplace(&self) -> &FacilityId {
        &self.workplace
    }

    pub(crate) fn handle(
        &self,
        core:   &mut MemberCore,
        action: &AgentAction,
        ctx:    &mut ActionContext<'_>,
    ) -> BehaviorResult<()> {
        match action {
            AgentAction::Work => self.work(core, ctx),
            other => {
                warn!(agent = %core.id, action = %other, "staff ignores action");
                Ok(())
            }
        }
    }

    fn work(&self, core: &mut MemberCore, ctx: &mut ActionContext<'_>) -> BehaviorResult<()> {
        let facilities = ctx.facilities;
        let workplace = facilities.get(FacilityKind::Workplace, &self.workplace)?;
        core.move_to_polygon(workplace, MovePurpose::Work, ctx);
        Ok(())
    }

    // ── Weekly planning ───────────────────────────────────────────────────

    /// Staff attend no classes; clears anything held under that key.
    pub(crate) fn schedule_activities(&self, core: &mut MemberCore, ctx: &mut ActionContext<'_>) {
        core.registry.replace(ScheduledActionKind::AttendActivity, Vec::new(), ctx.scheduler);
    }

    pub(crate) fn schedule_arrivals(&self, core: &mut MemberCore, ctx: &mut ActionContext<'_>) {
        let handles = WORKING_DAYS
            .map(|day| {
                let start = ctx.timing.staff_work_start(ctx.rng);
                ctx.schedule_weekly(core.id, day, start, AgentAction::Work)
            })
            .collect();
        core.registry.replace(ScheduledActionKind::ArriveCampus, handles, ctx.scheduler);
    }

    pub(crate) fn schedule_departures(&self, core: &mut MemberCore, ctx: &mut ActionContext<'_>) {
        let handles = WORKING_DAYS
            .map(|day| {
                let end = ctx.timing.staff_work_end(ctx.rng);
                ctx.schedule_weekly(core.id, day, end, AgentAction::ReturnHome)
            })
            .collect();
        core.registry.replace(ScheduledActionKind::ReturnHome, handles, ctx.scheduler);
    }

    /// Lunch, then back to work.
    pub(crate) fn schedule_lunch(&self, core: &mut MemberCore, ctx: &mut ActionContext<'_>) {
        let mut handles = Vec::with_capacity(2 * WORKING_DAYS.len());
        for day in WORKING_DAYS {
            let lunch = ctx.timing.staff_lunch(ctx.rng);
            handles.push(ctx.schedule_weekly(core.id, day, lunch.start, AgentAction::HaveLunch));
            handles.push(ctx.schedule_weekly(core.id, day, lunch.end(), AgentAction::Work));
        }
        core.registry.replace(ScheduledActionKind::HaveLunch, handles, ctx.scheduler);
    }
}
