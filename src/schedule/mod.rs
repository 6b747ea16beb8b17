//! Scheduling logic for the leave engine.
//!
//! This module answers "what should this employee be doing on day D": the
//! interval helpers every comparison goes through, the ordered assignment
//! timeline, the resolution pipeline that layers variations, actual work and
//! leave over the base schedule, and the workforce queries built on top.

pub mod interval;
mod resolution;
mod timeline;
mod workforce;

pub use resolution::{
    ACTUAL_PIPELINE, FULL_PIPELINE, PartialDayLeavePolicy, Resolution, ResolverStage,
    SCHEDULE_PIPELINE,
};
pub use timeline::AssignmentTimeline;
