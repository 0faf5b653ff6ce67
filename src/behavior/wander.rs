//! Stateless behaviors

use super::{BehaviorContext, DestinationBehavior, ARRIVAL_DISTANCE};
use crate::core::random::random_position;
use crate::entity::{Being, Destination};

/// Heads for a fresh random point whenever the current one is reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wander;

impl DestinationBehavior for Wander {
    fn kind(&self) -> &'static str {
        "wander"
    }

    fn update_destination(
        &mut self,
        being: &Being,
        ctx: &mut BehaviorContext<'_>,
    ) -> Option<Destination> {
        if being.distance_to_destination() > ARRIVAL_DISTANCE {
            return None;
        }
        Some(Destination::Fixed(random_position(&mut *ctx.rng, ctx.width, ctx.height)))
    }

    fn spawn_fresh(&self) -> Box<dyn DestinationBehavior> {
        Box::new(Wander)
    }
}

/// Never changes destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Idle;

impl DestinationBehavior for Idle {
    fn kind(&self) -> &'static str {
        "idle"
    }

    fn update_destination(
        &mut self,
        _being: &Being,
        _ctx: &mut BehaviorContext<'_>,
    ) -> Option<Destination> {
        None
    }

    fn spawn_fresh(&self) -> Box<dyn DestinationBehavior> {
        Box::new(Idle)
    }
}
