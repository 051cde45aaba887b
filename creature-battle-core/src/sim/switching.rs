//! Switch resolution. A switch runs the outgoing combatant's departure
//! hooks, swaps the bench positions, then runs the incoming combatant's
//! arrival hooks, so faints caused by departure effects are settled
//! before the replacement appears.

use crate::data::effects::Trigger;
use crate::sim::battle::Battle;
use crate::sim::creature::{CreatureId, Liveness, Team};
use crate::sim::{abilities, effects};

/// Reserve combatants on `team` that can legally come in: still standing
/// and not already promised to another pending switch this turn.
pub(crate) fn switch_candidates(
    battle: &Battle,
    team: Team,
    pending: &[CreatureId],
) -> Vec<CreatureId> {
    battle
        .side(team)
        .reserve_ids()
        .into_iter()
        .filter(|&id| battle.creature(id).liveness() == Liveness::Active)
        .filter(|id| !pending.contains(id))
        .collect()
}

/// Swaps `outgoing` for `incoming` on the field. `order` is this turn's
/// resolution order; the departing combatant's entry is rewritten in
/// place so the incoming one acts in the vacated slot.
pub(crate) fn perform_switch(
    battle: &mut Battle,
    outgoing: CreatureId,
    incoming: CreatureId,
    order: &mut [CreatureId],
) {
    abilities::on_switch_out(battle, outgoing);
    for idx in 0..battle.ledger.slots() {
        let fires = battle
            .ledger
            .get(idx)
            .is_some_and(|e| e.def.trigger == Trigger::OnSwitchOut && e.target == Some(outgoing));
        if fires {
            effects::apply_effect(battle, idx, order);
        }
    }
    battle.check_death(order);
    battle.ledger.purge_switch_bound(outgoing);

    let (withdraw, send_out) = match outgoing.team {
        Team::Ally => (
            format!("You withdrew {}!", battle.creature(outgoing).ident()),
            format!("Go, {}!", battle.creature(incoming).ident()),
        ),
        Team::Enemy => (
            format!("{} was withdrawn!", battle.creature(outgoing).ident()),
            format!("{} was sent out!", battle.creature(incoming).ident()),
        ),
    };
    battle.emit(withdraw);

    let side = battle.side_mut(outgoing.team);
    let field = side
        .active
        .iter()
        .position(|&slot| slot == outgoing.slot)
        .expect("outgoing combatant holds a field position");
    let bench = side
        .reserve
        .iter()
        .position(|&slot| slot == incoming.slot)
        .expect("incoming combatant sits on the bench");
    side.active[field] = incoming.slot;
    side.reserve[bench] = outgoing.slot;

    battle.emit(send_out);

    for id in order.iter_mut() {
        if *id == outgoing {
            *id = incoming;
        }
    }

    abilities::on_switch_in(battle, incoming);
    for idx in 0..battle.ledger.slots() {
        let fires = battle
            .ledger
            .get(idx)
            .is_some_and(|e| e.def.trigger == Trigger::OnSwitchIn && e.target == Some(incoming));
        if fires {
            effects::apply_effect(battle, idx, order);
        }
    }
    battle.check_death(order);

    battle.retarget_moves(outgoing, incoming);
}
