//! Per-tick movement integration and collision resolution.
//!
//! Runs over the whole unit arena in index order. Each living unit
//! re-aims at its focus target (pursuit), steps toward its destination,
//! resolves pairwise overlap against every other living unit, and is
//! clamped into the battlefield.
//!
//! Overlap correction is applied half to the moving unit and, only
//! within the same team, the complementary half to the other unit.
//! Cross-team overlap is a permitted stable state so melee combat can
//! happen at point-blank range.

use crate::battlefield::Battlefield;
use crate::math::{fixed_sqrt, Fixed};
use crate::unit::{collision_slack, Unit};

/// Advance movement and collisions for every living unit.
pub fn movement_phase(units: &mut [Unit], field: &Battlefield) {
    for i in 0..units.len() {
        if units[i].is_dead {
            continue;
        }

        units[i].tick_line_timer();

        // Pursuit: re-aim at a living focus target, drop a dead one.
        // A cleared target leaves the last pursued destination in place.
        if let Some(target_id) = units[i].focus_target {
            let target_state = units
                .get(target_id as usize)
                .map(|t| (t.is_alive(), t.position));
            match target_state {
                Some((true, aim)) => units[i].destination = aim,
                _ => units[i].clear_focus(),
            }
        }

        if units[i].is_moving() {
            let direction = (units[i].destination - units[i].position).normalize();
            let step = direction.scale(units[i].speed);
            units[i].position = units[i].position + step;
            resolve_collisions(units, i, field);
        }

        units[i].tick_cooldown();
    }
}

/// Push unit `i` apart from every other living unit it overlaps, then
/// clamp it into the battlefield with its own size as padding.
fn resolve_collisions(units: &mut [Unit], i: usize, field: &Battlefield) {
    for j in 0..units.len() {
        if j == i || units[j].is_dead {
            continue;
        }

        let (unit, other) = pair_mut(units, i, j);
        let min_distance = unit.size + collision_slack() + other.size + collision_slack();

        let delta = unit.position - other.position;
        let dist_sq = delta.dot(delta);
        if dist_sq == Fixed::ZERO {
            // Exactly coincident: no push direction exists
            continue;
        }

        let distance = fixed_sqrt(dist_sq);
        if distance < min_distance {
            let overlap = min_distance - distance;
            let push = delta.normalize().scale(overlap / Fixed::from_num(2));

            unit.position = unit.position + push;
            if unit.team == other.team {
                other.position = other.position - push;
            }
        }
    }

    let unit = &mut units[i];
    unit.position = field.clamp(unit.position, unit.size);
}

/// Disjoint mutable references to two arena slots.
fn pair_mut(units: &mut [Unit], i: usize, j: usize) -> (&mut Unit, &mut Unit) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = units.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = units.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{Archetype, ArchetypeTable};
    use crate::math::Vec2Fixed;
    use crate::unit::Team;

    fn unit_at(id: u32, team: Team, x: i32, y: i32) -> Unit {
        let table = ArchetypeTable::standard();
        Unit::new(
            id,
            Archetype::Infantry,
            team,
            Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y)),
            table.get(Archetype::Infantry),
        )
    }

    #[test]
    fn test_unit_steps_toward_destination() {
        let field = Battlefield::standard();
        let mut units = vec![unit_at(0, Team::Player, 100, 100)];
        units[0].move_to(Vec2Fixed::new(Fixed::from_num(200), Fixed::from_num(100)));

        movement_phase(&mut units, &field);

        // Infantry speed is 2 along +x
        assert_eq!(units[0].position.x, Fixed::from_num(102));
        assert_eq!(units[0].position.y, Fixed::from_num(100));
    }

    #[test]
    fn test_arrived_unit_stays_put() {
        let field = Battlefield::standard();
        let mut units = vec![unit_at(0, Team::Player, 100, 100)];
        units[0].move_to(Vec2Fixed::new(Fixed::from_num(101), Fixed::from_num(100)));

        movement_phase(&mut units, &field);

        // Within the arrival epsilon: no displacement
        assert_eq!(units[0].position.x, Fixed::from_num(100));
    }

    #[test]
    fn test_same_team_units_separate() {
        let field = Battlefield::standard();
        let mut units = vec![
            unit_at(0, Team::Player, 300, 300),
            unit_at(1, Team::Player, 305, 300),
        ];
        // Both marching through each other's spot
        units[0].move_to(Vec2Fixed::new(Fixed::from_num(400), Fixed::from_num(300)));

        for _ in 0..120 {
            movement_phase(&mut units, &field);
        }

        let min_distance = units[0].size + units[1].size;
        let distance = units[0].position.distance(units[1].position);
        let tolerance = Fixed::from_num(1);
        assert!(
            distance + tolerance >= min_distance,
            "same-team units still overlap: {:?} < {:?}",
            distance,
            min_distance
        );
    }

    #[test]
    fn test_cross_team_overlap_is_not_corrected() {
        let field = Battlefield::standard();
        let mut units = vec![
            unit_at(0, Team::Player, 300, 300),
            unit_at(1, Team::Enemy, 305, 300),
        ];
        let enemy_start = units[1].position;

        // Neither unit is moving: collision resolution never runs on the
        // enemy, and the stationary player unit never pushes it
        for _ in 0..60 {
            movement_phase(&mut units, &field);
        }

        assert_eq!(units[1].position, enemy_start);
    }

    #[test]
    fn test_units_stay_in_bounds() {
        let field = Battlefield::standard();
        let mut units = vec![unit_at(0, Team::Player, 20, 20)];
        units[0].move_to(Vec2Fixed::new(Fixed::from_num(-500), Fixed::from_num(-500)));

        for _ in 0..200 {
            movement_phase(&mut units, &field);
        }

        let padding = units[0].size;
        assert!(units[0].position.x >= padding);
        assert!(units[0].position.y >= padding);
    }

    #[test]
    fn test_pursuit_follows_focus_target() {
        let field = Battlefield::standard();
        let mut units = vec![
            unit_at(0, Team::Player, 100, 100),
            unit_at(1, Team::Enemy, 500, 100),
        ];
        let target_position = units[1].position;
        units[0].set_focus_target(1, target_position);

        // Target relocates; the pursuer re-aims each tick
        let relocated = Vec2Fixed::new(Fixed::from_num(500), Fixed::from_num(400));
        units[1].position = relocated;
        units[1].destination = relocated;
        movement_phase(&mut units, &field);

        assert_eq!(units[0].destination, relocated);
    }

    #[test]
    fn test_dead_focus_target_is_cleared() {
        let field = Battlefield::standard();
        let mut units = vec![
            unit_at(0, Team::Player, 100, 100),
            unit_at(1, Team::Enemy, 500, 100),
        ];
        let target_position = units[1].position;
        units[0].set_focus_target(1, target_position);
        let last_destination = units[0].destination;

        units[1].take_damage(Fixed::from_num(1000));
        movement_phase(&mut units, &field);

        assert_eq!(units[0].focus_target, None);
        // Destination is not further modified on the clearing tick
        assert_eq!(units[0].destination, last_destination);
    }

    #[test]
    fn test_dead_units_do_not_move() {
        let field = Battlefield::standard();
        let mut units = vec![unit_at(0, Team::Player, 100, 100)];
        units[0].move_to(Vec2Fixed::new(Fixed::from_num(400), Fixed::from_num(100)));
        units[0].take_damage(Fixed::from_num(1000));
        let resting_place = units[0].position;

        movement_phase(&mut units, &field);

        assert_eq!(units[0].position, resting_place);
    }

    #[test]
    fn test_cooldown_ticks_during_movement_phase() {
        let field = Battlefield::standard();
        let mut units = vec![unit_at(0, Team::Player, 100, 100)];
        units[0].cooldown_remaining = 2;

        movement_phase(&mut units, &field);
        assert_eq!(units[0].cooldown_remaining, 1);
        movement_phase(&mut units, &field);
        assert_eq!(units[0].cooldown_remaining, 0);
        movement_phase(&mut units, &field);
        assert_eq!(units[0].cooldown_remaining, 0);
    }
}
