//! Integration tests for hazard-avoidance movement through the tick cycle.
//!
//! The main scenario is a 5x17 room of acid pools:
//!
//! ```text
//! U ###############
//! V #R#AAA#W# # #C#
//!   #A#A#A# #M#B# #
//!   ###AAA#########
//!     #####
//! ```
//!
//! `U` is the player, `V` an empty vehicle seat, `#` wall, `R` rubble and
//! acid with an NPC on it, `A` acid with an NPC on it, `W`/`M` a vehicle
//! seat on acid with a follower/neutral NPC seated, and `B`/`C` acid with a
//! follower/neutral NPC on it.

#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::missing_panics_doc,
    clippy::too_many_lines
)]

use std::collections::BTreeMap;

use dormant_agents::AgentManager;
use dormant_core::{Simulation, SimulationConfig, TickSummary};
use dormant_types::{
    AgentId, Attitude, BlockReason, FieldKind, IdleReason, MoveOutcome, Point, TransientStatus,
    VehicleId, VehicleSeat,
};
use dormant_world::{
    AgentRoster, Field, Furniture, Occupancy, Tile, TileHazard, parse_layout,
};

const SETUP: [&str; 5] = [
    "U ###############",
    "V #R#AAA#W# # #C#",
    "  #A#A#A# #M#B# #",
    "  ###AAA#########",
    "    #####        ",
];

const NPC_MARKS: &str = "ARWMBC";

fn acid() -> Tile {
    Tile::floor().with_field(Field::new(FieldKind::Acid, 3))
}

fn legend() -> BTreeMap<char, Tile> {
    BTreeMap::from([
        ('#', Tile::wall()),
        (' ', Tile::floor()),
        ('U', Tile::floor()),
        ('V', Tile::floor()),
        ('R', acid().with_furniture(Furniture::Rubble)),
        ('A', acid()),
        ('W', acid()),
        ('M', acid()),
        ('B', acid()),
        ('C', acid()),
    ])
}

struct Scenario {
    sim: Simulation,
    origin: Point,
    player: AgentId,
    /// NPC ids keyed by their starting layout cell.
    npcs: BTreeMap<(i32, i32), AgentId>,
}

impl Scenario {
    fn at(&self, x: i32, y: i32) -> Point {
        self.origin.offset(x, y).unwrap()
    }

    fn occupant(&self, x: i32, y: i32) -> Option<AgentId> {
        self.sim.roster().occupant(self.at(x, y))
    }

    fn npc(&self, x: i32, y: i32) -> AgentId {
        self.npcs[&(x, y)]
    }

    fn cells(ch: char) -> Vec<(i32, i32)> {
        let mut cells = Vec::new();
        for (y, row) in SETUP.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == ch {
                    cells.push((i32::try_from(x).unwrap(), i32::try_from(y).unwrap()));
                }
            }
        }
        cells
    }
}

/// Build the room with the player standing on `U`, or seated on `V`.
fn build(player_in_vehicle: bool) -> Scenario {
    let origin = Point::new(60, 60, 0);
    let mut parsed = parse_layout(&SETUP, &legend(), origin).unwrap();

    // Each vehicle tile gets its own vehicle with one seat.
    let mut seats = BTreeMap::new();
    for ch in ['V', 'W', 'M'] {
        for at in parsed.marked(ch).to_vec() {
            let vehicle = VehicleId::new();
            parsed.map.tile_mut(at).unwrap().vehicle = Some(vehicle);
            seats.insert(at, VehicleSeat {
                vehicle,
                position: at,
            });
        }
    }

    let mut manager = AgentManager::new();
    let mut roster = AgentRoster::new();

    let player_at = if player_in_vehicle {
        parsed.marked('V')[0]
    } else {
        parsed.marked('U')[0]
    };
    let mut player = manager.create_player("You".to_owned(), player_at, 0).unwrap();
    if player_in_vehicle {
        player.vehicle = seats.get(&player_at).copied();
    }
    let player_id = player.id;
    roster.insert(player).unwrap();

    let mut npcs = BTreeMap::new();
    for (y, row) in SETUP.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if !NPC_MARKS.contains(ch) {
                continue;
            }
            let (x, y) = (i32::try_from(x).unwrap(), i32::try_from(y).unwrap());
            let at = origin.offset(x, y).unwrap();
            let attitude = if ch == 'M' || ch == 'C' {
                Attitude::Neutral
            } else {
                Attitude::Follow
            };
            let mut npc = manager
                .create_npc(format!("{ch}-{x}-{y}"), at, attitude, 0)
                .unwrap();
            npc.vehicle = seats.get(&at).copied();
            npcs.insert((x, y), npc.id);
            roster.insert(npc).unwrap();
        }
    }

    let sim = Simulation::new(SimulationConfig::default(), parsed.map, roster).unwrap();
    Scenario {
        sim,
        origin,
        player: player_id,
        npcs,
    }
}

fn check_preconditions(scenario: &Scenario) {
    for (y, row) in SETUP.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let (x, y) = (i32::try_from(x).unwrap(), i32::try_from(y).unwrap());
            let at = scenario.at(x, y);
            let tile = scenario.sim.map().tile(at).unwrap();
            assert_eq!(tile.is_passable(), ch != '#', "passability at {ch} ({x},{y})");
            assert_eq!(tile.is_unstable(), ch == 'R', "footing at {ch} ({x},{y})");
            assert_eq!(
                tile.is_boardable(),
                matches!(ch, 'V' | 'W' | 'M'),
                "boardable at {ch} ({x},{y})"
            );

            let occupant = scenario.occupant(x, y);
            if NPC_MARKS.contains(ch) {
                let agent = scenario.sim.agent(occupant.unwrap()).unwrap();
                assert!(TileHazard::of(tile).is_hazardous_for(agent));
            } else if ch != 'U' && ch != 'V' {
                assert!(occupant.is_none());
            }
        }
    }
}

fn check_npc_movement(scenario: &Scenario, summary: &TickSummary) {
    // Every agent, including the player, was resolved exactly once.
    assert_eq!(summary.outcomes.len(), scenario.npcs.len() + 1);

    // Acid is not unstable: enclosed NPCs stay put and never gain the status.
    for (x, y) in Scenario::cells('A') {
        let id = scenario.occupant(x, y).unwrap();
        assert_eq!(id, scenario.npc(x, y));
        assert!(!scenario.sim.agent(id).unwrap().has_status(TransientStatus::UnstableFooting));
        assert_eq!(
            summary.outcome_for(id),
            Some(&MoveOutcome::Blocked {
                reason: BlockReason::NoSaferTile
            })
        );
    }

    // Rubble keeps its footing status on the NPC that cannot leave it.
    for (x, y) in Scenario::cells('R') {
        let id = scenario.occupant(x, y).unwrap();
        assert_eq!(id, scenario.npc(x, y));
        assert!(scenario.sim.agent(id).unwrap().has_status(TransientStatus::UnstableFooting));
    }

    // Seated NPCs ignore the acid under them.
    for (x, y) in Scenario::cells('W').into_iter().chain(Scenario::cells('M')) {
        let id = scenario.occupant(x, y).unwrap();
        assert_eq!(id, scenario.npc(x, y));
        assert_eq!(
            summary.outcome_for(id),
            Some(&MoveOutcome::NotApplicable {
                reason: IdleReason::VehicleExempt
            })
        );
    }

    // Free-standing NPCs with a safe neighbor leave the acid.
    for (x, y) in Scenario::cells('B').into_iter().chain(Scenario::cells('C')) {
        assert!(scenario.occupant(x, y).is_none(), "NPC still at ({x},{y})");
        let outcome = summary.outcome_for(scenario.npc(x, y)).unwrap();
        assert!(outcome.moved());
    }
    assert_eq!(scenario.occupant(13, 1), Some(scenario.npc(13, 2)));
    assert_eq!(scenario.occupant(15, 2), Some(scenario.npc(15, 1)));

    // Nobody is hostile, so nobody picks a target.
    assert!(summary.targets.is_empty());
}

#[test]
fn npcs_escape_dangerous_terrain() {
    let mut scenario = build(false);
    check_preconditions(&scenario);

    let summary = scenario.sim.run_tick().unwrap();
    check_npc_movement(&scenario, &summary);
    assert_eq!(
        summary.outcome_for(scenario.player),
        Some(&MoveOutcome::NotApplicable {
            reason: IdleReason::SafeTile
        })
    );
}

#[test]
fn player_in_vehicle_and_npcs_escaping() {
    let mut scenario = build(true);
    check_preconditions(&scenario);

    let summary = scenario.sim.run_tick().unwrap();
    check_npc_movement(&scenario, &summary);
    assert_eq!(
        summary.outcome_for(scenario.player),
        Some(&MoveOutcome::NotApplicable {
            reason: IdleReason::VehicleExempt
        })
    );
    assert_eq!(scenario.occupant(0, 1), Some(scenario.player));
}

#[test]
fn escaped_npcs_stay_put_on_later_ticks() {
    let mut scenario = build(false);
    let _ = scenario.sim.run_tick().unwrap();
    let summary = scenario.sim.run_tick().unwrap();

    assert_eq!(summary.turn, 1);
    let escaped = scenario.npc(13, 2);
    assert_eq!(
        summary.outcome_for(escaped),
        Some(&MoveOutcome::NotApplicable {
            reason: IdleReason::SafeTile
        })
    );
    assert_eq!(scenario.occupant(13, 1), Some(escaped));
}

// ---------------------------------------------------------------------------
// Corridors: push chains, blocking occupants, footing
// ---------------------------------------------------------------------------

/// One-row corridor between walls. `E` is the escaping NPC on acid, and
/// every other letter is a spawn point on safe floor.
struct Corridor {
    sim: Simulation,
    ids: BTreeMap<char, AgentId>,
}

impl Corridor {
    fn build(row: &str, spawns: &[(char, Attitude)], config: SimulationConfig) -> Self {
        Self::build_with(row, spawns, config, &[])
    }

    fn build_with(
        row: &str,
        spawns: &[(char, Attitude)],
        config: SimulationConfig,
        extra: &[(char, Tile)],
    ) -> Self {
        let walls = "#".repeat(row.len());
        let rows = [walls.as_str(), row, walls.as_str()];
        let mut legend = BTreeMap::from([
            ('#', Tile::wall()),
            (' ', Tile::floor()),
            ('E', acid()),
            ('P', Tile::floor()),
        ]);
        for (ch, _) in spawns {
            legend.entry(*ch).or_insert_with(Tile::floor);
        }
        for (ch, tile) in extra {
            legend.insert(*ch, tile.clone());
        }
        let parsed = parse_layout(&rows, &legend, Point::new(0, 0, 0)).unwrap();

        let mut manager = AgentManager::new();
        let mut roster = AgentRoster::new();
        let mut ids = BTreeMap::new();
        for (ch, attitude) in spawns {
            let at = parsed.marked(*ch)[0];
            let agent = if *ch == 'P' {
                manager.create_player("You".to_owned(), at, 0).unwrap()
            } else {
                manager
                    .create_npc(ch.to_string(), at, *attitude, 0)
                    .unwrap()
            };
            ids.insert(*ch, agent.id);
            roster.insert(agent).unwrap();
        }
        let sim = Simulation::new(config, parsed.map, roster).unwrap();
        Self { sim, ids }
    }

    fn position(&self, ch: char) -> Point {
        self.sim.agent(self.ids[&ch]).unwrap().position
    }

    fn id(&self, ch: char) -> AgentId {
        self.ids[&ch]
    }
}

#[test]
fn escape_pushes_follower_off_the_only_safe_tile() {
    let mut corridor = Corridor::build(
        "#EF #",
        &[('E', Attitude::Follow), ('F', Attitude::Follow)],
        SimulationConfig::default(),
    );
    let summary = corridor.sim.run_tick().unwrap();

    assert_eq!(corridor.position('E'), Point::new(2, 1, 0));
    assert_eq!(corridor.position('F'), Point::new(3, 1, 0));
    match summary.outcome_for(corridor.id('E')).unwrap() {
        MoveOutcome::Moved { step, pushed } => {
            assert_eq!(step.to, Point::new(2, 1, 0));
            assert_eq!(pushed.len(), 1);
            assert_eq!(pushed[0].agent, corridor.id('F'));
        }
        other => panic!("expected a move, got {other:?}"),
    }
}

#[test]
fn fully_enclosed_agent_stays() {
    let mut corridor = Corridor::build("#E#", &[('E', Attitude::Follow)], SimulationConfig::default());
    let summary = corridor.sim.run_tick().unwrap();

    assert_eq!(corridor.position('E'), Point::new(1, 1, 0));
    assert_eq!(
        summary.outcome_for(corridor.id('E')),
        Some(&MoveOutcome::Blocked {
            reason: BlockReason::NoSaferTile
        })
    );
}

#[test]
fn hostile_occupant_blocks_and_targets_escaper() {
    let mut corridor = Corridor::build(
        "#EH #",
        &[('E', Attitude::Follow), ('H', Attitude::Hostile)],
        SimulationConfig::default(),
    );
    let summary = corridor.sim.run_tick().unwrap();

    assert_eq!(corridor.position('E'), Point::new(1, 1, 0));
    assert_eq!(corridor.position('H'), Point::new(2, 1, 0));
    assert_eq!(
        summary.outcome_for(corridor.id('E')),
        Some(&MoveOutcome::Blocked {
            reason: BlockReason::Occupied
        })
    );
    assert_eq!(summary.targets.get(&corridor.id('H')), Some(&corridor.id('E')));
}

#[test]
fn player_is_never_pushed() {
    let mut corridor = Corridor::build(
        "#EP #",
        &[('E', Attitude::Follow), ('P', Attitude::Follow)],
        SimulationConfig::default(),
    );
    let summary = corridor.sim.run_tick().unwrap();

    assert_eq!(corridor.position('P'), Point::new(2, 1, 0));
    assert!(summary.outcome_for(corridor.id('E')).unwrap().is_blocked());
}

#[test]
fn push_chain_is_bounded_by_config() {
    let row = "#EFG #";
    let spawns = [
        ('E', Attitude::Follow),
        ('F', Attitude::Follow),
        ('G', Attitude::Neutral),
    ];

    let mut shallow = Corridor::build(row, &spawns, SimulationConfig::default());
    let summary = shallow.sim.run_tick().unwrap();
    assert_eq!(
        summary.outcome_for(shallow.id('E')),
        Some(&MoveOutcome::Blocked {
            reason: BlockReason::Occupied
        })
    );
    assert_eq!(shallow.position('F'), Point::new(2, 1, 0));
    assert_eq!(shallow.position('G'), Point::new(3, 1, 0));

    let config = SimulationConfig::parse("movement:\n  max_push_depth: 2\n").unwrap();
    let mut deep = Corridor::build(row, &spawns, config);
    let summary = deep.sim.run_tick().unwrap();
    assert_eq!(deep.position('E'), Point::new(2, 1, 0));
    assert_eq!(deep.position('F'), Point::new(3, 1, 0));
    assert_eq!(deep.position('G'), Point::new(4, 1, 0));
    match summary.outcome_for(deep.id('E')).unwrap() {
        MoveOutcome::Moved { pushed, .. } => {
            let order: Vec<AgentId> = pushed.iter().map(|step| step.agent).collect();
            assert_eq!(order, vec![deep.id('G'), deep.id('F')]);
        }
        other => panic!("expected a move, got {other:?}"),
    }
}

#[test]
fn disabled_pushing_leaves_escaper_blocked() {
    let config = SimulationConfig::parse("movement:\n  max_push_depth: 0\n").unwrap();
    let mut corridor = Corridor::build(
        "#EF #",
        &[('E', Attitude::Follow), ('F', Attitude::Follow)],
        config,
    );
    let summary = corridor.sim.run_tick().unwrap();

    assert!(summary.outcome_for(corridor.id('E')).unwrap().is_blocked());
    assert_eq!(corridor.position('F'), Point::new(2, 1, 0));
}

#[test]
fn footing_follows_the_tile_stood_on() {
    let extra = [
        ('R', Tile::floor().with_furniture(Furniture::Rubble)),
        ('S', Tile::floor().with_field(Field::new(FieldKind::Smoke, 1))),
    ];
    let mut corridor = Corridor::build_with(
        "#ERS#",
        &[('E', Attitude::Follow)],
        SimulationConfig::default(),
        &extra,
    );
    let id = corridor.id('E');
    let unstable = |corridor: &Corridor| {
        corridor
            .sim
            .agent(id)
            .unwrap()
            .has_status(TransientStatus::UnstableFooting)
    };

    // Acid to rubble: footing acquired.
    let _ = corridor.sim.run_tick().unwrap();
    assert_eq!(corridor.position('E'), Point::new(2, 1, 0));
    assert!(unstable(&corridor));

    // Standing on safe rubble keeps it.
    let _ = corridor.sim.run_tick().unwrap();
    assert!(unstable(&corridor));

    // Acid spreads onto the rubble; the smoky floor is still hazardous but
    // less so, and has steady footing.
    assert!(
        corridor
            .sim
            .map_mut()
            .add_field(Point::new(2, 1, 0), Field::new(FieldKind::Acid, 1))
    );
    let summary = corridor.sim.run_tick().unwrap();
    assert!(summary.outcome_for(id).unwrap().moved());
    assert_eq!(corridor.position('E'), Point::new(3, 1, 0));
    assert!(!unstable(&corridor));

    // Nowhere safer than the smoke: blocked, footing still clear.
    let summary = corridor.sim.run_tick().unwrap();
    assert!(summary.outcome_for(id).unwrap().is_blocked());
    assert!(!unstable(&corridor));
}

#[test]
fn busy_agent_waits_out_its_action() {
    let mut corridor = Corridor::build("#E #", &[('E', Attitude::Follow)], SimulationConfig::default());
    let id = corridor.id('E');
    corridor.sim.agent_mut(id).unwrap().busy_until = Some(2);

    for _ in 0..2 {
        let summary = corridor.sim.run_tick().unwrap();
        assert_eq!(
            summary.outcome_for(id),
            Some(&MoveOutcome::NotApplicable {
                reason: IdleReason::Busy
            })
        );
    }
    assert_eq!(corridor.position('E'), Point::new(1, 1, 0));

    let summary = corridor.sim.run_tick().unwrap();
    assert!(summary.outcome_for(id).unwrap().moved());
    assert_eq!(corridor.position('E'), Point::new(2, 1, 0));
}

#[test]
fn move_outcomes_serialize_with_tags() {
    let mut corridor = Corridor::build("#E #", &[('E', Attitude::Follow)], SimulationConfig::default());
    let summary = corridor.sim.run_tick().unwrap();
    let outcome = summary.outcome_for(corridor.id('E')).unwrap();

    let value = serde_json::to_value(outcome).unwrap();
    assert_eq!(value["outcome"], "moved");
    assert_eq!(value["step"]["to"]["x"], 2);
    let back: MoveOutcome = serde_json::from_value(value).unwrap();
    assert_eq!(&back, outcome);
}
