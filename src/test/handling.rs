use super::{at, basic_harbor, capture_events, containers_everywhere, empty_harbor, step_n};
use crate::error::HarborError;
use crate::harbor::{Harbor, HarborEvent};
use crate::model::{
    ColumnId, ContainerSize, HandlingKind, Recurrence, ScheduledHandling, ShipModel, ShipState,
    SizeClass,
};
use crate::sim::Simulator;

fn assert_all_resources_free(harbor: &Harbor) {
    for crane in harbor.docks().iter().flat_map(|d| d.cranes()) {
        assert!(crane.is_available());
        assert_eq!(crane.handling_time(), 0);
        assert_eq!(crane.engaged_with(), None);
    }
    for column in harbor.storage().columns() {
        let portal = column.portal_crane();
        assert!(portal.is_available());
        assert_eq!(portal.handling_time(), 0);
        assert_eq!(portal.engaged_with(), None);
    }
    assert!(harbor.agvs().iter().all(|a| a.is_available()));
}

fn handling(h: u32, min: u32, count: u32, kind: HandlingKind) -> ScheduledHandling {
    ScheduledHandling::new(
        at(2024, 1, 1, h, min),
        ColumnId(0),
        ColumnId(1),
        count,
        kind,
        Recurrence::Once,
    )
}

#[test]
fn unload_job_moves_containers_into_storage() {
    let start = at(2024, 1, 1, 0, 0);
    let (mut harbor, ship) = basic_harbor(start, 2);
    let events = capture_events(&mut harbor);
    harbor
        .schedule_handling(ship, handling(0, 2, 2, HandlingKind::Unload))
        .expect("schedule");
    let mut sim = Simulator::new(start, at(2024, 1, 1, 6, 0));

    step_n(&mut sim, &mut harbor, 3);
    assert_eq!(harbor.ship(ship).expect("ship").state(), ShipState::Unloading);
    assert_eq!(harbor.pending_jobs(ship), 1);
    assert!(harbor.ship(ship).expect("ship").handlings().is_empty());

    // 集装箱在任一 tick 都恰好有一个持有者
    for _ in 0..300 {
        sim.step(&mut harbor);
        assert_eq!(containers_everywhere(&harbor), 2);
    }

    let s = harbor.ship(ship).expect("ship");
    assert_eq!(s.container_count(), 0);
    assert_eq!(s.state(), ShipState::ReadyToSail);
    assert_eq!(harbor.pending_jobs(ship), 0);
    assert_eq!(harbor.storage().columns()[0].container_count(), 2);
    assert_eq!(harbor.storage().occupied_space(), 2);
    assert_eq!(harbor.stats.containers_moved, 4);
    assert_eq!(harbor.stats.jobs_started, 1);
    assert_eq!(harbor.stats.jobs_completed, 1);
    assert!(harbor.agvs()[0].is_available());

    let events = events.lock().expect("events");
    assert!(
        events
            .iter()
            .any(|e| matches!(e, HarborEvent::ShipCompletedUnloading { name, .. } if name == "Ship 1"))
    );
    let log = harbor.history().ship_events("Ship 1");
    assert!(log.contains(
        &"Ship 1 started unloading 2 containers via columns 0..=1 at 2024-01-01 00:02:00"
            .to_string()
    ));
    assert!(log.iter().any(|l| l.starts_with("Ship 1 completed unloading at ")));
}

#[test]
fn load_job_brings_containers_back_from_storage() {
    let start = at(2024, 1, 1, 0, 0);
    let (mut harbor, ship) = basic_harbor(start, 0);
    for _ in 0..2 {
        let c = harbor.new_container(ContainerSize::Large);
        harbor
            .storage
            .column_mut(ColumnId(1))
            .expect("column")
            .store(c)
            .expect("fits");
    }
    let events = capture_events(&mut harbor);
    harbor
        .schedule_handling(ship, handling(0, 2, 2, HandlingKind::Load))
        .expect("schedule");
    let mut sim = Simulator::new(start, at(2024, 1, 1, 6, 0));

    step_n(&mut sim, &mut harbor, 3);
    assert_eq!(harbor.ship(ship).expect("ship").state(), ShipState::Loading);
    sim.run(&mut harbor);

    let s = harbor.ship(ship).expect("ship");
    assert_eq!(s.container_count(), 2);
    assert!(s.containers().all(|c| c.size() == ContainerSize::Large));
    assert_eq!(harbor.storage().container_count(), 0);
    assert_eq!(harbor.storage().occupied_space(), 0);
    assert_eq!(harbor.stats.jobs_completed, 1);
    assert!(
        events
            .lock()
            .expect("events")
            .iter()
            .any(|e| matches!(e, HarborEvent::ShipCompletedLoading { .. }))
    );
}

#[test]
fn load_job_ends_early_when_range_runs_dry() {
    let start = at(2024, 1, 1, 0, 0);
    let (mut harbor, ship) = basic_harbor(start, 0);
    let c = harbor.new_container(ContainerSize::Small);
    harbor
        .storage
        .column_mut(ColumnId(0))
        .expect("column")
        .store(c)
        .expect("fits");
    harbor
        .schedule_handling(ship, handling(0, 2, 3, HandlingKind::Load))
        .expect("schedule");
    let mut sim = Simulator::new(start, at(2024, 1, 1, 4, 0));
    sim.run(&mut harbor);

    assert_eq!(harbor.ship(ship).expect("ship").container_count(), 1);
    assert_eq!(harbor.pending_jobs(ship), 0);
    assert_eq!(harbor.stats.jobs_completed, 1);
    assert!(harbor.ship(ship).expect("ship").is_ready_to_sail());
}

#[test]
fn handling_for_undocked_ship_is_missed() {
    let start = at(2024, 1, 1, 0, 0);
    let (mut harbor, _) = basic_harbor(start, 0);
    let big = harbor
        .add_ship("Colossus", ShipModel::PostPanamax, SizeClass::Large, 0)
        .expect("ship");
    harbor.load_new_containers(big, 3, ContainerSize::Large).expect("load");
    harbor
        .schedule_handling(big, handling(0, 2, 3, HandlingKind::Unload))
        .expect("schedule");
    let mut sim = Simulator::new(start, at(2024, 1, 1, 1, 0));
    sim.run(&mut harbor);

    assert_eq!(harbor.ship(big).expect("ship").state(), ShipState::Waiting);
    assert!(harbor.ship(big).expect("ship").handlings().is_empty());
    assert_eq!(harbor.stats.jobs_started, 0);
    assert!(
        harbor.history().ship_events("Colossus").contains(
            &"Colossus missed scheduled unloading (not docked) at 2024-01-01 00:02:00".to_string()
        )
    );
}

#[test]
fn unload_is_skipped_when_storage_lacks_space() {
    let start = at(2024, 1, 1, 0, 0);
    let (mut harbor, ship) = basic_harbor(start, 10);
    harbor
        .schedule_handling(ship, handling(0, 2, 10, HandlingKind::Unload))
        .expect("schedule");
    let mut sim = Simulator::new(start, at(2024, 1, 1, 0, 30));
    sim.run(&mut harbor);

    assert_eq!(harbor.pending_jobs(ship), 0);
    assert_eq!(harbor.ship(ship).expect("ship").container_count(), 10);
    assert_eq!(harbor.stats.jobs_started, 0);
    assert!(
        harbor
            .history()
            .ship_events("Ship 1")
            .iter()
            .any(|l| l.starts_with("Ship 1 skipped unloading:"))
    );
}

#[test]
fn single_agv_is_shared_between_docked_ships() {
    let start = at(2024, 1, 1, 0, 0);
    let mut harbor = empty_harbor(start);
    harbor
        .initialize_storage_columns(&[10], &[20], 2, 2, 1, 1, 2, 1)
        .expect("columns");
    harbor.initialize_docks(2, SizeClass::Small, 1).expect("docks");
    harbor.initialize_agvs(1, 5).expect("agvs");
    let ships = harbor
        .initialize_ships(0, 2, ShipModel::Feeder, SizeClass::Small, 1, ContainerSize::Small)
        .expect("ships");
    for ship in &ships {
        harbor
            .schedule_handling(*ship, handling(0, 2, 1, HandlingKind::Unload))
            .expect("schedule");
    }
    let mut sim = Simulator::new(start, at(2024, 1, 1, 4, 0));

    // 第二艘船必须等第一艘的 AGV 放箱完成
    sim.run_until(at(2024, 1, 1, 0, 40), &mut harbor);
    assert_eq!(harbor.ship(ships[1]).expect("ship").container_count(), 1);

    sim.run(&mut harbor);
    assert_eq!(harbor.storage().container_count(), 2);
    assert_eq!(harbor.stats.jobs_completed, 2);
    assert!(ships.iter().all(|s| harbor.pending_jobs(*s) == 0));
}

#[test]
fn daily_handling_stays_scheduled() {
    let start = at(2024, 1, 1, 0, 0);
    let (mut harbor, ship) = basic_harbor(start, 1);
    let mut entry = handling(0, 2, 1, HandlingKind::Unload);
    entry.recurrence = Recurrence::Daily;
    harbor.schedule_handling(ship, entry).expect("schedule");
    let mut sim = Simulator::new(start, at(2024, 1, 1, 1, 0));
    sim.run(&mut harbor);

    assert_eq!(harbor.ship(ship).expect("ship").handlings().len(), 1);
    assert_eq!(harbor.stats.jobs_started, 1);
}

#[test]
fn handling_schedule_validation() {
    let start = at(2024, 1, 1, 0, 0);
    let (mut harbor, ship) = basic_harbor(start, 1);
    let entry = handling(1, 0, 1, HandlingKind::Unload);
    harbor.schedule_handling(ship, entry).expect("first");
    assert_eq!(
        harbor.schedule_handling(ship, entry),
        Err(HarborError::DuplicateHandling("Ship 1".to_string()))
    );
    // 方向不同则不算重复
    harbor
        .schedule_handling(ship, handling(1, 0, 1, HandlingKind::Load))
        .expect("load entry");

    assert!(matches!(
        harbor.schedule_handling(ship, handling(2, 0, 0, HandlingKind::Unload)),
        Err(HarborError::InvalidCount { count: 0, .. })
    ));
    let mut reversed = handling(2, 0, 1, HandlingKind::Unload);
    reversed.start = ColumnId(1);
    reversed.end = ColumnId(0);
    assert!(matches!(
        harbor.schedule_handling(ship, reversed),
        Err(HarborError::InvalidArgument(_))
    ));
    let mut unknown = handling(2, 0, 1, HandlingKind::Unload);
    unknown.end = ColumnId(7);
    assert_eq!(
        harbor.schedule_handling(ship, unknown),
        Err(HarborError::UnknownColumn(ColumnId(7)))
    );
    assert_eq!(harbor.ship(ship).expect("ship").handlings().len(), 2);
}

#[test]
fn truck_emptying_ship_mid_lift_ends_job_and_frees_resources() {
    let start = at(2024, 1, 1, 0, 0);
    let (mut harbor, ship) = basic_harbor(start, 3);
    harbor
        .schedule_handling(ship, handling(0, 2, 3, HandlingKind::Unload))
        .expect("schedule");
    let mut sim = Simulator::new(start, at(2024, 1, 1, 6, 0));

    // 00:03 起岸桥开始累计，00:10 时仍在吊运第一个集装箱
    step_n(&mut sim, &mut harbor, 10);
    assert_eq!(harbor.docks()[0].cranes()[0].handling_time(), 8);
    assert!(!harbor.agvs()[0].is_available());

    let removed = harbor.remove_fraction_from_ship(ship, 1.0).expect("truck");
    assert_eq!(removed.len(), 3);
    step_n(&mut sim, &mut harbor, 300);

    assert_all_resources_free(&harbor);
    assert_eq!(harbor.pending_jobs(ship), 0);
    assert_eq!(harbor.ship(ship).expect("ship").state(), ShipState::ReadyToSail);
    assert_eq!(harbor.stats.jobs_completed, 1);
    assert_eq!(harbor.storage().container_count(), 0);
    assert!(
        !harbor
            .history()
            .ship_events("Ship 1")
            .iter()
            .any(|l| l.contains("aborted handling"))
    );
}

#[test]
fn truck_emptying_column_mid_retrieval_ends_job_and_frees_resources() {
    let start = at(2024, 1, 1, 0, 0);
    let (mut harbor, ship) = basic_harbor(start, 0);
    let c = harbor.new_container(ContainerSize::Small);
    harbor
        .storage
        .column_mut(ColumnId(0))
        .expect("column")
        .store(c)
        .expect("fits");
    harbor
        .schedule_handling(ship, handling(0, 2, 1, HandlingKind::Load))
        .expect("schedule");
    let mut sim = Simulator::new(start, at(2024, 1, 1, 6, 0));

    step_n(&mut sim, &mut harbor, 10);
    assert_eq!(
        harbor.storage().columns()[0].portal_crane().engaged_with(),
        Some(harbor.agvs()[0].id())
    );

    let removed = harbor
        .remove_fraction_from_column(ColumnId(0), 1.0)
        .expect("truck");
    assert_eq!(removed.len(), 1);
    step_n(&mut sim, &mut harbor, 300);

    assert_all_resources_free(&harbor);
    assert_eq!(harbor.pending_jobs(ship), 0);
    assert_eq!(harbor.ship(ship).expect("ship").container_count(), 0);
    assert_eq!(harbor.stats.jobs_completed, 1);
}

#[test]
fn agv_freed_by_emptied_ship_serves_the_next_job() {
    let start = at(2024, 1, 1, 0, 0);
    let (mut harbor, ship) = basic_harbor(start, 2);
    harbor
        .schedule_handling(ship, handling(0, 2, 2, HandlingKind::Unload))
        .expect("schedule");
    let mut sim = Simulator::new(start, at(2024, 1, 1, 6, 0));
    step_n(&mut sim, &mut harbor, 10);
    harbor.remove_fraction_from_ship(ship, 1.0).expect("truck");
    step_n(&mut sim, &mut harbor, 1);
    assert_eq!(harbor.stats.jobs_completed, 1);

    harbor.load_new_containers(ship, 1, ContainerSize::Small).expect("reload");
    harbor
        .schedule_handling(ship, handling(0, 20, 1, HandlingKind::Unload))
        .expect("schedule");
    sim.run(&mut harbor);

    assert_eq!(harbor.storage().container_count(), 1);
    assert_eq!(harbor.stats.jobs_completed, 2);
    assert_all_resources_free(&harbor);
}
