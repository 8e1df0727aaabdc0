use super::{at, empty_harbor};
use crate::error::HarborError;
use crate::model::{ColumnId, ContainerSize, ShipModel, ShipState, SizeClass};

#[test]
fn initializers_reject_non_positive_counts() {
    let mut harbor = empty_harbor(at(2024, 1, 1, 0, 0));
    assert_eq!(
        harbor.initialize_docks(0, SizeClass::Small, 1).unwrap_err(),
        HarborError::InvalidCount {
            what: "dock",
            count: 0,
        }
    );
    assert_eq!(
        harbor.initialize_docks(1, SizeClass::Small, -2).unwrap_err(),
        HarborError::InvalidCount {
            what: "crane per dock",
            count: -2,
        }
    );
    assert!(harbor.initialize_agvs(0, 0).is_err());
    assert!(
        harbor
            .initialize_ships(0, -1, ShipModel::Feeder, SizeClass::Small, 0, ContainerSize::Small)
            .is_err()
    );
    assert!(
        harbor
            .initialize_ships(0, 1, ShipModel::Feeder, SizeClass::Small, -3, ContainerSize::Small)
            .is_err()
    );
    assert!(harbor.docks().is_empty());
    assert!(harbor.agvs().is_empty());
    assert!(harbor.ships().is_empty());
}

#[test]
fn initializers_check_locations() {
    let mut harbor = empty_harbor(at(2024, 1, 1, 0, 0));
    assert_eq!(
        harbor.initialize_agvs(1, 1001).unwrap_err(),
        HarborError::LocationOutOfRange {
            location: 1001,
            start: 0,
            end: 1000,
        }
    );
    assert!(
        harbor
            .initialize_ships(-5, 1, ShipModel::Feeder, SizeClass::Small, 0, ContainerSize::Small)
            .is_err()
    );
    // 堆场范围 0..=100，任一位置越界则一列都不创建
    assert!(
        harbor
            .initialize_storage_columns(&[10], &[200], 2, 1, 1, 1, 1, 1)
            .is_err()
    );
    assert!(harbor.storage().columns().is_empty());
}

#[test]
fn ships_are_named_sequentially_with_fresh_containers() {
    let mut harbor = empty_harbor(at(2024, 1, 1, 0, 0));
    let first = harbor
        .initialize_ships(3, 2, ShipModel::Panamax, SizeClass::Medium, 2, ContainerSize::Large)
        .expect("ships");
    let second = harbor
        .initialize_ships(3, 1, ShipModel::Feeder, SizeClass::Small, 1, ContainerSize::Small)
        .expect("ships");

    let names: Vec<&str> = harbor.ships().iter().map(|s| s.name()).collect();
    assert_eq!(names, ["Ship 1", "Ship 2", "Ship 3"]);
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);

    let ship = harbor.ship(first[1]).expect("ship");
    assert_eq!(ship.state(), ShipState::Idle);
    assert_eq!(ship.location(), 3);
    let ids: Vec<String> = ship.containers().map(|c| c.name().to_string()).collect();
    assert_eq!(ids, ["Container 2", "Container 3"]);
    assert!(ship.containers().all(|c| c.history().is_empty()));
}

#[test]
fn storage_columns_follow_location_groups() {
    let mut harbor = empty_harbor(at(2024, 1, 1, 0, 0));
    let ids = harbor
        .initialize_storage_columns(&[10, 20], &[30], 5, 2, 2, 1, 3, 4)
        .expect("columns");
    assert_eq!(
        ids,
        [ColumnId(0), ColumnId(1), ColumnId(2), ColumnId(3), ColumnId(4)]
    );
    let columns = harbor.storage().columns();
    assert_eq!(columns[1].location(), 10);
    assert_eq!(columns[2].location(), 20);
    assert_eq!(columns[4].location(), 30);
    assert_eq!(columns[0].dimensions(), (5, 3, 4));
    assert_eq!(columns[4].dimensions(), (2, 3, 4));
    assert_eq!(harbor.storage().capacity(), 4 * 60 + 24);
}
