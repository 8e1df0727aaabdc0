use super::{at, empty_harbor};
use crate::error::HarborError;
use crate::model::{DockId, ShipModel, SizeClass};

#[test]
fn size_class_compatibility() {
    use SizeClass::*;
    assert!(Small.fits_dock(Small));
    assert!(Small.fits_dock(Large));
    assert!(!Medium.fits_dock(Small));
    assert!(Medium.fits_dock(Medium));
    assert!(Medium.fits_dock(Large));
    assert!(!Large.fits_dock(Medium));
    assert!(Large.fits_dock(Large));
}

#[test]
fn dock_choice_prefers_smallest_fitting_dock() {
    let mut harbor = empty_harbor(at(2024, 1, 1, 0, 0));
    harbor.initialize_docks(1, SizeClass::Large, 1).expect("large");
    harbor.initialize_docks(1, SizeClass::Small, 1).expect("small");

    // 小船应停小泊位，把大泊位留给大船
    assert_eq!(harbor.available_dock_of_size(SizeClass::Small), Some(DockId(1)));
    assert_eq!(harbor.available_dock_of_size(SizeClass::Medium), Some(DockId(0)));
    assert_eq!(harbor.available_dock_of_size(SizeClass::Large), Some(DockId(0)));
}

#[test]
fn occupied_docks_are_not_offered() {
    let start = at(2024, 1, 1, 0, 0);
    let mut harbor = empty_harbor(start);
    harbor.initialize_docks(1, SizeClass::Medium, 1).expect("docks");
    harbor.initialize_agvs(1, 0).expect("agvs");
    harbor
        .add_ship("Aurora", ShipModel::Panamax, SizeClass::Medium, 0)
        .expect("ship");

    harbor.tick(at(2024, 1, 1, 0, 1));
    assert_eq!(harbor.docked_ships().len(), 1);
    assert_eq!(harbor.available_dock_of_size(SizeClass::Small), None);
    assert_eq!(harbor.available_dock_of_size(SizeClass::Large), None);
}

#[test]
fn first_available_agv_is_returned() {
    let mut harbor = empty_harbor(at(2024, 1, 1, 0, 0));
    assert_eq!(harbor.available_agv(), None);
    let ids = harbor.initialize_agvs(3, 7).expect("agvs");
    assert_eq!(harbor.available_agv(), Some(ids[0]));
    assert!(harbor.agvs().iter().all(|a| a.location() == 7));
}

#[test]
fn validation_reports_missing_resources() {
    let mut harbor = empty_harbor(at(2024, 1, 1, 0, 0));
    assert_eq!(
        harbor.validate_resources(),
        Err(HarborError::EmptyResource("docks"))
    );
    harbor.initialize_docks(1, SizeClass::Small, 1).expect("docks");
    assert_eq!(
        harbor.validate_resources(),
        Err(HarborError::EmptyResource("AGVs"))
    );
    harbor.initialize_agvs(1, 0).expect("agvs");
    assert_eq!(
        harbor.validate_resources(),
        Err(HarborError::EmptyResource("ships"))
    );
    harbor
        .add_ship("Borealis", ShipModel::Feeder, SizeClass::Small, 0)
        .expect("ship");
    assert!(harbor.validate_resources().is_ok());
}
