mod builder;
mod handling;
mod resources;

use std::sync::{Arc, Mutex};

use crate::harbor::{Harbor, HarborEvent};
use crate::model::{ContainerSize, ContainerStorage, ShipId, ShipModel, SizeClass};
use crate::sim::{SimTime, Simulator};

pub(crate) fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> SimTime {
    SimTime::from_ymd_hms(y, m, d, h, min, 0).expect("valid time")
}

/// 空港口：港口位置 0..=1000，堆场位置 0..=100
pub(crate) fn empty_harbor(start: SimTime) -> Harbor {
    let storage = ContainerStorage::new("yard", 0, 100).expect("storage");
    Harbor::new("test harbor", 0, 1000, storage, start).expect("harbor")
}

/// 一个小泊位（一台岸桥）、一辆 AGV、两个容量为 4 的存储列、一艘装有
/// `containers` 个小箱的小型船 "Ship 1"
pub(crate) fn basic_harbor(start: SimTime, containers: i64) -> (Harbor, ShipId) {
    let mut harbor = empty_harbor(start);
    harbor
        .initialize_storage_columns(&[10], &[20], 2, 2, 1, 1, 2, 1)
        .expect("columns");
    harbor
        .initialize_docks(1, SizeClass::Small, 1)
        .expect("docks");
    harbor.initialize_agvs(1, 5).expect("agvs");
    let ships = harbor
        .initialize_ships(
            0,
            1,
            ShipModel::Feeder,
            SizeClass::Small,
            containers,
            ContainerSize::Small,
        )
        .expect("ships");
    (harbor, ships[0])
}

pub(crate) fn capture_events(harbor: &mut Harbor) -> Arc<Mutex<Vec<HarborEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    harbor.subscribe(Box::new(move |ev| {
        sink.lock().expect("log lock").push(ev.clone());
    }));
    log
}

/// 推进 `n` 个 tick
pub(crate) fn step_n(sim: &mut Simulator, harbor: &mut Harbor, n: usize) {
    for _ in 0..n {
        sim.step(harbor);
    }
}

/// 港口中所有持有者手里的集装箱总数
pub(crate) fn containers_everywhere(harbor: &Harbor) -> usize {
    let on_ships: usize = harbor.ships().iter().map(|s| s.container_count()).sum();
    let on_agvs = harbor.agvs().iter().filter(|a| a.cargo().is_some()).count();
    let on_cranes = harbor
        .docks()
        .iter()
        .flat_map(|d| d.cranes())
        .filter(|c| c.holding().is_some())
        .count();
    let on_portals = harbor
        .storage()
        .columns()
        .iter()
        .filter(|c| c.portal_crane().holding().is_some())
        .count();
    on_ships + on_agvs + on_cranes + on_portals + harbor.storage().container_count()
}
