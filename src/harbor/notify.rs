//! 港口通知
//!
//! 订阅者在船舶抵达、离港、卸货完成、装货完成时收到通知。

use serde::{Deserialize, Serialize};

use crate::model::ShipId;
use crate::sim::SimTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HarborEvent {
    ShipArrived { ship: ShipId, name: String, at: SimTime },
    ShipDeparted { ship: ShipId, name: String, at: SimTime },
    ShipCompletedUnloading { ship: ShipId, name: String, at: SimTime },
    ShipCompletedLoading { ship: ShipId, name: String, at: SimTime },
}

impl HarborEvent {
    pub fn ship(&self) -> ShipId {
        match self {
            HarborEvent::ShipArrived { ship, .. }
            | HarborEvent::ShipDeparted { ship, .. }
            | HarborEvent::ShipCompletedUnloading { ship, .. }
            | HarborEvent::ShipCompletedLoading { ship, .. } => *ship,
        }
    }
}

pub type HarborListener = Box<dyn FnMut(&HarborEvent) + Send>;
