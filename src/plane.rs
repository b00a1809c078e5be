//! A single plane of 9 lanes, one per `x`.
//!
//! Used both as the per-column parity plane computed during `AddColumnParity`
//! and as the running θ-effect / parity bookkeeping kept by the bare-state
//! enumerator (§4.4 of the design notes).

use crate::lane::TroikaLane;
use crate::position::COLUMNS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TroikaPlane {
    pub lanes: [TroikaLane; COLUMNS],
}

impl TroikaPlane {
    pub const ZERO: TroikaPlane = TroikaPlane { lanes: [TroikaLane::ZERO; COLUMNS] };

    #[inline]
    pub fn lane(&self, x: u8) -> TroikaLane {
        self.lanes[x as usize]
    }

    #[inline]
    pub fn lane_mut(&mut self, x: u8) -> &mut TroikaLane {
        &mut self.lanes[x as usize]
    }

    pub fn add_trit_value(&mut self, x: u8, z: u8, value: u8) {
        let current = self.lanes[x as usize].get_trit(z);
        self.lanes[x as usize].set_trit(z, (current + value) % 3);
    }

    pub fn multiply_by_2(&self) -> Self {
        let mut out = *self;
        for lane in out.lanes.iter_mut() {
            *lane = lane.multiply_by_2();
        }
        out
    }

    pub fn is_zero(&self) -> bool {
        self.lanes.iter().all(|l| !l.is_active())
    }
}

impl std::ops::Add for TroikaPlane {
    type Output = TroikaPlane;
    fn add(self, rhs: TroikaPlane) -> TroikaPlane {
        let mut out = TroikaPlane::ZERO;
        for x in 0..COLUMNS {
            out.lanes[x] = self.lanes[x] + rhs.lanes[x];
        }
        out
    }
}

impl std::ops::Sub for TroikaPlane {
    type Output = TroikaPlane;
    fn sub(self, rhs: TroikaPlane) -> TroikaPlane {
        let mut out = TroikaPlane::ZERO;
        for x in 0..COLUMNS {
            out.lanes[x] = self.lanes[x] - rhs.lanes[x];
        }
        out
    }
}
