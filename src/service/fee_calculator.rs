use serde::Serialize;

use crate::{
    config::Config,
    models::propertymodel::SelectedProperty,
    utils::currency::format_naira,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub base_fee: i64,
    pub lga_surcharge: i64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            base_fee: 10_000,
            lga_surcharge: 5_000,
        }
    }
}

impl FeeSchedule {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_fee: config.inspection_base_fee,
            lga_surcharge: config.inspection_lga_surcharge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionFee {
    pub base_fee: i64,
    pub surcharge: i64,
    pub total: i64,
}

impl InspectionFee {
    pub fn display(&self) -> String {
        format_naira(self.total)
    }
}

/// Inspection fee for a tab's selection.
///
/// One property, or two in the same LGA, costs the base fee. Two properties in
/// different LGAs add the surcharge. A property with no usable LGA is treated
/// as being in a different LGA, so the fee never undercharges.
pub fn calculate_inspection_fee(selected: &[SelectedProperty], schedule: FeeSchedule) -> InspectionFee {
    let surcharge = match selected {
        [first, second, ..] => {
            let first_lga = first.property.location.lga_key();
            let second_lga = second.property.location.lga_key();
            match (first_lga, second_lga) {
                (Some(a), Some(b)) if a == b => 0,
                _ => schedule.lga_surcharge,
            }
        }
        _ => 0,
    };

    InspectionFee {
        base_fee: schedule.base_fee,
        surcharge,
        total: schedule.base_fee + surcharge,
    }
}
