//! Chart slots and declarative bar chart descriptions.
//!
//! A [`ChartSlot`] owns at most one live chart. [`ChartSlot::replace`] destroys
//! the current instance before creating the next one, so a slot can never hold
//! two live charts.

/// Plain RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#cbd5e1`
    pub const SLATE: Rgb = Rgb(0xcb, 0xd5, 0xe1);
    /// `#6366f1`
    pub const INDIGO: Rgb = Rgb(0x63, 0x66, 0xf1);
    /// `#ef4444`
    pub const RED: Rgb = Rgb(0xef, 0x44, 0x44);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarOrientation {
    /// Categories along x, values along y.
    Vertical,
    /// Categories along y, values along x.
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: &'static str,
    pub value: f64,
    pub color: Rgb,
}

/// Everything needed to draw one bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub orientation: BarOrientation,
    pub bars: Vec<Bar>,
    /// Corner radius, in the chart engine's units.
    pub corner_radius: u8,
    /// Fixed bar thickness; `None` lets the engine size bars to fit.
    pub bar_thickness: Option<u8>,
    pub show_legend: bool,
    pub show_grid: bool,
}

impl BarChartSpec {
    pub fn values(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.value).collect()
    }

    /// Upper bound of the value axis (at least 1 so an all-zero chart still draws).
    pub fn value_max(&self) -> f64 {
        self.bars
            .iter()
            .map(|b| b.value)
            .filter(|v| v.is_finite())
            .fold(1.0_f64, f64::max)
    }
}

/// The two chart regions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSlotId {
    /// Price composition: estimate, tier index, final forecast.
    Composition,
    /// Feature impact: size, beds, baths, amenities.
    Impact,
}

/// A live chart bound to a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInstance {
    /// Per-slot creation serial, starting at 1.
    pub serial: u64,
    pub spec: BarChartSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlot {
    id: ChartSlotId,
    live: Option<ChartInstance>,
    created: u64,
    destroyed: u64,
}

impl ChartSlot {
    pub fn new(id: ChartSlotId) -> Self {
        Self {
            id,
            live: None,
            created: 0,
            destroyed: 0,
        }
    }

    pub fn id(&self) -> ChartSlotId {
        self.id
    }

    /// Destroy the current chart (if any), then create one from `spec`.
    pub fn replace(&mut self, spec: BarChartSpec) -> &ChartInstance {
        self.destroy();
        self.created += 1;
        self.live.insert(ChartInstance {
            serial: self.created,
            spec,
        })
    }

    /// Destroy the live chart, leaving the slot empty.
    pub fn destroy(&mut self) -> Option<ChartInstance> {
        let old = self.live.take();
        if old.is_some() {
            self.destroyed += 1;
        }
        old
    }

    pub fn live(&self) -> Option<&ChartInstance> {
        self.live.as_ref()
    }

    /// Number of live instances: created minus destroyed. Always 0 or 1.
    pub fn live_count(&self) -> u64 {
        self.created - self.destroyed
    }

    pub fn created_count(&self) -> u64 {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(value: f64) -> BarChartSpec {
        BarChartSpec {
            orientation: BarOrientation::Vertical,
            bars: vec![Bar {
                label: "x",
                value,
                color: Rgb::RED,
            }],
            corner_radius: 6,
            bar_thickness: None,
            show_legend: false,
            show_grid: true,
        }
    }

    #[test]
    fn replace_destroys_previous_instance() {
        let mut slot = ChartSlot::new(ChartSlotId::Composition);
        assert_eq!(slot.live_count(), 0);

        slot.replace(spec(1.0));
        let second = slot.replace(spec(2.0)).serial;

        assert_eq!(second, 2);
        assert_eq!(slot.live_count(), 1);
        assert_eq!(slot.created_count(), 2);
        assert_eq!(slot.live().unwrap().spec.values(), vec![2.0]);
    }

    #[test]
    fn destroy_empties_slot_and_is_idempotent() {
        let mut slot = ChartSlot::new(ChartSlotId::Impact);
        slot.replace(spec(1.0));
        assert!(slot.destroy().is_some());
        assert!(slot.destroy().is_none());
        assert!(slot.live().is_none());
        assert_eq!(slot.live_count(), 0);
    }

    #[test]
    fn value_max_has_floor_of_one() {
        assert_eq!(spec(0.0).value_max(), 1.0);
        assert_eq!(spec(250.0).value_max(), 250.0);
        assert_eq!(spec(f64::NAN).value_max(), 1.0);
    }
}
