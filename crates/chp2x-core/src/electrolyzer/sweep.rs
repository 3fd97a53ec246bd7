use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::Chp2xError;
use crate::types::{with_metadata, ComputationOutput};
use crate::Chp2xResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Higher heating value of hydrogen (kJ/mol).
pub const HHV_H2_KJ_PER_MOL: Decimal = dec!(285.8);

/// Lower heating value of hydrogen (kJ/mol).
pub const LHV_H2_KJ_PER_MOL: Decimal = dec!(241.8);

/// Lower heating value of hydrogen (kWh/kg).
pub const LHV_H2_KWH_PER_KG: Decimal = dec!(33.3);

/// Molar mass of H2 (g/mol).
pub const H2_MOLAR_MASS_G_PER_MOL: Decimal = dec!(2.016);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the SCWE temperature sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepInput {
    /// Electrical power fed to the stack (kW)
    pub power_kw: Decimal,
    /// Number of cells in the stack. Recorded with the run's assumptions;
    /// the closed-form energy model does not consume it.
    pub cell_count: u32,
    /// First temperature sample (°C)
    pub temp_min_c: i32,
    /// Last temperature sample (°C), inclusive
    pub temp_max_c: i32,
    /// Sample spacing (°C)
    pub temp_step_c: i32,
}

/// Per-temperature operating record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePoint {
    pub temperature_c: i32,
    /// Electrical energy demand per mole of H2 (kJ/mol), clamped linear in T
    pub electrical_energy_kj_per_mol: Decimal,
    pub hydrogen_kg_per_hour: Decimal,
    /// LHV over electrical energy demand, as a percentage
    pub electrical_efficiency_pct: Decimal,
    /// LHV/HHV ratio, constant across temperatures; repeated per row so a
    /// table render shows it alongside the varying efficiencies
    pub lhv_to_hhv_efficiency_pct: Decimal,
    /// Thermal power absorbed from the heat source (kW)
    pub thermal_power_kw: Decimal,
    /// LHV output power over total (electrical + thermal) input, as a
    /// percentage
    pub total_efficiency_pct: Decimal,
}

/// Collected sweep results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutput {
    pub points: Vec<TemperaturePoint>,
}

/// Lazy iterator over the temperature ladder. Restartable: building it again
/// from the same input yields the same sequence; no state is carried between
/// samples beyond the cursor.
#[derive(Debug, Clone)]
pub struct SweepPoints {
    power_kw: Decimal,
    temp_max_c: i32,
    temp_step_c: i32,
    next_temp_c: i32,
}

impl Iterator for SweepPoints {
    type Item = TemperaturePoint;

    fn next(&mut self) -> Option<TemperaturePoint> {
        if self.next_temp_c > self.temp_max_c {
            return None;
        }
        let point = point_at(self.power_kw, self.next_temp_c);
        self.next_temp_c += self.temp_step_c;
        Some(point)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Lazily iterate the per-temperature records for a sweep.
pub fn sweep_points(input: &SweepInput) -> Chp2xResult<SweepPoints> {
    validate_input(input)?;
    Ok(SweepPoints {
        power_kw: input.power_kw,
        temp_max_c: input.temp_max_c,
        temp_step_c: input.temp_step_c,
        next_temp_c: input.temp_min_c,
    })
}

/// Run the sweep and collect every record. The sequence has
/// `floor((temp_max - temp_min) / temp_step) + 1` entries.
pub fn run_sweep(input: &SweepInput) -> Chp2xResult<ComputationOutput<SweepOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    let points: Vec<TemperaturePoint> = sweep_points(input)?.collect();
    let output = SweepOutput { points };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "SCWE temperature sweep (clamped linear electrical-energy model)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &SweepInput) -> Chp2xResult<()> {
    if input.power_kw <= Decimal::ZERO {
        return Err(Chp2xError::InvalidInput {
            field: "power_kw".into(),
            reason: "Stack power must be positive".into(),
        });
    }
    if input.cell_count == 0 {
        return Err(Chp2xError::InvalidInput {
            field: "cell_count".into(),
            reason: "Stack must have at least one cell".into(),
        });
    }
    if input.temp_step_c <= 0 {
        return Err(Chp2xError::InvalidInput {
            field: "temp_step_c".into(),
            reason: "Temperature step must be positive".into(),
        });
    }
    if input.temp_max_c <= input.temp_min_c {
        return Err(Chp2xError::InvalidInput {
            field: "temp_max_c".into(),
            reason: "Maximum temperature must exceed minimum temperature".into(),
        });
    }

    Ok(())
}

fn point_at(power_kw: Decimal, temperature_c: i32) -> TemperaturePoint {
    let t = Decimal::from(temperature_c);

    // Linear in T around the 700 °C anchor, clamped at the 160 kJ/mol floor
    let electrical_energy = (dec!(190) - (t - dec!(700)) * dec!(0.1)).max(dec!(160));

    let mol_per_second = power_kw * dec!(1000) / electrical_energy;
    let hydrogen_kg_per_hour = mol_per_second * H2_MOLAR_MASS_G_PER_MOL * dec!(3600) / dec!(1000);

    let electrical_efficiency_pct = LHV_H2_KJ_PER_MOL / electrical_energy * dec!(100);
    let lhv_to_hhv_efficiency_pct = LHV_H2_KJ_PER_MOL / HHV_H2_KJ_PER_MOL * dec!(100);

    let thermal_energy = HHV_H2_KJ_PER_MOL - electrical_energy;
    let thermal_power_kw = mol_per_second * thermal_energy / dec!(1000);

    let output_kw = hydrogen_kg_per_hour * LHV_H2_KWH_PER_KG;
    let total_efficiency_pct = dec!(100) * output_kw / (power_kw + thermal_power_kw);

    TemperaturePoint {
        temperature_c,
        electrical_energy_kj_per_mol: electrical_energy,
        hydrogen_kg_per_hour,
        electrical_efficiency_pct,
        lhv_to_hhv_efficiency_pct,
        thermal_power_kw,
        total_efficiency_pct,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> SweepInput {
        SweepInput {
            power_kw: dec!(6.8),
            cell_count: 40,
            temp_min_c: 250,
            temp_max_c: 750,
            temp_step_c: 50,
        }
    }

    #[test]
    fn test_sequence_length_and_ladder() {
        let result = run_sweep(&sample_input()).unwrap();
        let points = &result.result.points;

        // floor((750 - 250) / 50) + 1 = 11
        assert_eq!(points.len(), 11);
        assert_eq!(points[0].temperature_c, 250);
        assert_eq!(points[10].temperature_c, 750);
        for window in points.windows(2) {
            assert_eq!(window[1].temperature_c - window[0].temperature_c, 50);
        }
    }

    #[test]
    fn test_anchor_temperature_energy_demand() {
        let result = run_sweep(&sample_input()).unwrap();
        let at_700 = result
            .result
            .points
            .iter()
            .find(|p| p.temperature_c == 700)
            .unwrap();

        // max(190 - 0, 160) = 190 kJ/mol
        assert_eq!(at_700.electrical_energy_kj_per_mol, dec!(190));
        // 6800 / 190 mol/s -> kg/h via 2.016 g/mol
        assert!((at_700.hydrogen_kg_per_hour - dec!(259.7457)).abs() < dec!(0.001));
        // 241.8 / 190 * 100 ≈ 127.26%
        assert!((at_700.electrical_efficiency_pct - dec!(127.2632)).abs() < dec!(0.001));
        // 6800/190 * (285.8 - 190) / 1000 ≈ 3.4286 kW
        assert!((at_700.thermal_power_kw - dec!(3.4286)).abs() < dec!(0.001));
    }

    #[test]
    fn test_energy_demand_rises_below_anchor() {
        let result = run_sweep(&sample_input()).unwrap();
        let points = &result.result.points;

        // 190 - (250 - 700) * 0.1 = 235 kJ/mol at the cold end
        assert_eq!(points[0].electrical_energy_kj_per_mol, dec!(235));
        // Energy demand is strictly decreasing with temperature here
        for window in points.windows(2) {
            assert!(
                window[1].electrical_energy_kj_per_mol < window[0].electrical_energy_kj_per_mol
            );
        }
    }

    #[test]
    fn test_floor_clamp_far_above_anchor() {
        // The floor binds at 1000 °C and beyond
        let point = point_at(dec!(6.8), 1000);
        assert_eq!(point.electrical_energy_kj_per_mol, dec!(160));
        let beyond = point_at(dec!(6.8), 1100);
        assert_eq!(beyond.electrical_energy_kj_per_mol, dec!(160));
    }

    #[test]
    fn test_lhv_to_hhv_ratio_constant() {
        let result = run_sweep(&sample_input()).unwrap();
        let expected = LHV_H2_KJ_PER_MOL / HHV_H2_KJ_PER_MOL * dec!(100);
        for point in &result.result.points {
            assert_eq!(point.lhv_to_hhv_efficiency_pct, expected);
        }
    }

    #[test]
    fn test_iterator_is_restartable() {
        let input = sample_input();
        let first: Vec<TemperaturePoint> = sweep_points(&input).unwrap().collect();
        let second: Vec<TemperaturePoint> = sweep_points(&input).unwrap().collect();
        assert_eq!(first, second);

        let collected = run_sweep(&input).unwrap();
        assert_eq!(first, collected.result.points);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut input = sample_input();
        input.temp_max_c = 250;
        assert!(run_sweep(&input).is_err());
    }

    #[test]
    fn test_nonpositive_step_rejected() {
        let mut input = sample_input();
        input.temp_step_c = 0;
        assert!(sweep_points(&input).is_err());
    }

    #[test]
    fn test_step_larger_than_range_yields_single_point() {
        let mut input = sample_input();
        input.temp_step_c = 100;
        input.temp_max_c = 300;

        let result = run_sweep(&input).unwrap();
        assert_eq!(result.result.points.len(), 1);
        assert_eq!(result.result.points[0].temperature_c, 250);
    }
}
