// Shared fixtures for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use rain_hazard_service::hazard::models::{GridPoint, HazardRecord};
use rain_hazard_service::hazard::CellSeries;
use rain_hazard_service::matrix::{HazardMatrix, DEFAULT_GRID_STEP};

pub const START_YEAR: i32 = 1981;
pub const END_YEAR: i32 = 2020;
pub const YEARS: usize = 40;
pub const DAYS: usize = 365;

/// Steady 5 mm/day, no extremes and no droughts
pub const CELL_A: GridPoint = GridPoint { lat: 20.0, lon: 75.0 };
/// Steady rain with a single 300 mm day in the first year
pub const CELL_B: GridPoint = GridPoint { lat: 20.0, lon: 75.5 };
/// Steady rain with one completely dry year at the end
pub const CELL_C: GridPoint = GridPoint { lat: 20.0, lon: 76.0 };
/// Only present in the first ten extracts
pub const CELL_SHORT: GridPoint = GridPoint { lat: 20.0, lon: 76.5 };
/// Every day is the -999 fill value
pub const CELL_MASKED: GridPoint = GridPoint { lat: 20.5, lon: 75.0 };

pub fn steady_year() -> Vec<f32> {
    vec![5.0; DAYS]
}

/// One year of daily values for a cell, `year_index` counted from 0
pub fn year_values(cell: GridPoint, year_index: usize) -> Option<Vec<f32>> {
    let mut values = steady_year();
    if cell == CELL_B && year_index == 0 {
        values[10] = 300.0;
    } else if cell == CELL_C && year_index == YEARS - 1 {
        values = vec![0.0; DAYS];
    } else if cell == CELL_SHORT && year_index >= 10 {
        return None;
    } else if cell == CELL_MASKED {
        values = vec![-999.0; DAYS];
    }
    Some(values)
}

pub fn scenario_cells() -> Vec<GridPoint> {
    vec![CELL_A, CELL_B, CELL_C, CELL_SHORT, CELL_MASKED]
}

/// Full series for the retained scenario cells, as the assembler would build them
pub fn scenario_series() -> Vec<CellSeries> {
    [CELL_A, CELL_B, CELL_C]
        .into_iter()
        .map(|point| CellSeries {
            point,
            daily: (0..YEARS)
                .filter_map(|year| year_values(point, year))
                .flatten()
                .collect(),
        })
        .collect()
}

/// Write one wide CSV extract
pub fn write_extract(path: &Path, rows: &[(GridPoint, Vec<f32>)]) {
    let day_count = rows.first().map(|(_, v)| v.len()).unwrap_or(0);
    let mut contents = String::from("LAT,LON");
    for day in 1..=day_count {
        contents.push_str(&format!(",D{day:03}"));
    }
    contents.push('\n');
    for (point, values) in rows {
        contents.push_str(&format!("{},{}", point.lat, point.lon));
        for value in values {
            contents.push_str(&format!(",{value}"));
        }
        contents.push('\n');
    }
    fs::write(path, contents).expect("Failed to write extract");
}

/// One extract per year, named so lexical order is chronological
pub fn write_scenario_extracts(dir: &Path) {
    for year_index in 0..YEARS {
        let rows: Vec<(GridPoint, Vec<f32>)> = scenario_cells()
            .into_iter()
            .filter_map(|cell| year_values(cell, year_index).map(|values| (cell, values)))
            .collect();
        let year = START_YEAR + year_index as i32;
        write_extract(&dir.join(format!("RF25_ind{year}_rfp25.csv")), &rows);
    }
}

pub const LONG_START_YEAR: i32 = 1910;
pub const LONG_END_YEAR: i32 = 2023;
pub const LONG_YEARS: usize = 114;

/// Deterministic rain with scattered extremes and occasional dry years, varied per cell
pub fn varied_year(cell_index: usize, year_index: usize) -> Vec<f32> {
    let dry = (year_index + cell_index * 5) % 19 == 0;
    (0..DAYS)
        .map(|day| {
            let seed = cell_index * 7919 + year_index * 104_729 + day * 31;
            let rain = if seed % 997 < 3 {
                100.3 + (seed % 140) as f32
            } else {
                (seed % 23) as f32 * 0.5
            };
            if dry {
                rain * 0.25
            } else {
                rain
            }
        })
        .collect()
}

/// `cells` cells along latitude 21.0, one extract per year for 1910-2023
pub fn write_varied_extracts(dir: &Path, cells: usize) {
    for year_index in 0..LONG_YEARS {
        let rows: Vec<(GridPoint, Vec<f32>)> = (0..cells)
            .map(|cell| {
                (
                    GridPoint::new(21.0, 70.0 + cell as f64 * 0.5),
                    varied_year(cell, year_index),
                )
            })
            .collect();
        let year = LONG_START_YEAR + year_index as i32;
        write_extract(&dir.join(format!("RF25_ind{year}_rfp25.csv")), &rows);
    }
}

pub fn sample_record(lat: f64, lon: f64, composite_hazard: f64) -> HazardRecord {
    HazardRecord {
        lat,
        lon,
        er100: 0.0012,
        er150: 0.0003,
        er_prob: 0.0008,
        rp10: 142.5,
        rp20: 171.25,
        rp50: 210.0,
        rp100: 236.4,
        rp_avg: 190.04,
        rp_prob: 0.5123,
        p_d1: 0.15,
        p_d2: 0.075,
        p_d3: 0.025,
        p_d4: 0.0,
        drought_prob: 0.0625,
        composite_hazard,
    }
}

/// Small matrix around Pune and Chennai, plus one cell stored in 0-360 longitude
pub fn sample_matrix() -> HazardMatrix {
    HazardMatrix::from_records(
        vec![
            sample_record(18.5, 73.5, 0.3456),
            sample_record(18.5, 74.0, 0.1),
            sample_record(13.0, 80.5, 0.6),
            sample_record(40.5, 286.0, 0.25),
        ],
        DEFAULT_GRID_STEP,
    )
    .expect("Failed to build matrix")
}
