//! Range-indexed ballistics lookup tables
//!
//! Each goal tier has its own table of `(range, tilt, top speed, bottom
//! speed)` rows measured on the real mechanism. Lookups interpolate
//! linearly between neighbouring breakpoints and clamp to the end rows
//! outside the table.
//!
//! Breakpoints must be non-decreasing. Two equal breakpoints form a step:
//! the lookup switches to the later row exactly at that range and never
//! divides by the zero-width interval. The built-in tables end with a row
//! just past their last calibrated range whose speeds are zero, so an
//! out-of-range target can never produce a "ready" shot.

use core::f32::consts::PI;

use heapless::Vec;

use super::goal::GoalHeight;

/// Maximum rows per table
pub const MAX_TABLE_ROWS: usize = 16;

/// One calibrated breakpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableRow {
    /// Planar distance from turret pivot to target (m)
    pub range: f32,
    /// Shooter tilt (rad)
    pub tilt: f32,
    /// Top flywheel speed (rad/s)
    pub top_speed: f32,
    /// Bottom flywheel speed (rad/s)
    pub bottom_speed: f32,
}

impl TableRow {
    pub const fn new(range: f32, tilt: f32, top_speed: f32, bottom_speed: f32) -> Self {
        Self {
            range,
            tilt,
            top_speed,
            bottom_speed,
        }
    }

    fn lerp(&self, next: &TableRow, t: f32) -> TableRow {
        TableRow {
            range: self.range + (next.range - self.range) * t,
            tilt: self.tilt + (next.tilt - self.tilt) * t,
            top_speed: self.top_speed + (next.top_speed - self.top_speed) * t,
            bottom_speed: self.bottom_speed + (next.bottom_speed - self.bottom_speed) * t,
        }
    }

    fn is_finite(&self) -> bool {
        self.range.is_finite()
            && self.tilt.is_finite()
            && self.top_speed.is_finite()
            && self.bottom_speed.is_finite()
    }
}

/// Rejected table definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// No rows
    Empty,
    /// More than `MAX_TABLE_ROWS` rows
    TooManyRows,
    /// Breakpoint at the given row is smaller than its predecessor
    NotMonotonic(usize),
    /// Row contains NaN or infinity
    NonFinite(usize),
}

impl core::fmt::Display for TableError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TableError::Empty => write!(f, "ballistics table is empty"),
            TableError::TooManyRows => {
                write!(f, "ballistics table exceeds {} rows", MAX_TABLE_ROWS)
            }
            TableError::NotMonotonic(i) => {
                write!(f, "ballistics table range decreases at row {}", i)
            }
            TableError::NonFinite(i) => write!(f, "ballistics table row {} is not finite", i),
        }
    }
}

/// Validated, non-empty table with non-decreasing breakpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct BallisticsTable {
    rows: Vec<TableRow, MAX_TABLE_ROWS>,
}

impl BallisticsTable {
    pub fn new(rows: &[TableRow]) -> Result<Self, TableError> {
        if rows.is_empty() {
            return Err(TableError::Empty);
        }
        let mut out = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            if !row.is_finite() {
                return Err(TableError::NonFinite(i));
            }
            if i > 0 && row.range < rows[i - 1].range {
                return Err(TableError::NotMonotonic(i));
            }
            out.push(*row).map_err(|_| TableError::TooManyRows)?;
        }
        Ok(Self { rows: out })
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Interpolated row at `range`; the returned row's `range` is `range`.
    pub fn lookup(&self, range: f32) -> TableRow {
        let rows = self.rows.as_slice();
        // Non-empty by construction
        let (first, last) = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return TableRow::new(range, 0.0, 0.0, 0.0),
        };

        let mut row = if range.is_nan() || range <= first.range {
            first
        } else if range >= last.range {
            last
        } else {
            let mut result = last;
            for pair in rows.windows(2) {
                let (lo, hi) = (pair[0], pair[1]);
                if lo.range <= range && range < hi.range {
                    let t = (range - lo.range) / (hi.range - lo.range);
                    result = lo.lerp(&hi, t);
                    break;
                }
            }
            result
        };
        row.range = range;
        row
    }
}

const DEG: f32 = PI / 180.0;

const HIGH_ROWS: [TableRow; 5] = [
    TableRow::new(0.0, 45.0 * DEG, 150.0, 250.0),
    TableRow::new(1.0, 35.0 * DEG, 250.0, 350.0),
    TableRow::new(3.0, 32.0 * DEG, 300.0, 400.0),
    TableRow::new(5.0, 30.0 * DEG, 320.0, 420.0),
    TableRow::new(5.01, 30.0 * DEG, 0.0, 0.0),
];

const MID_ROWS: [TableRow; 5] = [
    TableRow::new(0.0, 40.0 * DEG, 120.0, 200.0),
    TableRow::new(1.0, 30.0 * DEG, 200.0, 300.0),
    TableRow::new(3.0, 27.0 * DEG, 240.0, 340.0),
    TableRow::new(5.0, 25.0 * DEG, 260.0, 360.0),
    TableRow::new(5.01, 25.0 * DEG, 0.0, 0.0),
];

const LOW_ROWS: [TableRow; 5] = [
    TableRow::new(0.0, 30.0 * DEG, 80.0, 120.0),
    TableRow::new(1.0, 20.0 * DEG, 150.0, 220.0),
    TableRow::new(3.0, 15.0 * DEG, 190.0, 260.0),
    TableRow::new(5.0, 12.0 * DEG, 210.0, 280.0),
    TableRow::new(5.01, 12.0 * DEG, 0.0, 0.0),
];

/// One table per goal tier.
#[derive(Clone, Debug, PartialEq)]
pub struct BallisticsTables {
    pub high: BallisticsTable,
    pub mid: BallisticsTable,
    pub low: BallisticsTable,
}

impl BallisticsTables {
    pub fn for_height(&self, height: GoalHeight) -> &BallisticsTable {
        match height {
            GoalHeight::High => &self.high,
            GoalHeight::Mid => &self.mid,
            GoalHeight::Low => &self.low,
        }
    }
}

impl Default for BallisticsTables {
    /// Placeholder calibration; replace with measured data per robot.
    fn default() -> Self {
        Self {
            high: builtin(&HIGH_ROWS),
            mid: builtin(&MID_ROWS),
            low: builtin(&LOW_ROWS),
        }
    }
}

fn builtin(rows: &[TableRow]) -> BallisticsTable {
    let mut out = Vec::new();
    for row in rows.iter().take(MAX_TABLE_ROWS) {
        let _ = out.push(*row);
    }
    BallisticsTable { rows: out }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn simple() -> BallisticsTable {
        BallisticsTable::new(&[
            TableRow::new(1.0, 0.5, 100.0, 200.0),
            TableRow::new(3.0, 0.3, 300.0, 400.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert_eq!(BallisticsTable::new(&[]), Err(TableError::Empty));
        assert_eq!(
            BallisticsTable::new(&[
                TableRow::new(2.0, 0.0, 0.0, 0.0),
                TableRow::new(1.0, 0.0, 0.0, 0.0),
            ]),
            Err(TableError::NotMonotonic(1))
        );
        assert_eq!(
            BallisticsTable::new(&[TableRow::new(f32::NAN, 0.0, 0.0, 0.0)]),
            Err(TableError::NonFinite(0))
        );
        let rows = [TableRow::new(0.0, 0.0, 0.0, 0.0); MAX_TABLE_ROWS + 1];
        assert_eq!(BallisticsTable::new(&rows), Err(TableError::TooManyRows));
    }

    #[test]
    fn test_exact_at_breakpoints() {
        let table = simple();
        let row = table.lookup(1.0);
        assert_eq!(row.tilt, 0.5);
        assert_eq!(row.top_speed, 100.0);
        let row = table.lookup(3.0);
        assert_eq!(row.tilt, 0.3);
        assert_eq!(row.bottom_speed, 400.0);
    }

    #[test]
    fn test_linear_between_breakpoints() {
        let table = simple();
        let row = table.lookup(2.0);
        assert!((row.tilt - 0.4).abs() < EPS);
        assert!((row.top_speed - 200.0).abs() < 1e-3);
        assert!((row.bottom_speed - 300.0).abs() < 1e-3);
        assert_eq!(row.range, 2.0);
    }

    #[test]
    fn test_clamps_outside_domain() {
        let table = simple();
        assert_eq!(table.lookup(0.2).top_speed, 100.0);
        assert_eq!(table.lookup(-5.0).tilt, 0.5);
        assert_eq!(table.lookup(9.0).top_speed, 300.0);
        assert_eq!(table.lookup(f32::NAN).top_speed, 100.0);
    }

    #[test]
    fn test_duplicate_breakpoint_is_a_step() {
        let table = BallisticsTable::new(&[
            TableRow::new(0.0, 0.1, 10.0, 10.0),
            TableRow::new(2.0, 0.2, 20.0, 20.0),
            TableRow::new(2.0, 0.2, 0.0, 0.0),
            TableRow::new(4.0, 0.4, 40.0, 40.0),
        ])
        .unwrap();
        let before = table.lookup(1.999);
        assert!(before.top_speed > 19.0);
        let at = table.lookup(2.0);
        assert!(at.top_speed.is_finite());
        assert_eq!(at.top_speed, 0.0);
        let after = table.lookup(3.0);
        assert!((after.top_speed - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_monotonic_interpolation() {
        let table = BallisticsTables::default();
        let mut prev = table.high.lookup(0.0).top_speed;
        let mut r = 0.0;
        while r < 5.0 {
            let speed = table.high.lookup(r).top_speed;
            assert!(speed >= prev - 1e-3);
            prev = speed;
            r += 0.05;
        }
    }

    #[test]
    fn test_default_tables_cut_speed_out_of_range() {
        let tables = BallisticsTables::default();
        for height in [GoalHeight::High, GoalHeight::Mid, GoalHeight::Low] {
            let row = tables.for_height(height).lookup(7.0);
            assert_eq!(row.top_speed, 0.0);
            assert_eq!(row.bottom_speed, 0.0);
            let row = tables.for_height(height).lookup(4.9);
            assert!(row.top_speed > 0.0);
        }
    }

    #[test]
    fn test_default_tables_are_distinct() {
        let tables = BallisticsTables::default();
        assert_ne!(tables.high, tables.mid);
        assert_ne!(tables.mid, tables.low);
    }

    #[test]
    fn test_default_tables_validate() {
        let tables = BallisticsTables::default();
        for height in [GoalHeight::High, GoalHeight::Mid, GoalHeight::Low] {
            let rows = tables.for_height(height).rows();
            assert!(BallisticsTable::new(rows).is_ok());
        }
    }
}
