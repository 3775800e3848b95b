use crate::{
    bitgen::{BitGenerator, BitSource},
    error::{SeedwalkError, SeedwalkResult},
    seed::Seed,
};

/// Stop-condition target for the planning walk. The reference aspect is
/// 1.6 : 1 with a vertical extent of 1500.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TargetSize {
    pub width: i64,
    pub height: i64,
}

pub const DEFAULT_TARGET: TargetSize = TargetSize {
    width: 2400,
    height: 1500,
};

impl TargetSize {
    pub fn new(width: i64, height: i64) -> SeedwalkResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(SeedwalkError::validation(
                "target width/height must be positive",
            ));
        }
        Ok(Self { width, height })
    }
}

/// One unit step on the lattice, drawn from exactly 2 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    East,
    West,
    North,
    South,
}

impl Direction {
    /// Fixed bit-pair mapping: (0,0)→East, (0,1)→West, (1,0)→North,
    /// (1,1)→South. Draw order (first bit, second bit) is part of the
    /// stream contract.
    pub fn draw(bits: &mut impl BitSource) -> Self {
        let a = bits.next_bit();
        let b = bits.next_bit();
        match (a, b) {
            (0, 0) => Self::East,
            (0, 1) => Self::West,
            (1, 0) => Self::North,
            _ => Self::South,
        }
    }

    pub fn delta(self) -> (i64, i64) {
        match self {
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::North => (0, 1),
            Self::South => (0, -1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// Axis-aligned bounding box over lattice points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl Bounds {
    /// Zero box at the origin, matching the planner's initial state.
    pub fn at_origin() -> Self {
        Self {
            min_x: 0,
            max_x: 0,
            min_y: 0,
            max_y: 0,
        }
    }

    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn x_range(&self) -> i64 {
        self.max_x - self.min_x
    }

    pub fn y_range(&self) -> i64 {
        self.max_y - self.min_y
    }

    pub fn center_x(&self) -> f64 {
        (self.min_x + self.max_x) as f64 / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (self.min_y + self.max_y) as f64 / 2.0
    }
}

/// Sizing-pass result: how many steps the walk took before the bounding-box
/// stop condition fired, and whether the axes must be swapped at
/// materialization so the rendered extent is wider than tall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlanResult {
    pub step_count: u64,
    pub flipped: bool,
}

/// Sizing pass: walks a fresh bitstream until the larger bounding-box axis
/// reaches `target.width` or the smaller reaches `target.height`.
///
/// The walk itself is discarded; [`WalkPath::extend`] re-derives it from a
/// fresh generator over the same seed. The two-phase split exists because
/// multi-seed composition needs every segment's `flipped` flag resolved
/// before any segment is materialized.
pub fn plan(seed: &Seed, target: TargetSize) -> PlanResult {
    let mut bits = BitGenerator::new(seed);
    plan_from(&mut bits, target)
}

pub(crate) fn plan_from(bits: &mut impl BitSource, target: TargetSize) -> PlanResult {
    let mut pos = Point { x: 0, y: 0 };
    let mut bounds = Bounds::at_origin();
    let mut step_count: u64 = 0;

    loop {
        let (dx, dy) = Direction::draw(bits).delta();
        pos.x += dx;
        pos.y += dy;
        step_count += 1;
        bounds.include(pos);

        // Evaluated only after a step; the zero box never terminates.
        let (xr, yr) = (bounds.x_range(), bounds.y_range());
        let longer = xr.max(yr);
        let shorter = xr.min(yr);
        if longer >= target.width || shorter >= target.height {
            return PlanResult {
                step_count,
                flipped: xr < yr,
            };
        }
    }
}

/// Ordered lattice positions, starting at the origin. Read-only once built;
/// segments from several seeds extend one shared path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkPath {
    vertices: Vec<Point>,
}

impl WalkPath {
    pub fn new() -> Self {
        Self {
            vertices: vec![Point { x: 0, y: 0 }],
        }
    }

    /// Materialization pass: replays exactly `plan.step_count` draws from a
    /// fresh generator over `seed`, continuing from the current final
    /// vertex. A flipped segment swaps which axis each delta lands on.
    pub fn extend(&mut self, seed: &Seed, plan: PlanResult) {
        let mut bits = BitGenerator::new(seed);
        self.extend_from(&mut bits, plan);
    }

    pub(crate) fn extend_from(&mut self, bits: &mut impl BitSource, plan: PlanResult) {
        let mut pos = *self
            .vertices
            .last()
            .unwrap_or(&Point { x: 0, y: 0 });
        self.vertices.reserve(plan.step_count as usize);
        for _ in 0..plan.step_count {
            let (dx, dy) = Direction::draw(bits).delta();
            let (dx, dy) = if plan.flipped { (dy, dx) } else { (dx, dy) };
            pos.x += dx;
            pos.y += dy;
            self.vertices.push(pos);
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Vertex count (steps + 1).
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::at_origin();
        for &p in &self.vertices {
            bounds.include(p);
        }
        bounds
    }
}

impl Default for WalkPath {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitgen::testutil::ScriptedBits;

    fn seed(s: &str) -> Seed {
        Seed::from_hex(s).unwrap()
    }

    #[test]
    fn direction_mapping_is_fixed() {
        let mut bits = ScriptedBits::new(&[0, 0, 0, 1, 1, 0, 1, 1]);
        assert_eq!(Direction::draw(&mut bits), Direction::East);
        assert_eq!(Direction::draw(&mut bits), Direction::West);
        assert_eq!(Direction::draw(&mut bits), Direction::North);
        assert_eq!(Direction::draw(&mut bits), Direction::South);
    }

    #[test]
    fn all_east_terminates_on_the_longer_axis() {
        // Every draw is East: x_range grows by one per step, y_range stays
        // zero, so the walk stops exactly when x_range hits the width.
        let target = TargetSize::new(16, 10).unwrap();
        let mut bits = ScriptedBits::cycle(&[0, 0], 2 * 16);
        let plan = plan_from(&mut bits, target);
        assert_eq!(plan.step_count, 16);
        assert!(!plan.flipped);
    }

    #[test]
    fn all_north_terminates_flipped() {
        // Every draw is North: the vertical axis is the longer one, so the
        // same width threshold fires and the plan reports a flip.
        let target = TargetSize::new(16, 10).unwrap();
        let mut bits = ScriptedBits::cycle(&[1, 0], 2 * 16);
        let plan = plan_from(&mut bits, target);
        assert_eq!(plan.step_count, 16);
        assert!(plan.flipped);
    }

    #[test]
    fn shorter_axis_threshold_also_terminates() {
        // Cycle East, East, North: after k cycles the box is 2k × k. With a
        // narrow width target the longer axis hits 16 mid-cycle at step 23.
        let target = TargetSize::new(16, 10).unwrap();
        let mut bits = ScriptedBits::cycle(&[0, 0, 0, 0, 1, 0], 6 * 16);
        let plan = plan_from(&mut bits, target);
        assert_eq!(plan.step_count, 23);
        assert!(!plan.flipped);

        // With a wide width target the shorter-axis rule fires instead:
        // y_range reaches 10 at step 30 (x_range 20 < 64).
        let target = TargetSize::new(64, 10).unwrap();
        let mut bits = ScriptedBits::cycle(&[0, 0, 0, 0, 1, 0], 6 * 64);
        let plan = plan_from(&mut bits, target);
        assert_eq!(plan.step_count, 30);
        assert!(!plan.flipped);
    }

    #[test]
    fn plan_fixtures_small_target() {
        let target = TargetSize::new(16, 10).unwrap();
        assert_eq!(
            plan(&seed("0x01"), target),
            PlanResult {
                step_count: 72,
                flipped: false
            }
        );
        assert_eq!(
            plan(&seed("0x02"), target),
            PlanResult {
                step_count: 123,
                flipped: false
            }
        );
        assert_eq!(
            plan(&seed("0x04"), target),
            PlanResult {
                step_count: 330,
                flipped: true
            }
        );
    }

    #[test]
    fn plan_is_deterministic() {
        let target = TargetSize::new(16, 10).unwrap();
        let s = seed("0xdeadbeef");
        assert_eq!(plan(&s, target), plan(&s, target));
    }

    #[test]
    fn build_prefix_matches_reference() {
        let mut path = WalkPath::new();
        path.extend(
            &seed("0x01"),
            PlanResult {
                step_count: 8,
                flipped: false,
            },
        );
        let expected = [
            (0, 0),
            (0, -1),
            (0, 0),
            (-1, 0),
            (-1, 1),
            (-2, 1),
            (-3, 1),
            (-3, 0),
            (-3, -1),
        ];
        let got: Vec<(i64, i64)> = path.vertices().iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn flipped_build_swaps_axes() {
        let target = TargetSize::new(16, 10).unwrap();
        let s = seed("0x04");
        let p = plan(&s, target);
        assert!(p.flipped);

        let mut path = WalkPath::new();
        path.extend(&s, p);
        let head: Vec<(i64, i64)> = path.vertices()[..5].iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(head, [(0, 0), (-1, 0), (-2, 0), (-2, -1), (-2, -2)]);
        let last = *path.vertices().last().unwrap();
        assert_eq!((last.x, last.y), (-3, 1));

        // After the flip the rendered extent is wider than tall.
        let b = path.bounds();
        assert!(b.x_range() >= b.y_range());
        assert_eq!((b.x_range(), b.y_range()), (15, 10));
    }

    #[test]
    fn multi_seed_segments_concatenate() {
        let target = TargetSize::new(16, 10).unwrap();
        let seeds = [seed("0x01"), seed("0x02")];
        let mut path = WalkPath::new();
        for s in &seeds {
            let p = plan(s, target);
            path.extend(s, p);
        }
        assert_eq!(path.len(), 196); // 1 + 72 + 123
        let last = *path.vertices().last().unwrap();
        assert_eq!((last.x, last.y), (9, -2));
        assert_eq!(path.vertices()[0], Point { x: 0, y: 0 });
    }

    #[test]
    fn build_is_deterministic() {
        let target = TargetSize::new(16, 10).unwrap();
        let s = seed("0x02");
        let p = plan(&s, target);
        let mut a = WalkPath::new();
        a.extend(&s, p);
        let mut b = WalkPath::new();
        b.extend(&s, p);
        assert_eq!(a, b);
    }
}
