/// Window half-width, in road widths, for the current corner strategy.
pub const CURRENT_WINDOW_FACTOR: f64 = 5.5;

/// Window half-width, in road widths, for the legacy corner strategy.
pub const LEGACY_WINDOW_FACTOR: f64 = 4.5;

/// Physical distance between edge samples for the current strategy.
pub const CURRENT_SAMPLE_SPACING: f64 = 4.0;

/// Physical distance between edge samples for the legacy strategy.
pub const LEGACY_SAMPLE_SPACING: f64 = 0.1;

/// Legacy corner search: a pair this close settles the slot at once.
pub const LEGACY_SETTLE_DISTANCE: f64 = 0.07;

/// Legacy corner search: a pair this close counts as "found the crossing".
pub const LEGACY_CLOSE_DISTANCE: f64 = 0.2;

/// Legacy corner search: after a close pair, exceeding this stops the slot.
pub const LEGACY_DIVERGE_DISTANCE: f64 = 0.5;

/// Height drop applied to strip vertices fully inside the intersection pad.
pub const PAD_DROP: f64 = 4.0;

/// Strength at or above which a vertex counts as inside the pad.
pub const FULL_STRENGTH_THRESHOLD: f64 = 0.999;

/// Shoulder corners sit this many shoulder widths outside the road edges.
pub const SHOULDER_FACTOR: f64 = 1.75;

/// Ramp corners sit this many shoulder widths outside the road edges.
pub const RAMP_FACTOR: f64 = 2.0;

/// Bounding radius margin over the farthest corner-pair midpoint.
pub const RADIUS_FACTOR: f64 = 1.25;

/// Algorithm used to locate the four intersection corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CornerStrategy {
    /// First segment-segment crossing between the edge polylines.
    #[default]
    Current,
    /// Closest sample pair on densely sampled edges, with early cut-offs.
    Legacy,
}

/// Sampling parameters tied to a corner strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Half-width of the sampling window, as a multiple of road width.
    pub window_factor: f64,
    /// Physical distance between consecutive edge samples.
    pub sample_spacing: f64,
}

/// Distance thresholds of the legacy corner heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacyThresholds {
    pub settle: f64,
    pub close: f64,
    pub diverge: f64,
}

impl Default for LegacyThresholds {
    fn default() -> Self {
        Self {
            settle: LEGACY_SETTLE_DISTANCE,
            close: LEGACY_CLOSE_DISTANCE,
            diverge: LEGACY_DIVERGE_DISTANCE,
        }
    }
}

/// Tunables for the whole intersection pipeline.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionConfig {
    /// Corner algorithm; also selects the sampling parameters.
    pub strategy: CornerStrategy,
    /// Sampling used with [`CornerStrategy::Current`].
    pub current: SamplingParams,
    /// Sampling used with [`CornerStrategy::Legacy`].
    pub legacy: SamplingParams,
    /// Legacy corner heuristic thresholds.
    pub legacy_thresholds: LegacyThresholds,
    /// Orientation match tolerance, in sample spacings.
    pub road_definition: f64,
    /// Strength at or above which strip vertices drop under the pad.
    pub full_strength_threshold: f64,
    /// How far fully covered strip vertices drop.
    pub pad_drop: f64,
    /// Shoulder corner offset, in shoulder widths.
    pub shoulder_factor: f64,
    /// Ramp corner offset, in shoulder widths.
    pub ramp_factor: f64,
    /// Bounding radius margin.
    pub radius_factor: f64,
    /// Fraction of the bounding radius inside which the reference strength is 1.
    pub strength_inner_fraction: f64,
    /// Left/right sample count difference tolerated without a diagnostic.
    pub reconcile_slack: usize,
    /// Search radius when snapping strip ends onto road vertices.
    pub snap_radius: f64,
    /// Parameter distance under which an endpoint counts as sitting on a curve end.
    pub end_epsilon: f64,
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            strategy: CornerStrategy::default(),
            current: SamplingParams {
                window_factor: CURRENT_WINDOW_FACTOR,
                sample_spacing: CURRENT_SAMPLE_SPACING,
            },
            legacy: SamplingParams {
                window_factor: LEGACY_WINDOW_FACTOR,
                sample_spacing: LEGACY_SAMPLE_SPACING,
            },
            legacy_thresholds: LegacyThresholds::default(),
            road_definition: 1.0,
            full_strength_threshold: FULL_STRENGTH_THRESHOLD,
            pad_drop: PAD_DROP,
            shoulder_factor: SHOULDER_FACTOR,
            ramp_factor: RAMP_FACTOR,
            radius_factor: RADIUS_FACTOR,
            strength_inner_fraction: 0.5,
            reconcile_slack: 1,
            snap_radius: 1.0,
            end_epsilon: 1e-4,
        }
    }
}

impl IntersectionConfig {
    /// Returns a default configuration using the given corner strategy.
    #[must_use]
    pub fn with_strategy(strategy: CornerStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Sampling parameters of the active strategy.
    #[must_use]
    pub fn sampling(&self) -> SamplingParams {
        match self.strategy {
            CornerStrategy::Current => self.current,
            CornerStrategy::Legacy => self.legacy,
        }
    }

    /// Distance under which two edge samples are considered to meet.
    #[must_use]
    pub fn match_tolerance(&self) -> f64 {
        self.road_definition * self.sampling().sample_spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_current_strategy() {
        let config = IntersectionConfig::default();
        assert_eq!(config.strategy, CornerStrategy::Current);
        assert!((config.sampling().window_factor - CURRENT_WINDOW_FACTOR).abs() < f64::EPSILON);
        assert!((config.match_tolerance() - CURRENT_SAMPLE_SPACING).abs() < f64::EPSILON);
    }

    #[test]
    fn legacy_strategy_selects_fine_sampling() {
        let config = IntersectionConfig::with_strategy(CornerStrategy::Legacy);
        let sampling = config.sampling();
        assert!((sampling.window_factor - LEGACY_WINDOW_FACTOR).abs() < f64::EPSILON);
        assert!((sampling.sample_spacing - LEGACY_SAMPLE_SPACING).abs() < f64::EPSILON);
    }
}
