// Domain rules - Edit guards and clamping policies

/// Minimum permitted clip length in seconds
pub const MIN_CLIP_LENGTH: f64 = 0.1;

/// Minimum distance of a split point from either clip edge, in seconds
pub const SPLIT_GUARD_BAND: f64 = 0.1;

/// Clamping of interactive trim requests
pub struct BoundsClamp;

impl BoundsClamp {
    /// Resolve requested bounds against the current ones
    ///
    /// Never fails: out-of-range or non-finite requests are clamped or ignored.
    /// The result always satisfies `0 <= start < end <= source_duration`.
    pub fn resolve(
        start: f64,
        end: f64,
        source_duration: f64,
        new_start: Option<f64>,
        new_end: Option<f64>,
    ) -> (f64, f64) {
        let new_start = new_start.filter(|value| value.is_finite());
        let new_end = new_end.filter(|value| value.is_finite());

        // A source shorter than the minimum length cannot honour it.
        let min_len = MIN_CLIP_LENGTH.min(source_duration);

        let (old_start, old_end) = (start, end);

        let end = match new_end {
            Some(requested) => {
                let floor = match new_start {
                    Some(_) => min_len,
                    None => start + min_len,
                };
                requested.max(floor).min(source_duration)
            }
            None => end,
        };

        let start = match new_start {
            Some(requested) => requested.min(end - min_len).max(0.0),
            None => start,
        };

        // On huge sources the guard band can vanish below float precision.
        if start < end {
            (start, end)
        } else {
            (old_start, old_end)
        }
    }
}

/// Guard band policy for splitting
pub struct SplitRule;

impl SplitRule {
    /// Absolute source time for a split at `relative` seconds into the clip,
    /// or `None` when the cut would leave a degenerate part
    pub fn split_point(start: f64, end: f64, relative: f64) -> Option<f64> {
        if !relative.is_finite() {
            return None;
        }

        let absolute = start + relative;
        if absolute <= start + SPLIT_GUARD_BAND || absolute >= end - SPLIT_GUARD_BAND {
            return None;
        }

        Some(absolute)
    }
}

/// Index validation for timeline reordering
pub struct ReorderRule;

impl ReorderRule {
    pub fn is_valid(len: usize, from: usize, to: usize) -> bool {
        from < len && to < len
    }
}

/// Playback cursor policy
pub struct CursorRule;

impl CursorRule {
    /// Clamp a cursor into `[0, duration]`; non-finite input maps to 0
    pub fn clamp(time: f64, duration: f64) -> f64 {
        if !time.is_finite() {
            return 0.0;
        }
        time.max(0.0).min(duration.max(0.0))
    }
}
