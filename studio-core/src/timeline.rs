//! Timeline scheduler for the video surface.
//!
//! Clips live on a horizontal time axis with a fixed pixels-per-second
//! scale. Clip sessions compute every move from the values captured at
//! session start, so a long drag never accumulates rounding error.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::element::{clamp_duration, clamp_start};
use crate::event::Point;
use crate::{Clip, ElementId, ElementPatch};

/// Default horizontal scale of the timeline.
pub const DEFAULT_PIXELS_PER_SECOND: f64 = 100.0;

/// Default span after which the playhead wraps to zero, in seconds.
pub const DEFAULT_TIMELINE_SPAN_SECS: f64 = 60.0;

/// Mapping between seconds and timeline pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineScale {
    /// Width of one second in pixels.
    pub pixels_per_second: f64,
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self {
            pixels_per_second: DEFAULT_PIXELS_PER_SECOND,
        }
    }
}

impl TimelineScale {
    /// Scale with the given pixels per second; non-positive values fall back
    /// to the default.
    #[must_use]
    pub fn new(pixels_per_second: f64) -> Self {
        if pixels_per_second.is_finite() && pixels_per_second > 0.0 {
            Self { pixels_per_second }
        } else {
            Self::default()
        }
    }

    /// Seconds to pixels.
    #[must_use]
    pub fn time_to_px(&self, seconds: f64) -> f64 {
        seconds * self.pixels_per_second
    }

    /// Pixels to seconds.
    #[must_use]
    pub fn px_to_time(&self, px: f64) -> f64 {
        px / self.pixels_per_second
    }

    /// Left offset and width of a clip's bar, in pixels.
    #[must_use]
    pub fn clip_span(&self, clip: &Clip) -> (f64, f64) {
        (self.time_to_px(clip.start_time), self.time_to_px(clip.duration))
    }
}

/// Which edge of a clip is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipEdge {
    /// The start edge.
    Left,
    /// The end edge.
    Right,
}

/// Moves a clip along the time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipDragSession {
    id: ElementId,
    origin_x: f32,
    start: f64,
    scale: TimelineScale,
}

impl ClipDragSession {
    /// Start moving `clip` from pointer `pointer`.
    #[must_use]
    pub fn begin(id: ElementId, clip: &Clip, pointer: Point, scale: TimelineScale) -> Self {
        Self {
            id,
            origin_x: pointer.x,
            start: clip.start_time,
            scale,
        }
    }

    /// The moved element.
    #[must_use]
    pub const fn element_id(&self) -> ElementId {
        self.id
    }

    /// New start time, never before zero and without an upper bound.
    #[must_use]
    pub fn on_move(&self, pointer: Point) -> ElementPatch {
        let dt = self.scale.px_to_time(f64::from(pointer.x - self.origin_x));
        ElementPatch {
            start_time: Some(clamp_start(self.start + dt)),
            ..ElementPatch::default()
        }
    }
}

/// Trims or extends a clip from one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipResizeSession {
    id: ElementId,
    edge: ClipEdge,
    origin_x: f32,
    start: f64,
    duration: f64,
    max_duration: Option<f64>,
    scale: TimelineScale,
}

impl ClipResizeSession {
    /// Start resizing `clip` from `edge`.
    ///
    /// With `cap_to_media` set and a known media length, the duration never
    /// grows past the media.
    #[must_use]
    pub fn begin(
        id: ElementId,
        clip: &Clip,
        edge: ClipEdge,
        pointer: Point,
        scale: TimelineScale,
        cap_to_media: bool,
    ) -> Self {
        Self {
            id,
            edge,
            origin_x: pointer.x,
            start: clip.start_time,
            duration: clip.duration,
            max_duration: clip.media_duration.filter(|_| cap_to_media),
            scale,
        }
    }

    /// The resized element.
    #[must_use]
    pub const fn element_id(&self) -> ElementId {
        self.id
    }

    /// The dragged edge.
    #[must_use]
    pub const fn edge(&self) -> ClipEdge {
        self.edge
    }

    /// New timing for the pointer at `pointer`.
    ///
    /// Left edge: start and duration move together, each clamped on its own
    /// (`start >= 0`, `duration >= 0.5`). When the media cap stops the
    /// duration, the start is pinned so the right edge stays put. Right edge:
    /// only the duration changes.
    #[must_use]
    pub fn on_move(&self, pointer: Point) -> ElementPatch {
        let dt = self.scale.px_to_time(f64::from(pointer.x - self.origin_x));
        match self.edge {
            ClipEdge::Left => {
                let wanted = self.duration - dt;
                let duration = self.cap(wanted);
                let start = if self.max_duration.is_some_and(|max| wanted > max) {
                    self.start + self.duration - duration
                } else {
                    self.start + dt
                };
                ElementPatch {
                    start_time: Some(clamp_start(start)),
                    duration: Some(duration),
                    ..ElementPatch::default()
                }
            }
            ClipEdge::Right => ElementPatch {
                duration: Some(self.cap(self.duration + dt)),
                ..ElementPatch::default()
            },
        }
    }

    fn cap(&self, duration: f64) -> f64 {
        let duration = self.max_duration.map_or(duration, |max| duration.min(max));
        clamp_duration(duration)
    }
}

/// Presentational playhead. Advancing it never touches elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playhead {
    position: f64,
    playing: bool,
    span: f64,
}

impl Default for Playhead {
    fn default() -> Self {
        Self::new(DEFAULT_TIMELINE_SPAN_SECS)
    }
}

impl Playhead {
    /// Stopped playhead at zero that wraps after `span` seconds.
    #[must_use]
    pub fn new(span: f64) -> Self {
        let span = if span.is_finite() && span > 0.0 {
            span
        } else {
            DEFAULT_TIMELINE_SPAN_SECS
        };
        Self {
            position: 0.0,
            playing: false,
            span,
        }
    }

    /// Current position in seconds.
    #[must_use]
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Whether the playhead is advancing.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Wrap-around span in seconds.
    #[must_use]
    pub const fn span(&self) -> f64 {
        self.span
    }

    /// Start advancing.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stop advancing.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Flip between playing and paused.
    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// Jump to `seconds`, wrapped into the span.
    pub fn seek(&mut self, seconds: f64) {
        self.position = if seconds.is_finite() {
            seconds.rem_euclid(self.span)
        } else {
            0.0
        };
    }

    /// Advance by wall-clock `elapsed` while playing.
    pub fn tick(&mut self, elapsed: Duration) {
        if self.playing {
            self.seek(self.position + elapsed.as_secs_f64());
        }
    }

    /// Advance by a frame delta in milliseconds. Negative, non-finite and
    /// out-of-range deltas are ignored.
    pub fn tick_millis(&mut self, millis: f64) {
        if millis > 0.0 {
            if let Ok(elapsed) = Duration::try_from_secs_f64(millis / 1000.0) {
                self.tick(elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn px(seconds: f64) -> Point {
        #[allow(clippy::cast_possible_truncation)]
        Point::new((seconds * DEFAULT_PIXELS_PER_SECOND) as f32, 0.0)
    }

    fn resize(edge: ClipEdge, dt: f64) -> ElementPatch {
        let clip = Clip::new(2.0, 5.0);
        let session = ClipResizeSession::begin(
            ElementId::new(),
            &clip,
            edge,
            px(0.0),
            TimelineScale::default(),
            false,
        );
        session.on_move(px(dt))
    }

    #[test]
    fn test_left_edge_extends_backwards() {
        let patch = resize(ClipEdge::Left, -1.0);
        assert!(close(patch.start_time.expect("start"), 1.0));
        assert!(close(patch.duration.expect("duration"), 6.0));
    }

    #[test]
    fn test_left_edge_past_end_clamps_each_field() {
        let patch = resize(ClipEdge::Left, 6.0);
        assert!(close(patch.start_time.expect("start"), 8.0));
        assert!(close(patch.duration.expect("duration"), 0.5));
    }

    #[test]
    fn test_left_edge_before_zero() {
        let patch = resize(ClipEdge::Left, -3.0);
        assert!(close(patch.start_time.expect("start"), 0.0));
        assert!(close(patch.duration.expect("duration"), 8.0));
    }

    #[test]
    fn test_right_edge_floor() {
        let patch = resize(ClipEdge::Right, -10.0);
        assert!(patch.start_time.is_none());
        assert!(close(patch.duration.expect("duration"), 0.5));
    }

    #[test]
    fn test_right_edge_uncapped_by_default() {
        let mut clip = Clip::new(0.0, 5.0);
        clip.media_duration = Some(6.0);
        let session = ClipResizeSession::begin(
            ElementId::new(),
            &clip,
            ClipEdge::Right,
            px(0.0),
            TimelineScale::default(),
            false,
        );
        assert!(close(session.on_move(px(4.0)).duration.expect("d"), 9.0));

        let capped = ClipResizeSession::begin(
            ElementId::new(),
            &clip,
            ClipEdge::Right,
            px(0.0),
            TimelineScale::default(),
            true,
        );
        assert!(close(capped.on_move(px(4.0)).duration.expect("d"), 6.0));
    }

    #[test]
    fn test_capped_left_edge_keeps_right_edge() {
        let mut clip = Clip::new(2.0, 5.0);
        clip.media_duration = Some(6.0);
        let capped = ClipResizeSession::begin(
            ElementId::new(),
            &clip,
            ClipEdge::Left,
            px(0.0),
            TimelineScale::default(),
            true,
        );
        let patch = capped.on_move(px(-2.0));
        let start = patch.start_time.expect("start");
        let duration = patch.duration.expect("d");
        assert!(close(start, 1.0));
        assert!(close(duration, 6.0));
        assert!(close(start + duration, 7.0));

        // Below the cap the left edge still tracks the pointer.
        let patch = capped.on_move(px(-0.5));
        assert!(close(patch.start_time.expect("start"), 1.5));
        assert!(close(patch.duration.expect("d"), 5.5));
    }

    #[test]
    fn test_clip_drag_from_session_start() {
        let clip = Clip::new(2.0, 5.0);
        let session =
            ClipDragSession::begin(ElementId::new(), &clip, px(1.0), TimelineScale::default());
        assert!(close(session.on_move(px(4.5)).start_time.expect("s"), 5.5));
        // Past zero clamps, and coming back is exact.
        assert!(close(session.on_move(px(-10.0)).start_time.expect("s"), 0.0));
        assert!(close(session.on_move(px(1.0)).start_time.expect("s"), 2.0));
    }

    #[test]
    fn test_scale_conversions() {
        let scale = TimelineScale::new(50.0);
        assert!(close(scale.time_to_px(2.0), 100.0));
        assert!(close(scale.px_to_time(25.0), 0.5));
        assert_eq!(scale.clip_span(&Clip::new(1.0, 2.0)), (50.0, 100.0));
        assert_eq!(TimelineScale::new(-1.0), TimelineScale::default());
    }

    #[test]
    fn test_playhead_wraps() {
        let mut playhead = Playhead::new(10.0);
        playhead.tick(Duration::from_secs(3));
        assert!(close(playhead.position(), 0.0));

        playhead.play();
        playhead.tick(Duration::from_secs(8));
        playhead.tick(Duration::from_secs(3));
        assert!(close(playhead.position(), 1.0));

        playhead.toggle();
        assert!(!playhead.is_playing());
        playhead.seek(-2.0);
        assert!(close(playhead.position(), 8.0));
    }

    #[test]
    fn test_tick_millis_ignores_unusable_deltas() {
        let mut playhead = Playhead::new(10.0);
        playhead.play();
        playhead.tick_millis(1500.0);
        assert!(close(playhead.position(), 1.5));

        for millis in [0.0, -5.0, f64::NAN, f64::INFINITY, 1e30] {
            playhead.tick_millis(millis);
        }
        assert!(close(playhead.position(), 1.5));
    }
}
