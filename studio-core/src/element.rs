//! Canvas elements - the typed objects placed on a page.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest width or height an element can be resized to, in pixels.
pub const MIN_ELEMENT_SIZE: f32 = 20.0;

/// Shortest clip duration on the timeline, in seconds.
pub const MIN_CLIP_DURATION: f64 = 0.5;

/// Duration given to clips created without an explicit one, in seconds.
pub const DEFAULT_CLIP_DURATION: f64 = 5.0;

/// Offset applied to both axes when an element is duplicated.
pub const DUPLICATE_OFFSET: f32 = 20.0;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Primitive outline of a shape element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    #[default]
    Rectangle,
    /// Ellipse inscribed in the bounds.
    Ellipse,
    /// Isosceles triangle pointing up.
    Triangle,
    /// Horizontal line through the vertical center.
    Line,
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementKind {
    /// A block of styled text.
    Text {
        /// Text content.
        content: String,
        /// Font size in pixels.
        font_size: f32,
        /// Font family name.
        font_family: String,
        /// Numeric font weight (100-900).
        font_weight: u16,
        /// Text color as hex.
        color: String,
        /// Horizontal alignment.
        align: TextAlign,
    },

    /// A raster or vector image.
    Image {
        /// Image source URI.
        src: String,
        /// Alternative text.
        alt: String,
    },

    /// A filled and/or stroked primitive.
    Shape {
        /// Outline of the shape.
        shape: ShapeKind,
        /// Fill color as hex.
        fill: String,
        /// Stroke color as hex.
        stroke: String,
        /// Stroke width in pixels.
        stroke_width: f32,
        /// Corner radius for rectangles.
        corner_radius: f32,
    },

    /// A video clip.
    Video {
        /// Video source URI.
        src: String,
        /// Whether the audio track is muted.
        muted: bool,
    },

    /// An audio track with no visual footprint.
    Audio {
        /// Audio source URI.
        src: String,
        /// Playback volume (0.0 to 1.0).
        volume: f32,
    },

    /// A caption: text drawn over a background band.
    Caption {
        /// Caption text.
        content: String,
        /// Font size in pixels.
        font_size: f32,
        /// Text color as hex.
        color: String,
        /// Background color as hex.
        background: String,
    },
}

impl ElementKind {
    /// Default text element.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            font_size: 32.0,
            font_family: "Inter".to_string(),
            font_weight: 400,
            color: "#000000".to_string(),
            align: TextAlign::Left,
        }
    }

    /// Default image element.
    #[must_use]
    pub fn image(src: impl Into<String>) -> Self {
        Self::Image {
            src: src.into(),
            alt: String::new(),
        }
    }

    /// Default shape element.
    #[must_use]
    pub fn shape(shape: ShapeKind) -> Self {
        Self::Shape {
            shape,
            fill: "#3b82f6".to_string(),
            stroke: "#000000".to_string(),
            stroke_width: 0.0,
            corner_radius: 0.0,
        }
    }

    /// Default video element.
    #[must_use]
    pub fn video(src: impl Into<String>) -> Self {
        Self::Video {
            src: src.into(),
            muted: false,
        }
    }

    /// Default audio element.
    #[must_use]
    pub fn audio(src: impl Into<String>) -> Self {
        Self::Audio {
            src: src.into(),
            volume: 1.0,
        }
    }

    /// Default caption element.
    #[must_use]
    pub fn caption(content: impl Into<String>) -> Self {
        Self::Caption {
            content: content.into(),
            font_size: 24.0,
            color: "#ffffff".to_string(),
            background: "#000000aa".to_string(),
        }
    }

    /// The tag of this variant.
    #[must_use]
    pub const fn tag(&self) -> ElementTag {
        match self {
            Self::Text { .. } => ElementTag::Text,
            Self::Image { .. } => ElementTag::Image,
            Self::Shape { .. } => ElementTag::Shape,
            Self::Video { .. } => ElementTag::Video,
            Self::Audio { .. } => ElementTag::Audio,
            Self::Caption { .. } => ElementTag::Caption,
        }
    }

    /// Foreground color of text-bearing variants.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        match self {
            Self::Text { color, .. } | Self::Caption { color, .. } => Some(color),
            _ => None,
        }
    }
}

/// Discriminant of [`ElementKind`], used as the key of per-type dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementTag {
    /// [`ElementKind::Text`].
    Text,
    /// [`ElementKind::Image`].
    Image,
    /// [`ElementKind::Shape`].
    Shape,
    /// [`ElementKind::Video`].
    Video,
    /// [`ElementKind::Audio`].
    Audio,
    /// [`ElementKind::Caption`].
    Caption,
}

/// An editable property exposed by the property inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectorField {
    /// Left edge.
    X,
    /// Top edge.
    Y,
    /// Width.
    Width,
    /// Height.
    Height,
    /// Visibility toggle.
    Visible,
    /// Lock toggle.
    Locked,
    /// Text content.
    Content,
    /// Text color.
    Color,
    /// Font size.
    FontSize,
    /// Font family.
    FontFamily,
    /// Font weight.
    FontWeight,
    /// Text alignment.
    Align,
    /// Shape fill.
    Fill,
    /// Shape stroke.
    Stroke,
    /// Shape stroke width.
    StrokeWidth,
    /// Rectangle corner radius.
    CornerRadius,
    /// Caption background.
    Background,
    /// Media source.
    Source,
    /// Image alternative text.
    Alt,
    /// Video mute toggle.
    Muted,
    /// Audio volume.
    Volume,
    /// Clip start time.
    StartTime,
    /// Clip duration.
    Duration,
}

use InspectorField as F;

const TEXT_FIELDS: &[InspectorField] = &[
    F::X,
    F::Y,
    F::Width,
    F::Height,
    F::Visible,
    F::Locked,
    F::Content,
    F::Color,
    F::FontSize,
    F::FontFamily,
    F::FontWeight,
    F::Align,
];
const IMAGE_FIELDS: &[InspectorField] = &[
    F::X, F::Y, F::Width, F::Height, F::Visible, F::Locked, F::Source, F::Alt,
];
const SHAPE_FIELDS: &[InspectorField] = &[
    F::X,
    F::Y,
    F::Width,
    F::Height,
    F::Visible,
    F::Locked,
    F::Fill,
    F::Stroke,
    F::StrokeWidth,
    F::CornerRadius,
];
const VIDEO_FIELDS: &[InspectorField] = &[
    F::X,
    F::Y,
    F::Width,
    F::Height,
    F::Visible,
    F::Locked,
    F::Source,
    F::Muted,
    F::StartTime,
    F::Duration,
];
const AUDIO_FIELDS: &[InspectorField] = &[
    F::Locked,
    F::Source,
    F::Volume,
    F::StartTime,
    F::Duration,
];
const CAPTION_FIELDS: &[InspectorField] = &[
    F::X,
    F::Y,
    F::Width,
    F::Height,
    F::Visible,
    F::Locked,
    F::Content,
    F::Color,
    F::FontSize,
    F::Background,
    F::StartTime,
    F::Duration,
];

impl ElementTag {
    /// Properties the inspector shows for this element type.
    #[must_use]
    pub const fn inspector_fields(self) -> &'static [InspectorField] {
        match self {
            Self::Text => TEXT_FIELDS,
            Self::Image => IMAGE_FIELDS,
            Self::Shape => SHAPE_FIELDS,
            Self::Video => VIDEO_FIELDS,
            Self::Audio => AUDIO_FIELDS,
            Self::Caption => CAPTION_FIELDS,
        }
    }

    /// Whether the element occupies canvas space (and can be hit or drawn).
    #[must_use]
    pub const fn is_spatial(self) -> bool {
        !matches!(self, Self::Audio)
    }
}

/// Position, size and layering of an element in page-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// X position of the left edge. May be negative.
    pub x: f32,
    /// Y position of the top edge. May be negative.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Paint and hit-test priority; higher is in front.
    pub z_index: i32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            z_index: 0,
        }
    }
}

impl Geometry {
    /// Geometry at the given position and size, z-index 0.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            z_index: 0,
        }
    }

    /// X of the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Y of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Temporal placement of an element on the video timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Start time in seconds, never negative.
    pub start_time: f64,
    /// Duration in seconds, at least [`MIN_CLIP_DURATION`].
    pub duration: f64,
    /// Length of the underlying media once known.
    #[serde(default)]
    pub media_duration: Option<f64>,
}

impl Default for Clip {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_CLIP_DURATION)
    }
}

impl Clip {
    /// Create a clip, clamping start and duration into range.
    #[must_use]
    pub fn new(start_time: f64, duration: f64) -> Self {
        Self {
            start_time: clamp_start(start_time),
            duration: clamp_duration(duration),
            media_duration: None,
        }
    }

    /// End time in seconds.
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether `time` falls within `[start, end)`.
    #[must_use]
    pub fn is_active_at(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time()
    }
}

pub(crate) fn clamp_start(start: f64) -> f64 {
    if start.is_finite() {
        start.max(0.0)
    } else {
        0.0
    }
}

pub(crate) fn clamp_duration(duration: f64) -> f64 {
    if duration.is_finite() {
        duration.max(MIN_CLIP_DURATION)
    } else {
        MIN_CLIP_DURATION
    }
}

/// Coerce raw inspector input into a usable dimension.
///
/// Non-numeric, non-finite and non-positive input becomes `1`.
#[must_use]
pub fn coerce_dimension(raw: &str) -> f32 {
    raw.trim()
        .parse::<f32>()
        .ok()
        .map_or(1.0, sanitize_dimension)
}

fn sanitize_dimension(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

/// A canvas element with content, geometry and optional timeline placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier within its page.
    pub id: ElementId,
    /// Element content type.
    pub kind: ElementKind,
    /// Position, size and z-index.
    pub geometry: Geometry,
    /// Whether the element is drawn.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Locked elements render and can be selected but cannot be transformed.
    #[serde(default)]
    pub locked: bool,
    /// Timeline placement on the video surface.
    #[serde(default)]
    pub clip: Option<Clip>,
}

const fn default_visible() -> bool {
    true
}

impl Element {
    /// Create a new element with the given kind.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            geometry: Geometry::default(),
            visible: true,
            locked: false,
            clip: None,
        }
    }

    /// Set the geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Place the element on the timeline.
    #[must_use]
    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clip = Some(clip);
        self
    }

    /// Set whether the element is locked.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// The element's type tag.
    #[must_use]
    pub const fn tag(&self) -> ElementTag {
        self.kind.tag()
    }

    /// Check if a point (in page coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let g = &self.geometry;
        x >= g.x && x <= g.right() && y >= g.y && y <= g.bottom()
    }

    /// Merge a partial update into this element.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        let g = &mut self.geometry;
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            g.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            g.y = y;
        }
        if let Some(width) = patch.width {
            g.width = sanitize_dimension(width);
        }
        if let Some(height) = patch.height {
            g.height = sanitize_dimension(height);
        }
        if let Some(z) = patch.z_index {
            g.z_index = z;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }

        if patch.start_time.is_some() || patch.duration.is_some() || patch.media_duration.is_some()
        {
            let clip = self.clip.get_or_insert_with(Clip::default);
            if let Some(start) = patch.start_time {
                clip.start_time = clamp_start(start);
            }
            if let Some(duration) = patch.duration {
                clip.duration = clamp_duration(duration);
            }
            if let Some(media) = patch.media_duration.filter(|v| v.is_finite() && *v > 0.0) {
                clip.media_duration = Some(media);
            }
        }

        patch.apply_style(&mut self.kind);
    }
}

/// A partial update: every field that is `Some` overwrites the element's.
///
/// Style fields apply only to the variants that carry them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementPatch {
    /// New left edge.
    pub x: Option<f32>,
    /// New top edge.
    pub y: Option<f32>,
    /// New width; invalid values become `1`.
    pub width: Option<f32>,
    /// New height; invalid values become `1`.
    pub height: Option<f32>,
    /// New z-index.
    pub z_index: Option<i32>,
    /// New visibility.
    pub visible: Option<bool>,
    /// New lock state.
    pub locked: Option<bool>,
    /// New clip start time.
    pub start_time: Option<f64>,
    /// New clip duration.
    pub duration: Option<f64>,
    /// Known media length.
    pub media_duration: Option<f64>,
    /// Text or caption content.
    pub content: Option<String>,
    /// Text or caption color.
    pub color: Option<String>,
    /// Text or caption font size.
    pub font_size: Option<f32>,
    /// Text font family.
    pub font_family: Option<String>,
    /// Text font weight.
    pub font_weight: Option<u16>,
    /// Text alignment.
    pub align: Option<TextAlign>,
    /// Shape fill.
    pub fill: Option<String>,
    /// Shape stroke.
    pub stroke: Option<String>,
    /// Shape stroke width.
    pub stroke_width: Option<f32>,
    /// Shape corner radius.
    pub corner_radius: Option<f32>,
    /// Caption background.
    pub background: Option<String>,
    /// Media source for image, video and audio.
    pub src: Option<String>,
    /// Image alternative text.
    pub alt: Option<String>,
    /// Video mute flag.
    pub muted: Option<bool>,
    /// Audio volume.
    pub volume: Option<f32>,
}

impl ElementPatch {
    /// Patch that moves an element.
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that sets the full bounds of an element.
    #[must_use]
    pub fn bounds(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Patch that places a clip on the timeline.
    #[must_use]
    pub fn timing(start_time: f64, duration: f64) -> Self {
        Self {
            start_time: Some(start_time),
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// Build a patch from raw inspector text for one field.
    ///
    /// Width and height go through [`coerce_dimension`]; other numeric
    /// fields that fail to parse produce an empty patch.
    #[must_use]
    pub fn from_inspector(field: InspectorField, raw: &str) -> Self {
        let raw = raw.trim();
        let number = || raw.parse::<f32>().ok().filter(|v| v.is_finite());
        let seconds = || raw.parse::<f64>().ok().filter(|v| v.is_finite());
        let flag = || raw.parse::<bool>().ok();
        let text = || Some(raw.to_string());
        let mut patch = Self::default();
        match field {
            F::X => patch.x = number(),
            F::Y => patch.y = number(),
            F::Width => patch.width = Some(coerce_dimension(raw)),
            F::Height => patch.height = Some(coerce_dimension(raw)),
            F::Visible => patch.visible = flag(),
            F::Locked => patch.locked = flag(),
            F::Content => patch.content = text(),
            F::Color => patch.color = text(),
            F::FontSize => patch.font_size = number().filter(|v| *v > 0.0),
            F::FontFamily => patch.font_family = text(),
            F::FontWeight => patch.font_weight = raw.parse().ok(),
            F::Align => {
                patch.align = match raw {
                    "left" => Some(TextAlign::Left),
                    "center" => Some(TextAlign::Center),
                    "right" => Some(TextAlign::Right),
                    _ => None,
                };
            }
            F::Fill => patch.fill = text(),
            F::Stroke => patch.stroke = text(),
            F::StrokeWidth => patch.stroke_width = number().filter(|v| *v >= 0.0),
            F::CornerRadius => patch.corner_radius = number().filter(|v| *v >= 0.0),
            F::Background => patch.background = text(),
            F::Source => patch.src = text(),
            F::Alt => patch.alt = text(),
            F::Muted => patch.muted = flag(),
            F::Volume => patch.volume = number().map(|v| v.clamp(0.0, 1.0)),
            F::StartTime => patch.start_time = seconds(),
            F::Duration => patch.duration = seconds(),
        }
        patch
    }

    fn apply_style(&self, kind: &mut ElementKind) {
        fn set<T: Clone>(slot: &mut T, value: Option<&T>) {
            if let Some(v) = value {
                slot.clone_from(v);
            }
        }

        match kind {
            ElementKind::Text {
                content,
                font_size,
                font_family,
                font_weight,
                color,
                align,
            } => {
                set(content, self.content.as_ref());
                set(font_size, self.font_size.as_ref());
                set(font_family, self.font_family.as_ref());
                set(font_weight, self.font_weight.as_ref());
                set(color, self.color.as_ref());
                set(align, self.align.as_ref());
            }
            ElementKind::Image { src, alt } => {
                set(src, self.src.as_ref());
                set(alt, self.alt.as_ref());
            }
            ElementKind::Shape {
                fill,
                stroke,
                stroke_width,
                corner_radius,
                ..
            } => {
                set(fill, self.fill.as_ref());
                set(stroke, self.stroke.as_ref());
                set(stroke_width, self.stroke_width.as_ref());
                set(corner_radius, self.corner_radius.as_ref());
            }
            ElementKind::Video { src, muted } => {
                set(src, self.src.as_ref());
                set(muted, self.muted.as_ref());
            }
            ElementKind::Audio { src, volume } => {
                set(src, self.src.as_ref());
                set(volume, self.volume.as_ref());
            }
            ElementKind::Caption {
                content,
                font_size,
                color,
                background,
            } => {
                set(content, self.content.as_ref());
                set(font_size, self.font_size.as_ref());
                set(color, self.color.as_ref());
                set(background, self.background.as_ref());
            }
        }
    }
}
