//! InteractionRecord - output of the scroll engine
//!
//! One immutable record per finished scroll interaction.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use crate::NodeId;

/// Entry type under which records are published
pub const SCROLL_ENTRY_TYPE: &str = "scroll";

/// Input modality that caused an interaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollSource {
    Touch,
    Wheel,
    Keyboard,
    #[default]
    Other,
    Programmatic,
}

impl ScrollSource {
    pub const ALL: [ScrollSource; 5] = [
        Self::Touch,
        Self::Wheel,
        Self::Keyboard,
        Self::Other,
        Self::Programmatic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Touch => "touch",
            Self::Wheel => "wheel",
            Self::Keyboard => "keyboard",
            Self::Other => "other",
            Self::Programmatic => "programmatic",
        }
    }

    /// Parse a source name, `None` if unrecognized
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for ScrollSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unchecked record fields, as accumulated by a tracker or supplied by a consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub start_time: f64,
    /// `None` if no frame was ever sampled
    pub first_frame_time: Option<f64>,
    pub duration: f64,
    pub frames_expected: f64,
    pub frames_produced: f64,
    pub scroll_source: Cow<'static, str>,
    pub target: Option<NodeId>,
    /// Whether `target` is an element (non-elements are dropped)
    pub target_is_element: bool,
    pub distance_x: f64,
    pub distance_y: f64,
}

/// What was wrong with a raw field
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticReason {
    NonFinite,
    Negative,
    NotInteger,
    BeforeStart,
    UnknownSource(String),
    NotElement,
}

/// A correction applied while building a record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDiagnostic {
    pub field: &'static str,
    pub reason: DiagnosticReason,
}

impl fmt::Display for RecordDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            DiagnosticReason::NonFinite => {
                write!(f, "{}: non-finite value clamped to 0", self.field)
            }
            DiagnosticReason::Negative => write!(f, "{}: negative value clamped to 0", self.field),
            DiagnosticReason::NotInteger => {
                write!(f, "{}: fractional frame count floored", self.field)
            }
            DiagnosticReason::BeforeStart => {
                write!(f, "{}: earlier than startTime, clamped", self.field)
            }
            DiagnosticReason::UnknownSource(name) => {
                write!(f, "{}: unknown source '{}' replaced by 'other'", self.field, name)
            }
            DiagnosticReason::NotElement => {
                write!(f, "{}: not an element, set to null", self.field)
            }
        }
    }
}

/// Finished scroll interaction
///
/// Field set and names match the published entry shape exactly; see [`Self::to_json`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    entry_type: &'static str,
    name: &'static str,
    start_time: f64,
    first_frame_time: f64,
    duration: f64,
    frames_expected: u32,
    frames_produced: u32,
    frames_dropped: u32,
    checkerboard_time: f64,
    scroll_source: ScrollSource,
    target: Option<NodeId>,
    distance_x: f64,
    distance_y: f64,
}

impl InteractionRecord {
    /// Build a record, correcting invalid fields to safe defaults.
    ///
    /// Never fails. Every correction is returned and logged at `warn`.
    pub fn from_raw(raw: RawRecord) -> (Self, Vec<RecordDiagnostic>) {
        let mut diagnostics = Vec::new();

        let start_time = sanitize_time("startTime", raw.start_time, &mut diagnostics);
        let first_frame_time = match raw.first_frame_time {
            None => start_time,
            Some(t) => {
                let t = sanitize_time("firstFrameTime", t, &mut diagnostics);
                if t < start_time {
                    diagnostics.push(RecordDiagnostic {
                        field: "firstFrameTime",
                        reason: DiagnosticReason::BeforeStart,
                    });
                    start_time
                } else {
                    t
                }
            }
        };
        let duration = sanitize_time("duration", raw.duration, &mut diagnostics);
        let frames_expected =
            sanitize_count("framesExpected", raw.frames_expected, &mut diagnostics);
        let frames_produced =
            sanitize_count("framesProduced", raw.frames_produced, &mut diagnostics);

        let scroll_source = ScrollSource::parse(&raw.scroll_source).unwrap_or_else(|| {
            diagnostics.push(RecordDiagnostic {
                field: "scrollSource",
                reason: DiagnosticReason::UnknownSource(raw.scroll_source.to_string()),
            });
            ScrollSource::Other
        });

        let target = if raw.target.is_some() && !raw.target_is_element {
            diagnostics.push(RecordDiagnostic {
                field: "target",
                reason: DiagnosticReason::NotElement,
            });
            None
        } else {
            raw.target
        };

        let distance_x = sanitize_distance("distanceX", raw.distance_x, &mut diagnostics);
        let distance_y = sanitize_distance("distanceY", raw.distance_y, &mut diagnostics);

        for diagnostic in &diagnostics {
            tracing::warn!(%diagnostic, "scroll record field corrected");
        }

        let record = Self {
            entry_type: SCROLL_ENTRY_TYPE,
            name: SCROLL_ENTRY_TYPE,
            start_time,
            first_frame_time,
            duration,
            frames_expected,
            frames_produced,
            frames_dropped: frames_expected.saturating_sub(frames_produced),
            checkerboard_time: 0.0,
            scroll_source,
            target,
            distance_x,
            distance_y,
        };
        (record, diagnostics)
    }

    pub fn entry_type(&self) -> &'static str {
        self.entry_type
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn first_frame_time(&self) -> f64 {
        self.first_frame_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn frames_expected(&self) -> u32 {
        self.frames_expected
    }

    pub fn frames_produced(&self) -> u32 {
        self.frames_produced
    }

    pub fn frames_dropped(&self) -> u32 {
        self.frames_dropped
    }

    /// Always 0: unpainted area cannot be observed without renderer access
    pub fn checkerboard_time(&self) -> f64 {
        self.checkerboard_time
    }

    pub fn scroll_source(&self) -> ScrollSource {
        self.scroll_source
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn distance_x(&self) -> f64 {
        self.distance_x
    }

    pub fn distance_y(&self) -> f64 {
        self.distance_y
    }

    /// Produced / expected frames, 1.0 when nothing was expected
    pub fn smoothness(&self) -> f64 {
        if self.frames_expected == 0 {
            1.0
        } else {
            self.frames_produced as f64 / self.frames_expected as f64
        }
    }

    /// Euclidean length of the net displacement
    pub fn total_distance(&self) -> f64 {
        self.distance_x.hypot(self.distance_y)
    }

    /// Pixels per millisecond, 0 for zero-length interactions
    pub fn velocity(&self) -> f64 {
        if self.duration > 0.0 {
            self.total_distance() / self.duration
        } else {
            0.0
        }
    }

    /// Serialize to the published JSON shape
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn sanitize_time(field: &'static str, value: f64, diagnostics: &mut Vec<RecordDiagnostic>) -> f64 {
    if !value.is_finite() {
        diagnostics.push(RecordDiagnostic {
            field,
            reason: DiagnosticReason::NonFinite,
        });
        0.0
    } else if value < 0.0 {
        diagnostics.push(RecordDiagnostic {
            field,
            reason: DiagnosticReason::Negative,
        });
        0.0
    } else {
        value
    }
}

fn sanitize_count(field: &'static str, value: f64, diagnostics: &mut Vec<RecordDiagnostic>) -> u32 {
    let value = sanitize_time(field, value, diagnostics);
    if value.fract() != 0.0 {
        diagnostics.push(RecordDiagnostic {
            field,
            reason: DiagnosticReason::NotInteger,
        });
    }
    value.floor().min(u32::MAX as f64) as u32
}

fn sanitize_distance(
    field: &'static str,
    value: f64,
    diagnostics: &mut Vec<RecordDiagnostic>,
) -> f64 {
    if value.is_finite() {
        value
    } else {
        diagnostics.push(RecordDiagnostic {
            field,
            reason: DiagnosticReason::NonFinite,
        });
        0.0
    }
}
