use std::fmt;

use crate::detection::domain::tracker_config::DetectParams;
use crate::shared::gray_frame::GrayFrame;
use crate::shared::tracker_error::TrackerError;

/// Detection mode offered by the external detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorVariant {
    Frontal,
    FrontalSurveillance,
    MultiView,
    MultiViewReinforce,
}

impl DetectorVariant {
    pub const ALL: &[DetectorVariant] = &[
        DetectorVariant::Frontal,
        DetectorVariant::FrontalSurveillance,
        DetectorVariant::MultiView,
        DetectorVariant::MultiViewReinforce,
    ];

    /// Stable kebab-case name, used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorVariant::Frontal => "frontal",
            DetectorVariant::FrontalSurveillance => "frontal-surveillance",
            DetectorVariant::MultiView => "multi-view",
            DetectorVariant::MultiViewReinforce => "multi-view-reinforce",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == name)
    }
}

impl fmt::Display for DetectorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a detector reports after writing into the result buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorOutput {
    /// No detection was performed; decodes to an empty face list.
    NoResult,
    /// The result starts `offset` bytes into the buffer and may extend to
    /// its end.
    Written { offset: usize },
}

/// Boundary to the external face detection capability.
///
/// Implementations overwrite `buffer` and report where the result lives.
/// Platform-specific bindings are chosen at startup and injected into the
/// tracking context.
pub trait FaceDetector: Send {
    fn name(&self) -> &str;

    fn detect(
        &mut self,
        variant: DetectorVariant,
        buffer: &mut [u8],
        frame: &GrayFrame,
        params: &DetectParams,
    ) -> Result<DetectorOutput, TrackerError>;
}
