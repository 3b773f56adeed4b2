/// Keep/skip decision for down-sampling a video to a target frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    stride: u64,
}

impl FrameSampler {
    /// `source_fps` is the container's native rate, `target_fps` the desired
    /// output rate. A target of zero (or below) keeps every frame.
    pub fn new(source_fps: f64, target_fps: f64) -> Self {
        if target_fps.is_nan() || target_fps <= 0.0 || !source_fps.is_finite() {
            return Self::every_frame();
        }
        let ratio = (source_fps / target_fps).round();
        // R > 2F or an unknown (0) source rate rounds to 0
        let stride = if ratio >= 1.0 { ratio as u64 } else { 1 };
        Self { stride }
    }

    pub fn every_frame() -> Self {
        Self { stride: 1 }
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn keep(&self, frame_index: u64) -> bool {
        frame_index % self.stride == 0
    }

    /// Number of frames kept out of the first `total` frames.
    pub fn kept_of(&self, total: u64) -> u64 {
        total.div_ceil(self.stride)
    }
}
