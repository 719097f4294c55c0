/// Cycles through a frame sequence at a fixed interval.
///
/// While stopped the animator shows its stop frame.
#[derive(Debug, Clone)]
pub struct FrameAnimator {
    interval_ms: f32,
    stop_frame: usize,
    sequence: Vec<usize>,
    index: Option<usize>,
    playing: bool,
    until_next: f32,
}

impl FrameAnimator {
    /// Animator showing `sequence` every `interval_ms`, resting on `stop_frame`.
    pub fn new(interval_ms: f32, stop_frame: usize, sequence: Vec<usize>) -> Self {
        FrameAnimator {
            interval_ms: interval_ms.max(1.0),
            stop_frame,
            sequence,
            index: None,
            playing: false,
            until_next: 0.0,
        }
    }

    /// Starts the cycle. The first frame shows on the next update.
    pub fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            self.until_next = 0.0;
        }
    }

    /// Stops and returns to the stop frame.
    pub fn stop(&mut self) {
        self.playing = false;
        self.index = None;
    }

    /// Whether the cycle runs.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advances time.
    pub fn update(&mut self, ms: f32) {
        if !self.playing || self.sequence.is_empty() || !ms.is_finite() || ms <= 0.0 {
            return;
        }
        self.until_next -= ms;
        if self.until_next > 0.0 {
            return;
        }
        let overdue = -self.until_next;
        let len = self.sequence.len();
        // Whole cycles don't change the frame.
        let steps = ((overdue / self.interval_ms).floor() % len as f32) as usize + 1;
        self.index = Some(match self.index {
            Some(i) => (i + steps % len) % len,
            None => (steps - 1) % len,
        });
        self.until_next = self.interval_ms - overdue % self.interval_ms;
    }

    /// Frame to show now.
    pub fn frame(&self) -> usize {
        self.index
            .and_then(|i| self.sequence.get(i).copied())
            .unwrap_or(self.stop_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_the_sequence_and_rests_when_stopped() {
        let mut anim = FrameAnimator::new(200.0, 1, vec![0, 1, 2, 1]);
        assert_eq!(anim.frame(), 1);

        anim.play();
        anim.update(16.0);
        assert_eq!(anim.frame(), 0);
        anim.update(200.0);
        assert_eq!(anim.frame(), 1);
        anim.update(200.0);
        assert_eq!(anim.frame(), 2);
        anim.update(400.0);
        assert_eq!(anim.frame(), 0);

        anim.update(0.0);
        assert_eq!(anim.frame(), 0);

        anim.stop();
        assert_eq!(anim.frame(), 1);
        assert!(!anim.is_playing());
    }

    #[test]
    fn huge_or_infinite_steps_return_promptly() {
        let mut anim = FrameAnimator::new(200.0, 1, vec![0, 1, 2, 1]);
        anim.play();
        anim.update(f32::INFINITY);
        assert_eq!(anim.frame(), 1);
        anim.update(f32::NAN);
        assert_eq!(anim.frame(), 1);

        anim.update(16.0);
        assert_eq!(anim.frame(), 0);
        // 3 full cycles plus 2 intervals.
        anim.update(200.0 * 14.0);
        assert_eq!(anim.frame(), 2);
        anim.update(1.0e30);
        assert!(anim.frame() <= 2);
    }
}
