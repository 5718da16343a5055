//! Overlapping input/output windows for block conversion
//!
//! Each iteration transforms the freshly read block together with a tail of
//! the previous input, then keeps only the center of the transformed output
//! where block-edge artifacts are weakest.

/// Sliding input window: retained overlap prefix + fresh data suffix
#[derive(Debug, Clone)]
pub struct InputWindow {
    samples: Vec<i32>,
    overlap: usize,
}

impl InputWindow {
    /// Zero-filled window of `overlap + fresh` samples
    pub fn new(fresh: usize, overlap: usize) -> Self {
        Self {
            samples: vec![0; fresh + overlap],
            overlap,
        }
    }

    /// Move the last `overlap` samples to the front
    pub fn slide(&mut self) {
        let len = self.samples.len();
        if self.overlap > 0 {
            self.samples.copy_within(len - self.overlap.., 0);
        }
    }

    /// Slots to be filled with newly read samples
    pub fn fresh_mut(&mut self) -> &mut [i32] {
        &mut self.samples[self.overlap..]
    }

    /// Retained prefix
    pub fn retained(&self) -> &[i32] {
        &self.samples[..self.overlap]
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.samples
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Transformed output block with `edge` samples discarded at each side
#[derive(Debug, Clone)]
pub struct OutputWindow {
    samples: Vec<i32>,
    edge: usize,
}

impl OutputWindow {
    /// Window of `center + 2 * edge` samples
    pub fn new(center: usize, edge: usize) -> Self {
        Self {
            samples: vec![0; center + 2 * edge],
            edge,
        }
    }

    /// Steady-state portion to emit
    pub fn center(&self) -> &[i32] {
        &self.samples[self.edge..self.samples.len() - self.edge]
    }

    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.samples
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_keeps_tail() {
        let mut window = InputWindow::new(4, 3);
        for (i, s) in window.fresh_mut().iter_mut().enumerate() {
            *s = i as i32 + 1;
        }
        assert_eq!(window.as_slice(), &[0, 0, 0, 1, 2, 3, 4]);

        let before = window.as_slice()[window.len() - 3..].to_vec();
        window.slide();
        assert_eq!(window.retained(), before.as_slice());
    }

    #[test]
    fn test_slide_when_overlap_exceeds_fresh() {
        // The retained tail reaches into the old prefix
        let mut window = InputWindow::new(2, 5);
        window.fresh_mut().copy_from_slice(&[8, 9]);
        let before = window.as_slice()[2..].to_vec();
        window.slide();
        assert_eq!(window.retained(), before.as_slice());
        assert_eq!(window.retained(), &[0, 0, 0, 8, 9]);
    }

    #[test]
    fn test_zero_overlap() {
        let mut window = InputWindow::new(3, 0);
        window.fresh_mut().copy_from_slice(&[1, 2, 3]);
        window.slide();
        assert!(window.retained().is_empty());
        assert_eq!(window.fresh_mut().len(), 3);
    }

    #[test]
    fn test_output_center() {
        let mut window = OutputWindow::new(2, 2);
        window.as_mut_slice().copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(window.center(), &[3, 4]);

        let mut plain = OutputWindow::new(3, 0);
        plain.as_mut_slice().copy_from_slice(&[7, 8, 9]);
        assert_eq!(plain.center(), &[7, 8, 9]);
    }
}
