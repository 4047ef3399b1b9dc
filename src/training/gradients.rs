//! Gradient storage for boosting rounds.

/// First- and second-order gradient for one row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradsTuple {
    pub grad: f32,
    pub hess: f32,
}

/// Interleaved gradient buffer, one pair per training row, reused across
/// rounds.
#[derive(Debug)]
pub struct Gradients {
    pairs: Vec<GradsTuple>,
}

impl Gradients {
    pub fn new(n_rows: usize) -> Self {
        Self { pairs: vec![GradsTuple::default(); n_rows] }
    }

    #[inline]
    pub fn pairs(&self) -> &[GradsTuple] {
        &self.pairs
    }

    #[inline]
    pub fn pairs_mut(&mut self) -> &mut [GradsTuple] {
        &mut self.pairs
    }
}
