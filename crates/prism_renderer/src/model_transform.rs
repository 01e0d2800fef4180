//! Last-known-good model transform.
//!
//! A model matrix with non-finite entries or a (near) zero determinant would
//! poison every capture. Such a candidate is rejected with
//! [`RenderError::RuntimeState`] and the previous matrix stays in use, so the
//! frame still renders.

use glam::Mat4;

use crate::error::RenderError;

/// Determinants at or below this magnitude count as singular.
pub(crate) const MIN_DETERMINANT: f32 = 1e-12;

#[derive(Debug, Clone, Copy)]
pub struct ModelTransform {
    current: Mat4,
    rejected: u64,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelTransform {
    pub fn new() -> Self {
        Self {
            current: Mat4::IDENTITY,
            rejected: 0,
        }
    }

    /// Accepts `candidate` if it is usable, otherwise keeps the current
    /// matrix and reports why.
    pub fn update(&mut self, candidate: Mat4) -> Result<(), RenderError> {
        if let Err(reason) = validate(&candidate) {
            self.rejected += 1;
            return Err(RenderError::RuntimeState(format!(
                "model transform rejected ({reason}); keeping last valid transform"
            )));
        }
        self.current = candidate;
        Ok(())
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.current
    }

    /// How many candidates have been refused so far.
    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

fn validate(m: &Mat4) -> Result<(), &'static str> {
    if !m.is_finite() {
        return Err("non-finite entries");
    }
    let det = m.determinant();
    if !det.is_finite() || det.abs() <= MIN_DETERMINANT {
        return Err("singular matrix");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn valid_transform_is_accepted() {
        let mut t = ModelTransform::new();
        let m = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        assert!(t.update(m).is_ok());
        assert_eq!(t.matrix(), m);
    }

    #[test]
    fn degenerate_scale_keeps_previous() {
        let mut t = ModelTransform::new();
        let good = Mat4::from_scale(Vec3::splat(2.0));
        t.update(good).unwrap();

        let err = t.update(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0))).unwrap_err();
        assert!(matches!(err, RenderError::RuntimeState(_)));
        assert_eq!(t.matrix(), good);

        assert!(t.update(Mat4::from_translation(Vec3::new(f32::NAN, 0.0, 0.0))).is_err());
        assert_eq!(t.matrix(), good);
        assert_eq!(t.rejected(), 2);
    }
}
