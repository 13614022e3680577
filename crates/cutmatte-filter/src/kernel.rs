//! Convolution kernels
//!
//! Defines the kernel structure used by [`crate::convolve::convolve_opaque_rgb`].

/// Taps of the 3x3 sharpening kernel, row-major. The right-hand tap of
/// the middle row is zero, so the kernel is deliberately asymmetric.
pub const SHARPEN_TAPS: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, 0.0, 0.0, -1.0, 0.0];

/// A 2D convolution kernel with its origin at the center.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Width of the kernel
    width: u32,
    /// Height of the kernel
    height: u32,
    /// Kernel data (row-major order)
    data: Vec<f32>,
}

impl Kernel {
    /// The 3x3 sharpening kernel `[[0,-1,0],[-1,5,0],[0,-1,0]]`.
    pub fn sharpen() -> Self {
        Kernel {
            width: 3,
            height: 3,
            data: SHARPEN_TAPS.to_vec(),
        }
    }

    /// Get the kernel width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the center X coordinate.
    #[inline]
    pub fn center_x(&self) -> u32 {
        self.width / 2
    }

    /// Get the center Y coordinate.
    #[inline]
    pub fn center_y(&self) -> u32 {
        self.height / 2
    }

    /// Get the kernel data (row-major).
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sharpen_kernel() {
        let k = Kernel::sharpen();
        assert_eq!((k.width(), k.height()), (3, 3));
        assert_eq!((k.center_x(), k.center_y()), (1, 1));
        assert_eq!(k.data()[4], 5.0);
        assert_eq!(k.data()[3], -1.0);
        assert_eq!(k.data()[5], 0.0);
        assert_eq!(k.data().iter().sum::<f32>(), 2.0);
    }
}
