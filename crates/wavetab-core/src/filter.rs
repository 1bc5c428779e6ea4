//! The [`Filter`] trait shared by the IIR filters.
//!
//! Filters are mono, sample-at-a-time state machines. Block processing is a
//! loop over [`Filter::process`], so the delay history carries across block
//! boundaries: filtering `2N` samples in one call gives exactly the same
//! output as two calls of `N`.

use crate::error::{Error, Result};

/// A stateful filter over `f64` samples.
///
/// The trait is object-safe, so heterogeneous chains can be held as
/// `Vec<Box<dyn Filter>>`.
///
/// # Example
///
/// ```rust
/// use wavetab_core::{Biquad, Filter};
///
/// let mut filter = Biquad::allpass(44100.0, 1000.0, 0.707).unwrap();
///
/// let input = [1.0, 0.0, 0.0, 0.0];
/// let mut output = [0.0; 4];
/// filter.process_block(&input, &mut output).unwrap();
/// ```
pub trait Filter {
    /// Filter one sample, advancing the delay history.
    fn process(&mut self, input: f64) -> f64;

    /// Filter `input` into `output`.
    ///
    /// # Errors
    ///
    /// [`Error::BufferLengthMismatch`] if the slices differ in length. No
    /// samples are processed in that case.
    fn process_block(&mut self, input: &[f64], output: &mut [f64]) -> Result<()> {
        if input.len() != output.len() {
            return Err(Error::BufferLengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        for (x, y) in input.iter().zip(output.iter_mut()) {
            *y = self.process(*x);
        }
        Ok(())
    }

    /// Filter a buffer in place.
    fn process_in_place(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clear the delay history without touching coefficients.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// y[n] = x[n] + x[n-1]
    struct TwoTap {
        prev: f64,
    }

    impl Filter for TwoTap {
        fn process(&mut self, input: f64) -> f64 {
            let output = input + self.prev;
            self.prev = input;
            output
        }

        fn reset(&mut self) {
            self.prev = 0.0;
        }
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let mut filter = TwoTap { prev: 0.0 };
        let mut output = [7.0; 3];
        let err = filter.process_block(&[1.0; 4], &mut output).unwrap_err();
        assert_eq!(err, Error::BufferLengthMismatch { input: 4, output: 3 });
        assert_eq!(output, [7.0; 3]);
        assert_eq!(filter.prev, 0.0);
    }

    #[test]
    fn test_in_place_matches_block() {
        let input = [1.0, 2.0, 3.0, 4.0];
        let mut output = [0.0; 4];
        TwoTap { prev: 0.0 }.process_block(&input, &mut output).unwrap();

        let mut buffer = input;
        let mut filter = TwoTap { prev: 0.0 };
        filter.process_in_place(&mut buffer);
        assert_eq!(buffer, output);
        assert_eq!(buffer, [1.0, 3.0, 5.0, 7.0]);

        filter.reset();
        assert_eq!(filter.process(1.0), 1.0);
    }
}
