use std::num::NonZeroUsize;

use ndarray::{ArrayView2, Axis};
use rand::{Rng, seq::SliceRandom};

use crate::{MlErr, Result};

/// An in-memory dataset of samples stored row by row, each row being the `x_size` inputs
/// followed by the `y_size` expected outputs.
#[derive(Debug, Clone)]
pub struct Dataset {
    data: Vec<f32>,
    x_size: usize,
    y_size: usize,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `data` - The samples, row by row.
    /// * `x_size` - The amount of inputs per sample.
    /// * `y_size` - The amount of outputs per sample.
    ///
    /// # Returns
    /// A new `Dataset` or an error if `data` can't be split in whole rows.
    pub fn new(data: Vec<f32>, x_size: usize, y_size: usize) -> Result<Self> {
        if x_size == 0 || y_size == 0 {
            return Err(MlErr::SizeMismatch {
                what: "sample size",
                got: x_size.min(y_size),
                expected: 1,
            });
        }

        let row = x_size + y_size;
        if data.len() % row != 0 {
            return Err(MlErr::SizeMismatch {
                what: "dataset rows",
                got: data.len(),
                expected: data.len() - data.len() % row,
            });
        }

        Ok(Self {
            data,
            x_size,
            y_size,
        })
    }

    /// Creates a single input, single output dataset pairing `xs[i]` with `ys[i]`.
    pub fn from_columns(xs: &[f32], ys: &[f32]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(MlErr::SizeMismatch {
                what: "outputs",
                got: ys.len(),
                expected: xs.len(),
            });
        }

        let data = xs.iter().zip(ys).flat_map(|(&x, &y)| [x, y]).collect();
        Self::new(data, 1, 1)
    }

    pub fn x_size(&self) -> usize {
        self.x_size
    }

    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Returns the amount of samples.
    pub fn len(&self) -> usize {
        self.data.len() / (self.x_size + self.y_size)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Shuffles the order of the samples.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let row = self.x_size + self.y_size;
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);

        self.data = order
            .into_iter()
            .flat_map(|i| self.data[i * row..(i + 1) * row].iter().copied())
            .collect();
    }

    /// Splits the dataset in batches of at most `batch_size` samples, the last one may be smaller.
    ///
    /// # Returns
    /// An iterator over the `(x, y)` views of each batch.
    pub fn batches(
        &self,
        batch_size: NonZeroUsize,
    ) -> impl Iterator<Item = (ArrayView2<'_, f32>, ArrayView2<'_, f32>)> {
        let row = self.x_size + self.y_size;
        let x_size = self.x_size;

        self.data
            .chunks(batch_size.get() * row)
            .filter_map(move |chunk| ArrayView2::from_shape((chunk.len() / row, row), chunk).ok())
            .map(move |batch| batch.split_at(Axis(1), x_size))
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn batch_size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn from_columns_pairs_inputs_and_outputs() {
        let dataset = Dataset::from_columns(&[1., 2., 3.], &[10., 20., 30.]).unwrap();

        assert_eq!(dataset.len(), 3);
        let (x, y) = dataset.batches(batch_size(3)).next().unwrap();
        assert_eq!(x.column(0).to_vec(), [1., 2., 3.]);
        assert_eq!(y.column(0).to_vec(), [10., 20., 30.]);
    }

    #[test]
    fn from_columns_rejects_different_lengths() {
        let err = Dataset::from_columns(&[1., 2.], &[1.]).unwrap_err();
        assert!(matches!(err, MlErr::SizeMismatch { got: 1, expected: 2, .. }));
    }

    #[test]
    fn new_rejects_partial_rows() {
        assert!(Dataset::new(vec![1., 2., 3.], 1, 1).is_err());
        assert!(Dataset::new(vec![1., 2.], 0, 2).is_err());
    }

    #[test]
    fn batches_split_rows_and_columns() {
        let data = (0..12).map(|i| i as f32).collect();
        let dataset = Dataset::new(data, 2, 1).unwrap();

        let batches: Vec<_> = dataset.batches(batch_size(3)).collect();

        assert_eq!(batches.len(), 2);
        let (x, y) = batches[0];
        assert_eq!(x.dim(), (3, 2));
        assert_eq!(y.dim(), (3, 1));
        assert_eq!(x.row(1).to_vec(), [3., 4.]);
        assert_eq!(y.row(2).to_vec(), [8.]);

        let (x, y) = batches[1];
        assert_eq!(x.dim(), (1, 2));
        assert_eq!(y.row(0).to_vec(), [11.]);
    }

    #[test]
    fn shuffle_keeps_samples_together() {
        let xs: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let ys: Vec<f32> = xs.iter().map(|x| 3. * x + 1.).collect();
        let mut dataset = Dataset::from_columns(&xs, &ys).unwrap();

        dataset.shuffle(&mut StdRng::seed_from_u64(3));

        let (x, y) = dataset.batches(batch_size(20)).next().unwrap();
        let mut seen: Vec<f32> = x.column(0).to_vec();
        for (x, y) in x.column(0).iter().zip(y.column(0)) {
            assert_eq!(*y, 3. * x + 1.);
        }

        seen.sort_by(f32::total_cmp);
        assert_eq!(seen, xs);
    }
}
