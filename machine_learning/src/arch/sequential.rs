use ndarray::{Array2, ArrayView2};

use super::{Model, layers::Layer, loss::LossFn};
use crate::{MlErr, Result, optimization::Optimizer};

/// A sequential model: information flows forward when computing an output and backward when
/// computing the *deltas* of its layers.
///
/// The parameters are kept outside the model in a single flat buffer holding each layer's
/// slice one after the other.
#[derive(Debug, Clone)]
pub struct Sequential {
    layers: Vec<Layer>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// A new `Sequential` instance.
    pub fn new<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Layer>,
    {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns the width of the rows this model takes, `None` if it has no layers.
    pub fn input_size(&self) -> Option<usize> {
        self.layers.first().map(|layer| layer.dim().0)
    }

    /// Returns the width of the rows this model outputs, `None` if it has no layers.
    pub fn output_size(&self) -> Option<usize> {
        self.layers.last().map(|layer| layer.dim().1)
    }

    /// Makes a forward pass through the network, letting each layer keep what it needs for the
    /// following backward pass.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `x` - The input data.
    ///
    /// # Returns
    /// The prediction for the given input or an error if occurred.
    pub fn forward(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_params(params.len())?;

        let mut a = x.to_owned();
        let mut start = 0;

        for layer in self.layers.iter_mut() {
            let end = start + layer.size();
            a = layer.forward(&params[start..end], a.view())?;
            start = end;
        }

        Ok(a)
    }

    fn check_params(&self, got: usize) -> Result<()> {
        let expected = self.size();
        if got != expected {
            return Err(MlErr::SizeMismatch {
                what: "params",
                got,
                expected,
            });
        }

        Ok(())
    }
}

impl Model for Sequential {
    fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    fn predict(&self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_params(params.len())?;

        let mut a = x.to_owned();
        let mut start = 0;

        for layer in &self.layers {
            let end = start + layer.size();
            a = layer.eval(&params[start..end], a.view())?;
            start = end;
        }

        Ok(a)
    }

    // NOTE: the epoch loss is approximated by averaging the loss of each batch before its update,
    // getting the actual one would require forwarding over all batches again.
    fn backprop<'a, L, O, I>(
        &mut self,
        params: &mut [f32],
        grad: &mut [f32],
        loss_fn: &L,
        optimizer: &mut O,
        batches: I,
    ) -> Result<f32>
    where
        L: LossFn,
        O: Optimizer,
        I: Iterator<Item = (ArrayView2<'a, f32>, ArrayView2<'a, f32>)>,
    {
        let size = self.size();
        self.check_params(params.len())?;
        if grad.len() != size {
            return Err(MlErr::SizeMismatch {
                what: "gradient",
                got: grad.len(),
                expected: size,
            });
        }

        let mut total_loss = 0.0;
        let mut num_batches = 0;

        for (x, y) in batches {
            let y_pred = self.forward(params, x)?;
            if y_pred.dim() != y.dim() {
                return Err(MlErr::SizeMismatch {
                    what: "targets",
                    got: y.len(),
                    expected: y_pred.len(),
                });
            }

            total_loss += loss_fn.loss(y_pred.view(), y);
            num_batches += 1;

            let mut d = loss_fn.loss_prime(y_pred.view(), y);
            let mut end = size;

            for layer in self.layers.iter().rev() {
                let start = end - layer.size();
                d = layer.backward(&params[start..end], &mut grad[start..end], d.view())?;
                end = start;
            }

            optimizer.update_params(params, grad);
        }

        if num_batches == 0 {
            return Err(MlErr::EmptyDataset);
        }

        Ok(total_loss / num_batches as f32)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::{arch::loss::Mse, optimization::GradientDescent};

    #[test]
    fn size_adds_up_every_layer() {
        let model = Sequential::new([Layer::dense((2, 3)), Layer::dense((3, 1))]);

        assert_eq!(model.size(), 9 + 4);
        assert_eq!(model.input_size(), Some(2));
        assert_eq!(model.output_size(), Some(1));
    }

    #[test]
    fn predict_chains_the_layers() {
        let model = Sequential::new([Layer::dense((1, 1)), Layer::dense((1, 1))]);
        // (2x + 1) * 3 - 1
        let params = [2.0, 1.0, 3.0, -1.0];

        let y = model.predict(&params, array![[0.0], [1.0]].view()).unwrap();

        assert_eq!(y, array![[2.0], [8.0]]);
    }

    #[test]
    fn predict_rejects_wrong_param_count() {
        let model = Sequential::new([Layer::dense((1, 1))]);

        let err = model.predict(&[1.0], array![[0.0]].view()).unwrap_err();
        assert!(matches!(err, MlErr::SizeMismatch { what: "params", got: 1, expected: 2 }));
    }

    #[test]
    fn forward_and_predict_agree() {
        let mut model = Sequential::new([Layer::dense((2, 2)), Layer::dense((2, 1))]);
        let params = [0.5, -1.0, 2.0, 0.25, 0.1, 0.2, 1.5, -0.5, 0.3];
        let x = array![[1.0, 2.0], [-3.0, 0.5]];

        let predicted = model.predict(&params, x.view()).unwrap();
        let forwarded = model.forward(&params, x.view()).unwrap();

        assert_eq!(predicted, forwarded);
    }

    #[test]
    fn backprop_takes_one_step_per_batch() {
        let mut model = Sequential::new([Layer::dense((1, 1))]);
        let mut params = vec![0.0, 0.0];
        let mut grad = vec![0.0; 2];
        let mut optimizer = GradientDescent::new(0.1);

        let data = array![[1.0, 3.0], [2.0, 5.0], [3.0, 7.0]];
        let (x, y) = data.view().split_at(ndarray::Axis(1), 1);

        let loss = model
            .backprop(
                &mut params,
                &mut grad,
                &Mse,
                &mut optimizer,
                std::iter::once((x, y)),
            )
            .unwrap();

        // (9 + 25 + 49) / 3
        assert!((loss - 83.0 / 3.0).abs() < 1e-4);
        assert!((params[0] - 2.266_666_7).abs() < 1e-4);
        assert!((params[1] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn backprop_without_batches_fails() {
        let mut model = Sequential::new([Layer::dense((1, 1))]);
        let mut params = vec![0.0; 2];
        let mut grad = vec![0.0; 2];

        let err = model
            .backprop(
                &mut params,
                &mut grad,
                &Mse,
                &mut GradientDescent::new(0.1),
                std::iter::empty(),
            )
            .unwrap_err();

        assert!(matches!(err, MlErr::EmptyDataset));
    }
}
