use std::num::NonZeroUsize;

use log::debug;
use rand::Rng;

use crate::{
    MlErr, Result,
    arch::{Model, loss::LossFn},
    dataset::Dataset,
    optimization::Optimizer,
};

/// A model `Trainer`. Contains the components needed for fitting a model's parameters to a
/// dataset, except for the model and the parameters themselves.
pub struct Trainer<O, L, R>
where
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    optimizer: O,
    loss_fn: L,
    batch_size: NonZeroUsize,
    rng: R,
    grad: Vec<f32>,
}

impl<O, L, R> Trainer<O, L, R>
where
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    /// Returns a new `Trainer`.
    ///
    /// # Arguments
    /// * `optimizer` - The optimizer that updates the parameters after each batch.
    /// * `loss_fn` - The loss function used to measure the difference between a model's output and the expected one.
    /// * `batch_size` - The maximum amount of samples per batch.
    /// * `rng` - A random number generator, used for shuffling the dataset on every epoch.
    pub fn new(optimizer: O, loss_fn: L, batch_size: NonZeroUsize, rng: R) -> Self {
        Self {
            optimizer,
            loss_fn,
            batch_size,
            rng,
            grad: Vec::new(),
        }
    }

    /// Performs `epochs` epochs of training over `model`, shuffling the dataset before each one.
    ///
    /// # Arguments
    /// * `model` - The model being trained.
    /// * `params` - The model's parameters, updated in place.
    /// * `dataset` - The samples to fit.
    /// * `epochs` - The amount of passes over the dataset.
    ///
    /// # Returns
    /// The loss of each epoch.
    pub fn train<M: Model>(
        &mut self,
        model: &mut M,
        params: &mut [f32],
        dataset: &mut Dataset,
        epochs: usize,
    ) -> Result<Vec<f32>> {
        if dataset.is_empty() {
            return Err(MlErr::EmptyDataset);
        }

        self.grad.clear();
        self.grad.resize(model.size(), 0.0);

        let mut losses = Vec::with_capacity(epochs);

        for epoch in 1..=epochs {
            dataset.shuffle(&mut self.rng);
            let batches = dataset.batches(self.batch_size);

            let loss = model.backprop(
                params,
                &mut self.grad,
                &self.loss_fn,
                &mut self.optimizer,
                batches,
            )?;

            debug!("epoch {epoch}/{epochs}: loss {loss}");
            losses.push(loss);
        }

        Ok(losses)
    }
}
