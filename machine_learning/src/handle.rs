use ndarray::{Array2, ArrayView2};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    MlErr, Result,
    arch::{Model, Sequential, loss::Mse},
    dataset::Dataset,
    initialization,
    optimization::GradientDescent,
    training::{Trainer, TrainingConfig},
};

/// A ready to evaluate model: its architecture, its parameters and the setup used to fit them.
///
/// Predicting only reads the handle, so once it's built or loaded it can be shared between
/// threads behind an `Arc` without any locking.
pub struct ModelHandle {
    model: Sequential,
    params: Vec<f32>,
    trainer: Trainer<GradientDescent, Mse, StdRng>,
}

impl ModelHandle {
    /// Builds a handle with freshly initialized parameters.
    ///
    /// # Arguments
    /// * `model` - The model architecture.
    /// * `config` - The training setup, its seed makes the initialization reproducible.
    pub fn init(model: Sequential, config: &TrainingConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let shuffle_rng = StdRng::from_rng(&mut rng);
        let params = initialization::init_params(&model, &mut rng)?;

        Self::with_rng(model, params, config, shuffle_rng)
    }

    /// Wraps already known parameters into a handle.
    ///
    /// # Returns
    /// A new handle or an error if `params` doesn't fit `model`.
    pub fn from_params(
        model: Sequential,
        params: Vec<f32>,
        config: &TrainingConfig,
    ) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self::with_rng(model, params, config, rng)
    }

    fn with_rng(
        model: Sequential,
        params: Vec<f32>,
        config: &TrainingConfig,
        rng: StdRng,
    ) -> Result<Self> {
        if params.len() != model.size() {
            return Err(MlErr::SizeMismatch {
                what: "params",
                got: params.len(),
                expected: model.size(),
            });
        }

        let optimizer = GradientDescent::new(config.learning_rate);
        let trainer = Trainer::new(optimizer, Mse::new(), config.batch_size, rng);

        Ok(Self {
            model,
            params,
            trainer,
        })
    }

    pub fn model(&self) -> &Sequential {
        &self.model
    }

    /// Returns the flat parameter buffer, each layer's weights followed by its biases.
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Fits the parameters to `dataset` for `epochs` epochs.
    ///
    /// # Returns
    /// The loss of each epoch.
    pub fn fit_dataset(&mut self, dataset: &mut Dataset, epochs: usize) -> Result<Vec<f32>> {
        let Self {
            model,
            params,
            trainer,
        } = self;

        let (x_size, y_size) = (model.input_size(), model.output_size());
        if x_size != Some(dataset.x_size()) || y_size != Some(dataset.y_size()) {
            return Err(MlErr::SizeMismatch {
                what: "dataset sample",
                got: dataset.x_size() + dataset.y_size(),
                expected: x_size.unwrap_or_default() + y_size.unwrap_or_default(),
            });
        }

        trainer.train(model, params, dataset, epochs)
    }

    /// Fits a single input, single output model to the pairs `(xs[i], ys[i])`.
    pub fn fit(&mut self, xs: &[f32], ys: &[f32], epochs: usize) -> Result<Vec<f32>> {
        let mut dataset = Dataset::from_columns(xs, ys)?;
        self.fit_dataset(&mut dataset, epochs)
    }

    /// Evaluates the model once per row of `x`.
    pub fn predict_batch(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.model.predict(&self.params, x)
    }

    /// Evaluates the model once per input row.
    ///
    /// # Arguments
    /// * `inputs` - The input rows, each as wide as the model's input.
    ///
    /// # Returns
    /// One output row per input row.
    pub fn predict<I: AsRef<[f32]>>(&self, inputs: &[I]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let width = self.model.input_size().unwrap_or_default();
        let mut flat = Vec::with_capacity(inputs.len() * width);

        for row in inputs {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MlErr::SizeMismatch {
                    what: "input row",
                    got: row.len(),
                    expected: width,
                });
            }

            flat.extend_from_slice(row);
        }

        let x = ArrayView2::from_shape((inputs.len(), width), &flat).map_err(|_| {
            MlErr::SizeMismatch {
                what: "inputs",
                got: flat.len(),
                expected: inputs.len() * width,
            }
        })?;

        let y = self.predict_batch(x)?;
        Ok(y.outer_iter().map(|row| row.to_vec()).collect())
    }
}
