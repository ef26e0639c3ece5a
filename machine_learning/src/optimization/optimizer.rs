/// An optimization algorithm, it dictates how parameters move given their gradient.
pub trait Optimizer {
    /// Updates `params` in place following `grad`.
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]);
}
