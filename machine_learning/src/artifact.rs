//! Model artifacts: the parameters of a `Sequential` of dense layers stored as safetensors.
//!
//! Each layer `i` is stored as a `dense_{i}.kernel` tensor of shape `[fan_in, fan_out]` and a
//! `dense_{i}.bias` tensor of shape `[fan_out]`, so the architecture is recovered from the shapes
//! when loading.

use std::{collections::HashMap, fs, io, path::Path};

use safetensors::{
    SafeTensors,
    tensor::{Dtype, TensorView},
};

use crate::{
    MlErr, Result,
    arch::{Model, Sequential, layers::Layer},
};

const FORMAT: &str = "sequential";

fn kernel_name(i: usize) -> String {
    format!("dense_{i}.kernel")
}

fn bias_name(i: usize) -> String {
    format!("dense_{i}.bias")
}

/// Writes `params` of `model` to `path`, creating its parent directories and overwriting any
/// existing file.
pub fn save(model: &Sequential, params: &[f32], path: &Path) -> Result<()> {
    if params.len() != model.size() {
        return Err(MlErr::SizeMismatch {
            what: "params",
            got: params.len(),
            expected: model.size(),
        });
    }

    let mut tensors = Vec::with_capacity(model.layers().len() * 2);
    let mut start = 0;

    for (i, layer) in model.layers().iter().enumerate() {
        let (fan_in, fan_out) = layer.dim();
        let w_end = start + fan_in * fan_out;
        let b_end = w_end + fan_out;

        tensors.push((kernel_name(i), vec![fan_in, fan_out], &params[start..w_end]));
        tensors.push((bias_name(i), vec![fan_out], &params[w_end..b_end]));
        start = b_end;
    }

    let views = tensors
        .iter()
        .map(|(name, shape, values)| {
            let bytes = bytemuck::cast_slice::<f32, u8>(values);
            TensorView::new(Dtype::F32, shape.clone(), bytes).map(|view| (name.as_str(), view))
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| MlErr::format(path, e))?;

    let metadata = HashMap::from([
        ("format".to_string(), FORMAT.to_string()),
        ("layers".to_string(), model.layers().len().to_string()),
    ]);

    let bytes = safetensors::serialize(views, &Some(metadata)).map_err(|e| MlErr::format(path, e))?;

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    fs::write(path, bytes)?;
    Ok(())
}

/// Reads the artifact at `path`.
///
/// # Returns
/// The model and its parameters, `ArtifactNotFound` if there's no file at `path` or
/// `ArtifactFormat` if it isn't a valid artifact.
pub fn load(path: &Path) -> Result<(Sequential, Vec<f32>)> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(MlErr::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let tensors = SafeTensors::deserialize(&data).map_err(|e| MlErr::format(path, e))?;
    let (_, metadata) = SafeTensors::read_metadata(&data).map_err(|e| MlErr::format(path, e))?;

    let mut layers = Vec::new();
    let mut params = Vec::new();

    while let Ok(kernel) = tensors.tensor(&kernel_name(layers.len())) {
        let i = layers.len();
        let bias = tensors
            .tensor(&bias_name(i))
            .map_err(|e| MlErr::format(path, e))?;

        let &[fan_in, fan_out] = kernel.shape() else {
            return Err(MlErr::format(
                path,
                format!("{} should have 2 dimensions", kernel_name(i)),
            ));
        };

        if bias.shape() != [fan_out] {
            return Err(MlErr::format(
                path,
                format!("{} should have shape [{fan_out}]", bias_name(i)),
            ));
        }

        if kernel.dtype() != Dtype::F32 || bias.dtype() != Dtype::F32 {
            return Err(MlErr::format(path, format!("layer {i} is not f32")));
        }

        if let Some(prev) = layers.last().map(Layer::dim)
            && prev.1 != fan_in
        {
            return Err(MlErr::format(
                path,
                format!("layer {i} takes {fan_in} inputs but the previous one outputs {}", prev.1),
            ));
        }

        params.extend(bytemuck::pod_collect_to_vec::<u8, f32>(kernel.data()));
        params.extend(bytemuck::pod_collect_to_vec::<u8, f32>(bias.data()));
        layers.push(Layer::dense((fan_in, fan_out)));
    }

    if layers.is_empty() {
        return Err(MlErr::format(path, "there are no dense layers"));
    }

    let declared = metadata.metadata().as_ref().and_then(|info| info.get("layers"));
    if let Some(raw) = declared {
        let declared: usize = raw
            .parse()
            .map_err(|e| MlErr::format(path, format!("layers={raw}: {e}")))?;

        if declared != layers.len() {
            return Err(MlErr::format(
                path,
                format!("declares {declared} layers but holds {}", layers.len()),
            ));
        }
    }

    Ok((Sequential::new(layers), params))
}
