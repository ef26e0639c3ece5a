use env_logger::Env;
use log::info;

use machine_learning::{app, training::TrainingConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = TrainingConfig::from_env()?;
    info!(
        "training for {} epochs with learning rate {} and batch size {}",
        config.epochs, config.learning_rate, config.batch_size
    );

    let mut handle = app::build_topology_with(&config)?;
    let (xs, ys) = app::get_training_data();

    app::fit(&mut handle, &xs, &ys, config.epochs)?;
    app::persist(&handle, &app::model_path())?;

    Ok(())
}
