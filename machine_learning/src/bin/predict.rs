use env_logger::Env;
use log::info;

use machine_learning::app;

const INPUT: f32 = 10.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let handle = app::load(&app::model_path())?;
    let prediction = app::predict(&handle, &[[INPUT]])?;

    info!("prediction for {INPUT}: {prediction:?}");
    Ok(())
}
