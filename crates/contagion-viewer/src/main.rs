//! Terminal viewer for the infection-spread simulation.

mod chart;
mod render;
mod telemetry;

use anyhow::Result;
use contagion_core::ViewerConfig;
use contagion_world::{RunRecorder, RunReport, Simulation};
use std::io;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parameters are fixed at construction time
    let config = ViewerConfig::default();

    telemetry::init_telemetry()?;

    info!(
        size = config.simulation.size,
        infection_probability = config.simulation.infection_probability,
        steps = config.simulation.steps,
        "Starting contagion viewer"
    );

    let report = if config.display.frame_interval_ms == 0 {
        let mut renderer = render::TerminalRenderer::new(io::stdout()).without_clear();
        Simulation::new(config.simulation.clone())?.observe(&mut renderer)?
    } else {
        animate(&config).await?
    };

    let chart = chart::SummaryChart::default();
    print!("{}", chart.render(&report.series, report.config.cell_count()));

    if config.display.print_report_json {
        println!("{}", report.to_json()?);
    }

    Ok(())
}

/// Render one frame per tick until the run ends or the user interrupts it
async fn animate(config: &ViewerConfig) -> Result<RunReport> {
    let mut simulation = Simulation::new(config.simulation.clone())?;
    let mut recorder = RunRecorder::new(simulation.config().clone());
    let mut renderer = render::TerminalRenderer::new(io::stdout());
    let mut ticker = interval(Duration::from_millis(config.display.frame_interval_ms));

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(frame) = simulation.next() else {
                    break;
                };
                recorder.record(&frame, &mut renderer)?;
            }
            _ = &mut shutdown => {
                warn!(
                    rendered = recorder.recorded(),
                    next_iteration = simulation.iteration(),
                    steps = simulation.config().steps,
                    "Animation interrupted"
                );
                break;
            }
        }
    }

    Ok(recorder.finish())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received");
}
