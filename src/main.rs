use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use clap::Parser;
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

mod care;
mod cli;
mod config;
mod lightmeter;
mod plants;
mod state;
mod storage;

use cli::{Cli, Commands, MeterArgs};
use lightmeter::{FrameSource, MeterError, SAMPLE_BYTES};
use plants::schedule::{resolve_season, watering_status, Season};
use plants::{services, store::PlantStore};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "jardineria=info,reqwest=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let cli = Cli::parse();
    match cli.command {
        // The light meter is self-contained; it needs neither the store nor
        // the AI client.
        Commands::Meter(args) => run_light_meter(args).await,
        command => {
            let state = AppState::init().await;
            run_command(command, state).await
        }
    }
}

async fn run_command(command: Commands, state: AppState) -> anyhow::Result<()> {
    let now = OffsetDateTime::now_utc();
    let season = resolve_season(now, state.config.latitude);

    match command {
        Commands::List => list_plants(&state.store, season, now).await,
        Commands::Show { id } => show_plant(&state.store, id, season, now).await,
        Commands::Scan { image } => {
            let jpeg = tokio::fs::read(&image)
                .await
                .with_context(|| format!("leer {}", image.display()))?;
            println!("Identificando...");
            let plant = services::create_from_image(&state, Bytes::from(jpeg), now).await?;
            println!("Planta agregada: {} ({})", plant.name, plant.id);
            Ok(())
        }
        Commands::Search { query } => {
            println!("Buscando \"{}\"...", query.trim());
            let plant = services::create_from_name(&state, &query, now).await?;
            println!("Planta agregada: {} ({})", plant.name, plant.id);
            Ok(())
        }
        Commands::Water { id } => {
            if state.store.mark_watered(id, now).await? {
                println!("Riego registrado para {}", id);
            } else {
                println!("No se encontró planta con ID {}", id);
            }
            Ok(())
        }
        Commands::Remove { id } => {
            state.store.delete(id).await?;
            println!("Planta con ID {} eliminada", id);
            Ok(())
        }
        Commands::Meter(_) => unreachable!("handled in main"),
    }
}

fn season_label(season: Season) -> &'static str {
    match season {
        Season::Summer => "Verano",
        Season::Winter => "Invierno",
    }
}

async fn list_plants(store: &PlantStore, season: Season, now: OffsetDateTime) -> anyhow::Result<()> {
    let plants = store.list().await;
    println!("{} plantas — {} detectado", plants.len(), season_label(season));
    if plants.is_empty() {
        println!("Empieza escaneando tu primera planta.");
        return Ok(());
    }
    for plant in &plants {
        let status = watering_status(plant, season, now);
        let riego = if status.is_urgent {
            "¡Toca regar ya!".to_string()
        } else {
            format!("Riego en {} días", status.days_remaining)
        };
        println!();
        println!("{} ({})", plant.name, plant.species);
        println!("  ID: {}", plant.id);
        println!("  {}", riego);
    }
    Ok(())
}

async fn show_plant(
    store: &PlantStore,
    id: Uuid,
    season: Season,
    now: OffsetDateTime,
) -> anyhow::Result<()> {
    let Some(plant) = store.get(id).await else {
        println!("No se encontró planta con ID {}", id);
        return Ok(());
    };
    let status = watering_status(&plant, season, now);
    let info = &plant.instructions;

    println!("{} — {}", plant.name, plant.species);
    println!("ID: {}", plant.id);
    println!();
    println!("Próximo riego ({})", season_label(season));
    if status.is_urgent {
        println!("  ¡Toca regar hoy! (fecha: {})", status.next_date.date());
    } else {
        println!(
            "  {} días restantes (fecha: {})",
            status.days_remaining,
            status.next_date.date()
        );
    }
    println!("  Intervalo transcurrido: {:.0}%", status.progress * 100.0);
    println!();
    println!("Origen: {}", info.origin);
    println!("Acerca de esta planta: {}", info.description);
    println!("Clima en casa: {}", info.home_climate_tips);
    println!("Problemas frecuentes: {}", info.frequent_problems);
    println!("Abono y/o fertilización: {}", info.fertilization);
    println!("Sustrato: {}", info.substrate);
    println!("Poda: {}", info.pruning);
    println!(
        "Frecuencia de riego: verano cada {} días, invierno cada {} días",
        info.watering_summer, info.watering_winter
    );
    println!("Requerimiento lumínico: {} lux", info.target_lumens);
    println!("Recomendaciones: {}", info.recommendations);

    if plant.logs.is_empty() {
        println!();
        println!("Sin registros de cuidado todavía.");
    } else {
        println!();
        println!("Registros (más reciente primero):");
        for log in &plant.logs {
            println!("  {:?} — {}", log.kind, log.date.date());
        }
    }
    Ok(())
}

/// Replays pre-captured RGBA samples as camera frames.
struct ReplaySource {
    frames: Vec<Vec<u8>>,
    next: usize,
}

#[async_trait::async_trait]
impl FrameSource for ReplaySource {
    async fn next_frame(&mut self) -> Result<Vec<u8>, MeterError> {
        let frame = self.frames[self.next % self.frames.len()].clone();
        self.next += 1;
        Ok(frame)
    }
}

async fn run_light_meter(args: MeterArgs) -> anyhow::Result<()> {
    let mut frames = Vec::with_capacity(args.frames.len());
    for path in &args.frames {
        let raw = tokio::fs::read(path)
            .await
            .with_context(|| format!("leer {}", path.display()))?;
        anyhow::ensure!(
            raw.len() == SAMPLE_BYTES,
            "{}: se esperaban {} bytes RGBA, hay {}",
            path.display(),
            SAMPLE_BYTES,
            raw.len()
        );
        frames.push(raw);
    }

    let (tx, mut rx) = watch::channel(None);
    let cancel = CancellationToken::new();
    let meter = tokio::spawn(lightmeter::run_meter(
        ReplaySource { frames, next: 0 },
        Duration::from_millis(500),
        tx,
        cancel.clone(),
    ));

    println!(
        "Fotómetro: midiendo durante {}s (Ctrl-C para salir)...",
        args.seconds
    );
    let deadline = tokio::time::sleep(Duration::from_secs(args.seconds));
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(reading) = *rx.borrow() {
                    println!("{} lux est. — {}", reading.lux, reading.category.label());
                }
            }
        }
    }

    cancel.cancel();
    meter.await.context("light meter task")??;
    Ok(())
}
