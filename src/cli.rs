use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "jardineria")]
#[command(about = "Cuaderno de plantas: identificación por IA y calendario de riego")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ver todas las plantas con su próximo riego
    List,
    /// Ver la ficha completa de una planta
    Show {
        /// ID de la planta
        id: Uuid,
    },
    /// Identificar una planta desde una foto JPEG y crear su ficha
    Scan {
        /// Ruta de la foto
        image: PathBuf,
    },
    /// Buscar una planta por nombre y crear su ficha
    Search {
        /// Nombre común o científico
        query: String,
    },
    /// Registrar un riego
    Water {
        /// ID de la planta regada
        id: Uuid,
    },
    /// Eliminar una ficha
    Remove {
        /// ID de la planta a eliminar
        id: Uuid,
    },
    /// Medir la luz a partir de muestras de cámara (RGBA 64x64 en crudo)
    Meter(MeterArgs),
}

#[derive(Args, Debug)]
pub struct MeterArgs {
    /// Archivos de muestra RGBA; se repiten en bucle
    #[arg(required = true)]
    pub frames: Vec<PathBuf>,
    /// Duración de la medición en segundos
    #[arg(long, default_value_t = 5)]
    pub seconds: u64,
}
