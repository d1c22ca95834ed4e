use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const AEA_DIRECTORY: &str = "data/processed/aea/AEA_RepairList2025-2026.csv";
pub const FAA_REPAIR_STATION_RAW: &str =
    "data/raw/faa/Repair Station Contacts with Ratings (Download).csv";
pub const FAA_REPAIR_STATION: &str = "data/processed/faa/FAA_Repair_Station.csv";
pub const FAA_DEALER_RAW: &str = "data/raw/faa/Dealer.txt";
pub const FAA_DEALER: &str = "data/processed/faa/FAA_Dealer.csv";
pub const FAA_MASTER_RAW: &str = "data/raw/faa/MASTER.txt";
pub const FAA_MASTER: &str = "data/processed/faa/master.csv";
pub const OUTPUT_DIR: &str = "data/processed";

/// Input and output locations shared by the pipeline binaries.
///
/// Every binary flattens this into its own arguments, so any path can be
/// overridden with `--<name>`; the defaults are the project data layout.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Cleaned AEA repair-station directory
    #[arg(long, default_value = AEA_DIRECTORY)]
    pub aea_directory: PathBuf,

    /// FAA repair-station contacts as downloaded
    #[arg(long, default_value = FAA_REPAIR_STATION_RAW)]
    pub faa_repair_station_raw: PathBuf,

    /// Cleaned FAA repair-station contacts
    #[arg(long, default_value = FAA_REPAIR_STATION)]
    pub faa_repair_station: PathBuf,

    /// FAA dealer file as downloaded
    #[arg(long, default_value = FAA_DEALER_RAW)]
    pub faa_dealer_raw: PathBuf,

    /// Cleaned FAA dealer file
    #[arg(long, default_value = FAA_DEALER)]
    pub faa_dealer: PathBuf,

    /// FAA aircraft registration master file as downloaded
    #[arg(long, default_value = FAA_MASTER_RAW)]
    pub faa_master_raw: PathBuf,

    /// Cleaned FAA aircraft registration master file
    #[arg(long, default_value = FAA_MASTER)]
    pub faa_master: PathBuf,

    /// Directory derived tables are written to
    #[arg(long, default_value = OUTPUT_DIR)]
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            aea_directory: PathBuf::from(AEA_DIRECTORY),
            faa_repair_station_raw: PathBuf::from(FAA_REPAIR_STATION_RAW),
            faa_repair_station: PathBuf::from(FAA_REPAIR_STATION),
            faa_dealer_raw: PathBuf::from(FAA_DEALER_RAW),
            faa_dealer: PathBuf::from(FAA_DEALER),
            faa_master_raw: PathBuf::from(FAA_MASTER_RAW),
            faa_master: PathBuf::from(FAA_MASTER),
            output_dir: PathBuf::from(OUTPUT_DIR),
        }
    }
}

impl PipelineConfig {
    /// Path of a named file inside the output directory
    pub fn output(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
