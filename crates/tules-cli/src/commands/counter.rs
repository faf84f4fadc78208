use chrono::Local;
use std::path::PathBuf;
use tules_core::counter::DailyCount;
use tules_core::error::Result;

use super::open_store;

pub fn run(data_dir: Option<PathBuf>) -> Result<()> {
    let store = open_store(data_dir)?;
    let today = Local::now().date_naive();
    println!("{}", DailyCount::read(&store).count_on(today));
    Ok(())
}
