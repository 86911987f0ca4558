// src/output.rs
use crate::mc::mc_engine::StepStatistics;
use ndarray::Array2;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// One row per path: `path_id,step_0,...,step_{T-1}`
pub fn write_paths_to_csv<T: Display>(filename: impl AsRef<Path>, paths: &Array2<T>) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);

    let header: Vec<String> = (0..paths.ncols()).map(|j| format!("step_{}", j)).collect();
    writeln!(file, "path_id,{}", header.join(","))?;

    for (i, row) in paths.outer_iter().enumerate() {
        write!(file, "{}", i)?;
        for value in row.iter() {
            write!(file, ",{}", value)?;
        }
        writeln!(file)?;
    }
    file.flush()
}

pub fn write_statistics_to_csv(filename: impl AsRef<Path>, stats: &[StepStatistics]) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "step,time,mean,variance,min,max,zero_fraction")?;
    for s in stats {
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            s.step, s.time, s.mean, s.variance, s.min, s.max, s.zero_fraction
        )?;
    }
    file.flush()
}

pub fn write_summary_to_csv(filename: impl AsRef<Path>, summary_data: &[(&str, &str)]) -> io::Result<()> {
    let mut file = File::create(filename)?;
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    Ok(())
}
