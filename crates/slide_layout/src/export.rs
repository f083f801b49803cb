use crate::constants::REPORT_HEADERS;
use crate::error::{LayoutError, Result};
use crate::layout::PlaceholderMapping;

use chrono::Local;
use csv::WriterBuilder;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| LayoutError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| LayoutError::CreateFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Write `Page,Instance,Token,Url` rows to `layout_<timestamp>.csv`
pub fn write_mapping_report(
    mapping: &PlaceholderMapping,
    output_dir: Option<&Path>,
) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let filename = format!("layout_{timestamp}.csv");

    let file_path = if let Some(dir) = output_dir {
        ensure_dir(dir)?;
        dir.join(&filename)
    } else {
        filename.into()
    };

    let writer = create_file(&file_path)?;
    let mut wtr = WriterBuilder::new().from_writer(writer);

    wtr.write_record(REPORT_HEADERS)?;
    for (page, a) in mapping.iter() {
        let page_s = page.to_string();
        let instance_s = a.instance.to_string();
        wtr.write_record([
            page_s.as_str(),
            instance_s.as_str(),
            a.token.as_str(),
            a.url.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(file_path)
}

/// Serialize `value` as JSON to `path`, creating parent directories
pub fn write_json<T: Serialize>(value: &T, path: &Path, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }
    let mut writer = create_file(path)?;
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
