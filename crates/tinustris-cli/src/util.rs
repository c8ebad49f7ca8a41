use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use tinustris_engine::GameConfig;

/// Writes `value` as pretty JSON to `output_path`, or to stdout without one.
pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let (writer, target): (Box<dyn Write>, String) = match output_path {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_owned()),
    };
    write_json(writer, value).with_context(|| format!("Failed to write JSON to {target}"))
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a game configuration, or the default one when no path is given.
pub fn read_config_file(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let file = File::open(path)
        .with_context(|| format!("Failed to open config file: {}", path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse config JSON file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_path_gives_default() {
        assert_eq!(read_config_file(None).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_write_json_ends_with_newline() {
        let mut buf = vec![];
        write_json(&mut buf, &GameConfig::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("{\n"));
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"behavior\": \"tinustris\""));
    }
}
