use {
    anyhow::Result,
    ron::ser::PrettyConfig,
    serde::{
        de::DeserializeOwned,
        Serialize,
    },
    std::{
        fs::{
            read_to_string,
            File,
        },
        io::Write,
        path::Path,
    },
};

/// Write a config to a RON file.
pub fn write_config<T: Serialize, P: AsRef<Path>>(
    config: &T,
    path: P,
) -> Result<()> {
    File::create(path)?.write_all(
        ron::ser::to_string_pretty(
            config,
            PrettyConfig::default(),
        )?.as_bytes()
    )?;
    Ok(())
}

/// Read a config back from a RON file.
pub fn read_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    Ok(ron::from_str(&read_to_string(path)?)?)
}
