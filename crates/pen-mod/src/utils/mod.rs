use crate::errors::CliError;
use camino::Utf8PathBuf;
use miette::Result;

pub mod config;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

/// Resolve a user supplied path to a file that must exist.
pub fn existing_file(path: &str) -> Result<Utf8PathBuf> {
    let path = Utf8PathBuf::from(path);
    if !path.is_file() {
        return Err(CliError::file_not_found(path.into_std_path_buf()).into());
    }

    Ok(path)
}

/// Write `contents` to `output`, or print it when no output is given.
pub fn write_or_print(output: Option<&str>, contents: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents).map_err(CliError::from)?,
        None => println!("{}", contents),
    }

    Ok(())
}
