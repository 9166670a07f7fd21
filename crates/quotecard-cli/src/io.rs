use std::error::Error;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const UNKNOWN_AUTHOR_SLUG: &str = "inconnu";
const QUOTE_SLUG_CHARS: usize = 15;

/// File name derived from the card: `citation_<author>_<quote start>.png`,
/// lowercased, spaces as `_`, anything outside `[A-Za-z0-9_.-]` dropped.
pub(crate) fn default_file_name(quote: &str, author: &str) -> String {
    let author = author.trim();
    let author = if author.is_empty() {
        UNKNOWN_AUTHOR_SLUG.to_string()
    } else {
        author.replace(' ', "_").to_lowercase()
    };
    let head: String = quote.chars().take(QUOTE_SLUG_CHARS).collect();
    let head = head.replace(' ', "_").to_lowercase();
    format!("citation_{author}_{head}.png")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect()
}

pub(crate) fn write_output_with_tty(
    bytes: &[u8],
    output: Option<&PathBuf>,
    default_name: &str,
    stdout_is_tty: bool,
) -> Result<(), Box<dyn Error>> {
    if let Some(path) = output {
        std::fs::write(path, bytes)?;
        if stdout_is_tty {
            print_wrote(path);
        }
        return Ok(());
    }

    if stdout_is_tty {
        std::fs::write(default_name, bytes)?;
        print_wrote(Path::new(default_name));
        return Ok(());
    }

    let mut stdout = io::stdout();
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(())
}

pub(crate) fn print_wrote(path: &Path) {
    println!("WROTE {}", path.display());
}

pub(crate) fn read_stdin() -> Result<String, io::Error> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

pub(crate) fn read_stdin_with(stdin_override: Option<&str>) -> Result<String, io::Error> {
    if let Some(value) = stdin_override {
        return Ok(value.to_string());
    }
    read_stdin()
}
