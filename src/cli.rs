use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::io::LoadMode;
use crate::wad::{
    DEFAULT_MAGIC, DataOrigin, ExtractOptions, HeaderVariant, OnError, Overwrite, ParseOptions,
};

#[derive(Parser, Debug)]
#[command(name = "unwad")]
#[command(version)]
#[command(about = "Extract every file from a WAD archive", long_about = None)]
#[command(after_help = "Examples:\n  \
  unwad game.wad                 extract into the current directory\n  \
  unwad -d out game.wad          extract into ./out\n  \
  unwad -l game.wad              list entries without extracting\n  \
  unwad --variant magic --magic 0x52414741 game.wad")]
pub struct Cli {
    /// WAD archive path
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Extract files into DIR
    #[arg(short = 'd', long = "output", value_name = "DIR", env = "UNWAD_OUTPUT")]
    pub extract_dir: Option<PathBuf>,

    /// How to read the first preamble field
    #[arg(long, value_enum, default_value_t = Variant::EndOffset)]
    pub variant: Variant,

    /// Expected magic value for `--variant magic` (decimal or 0x-prefixed hex)
    #[arg(long, value_name = "VALUE", value_parser = parse_u32, default_value_t = DEFAULT_MAGIC)]
    pub magic: u32,

    /// Where entry data offsets are counted from. With records-end, bytes
    /// padding the header up to its declared end are read as file data; use
    /// header-end for padded archives
    #[arg(long, value_enum, default_value_t = Origin::RecordsEnd)]
    pub data_origin: Origin,

    /// Reject archives whose records do not end exactly at the declared header end
    #[arg(long)]
    pub strict: bool,

    /// Overwrite existing files
    #[arg(short = 'o', long)]
    pub overwrite: bool,

    /// Keep extracting after a failed entry and report all failures at the end
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// Number of entries to write concurrently
    #[arg(short = 'j', long, value_name = "N", default_value_t = 1,
          value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Read the archive into memory instead of mapping it
    #[arg(long)]
    pub no_mmap: bool,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely with sizes and offsets
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Quiet mode, no progress lines
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Log level for diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// First field is the header end offset
    EndOffset,
    /// First field is a magic constant
    Magic,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Data begins right after the last record; header padding counts as data
    RecordsEnd,
    /// Data begins at the declared header end, skipping any header padding
    HeaderEnd,
}

impl Cli {
    pub fn is_list(&self) -> bool {
        self.list || self.verbose
    }

    pub fn load_mode(&self) -> LoadMode {
        if self.no_mmap {
            LoadMode::Read
        } else {
            LoadMode::Map
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            variant: match self.variant {
                Variant::EndOffset => HeaderVariant::EndOffset,
                Variant::Magic => HeaderVariant::Magic(self.magic),
            },
            data_origin: match self.data_origin {
                Origin::RecordsEnd => DataOrigin::RecordsEnd,
                Origin::HeaderEnd => DataOrigin::HeaderEnd,
            },
            strict: self.strict,
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            output_root: self
                .extract_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
            on_error: if self.keep_going {
                OnError::Continue
            } else {
                OnError::Abort
            },
            overwrite: if self.overwrite {
                Overwrite::Allow
            } else {
                Overwrite::Forbid
            },
            jobs: self.jobs as usize,
        }
    }
}

fn parse_u32(value: &str) -> Result<u32, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid value {value:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["unwad", "game.wad"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("game.wad"));
        assert_eq!(cli.parse_options(), ParseOptions::default());
        assert_eq!(cli.load_mode(), LoadMode::Map);
        assert!(!cli.is_list());

        let options = cli.extract_options();
        assert_eq!(options.on_error, OnError::Abort);
        assert_eq!(options.overwrite, Overwrite::Forbid);
        assert_eq!(options.jobs, 1);
    }

    #[test]
    fn magic_variant_with_hex_value() {
        let cli = Cli::try_parse_from([
            "unwad",
            "--variant",
            "magic",
            "--magic",
            "0xDEADBEEF",
            "--data-origin",
            "header-end",
            "--strict",
            "game.wad",
        ])
        .unwrap();
        assert_eq!(
            cli.parse_options(),
            ParseOptions {
                variant: HeaderVariant::Magic(0xDEAD_BEEF),
                data_origin: DataOrigin::HeaderEnd,
                strict: true,
            }
        );
    }

    #[test]
    fn extract_flags() {
        let cli =
            Cli::try_parse_from(["unwad", "-o", "-k", "-j", "4", "-d", "out", "game.wad"]).unwrap();
        let options = cli.extract_options();
        assert_eq!(options.output_root, PathBuf::from("out"));
        assert_eq!(options.on_error, OnError::Continue);
        assert_eq!(options.overwrite, Overwrite::Allow);
        assert_eq!(options.jobs, 4);
    }

    #[test]
    fn requires_exactly_one_file() {
        assert!(Cli::try_parse_from(["unwad"]).is_err());
        assert!(Cli::try_parse_from(["unwad", "a.wad", "b.wad"]).is_err());
        assert!(Cli::try_parse_from(["unwad", "-j", "0", "a.wad"]).is_err());
    }

    #[test]
    fn data_origin_help_mentions_padding() {
        use clap::CommandFactory;

        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("padded archives"), "{help}");
        assert!(help.contains("skipping any header padding"), "{help}");
    }

    #[test]
    fn parses_magic_values() {
        assert_eq!(parse_u32("16"), Ok(16));
        assert_eq!(parse_u32("0x10"), Ok(16));
        assert!(parse_u32("zz").is_err());
    }
}
