//! CLI Argument Parsing
//!
//! Flat flag interface: the mode flags (`--sass`, `--ftpall`,
//! `--livereload`) pick what runs, everything else tunes it.

use std::path::PathBuf;

use clap::Parser;
use stylesync::compile::OutputStyle;
use stylesync::reload::DEFAULT_PORT as DEFAULT_RELOAD_PORT;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleArg {
    #[default]
    Expanded,
    Compressed,
}

impl From<StyleArg> for OutputStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Expanded => OutputStyle::Expanded,
            StyleArg::Compressed => OutputStyle::Compressed,
        }
    }
}

/// stylesync - compile SCSS, upload it over FTP, reload the browser
#[derive(Parser, Debug)]
#[command(name = "stylesync")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "Remote host, credentials and target directory are read from .remote-sync.json."
)]
pub struct Cli {
    /// Compile the SCSS entry on start and on every .scss change, then upload it
    #[arg(long)]
    pub sass: bool,

    /// Upload every other changed file too
    #[arg(long)]
    pub ftpall: bool,

    /// Tell LiveReload-connected browsers to refresh
    #[arg(long, visible_alias = "browsersync")]
    pub livereload: bool,

    /// Site being worked on (required for --livereload on its own)
    #[arg(long, value_name = "HOST")]
    pub url: Option<String>,

    /// Project directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: .remote-sync.json in the project or its parent)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SCSS entry, relative to the project directory
    #[arg(long, value_name = "FILE", default_value = "css/site.scss")]
    pub entry: PathBuf,

    /// Compiled output, relative to the project directory
    #[arg(long, value_name = "FILE", default_value = "css/site-sass-out.css.twig")]
    pub output: PathBuf,

    /// CSS output style
    #[arg(long, value_enum, default_value_t = StyleArg::Expanded)]
    pub style: StyleArg,

    /// Extra directory to resolve @use/@import from (repeatable)
    #[arg(long = "load-path", value_name = "DIR")]
    pub load_paths: Vec<PathBuf>,

    /// Leave the output untouched when compilation fails
    #[arg(long)]
    pub no_error_overlay: bool,

    /// LiveReload server port
    #[arg(long, value_name = "PORT", default_value_t = DEFAULT_RELOAD_PORT)]
    pub reload_port: u16,

    /// Run the initial compile and upload, then exit
    #[arg(long)]
    pub once: bool,

    /// Output format for CI
    #[arg(long)]
    pub json: bool,

    /// Color output mode
    #[arg(long, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn any_mode(&self) -> bool {
        self.sass || self.ftpall || self.livereload
    }

    /// `--livereload` with no upload mode has nothing to point browsers at
    pub fn missing_url(&self) -> bool {
        self.livereload && !self.sass && !self.ftpall && self.url.is_none()
    }
}
